//! Launch information panel labels

use chrono::{DateTime, FixedOffset};

/// e.g. `Sunday, November 23, 2025`
pub fn launch_date_label(at: &DateTime<FixedOffset>) -> String {
    at.format("%A, %B %-d, %Y").to_string()
}

/// e.g. `02:30 PM UTC+05:30`
pub fn launch_time_label(at: &DateTime<FixedOffset>) -> String {
    at.format("%I:%M %p UTC%:z").to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::LaunchConfig;

    #[test]
    fn test_labels_for_default_launch() {
        let config = LaunchConfig::default();
        assert_eq!(launch_date_label(&config.launch_at), "Sunday, November 23, 2025");
        assert_eq!(launch_time_label(&config.launch_at), "02:30 PM UTC+05:30");
    }
}
