//! Shape geometry for the particle sprites
//!
//! All shapes are built around the origin; the caller translates and
//! rotates the surface first.

use glam::Vec2;
use std::f32::consts::PI;

/// Glyph used for heart confetti
pub const HEART_GLYPH: &str = "❤️";

/// Heart glyph font size relative to the piece size
pub const HEART_FONT_SCALE: f32 = 1.8;

/// Firework spark edge length
pub const SPARK_SIZE: f32 = 10.0;

/// Glow radius per sprite kind
pub const CIRCLE_GLOW: f32 = 15.0;
pub const STAR_GLOW: f32 = 20.0;
pub const SPARK_GLOW: f32 = 30.0;

/// Outline of a star with `spikes` points, alternating between the outer
/// and inner radius. The first point is straight up.
pub fn star_points(center: Vec2, spikes: u32, outer: f32, inner: f32) -> Vec<Vec2> {
    let step = PI / spikes.max(1) as f32;
    let mut angle = PI * 1.5;
    let mut points = Vec::with_capacity(spikes as usize * 2);

    for _ in 0..spikes {
        points.push(center + Vec2::new(angle.cos(), angle.sin()) * outer);
        angle += step;
        points.push(center + Vec2::new(angle.cos(), angle.sin()) * inner);
        angle += step;
    }
    points
}

/// Streamer rectangle (top-left corner, size): taller than it is wide
pub fn confetti_rect(size: f32) -> (Vec2, Vec2) {
    (Vec2::splat(-size / 2.0), Vec2::new(size, size * 1.6))
}

/// Baseline anchor and font size for a heart piece
pub fn heart_glyph(size: f32) -> (Vec2, f32) {
    (Vec2::new(-size / 2.0, size / 2.0), size * HEART_FONT_SCALE)
}

/// Spark square (top-left corner, size) centered on `pos`
pub fn spark_rect(pos: Vec2) -> (Vec2, Vec2) {
    (pos - Vec2::splat(SPARK_SIZE / 2.0), Vec2::splat(SPARK_SIZE))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_star_points_alternate_radii() {
        let points = star_points(Vec2::ZERO, 5, 20.0, 10.0);
        assert_eq!(points.len(), 10);

        // Straight up first (canvas y grows downward)
        assert!((points[0] - Vec2::new(0.0, -20.0)).length() < 1e-4);
        for (i, p) in points.iter().enumerate() {
            let expected = if i % 2 == 0 { 20.0 } else { 10.0 };
            assert!((p.length() - expected).abs() < 1e-3);
        }
    }

    #[test]
    fn test_star_points_offset_by_center() {
        let center = Vec2::new(100.0, 50.0);
        let points = star_points(center, 5, 8.0, 4.0);
        assert!((points[0] - Vec2::new(100.0, 42.0)).length() < 1e-4);
    }

    #[test]
    fn test_sprite_rects() {
        let (min, size) = confetti_rect(10.0);
        assert_eq!(min, Vec2::new(-5.0, -5.0));
        assert_eq!(size, Vec2::new(10.0, 16.0));

        let (min, size) = spark_rect(Vec2::new(50.0, 50.0));
        assert_eq!(min, Vec2::new(45.0, 45.0));
        assert_eq!(size, Vec2::splat(10.0));

        let (anchor, font_px) = heart_glyph(20.0);
        assert_eq!(anchor, Vec2::new(-10.0, 10.0));
        assert_eq!(font_px, 36.0);
    }
}
