//! Particle rendering
//!
//! Draws the celebration onto any `Surface`. The browser implementation
//! wraps a Canvas 2D context; tests use `platform::manual::ManualSurface`.

#[cfg(target_arch = "wasm32")]
pub mod canvas;
pub mod shapes;

use glam::Vec2;

use crate::show::{ConfettiPiece, ConfettiShape, ShowState};

/// Immediate-mode 2D drawing target
///
/// Mirrors the subset of Canvas 2D the page needs. `save`/`restore` scope
/// transform, alpha, fill and glow.
pub trait Surface {
    /// Match the backing store to the viewport, returning its size in pixels
    fn fit_to_viewport(&mut self) -> Vec2;
    fn clear(&mut self);
    fn save(&mut self);
    fn restore(&mut self);
    fn translate(&mut self, offset: Vec2);
    fn rotate(&mut self, radians: f32);
    fn set_alpha(&mut self, alpha: f32);
    fn set_fill(&mut self, color: &str);
    /// Shadow blur in the given color; zero blur turns it off
    fn set_glow(&mut self, blur: f32, color: &str);
    fn fill_rect(&mut self, min: Vec2, size: Vec2);
    fn fill_circle(&mut self, center: Vec2, radius: f32);
    fn fill_polygon(&mut self, points: &[Vec2]);
    fn fill_text(&mut self, text: &str, at: Vec2, font_px: f32);
}

/// Clear and redraw every live particle
pub fn draw(show: &ShowState, surface: &mut dyn Surface) {
    surface.clear();

    for piece in &show.confetti {
        draw_confetti(piece, surface);
    }

    for burst in &show.fireworks {
        for spark in burst.sparks.iter().filter(|spark| spark.is_alive()) {
            surface.save();
            surface.set_alpha(spark.alpha());
            surface.set_fill(&burst.color);
            surface.set_glow(shapes::SPARK_GLOW, &burst.color);
            let (min, size) = shapes::spark_rect(spark.pos);
            surface.fill_rect(min, size);
            surface.restore();
        }
    }
}

fn draw_confetti(piece: &ConfettiPiece, surface: &mut dyn Surface) {
    surface.save();
    surface.translate(piece.pos);
    surface.rotate(piece.rotation.to_radians());
    surface.set_fill(&piece.color);

    match piece.shape {
        ConfettiShape::Rect => {
            let (min, size) = shapes::confetti_rect(piece.size);
            surface.fill_rect(min, size);
        }
        ConfettiShape::Circle => {
            surface.set_glow(shapes::CIRCLE_GLOW, &piece.color);
            surface.fill_circle(Vec2::ZERO, piece.size / 2.0);
        }
        ConfettiShape::Star => {
            surface.set_glow(shapes::STAR_GLOW, &piece.color);
            let points = shapes::star_points(Vec2::ZERO, 5, piece.size, piece.size / 2.0);
            surface.fill_polygon(&points);
        }
        ConfettiShape::Heart => {
            let (at, font_px) = shapes::heart_glyph(piece.size);
            surface.fill_text(shapes::HEART_GLYPH, at, font_px);
        }
    }

    surface.restore();
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{FireworkCue, ShowConfig};
    use crate::platform::manual::ManualSurface;

    #[test]
    fn test_draw_one_fill_per_particle() {
        let mut show = ShowState::new(&ShowConfig::default(), 9, Vec2::new(1280.0, 720.0));
        show.fire_confetti();
        show.launch_firework(&FireworkCue::new(50.0, 15.0, 0));

        let mut surface = ManualSurface::new(Vec2::new(1280.0, 720.0));
        draw(&show, &mut surface);

        let log = surface.log();
        assert_eq!(log.clears, 1);
        assert_eq!(log.depth, 0);
        assert_eq!(surface.fills(), 250 + 80);
        assert_eq!(log.rects + log.circles + log.polygons + log.glyphs, 330);
    }

    #[test]
    fn test_draw_empty_show_only_clears() {
        let show = ShowState::new(&ShowConfig::default(), 0, Vec2::ONE);
        let mut surface = ManualSurface::new(Vec2::ONE);
        draw(&show, &mut surface);
        assert_eq!(surface.log().clears, 1);
        assert_eq!(surface.fills(), 0);
    }

    #[test]
    fn test_spent_sparks_not_drawn() {
        let mut show = ShowState::new(&ShowConfig::default(), 2, Vec2::new(800.0, 600.0));
        show.launch_firework(&FireworkCue::new(50.0, 50.0, 0));
        for _ in 0..55 {
            show.step();
        }
        // Burst still held, sparks alive only until step 56
        let mut surface = ManualSurface::new(Vec2::new(800.0, 600.0));
        draw(&show, &mut surface);
        assert_eq!(surface.fills(), 80);

        show.step();
        let mut surface = ManualSurface::new(Vec2::new(800.0, 600.0));
        draw(&show, &mut surface);
        assert_eq!(surface.fills(), 0);
    }
}
