//! Confetti and firework particles
//!
//! All constants are per physics step (see `consts::STEP_MS`).

use glam::Vec2;
use rand::Rng;
use rand::seq::IndexedRandom;
use std::f32::consts::TAU;

use crate::config::{ConfettiConfig, FireworkConfig};
use crate::consts::*;

/// Confetti piece outline
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfettiShape {
    Rect,
    Circle,
    Star,
    Heart,
}

pub const SHAPES: [ConfettiShape; 4] = [
    ConfettiShape::Rect,
    ConfettiShape::Circle,
    ConfettiShape::Star,
    ConfettiShape::Heart,
];

/// A single confetti piece
#[derive(Debug, Clone)]
pub struct ConfettiPiece {
    pub id: u32,
    pub pos: Vec2,
    pub vel: Vec2,
    pub color: String,
    pub size: f32,
    pub shape: ConfettiShape,
    /// Degrees
    pub rotation: f32,
    /// Degrees per step
    pub spin: f32,
}

impl ConfettiPiece {
    pub fn step(&mut self) {
        self.vel.y += CONFETTI_GRAVITY;
        self.vel.x *= CONFETTI_DRAG_X;
        self.vel.y *= CONFETTI_DRAG_Y;
        self.pos += self.vel;
        self.rotation += self.spin;
    }

    /// Still above the removal line for a canvas of this height
    pub fn on_screen(&self, height: f32) -> bool {
        self.pos.y < height + CONFETTI_FLOOR_MARGIN
    }
}

/// One firework spark
#[derive(Debug, Clone, Copy)]
pub struct Spark {
    pub pos: Vec2,
    pub vel: Vec2,
    pub life: f32,
}

impl Spark {
    pub fn step(&mut self) {
        self.pos += self.vel;
        self.vel.y += FIREWORK_GRAVITY;
        self.life -= FIREWORK_DECAY;
    }

    pub fn is_alive(&self) -> bool {
        self.life > 0.0
    }

    /// Draw opacity, 1.0 at launch fading to 0.0
    pub fn alpha(&self) -> f32 {
        (self.life / FIREWORK_LIFE).clamp(0.0, 1.0)
    }
}

/// A firework: sparks radiating from one point in one color
#[derive(Debug, Clone)]
pub struct FireworkBurst {
    pub id: u32,
    pub center: Vec2,
    pub color: String,
    pub sparks: Vec<Spark>,
}

impl FireworkBurst {
    /// Advance every spark. Returns whether any spark is still alive.
    pub fn step(&mut self) -> bool {
        let mut alive = false;
        for spark in &mut self.sparks {
            spark.step();
            alive |= spark.is_alive();
        }
        alive
    }

    pub fn is_alive(&self) -> bool {
        self.sparks.iter().any(Spark::is_alive)
    }
}

/// Uniform sample in `[range[0], range[1])`
fn sample(rng: &mut impl Rng, range: [f32; 2]) -> f32 {
    range[0] + rng.random::<f32>() * (range[1] - range[0])
}

fn pick_color(rng: &mut impl Rng, palette: &[String]) -> String {
    palette.choose(rng).cloned().unwrap_or_else(|| "#FFFFFF".to_string())
}

/// Fire the confetti cannon from `origin`, spreading pieces evenly by angle
pub fn confetti_burst(
    rng: &mut impl Rng,
    config: &ConfettiConfig,
    origin: Vec2,
    first_id: u32,
) -> Vec<ConfettiPiece> {
    let count = config.per_burst;
    (0..count)
        .map(|i| {
            let angle = TAU * i as f32 / count as f32;
            let speed = sample(rng, config.speed);
            let vel = Vec2::new(
                angle.cos() * speed,
                -speed + rng.random::<f32>() * config.lift,
            );
            ConfettiPiece {
                id: first_id.wrapping_add(i as u32),
                pos: origin,
                vel,
                color: pick_color(rng, &config.palette),
                size: sample(rng, config.size),
                shape: SHAPES.choose(rng).copied().unwrap_or(ConfettiShape::Rect),
                rotation: rng.random::<f32>() * 360.0,
                spin: (rng.random::<f32>() - 0.5) * config.spin,
            }
        })
        .collect()
}

/// Burst a firework at `center` with sparks in every direction
pub fn firework_burst(
    rng: &mut impl Rng,
    config: &FireworkConfig,
    center: Vec2,
    id: u32,
) -> FireworkBurst {
    let count = config.per_burst;
    let color = pick_color(rng, &config.palette);
    let sparks = (0..count)
        .map(|i| {
            let angle = TAU * i as f32 / count as f32;
            let speed = sample(rng, config.speed);
            Spark {
                pos: center,
                vel: Vec2::new(angle.cos(), angle.sin()) * speed,
                life: FIREWORK_LIFE,
            }
        })
        .collect();

    FireworkBurst {
        id,
        center,
        color,
        sparks,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    #[test]
    fn test_confetti_burst_shape() {
        let mut rng = Pcg32::seed_from_u64(7);
        let config = ConfettiConfig::default();
        let origin = Vec2::new(640.0, 720.0);
        let pieces = confetti_burst(&mut rng, &config, origin, 100);

        assert_eq!(pieces.len(), config.per_burst);
        assert_eq!(pieces[0].id, 100);
        for piece in &pieces {
            assert_eq!(piece.pos, origin);
            assert!((10.0..28.0).contains(&piece.size));
            assert!((0.0..360.0).contains(&piece.rotation));
            assert!(piece.spin.abs() <= 12.5);
            assert!(config.palette.contains(&piece.color));
            // Launch speed is at least 10, lift at most 8: always upward
            assert!(piece.vel.y < 0.0);
        }
    }

    #[test]
    fn test_confetti_falls_and_drifts() {
        let mut piece = ConfettiPiece {
            id: 0,
            pos: Vec2::ZERO,
            vel: Vec2::new(10.0, -20.0),
            color: "#FFD700".into(),
            size: 12.0,
            shape: ConfettiShape::Star,
            rotation: 0.0,
            spin: 5.0,
        };
        piece.step();
        assert!((piece.vel.x - 9.8).abs() < 1e-4);
        assert!((piece.vel.y - (-20.0 + 0.35) * 0.99).abs() < 1e-4);
        assert_eq!(piece.rotation, 5.0);

        for _ in 0..500 {
            piece.step();
        }
        assert!(!piece.on_screen(720.0));
    }

    #[test]
    fn test_firework_sparks_radiate_and_fade() {
        let mut rng = Pcg32::seed_from_u64(3);
        let config = FireworkConfig::default();
        let center = Vec2::new(320.0, 144.0);
        let mut burst = firework_burst(&mut rng, &config, center, 1);

        assert_eq!(burst.sparks.len(), config.per_burst);
        assert!(config.palette.contains(&burst.color));
        for spark in &burst.sparks {
            let speed = spark.vel.length();
            assert!((4.0 - 1e-3..10.0 + 1e-3).contains(&speed));
            assert_eq!(spark.alpha(), 1.0);
        }

        // Alpha tracks remaining life: 100 - 25 * 1.8 = 55
        for _ in 0..25 {
            assert!(burst.step());
        }
        for spark in &burst.sparks {
            assert!((spark.life - 55.0).abs() < 1e-3);
            assert!((spark.alpha() - spark.life / 100.0).abs() < 1e-6);
            assert!((spark.alpha() - 0.55).abs() < 1e-3);
        }

        // 100 / 1.8 -> 56 steps until every spark is spent
        for _ in 25..55 {
            assert!(burst.step());
        }
        assert!(!burst.step());
        assert!(!burst.is_alive());
    }
}
