//! Closed-form artillery trajectories.
//!
//! A flight's height is the sum of two separate vertical terms:
//!
//! ```text
//! y(t) = origin.y + vy·e − ½·g·e²      (physics, lands on target.y at e = duration)
//!      + 4·arc_height·t·(1 − t)        (cosmetic bump, zero at both ends)
//! ```
//!
//! with `e = t · duration` and `t ∈ [0, 1]`. Horizontal motion is linear.
//! Evaluation runs in `f64`, and `t = 0` / `t = 1` return the input points
//! verbatim.

use crate::types::{ArtilleryConfig, Vec3};
use serde::{Deserialize, Serialize};

/// Shortest flight, in seconds, regardless of distance.
pub const MIN_FLIGHT_DURATION: f32 = 0.3;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct TrajectoryConfig {
    /// Horizontal speed in world units per second.
    pub speed: f32,
    pub gravity: f32,
    pub arc_height_factor: f32,
    /// Number of segments; `sample_count + 1` points are precomputed.
    /// Zero is treated as one so both endpoints are always sampled.
    pub sample_count: usize,
}

impl From<&ArtilleryConfig> for TrajectoryConfig {
    fn from(cfg: &ArtilleryConfig) -> Self {
        Self {
            speed: cfg.projectile_speed,
            gravity: cfg.gravity,
            arc_height_factor: cfg.arc_height_factor,
            sample_count: cfg.trajectory_points,
        }
    }
}

impl Default for TrajectoryConfig {
    fn default() -> Self {
        Self::from(&ArtilleryConfig::default())
    }
}

/// A computed flight. Recompute rather than patch when inputs change.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Trajectory {
    pub origin: Vec3,
    pub target: Vec3,
    pub duration: f32,
    /// Positions at `t = i / sample_count` for `i` in `0..=sample_count`.
    pub points: Vec<Vec3>,
    /// Launch velocity of the physics term (without the arc bump).
    pub launch_velocity: Vec3,
    pub gravity: f32,
    pub arc_height: f32,
}

impl Trajectory {
    /// Position at normalized time `t` (not clamped).
    pub fn position_at(&self, t: f32) -> Vec3 {
        FlightParams::of(self).position_at(t as f64)
    }

    /// Seconds of flight covered at normalized time `t`.
    pub fn elapsed_at(&self, t: f32) -> f32 {
        t * self.duration
    }

    /// Height of the cosmetic term alone at normalized time `t`.
    pub fn arc_bump(&self, t: f32) -> f32 {
        arc_bump(self.arc_height as f64, t as f64) as f32
    }

    pub fn horizontal_distance(&self) -> f32 {
        self.origin.horizontal_distance(&self.target)
    }
}

// ---------------------------------------------------------------------------
// Strategy
// ---------------------------------------------------------------------------

/// How a weapon turns a firing solution into a flight path.
pub trait ShootingStrategy: Send + Sync {
    fn calculate_trajectory(&self, origin: Vec3, target: Vec3, config: &TrajectoryConfig)
        -> Trajectory;

    fn position_at(&self, trajectory: &Trajectory, t: f32) -> Vec3;
}

/// Artillery arc: linear horizontal travel, exact landing, cosmetic lift.
#[derive(Debug, Clone, Copy, Default)]
pub struct ParabolicStrategy;

impl ShootingStrategy for ParabolicStrategy {
    fn calculate_trajectory(
        &self,
        origin: Vec3,
        target: Vec3,
        config: &TrajectoryConfig,
    ) -> Trajectory {
        let horizontal_distance = origin.horizontal_distance(&target) as f64;
        // Rounded to the stored precision so `points` and `position_at` agree.
        let duration = ((horizontal_distance / config.speed as f64) as f32).max(MIN_FLIGHT_DURATION);
        let duration = duration as f64;
        let gravity = config.gravity as f64;

        let vx = (target.x as f64 - origin.x as f64) / duration;
        let vz = (target.z as f64 - origin.z as f64) / duration;
        let vy = vertical_launch_speed(origin.y as f64, target.y as f64, gravity, duration);
        let arc_height = (horizontal_distance * config.arc_height_factor as f64) as f32 as f64;

        let params = FlightParams {
            origin,
            target,
            velocity: [vx, vy, vz],
            gravity,
            duration,
            arc_height,
        };

        let n = config.sample_count.max(1);
        let points = (0..=n)
            .map(|i| params.position_at(i as f64 / n as f64))
            .collect();

        Trajectory {
            origin,
            target,
            duration: duration as f32,
            points,
            launch_velocity: Vec3::new(vx as f32, vy as f32, vz as f32),
            gravity: config.gravity,
            arc_height: arc_height as f32,
        }
    }

    fn position_at(&self, trajectory: &Trajectory, t: f32) -> Vec3 {
        trajectory.position_at(t)
    }
}

/// Compute a parabolic trajectory with the default strategy.
pub fn calculate_trajectory(origin: Vec3, target: Vec3, config: &TrajectoryConfig) -> Trajectory {
    ParabolicStrategy.calculate_trajectory(origin, target, config)
}

// ---------------------------------------------------------------------------
// Evaluation
// ---------------------------------------------------------------------------

/// Vertical speed so that `y(duration) == target_y` under gravity alone.
fn vertical_launch_speed(origin_y: f64, target_y: f64, gravity: f64, duration: f64) -> f64 {
    (target_y - origin_y + 0.5 * gravity * duration * duration) / duration
}

fn arc_bump(arc_height: f64, t: f64) -> f64 {
    4.0 * arc_height * t * (1.0 - t)
}

struct FlightParams {
    origin: Vec3,
    target: Vec3,
    velocity: [f64; 3],
    gravity: f64,
    duration: f64,
    arc_height: f64,
}

impl FlightParams {
    /// Rebuild the double-precision parameters from a stored trajectory.
    fn of(trajectory: &Trajectory) -> Self {
        let duration = trajectory.duration as f64;
        let gravity = trajectory.gravity as f64;
        let (o, t) = (trajectory.origin, trajectory.target);
        Self {
            origin: o,
            target: t,
            velocity: [
                (t.x as f64 - o.x as f64) / duration,
                vertical_launch_speed(o.y as f64, t.y as f64, gravity, duration),
                (t.z as f64 - o.z as f64) / duration,
            ],
            gravity,
            duration,
            arc_height: trajectory.arc_height as f64,
        }
    }

    fn position_at(&self, t: f64) -> Vec3 {
        // Residual rounding would otherwise leave tiny non-zero offsets.
        if t == 0.0 {
            return self.origin;
        }
        if t == 1.0 {
            return self.target;
        }
        let e = t * self.duration;
        let [vx, vy, vz] = self.velocity;
        let physics_y = self.origin.y as f64 + vy * e - 0.5 * self.gravity * e * e;
        Vec3::new(
            (self.origin.x as f64 + vx * e) as f32,
            (physics_y + arc_bump(self.arc_height, t)) as f32,
            (self.origin.z as f64 + vz * e) as f32,
        )
    }
}
