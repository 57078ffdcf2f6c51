//! In-flight projectiles: per-frame advance along a [`Trajectory`], ground
//! impact against the height field, and splash hit selection.

use crate::ballistics::Trajectory;
use crate::terrain::TerrainSource;
use crate::types::{Target, Vec3};

/// Outcome of advancing a projectile by one frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ProjectileStep {
    InFlight { position: Vec3 },
    /// Reported exactly once per projectile.
    Impact { point: Vec3 },
    /// The projectile already exploded on an earlier frame.
    Spent,
}

#[derive(Debug, Clone)]
pub struct Projectile {
    pub id: u64,
    pub trajectory: Trajectory,
    /// Normalized flight time in `[0, 1]`.
    pub progress: f32,
    exploded: bool,
}

impl Projectile {
    pub fn new(id: u64, trajectory: Trajectory) -> Self {
        Self {
            id,
            trajectory,
            progress: 0.0,
            exploded: false,
        }
    }

    pub fn is_spent(&self) -> bool {
        self.exploded
    }

    /// Advance by `dt` seconds.
    ///
    /// The flight ends at the trajectory target once `progress >= 1`, or
    /// earlier when the sampled point is at or below the terrain; in that case
    /// the impact is snapped to the ground.
    pub fn advance(&mut self, dt: f32, terrain: &dyn TerrainSource) -> ProjectileStep {
        if self.exploded {
            return ProjectileStep::Spent;
        }

        self.progress += dt / self.trajectory.duration;
        if self.progress >= 1.0 {
            self.progress = 1.0;
            self.exploded = true;
            return ProjectileStep::Impact {
                point: self.trajectory.target,
            };
        }

        let mut position = self.trajectory.position_at(self.progress);
        let ground = terrain.height_at(position.x, position.z);
        if position.y <= ground {
            position.y = ground;
            self.exploded = true;
            return ProjectileStep::Impact { point: position };
        }

        ProjectileStep::InFlight { position }
    }
}

/// Targets whose XZ distance to `impact` is within `splash_radius`.
pub fn targets_in_splash<'a, I>(impact: Vec3, splash_radius: f32, targets: I) -> Vec<&'a Target>
where
    I: IntoIterator<Item = &'a Target>,
{
    targets
        .into_iter()
        .filter(|t| t.position.horizontal_distance(&impact) <= splash_radius)
        .collect()
}
