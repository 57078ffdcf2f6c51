//! Circle-circle tests on the XZ plane.
//!
//! The generator and every runtime check go through [`circles_overlap`], so
//! placement and gameplay agree on what "touching" means.

use crate::types::{Obstacle, Vec3};

/// `true` when two horizontal circles intersect: `distance < ra + rb`.
pub fn circles_overlap(a: Vec3, radius_a: f32, b: Vec3, radius_b: f32) -> bool {
    a.horizontal_distance(&b) < radius_a + radius_b
}

/// First collidable obstacle a circle at `position` would touch.
pub fn first_blocking<'a, I>(position: Vec3, radius: f32, obstacles: I) -> Option<&'a Obstacle>
where
    I: IntoIterator<Item = &'a Obstacle>,
{
    obstacles.into_iter().find(|obs| {
        obs.collidable && circles_overlap(position, radius, obs.position, obs.collision_radius)
    })
}
