//! Aim point resolution: camera ray → ground point inside the firing circle.

use crate::terrain::TerrainSource;
use crate::types::Vec3;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Ray {
    pub origin: Vec3,
    pub direction: Vec3,
}

impl Ray {
    pub fn new(origin: Vec3, direction: Vec3) -> Self {
        Self { origin, direction }
    }

    /// Intersection with the horizontal plane `y = ground_y`, if the ray
    /// points towards it.
    pub fn intersect_ground(&self, ground_y: f32) -> Option<Vec3> {
        let dy = self.direction.y;
        if dy.abs() <= f32::EPSILON {
            return None;
        }
        let t = (ground_y - self.origin.y) / dy;
        if t < 0.0 {
            return None;
        }
        Some(self.origin + self.direction * t)
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct AimSolution {
    /// Terrain point under the cursor.
    pub raw_point: Vec3,
    /// `raw_point` pulled back onto the max-range circle when out of range.
    pub clamped_point: Vec3,
    pub in_range: bool,
    /// XZ distance from the firer to `clamped_point`.
    pub distance: f32,
}

/// Resolve where a shot along `ray` should land.
///
/// The ray is intersected with a flat plane at the firer's height, then the
/// hit is lifted onto the terrain. Returns `None` when the ray never reaches
/// the plane.
pub fn resolve_aim(
    ray: &Ray,
    firer: Vec3,
    max_range: f32,
    terrain: &dyn TerrainSource,
) -> Option<AimSolution> {
    let mut raw = ray.intersect_ground(firer.y)?;
    raw.y = terrain.height_at(raw.x, raw.z);
    Some(clamp_to_range(raw, firer, max_range, terrain))
}

/// Clamp a ground point to the circle of `max_range` around `firer` (XZ).
pub fn clamp_to_range(
    point: Vec3,
    firer: Vec3,
    max_range: f32,
    terrain: &dyn TerrainSource,
) -> AimSolution {
    let distance = firer.horizontal_distance(&point);
    if distance <= max_range {
        return AimSolution {
            raw_point: point,
            clamped_point: point,
            in_range: true,
            distance,
        };
    }

    let scale = max_range / distance;
    let x = firer.x + (point.x - firer.x) * scale;
    let z = firer.z + (point.z - firer.z) * scale;
    AimSolution {
        raw_point: point,
        clamped_point: Vec3::new(x, terrain.height_at(x, z), z),
        in_range: false,
        distance: max_range,
    }
}
