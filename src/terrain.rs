//! Terrain subsystem: the `TerrainSource` height-field contract and the
//! seeded dune heightmap every other subsystem samples.

use crate::types::Vec3;
use noise::{NoiseFn, Simplex};

// ---------------------------------------------------------------------------
// Trait
// ---------------------------------------------------------------------------

/// Step used for finite-difference normals.
pub const NORMAL_DELTA: f32 = 0.1;

/// Anything that can provide a terrain height and surface normal.
///
/// Implementations must be pure and continuous across chunk boundaries.
pub trait TerrainSource: Send + Sync {
    fn height_at(&self, x: f32, z: f32) -> f32;

    /// Unit surface normal from symmetric finite differences of `height_at`.
    fn normal_at(&self, x: f32, z: f32) -> Vec3 {
        let d = NORMAL_DELTA;
        let h_l = self.height_at(x - d, z);
        let h_r = self.height_at(x + d, z);
        let h_d = self.height_at(x, z - d);
        let h_u = self.height_at(x, z + d);
        Vec3::new(h_l - h_r, 2.0 * d, h_d - h_u).normalize_or_up()
    }
}

// ---------------------------------------------------------------------------
// Dune terrain
// ---------------------------------------------------------------------------

/// Layered simplex heightmap: broad dunes plus fine surface ripples.
pub struct DuneTerrain {
    pub seed: u64,
    noise: Simplex,
}

impl DuneTerrain {
    pub const DUNE_FREQUENCY: f64 = 0.015;
    pub const DUNE_AMPLITUDE: f64 = 8.0;
    pub const DETAIL_FREQUENCY: f64 = 0.05;
    pub const DETAIL_AMPLITUDE: f64 = 1.5;

    pub fn new(seed: u64) -> Self {
        Self {
            seed,
            noise: Simplex::new(fold_seed(seed)),
        }
    }

    /// Upper bound on `|height_at|`.
    pub fn max_amplitude() -> f32 {
        (Self::DUNE_AMPLITUDE + Self::DETAIL_AMPLITUDE) as f32
    }
}

impl TerrainSource for DuneTerrain {
    fn height_at(&self, x: f32, z: f32) -> f32 {
        let (x, z) = (x as f64, z as f64);
        let dunes = self
            .noise
            .get([x * Self::DUNE_FREQUENCY, z * Self::DUNE_FREQUENCY])
            * Self::DUNE_AMPLITUDE;
        let detail = self
            .noise
            .get([x * Self::DETAIL_FREQUENCY, z * Self::DETAIL_FREQUENCY])
            * Self::DETAIL_AMPLITUDE;
        (dunes + detail) as f32
    }
}

/// Fold a 64-bit world seed into the 32-bit seed the noise crate takes.
fn fold_seed(seed: u64) -> u32 {
    (seed ^ (seed >> 32)) as u32
}

// ---------------------------------------------------------------------------
// Flat terrain
// ---------------------------------------------------------------------------

/// Constant-height ground, handy for tests and debug sessions.
#[derive(Debug, Clone, Copy, Default)]
pub struct FlatTerrain {
    pub height: f32,
}

impl FlatTerrain {
    pub fn new(height: f32) -> Self {
        Self { height }
    }
}

impl TerrainSource for FlatTerrain {
    fn height_at(&self, _x: f32, _z: f32) -> f32 {
        self.height
    }
}
