//! ChunkGenerator tests

#[cfg(test)]
mod tests {
    use dune_world::generator::{
        chunk_seed_base, generate_chunk, ChunkGenerator, MIN_OBSTACLES, MIN_TARGETS,
        OBSTACLE_DEAD_ZONE, OBSTACLE_SPREAD, TARGET_DEAD_ZONE, TARGET_OBSTACLE_CLEARANCE,
        TARGET_SPREAD,
    };
    use dune_world::types::{ChunkCoord, ChunkData, ObstacleKind, Target, Vec3, CHUNK_SIZE};
    use proptest::prelude::*;
    use std::collections::HashSet;

    fn assert_no_forbidden_overlap(chunk: &ChunkData) {
        for (i, a) in chunk.obstacles.iter().enumerate() {
            for b in &chunk.obstacles[i + 1..] {
                if a.kind == ObstacleKind::Rock && b.kind == ObstacleKind::Rock {
                    continue;
                }
                let d = a.position.horizontal_distance(&b.position);
                assert!(
                    d >= a.collision_radius + b.collision_radius,
                    "{} and {} overlap ({} < {})",
                    a.id,
                    b.id,
                    d,
                    a.collision_radius + b.collision_radius
                );
            }
        }
    }

    fn assert_target_clearance(chunk: &ChunkData) {
        for t in &chunk.targets {
            for o in &chunk.obstacles {
                let d = t.position.horizontal_distance(&o.position);
                assert!(
                    d >= Target::RADIUS + TARGET_OBSTACLE_CLEARANCE + o.collision_radius,
                    "{} too close to {}",
                    t.id,
                    o.id
                );
            }
        }
    }

    // -----------------------------------------------------------------------
    // Determinism
    // -----------------------------------------------------------------------

    #[test]
    fn origin_chunk_is_reproducible_as_json() {
        let a = serde_json::to_string(&generate_chunk(0, 0, 42)).unwrap();
        let b = serde_json::to_string(&generate_chunk(0, 0, 42)).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn different_world_seeds_differ() {
        assert_ne!(generate_chunk(3, -2, 1), generate_chunk(3, -2, 2));
    }

    #[test]
    fn neighbouring_chunks_differ() {
        let a = generate_chunk(1, 0, 42);
        let b = generate_chunk(0, 1, 42);
        let c = generate_chunk(-1, 0, 42);
        assert_ne!(a.obstacles, b.obstacles);
        assert_ne!(a.obstacles, c.obstacles);
    }

    #[test]
    fn seed_base_depends_on_every_input() {
        let base = chunk_seed_base(4, 9, 100);
        assert_ne!(base, chunk_seed_base(5, 9, 100));
        assert_ne!(base, chunk_seed_base(4, 8, 100));
        assert_ne!(base, chunk_seed_base(4, 9, 101));
    }

    // -----------------------------------------------------------------------
    // Layout
    // -----------------------------------------------------------------------

    #[test]
    fn chunk_identity_fields() {
        let chunk = generate_chunk(-3, 5, 42);
        assert_eq!(chunk.key, "-3,5");
        assert_eq!(chunk.coord(), ChunkCoord::new(-3, 5));
    }

    #[test]
    fn counts_never_exceed_nominal_density() {
        for cx in -3..=3 {
            for cz in -3..=3 {
                let chunk = generate_chunk(cx, cz, 42);
                // Under-filled chunks are valid; only the upper bound is firm.
                assert!(chunk.obstacles.len() < MIN_OBSTACLES + OBSTACLE_SPREAD);
                assert!(chunk.targets.len() < MIN_TARGETS + TARGET_SPREAD);
            }
        }
    }

    #[test]
    fn entities_stay_inside_their_chunk() {
        let coord = ChunkCoord::new(2, -1);
        let chunk = ChunkGenerator::new(42, CHUNK_SIZE).generate(coord);
        let centre = coord.center(CHUNK_SIZE);
        let half = CHUNK_SIZE / 2.0;
        let positions = chunk
            .obstacles
            .iter()
            .map(|o| o.position)
            .chain(chunk.targets.iter().map(|t| t.position));
        for p in positions {
            assert!((p.x - centre.x).abs() <= half);
            assert!((p.z - centre.z).abs() <= half);
            assert_eq!(p.y, 0.0);
        }
    }

    #[test]
    fn ids_are_unique_across_chunks() {
        let mut seen = HashSet::new();
        for cx in -1..=1 {
            for cz in -1..=1 {
                let chunk = generate_chunk(cx, cz, 9);
                for id in chunk
                    .obstacles
                    .iter()
                    .map(|o| o.id.clone())
                    .chain(chunk.targets.iter().map(|t| t.id.clone()))
                {
                    assert!(seen.insert(id.clone()), "duplicate id {}", id);
                }
            }
        }
    }

    #[test]
    fn origin_chunk_keeps_spawn_area_clear() {
        for seed in 0..20u64 {
            let chunk = generate_chunk(0, 0, seed);
            for o in &chunk.obstacles {
                assert!(o.position.horizontal_distance(&Vec3::zero()) >= OBSTACLE_DEAD_ZONE);
            }
            for t in &chunk.targets {
                assert!(t.position.horizontal_distance(&Vec3::zero()) >= TARGET_DEAD_ZONE);
            }
        }
    }

    #[test]
    fn radii_and_scales_follow_kind() {
        let chunk = generate_chunk(4, 4, 1234);
        for o in &chunk.obstacles {
            assert!(o.collision_radius >= 0.0);
            match o.kind {
                ObstacleKind::Cactus => {
                    assert_eq!(o.collision_radius, 1.0);
                    assert_eq!(o.scale.x, o.scale.y);
                    assert!(o.collidable);
                }
                ObstacleKind::Rock => {
                    assert_eq!(o.collision_radius, o.scale.x.max(o.scale.z));
                }
                ObstacleKind::Scrap => {
                    assert!(o.collidable);
                    assert!(o.collision_radius > 0.0);
                }
            }
        }
    }

    #[test]
    fn targets_keep_mutual_spacing() {
        for seed in 0..20u64 {
            let chunk = generate_chunk(1, 1, seed);
            for (i, a) in chunk.targets.iter().enumerate() {
                for b in &chunk.targets[i + 1..] {
                    assert!(a.position.horizontal_distance(&b.position) >= 2.0 * Target::RADIUS + 2.0);
                }
            }
        }
    }

    // -----------------------------------------------------------------------
    // Properties
    // -----------------------------------------------------------------------

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(64))]

        #[test]
        fn generation_is_deterministic(seed in any::<u64>(), cx in -500i32..500, cz in -500i32..500) {
            prop_assert_eq!(generate_chunk(cx, cz, seed), generate_chunk(cx, cz, seed));
        }

        #[test]
        fn no_forbidden_overlap(seed in any::<u64>(), cx in -50i32..50, cz in -50i32..50) {
            assert_no_forbidden_overlap(&generate_chunk(cx, cz, seed));
        }

        #[test]
        fn targets_clear_obstacles(seed in any::<u64>(), cx in -50i32..50, cz in -50i32..50) {
            assert_target_clearance(&generate_chunk(cx, cz, seed));
        }
    }
}
