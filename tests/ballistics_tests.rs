//! Trajectory engine tests

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;
    use dune_world::ballistics::{
        calculate_trajectory, ParabolicStrategy, ShootingStrategy, TrajectoryConfig,
        MIN_FLIGHT_DURATION,
    };
    use dune_world::types::Vec3;
    use proptest::prelude::*;

    fn scenario_config() -> TrajectoryConfig {
        TrajectoryConfig {
            speed: 15.0,
            gravity: 9.8,
            arc_height_factor: 1.8,
            sample_count: 30,
        }
    }

    fn assert_close(a: Vec3, b: Vec3, eps: f32) {
        assert!(
            (a.x - b.x).abs() <= eps && (a.y - b.y).abs() <= eps && (a.z - b.z).abs() <= eps,
            "{} != {}",
            a,
            b
        );
    }

    // -----------------------------------------------------------------------
    // Reference scenario
    // -----------------------------------------------------------------------

    #[test]
    fn ten_unit_shot_matches_closed_form() {
        let origin = Vec3::zero();
        let target = Vec3::new(10.0, 0.0, 0.0);
        let traj = calculate_trajectory(origin, target, &scenario_config());

        assert_relative_eq!(traj.duration, 10.0 / 15.0, epsilon = 1e-6);
        assert_eq!(traj.points.len(), 31);
        assert_relative_eq!(traj.arc_height, 18.0, epsilon = 1e-5);
        assert_eq!(traj.points[0], origin);
        assert_eq!(traj.points[30], target);

        // Midpoint: full arc bump plus the ballistic apex g·d²/8.
        let d = traj.duration;
        let ballistic = 9.8 * d * d / 8.0;
        let mid = traj.points[15];
        assert_relative_eq!(mid.x, 5.0, epsilon = 1e-5);
        assert_relative_eq!(mid.y, 18.0 + ballistic, epsilon = 1e-4);
        assert_relative_eq!(mid.z, 0.0);
    }

    #[test]
    fn launch_velocity_lands_on_target_height() {
        let origin = Vec3::new(0.0, 2.0, 0.0);
        let target = Vec3::new(30.0, -4.0, 40.0);
        let cfg = scenario_config();
        let traj = calculate_trajectory(origin, target, &cfg);

        let d = traj.duration;
        let v = traj.launch_velocity;
        assert_relative_eq!(v.x * d, 30.0, epsilon = 1e-4);
        assert_relative_eq!(v.z * d, 40.0, epsilon = 1e-4);
        let y = origin.y + v.y * d - 0.5 * cfg.gravity * d * d;
        assert_relative_eq!(y, target.y, epsilon = 1e-3);
    }

    // -----------------------------------------------------------------------
    // Edge cases
    // -----------------------------------------------------------------------

    #[test]
    fn vertical_shot_uses_duration_floor() {
        let origin = Vec3::new(5.0, 10.0, 5.0);
        let target = Vec3::new(5.0, 0.0, 5.0);
        let traj = calculate_trajectory(origin, target, &scenario_config());

        assert_eq!(traj.duration, MIN_FLIGHT_DURATION);
        assert_eq!(traj.arc_height, 0.0);
        assert_eq!(traj.position_at(0.0), origin);
        assert_eq!(traj.position_at(1.0), target);
        for p in &traj.points {
            assert_eq!(p.x, 5.0);
            assert_eq!(p.z, 5.0);
        }
    }

    #[test]
    fn close_target_uses_duration_floor() {
        let traj = calculate_trajectory(
            Vec3::zero(),
            Vec3::new(1.0, 0.0, 0.0),
            &scenario_config(),
        );
        assert_eq!(traj.duration, MIN_FLIGHT_DURATION);
    }

    #[test]
    fn arc_bump_shape() {
        let traj = calculate_trajectory(
            Vec3::zero(),
            Vec3::new(0.0, 0.0, 20.0),
            &scenario_config(),
        );
        assert_eq!(traj.arc_bump(0.0), 0.0);
        assert_eq!(traj.arc_bump(1.0), 0.0);
        assert_relative_eq!(traj.arc_bump(0.5), traj.arc_height, epsilon = 1e-5);
        assert!(traj.arc_bump(0.25) < traj.arc_height);
    }

    #[test]
    fn zero_arc_factor_is_pure_ballistics() {
        let cfg = TrajectoryConfig {
            arc_height_factor: 0.0,
            ..scenario_config()
        };
        let traj = calculate_trajectory(Vec3::zero(), Vec3::new(15.0, 0.0, 0.0), &cfg);
        let mid = traj.position_at(0.5);
        let half = traj.duration / 2.0;
        let v = traj.launch_velocity;
        assert_relative_eq!(mid.y, v.y * half - 0.5 * 9.8 * half * half, epsilon = 1e-4);
    }

    #[test]
    fn samples_agree_with_position_at() {
        let traj = calculate_trajectory(
            Vec3::new(-12.0, 3.0, 7.0),
            Vec3::new(25.0, -1.0, -33.0),
            &scenario_config(),
        );
        let n = traj.points.len() - 1;
        for (i, p) in traj.points.iter().enumerate() {
            assert_close(*p, traj.position_at(i as f32 / n as f32), 1e-4);
        }
    }

    #[test]
    fn strategy_trait_matches_free_function() {
        let strategy: &dyn ShootingStrategy = &ParabolicStrategy;
        let cfg = scenario_config();
        let a = strategy.calculate_trajectory(Vec3::zero(), Vec3::new(8.0, 1.0, 3.0), &cfg);
        let b = calculate_trajectory(Vec3::zero(), Vec3::new(8.0, 1.0, 3.0), &cfg);
        assert_eq!(a, b);
        assert_eq!(strategy.position_at(&a, 0.3), b.position_at(0.3));
    }

    #[test]
    fn zero_sample_count_still_keeps_both_endpoints() {
        let cfg = TrajectoryConfig {
            sample_count: 0,
            ..scenario_config()
        };
        let target = Vec3::new(10.0, 0.0, 0.0);
        let traj = calculate_trajectory(Vec3::zero(), target, &cfg);
        assert_eq!(traj.points, vec![Vec3::zero(), target]);
    }

    #[test]
    fn out_of_range_target_is_still_computed() {
        let traj = calculate_trajectory(
            Vec3::zero(),
            Vec3::new(5_000.0, 0.0, 0.0),
            &TrajectoryConfig::default(),
        );
        assert!(traj.duration > 100.0);
        assert_eq!(traj.position_at(1.0), Vec3::new(5_000.0, 0.0, 0.0));
    }

    // -----------------------------------------------------------------------
    // Properties
    // -----------------------------------------------------------------------

    fn coord() -> impl Strategy<Value = f32> {
        -500.0f32..500.0
    }

    proptest! {
        #[test]
        fn endpoints_are_exact(
            ox in coord(), oy in -20.0f32..20.0, oz in coord(),
            tx in coord(), ty in -20.0f32..20.0, tz in coord(),
            speed in 1.0f32..80.0, gravity in 0.0f32..30.0, arc in 0.0f32..3.0,
            samples in 1usize..64,
        ) {
            let origin = Vec3::new(ox, oy, oz);
            let target = Vec3::new(tx, ty, tz);
            let cfg = TrajectoryConfig { speed, gravity, arc_height_factor: arc, sample_count: samples };
            let traj = calculate_trajectory(origin, target, &cfg);

            prop_assert!(traj.duration >= MIN_FLIGHT_DURATION);
            prop_assert_eq!(traj.points.len(), samples + 1);
            assert_close(traj.position_at(0.0), origin, 1e-6);
            assert_close(traj.position_at(1.0), target, 1e-6);
            assert_close(traj.points[0], origin, 1e-6);
            assert_close(traj.points[samples], target, 1e-6);
        }
    }
}
