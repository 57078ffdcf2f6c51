//! Settings loading and validation tests

#[cfg(test)]
mod tests {
    use dune_world::settings::{Settings, SettingsError};
    use std::path::PathBuf;

    /// TOML file in the temp dir, deleted on drop even if the test fails.
    struct TempToml(PathBuf);

    impl Drop for TempToml {
        fn drop(&mut self) {
            std::fs::remove_file(&self.0).ok();
        }
    }

    fn write_temp(name: &str, contents: &str) -> TempToml {
        let path = std::env::temp_dir().join(format!(
            "dune-world-{}-{}.toml",
            name,
            std::process::id()
        ));
        std::fs::write(&path, contents).unwrap();
        TempToml(path)
    }

    #[test]
    fn defaults_are_valid() {
        let settings = Settings::default();
        assert!(settings.validate().is_ok());
        assert_eq!(settings.world.world_seed, 42);
        assert_eq!(settings.world.view_distance, 1);
        assert_eq!(settings.world.chunk_size, 100.0);
        assert_eq!(settings.artillery.max_range, 50.0);
        assert_eq!(settings.agent.tick_rate_hz, 30.0);
    }

    #[test]
    fn file_overrides_defaults_per_field() {
        let file = write_temp(
            "override",
            r#"
[world]
world_seed = 7
view_distance = 2

[artillery]
projectile_speed = 30.0

[agent]
session = "dunes"
"#,
        );
        let settings = Settings::load(Some(&file.0)).unwrap();

        assert_eq!(settings.world.world_seed, 7);
        assert_eq!(settings.world.view_distance, 2);
        assert_eq!(settings.world.chunk_size, 100.0);
        assert_eq!(settings.artillery.projectile_speed, 30.0);
        assert_eq!(settings.artillery.gravity, 9.8);
        assert_eq!(settings.agent.session, "dunes");
    }

    #[test]
    fn invalid_file_values_are_rejected() {
        let file = write_temp(
            "invalid",
            r#"
[world]
view_distance = -1
"#,
        );
        let result = Settings::load(Some(&file.0));
        assert!(matches!(result, Err(SettingsError::Invalid(_))));
    }

    #[test]
    fn missing_file_is_a_load_error() {
        let path = std::env::temp_dir().join("dune-world-does-not-exist.toml");
        assert!(!path.exists());
        assert!(matches!(
            Settings::load(Some(&path)),
            Err(SettingsError::Load(_))
        ));
    }

    #[test]
    fn validation_catches_bad_values() {
        let mut s = Settings::default();
        s.world.chunk_size = 0.0;
        assert!(s.validate().is_err());

        let mut s = Settings::default();
        s.artillery.projectile_speed = f32::NAN;
        assert!(s.validate().is_err());

        let mut s = Settings::default();
        s.artillery.trajectory_points = 0;
        assert!(s.validate().is_err());

        let mut s = Settings::default();
        s.artillery.splash_radius = -1.0;
        assert!(s.validate().is_err());

        let mut s = Settings::default();
        s.agent.tick_rate_hz = 0.0;
        let err = s.validate().unwrap_err();
        assert!(err.to_string().contains("tick_rate_hz"));
    }

    #[test]
    fn temp_files_are_removed() {
        let path = {
            let file = write_temp("cleanup", "[world]\nworld_seed = 1\n");
            assert!(file.0.exists());
            file.0.clone()
        };
        assert!(!path.exists());
    }

    #[test]
    fn view_distance_zero_is_allowed() {
        let mut s = Settings::default();
        s.world.view_distance = 0;
        assert!(s.validate().is_ok());
    }
}
