use sink_rotator::config::DEFAULT_EXCLUDED_SINKS;
use sink_rotator::{ConfigLoader, MockFileSystem, StandardFileSystem};
use std::path::PathBuf;
use std::time::Duration;

/// Integration tests for ConfigLoader against the mock and the real file system

#[cfg(test)]
mod mock_filesystem {
    use super::*;

    #[test]
    fn test_config_loading_with_mock_filesystem() {
        let file_system = MockFileSystem::new();
        let config_path = PathBuf::from("/test/config.toml");

        let config_content = r#"
[general]
log_level = "info"
timeout_ms = 1500
log_to_file = true

[rotation]
excluded_sinks = [
    "alsa_output.pci-0000_01_00.1.hdmi-stereo",
    "bluez_sink.00_11_22_33_44_55.a2dp_sink",
]
"#;
        file_system.add_file(&config_path, config_content.to_string());

        let config_loader = ConfigLoader::new(file_system.clone(), config_path.clone());
        let config = config_loader.load_config().unwrap();

        assert_eq!(config.general.log_level, "info");
        assert_eq!(config.general.timeout(), Some(Duration::from_millis(1500)));
        assert!(config.general.log_to_file);
        assert!(!config.general.json_logs);

        let exclusions = config.exclusion_set();
        assert_eq!(exclusions.len(), 2);
        assert!(exclusions.contains("bluez_sink.00_11_22_33_44_55.a2dp_sink"));
        assert!(!exclusions.contains(DEFAULT_EXCLUDED_SINKS[0]));

        let read_calls = file_system.get_read_calls();
        assert_eq!(read_calls, vec![config_path]);
        assert!(file_system.get_write_calls().is_empty());
    }

    #[test]
    fn test_read_failure_is_reported() {
        let file_system = MockFileSystem::new();
        let config_path = PathBuf::from("/test/config.toml");
        file_system.add_file(&config_path, String::new());
        file_system.set_read_failure(true);

        let config_loader = ConfigLoader::new(file_system, config_path);
        let err = config_loader.load_config().unwrap_err();

        assert!(err.to_string().contains("Failed to read configuration file"));
    }

    #[test]
    fn test_malformed_toml_is_reported() {
        let file_system = MockFileSystem::new();
        let config_path = PathBuf::from("/test/config.toml");
        file_system.add_file(&config_path, "[rotation]\nexcluded_sinks = \"not a list\"\n".to_string());

        let config_loader = ConfigLoader::new(file_system, config_path);
        let err = config_loader.load_config().unwrap_err();

        assert!(err.to_string().contains("Failed to parse configuration file"));
    }

    #[test]
    fn test_missing_config_leaves_no_trace() {
        let file_system = MockFileSystem::new();
        let config_path = PathBuf::from("/home/user/.config/sink-rotator/config.toml");

        let config_loader = ConfigLoader::new(file_system.clone(), config_path);
        let config = config_loader.load_config().unwrap();

        assert!(config.exclusion_set().contains(DEFAULT_EXCLUDED_SINKS[0]));
        assert!(file_system.get_directory_creation_calls().is_empty());
        assert!(file_system.get_write_calls().is_empty());
        assert!(file_system.get_read_calls().is_empty());
    }

    #[test]
    fn test_write_default_config_creates_directory() {
        let file_system = MockFileSystem::new();
        let config_path = PathBuf::from("/home/user/.config/sink-rotator/config.toml");

        let config_loader = ConfigLoader::new(file_system.clone(), config_path);
        config_loader.write_default_config().unwrap();

        assert_eq!(
            file_system.get_directory_creation_calls(),
            vec![PathBuf::from("/home/user/.config/sink-rotator")]
        );
        assert_eq!(file_system.get_write_calls().len(), 1);
    }

    #[test]
    fn test_write_default_config_refuses_existing_file() {
        let file_system = MockFileSystem::new();
        let config_path = PathBuf::from("/test/config.toml");
        file_system.add_file(&config_path, "[general]\n".to_string());

        let config_loader = ConfigLoader::new(file_system.clone(), config_path);
        let err = config_loader.write_default_config().unwrap_err();

        assert!(err.to_string().contains("already exists"));
        assert!(file_system.get_write_calls().is_empty());
    }

    #[test]
    fn test_write_failure_is_reported() {
        let file_system = MockFileSystem::new();
        file_system.set_write_failure(true);

        let config_loader =
            ConfigLoader::new(file_system.clone(), PathBuf::from("/test/config.toml"));
        let err = config_loader.write_default_config().unwrap_err();

        assert!(err.to_string().contains("Failed to write configuration file"));
        assert_eq!(file_system.get_write_calls().len(), 1);
    }

    #[test]
    fn test_suspicious_exclusions_survive_loading() {
        let file_system = MockFileSystem::new();
        let config_path = PathBuf::from("/test/config.toml");
        file_system.add_file(&config_path, "[rotation]\nexcluded_sinks = [\"\"]\n".to_string());

        let config = ConfigLoader::new(file_system, config_path)
            .load_config()
            .unwrap();

        assert_eq!(config.warnings().len(), 1);
    }
}

#[cfg(test)]
mod real_filesystem {
    use super::*;

    #[test]
    fn test_default_config_round_trips_through_disk() {
        let dir = tempfile::tempdir().unwrap();
        let config_path = dir.path().join("nested/sink-rotator/config.toml");

        let loader = ConfigLoader::new(StandardFileSystem, config_path.clone());
        loader.load_config().unwrap();
        assert!(!config_path.exists());

        let written = loader.write_default_config().unwrap();
        assert!(config_path.exists());

        let loaded = loader.load_config().unwrap();
        assert_eq!(written.rotation.excluded_sinks, loaded.rotation.excluded_sinks);
        assert_eq!(written.general.log_level, loaded.general.log_level);
    }

    #[test]
    fn test_user_file_is_not_overwritten() {
        let dir = tempfile::tempdir().unwrap();
        let config_path = dir.path().join("config.toml");
        let content = "[rotation]\nexcluded_sinks = [\"Speakers\"]\n";
        std::fs::write(&config_path, content).unwrap();

        let loader = ConfigLoader::new_production(config_path.clone());
        let config = loader.load_config().unwrap();

        assert!(config.exclusion_set().contains("Speakers"));
        assert!(!config.exclusion_set().contains("speakers"));
        assert_eq!(std::fs::read_to_string(&config_path).unwrap(), content);
    }

    #[test]
    fn test_for_path_uses_given_path() {
        let loader = ConfigLoader::for_path(Some("/etc/sink-rotator.toml")).unwrap();
        assert_eq!(
            loader.get_config_path(),
            PathBuf::from("/etc/sink-rotator.toml").as_path()
        );
    }
}
