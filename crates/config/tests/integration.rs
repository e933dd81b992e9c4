//! Integration tests for config

#[cfg(test)]
mod tests {
    use std::io::Write;
    use std::path::PathBuf;
    use std::sync::Mutex;
    use tempfile::NamedTempFile;
    use vsixget_config::*;
    use vsixget_types::ColorChoice;

    // Mutex to ensure env var tests don't run concurrently
    static ENV_TEST_MUTEX: Mutex<()> = Mutex::new(());

    fn clear_env() {
        for var in [
            "VSIXGET_DOWNLOAD_DIR",
            "VSIXGET_CACHED",
            "VSIXGET_JOBS",
            "VSIXGET_TIMEOUT",
            "VSIXGET_GALLERY_URL",
        ] {
            std::env::remove_var(var);
        }
    }

    #[tokio::test]
    async fn test_load_config_from_file() {
        let mut temp_file = NamedTempFile::new().unwrap();
        writeln!(
            temp_file,
            r#"
[general]
color = "never"

[download]
dir = "/tmp/vsix"
cached = false
jobs = 8

[network]
timeout = 60
retries = 1
        "#
        )
        .unwrap();

        let config = Config::load_from_file(temp_file.path()).await.unwrap();
        assert_eq!(config.general.color, ColorChoice::Never);
        assert_eq!(config.download.dir, PathBuf::from("/tmp/vsix"));
        assert!(!config.download.cached);
        assert_eq!(config.download.jobs, 8);
        assert_eq!(config.network.timeout, 60);
        assert_eq!(config.network.retries, 1);
        // untouched sections keep their defaults
        assert_eq!(config.network.connect_timeout, 30);
        assert_eq!(config.catalog.gallery_url, constants::DEFAULT_GALLERY_URL);
    }

    #[tokio::test]
    async fn test_invalid_toml_is_parse_error() {
        let mut temp_file = NamedTempFile::new().unwrap();
        writeln!(temp_file, "[download\njobs = ").unwrap();

        let err = Config::load_from_file(temp_file.path()).await.unwrap_err();
        assert!(matches!(
            err,
            vsixget_errors::Error::Config(vsixget_errors::ConfigError::ParseError { .. })
        ));
    }

    #[tokio::test]
    async fn test_explicit_missing_path_is_error() {
        let result = Config::load_or_default(Some(std::path::Path::new(
            "/definitely/not/here/config.toml",
        )))
        .await;
        assert!(result.is_err());
    }

    #[test]
    fn test_merge_env() {
        let _guard = ENV_TEST_MUTEX.lock().unwrap();
        clear_env();

        std::env::set_var("VSIXGET_DOWNLOAD_DIR", "/srv/vsix");
        std::env::set_var("VSIXGET_CACHED", "No");
        std::env::set_var("VSIXGET_JOBS", "6");

        let mut config = Config::default();
        config.merge_env().unwrap();

        assert_eq!(config.download.dir, PathBuf::from("/srv/vsix"));
        assert!(!config.download.cached);
        assert_eq!(config.download.jobs, 6);

        clear_env();
    }

    #[test]
    fn test_invalid_env_value() {
        let _guard = ENV_TEST_MUTEX.lock().unwrap();
        clear_env();

        std::env::set_var("VSIXGET_JOBS", "many");
        let mut config = Config::default();
        assert!(config.merge_env().is_err());

        clear_env();
    }

    #[test]
    fn test_env_values_are_validated_after_all_layers() {
        let _guard = ENV_TEST_MUTEX.lock().unwrap();
        clear_env();

        std::env::set_var("VSIXGET_JOBS", "0");
        let mut config = Config::default();
        config.merge_env().unwrap();
        assert!(config.validate().is_err());

        // A later layer may still repair the value
        config.download.jobs = 4;
        config.validate().unwrap();

        clear_env();
    }

    #[test]
    fn test_zero_timeouts_are_rejected() {
        let mut config = Config::default();
        config.network.chunk_timeout = 0;
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("network.chunk_timeout"), "{err}");

        let mut config = Config::default();
        config.network.connect_timeout = 0;
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("network.connect_timeout"), "{err}");

        let mut config = Config::default();
        config.network.timeout = 0;
        assert!(config.validate().is_err());

        Config::default().validate().unwrap();
    }

    #[test]
    fn test_truthy_words() {
        for word in ["true", "1", "T", "y", "YES", "yeah", "yup", "certainly"] {
            assert!(parse_truthy(word), "{word} should be true");
        }
        for word in ["false", "0", "no", "", "maybe"] {
            assert!(!parse_truthy(word), "{word} should be false");
        }
    }
}
