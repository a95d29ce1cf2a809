use figment::{
    providers::{Env, Format, Toml},
    Figment,
};
use std::path::{Path, PathBuf};

use super::{types::Config, ConfigError};

/// Environment variable naming the config file.
pub const CONFIG_PATH_ENV: &str = "MEDIABATCH_CONFIG";

const DEFAULT_CONFIG_PATH: &str = "mediabatch.toml";

/// Config file path from `MEDIABATCH_CONFIG`, or `mediabatch.toml`.
pub fn resolve_config_path() -> PathBuf {
    std::env::var_os(CONFIG_PATH_ENV)
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG_PATH))
}

/// Load configuration from file with environment variable overrides.
///
/// A missing file is not an error: every section has defaults. Variables
/// such as `MEDIABATCH_SERVER__PORT=9000` override file values.
pub fn load_config(path: &Path) -> Result<Config, ConfigError> {
    let mut figment = Figment::new();
    if path.exists() {
        figment = figment.merge(Toml::file(path));
    } else {
        tracing::debug!("No config file at {}, using defaults", path.display());
    }

    figment
        .merge(Env::prefixed("MEDIABATCH_").split("__"))
        .extract()
        .map_err(|e| ConfigError::ParseError(e.to_string()))
}

/// Load configuration from TOML string (useful for testing)
pub fn load_config_from_str(toml_str: &str) -> Result<Config, ConfigError> {
    toml::from_str(toml_str).map_err(|e| ConfigError::ParseError(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_load_config_from_str_valid() {
        let toml = r#"
[server]
port = 9000
"#;
        let config = load_config_from_str(toml).unwrap();
        assert_eq!(config.server.port, 9000);
    }

    #[test]
    fn test_load_config_from_str_invalid() {
        let toml = r#"
[server]
port = "not a number"
"#;
        let result = load_config_from_str(toml);
        assert!(matches!(result, Err(ConfigError::ParseError(_))));
    }

    #[test]
    fn test_load_config_missing_file_uses_defaults() {
        let config = load_config(Path::new("/nonexistent/mediabatch.toml")).unwrap();
        assert_eq!(config.export.file_prefix, "converted_");
    }

    #[test]
    fn test_load_config_from_file() {
        let mut temp_file = NamedTempFile::new().unwrap();
        writeln!(
            temp_file,
            r#"
[server]
host = "127.0.0.1"
port = 3000

[converter]
timeout_secs = 60
"#
        )
        .unwrap();

        let config = load_config(temp_file.path()).unwrap();
        assert_eq!(config.server.port, 3000);
        assert_eq!(config.server.host.to_string(), "127.0.0.1");
        assert_eq!(config.converter.timeout_secs, 60);
    }

    #[test]
    fn test_env_overrides_file() {
        figment::Jail::expect_with(|jail| {
            jail.create_file(
                "mediabatch.toml",
                r#"
[server]
port = 3000

[export]
file_prefix = "file_"
"#,
            )?;
            jail.set_env("MEDIABATCH_SERVER__PORT", "4000");
            jail.set_env("MEDIABATCH_EXPORT__FILE_PREFIX", "env_");

            let config = load_config(Path::new("mediabatch.toml"))
                .map_err(|e| figment::Error::from(e.to_string()))?;
            assert_eq!(config.server.port, 4000);
            assert_eq!(config.export.file_prefix, "env_");
            Ok(())
        });
    }
}
