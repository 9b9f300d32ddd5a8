//! Shell configuration file.
//!
//! ```toml
//! [runtime]
//! gc_threshold = 256
//!
//! [render]
//! field_width = 8
//! ```
//!
//! Every table and key is optional.

use std::path::Path;

use mtx_matrix::RenderConfig;
use mtx_rts::{ConfigError, RuntimeConfig};
use serde::Deserialize;

/// Settings read from `--config`.
#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ShellConfig {
    /// Runtime tunables.
    pub runtime: RuntimeConfig,
    /// How matrices are printed.
    pub render: RenderConfig,
}

impl ShellConfig {
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(content)?)
    }

    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&content)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_empty_config_is_default() {
        assert_eq!(ShellConfig::from_toml_str("").unwrap(), ShellConfig::default());
    }

    #[test]
    fn test_partial_tables() {
        let config = ShellConfig::from_toml_str(
            "[runtime]\ngc_threshold = 4\n\n[render]\nindent = 0\n",
        )
        .unwrap();
        assert_eq!(config.runtime.gc_threshold, 4);
        assert_eq!(config.runtime.max_program_len, RuntimeConfig::default().max_program_len);
        assert_eq!(config.render.indent, 0);
        assert_eq!(config.render.field_width, 6);
    }

    #[test]
    fn test_unknown_key_rejected() {
        let err = ShellConfig::from_toml_str("[render]\ncolour = true\n").unwrap_err();
        assert!(matches!(err, ConfigError::Toml(_)));
    }

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[render]\nleading_width = 3").unwrap();
        let config = ShellConfig::load(file.path()).unwrap();
        assert_eq!(config.render.leading_width, 3);

        let missing = file.path().with_extension("missing");
        assert!(matches!(ShellConfig::load(&missing), Err(ConfigError::Io { .. })));
    }
}
