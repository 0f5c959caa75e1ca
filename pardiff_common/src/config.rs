use crate::{DiffConfig, DiffError};
use directories::ProjectDirs;
use std::fs;
use std::path::{Path, PathBuf};

const CONFIG_FILE_NAME: &str = "pardiff.toml";

#[derive(Debug, Clone)]
pub struct LoadedConfig {
    pub config: DiffConfig,
    pub path: Option<PathBuf>,
    pub exists: bool,
}

/// Load configuration from `explicit`, a portable file next to the binary,
/// or the platform config directory, in that order.
///
/// A missing file is not an error and yields defaults, except when the path
/// was given explicitly.
pub fn load_config(explicit: Option<&Path>) -> Result<LoadedConfig, DiffError> {
    if let Some(path) = explicit {
        let config = read_config(path)?;
        return Ok(LoadedConfig {
            config,
            path: Some(path.to_path_buf()),
            exists: true,
        });
    }

    let Some(path) = resolve_config_path() else {
        return Ok(LoadedConfig {
            config: DiffConfig::default(),
            path: None,
            exists: false,
        });
    };

    let exists = path.exists();
    let config = if exists {
        read_config(&path)?
    } else {
        DiffConfig::default()
    };

    Ok(LoadedConfig {
        config,
        path: Some(path),
        exists,
    })
}

pub fn read_config(path: &Path) -> Result<DiffConfig, DiffError> {
    let data = fs::read_to_string(path).map_err(|e| DiffError::path_io(path, e))?;
    parse_config(&data)
}

pub fn parse_config(data: &str) -> Result<DiffConfig, DiffError> {
    let config: DiffConfig =
        toml::from_str(data).map_err(|e| DiffError::Serialization(e.to_string()))?;
    config.validate()?;
    Ok(config)
}

impl DiffConfig {
    pub fn validate(&self) -> Result<(), DiffError> {
        if self.chunk_size == 0 {
            return Err(DiffError::Config(
                "chunk_size must be greater than zero".to_string(),
            ));
        }
        Ok(())
    }
}

fn resolve_config_path() -> Option<PathBuf> {
    if let Some(portable_path) = portable_config_path() {
        if portable_path.exists() {
            return Some(portable_path);
        }
    }

    let dirs = ProjectDirs::from("", "pardiff", "pardiff")?;
    Some(dirs.config_dir().join(CONFIG_FILE_NAME))
}

fn portable_config_path() -> Option<PathBuf> {
    std::env::current_exe()
        .ok()
        .and_then(|path| path.parent().map(|dir| dir.join(CONFIG_FILE_NAME)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ColorMode;
    use tempfile::TempDir;

    #[test]
    fn test_parse_empty_config_uses_defaults() {
        let config = parse_config("").unwrap();
        assert_eq!(config, DiffConfig::default());
        assert_eq!(config.chunk_size, 4096);
        assert!(!config.recursive);
    }

    #[test]
    fn test_parse_full_config() {
        let config = parse_config(
            r#"
recursive = true
follow_symlinks = true
chunk_size = 65536
threads = 4
color = "never"
exclude = ["*.o", "target"]
"#,
        )
        .unwrap();

        assert!(config.recursive);
        assert!(config.follow_symlinks);
        assert_eq!(config.chunk_size, 65536);
        assert_eq!(config.threads, 4);
        assert_eq!(config.color, ColorMode::Never);
        assert_eq!(config.exclude, vec!["*.o".to_string(), "target".to_string()]);
    }

    #[test]
    fn test_zero_chunk_size_rejected() {
        let err = parse_config("chunk_size = 0").unwrap_err();
        assert!(matches!(err, DiffError::Config(_)));
    }

    #[test]
    fn test_invalid_toml_rejected() {
        let err = parse_config("recursive = maybe").unwrap_err();
        assert!(matches!(err, DiffError::Serialization(_)));
    }

    #[test]
    fn test_load_explicit() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join(CONFIG_FILE_NAME);
        fs::write(&path, "recursive = true\nexclude = [\"*.log\"]\n").unwrap();

        let loaded = load_config(Some(&path)).unwrap();
        assert!(loaded.exists);
        assert_eq!(loaded.path.as_deref(), Some(path.as_path()));
        assert_eq!(
            loaded.config,
            DiffConfig {
                recursive: true,
                exclude: vec!["*.log".to_string()],
                ..DiffConfig::default()
            }
        );
    }

    #[test]
    fn test_missing_explicit_config_is_error() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("absent.toml");
        let err = load_config(Some(&path)).unwrap_err();
        assert!(matches!(err, DiffError::PathIo { .. }));
    }
}
