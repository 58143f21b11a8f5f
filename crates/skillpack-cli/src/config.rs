use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::path::{Path, PathBuf};

/// Template written by `skillpack config init`
pub const DEFAULT_CONFIG: &str = r#"
[skills]
directories = []         # Extra skill directories to scan
include_bundled = true   # Skills compiled into skillpack
include_personal = true  # ~/.skillpack/skills
include_project = true   # ./.skillpack/skills

[logging]
level = "warn"  # trace, debug, info, warn, error
"#;

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
#[serde(default)]
pub struct SkillsConfig {
    pub directories: Vec<PathBuf>,
    pub include_bundled: bool,
    pub include_personal: bool,
    pub include_project: bool,
}

impl Default for SkillsConfig {
    fn default() -> Self {
        Self {
            directories: Vec::new(),
            include_bundled: true,
            include_personal: true,
            include_project: true,
        }
    }
}

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "warn".to_string(),
        }
    }
}

#[derive(Debug, Deserialize, Serialize, Clone, Default, PartialEq)]
#[serde(default)]
pub struct Config {
    pub skills: SkillsConfig,
    pub logging: LoggingConfig,
}

impl Config {
    /// Get the global config path: ~/.skillpack/skillpack.toml
    pub fn global_config_path() -> Option<PathBuf> {
        dirs::home_dir().map(|home| home.join(".skillpack").join("skillpack.toml"))
    }

    /// Write the default config to the global path unless it already exists.
    /// Returns the path and whether it was created.
    pub fn init_global() -> Result<(PathBuf, bool)> {
        let config_path =
            Self::global_config_path().context("Could not find home directory")?;
        Self::init_at(&config_path).map(|created| (config_path, created))
    }

    fn init_at(config_path: &Path) -> Result<bool> {
        if config_path.exists() {
            return Ok(false);
        }

        if let Some(config_dir) = config_path.parent() {
            fs::create_dir_all(config_dir).with_context(|| {
                format!("Failed to create config directory {}", config_dir.display())
            })?;
        }

        fs::write(config_path, DEFAULT_CONFIG.trim())
            .with_context(|| format!("Failed to write {}", config_path.display()))?;
        Ok(true)
    }

    /// Load configuration with layered approach:
    /// 1. Global config: ~/.skillpack/skillpack.toml (optional)
    /// 2. Local override: ./skillpack.toml (optional)
    /// 3. Explicit `--config` file (required when given)
    /// 4. Environment variables with SKILLPACK__ prefix
    /// 5. SKILLPACK_LOG_LEVEL (highest priority)
    pub fn load(explicit: Option<&Path>) -> Result<Self> {
        // Load .env file from current directory
        dotenvy::dotenv().ok();

        Self::load_layers(Layers {
            global: Self::global_config_path(),
            local: true,
            explicit,
            env: None,
        })
    }

    fn load_layers(layers: Layers<'_>) -> Result<Self> {
        let mut config_builder = config::Config::builder();

        if let Some(global) = layers.global {
            config_builder = config_builder.add_source(config::File::from(global).required(false));
        }

        if layers.local {
            config_builder =
                config_builder.add_source(config::File::with_name("skillpack").required(false));
        }

        if let Some(path) = layers.explicit {
            config_builder = config_builder.add_source(config::File::from(path.to_path_buf()));
        }

        let log_level = match &layers.env {
            Some(vars) => vars.get("SKILLPACK_LOG_LEVEL").cloned(),
            None => env::var("SKILLPACK_LOG_LEVEL").ok(),
        };

        config_builder = config_builder.add_source(
            config::Environment::with_prefix("SKILLPACK")
                .separator("__")
                .try_parsing(true)
                .list_separator(",")
                .with_list_parse_key("skills.directories")
                .source(layers.env),
        );

        if let Some(level) = log_level {
            config_builder = config_builder.set_override("logging.level", level)?;
        }

        let config = config_builder
            .build()
            .context("Failed to build configuration")?;

        let config: Self = config
            .try_deserialize()
            .context("Invalid configuration")?;
        Ok(config)
    }
}

/// Sources consulted by [`Config::load_layers`]
struct Layers<'a> {
    global: Option<PathBuf>,
    /// Read `./skillpack.toml`
    local: bool,
    explicit: Option<&'a Path>,
    /// Variables to use instead of the process environment
    env: Option<config::Map<String, String>>,
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    #[test]
    fn test_default_template_matches_defaults() {
        let parsed: Config = toml::from_str(DEFAULT_CONFIG).expect("Failed to parse TOML");
        assert_eq!(parsed, Config::default());
    }

    #[test]
    fn test_partial_config_uses_defaults() {
        let parsed: Config = toml::from_str(
            r#"
            [skills]
            directories = ["/opt/skills"]
            include_personal = false
        "#,
        )
        .unwrap();

        assert_eq!(parsed.skills.directories, vec![PathBuf::from("/opt/skills")]);
        assert!(!parsed.skills.include_personal);
        assert!(parsed.skills.include_bundled);
        assert_eq!(parsed.logging.level, "warn");
    }

    fn isolated<'a>(explicit: Option<&'a Path>, vars: &[(&str, &str)]) -> Layers<'a> {
        Layers {
            global: None,
            local: false,
            explicit,
            env: Some(
                vars.iter()
                    .map(|(k, v)| (k.to_string(), v.to_string()))
                    .collect(),
            ),
        }
    }

    #[test]
    fn test_load_explicit_file() {
        let tmp = tempfile::TempDir::new().unwrap();
        let path = tmp.path().join("custom.toml");
        fs::write(&path, "[logging]\nlevel = \"debug\"\n").unwrap();

        let config = Config::load_layers(isolated(Some(&path), &[])).unwrap();
        assert_eq!(config.logging.level, "debug");
        assert_eq!(config.skills, SkillsConfig::default());
    }

    #[test]
    fn test_env_overrides_file() {
        let tmp = tempfile::TempDir::new().unwrap();
        let path = tmp.path().join("custom.toml");
        fs::write(
            &path,
            "[skills]\ndirectories = [\"/opt/skills\"]\n\n[logging]\nlevel = \"debug\"\n",
        )
        .unwrap();

        let config = Config::load_layers(isolated(
            Some(&path),
            &[
                ("SKILLPACK__SKILLS__DIRECTORIES", "/a,/b"),
                ("SKILLPACK__SKILLS__INCLUDE_PERSONAL", "false"),
                ("SKILLPACK_LOG_LEVEL", "trace"),
            ],
        ))
        .unwrap();

        assert_eq!(
            config.skills.directories,
            [PathBuf::from("/a"), PathBuf::from("/b")]
        );
        assert!(!config.skills.include_personal);
        assert!(config.skills.include_project);
        assert_eq!(config.logging.level, "trace");
    }

    #[test]
    fn test_load_missing_explicit_file_fails() {
        let tmp = tempfile::TempDir::new().unwrap();
        let absent = tmp.path().join("absent.toml");
        assert!(Config::load_layers(isolated(Some(&absent), &[])).is_err());
    }

    #[test]
    fn test_init_at_does_not_overwrite() {
        let tmp = tempfile::TempDir::new().unwrap();
        let path = tmp.path().join("nested").join("skillpack.toml");

        assert!(Config::init_at(&path).unwrap());
        fs::write(&path, "[logging]\nlevel = \"info\"\n").unwrap();
        assert!(!Config::init_at(&path).unwrap());
        assert_eq!(
            fs::read_to_string(&path).unwrap(),
            "[logging]\nlevel = \"info\"\n"
        );
    }
}
