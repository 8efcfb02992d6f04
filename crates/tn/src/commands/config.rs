//! Config command implementation.
//!
//! View and manage configuration settings.
//! Config file is located at ~/.config/tn/config.toml.

use std::env;
use std::fs;
use std::path::PathBuf;

use directories::BaseDirs;
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::{CommandContext, CommandError, Result};

/// Current config file version. Increment when making breaking changes to schema.
const CONFIG_VERSION: u32 = 1;

/// Minimum token length to apply masking (show first and last N characters).
const TOKEN_MASK_MIN_LENGTH: usize = 8;

/// Number of characters to show at start/end of a masked token.
const TOKEN_MASK_VISIBLE_CHARS: usize = 4;

/// Default number of tasks shown by `tn list`.
pub const DEFAULT_LIST_LIMIT: usize = 50;

/// Configuration file structure.
#[derive(Debug, Serialize, Deserialize)]
pub struct Config {
    /// Config schema version for migrations.
    /// Defaults to current version when not present in file.
    #[serde(default = "default_version")]
    pub version: u32,

    /// TaskNotes API base URL.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub api_url: Option<String>,

    /// API token (optional, can use env var instead).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub token: Option<String>,

    /// Output settings.
    #[serde(default)]
    pub output: OutputConfig,

    /// List command settings.
    #[serde(default)]
    pub list: ListConfig,
}

/// Returns the current config version (used by serde default).
fn default_version() -> u32 {
    CONFIG_VERSION
}

impl Default for Config {
    fn default() -> Self {
        Self {
            version: CONFIG_VERSION,
            api_url: None,
            token: None,
            output: OutputConfig::default(),
            list: ListConfig::default(),
        }
    }
}

/// Output configuration.
#[derive(Debug, Default, Serialize, Deserialize)]
pub struct OutputConfig {
    /// Enable colors.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color: Option<bool>,
}

/// List command configuration.
#[derive(Debug, Default, Serialize, Deserialize)]
pub struct ListConfig {
    /// Default result limit.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub limit: Option<usize>,

    /// Always evaluate filters locally.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub local_filtering: Option<bool>,
}

/// Gets the config file path.
///
/// `TN_CONFIG` wins, then `$XDG_CONFIG_HOME/tn/config.toml`, then
/// `~/.config/tn/config.toml` on all platforms.
pub fn get_config_path() -> Result<PathBuf> {
    if let Ok(path) = env::var("TN_CONFIG") {
        return Ok(PathBuf::from(path));
    }

    if let Ok(xdg_config) = env::var("XDG_CONFIG_HOME") {
        if !xdg_config.is_empty() {
            return Ok(PathBuf::from(xdg_config).join("tn").join("config.toml"));
        }
    }

    BaseDirs::new()
        .map(|dirs| dirs.home_dir().join(".config").join("tn").join("config.toml"))
        .ok_or_else(|| CommandError::Config("Could not determine config directory".to_string()))
}

/// Loads the configuration from disk.
///
/// A missing file yields the defaults.
pub fn load_config() -> Result<Config> {
    let path = get_config_path()?;

    if !path.exists() {
        debug!(path = %path.display(), "no config file, using defaults");
        return Ok(Config::default());
    }

    let content = fs::read_to_string(&path)
        .map_err(|e| CommandError::Config(format!("Failed to read config: {}", e)))?;

    let config: Config = toml::from_str(&content)
        .map_err(|e| CommandError::Config(format!("Failed to parse config: {}", e)))?;

    migrate_config(config)
}

/// Migrates config to current version if needed.
fn migrate_config(mut config: Config) -> Result<Config> {
    if config.version > CONFIG_VERSION {
        return Err(CommandError::Config(format!(
            "Config version {} is newer than supported version {}",
            config.version, CONFIG_VERSION
        )));
    }

    // Version 1 is the first schema; later versions upgrade here in order.
    config.version = CONFIG_VERSION;
    Ok(config)
}

/// Saves the configuration to disk.
fn save_config(config: &Config) -> Result<()> {
    let path = get_config_path()?;

    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)
            .map_err(|e| CommandError::Config(format!("Failed to create config directory: {}", e)))?;
    }

    let content = toml::to_string_pretty(config)
        .map_err(|e| CommandError::Config(format!("Failed to serialize config: {}", e)))?;

    fs::write(&path, content)
        .map_err(|e| CommandError::Config(format!("Failed to write config: {}", e)))?;

    Ok(())
}

/// Executes the config show command.
pub fn execute_show(ctx: &CommandContext) -> Result<()> {
    let config = load_config()?;
    let path = get_config_path()?;

    if ctx.json_output {
        let masked = Config {
            token: config.token.as_deref().map(mask_token),
            ..config
        };
        let output = serde_json::json!({
            "path": path.display().to_string(),
            "exists": path.exists(),
            "config": masked,
        });
        println!("{}", serde_json::to_string_pretty(&output)?);
    } else if !ctx.quiet {
        use owo_colors::OwoColorize;

        let header = "Configuration";
        if ctx.use_colors {
            println!("{}\n", header.green().bold());
        } else {
            println!("{}\n", header);
        }

        println!("File: {}", path.display());
        println!("Exists: {}\n", path.exists());

        if path.exists() {
            println!("Settings:");
            if let Some(ref url) = config.api_url {
                println!("  api_url: {}", url);
            }
            if let Some(ref token) = config.token {
                println!("  token: {}", mask_token(token));
            }

            println!("\n[output]");
            if let Some(color) = config.output.color {
                println!("  color: {}", color);
            }

            println!("\n[list]");
            if let Some(limit) = config.list.limit {
                println!("  limit: {}", limit);
            }
            if let Some(local) = config.list.local_filtering {
                println!("  local_filtering: {}", local);
            }
        } else {
            println!("(No config file exists. Run 'tn config set <key> <value>' to create one.)");
        }
    }

    Ok(())
}

/// Options for the config set command.
pub struct ConfigSetOptions {
    /// Configuration key.
    pub key: String,
    /// Configuration value.
    pub value: String,
}

/// Executes the config set command.
pub fn execute_set(ctx: &CommandContext, opts: &ConfigSetOptions) -> Result<()> {
    let mut config = load_config()?;
    let path = get_config_path()?;

    apply_setting(&mut config, &opts.key, &opts.value)?;
    save_config(&config)?;

    if ctx.json_output {
        let output = serde_json::json!({
            "status": "success",
            "key": opts.key,
            "path": path.display().to_string(),
        });
        println!("{}", serde_json::to_string_pretty(&output)?);
    } else if !ctx.quiet {
        let shown = if opts.key == "token" {
            mask_token(&opts.value)
        } else {
            opts.value.clone()
        };
        println!("Set {} = {}", opts.key, shown);
    }

    Ok(())
}

/// Sets one `section.field` key on the config.
fn apply_setting(config: &mut Config, key: &str, value: &str) -> Result<()> {
    let (section, field) = match key.split_once('.') {
        Some((section, field)) => (Some(section), field),
        None => (None, key),
    };

    match (section, field) {
        (None, "api_url") => config.api_url = Some(value.to_string()),
        (None, "token") => config.token = Some(value.to_string()),
        (Some("output"), "color") => config.output.color = Some(parse_bool(value)?),
        (Some("list"), "limit") => {
            let limit = value.parse::<usize>().map_err(|_| {
                CommandError::Config(format!("Invalid limit '{}'. Use a whole number", value))
            })?;
            config.list.limit = Some(limit);
        }
        (Some("list"), "local_filtering") => {
            config.list.local_filtering = Some(parse_bool(value)?);
        }
        _ => {
            return Err(CommandError::Config(format!(
                "Unknown config key '{}'. Valid keys: api_url, token, output.color, list.limit, list.local_filtering",
                key
            )));
        }
    }

    Ok(())
}

/// Executes the config path command.
pub fn execute_path(ctx: &CommandContext) -> Result<()> {
    let path = get_config_path()?;

    if ctx.json_output {
        let output = serde_json::json!({
            "path": path.display().to_string(),
            "exists": path.exists(),
        });
        println!("{}", serde_json::to_string_pretty(&output)?);
    } else {
        println!("{}", path.display());
    }

    Ok(())
}

/// Masks a token for display, showing only the first and last N characters.
///
/// Uses character-based (not byte-based) indexing to safely handle
/// multi-byte UTF-8 characters.
fn mask_token(token: &str) -> String {
    let char_count = token.chars().count();
    if char_count > TOKEN_MASK_MIN_LENGTH {
        let prefix: String = token.chars().take(TOKEN_MASK_VISIBLE_CHARS).collect();
        let suffix: String = token
            .chars()
            .skip(char_count - TOKEN_MASK_VISIBLE_CHARS)
            .collect();
        format!("{}...{}", prefix, suffix)
    } else {
        "****".to_string()
    }
}

/// Parses a boolean value from string.
fn parse_bool(s: &str) -> Result<bool> {
    match s.to_lowercase().as_str() {
        "true" | "yes" | "1" | "on" => Ok(true),
        "false" | "no" | "0" | "off" => Ok(false),
        _ => Err(CommandError::Config(format!(
            "Invalid boolean value '{}'. Use true/false, yes/no, 1/0, or on/off",
            s
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;
    use tempfile::TempDir;

    /// Points `TN_CONFIG` at a temp file for the duration of a test.
    struct ConfigEnv {
        _dir: TempDir,
        path: PathBuf,
        original: Option<String>,
    }

    impl ConfigEnv {
        fn new() -> Self {
            let dir = TempDir::new().unwrap();
            let path = dir.path().join("tn").join("config.toml");
            let original = env::var("TN_CONFIG").ok();
            env::set_var("TN_CONFIG", &path);
            Self {
                _dir: dir,
                path,
                original,
            }
        }
    }

    impl Drop for ConfigEnv {
        fn drop(&mut self) {
            match &self.original {
                Some(value) => env::set_var("TN_CONFIG", value),
                None => env::remove_var("TN_CONFIG"),
            }
        }
    }

    fn quiet_ctx() -> CommandContext {
        CommandContext {
            json_output: false,
            use_colors: false,
            quiet: true,
            verbose: false,
        }
    }

    #[test]
    fn test_parse_bool_values() {
        assert!(parse_bool("true").unwrap());
        assert!(parse_bool("YES").unwrap());
        assert!(parse_bool("on").unwrap());
        assert!(!parse_bool("false").unwrap());
        assert!(!parse_bool("0").unwrap());
        assert!(parse_bool("maybe").is_err());
    }

    #[test]
    fn test_mask_token() {
        assert_eq!(mask_token("abcdefghijkl"), "abcd...ijkl");
        assert_eq!(mask_token("short"), "****");
        assert_eq!(mask_token("日本語のトークンです"), "日本語の...クンです");
    }

    #[test]
    fn test_apply_setting_keys() {
        let mut config = Config::default();
        apply_setting(&mut config, "api_url", "http://localhost:9090").unwrap();
        apply_setting(&mut config, "output.color", "off").unwrap();
        apply_setting(&mut config, "list.limit", "20").unwrap();
        apply_setting(&mut config, "list.local_filtering", "yes").unwrap();

        assert_eq!(config.api_url.as_deref(), Some("http://localhost:9090"));
        assert_eq!(config.output.color, Some(false));
        assert_eq!(config.list.limit, Some(20));
        assert_eq!(config.list.local_filtering, Some(true));
    }

    #[test]
    fn test_apply_setting_rejects_bad_input() {
        let mut config = Config::default();
        assert!(matches!(
            apply_setting(&mut config, "list.limit", "lots"),
            Err(CommandError::Config(_))
        ));
        assert!(matches!(
            apply_setting(&mut config, "cache.enabled", "true"),
            Err(CommandError::Config(_))
        ));
    }

    #[test]
    fn test_migrate_rejects_future_version() {
        let config = Config {
            version: CONFIG_VERSION + 1,
            ..Config::default()
        };
        assert!(migrate_config(config).is_err());
    }

    #[test]
    fn test_version_defaults_when_missing() {
        let config: Config = toml::from_str("api_url = \"http://x\"").unwrap();
        assert_eq!(config.version, CONFIG_VERSION);
        assert_eq!(config.api_url.as_deref(), Some("http://x"));
    }

    #[test]
    #[serial]
    fn test_config_path_override() {
        let guard = ConfigEnv::new();
        assert_eq!(get_config_path().unwrap(), guard.path);
    }

    #[test]
    #[serial]
    fn test_load_missing_config_is_default() {
        let _guard = ConfigEnv::new();
        let config = load_config().unwrap();
        assert_eq!(config.version, CONFIG_VERSION);
        assert!(config.api_url.is_none());
        assert!(config.token.is_none());
    }

    #[test]
    #[serial]
    fn test_set_then_load_round_trip() {
        let guard = ConfigEnv::new();
        let ctx = quiet_ctx();

        for (key, value) in [
            ("api_url", "http://127.0.0.1:8181"),
            ("token", "secret-token-123"),
            ("list.limit", "10"),
        ] {
            let opts = ConfigSetOptions {
                key: key.to_string(),
                value: value.to_string(),
            };
            execute_set(&ctx, &opts).unwrap();
        }

        assert!(guard.path.exists());
        let config = load_config().unwrap();
        assert_eq!(config.api_url.as_deref(), Some("http://127.0.0.1:8181"));
        assert_eq!(config.token.as_deref(), Some("secret-token-123"));
        assert_eq!(config.list.limit, Some(10));

        let written = fs::read_to_string(&guard.path).unwrap();
        assert!(written.contains("version = 1"));
        assert!(written.contains("[list]"));
    }

    #[test]
    #[serial]
    fn test_invalid_toml_is_config_error() {
        let guard = ConfigEnv::new();
        fs::create_dir_all(guard.path.parent().unwrap()).unwrap();
        fs::write(&guard.path, "api_url = [unclosed").unwrap();

        assert!(matches!(load_config(), Err(CommandError::Config(_))));
    }
}
