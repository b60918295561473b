//! Load configuration from XDG `config.toml` and project `.env`, then apply it to the
//! process environment with priority: **existing env > .env > XDG**.
//!
//! The weather agent reads its settings (`WEATHER_AGENT_DEFAULT_CITY`,
//! `WEATHER_AGENT_SEED`) from the environment, so either file can pre-seed them:
//!
//! ```toml
//! # ~/.config/weather-agent/config.toml
//! [env]
//! WEATHER_AGENT_DEFAULT_CITY = "杭州"
//! ```

mod dotenv;
#[cfg(feature = "tracing-init")]
mod tracing_init;
mod xdg_toml;

use std::collections::HashSet;
use std::path::Path;
use thiserror::Error;

#[cfg(feature = "tracing-init")]
pub use tracing_init::init_tracing;

#[derive(Error, Debug)]
pub enum LoadError {
    #[error("xdg config path: {0}")]
    XdgPath(String),
    #[error("read xdg config: {0}")]
    XdgRead(std::io::Error),
    #[error("parse xdg toml: {0}")]
    XdgParse(#[from] toml::de::Error),
    #[error("read .env: {0}")]
    DotenvRead(std::io::Error),
}

/// Sets every key found in `.env` or `$XDG_CONFIG_HOME/<app_name>/config.toml` `[env]`
/// that is **not** already present in the process environment.
///
/// * `app_name`: directory under the XDG config home, e.g. `"weather-agent"`.
/// * `override_dir`: directory holding `.env`; `None` means the current directory.
///
/// Returns the keys that were applied.
pub fn load_and_apply(
    app_name: &str,
    override_dir: Option<&Path>,
) -> Result<Vec<String>, LoadError> {
    let xdg = xdg_toml::load_env_map(app_name)?;
    let dotenv = dotenv::load_env_map(override_dir).map_err(LoadError::DotenvRead)?;

    let keys: HashSet<&String> = xdg.keys().chain(dotenv.keys()).collect();
    let mut applied = Vec::new();
    for key in keys {
        if std::env::var_os(key).is_some() {
            continue;
        }
        if let Some(value) = dotenv.get(key).or_else(|| xdg.get(key)) {
            std::env::set_var(key, value);
            applied.push(key.clone());
        }
    }
    applied.sort();
    Ok(applied)
}


#[cfg(test)]
mod tests {
    use super::test_env::{lock, restore_var};
    use super::*;
    use std::env;

    fn write_xdg(dir: &Path, app: &str, body: &str) {
        let app_dir = dir.join(app);
        std::fs::create_dir_all(&app_dir).unwrap();
        std::fs::write(app_dir.join("config.toml"), body).unwrap();
    }

    #[test]
    fn existing_env_wins() {
        let _guard = lock();
        let dotenv_dir = tempfile::tempdir().unwrap();
        std::fs::write(dotenv_dir.path().join(".env"), "WA_TEST_EXISTING=from_dotenv\n").unwrap();
        env::set_var("WA_TEST_EXISTING", "from_env");

        let applied = load_and_apply("weather-agent-nonexistent", Some(dotenv_dir.path())).unwrap();

        assert_eq!(env::var("WA_TEST_EXISTING").as_deref(), Ok("from_env"));
        assert!(!applied.contains(&"WA_TEST_EXISTING".to_string()));
        env::remove_var("WA_TEST_EXISTING");
    }

    #[test]
    fn dotenv_overrides_xdg() {
        let _guard = lock();
        let xdg_dir = tempfile::tempdir().unwrap();
        write_xdg(
            xdg_dir.path(),
            "weather-agent",
            "[env]\nWA_TEST_PRIORITY = \"from_xdg\"\n",
        );
        let dotenv_dir = tempfile::tempdir().unwrap();
        std::fs::write(dotenv_dir.path().join(".env"), "WA_TEST_PRIORITY=from_dotenv\n").unwrap();

        let prev_xdg = env::var("XDG_CONFIG_HOME").ok();
        env::set_var("XDG_CONFIG_HOME", xdg_dir.path());
        env::remove_var("WA_TEST_PRIORITY");

        let result = load_and_apply("weather-agent", Some(dotenv_dir.path()));
        let val = env::var("WA_TEST_PRIORITY").ok();
        env::remove_var("WA_TEST_PRIORITY");
        restore_var("XDG_CONFIG_HOME", prev_xdg);

        assert!(result.is_ok());
        assert_eq!(val.as_deref(), Some("from_dotenv"));
    }

    #[test]
    fn xdg_applied_when_no_dotenv() {
        let _guard = lock();
        let xdg_dir = tempfile::tempdir().unwrap();
        write_xdg(
            xdg_dir.path(),
            "weather-agent",
            "[env]\nWA_TEST_XDG_ONLY = \"杭州\"\n",
        );
        let empty_dir = tempfile::tempdir().unwrap();

        let prev_xdg = env::var("XDG_CONFIG_HOME").ok();
        env::set_var("XDG_CONFIG_HOME", xdg_dir.path());
        env::remove_var("WA_TEST_XDG_ONLY");

        let applied = load_and_apply("weather-agent", Some(empty_dir.path())).unwrap();
        let val = env::var("WA_TEST_XDG_ONLY").ok();
        env::remove_var("WA_TEST_XDG_ONLY");
        restore_var("XDG_CONFIG_HOME", prev_xdg);

        assert_eq!(val.as_deref(), Some("杭州"));
        assert_eq!(applied, vec!["WA_TEST_XDG_ONLY".to_string()]);
    }

    #[test]
    fn no_config_anywhere_is_ok() {
        let _guard = lock();
        let empty_dir = tempfile::tempdir().unwrap();
        let xdg_dir = tempfile::tempdir().unwrap();
        let prev_xdg = env::var("XDG_CONFIG_HOME").ok();
        env::set_var("XDG_CONFIG_HOME", xdg_dir.path());

        let result = load_and_apply("weather-agent", Some(empty_dir.path()));
        restore_var("XDG_CONFIG_HOME", prev_xdg);

        assert!(matches!(result, Ok(ref keys) if keys.is_empty()));
    }

    #[test]
    fn invalid_xdg_toml_fails_with_xdg_parse_error() {
        let _guard = lock();
        let xdg_dir = tempfile::tempdir().unwrap();
        write_xdg(xdg_dir.path(), "weather-agent", "invalid [[[\n");
        let empty_dir = tempfile::tempdir().unwrap();

        let prev_xdg = env::var("XDG_CONFIG_HOME").ok();
        env::set_var("XDG_CONFIG_HOME", xdg_dir.path());
        let result = load_and_apply("weather-agent", Some(empty_dir.path()));
        restore_var("XDG_CONFIG_HOME", prev_xdg);

        assert!(matches!(result, Err(LoadError::XdgParse(_))));
    }
}
