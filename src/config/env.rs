use super::ConfigError;
use std::path::PathBuf;
use std::str::FromStr;

/// Load and parse an environment variable into `target`.
/// Leaves `target` untouched if the variable is unset or empty.
pub fn load_env_var<T>(name: &str, target: &mut Option<T>) -> Result<(), ConfigError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    if let Some(value) = non_empty_var(name) {
        *target = Some(
            value
                .trim()
                .parse()
                .map_err(|e| ConfigError::EnvError(format!("Invalid {name}: {e}")))?,
        );
    }
    Ok(())
}

pub fn load_env_string(name: &str, target: &mut Option<String>) {
    if let Some(value) = non_empty_var(name) {
        *target = Some(value);
    }
}

pub fn load_env_path(name: &str, target: &mut Option<PathBuf>) {
    if let Some(value) = non_empty_var(name) {
        *target = Some(PathBuf::from(value));
    }
}

fn non_empty_var(name: &str) -> Option<String> {
    std::env::var(name).ok().filter(|v| !v.trim().is_empty())
}
