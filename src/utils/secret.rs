use std::{env, fs};

use secrecy::SecretString;
use tracing::error;

use crate::error::ConfigError;

/// Reads a secret from the file named by `file_env_var_name`, falling back
/// to the value of `env_var_name`.
///
/// Container deployments mount secrets as files, local setups keep them in
/// `.env`; both end up here.
pub fn get_secret(file_env_var_name: &str, env_var_name: &str) -> Option<SecretString> {
    if let Ok(secret_file_path) = env::var(file_env_var_name) {
        match fs::read_to_string(&secret_file_path) {
            Ok(content) => Some(SecretString::from(content.trim().to_string())),
            Err(e) => {
                error!(%secret_file_path, ?e, "Error reading secret file");
                None
            }
        }
    } else {
        env::var(env_var_name).ok().map(SecretString::from)
    }
}

/// Like [`get_secret`], but a missing secret is a configuration error.
pub fn require_secret(
    file_env_var_name: &str,
    env_var_name: &'static str,
) -> Result<SecretString, ConfigError> {
    get_secret(file_env_var_name, env_var_name).ok_or(ConfigError::Missing(env_var_name))
}
