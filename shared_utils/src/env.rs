use secrecy::SecretString;
use thiserror::Error;

/// An environment variable required by the application is not set.
#[derive(Debug, Error)]
#[error("Missing environment variable: {0}")]
pub struct MissingEnvVarError(pub String);

/// Reads an environment variable, returning a structured error if it's missing.
///
/// Empty values are treated as missing so a blank `export FOO=` in a shell
/// profile does not slip through as a valid credential.
///
/// # Arguments
/// * `name` - The name of the environment variable to read.
pub fn get_env_var(name: &str) -> Result<String, MissingEnvVarError> {
    match std::env::var(name) {
        Ok(value) if !value.trim().is_empty() => Ok(value),
        _ => Err(MissingEnvVarError(name.to_string())),
    }
}

/// Reads a credential from the environment and wraps it so it never shows up
/// in `Debug` output or logs.
pub fn get_secret_var(name: &str) -> Result<SecretString, MissingEnvVarError> {
    get_env_var(name).map(SecretString::from)
}

/// Like [`get_secret_var`], but for credentials that are optional (e.g. a
/// local model server that needs no API key).
pub fn get_optional_secret_var(name: &str) -> Option<SecretString> {
    get_secret_var(name).ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    const UNSET: &str = "SHARED_UTILS_TEST_VARIABLE_THAT_IS_NEVER_SET";

    #[test]
    fn missing_variable_reports_its_name() {
        let err = get_env_var(UNSET).unwrap_err();
        assert_eq!(err.0, UNSET);
        assert!(err.to_string().contains(UNSET));
    }

    #[test]
    fn optional_secret_is_none_when_missing() {
        assert!(get_optional_secret_var(UNSET).is_none());
    }

    #[test]
    fn present_variable_is_returned() {
        // PATH is set in every test environment we run in.
        assert!(get_env_var("PATH").is_ok());
    }
}
