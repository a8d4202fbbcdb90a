//! Environment variable expansion for configuration strings.
//!
//! Supports:
//! - `${VAR}` - expands to the value of VAR, errors if unset
//! - `${VAR:-default}` - expands to VAR if set, otherwise uses default

use crate::ConfigError;

/// Expand environment variable references in a string.
///
/// Returns the original string unchanged if no `${}` patterns are present.
/// Bare `$VAR` syntax is not expanded.
pub(crate) fn expand_env(value: &str, field: &str) -> Result<String, ConfigError> {
    if !value.contains("${") {
        return Ok(value.to_owned());
    }

    shellexpand::env_with_context(value, |var| -> Result<Option<String>, LookupError> {
        std::env::var(var).map(Some).map_err(|_| LookupError {
            var_name: var.to_owned(),
        })
    })
    .map(std::borrow::Cow::into_owned)
    .map_err(|e| ConfigError::EnvVar {
        field: field.to_owned(),
        message: format!("${{{0}}} not set", e.cause.var_name),
    })
}

/// Expand every element of a list, naming failures `field[index]`.
pub(crate) fn expand_all(values: &mut [String], field: &str) -> Result<(), ConfigError> {
    for (idx, value) in values.iter_mut().enumerate() {
        *value = expand_env(value, &format!("{field}[{idx}]"))?;
    }
    Ok(())
}

/// Error returned when environment variable lookup fails.
struct LookupError {
    var_name: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_expand_simple_var() {
        // SAFETY: variable name is unique to this test
        unsafe {
            std::env::set_var("MD2SF_TEST_LINTER", "vale");
        }
        let result = expand_env("${MD2SF_TEST_LINTER}", "lint.command").unwrap();
        assert_eq!(result, "vale");
        unsafe {
            std::env::remove_var("MD2SF_TEST_LINTER");
        }
    }

    #[test]
    fn test_expand_with_default_uses_default() {
        // SAFETY: variable name is unique to this test
        unsafe {
            std::env::remove_var("MD2SF_TEST_UNSET");
        }
        let result = expand_env("${MD2SF_TEST_UNSET:-proselint}", "lint.command").unwrap();
        assert_eq!(result, "proselint");
    }

    #[test]
    fn test_expand_embedded_var() {
        // SAFETY: variable name is unique to this test
        unsafe {
            std::env::set_var("MD2SF_TEST_HOME", "/opt/tools");
        }
        let result = expand_env("${MD2SF_TEST_HOME}/bin/vale", "lint.command").unwrap();
        assert_eq!(result, "/opt/tools/bin/vale");
        unsafe {
            std::env::remove_var("MD2SF_TEST_HOME");
        }
    }

    #[test]
    fn test_expand_missing_var_error() {
        // SAFETY: variable name is unique to this test
        unsafe {
            std::env::remove_var("MD2SF_TEST_MISSING");
        }
        let err = expand_env("${MD2SF_TEST_MISSING}", "spellcheck.command").unwrap_err();
        assert!(matches!(err, ConfigError::EnvVar { .. }));
        assert!(err.to_string().contains("MD2SF_TEST_MISSING"));
        assert!(err.to_string().contains("spellcheck.command"));
    }

    #[test]
    fn test_literal_and_bare_dollar_unchanged() {
        assert_eq!(expand_env("proselint", "f").unwrap(), "proselint");
        assert_eq!(expand_env("$HOME", "f").unwrap(), "$HOME");
    }

    #[test]
    fn test_expand_all_names_index() {
        // SAFETY: variable name is unique to this test
        unsafe {
            std::env::remove_var("MD2SF_TEST_ARG");
        }
        let mut args = vec!["--config".to_owned(), "${MD2SF_TEST_ARG}".to_owned()];
        let err = expand_all(&mut args, "lint.args").unwrap_err();
        assert!(err.to_string().contains("lint.args[1]"));
    }
}
