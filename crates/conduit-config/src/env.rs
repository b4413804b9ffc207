use std::sync::OnceLock;

use regex::{Captures, Regex};
use thiserror::Error;

/// Failure to expand a `{{ ... }}` placeholder
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ExpandError {
    #[error("environment variable not found: `{0}`")]
    MissingVariable(String),
    #[error("only variables scoped with 'env.' are supported: `{0}`")]
    UnsupportedScope(String),
}

fn placeholder() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    // `{{ env.VAR }}` or `{{ env.VAR | default("fallback") }}`
    RE.get_or_init(|| {
        Regex::new(r#"\{\{\s*([a-zA-Z0-9_.]+)\s*(?:\|\s*default\("([^"]*)"\))?\s*\}\}"#).expect("must be valid regex")
    })
}

/// Expand `{{ env.VAR }}` placeholders in raw TOML text
///
/// TOML comment lines are passed through untouched so that commented-out
/// settings never require their variables to be set.
pub fn expand_env(input: &str) -> Result<String, ExpandError> {
    let lines = input
        .lines()
        .map(|line| {
            if line.trim_start().starts_with('#') {
                Ok(line.to_owned())
            } else {
                expand_line(line)
            }
        })
        .collect::<Result<Vec<_>, _>>()?;

    let mut output = lines.join("\n");
    if input.ends_with('\n') {
        output.push('\n');
    }
    Ok(output)
}

fn expand_line(line: &str) -> Result<String, ExpandError> {
    let mut failure = None;
    let expanded = placeholder().replace_all(line, |captures: &Captures<'_>| {
        match resolve(&captures[1], captures.get(2).map(|m| m.as_str())) {
            Ok(value) => value,
            Err(e) => {
                failure.get_or_insert(e);
                String::new()
            }
        }
    });

    match failure {
        Some(e) => Err(e),
        None => Ok(expanded.into_owned()),
    }
}

fn resolve(key: &str, default: Option<&str>) -> Result<String, ExpandError> {
    let Some(var_name) = key.strip_prefix("env.").filter(|name| !name.contains('.')) else {
        return Err(ExpandError::UnsupportedScope(key.to_owned()));
    };

    match (std::env::var(var_name), default) {
        (Ok(value), _) => Ok(value),
        (Err(_), Some(default)) => Ok(default.to_owned()),
        (Err(_), None) => Err(ExpandError::MissingVariable(var_name.to_owned())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn no_placeholders() {
        let input = "region = \"us-east-1\"";
        assert_eq!(expand_env(input).unwrap(), input);
    }

    #[test]
    fn expands_credentials() {
        let vars = [("CONDUIT_TEST_KEY", Some("AKIA")), ("CONDUIT_TEST_SECRET", Some("s3cr3t"))];
        temp_env::with_vars(vars, || {
            let result = expand_env(
                "access_key_id = \"{{ env.CONDUIT_TEST_KEY }}\"\nsecret_access_key = \"{{ env.CONDUIT_TEST_SECRET }}\"",
            )
            .unwrap();
            assert_eq!(result, "access_key_id = \"AKIA\"\nsecret_access_key = \"s3cr3t\"");
        });
    }

    #[test]
    fn missing_variable_is_reported() {
        temp_env::with_var_unset("CONDUIT_MISSING", || {
            let err = expand_env("region = \"{{ env.CONDUIT_MISSING }}\"").unwrap_err();
            assert_eq!(err, ExpandError::MissingVariable("CONDUIT_MISSING".to_owned()));
        });
    }

    #[test]
    fn default_applies_when_unset() {
        temp_env::with_var_unset("CONDUIT_REGION", || {
            let result = expand_env("region = \"{{ env.CONDUIT_REGION | default(\"eu-west-1\") }}\"").unwrap();
            assert_eq!(result, "region = \"eu-west-1\"");
        });
    }

    #[test]
    fn set_variable_beats_default() {
        temp_env::with_var("CONDUIT_REGION", Some("ap-south-1"), || {
            let result = expand_env("region = \"{{ env.CONDUIT_REGION | default(\"eu-west-1\") }}\"").unwrap();
            assert_eq!(result, "region = \"ap-south-1\"");
        });
    }

    #[test]
    fn unsupported_scope() {
        let err = expand_env("key = \"{{ vault.KEY }}\"").unwrap_err();
        assert!(matches!(err, ExpandError::UnsupportedScope(_)));
    }

    #[test]
    fn comment_lines_skip_expansion() {
        temp_env::with_var_unset("CONDUIT_MISSING", || {
            let input = "  # secret_access_key = \"{{ env.CONDUIT_MISSING }}\"\n";
            assert_eq!(expand_env(input).unwrap(), input);
        });
    }
}
