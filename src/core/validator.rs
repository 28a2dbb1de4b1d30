//! Declarative field validation.
//!
//! Each [`Field`] names a value and an ordered list of [`Rule`]s. Fields are
//! checked in order and rules in order within a field; the first failure ends
//! the whole call with an `InvalidInput` error naming the field.
//!
//! Descriptors may also be written as JSON, which reads well in handler code:
//!
//! ```ignore
//! validate_descriptor(r#"[
//!     {"name":"version_file","value":"src/version.rs","validate":["NotEmpty","IsFile"]}
//! ]"#)?;
//! ```

use std::fmt;
use std::str::FromStr;
use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

static NUMBER_PATTERN: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^[0-9]+$").unwrap());

// Digits and dots only; octet ranges and count are not checked.
static IP_PATTERN: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^[0-9.]+$").unwrap());

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Rule {
    NotEmpty,
    IsNumber,
    #[serde(rename = "IsIP")]
    IsIp,
    IsFile,
}

impl Rule {
    pub fn as_str(&self) -> &'static str {
        match self {
            Rule::NotEmpty => "NotEmpty",
            Rule::IsNumber => "IsNumber",
            Rule::IsIp => "IsIP",
            Rule::IsFile => "IsFile",
        }
    }

    /// Apply this rule to a single named value.
    pub fn check(&self, name: &str, value: &str) -> Result<()> {
        match self {
            Rule::NotEmpty => {
                if value.is_empty() {
                    return Err(Error::invalid_input(
                        name,
                        format!("'{}' is empty", name),
                        None,
                    ));
                }
            }
            Rule::IsNumber => {
                if !NUMBER_PATTERN.is_match(value) {
                    return Err(Error::invalid_input(
                        name,
                        format!("'{}' is not a number, given {}", name, value),
                        Some(value.to_string()),
                    ));
                }
            }
            Rule::IsIp => {
                if !IP_PATTERN.is_match(value) {
                    return Err(Error::invalid_input(
                        name,
                        format!("'{}' is not an IP address, given {}", name, value),
                        Some(value.to_string()),
                    ));
                }
            }
            Rule::IsFile => {
                if !path_exists(name, value)? {
                    return Err(Error::invalid_input(
                        name,
                        format!("'{}' is not a file or directory, given {}", name, value),
                        Some(value.to_string()),
                    ));
                }
            }
        }
        Ok(())
    }
}

impl fmt::Display for Rule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Rule {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "NotEmpty" => Ok(Rule::NotEmpty),
            "IsNumber" => Ok(Rule::IsNumber),
            "IsIP" => Ok(Rule::IsIp),
            "IsFile" => Ok(Rule::IsFile),
            other => Err(other.to_string()),
        }
    }
}

/// A glob lookup with at least one hit. Literal paths and directories count.
fn path_exists(name: &str, pattern: &str) -> Result<bool> {
    let mut paths = glob::glob(pattern).map_err(|e| {
        Error::invalid_input(
            name,
            format!(
                "failed attempting to check if '{}' is a file or directory, failure:\n{}",
                name, e
            ),
            Some(pattern.to_string()),
        )
        .with_cause(e)
    })?;

    Ok(paths.any(|entry| entry.is_ok()))
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Field {
    pub name: String,
    pub value: String,
    #[serde(rename = "validate", default)]
    pub rules: Vec<Rule>,
}

impl Field {
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
            rules: Vec::new(),
        }
    }

    pub fn rule(mut self, rule: Rule) -> Self {
        self.rules.push(rule);
        self
    }

    pub fn with_rules(mut self, rules: &[Rule]) -> Self {
        self.rules.extend_from_slice(rules);
        self
    }
}

/// Descriptor entry as written in JSON, before rule names are resolved.
#[derive(Debug, Deserialize)]
struct RawField {
    name: String,
    #[serde(default)]
    value: String,
    #[serde(default)]
    validate: Vec<String>,
}

/// Validate fields in order, stopping at the first failing rule.
pub fn validate(fields: &[Field]) -> Result<()> {
    for field in fields {
        for rule in &field.rules {
            rule.check(&field.name, &field.value)?;
        }
    }
    Ok(())
}

/// Parse a JSON descriptor and validate it.
///
/// Rule names are resolved as they are reached, so an earlier failing field
/// is reported before an unknown rule further down the list.
pub fn validate_descriptor(descriptor: &str) -> Result<()> {
    let fields: Vec<RawField> = serde_json::from_str(descriptor)
        .map_err(|e| Error::validation_invalid_descriptor(e.to_string()))?;

    for field in &fields {
        for name in &field.validate {
            let rule = name
                .parse::<Rule>()
                .map_err(|rule| Error::validation_unknown_rule(&field.name, rule))?;
            rule.check(&field.name, &field.value)?;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorCode;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn is_number_accepts_digits_only() {
        assert!(Rule::IsNumber.check("port", "123").is_ok());
        assert!(Rule::IsNumber.check("port", "12a").is_err());
        assert!(Rule::IsNumber.check("port", "").is_err());
        assert!(Rule::IsNumber.check("port", "-1").is_err());
    }

    #[test]
    fn is_ip_accepts_digits_and_dots() {
        assert!(Rule::IsIp.check("host", "10.0.0.1").is_ok());
        assert!(Rule::IsIp.check("host", "999.1").is_ok());
        assert!(Rule::IsIp.check("host", "localhost").is_err());
    }

    #[test]
    fn not_empty_rejects_empty_string() {
        let err = Rule::NotEmpty.check("input", "").unwrap_err();
        assert_eq!(err.code, ErrorCode::InvalidInput);
        assert_eq!(err.message, "'input' is empty");
    }

    #[test]
    fn empty_value_reports_first_listed_rule() {
        let fields = [Field::new("input", "").with_rules(&[Rule::NotEmpty, Rule::IsNumber])];
        let err = validate(&fields).unwrap_err();
        assert_eq!(err.message, "'input' is empty");

        let fields = [Field::new("input", "").with_rules(&[Rule::IsNumber, Rule::NotEmpty])];
        let err = validate(&fields).unwrap_err();
        assert_eq!(err.message, "'input' is not a number, given ");
    }

    #[test]
    fn first_failing_field_wins() {
        let fields = [
            Field::new("a", "1").rule(Rule::IsNumber),
            Field::new("b", "x").rule(Rule::IsNumber),
            Field::new("c", "").rule(Rule::NotEmpty),
        ];
        let err = validate(&fields).unwrap_err();
        assert_eq!(err.details["field"], "b");
    }

    #[test]
    fn is_file_accepts_path_directory_and_glob() {
        let dir = tempdir().unwrap();
        let file = dir.path().join("version.go");
        fs::write(&file, "package version\n").unwrap();

        let file_str = file.to_string_lossy().to_string();
        let dir_str = dir.path().to_string_lossy().to_string();
        let glob_str = dir.path().join("*.go").to_string_lossy().to_string();
        let miss_str = dir.path().join("*.rs").to_string_lossy().to_string();

        assert!(Rule::IsFile.check("f", &file_str).is_ok());
        assert!(Rule::IsFile.check("f", &dir_str).is_ok());
        assert!(Rule::IsFile.check("f", &glob_str).is_ok());

        let err = Rule::IsFile.check("f", &miss_str).unwrap_err();
        assert_eq!(err.code, ErrorCode::InvalidInput);
        assert!(err.message.contains("is not a file or directory"));
    }

    #[test]
    fn is_file_reports_bad_pattern_as_invalid_input() {
        let err = Rule::IsFile.check("f", "[").unwrap_err();
        assert_eq!(err.code, ErrorCode::InvalidInput);
        assert!(err.cause.is_some());
    }

    #[test]
    fn descriptor_validates_in_order() {
        let result = validate_descriptor(
            r#"[
                {"name":"count","value":"12","validate":["NotEmpty","IsNumber"]},
                {"name":"host","value":"a.b","validate":["IsIP"]}
            ]"#,
        );
        let err = result.unwrap_err();
        assert_eq!(err.details["field"], "host");
    }

    #[test]
    fn descriptor_passes_when_all_rules_hold() {
        let result = validate_descriptor(
            r#"[{"name":"input","value":"hello","validate":["NotEmpty"]}]"#,
        );
        assert!(result.is_ok());
    }

    #[test]
    fn descriptor_rejects_unknown_rule_with_distinct_code() {
        let err = validate_descriptor(
            r#"[
                {"name":"input","value":"hello","validate":["NotEmpty"]},
                {"name":"other","value":"x","validate":["IsUrl"]}
            ]"#,
        )
        .unwrap_err();
        assert_eq!(err.code, ErrorCode::ValidationUnknownRule);
        assert_eq!(err.details["rule"], "IsUrl");
        assert!(!err.code.is_user_input());
    }

    #[test]
    fn earlier_failing_field_wins_over_later_unknown_rule() {
        let err = validate_descriptor(
            r#"[
                {"name":"input","value":"","validate":["NotEmpty"]},
                {"name":"other","value":"x","validate":["IsUrl"]}
            ]"#,
        )
        .unwrap_err();
        assert_eq!(err.code, ErrorCode::InvalidInput);
        assert_eq!(err.details["field"], "input");
        assert_eq!(err.to_string(), "invalid input\n'input' is empty\n");
    }

    #[test]
    fn descriptor_rejects_malformed_json() {
        let err = validate_descriptor("[{").unwrap_err();
        assert_eq!(err.code, ErrorCode::ValidationInvalidDescriptor);
    }

    #[test]
    fn rule_names_round_trip_through_serde() {
        let field: Field = serde_json::from_str(
            r#"{"name":"ip","value":"1.2.3.4","validate":["IsIP","NotEmpty"]}"#,
        )
        .unwrap();
        assert_eq!(field.rules, vec![Rule::IsIp, Rule::NotEmpty]);
        assert_eq!("IsIP".parse::<Rule>(), Ok(Rule::IsIp));
        assert_eq!(Rule::IsIp.to_string(), "IsIP");
    }
}
