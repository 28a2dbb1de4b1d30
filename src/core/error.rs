use serde::Serialize;
use serde_json::Value;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCode {
    InvalidInput,
    ValidationUnknownRule,
    ValidationInvalidDescriptor,

    ShellFailed,
    RemoteShellFailed,

    VersionNotFound,
    VersionInvalid,

    CommandDuplicate,

    InternalIoError,
    InternalUnexpected,
}

impl ErrorCode {
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorCode::InvalidInput => "validation.invalid_input",
            ErrorCode::ValidationUnknownRule => "validation.unknown_rule",
            ErrorCode::ValidationInvalidDescriptor => "validation.invalid_descriptor",

            ErrorCode::ShellFailed => "shell.execution_failed",
            ErrorCode::RemoteShellFailed => "shell.remote_execution_failed",

            ErrorCode::VersionNotFound => "version.not_found",
            ErrorCode::VersionInvalid => "version.invalid",

            ErrorCode::CommandDuplicate => "command.duplicate",

            ErrorCode::InternalIoError => "internal.io_error",
            ErrorCode::InternalUnexpected => "internal.unexpected",
        }
    }

    /// Heading printed above the message for the typed error kinds.
    ///
    /// Execution errors without a category render as the bare message.
    pub fn category(&self) -> Option<&'static str> {
        match self {
            ErrorCode::InvalidInput => Some("invalid input"),
            ErrorCode::ShellFailed | ErrorCode::RemoteShellFailed => {
                Some("shell execution failed")
            }
            _ => None,
        }
    }

    /// User-caused errors are shown together with the command's usage text.
    pub fn is_user_input(&self) -> bool {
        matches!(self, ErrorCode::InvalidInput)
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InvalidInputDetails {
    pub field: String,
    pub problem: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UnknownRuleDetails {
    pub field: String,
    pub rule: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ShellFailedDetails {
    pub command: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub exit_code: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub host: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VersionDetails {
    pub path: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CommandDuplicateDetails {
    pub verb: String,
    pub noun: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InternalErrorDetails {
    pub error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub context: Option<String>,
}

#[derive(Debug, Clone)]
pub struct Error {
    pub code: ErrorCode,
    pub message: String,
    pub details: Value,
    pub cause: Option<String>,
}

pub type Result<T> = std::result::Result<T, Error>;

impl std::fmt::Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match (self.code.category(), &self.cause) {
            (Some(category), Some(cause)) => write!(
                f,
                "{}\n{}\n\ntrace:\n{}\n",
                category, self.message, cause
            ),
            (Some(category), None) => write!(f, "{}\n{}\n", category, self.message),
            (None, Some(cause)) => write!(f, "{}\n\ntrace:\n{}\n", self.message, cause),
            (None, None) => write!(f, "{}", self.message),
        }
    }
}

impl std::error::Error for Error {}

fn to_details<T: Serialize>(details: T) -> Value {
    serde_json::to_value(details).unwrap_or_else(|_| Value::Object(serde_json::Map::new()))
}

impl Error {
    pub fn new(code: ErrorCode, message: impl Into<String>, details: Value) -> Self {
        let message = message.into();
        let message = if message.trim().is_empty() {
            code.as_str().to_string()
        } else {
            message
        };

        Self {
            code,
            message,
            details,
            cause: None,
        }
    }

    /// Attach the underlying failure, rendered as a `trace:` block.
    pub fn with_cause(mut self, cause: impl std::fmt::Display) -> Self {
        self.cause = Some(cause.to_string());
        self
    }

    pub fn invalid_input(
        field: impl Into<String>,
        problem: impl Into<String>,
        value: Option<String>,
    ) -> Self {
        let problem = problem.into();
        Self::new(
            ErrorCode::InvalidInput,
            problem.clone(),
            to_details(InvalidInputDetails {
                field: field.into(),
                problem,
                value,
            }),
        )
    }

    pub fn validation_unknown_rule(field: impl Into<String>, rule: impl Into<String>) -> Self {
        let rule = rule.into();
        Self::new(
            ErrorCode::ValidationUnknownRule,
            format!("unknown validation rule: {}", rule),
            to_details(UnknownRuleDetails {
                field: field.into(),
                rule,
            }),
        )
    }

    pub fn validation_invalid_descriptor(error: impl Into<String>) -> Self {
        let error = error.into();
        Self::new(
            ErrorCode::ValidationInvalidDescriptor,
            format!("failed to parse validator descriptor:\n{}", error),
            to_details(InternalErrorDetails {
                error,
                context: None,
            }),
        )
    }

    pub fn shell_failed(
        command: impl Into<String>,
        message: impl Into<String>,
        exit_code: Option<i32>,
    ) -> Self {
        Self::new(
            ErrorCode::ShellFailed,
            message,
            to_details(ShellFailedDetails {
                command: command.into(),
                exit_code,
                host: None,
            }),
        )
    }

    pub fn remote_shell_failed(
        host: impl Into<String>,
        command: impl Into<String>,
        message: impl Into<String>,
        exit_code: Option<i32>,
    ) -> Self {
        Self::new(
            ErrorCode::RemoteShellFailed,
            message,
            to_details(ShellFailedDetails {
                command: command.into(),
                exit_code,
                host: Some(host.into()),
            }),
        )
    }

    pub fn version_not_found(path: impl Into<String>) -> Self {
        let path = path.into();
        Self::new(
            ErrorCode::VersionNotFound,
            format!("could not find version declaration in {}", path),
            to_details(VersionDetails {
                path,
                version: None,
            }),
        )
    }

    pub fn version_invalid(path: impl Into<String>, version: impl Into<String>, problem: &str) -> Self {
        let version = version.into();
        Self::new(
            ErrorCode::VersionInvalid,
            format!("could not read next version from '{}': {}", version, problem),
            to_details(VersionDetails {
                path: path.into(),
                version: Some(version),
            }),
        )
    }

    pub fn command_duplicate(verb: impl Into<String>, noun: impl Into<String>) -> Self {
        let verb = verb.into();
        let noun = noun.into();
        Self::new(
            ErrorCode::CommandDuplicate,
            format!("command '{} {}' is registered more than once", verb, noun),
            to_details(CommandDuplicateDetails { verb, noun }),
        )
    }

    pub fn internal_io(error: impl Into<String>, context: Option<String>) -> Self {
        let error = error.into();
        Self::new(
            ErrorCode::InternalIoError,
            error.clone(),
            to_details(InternalErrorDetails { error, context }),
        )
    }

    pub fn internal_unexpected(error: impl Into<String>) -> Self {
        Self::new(ErrorCode::InternalUnexpected, error, Value::Null)
    }
}
