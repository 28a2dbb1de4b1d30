// Public modules
pub mod command;
pub mod error;
pub mod gate;
pub mod output;
pub mod validator;
pub mod version;

// Re-export common types for convenience
pub use command::{run, Command, CommandTable, Dispatcher, Invocation, Platform};
pub use error::{Error, ErrorCode, Result};
pub use gate::{ParsedArgs, Usage};
pub use output::{Exit, Flow, Stream};
pub use validator::{validate, validate_descriptor, Field, Rule};
