//! Terminate signals and the text printed with them.
//!
//! Inner code never ends the process. Anything that wants to stop the run
//! (help, usage errors, handler failures) returns an [`Exit`], and only the
//! outermost entry point writes it out and turns it into a process status.

use std::io::{self, Write};
use std::process::ExitCode;

use crate::error::Result;
use crate::gate::Usage;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stream {
    Stdout,
    Stderr,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Exit {
    pub code: u8,
    pub stream: Stream,
    pub text: String,
}

/// Result of a step that may ask the entry point to terminate.
pub type Flow<T = ()> = std::result::Result<T, Exit>;

impl Exit {
    pub fn new(code: u8, stream: Stream, text: impl Into<String>) -> Self {
        Self {
            code,
            stream,
            text: text.into(),
        }
    }

    pub fn success() -> Self {
        Self::new(0, Stream::Stdout, String::new())
    }

    pub fn is_success(&self) -> bool {
        self.code == 0
    }

    /// Write the text to its stream. A closed pipe is not an error.
    pub fn emit(&self) {
        if self.text.is_empty() {
            return;
        }
        let result = match self.stream {
            Stream::Stdout => write_text(&mut io::stdout().lock(), &self.text),
            Stream::Stderr => write_text(&mut io::stderr().lock(), &self.text),
        };
        if let Err(e) = result {
            if e.kind() != io::ErrorKind::BrokenPipe {
                eprintln!("failed to write output: {}", e);
            }
        }
    }

    /// Emit and convert into the process status.
    pub fn finish(self) -> ExitCode {
        self.emit();
        ExitCode::from(self.code)
    }
}

fn write_text(out: &mut impl Write, text: &str) -> io::Result<()> {
    out.write_all(text.as_bytes())?;
    out.flush()
}

pub fn exit_code_to_u8(code: i32) -> u8 {
    if code <= 0 {
        0
    } else if code >= 255 {
        255
    } else {
        code as u8
    }
}

/// Turn a handler result into a terminate signal.
///
/// User-input errors are printed with the command's usage and description so
/// the caller can correct the invocation; every other error is printed bare.
pub fn handle_command_error<T>(result: Result<T>, usage: &Usage) -> Flow {
    match result {
        Ok(_) => Ok(()),
        Err(err) if err.code.is_user_input() => Err(Exit::new(
            1,
            Stream::Stderr,
            format!("{}\n{}", err, usage.render()),
        )),
        Err(err) => Err(Exit::new(
            1,
            Stream::Stderr,
            format!("Error running command:\n\n{}\n", err),
        )),
    }
}
