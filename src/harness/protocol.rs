//! The line-oriented text protocol spoken with candidate solvers.
//!
//! Every candidate reads a single test case from stdin:
//!
//! ```text
//! 1                              <- test count marker, always 1
//! <n> [<auxiliary-param>]        <- header line
//! <field1> <field2> [<field3>]   <- one line per record
//! ...
//! ```
//!
//! and writes one answer to stdout.

use core::fmt::{Display, Write};
use core::str::FromStr;

use crate::errors::ExecutionError;

/// The leading "number of test cases" line. The harness sends one case per run.
pub const TEST_COUNT_MARKER: u32 = 1;

/// Encodes instances as candidate input and decodes the candidate's answer.
pub trait Protocol<I: ?Sized> {
    /// The decoded candidate answer.
    type Answer;

    /// Render `instance` as the full stdin text for one candidate run.
    fn encode(&self, instance: &I) -> String;

    /// Decode the candidate's complete stdout.
    ///
    /// # Errors
    ///
    /// Returns [`ExecutionError::MalformedOutput`] when `stdout` is not a valid
    /// answer. Unparsable text must never be coerced into a value.
    fn decode(&self, stdout: &str) -> Result<Self::Answer, ExecutionError>;
}

/// Incremental builder for protocol text.
///
/// Starts with the test count marker; every [`line`](Self::line) call appends
/// one space-separated, newline-terminated line.
#[derive(Debug, Clone)]
pub struct ProtocolWriter {
    buf: String,
}

impl Default for ProtocolWriter {
    fn default() -> Self {
        Self::new()
    }
}

impl ProtocolWriter {
    /// Create a writer holding only the test count marker line.
    #[must_use]
    pub fn new() -> Self {
        let mut buf = String::new();
        let _ = writeln!(buf, "{TEST_COUNT_MARKER}");
        Self { buf }
    }

    /// Append one line made of `fields` separated by single spaces.
    pub fn line<T: Display>(&mut self, fields: impl IntoIterator<Item = T>) -> &mut Self {
        for (i, field) in fields.into_iter().enumerate() {
            if i > 0 {
                self.buf.push(' ');
            }
            let _ = write!(self.buf, "{field}");
        }
        self.buf.push('\n');
        self
    }

    /// Consume the writer and return the protocol text.
    #[must_use]
    pub fn finish(self) -> String {
        self.buf
    }
}

/// Parse a candidate's whole stdout as a single number.
///
/// Leading and trailing whitespace is ignored. Anything else, including empty
/// output, is a [`ExecutionError::MalformedOutput`].
///
/// # Errors
///
/// Returns [`ExecutionError::MalformedOutput`] when the trimmed output does not
/// parse as `T`.
pub fn parse_number<T: FromStr>(stdout: &str) -> Result<T, ExecutionError> {
    stdout
        .trim()
        .parse()
        .map_err(|_| ExecutionError::MalformedOutput {
            output: stdout.to_owned(),
        })
}
