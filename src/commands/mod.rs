//! Command handlers for the daily-spend CLI. Each handler returns an [`Out`] which `main` prints.

mod classify;
mod init;
mod report;
mod trends;

use serde::Serialize;
use std::fmt::Debug;
use tracing::{debug, info};

pub use classify::{classify, Classification};
pub use init::init;
pub use report::{report, ReportOutput};
pub use trends::{trends, TrendsOutput};

/// What a command hands back: a human-readable message, which may span several lines, and
/// optionally the report, trends or classification that produced it.
#[derive(Debug, Clone, Serialize)]
pub struct Out<T>
where
    T: Serialize + Clone + Debug,
{
    message: String,
    structure: Option<T>,
}

impl<T, S> From<S> for Out<T>
where
    T: Debug + Clone + Serialize,
    S: Into<String>,
{
    fn from(value: S) -> Self {
        Out::new_message(value)
    }
}

impl<T> Out<T>
where
    T: Serialize + Clone + Debug,
{
    pub fn new<S>(message: S, structure: T) -> Self
    where
        S: Into<String>,
    {
        Self {
            message: message.into(),
            structure: Some(structure),
        }
    }

    pub fn new_message<S>(message: S) -> Self
    where
        S: Into<String>,
    {
        Self {
            message: message.into(),
            structure: None,
        }
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn structure(&self) -> Option<&T> {
        self.structure.as_ref()
    }

    /// Logs each line of the message at `info` so that a multi-line report summary keeps its
    /// layout, then the structure as pretty JSON at `debug`.
    pub fn print(&self) {
        for line in self.message.lines() {
            info!("{line}");
        }
        match self.structure().map(serde_json::to_string_pretty) {
            Some(Ok(json)) => debug!("Command output:\n\n{json}\n\n"),
            Some(Err(e)) => debug!("Unable to serialize the command output: {e}"),
            None => {}
        }
    }
}
