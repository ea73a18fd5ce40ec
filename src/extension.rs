//! Options for running as an osquery extension.
//!
//! osquery starts extensions in different ways: `osqueryd` passes
//! `--socket`, some wrappers export `OSQUERY_SOCKET`, and
//! `osqueryi --extension` passes the socket path as the first positional
//! argument. [`ExtensionOptions::resolve`] applies that precedence once and
//! hands the host adapter a plain struct instead of reading flags and
//! environment later on.

use crate::table::{create_table_statement, EXTENSION_NAME, TABLE_NAME};
use std::path::PathBuf;
use std::time::Duration;
use thiserror::Error;

pub const SOCKET_ENV: &str = "OSQUERY_SOCKET";
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);
pub const DEFAULT_PING_INTERVAL: Duration = Duration::from_secs(3);

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ExtensionError {
    #[error("No osquery socket given. Usage: mise-osquery-extension --socket <path>")]
    MissingSocket,
}

/// Where the socket path came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SocketSource {
    Flag,
    Environment,
    Positional,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtensionOptions {
    pub socket: PathBuf,
    pub socket_source: SocketSource,
    pub timeout: Duration,
    pub interval: Duration,
    pub verbose: bool,
}

impl SocketSource {
    pub fn as_str(&self) -> &'static str {
        match self {
            SocketSource::Flag => "--socket",
            SocketSource::Environment => SOCKET_ENV,
            SocketSource::Positional => "positional argument",
        }
    }
}

impl ExtensionOptions {
    /// Picks the socket from the flag, then the environment, then the first
    /// positional argument. Empty values are treated as absent.
    pub fn resolve(
        flag: Option<&str>,
        env: Option<&str>,
        positional: Option<&str>,
    ) -> Result<Self, ExtensionError> {
        let candidates = [
            (flag, SocketSource::Flag),
            (env, SocketSource::Environment),
            (positional, SocketSource::Positional),
        ];

        let (socket, socket_source) = candidates
            .into_iter()
            .find_map(|(value, source)| {
                value
                    .filter(|v| !v.is_empty())
                    .map(|v| (PathBuf::from(v), source))
            })
            .ok_or(ExtensionError::MissingSocket)?;

        Ok(Self {
            socket,
            socket_source,
            timeout: DEFAULT_TIMEOUT,
            interval: DEFAULT_PING_INTERVAL,
            verbose: false,
        })
    }

    /// Same as [`resolve`](Self::resolve), reading `OSQUERY_SOCKET` from the process.
    pub fn from_env(flag: Option<&str>, positional: Option<&str>) -> Result<Self, ExtensionError> {
        let env = std::env::var(SOCKET_ENV).ok();
        Self::resolve(flag, env.as_deref(), positional)
    }

    pub fn with_timeout_secs(mut self, secs: u64) -> Self {
        self.timeout = Duration::from_secs(secs);
        self
    }

    pub fn with_interval_secs(mut self, secs: u64) -> Self {
        self.interval = Duration::from_secs(secs);
        self
    }

    pub fn with_verbose(mut self, verbose: bool) -> Self {
        self.verbose = verbose;
        self
    }

    /// What a host registers for these options: extension, table and session settings.
    pub fn registration_summary(&self) -> String {
        format!(
            "Extension: {}\nTable:     {}\nSchema:    {}\nSocket:    {} (from {})\nTimeout:   {}s\nInterval:  {}s",
            EXTENSION_NAME,
            TABLE_NAME,
            create_table_statement(),
            self.socket.display(),
            self.socket_source.as_str(),
            self.timeout.as_secs(),
            self.interval.as_secs(),
        )
    }
}
