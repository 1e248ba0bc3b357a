//! Error types for lldp-describe.

use std::io;
use std::path::PathBuf;
use std::time::Duration;

use thiserror::Error;

/// Main error type for session, parsing and input operations.
#[derive(Error, Debug)]
pub enum Error {
    /// SSH transport-level errors
    #[error("Transport error: {0}")]
    Transport(#[from] TransportError),

    /// Channel operation errors
    #[error("Channel error: {0}")]
    Channel(#[from] ChannelError),

    /// Driver-level errors
    #[error("Driver error: {0}")]
    Driver(#[from] DriverError),

    /// Structured output parsing errors
    #[error("Parse error: {0}")]
    Parse(#[from] ParseError),

    /// Device list errors
    #[error("Input error: {0}")]
    Input(#[from] InputError),

    /// Run configuration errors
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),
}

impl Error {
    /// Whether the error means the SSH session itself is no longer usable.
    ///
    /// Command-level failures (a rejected command, unparseable output) leave
    /// the session usable; transport and channel failures do not.
    pub fn is_session_error(&self) -> bool {
        matches!(
            self,
            Error::Transport(_) | Error::Channel(_) | Error::Driver(DriverError::NotConnected)
        )
    }
}

/// Transport layer errors (SSH connection, authentication).
#[derive(Error, Debug)]
pub enum TransportError {
    /// Failed to connect to host
    #[error("Connection failed to {host}:{port}: {source}")]
    ConnectionFailed {
        host: String,
        port: u16,
        #[source]
        source: io::Error,
    },

    /// SSH handshake or protocol error
    #[error("SSH error: {0}")]
    Ssh(#[from] russh::Error),

    /// Authentication failed
    #[error("Authentication failed for user '{user}'")]
    AuthenticationFailed { user: String },

    /// Host is not present in known_hosts (strict mode)
    #[error("Host key for {host}:{port} is not in known_hosts")]
    HostKeyUnknown { host: String, port: u16 },

    /// Host key differs from the one recorded in known_hosts
    #[error("Host key for {host}:{port} changed (known_hosts line {line})")]
    HostKeyChanged { host: String, port: u16, line: usize },

    /// known_hosts could not be read or written
    #[error("known_hosts error: {0}")]
    KnownHosts(String),

    /// Operation timed out
    #[error("Operation timed out after {0:?}")]
    Timeout(Duration),
}

/// Channel layer errors (prompt matching, PTY operations).
#[derive(Error, Debug)]
pub enum ChannelError {
    /// Prompt pattern not seen before the read deadline
    #[error("Pattern not found within {0:?}")]
    PatternTimeout(Duration),

    /// Channel closed unexpectedly
    #[error("Channel closed")]
    Closed,

    /// SSH protocol error on the channel
    #[error("Channel SSH error: {0}")]
    Ssh(russh::Error),

    /// Invalid regex pattern
    #[error("Invalid regex pattern: {0}")]
    InvalidPattern(#[from] regex::Error),
}

/// Driver layer errors (command execution, privilege escalation).
#[derive(Error, Debug)]
pub enum DriverError {
    /// Driver not connected
    #[error("Driver not connected - call open() first")]
    NotConnected,

    /// Driver already connected
    #[error("Driver already connected")]
    AlreadyConnected,

    /// Failed to acquire target privilege level
    #[error("Failed to acquire privilege level '{target}'")]
    PrivilegeAcquisitionFailed { target: String },

    /// Invalid configuration in the driver builder
    #[error("Invalid configuration: {message}")]
    InvalidConfig { message: String },

    /// Unknown privilege level detected
    #[error("Unknown privilege level from prompt: '{prompt}'")]
    UnknownPrivilege { prompt: String },

    /// No path found between privilege levels
    #[error("No path from privilege '{from}' to '{to}'")]
    NoPrivilegePath { from: String, to: String },
}

/// TextFSM template and parsing errors.
#[derive(Error, Debug)]
pub enum ParseError {
    /// The embedded template did not compile
    #[error("Invalid template '{template}': {message}")]
    Template {
        template: &'static str,
        message: String,
    },

    /// The template engine rejected the command output
    #[error("Failed to parse output with '{template}': {message}")]
    Output {
        template: &'static str,
        message: String,
    },
}

/// Device list loading errors.
#[derive(Error, Debug)]
pub enum InputError {
    /// The address file does not exist
    #[error("File '{}' not found", path.display())]
    NotFound { path: PathBuf },

    /// The address file exists but could not be read
    #[error("Failed to read '{}': {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// A row could not be decoded
    #[error("Malformed row in '{}': {source}", path.display())]
    Csv {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },
}

/// Run configuration errors.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// VLAN id outside 1..=4094
    #[error("VLAN {0} is out of range (1-4094)")]
    VlanOutOfRange(u16),

    /// Concurrency cap of zero
    #[error("max concurrency must be at least 1")]
    ZeroConcurrency,

    /// Zero timeout
    #[error("timeout must be greater than zero")]
    ZeroTimeout,

    /// Username missing or blank
    #[error("username must not be empty")]
    EmptyUsername,
}

/// Failures of individual steps of a device update.
///
/// Expected absences (no LLDP neighbor, skipped interfaces) are not errors
/// and are reported through [`InterfaceResult`](crate::report::InterfaceResult).
#[derive(Error, Debug)]
pub enum UpdateError {
    /// Could not open a session to the device
    #[error("unable to connect: {0}")]
    Connect(#[source] Error),

    /// Could not enter privileged EXEC mode
    #[error("unable to enter privileged mode: {0}")]
    Escalate(#[source] Error),

    /// The VLAN interface status query failed
    #[error("interface status query failed: {0}")]
    StatusQuery(#[source] Error),

    /// The LLDP neighbor query for one interface failed
    #[error("LLDP neighbor query failed: {0}")]
    NeighborQuery(#[source] Error),

    /// The description push could not be delivered
    #[error("configuration push failed: {0}")]
    Push(#[source] Error),

    /// The device answered a command with an error marker
    #[error("device rejected '{command}': {message}")]
    Rejected { command: String, message: String },

    /// The save-configuration command failed
    #[error("unable to save configuration: {0}")]
    Save(#[source] Error),
}

impl UpdateError {
    /// Whether the underlying failure left the session unusable.
    pub fn is_session_error(&self) -> bool {
        match self {
            UpdateError::Connect(e)
            | UpdateError::Escalate(e)
            | UpdateError::StatusQuery(e)
            | UpdateError::NeighborQuery(e)
            | UpdateError::Push(e)
            | UpdateError::Save(e) => e.is_session_error(),
            UpdateError::Rejected { .. } => false,
        }
    }
}

/// Result type alias using lldp-describe's Error.
pub type Result<T> = std::result::Result<T, Error>;
