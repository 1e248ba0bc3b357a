//! Run configuration: where devices come from, how to log in, what to change.

use std::path::PathBuf;
use std::time::Duration;

use secrecy::SecretString;

use crate::error::ConfigError;
use crate::transport::HostKeyVerification;

/// VLAN whose access ports get their descriptions updated.
pub const DEFAULT_VLAN: u16 = 920;

/// Device list read when no path is given.
pub const DEFAULT_INPUT: &str = "input.csv";

/// Devices updated at the same time.
pub const DEFAULT_MAX_CONCURRENCY: usize = 32;

/// Login credentials shared by every device of a run.
#[derive(Debug)]
pub struct Credentials {
    pub username: String,
    pub password: SecretString,
    /// Secret for `enable`; the password is used when unset.
    pub enable_secret: Option<SecretString>,
}

impl Credentials {
    pub fn new(username: impl Into<String>, password: SecretString) -> Self {
        Self {
            username: username.into(),
            password,
            enable_secret: None,
        }
    }

    pub fn with_enable_secret(mut self, secret: SecretString) -> Self {
        self.enable_secret = Some(secret);
        self
    }

    /// Catch a blank username before any session is opened, so a typo at
    /// the prompt fails once instead of once per device. The credentials
    /// themselves are only checked by the switches.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.username.trim().is_empty() {
            return Err(ConfigError::EmptyUsername);
        }
        Ok(())
    }
}

/// SSH session parameters applied to every device.
#[derive(Debug, Clone)]
pub struct SessionSettings {
    pub port: u16,
    /// Connect timeout, and the longest wait for any single prompt.
    pub timeout: Duration,
    pub host_key_verification: HostKeyVerification,
    pub known_hosts_path: Option<PathBuf>,
}

impl Default for SessionSettings {
    fn default() -> Self {
        Self {
            port: 22,
            timeout: Duration::from_secs(30),
            host_key_verification: HostKeyVerification::default(),
            known_hosts_path: None,
        }
    }
}

/// Everything a run needs apart from the credentials.
#[derive(Debug, Clone)]
pub struct RunConfig {
    /// Address file, one device per row.
    pub input: PathBuf,
    /// Treat a missing address file as an error instead of an empty run.
    pub strict_input: bool,
    pub vlan: u16,
    pub max_concurrency: usize,
    pub session: SessionSettings,
    /// Where to write the JSON run report, if anywhere.
    pub report: Option<PathBuf>,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            input: PathBuf::from(DEFAULT_INPUT),
            strict_input: false,
            vlan: DEFAULT_VLAN,
            max_concurrency: DEFAULT_MAX_CONCURRENCY,
            session: SessionSettings::default(),
            report: None,
        }
    }
}

impl RunConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(1..=4094).contains(&self.vlan) {
            return Err(ConfigError::VlanOutOfRange(self.vlan));
        }
        if self.max_concurrency == 0 {
            return Err(ConfigError::ZeroConcurrency);
        }
        if self.session.timeout.is_zero() {
            return Err(ConfigError::ZeroTimeout);
        }
        Ok(())
    }
}
