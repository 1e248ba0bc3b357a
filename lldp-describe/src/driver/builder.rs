//! Builder for creating device drivers.

use std::path::PathBuf;
use std::time::Duration;

use secrecy::SecretString;

use super::generic::GenericDriver;
use crate::channel::PtyConfig;
use crate::error::{ChannelError, DriverError, Result};
use crate::platform::Platform;
use crate::transport::{HostKeyVerification, SshConfig};

/// Builder for constructing device drivers.
///
/// # Example
///
/// ```rust,no_run
/// use lldp_describe::driver::{Driver, DriverBuilder};
///
/// # async fn example() -> Result<(), lldp_describe::Error> {
/// let mut driver = DriverBuilder::new("10.20.0.11")
///     .username("netops")
///     .password("secret")
///     .build()?;
/// driver.open().await?;
/// # Ok(())
/// # }
/// ```
pub struct DriverBuilder {
    host: String,
    port: u16,
    username: Option<String>,
    password: Option<SecretString>,
    enable_secret: Option<SecretString>,
    platform: Platform,
    timeout: Duration,
    host_key_verification: HostKeyVerification,
    known_hosts_path: Option<PathBuf>,
}

impl DriverBuilder {
    /// Create a new driver builder for the specified host.
    pub fn new(host: impl Into<String>) -> Self {
        Self {
            host: host.into(),
            port: 22,
            username: None,
            password: None,
            enable_secret: None,
            platform: Platform::default(),
            timeout: Duration::from_secs(30),
            host_key_verification: HostKeyVerification::default(),
            known_hosts_path: None,
        }
    }

    /// Set the SSH port (default: 22).
    pub fn port(mut self, port: u16) -> Self {
        self.port = port;
        self
    }

    /// Set the username for authentication.
    pub fn username(mut self, username: impl Into<String>) -> Self {
        self.username = Some(username.into());
        self
    }

    /// Set the login password.
    pub fn password(mut self, password: &str) -> Self {
        self.password = Some(SecretString::from(password.to_owned()));
        self
    }

    /// Set the secret sent when `enable` asks for a password.
    /// Defaults to the login password.
    pub fn enable_secret(mut self, secret: &str) -> Self {
        self.enable_secret = Some(SecretString::from(secret.to_owned()));
        self
    }

    /// Set the device platform.
    pub fn platform(mut self, platform: Platform) -> Self {
        self.platform = platform;
        self
    }

    /// Set the connection and read timeout.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Set the host key verification mode.
    pub fn host_key_verification(mut self, mode: HostKeyVerification) -> Self {
        self.host_key_verification = mode;
        self
    }

    /// Use a specific known_hosts file.
    pub fn known_hosts_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.known_hosts_path = Some(path.into());
        self
    }

    /// Build the driver.
    ///
    /// This creates the driver but does not connect. Call `open()` on the
    /// returned driver to establish the connection.
    pub fn build(self) -> Result<GenericDriver> {
        let username = self.username.ok_or_else(|| DriverError::InvalidConfig {
            message: "Username is required".to_string(),
        })?;

        let password = self.password.ok_or_else(|| DriverError::InvalidConfig {
            message: "Password is required".to_string(),
        })?;

        let platform = self
            .platform
            .definition()
            .map_err(ChannelError::InvalidPattern)?;

        let ssh_config = SshConfig {
            host: self.host,
            port: self.port,
            username,
            password,
            timeout: self.timeout,
            terminal_width: platform.terminal_width,
            terminal_height: platform.terminal_height,
            host_key_verification: self.host_key_verification,
            known_hosts_path: self.known_hosts_path,
        };

        let pty_config = PtyConfig {
            timeout: self.timeout,
            ..PtyConfig::default()
        };

        GenericDriver::new(ssh_config, platform, pty_config, self.enable_secret)
    }
}
