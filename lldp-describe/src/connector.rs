//! Opening device sessions for update targets.

use std::future::Future;
use std::sync::Arc;

use log::debug;
use secrecy::ExposeSecret;

use crate::config::{Credentials, SessionSettings};
use crate::driver::{Driver, DriverBuilder, GenericDriver};
use crate::error::Result;
use crate::platform::Platform;

/// One device to update.
#[derive(Debug, Clone)]
pub struct DeviceTarget {
    pub address: String,
    pub platform: Platform,
    pub credentials: Arc<Credentials>,
}

impl DeviceTarget {
    pub fn new(address: impl Into<String>, credentials: Arc<Credentials>) -> Self {
        Self {
            address: address.into(),
            platform: Platform::CiscoIos,
            credentials,
        }
    }
}

/// Opens a ready-to-use [`Driver`] session for a target.
///
/// A returned driver is open and sitting at a prompt. Implementations close
/// anything they opened before returning an error.
pub trait Connector: Send + Sync + 'static {
    type Driver: Driver + 'static;

    fn connect(&self, target: &DeviceTarget) -> impl Future<Output = Result<Self::Driver>> + Send;
}

/// Connects over SSH with a [`GenericDriver`].
#[derive(Debug, Clone, Default)]
pub struct SshConnector {
    settings: SessionSettings,
}

impl SshConnector {
    pub fn new(settings: SessionSettings) -> Self {
        Self { settings }
    }

    pub fn settings(&self) -> &SessionSettings {
        &self.settings
    }

    fn builder(&self, target: &DeviceTarget) -> DriverBuilder {
        let credentials = &target.credentials;
        let mut builder = DriverBuilder::new(&target.address)
            .port(self.settings.port)
            .username(&credentials.username)
            .password(credentials.password.expose_secret())
            .platform(target.platform)
            .timeout(self.settings.timeout)
            .host_key_verification(self.settings.host_key_verification);

        if let Some(secret) = &credentials.enable_secret {
            builder = builder.enable_secret(secret.expose_secret());
        }
        if let Some(path) = &self.settings.known_hosts_path {
            builder = builder.known_hosts_path(path.clone());
        }
        builder
    }
}

impl Connector for SshConnector {
    type Driver = GenericDriver;

    async fn connect(&self, target: &DeviceTarget) -> Result<GenericDriver> {
        let mut driver = self.builder(target).build()?;

        if let Err(e) = driver.open().await {
            // SSH may be up with the shell stuck before the first prompt
            if driver.is_open() {
                if let Err(close_err) = driver.close().await {
                    debug!("{}: close after failed open: {}", target.address, close_err);
                }
            }
            return Err(e);
        }

        Ok(driver)
    }
}
