//! SSH driver implementation.

use std::time::Instant;

use log::{debug, trace};
use regex::bytes::Regex;
use secrecy::{ExposeSecret, SecretString};

use super::Driver;
use super::privilege::PrivilegeManager;
use super::response::{Response, normalize_output, trailing_prompt};
use crate::channel::{PtyChannel, PtyConfig};
use crate::error::{ChannelError, DriverError, Result};
use crate::platform::PlatformDefinition;
use crate::transport::{SshConfig, SshTransport};

/// Driver for a device reached over an SSH PTY shell.
///
/// Handles:
/// - SSH transport and shell channel management
/// - Command execution with prompt detection
/// - Privilege level navigation, including the `enable` password prompt
/// - Failure detection from the platform's error markers
pub struct GenericDriver {
    ssh_config: SshConfig,
    platform: PlatformDefinition,
    pty_config: PtyConfig,

    /// Secret for `enable`; the login password is used when unset.
    enable_secret: Option<SecretString>,

    /// SSH transport (None when disconnected).
    transport: Option<SshTransport>,

    /// Interactive shell (None when disconnected).
    channel: Option<PtyChannel>,

    privilege_manager: PrivilegeManager,

    /// Combined prompt pattern for all privilege levels.
    prompt_pattern: Regex,
}

impl GenericDriver {
    /// Create a new, unconnected driver.
    pub fn new(
        ssh_config: SshConfig,
        platform: PlatformDefinition,
        pty_config: PtyConfig,
        enable_secret: Option<SecretString>,
    ) -> Result<Self> {
        let prompt_pattern =
            Regex::new(&platform.combined_prompt_pattern()).map_err(ChannelError::InvalidPattern)?;
        let privilege_manager = PrivilegeManager::new(platform.privilege_levels.clone());

        Ok(Self {
            ssh_config,
            platform,
            pty_config,
            enable_secret,
            transport: None,
            channel: None,
            privilege_manager,
            prompt_pattern,
        })
    }

    /// Get a reference to the platform definition.
    pub fn platform(&self) -> &PlatformDefinition {
        &self.platform
    }

    /// Host this driver connects to.
    pub fn host(&self) -> &str {
        &self.ssh_config.host
    }

    /// Read until any privilege prompt, returning the lossy text.
    async fn read_until_prompt(&mut self) -> Result<String> {
        let channel = self.channel.as_mut().ok_or(DriverError::NotConnected)?;
        let data = channel.read_until(&self.prompt_pattern).await?;
        Ok(String::from_utf8_lossy(&data).into_owned())
    }

    /// Send a transition command and return the prompt it lands on.
    ///
    /// When `auth_prompt` is given and the device asks for a password, the
    /// enable secret is sent.
    async fn send_transition(
        &mut self,
        command: &str,
        auth_prompt: Option<&Regex>,
    ) -> Result<String> {
        let channel = self.channel.as_mut().ok_or(DriverError::NotConnected)?;
        channel.send(command).await?;

        let Some(auth) = auth_prompt else {
            let data = channel.read_until(&self.prompt_pattern).await?;
            return Ok(trailing_prompt(&String::from_utf8_lossy(&data)));
        };

        let either = Regex::new(&format!(
            "(?:{})|(?:{})",
            auth.as_str(),
            self.prompt_pattern.as_str()
        ))
        .map_err(ChannelError::InvalidPattern)?;

        let data = channel.read_until(&either).await?;
        if !auth.is_match(&data) {
            return Ok(trailing_prompt(&String::from_utf8_lossy(&data)));
        }

        trace!("{}: answering password prompt for '{}'", self.ssh_config.host, command);
        let secret = self
            .enable_secret
            .as_ref()
            .unwrap_or(&self.ssh_config.password);
        channel.send(secret.expose_secret()).await?;

        let data = channel.read_until(&either).await?;
        if auth.is_match(&data) {
            // Asked again: the secret was refused
            return Err(DriverError::PrivilegeAcquisitionFailed {
                target: command.to_string(),
            }
            .into());
        }
        Ok(trailing_prompt(&String::from_utf8_lossy(&data)))
    }
}

impl Driver for GenericDriver {
    async fn open(&mut self) -> Result<()> {
        if self.transport.is_some() {
            return Err(DriverError::AlreadyConnected.into());
        }

        let transport = SshTransport::connect(&self.ssh_config).await?;
        let channel = match transport.open_channel().await {
            Ok(channel) => channel,
            Err(e) => {
                let _ = transport.close().await;
                return Err(e);
            }
        };
        self.transport = Some(transport);
        self.channel = Some(PtyChannel::new(channel, self.pty_config.clone()));

        let banner = self.read_until_prompt().await?;
        let prompt = trailing_prompt(&banner);
        let level = self.privilege_manager.observe_prompt(&prompt);
        debug!(
            "{}: session open at prompt {:?} ({})",
            self.ssh_config.host,
            prompt,
            level.as_deref().unwrap_or("unknown level")
        );

        for cmd in self.platform.on_open_commands.clone() {
            self.send_command(&cmd).await?;
        }

        Ok(())
    }

    async fn close(&mut self) -> Result<()> {
        if let Some(channel) = self.channel.take() {
            if let Err(e) = channel.close().await {
                debug!("{}: channel close: {}", self.ssh_config.host, e);
            }
        }
        if let Some(transport) = self.transport.take() {
            transport.close().await?;
            debug!("{}: session closed", self.ssh_config.host);
        }
        Ok(())
    }

    async fn send_command(&mut self, command: &str) -> Result<Response> {
        let start = Instant::now();

        let channel = self.channel.as_mut().ok_or(DriverError::NotConnected)?;
        channel.send(command).await?;
        let data = channel.read_until(&self.prompt_pattern).await?;

        let elapsed = start.elapsed();
        let raw_result = String::from_utf8_lossy(&data).into_owned();
        let prompt = trailing_prompt(&raw_result);
        self.privilege_manager.observe_prompt(&prompt);

        let result = normalize_output(&raw_result, command);
        trace!(
            "{}: '{}' returned {} bytes in {:?}",
            self.ssh_config.host,
            command,
            result.len(),
            elapsed
        );

        if let Some(failure) = self.platform.detect_failure(&result) {
            return Ok(Response::failed(
                command, result, raw_result, prompt, elapsed, failure,
            ));
        }

        Ok(Response::new(command, result, raw_result, prompt, elapsed))
    }

    async fn send_config(&mut self, commands: &[&str]) -> Result<Vec<Response>> {
        let config_privilege = self.platform.config_privilege.clone();
        let default_privilege = self.platform.default_privilege.clone();

        self.acquire_privilege(&config_privilege).await?;

        let mut responses = Vec::with_capacity(commands.len());
        let mut outcome = Ok(());
        for cmd in commands {
            match self.send_command(cmd).await {
                Ok(response) => {
                    let rejected = !response.is_success();
                    responses.push(response);
                    if rejected {
                        break;
                    }
                }
                Err(e) => {
                    outcome = Err(e);
                    break;
                }
            }
        }

        outcome?;
        self.acquire_privilege(&default_privilege).await?;
        Ok(responses)
    }

    async fn acquire_privilege(&mut self, target: &str) -> Result<()> {
        let current = self
            .privilege_manager
            .current()
            .map(|l| l.name.clone())
            .unwrap_or_default();

        if current == target {
            return Ok(());
        }

        let path = self.privilege_manager.find_path(&current, target)?;

        for step in path.windows(2) {
            let (from, to) = (&step[0], &step[1]);

            let transition = self
                .privilege_manager
                .get_transition(from, to)
                .ok_or_else(|| DriverError::NoPrivilegePath {
                    from: from.clone(),
                    to: to.clone(),
                })?;

            debug!(
                "{}: {} -> {} via '{}'",
                self.ssh_config.host, from, to, transition.command
            );

            let prompt = self
                .send_transition(&transition.command, transition.auth_prompt.as_ref())
                .await?;

            let reached = self.privilege_manager.observe_prompt(&prompt);
            if reached.as_deref() != Some(to.as_str()) {
                return Err(DriverError::PrivilegeAcquisitionFailed { target: to.clone() }.into());
            }
        }

        Ok(())
    }

    fn is_open(&self) -> bool {
        self.transport.is_some()
    }

    fn current_privilege(&self) -> Option<&str> {
        self.privilege_manager.current().map(|l| l.name.as_str())
    }
}
