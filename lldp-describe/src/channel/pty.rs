//! PTY channel for interactive device sessions.

use std::time::Duration;

use log::trace;
use regex::bytes::Regex;
use russh::client::Msg;
use russh::{Channel, ChannelMsg};

use super::buffer::PatternBuffer;
use crate::error::{ChannelError, Result};

/// Configuration for PTY channel behavior.
#[derive(Debug, Clone)]
pub struct PtyConfig {
    /// Read timeout for a single prompt wait.
    pub timeout: Duration,

    /// Search depth for pattern matching.
    pub search_depth: usize,
}

impl Default for PtyConfig {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(30),
            search_depth: 1000,
        }
    }
}

/// Interactive shell channel with pattern-terminated reads.
pub struct PtyChannel {
    channel: Channel<Msg>,
    buffer: PatternBuffer,
    timeout: Duration,
}

impl PtyChannel {
    /// Wrap an SSH channel that already has a PTY and shell.
    pub fn new(channel: Channel<Msg>, config: PtyConfig) -> Self {
        Self {
            channel,
            buffer: PatternBuffer::new(config.search_depth),
            timeout: config.timeout,
        }
    }

    /// Send one line of input followed by a newline.
    pub async fn send(&mut self, input: &str) -> Result<()> {
        let mut line = Vec::with_capacity(input.len() + 1);
        line.extend_from_slice(input.as_bytes());
        line.push(b'\n');

        self.channel
            .data(&line[..])
            .await
            .map_err(ChannelError::Ssh)?;
        Ok(())
    }

    /// Read until `pattern` matches the buffer tail, returning everything
    /// received up to that point.
    pub async fn read_until(&mut self, pattern: &Regex) -> Result<Vec<u8>> {
        let deadline = tokio::time::Instant::now() + self.timeout;

        loop {
            if self.buffer.tail_contains(pattern) {
                return Ok(self.buffer.take());
            }

            let msg = tokio::time::timeout_at(deadline, self.channel.wait())
                .await
                .map_err(|_| ChannelError::PatternTimeout(self.timeout))?;

            match msg {
                Some(ChannelMsg::Data { ref data }) => {
                    trace!("channel read {} bytes", data.len());
                    self.buffer.extend(data);
                }
                Some(ChannelMsg::ExtendedData { ref data, .. }) => {
                    self.buffer.extend(data);
                }
                Some(ChannelMsg::Eof) | Some(ChannelMsg::Close) | None => {
                    return Err(ChannelError::Closed.into());
                }
                Some(_) => {}
            }
        }
    }

    /// Close the channel.
    pub async fn close(self) -> Result<()> {
        // The device may already have torn the channel down after `exit`.
        let _ = self.channel.eof().await;
        self.channel.close().await.map_err(ChannelError::Ssh)?;
        Ok(())
    }
}
