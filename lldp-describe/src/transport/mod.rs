//! SSH transport layer wrapping russh.
//!
//! Connection setup, host-key verification, password authentication and
//! PTY shell channel creation.

pub mod config;
mod ssh;

pub use config::{HostKeyVerification, SshConfig};
pub use ssh::SshTransport;
