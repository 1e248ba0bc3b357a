//! Switch sessions.
//!
//! [`Driver`] is what the updater talks to. [`GenericDriver`] implements it
//! over an SSH shell: every read ends at a recognized prompt, and the prompt
//! it ends on tells the [`PrivilegeManager`] which mode the switch is in.

mod builder;
mod generic;
mod privilege;
mod response;

pub use builder::DriverBuilder;
pub use generic::GenericDriver;
pub use privilege::{PrivilegeManager, TransitionInfo};
pub use response::Response;

use std::future::Future;

use crate::error::Result;

/// A CLI session on one switch.
///
/// `Err` means the session itself is in trouble (closed, timed out, prompt
/// never came back). A command the switch refused is still `Ok`, with a
/// [`Response`] whose `failure_message` holds the `%` error line.
pub trait Driver: Send + Sync {
    /// Log in and land on the first prompt, then run the platform's
    /// on-open commands (`terminal length 0`).
    fn open(&mut self) -> impl Future<Output = Result<()>> + Send;

    /// Drop the shell and the SSH link. Safe to call twice.
    fn close(&mut self) -> impl Future<Output = Result<()>> + Send;

    /// Run one line in the current mode and collect its output up to the
    /// next prompt, with the echo and prompt stripped.
    fn send_command(&mut self, command: &str) -> impl Future<Output = Result<Response>> + Send;

    /// Enter `configure terminal`, send `commands` in order and `end`.
    ///
    /// The first refused line stops the batch and its response is the last
    /// one returned. The session is back in privileged EXEC either way.
    fn send_config(
        &mut self,
        commands: &[&str],
    ) -> impl Future<Output = Result<Vec<Response>>> + Send;

    /// Walk the mode tree to `privilege`, answering the enable password
    /// prompt on the way up.
    fn acquire_privilege(&mut self, privilege: &str) -> impl Future<Output = Result<()>> + Send;

    fn is_open(&self) -> bool;

    /// Mode of the last prompt seen, if it was recognized.
    fn current_privilege(&self) -> Option<&str>;
}
