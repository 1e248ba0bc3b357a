//! # lldp-describe
//!
//! Label access-switch ports with the name of the device plugged into them.
//!
//! For every switch in a device list, lldp-describe logs in over SSH, lists
//! the interfaces of one VLAN, looks up each live interface's LLDP neighbor
//! and writes the neighbor's name into the interface description. The
//! configuration is saved once per switch.
//!
//! ## Features
//!
//! - Async SSH sessions via russh, with known_hosts checking
//! - Prompt-driven PTY channel with tail-only pattern search
//! - Privilege level navigation (`enable`, `configure terminal`)
//! - TextFSM parsing of `show` output
//! - Bounded concurrent fan-out over devices
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use lldp_describe::{Credentials, Dispatcher, SshConnector, UpdateSettings};
//! use lldp_describe::config::SessionSettings;
//! use secrecy::SecretString;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), lldp_describe::Error> {
//!     let addresses = lldp_describe::input::load_addresses("input.csv")?;
//!     let credentials = Credentials::new("netops", SecretString::from("secret".to_string()));
//!
//!     let dispatcher = Dispatcher::new(
//!         SshConnector::new(SessionSettings::default()),
//!         credentials,
//!         UpdateSettings { vlan: 920 },
//!     )
//!     .with_max_concurrency(16);
//!
//!     for report in dispatcher.run(&addresses).await {
//!         println!("{}: saved={}", report.address, report.saved());
//!     }
//!     Ok(())
//! }
//! ```

pub mod channel;
pub mod config;
pub mod connector;
pub mod dispatch;
pub mod driver;
pub mod error;
pub mod input;
pub mod parse;
pub mod platform;
pub mod report;
pub mod transport;
pub mod updater;

// Re-export main types for convenience
pub use config::{Credentials, RunConfig, SessionSettings};
pub use connector::{Connector, DeviceTarget, SshConnector};
pub use dispatch::Dispatcher;
pub use driver::{Driver, DriverBuilder, GenericDriver, Response};
pub use error::{Error, UpdateError};
pub use platform::{ModeLink, Platform, PlatformDefinition, PrivilegeLevel};
pub use report::{DeviceOutcome, DeviceReport, InterfaceReport, InterfaceResult, RunSummary};
pub use transport::{HostKeyVerification, SshConfig};
pub use updater::{UpdateSettings, update_device, validate_description};
