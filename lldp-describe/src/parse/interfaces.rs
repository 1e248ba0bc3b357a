//! `show interfaces status` parsing.

use std::fmt;
use std::sync::LazyLock;

use serde::{Deserialize, Serialize};

use super::{CompiledTemplate, compile, field, parse_records};
use crate::error::ParseError;

const TEMPLATE_NAME: &str = "cisco_ios_show_interfaces_status";
pub(super) static TEMPLATE: CompiledTemplate = LazyLock::new(|| {
    compile(include_str!(
        "../../templates/cisco_ios_show_interfaces_status.textfsm"
    ))
});

/// Operational status column of `show interfaces status`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PortStatus {
    Connected,
    Disabled,
    NotConnected,
    /// Any other status, verbatim (`err-disabled`, `inactive`, ...).
    Other(String),
}

impl PortStatus {
    /// Interpret the status column as printed by the device.
    pub fn from_device(raw: &str) -> Self {
        match raw.trim() {
            "connected" => PortStatus::Connected,
            "disabled" => PortStatus::Disabled,
            "notconnect" | "notconnected" => PortStatus::NotConnected,
            other => PortStatus::Other(other.to_string()),
        }
    }
}

impl fmt::Display for PortStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PortStatus::Connected => f.write_str("connected"),
            PortStatus::Disabled => f.write_str("disabled"),
            PortStatus::NotConnected => f.write_str("notconnect"),
            PortStatus::Other(raw) => f.write_str(raw),
        }
    }
}

/// One row of `show interfaces status`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InterfaceStatus {
    /// Short port name, e.g. `Gi1/0/1`.
    pub port: String,
    /// Current description, possibly empty.
    pub name: String,
    pub status: PortStatus,
    pub vlan: String,
    pub duplex: String,
    pub speed: String,
    pub media_type: String,
}

/// Parse `show interfaces status [vlan <id>]` output, rows in device order.
pub fn parse_interfaces_status(output: &str) -> Result<Vec<InterfaceStatus>, ParseError> {
    let records = parse_records(TEMPLATE_NAME, &TEMPLATE, output)?;

    Ok(records
        .iter()
        .map(|record| InterfaceStatus {
            port: field(record, "port"),
            name: field(record, "name"),
            status: PortStatus::from_device(&field(record, "status")),
            vlan: field(record, "vlan"),
            duplex: field(record, "duplex"),
            speed: field(record, "speed"),
            media_type: field(record, "type"),
        })
        .filter(|row| !row.port.is_empty())
        .collect())
}
