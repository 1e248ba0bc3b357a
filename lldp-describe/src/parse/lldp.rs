//! `show lldp neighbors` parsing.

use std::sync::LazyLock;

use serde::{Deserialize, Serialize};

use super::{CompiledTemplate, compile, field, parse_records};
use crate::error::ParseError;

const TEMPLATE_NAME: &str = "cisco_ios_show_lldp_neighbors";
pub(super) static TEMPLATE: CompiledTemplate = LazyLock::new(|| {
    compile(include_str!(
        "../../templates/cisco_ios_show_lldp_neighbors.textfsm"
    ))
});

/// One row of `show lldp neighbors`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LldpNeighbor {
    /// System name advertised by the neighbor; empty when it sent none.
    pub neighbor: String,
    pub local_interface: String,
    pub capabilities: String,
    pub neighbor_interface: String,
}

impl LldpNeighbor {
    /// The neighbor's name, if it advertised one.
    pub fn name(&self) -> Option<&str> {
        Some(self.neighbor.as_str()).filter(|name| !name.is_empty())
    }
}

/// Parse `show lldp neighbors [<interface>]` output, rows in device order.
pub fn parse_lldp_neighbors(output: &str) -> Result<Vec<LldpNeighbor>, ParseError> {
    let records = parse_records(TEMPLATE_NAME, &TEMPLATE, output)?;

    Ok(records
        .iter()
        .map(|record| LldpNeighbor {
            neighbor: field(record, "neighbor"),
            local_interface: field(record, "local_interface"),
            capabilities: field(record, "capabilities"),
            neighbor_interface: field(record, "neighbor_interface"),
        })
        .filter(|row| !row.neighbor.is_empty())
        .collect())
}
