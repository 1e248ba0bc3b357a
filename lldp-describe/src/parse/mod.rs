//! Structured parsing of CLI output with TextFSM templates.
//!
//! Templates are embedded at build time and compiled once, on first use, by
//! `textfsm-rust`; the string records it produces are turned into typed rows.

pub mod interfaces;
pub mod lldp;

pub use interfaces::{InterfaceStatus, PortStatus, parse_interfaces_status};
pub use lldp::{LldpNeighbor, parse_lldp_neighbors};

use std::collections::HashMap;
use std::sync::LazyLock;

use textfsm_rust::Template;

use crate::error::ParseError;

/// One TextFSM record with lower-cased value names.
pub(crate) type Record = HashMap<String, String>;

/// A compiled template, or the reason it failed to compile.
pub(crate) type CompiledTemplate = LazyLock<Result<Template, String>>;

pub(crate) fn compile(source: &str) -> Result<Template, String> {
    Template::parse_str(source).map_err(|e| e.to_string())
}

/// Run `output` through the named template.
pub(crate) fn parse_records(
    name: &'static str,
    template: &CompiledTemplate,
    output: &str,
) -> Result<Vec<Record>, ParseError> {
    let template = LazyLock::force(template)
        .as_ref()
        .map_err(|message| ParseError::Template {
            template: name,
            message: message.clone(),
        })?;

    let mut parser = template.parser();
    let records = parser
        .parse_text_to_dicts(output)
        .map_err(|e| ParseError::Output {
            template: name,
            message: e.to_string(),
        })?;

    Ok(records
        .into_iter()
        .map(|record| {
            record
                .into_iter()
                .map(|(key, value)| (key.to_ascii_lowercase(), value))
                .collect()
        })
        .collect())
}

/// Trimmed value of a field, empty when the template left it unset.
pub(crate) fn field(record: &Record, name: &str) -> String {
    record
        .get(name)
        .map(|value| value.trim().to_string())
        .unwrap_or_default()
}
