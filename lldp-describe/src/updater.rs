//! Per-device update: label VLAN access ports with their LLDP neighbor.
//!
//! For one device the updater:
//! 1. Opens a session and enters privileged EXEC mode
//! 2. Lists the interfaces of the target VLAN
//! 3. Sets each live interface's description to its LLDP neighbor's name
//! 4. Saves the configuration once and closes the session
//!
//! Every outcome ends up in the returned [`DeviceReport`]; nothing is
//! propagated to the caller as an error.

use log::{debug, error, info, warn};

use crate::config::DEFAULT_VLAN;
use crate::connector::{Connector, DeviceTarget};
use crate::driver::{Driver, Response};
use crate::error::UpdateError;
use crate::parse::{InterfaceStatus, PortStatus, parse_interfaces_status, parse_lldp_neighbors};
use crate::report::{DeviceOutcome, DeviceReport, InterfaceReport, InterfaceResult};

/// Longest description IOS accepts on an interface.
pub const MAX_DESCRIPTION_LEN: usize = 200;

/// What to change on each device.
#[derive(Debug, Clone)]
pub struct UpdateSettings {
    pub vlan: u16,
}

impl Default for UpdateSettings {
    fn default() -> Self {
        Self { vlan: DEFAULT_VLAN }
    }
}

/// Check that a neighbor name can be pushed verbatim as a description.
///
/// Names are never rewritten: an unusable name is rejected with a reason.
pub fn validate_description(name: &str) -> Result<(), String> {
    if name.is_empty() {
        return Err("empty name".to_string());
    }
    if let Some(c) = name.chars().find(|c| !(c.is_ascii_graphic() || *c == ' ')) {
        return Err(format!("contains non-printable or non-ASCII character {c:?}"));
    }
    if name.contains('?') {
        return Err("contains '?'".to_string());
    }
    if name.len() > MAX_DESCRIPTION_LEN {
        return Err(format!(
            "longer than {MAX_DESCRIPTION_LEN} characters ({})",
            name.len()
        ));
    }
    Ok(())
}

/// Run the whole update procedure against one device.
pub async fn update_device<C: Connector>(
    connector: &C,
    target: &DeviceTarget,
    settings: &UpdateSettings,
) -> DeviceReport {
    let address = target.address.as_str();

    debug!("Connecting to {address}");
    let mut driver = match connector.connect(target).await {
        Ok(driver) => driver,
        Err(e) => {
            let e = UpdateError::Connect(e);
            error!("{address}: {e}");
            return DeviceReport::unreachable(address, e);
        }
    };

    if let Err(e) = driver
        .acquire_privilege(target.platform.default_privilege())
        .await
    {
        let e = UpdateError::Escalate(e);
        error!("{address}: {e}");
        close_session(&mut driver, address).await;
        return DeviceReport::unreachable(address, e);
    }

    let mut interfaces = Vec::new();
    let mut device_error = None;

    match query_interfaces(&mut driver, settings.vlan).await {
        Ok(records) => {
            debug!(
                "{address}: {} interfaces in VLAN {}",
                records.len(),
                settings.vlan
            );
            for record in &records {
                let outcome = update_interface(&mut driver, address, record).await;
                let (result, lost_session) = match outcome {
                    Ok(result) => (result, false),
                    Err(e) => {
                        error!("{address}: {}: {e}", record.port);
                        let lost = e.is_session_error();
                        if lost {
                            device_error.get_or_insert_with(|| e.to_string());
                        }
                        (InterfaceResult::Failed { error: e.to_string() }, lost)
                    }
                };
                interfaces.push(InterfaceReport {
                    port: record.port.clone(),
                    status: record.status.to_string(),
                    result,
                });
                if lost_session {
                    warn!("{address}: session lost, remaining interfaces not updated");
                    break;
                }
            }
        }
        Err(e) => {
            error!("{address}: {e}");
            device_error = Some(e.to_string());
        }
    }

    let saved = match save_configuration(&mut driver, target.platform.save_command()).await {
        Ok(()) => {
            info!("{address}: configuration saved");
            true
        }
        Err(e) => {
            error!("{address}: {e}");
            device_error.get_or_insert_with(|| e.to_string());
            false
        }
    };

    close_session(&mut driver, address).await;

    DeviceReport {
        address: address.to_string(),
        outcome: DeviceOutcome::Completed {
            interfaces,
            saved,
            error: device_error,
        },
    }
}

async fn query_interfaces<D: Driver>(
    driver: &mut D,
    vlan: u16,
) -> Result<Vec<InterfaceStatus>, UpdateError> {
    let command = format!("show interfaces status vlan {vlan}");
    let response = driver
        .send_command(&command)
        .await
        .map_err(UpdateError::StatusQuery)?;
    check_response(&response)?;

    parse_interfaces_status(&response.result).map_err(|e| UpdateError::StatusQuery(e.into()))
}

async fn update_interface<D: Driver>(
    driver: &mut D,
    address: &str,
    record: &InterfaceStatus,
) -> Result<InterfaceResult, UpdateError> {
    let port = record.port.as_str();

    match record.status {
        PortStatus::Disabled => {
            warn!("{address}: {port} is disabled, skipping");
            return Ok(InterfaceResult::SkippedDisabled);
        }
        PortStatus::NotConnected => {
            warn!("{address}: {port} is not connected, skipping");
            return Ok(InterfaceResult::SkippedNotConnected);
        }
        PortStatus::Connected | PortStatus::Other(_) => {}
    }

    let command = format!("show lldp neighbors {port}");
    let response = driver
        .send_command(&command)
        .await
        .map_err(UpdateError::NeighborQuery)?;
    check_response(&response)?;

    let neighbors =
        parse_lldp_neighbors(&response.result).map_err(|e| UpdateError::NeighborQuery(e.into()))?;

    let Some(name) = neighbors.first().and_then(|n| n.name()) else {
        error!("{address}: no LLDP neighbor on {port}");
        return Ok(InterfaceResult::NoNeighbor);
    };
    let name = name.to_string();

    if let Err(reason) = validate_description(&name) {
        error!("{address}: {port}: refusing neighbor name {name:?}: {reason}");
        return Ok(InterfaceResult::RejectedName { name, reason });
    }

    let interface_line = format!("interface {port}");
    let description_line = format!("description {name}");
    let responses = driver
        .send_config(&[interface_line.as_str(), description_line.as_str()])
        .await
        .map_err(UpdateError::Push)?;
    for response in &responses {
        check_response(response)?;
    }

    info!("{address}: {port} description set to '{name}'");
    Ok(InterfaceResult::Updated { description: name })
}

async fn save_configuration<D: Driver>(driver: &mut D, command: &str) -> Result<(), UpdateError> {
    let response = driver.send_command(command).await.map_err(UpdateError::Save)?;
    check_response(&response)
}

fn check_response(response: &Response) -> Result<(), UpdateError> {
    match &response.failure_message {
        None => Ok(()),
        Some(message) => Err(UpdateError::Rejected {
            command: response.command.clone(),
            message: message.clone(),
        }),
    }
}

async fn close_session<D: Driver>(driver: &mut D, address: &str) {
    match driver.close().await {
        Ok(()) => debug!("{address}: session closed"),
        Err(e) => warn!("{address}: error closing session: {e}"),
    }
}
