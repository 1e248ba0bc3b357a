//! Scripted in-memory devices for updater and dispatcher tests.

#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use lldp_describe::connector::{Connector, DeviceTarget};
use lldp_describe::driver::{Driver, Response};
use lldp_describe::error::{ChannelError, DriverError, Result, TransportError};

pub const STATUS_COMMAND: &str = "show interfaces status vlan 920";
pub const SAVE_COMMAND: &str = "write memory";

pub const STATUS_HEADER: &str =
    "Port      Name               Status       Vlan       Duplex  Speed Type\n";

pub const LLDP_HEADER: &str = "\
Capability codes:
    (R) Router, (B) Bridge, (T) Telephone, (C) DOCSIS Cable Device
    (W) WLAN Access Point, (P) Repeater, (S) Station, (O) Other

Device ID           Local Intf     Hold-time  Capability      Port ID
";

/// `show interfaces status` output with one row per `(port, status)`.
pub fn status_output(rows: &[(&str, &str)]) -> String {
    let mut output = STATUS_HEADER.to_string();
    for (port, status) in rows {
        output.push_str(&format!(
            "{port:<10}                   {status:<12} 920          auto   auto 10/100/1000BaseTX\n"
        ));
    }
    output
}

/// `show lldp neighbors <port>` output with a single neighbor.
pub fn lldp_output(neighbor: &str, port: &str) -> String {
    format!(
        "{LLDP_HEADER}{neighbor:<20}{port:<15}120        B,R             Gi0\n\n\
         Total entries displayed: 1\n"
    )
}

/// `show lldp neighbors <port>` output without neighbors.
pub fn lldp_empty() -> String {
    format!("{LLDP_HEADER}\nTotal entries displayed: 0\n")
}

/// Something a mock device was asked to do.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    Privilege(String),
    Command(String),
    Config(Vec<String>),
    Close,
}

/// How one mock device behaves.
#[derive(Debug, Clone, Default)]
pub struct DeviceScript {
    pub unreachable: bool,
    pub fail_escalate: bool,
    /// Output per command; unknown commands return empty output.
    pub outputs: HashMap<String, String>,
    /// Commands answered with an IOS error marker.
    pub rejected: Vec<String>,
    /// Command on which the session drops.
    pub drop_on: Option<String>,
    /// Configuration lines the switch refuses.
    pub rejected_config: Vec<String>,
    /// Configuration line on which the session drops.
    pub drop_on_config: Option<String>,
}

impl DeviceScript {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn unreachable() -> Self {
        Self {
            unreachable: true,
            ..Self::default()
        }
    }

    pub fn output(mut self, command: impl Into<String>, output: impl Into<String>) -> Self {
        self.outputs.insert(command.into(), output.into());
        self
    }

    pub fn status(self, rows: &[(&str, &str)]) -> Self {
        self.output(STATUS_COMMAND, status_output(rows))
    }

    pub fn neighbor(self, port: &str, neighbor: &str) -> Self {
        self.output(format!("show lldp neighbors {port}"), lldp_output(neighbor, port))
    }

    pub fn no_neighbor(self, port: &str) -> Self {
        self.output(format!("show lldp neighbors {port}"), lldp_empty())
    }

    pub fn reject(mut self, command: impl Into<String>) -> Self {
        self.rejected.push(command.into());
        self
    }

    pub fn drop_on(mut self, command: impl Into<String>) -> Self {
        self.drop_on = Some(command.into());
        self
    }

    pub fn reject_config(mut self, line: impl Into<String>) -> Self {
        self.rejected_config.push(line.into());
        self
    }

    pub fn drop_on_config(mut self, line: impl Into<String>) -> Self {
        self.drop_on_config = Some(line.into());
        self
    }

    pub fn fail_escalate(mut self) -> Self {
        self.fail_escalate = true;
        self
    }
}

/// Tracks how many sessions are open at once.
#[derive(Debug, Default)]
pub struct Gauge {
    current: AtomicUsize,
    peak: AtomicUsize,
}

impl Gauge {
    fn enter(&self) {
        let now = self.current.fetch_add(1, Ordering::SeqCst) + 1;
        self.peak.fetch_max(now, Ordering::SeqCst);
    }

    fn leave(&self) {
        self.current.fetch_sub(1, Ordering::SeqCst);
    }

    pub fn current(&self) -> usize {
        self.current.load(Ordering::SeqCst)
    }

    pub fn peak(&self) -> usize {
        self.peak.load(Ordering::SeqCst)
    }
}

type EventLog = Arc<Mutex<Vec<(String, Event)>>>;

#[derive(Clone, Default)]
pub struct MockConnector {
    scripts: Arc<HashMap<String, DeviceScript>>,
    events: EventLog,
    gauge: Arc<Gauge>,
    connect_delay: Duration,
}

impl MockConnector {
    pub fn new(scripts: impl IntoIterator<Item = (&'static str, DeviceScript)>) -> Self {
        Self {
            scripts: Arc::new(
                scripts
                    .into_iter()
                    .map(|(address, script)| (address.to_string(), script))
                    .collect(),
            ),
            ..Self::default()
        }
    }

    /// Hold every session open a little so overlapping tasks are observable.
    pub fn with_connect_delay(mut self, delay: Duration) -> Self {
        self.connect_delay = delay;
        self
    }

    pub fn gauge(&self) -> Arc<Gauge> {
        Arc::clone(&self.gauge)
    }

    /// Events recorded for one device, in order.
    pub fn events(&self, address: &str) -> Vec<Event> {
        self.events
            .lock()
            .unwrap()
            .iter()
            .filter(|(a, _)| a == address)
            .map(|(_, e)| e.clone())
            .collect()
    }

    /// Addresses that were connected to, in connection order.
    pub fn connected(&self) -> Vec<String> {
        let events = self.events.lock().unwrap();
        let mut seen = Vec::new();
        for (address, _) in events.iter() {
            if !seen.contains(address) {
                seen.push(address.clone());
            }
        }
        seen
    }

    pub fn configs(&self, address: &str) -> Vec<Vec<String>> {
        self.events(address)
            .into_iter()
            .filter_map(|e| match e {
                Event::Config(lines) => Some(lines),
                _ => None,
            })
            .collect()
    }

    pub fn count_command(&self, address: &str, command: &str) -> usize {
        self.events(address)
            .iter()
            .filter(|e| matches!(e, Event::Command(c) if c == command))
            .count()
    }
}

impl Connector for MockConnector {
    type Driver = MockDriver;

    async fn connect(&self, target: &DeviceTarget) -> Result<MockDriver> {
        let script = self.scripts.get(&target.address).cloned().unwrap_or_default();
        if script.unreachable {
            return Err(TransportError::Timeout(Duration::from_secs(30)).into());
        }

        self.gauge.enter();
        if !self.connect_delay.is_zero() {
            tokio::time::sleep(self.connect_delay).await;
        }

        Ok(MockDriver {
            address: target.address.clone(),
            script,
            events: Arc::clone(&self.events),
            gauge: Arc::clone(&self.gauge),
            open: true,
            dropped: false,
            privilege: "exec".to_string(),
        })
    }
}

pub struct MockDriver {
    address: String,
    script: DeviceScript,
    events: EventLog,
    gauge: Arc<Gauge>,
    open: bool,
    /// Set once the scripted session has gone away; every later command fails.
    dropped: bool,
    privilege: String,
}

impl MockDriver {
    fn record(&self, event: Event) {
        self.events
            .lock()
            .unwrap()
            .push((self.address.clone(), event));
    }
}

impl Driver for MockDriver {
    async fn open(&mut self) -> Result<()> {
        Ok(())
    }

    async fn close(&mut self) -> Result<()> {
        if self.open {
            self.open = false;
            self.gauge.leave();
            self.record(Event::Close);
        }
        Ok(())
    }

    async fn send_command(&mut self, command: &str) -> Result<Response> {
        if !self.open {
            return Err(DriverError::NotConnected.into());
        }
        self.record(Event::Command(command.to_string()));

        if self.dropped || self.script.drop_on.as_deref() == Some(command) {
            self.dropped = true;
            return Err(ChannelError::Closed.into());
        }

        let prompt = "asw-b2-01#";
        if self.script.rejected.iter().any(|c| c == command) {
            let output = "% Invalid input detected at '^' marker.";
            return Ok(Response::failed(
                command,
                output,
                output,
                prompt,
                Duration::ZERO,
                "% Invalid input detected",
            ));
        }

        let output = self.script.outputs.get(command).cloned().unwrap_or_default();
        Ok(Response::new(command, output.clone(), output, prompt, Duration::ZERO))
    }

    async fn send_config(&mut self, commands: &[&str]) -> Result<Vec<Response>> {
        if !self.open {
            return Err(DriverError::NotConnected.into());
        }
        self.record(Event::Config(commands.iter().map(|c| c.to_string()).collect()));
        if self.dropped {
            return Err(ChannelError::Closed.into());
        }

        let prompt = "asw-b2-01(config-if)#";
        let mut responses = Vec::with_capacity(commands.len());
        for line in commands {
            if self.script.drop_on_config.as_deref() == Some(*line) {
                self.dropped = true;
                return Err(ChannelError::Closed.into());
            }
            if self.script.rejected_config.iter().any(|l| l == line) {
                let output = "% Invalid input detected at '^' marker.";
                responses.push(Response::failed(
                    *line,
                    output,
                    output,
                    prompt,
                    Duration::ZERO,
                    "% Invalid input detected",
                ));
                break;
            }
            responses.push(Response::new(*line, "", "", prompt, Duration::ZERO));
        }
        Ok(responses)
    }

    async fn acquire_privilege(&mut self, privilege: &str) -> Result<()> {
        self.record(Event::Privilege(privilege.to_string()));
        if self.script.fail_escalate {
            return Err(DriverError::PrivilegeAcquisitionFailed {
                target: privilege.to_string(),
            }
            .into());
        }
        self.privilege = privilege.to_string();
        Ok(())
    }

    fn is_open(&self) -> bool {
        self.open
    }

    fn current_privilege(&self) -> Option<&str> {
        Some(&self.privilege)
    }
}
