//! Per-device and per-interface outcomes of a run.

use std::fmt;
use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::Path;

use serde::Serialize;

/// Outcome of one device.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DeviceReport {
    pub address: String,
    #[serde(flatten)]
    pub outcome: DeviceOutcome,
}

impl DeviceReport {
    pub fn unreachable(address: impl Into<String>, error: impl fmt::Display) -> Self {
        Self {
            address: address.into(),
            outcome: DeviceOutcome::Unreachable {
                error: error.to_string(),
            },
        }
    }

    pub fn is_reachable(&self) -> bool {
        matches!(self.outcome, DeviceOutcome::Completed { .. })
    }

    /// Interface reports, empty for unreachable devices.
    pub fn interfaces(&self) -> &[InterfaceReport] {
        match &self.outcome {
            DeviceOutcome::Completed { interfaces, .. } => interfaces,
            DeviceOutcome::Unreachable { .. } => &[],
        }
    }

    pub fn saved(&self) -> bool {
        matches!(self.outcome, DeviceOutcome::Completed { saved: true, .. })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum DeviceOutcome {
    /// No usable session was established.
    Unreachable { error: String },

    /// A session was established and the update procedure ran.
    Completed {
        interfaces: Vec<InterfaceReport>,
        /// Whether the save-configuration command succeeded.
        saved: bool,
        /// First device-level failure: status query, lost session or save.
        #[serde(skip_serializing_if = "Option::is_none")]
        error: Option<String>,
    },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct InterfaceReport {
    pub port: String,
    pub status: String,
    pub result: InterfaceResult,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum InterfaceResult {
    Updated { description: String },
    SkippedDisabled,
    SkippedNotConnected,
    /// The LLDP query returned no neighbor name.
    NoNeighbor,
    /// The neighbor name is not usable as a description.
    RejectedName { name: String, reason: String },
    Failed { error: String },
}

/// Counts over all device reports of a run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct RunSummary {
    pub devices: usize,
    pub unreachable: usize,
    pub saved: usize,
    pub updated: usize,
    pub skipped: usize,
    pub no_neighbor: usize,
    pub rejected: usize,
    pub failed: usize,
}

impl RunSummary {
    pub fn from_reports(reports: &[DeviceReport]) -> Self {
        let mut summary = RunSummary {
            devices: reports.len(),
            ..RunSummary::default()
        };

        for report in reports {
            if !report.is_reachable() {
                summary.unreachable += 1;
            }
            if report.saved() {
                summary.saved += 1;
            }
            for interface in report.interfaces() {
                match interface.result {
                    InterfaceResult::Updated { .. } => summary.updated += 1,
                    InterfaceResult::SkippedDisabled | InterfaceResult::SkippedNotConnected => {
                        summary.skipped += 1
                    }
                    InterfaceResult::NoNeighbor => summary.no_neighbor += 1,
                    InterfaceResult::RejectedName { .. } => summary.rejected += 1,
                    InterfaceResult::Failed { .. } => summary.failed += 1,
                }
            }
        }

        summary
    }
}

impl fmt::Display for RunSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} devices ({} unreachable, {} saved); interfaces: {} updated, {} skipped, \
             {} without neighbor, {} rejected names, {} failed",
            self.devices,
            self.unreachable,
            self.saved,
            self.updated,
            self.skipped,
            self.no_neighbor,
            self.rejected,
            self.failed
        )
    }
}

#[derive(Serialize)]
struct RunReport<'a> {
    summary: &'a RunSummary,
    devices: &'a [DeviceReport],
}

/// Write the summary and all device reports as pretty-printed JSON.
pub fn write_json(path: impl AsRef<Path>, reports: &[DeviceReport]) -> io::Result<()> {
    let summary = RunSummary::from_reports(reports);
    let mut writer = BufWriter::new(File::create(path)?);
    serde_json::to_writer_pretty(
        &mut writer,
        &RunReport {
            summary: &summary,
            devices: reports,
        },
    )?;
    writer.write_all(b"\n")?;
    writer.flush()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn completed(interfaces: Vec<InterfaceReport>, saved: bool) -> DeviceReport {
        DeviceReport {
            address: "10.20.0.11".to_string(),
            outcome: DeviceOutcome::Completed {
                interfaces,
                saved,
                error: None,
            },
        }
    }

    fn interface(port: &str, result: InterfaceResult) -> InterfaceReport {
        InterfaceReport {
            port: port.to_string(),
            status: "connected".to_string(),
            result,
        }
    }

    #[test]
    fn test_summary_counts() {
        let reports = vec![
            completed(
                vec![
                    interface(
                        "Gi1/0/1",
                        InterfaceResult::Updated {
                            description: "AP-Floor3-12".to_string(),
                        },
                    ),
                    interface("Gi1/0/2", InterfaceResult::SkippedDisabled),
                    interface("Gi1/0/3", InterfaceResult::SkippedNotConnected),
                    interface("Gi1/0/4", InterfaceResult::NoNeighbor),
                ],
                true,
            ),
            completed(
                vec![interface(
                    "Gi1/0/1",
                    InterfaceResult::RejectedName {
                        name: "AP?".to_string(),
                        reason: "contains '?'".to_string(),
                    },
                )],
                false,
            ),
            DeviceReport::unreachable("10.20.0.13", "Connection refused"),
        ];

        let summary = RunSummary::from_reports(&reports);
        assert_eq!(summary.devices, 3);
        assert_eq!(summary.unreachable, 1);
        assert_eq!(summary.saved, 1);
        assert_eq!(summary.updated, 1);
        assert_eq!(summary.skipped, 2);
        assert_eq!(summary.no_neighbor, 1);
        assert_eq!(summary.rejected, 1);
        assert_eq!(summary.failed, 0);
    }

    #[test]
    fn test_json_shape() {
        let report = completed(
            vec![interface(
                "Gi1/0/1",
                InterfaceResult::Updated {
                    description: "AP-Floor3-12".to_string(),
                },
            )],
            true,
        );

        let value = serde_json::to_value(&report).unwrap();
        assert_eq!(value["address"], "10.20.0.11");
        assert_eq!(value["outcome"], "completed");
        assert_eq!(value["saved"], true);
        assert!(value.get("error").is_none());
        assert_eq!(value["interfaces"][0]["result"]["kind"], "updated");
        assert_eq!(
            value["interfaces"][0]["result"]["description"],
            "AP-Floor3-12"
        );

        let unreachable = DeviceReport::unreachable("10.20.0.13", "timed out");
        let value = serde_json::to_value(unreachable).unwrap();
        assert_eq!(value["outcome"], "unreachable");
        assert_eq!(value["error"], "timed out");
    }

    #[test]
    fn test_write_json() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("report.json");
        write_json(&path, &[DeviceReport::unreachable("10.20.0.13", "timed out")]).unwrap();

        let text = std::fs::read_to_string(&path).unwrap();
        let value: serde_json::Value = serde_json::from_str(&text).unwrap();
        assert_eq!(value["summary"]["devices"], 1);
        assert_eq!(value["summary"]["unreachable"], 1);
        assert_eq!(value["devices"][0]["address"], "10.20.0.13");
    }
}
