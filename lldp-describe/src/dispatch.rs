//! Concurrent fan-out of device updates.

use std::sync::Arc;

use log::{debug, error, info};
use tokio::sync::Semaphore;
use tokio::task::JoinSet;

use crate::config::{Credentials, DEFAULT_MAX_CONCURRENCY};
use crate::connector::{Connector, DeviceTarget};
use crate::report::DeviceReport;
use crate::updater::{UpdateSettings, update_device};

/// Runs one update task per device, at most `max_concurrency` at a time.
///
/// Devices are independent: a failed or panicking task only affects its
/// own report.
pub struct Dispatcher<C: Connector> {
    connector: Arc<C>,
    credentials: Arc<Credentials>,
    settings: UpdateSettings,
    max_concurrency: usize,
}

impl<C: Connector> Dispatcher<C> {
    pub fn new(connector: C, credentials: Credentials, settings: UpdateSettings) -> Self {
        Self {
            connector: Arc::new(connector),
            credentials: Arc::new(credentials),
            settings,
            max_concurrency: DEFAULT_MAX_CONCURRENCY,
        }
    }

    /// Limit how many devices are updated at the same time (minimum 1).
    pub fn with_max_concurrency(mut self, max_concurrency: usize) -> Self {
        self.max_concurrency = max_concurrency.max(1);
        self
    }

    pub fn max_concurrency(&self) -> usize {
        self.max_concurrency
    }

    /// One target per non-blank address, trimmed, in input order.
    pub fn targets<S: AsRef<str>>(&self, addresses: &[S]) -> Vec<DeviceTarget> {
        addresses
            .iter()
            .map(|a| a.as_ref().trim())
            .filter(|a| !a.is_empty())
            .map(|a| DeviceTarget::new(a, Arc::clone(&self.credentials)))
            .collect()
    }

    /// Update every device and return the reports in input order.
    pub async fn run<S: AsRef<str>>(&self, addresses: &[S]) -> Vec<DeviceReport> {
        let targets = self.targets(addresses);
        if targets.is_empty() {
            info!("No devices to update");
            return Vec::new();
        }

        info!(
            "Updating {} devices (VLAN {}, up to {} at a time)",
            targets.len(),
            self.settings.vlan,
            self.max_concurrency
        );

        let semaphore = Arc::new(Semaphore::new(self.max_concurrency));
        let mut tasks = JoinSet::new();
        let mut slots: Vec<Option<DeviceReport>> = vec![None; targets.len()];
        let addresses: Vec<String> = targets.iter().map(|t| t.address.clone()).collect();

        for (index, target) in targets.into_iter().enumerate() {
            let connector = Arc::clone(&self.connector);
            let semaphore = Arc::clone(&semaphore);
            let settings = self.settings.clone();

            tasks.spawn(async move {
                // The semaphore is never closed
                let _permit = semaphore.acquire_owned().await.ok();
                let report = update_device(connector.as_ref(), &target, &settings).await;
                (index, report)
            });
        }

        while let Some(joined) = tasks.join_next().await {
            match joined {
                Ok((index, report)) => {
                    debug!("{}: update finished", report.address);
                    slots[index] = Some(report);
                }
                Err(e) => error!("Device task failed: {e}"),
            }
        }

        slots
            .into_iter()
            .zip(addresses)
            .map(|(slot, address)| {
                slot.unwrap_or_else(|| DeviceReport::unreachable(address, "update task aborted"))
            })
            .collect()
    }
}
