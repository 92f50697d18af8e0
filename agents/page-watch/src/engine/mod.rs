//! Poll loop
//!
//! `Uninitialized` until the first successful fetch stores (or resumes) a
//! baseline, then `Monitoring` forever: fetch, compare against the state
//! file, persist and alert on change, sleep.

pub mod signature;

pub use signature::*;

use crate::client::Notifier;
use crate::config::MonitorConfig;
use crate::contracts::*;
use crate::error::{FetchError, MonitorError};
use crate::store::FileStateStore;

/// Anything that can fingerprint a page
#[async_trait::async_trait]
pub trait PageSource: Send + Sync {
    async fn signature(&self, url: &str) -> Result<Fingerprint, FetchError>;
}

/// Single-page change monitor
pub struct PageMonitor {
    config: MonitorConfig,
    source: Box<dyn PageSource>,
    notifier: Box<dyn Notifier>,
    store: FileStateStore,
    phase: MonitorPhase,
}

impl PageMonitor {
    pub fn new(
        config: MonitorConfig,
        source: Box<dyn PageSource>,
        notifier: Box<dyn Notifier>,
    ) -> Self {
        let store = FileStateStore::new(config.state_file.clone());
        Self {
            config,
            source,
            notifier,
            store,
            phase: MonitorPhase::Uninitialized,
        }
    }

    pub fn phase(&self) -> MonitorPhase {
        self.phase
    }

    pub fn store(&self) -> &FileStateStore {
        &self.store
    }

    /// Establish the baseline. A failed first fetch is terminal.
    pub async fn initialize(&mut self) -> Result<(), MonitorError> {
        let last = self.store.load();

        let current = match self.source.signature(&self.config.url).await {
            Ok(fingerprint) => fingerprint,
            Err(e) => {
                tracing::error!(url = %self.config.url, error = %e, "Initial fetch error");
                self.alert(Alert::initial_fetch_failed(&e)).await;
                return Err(MonitorError::InitialFetch(e));
            }
        };

        match last {
            None => {
                if let Err(e) = self.store.save(&current) {
                    tracing::error!(error = %e, "Failed to store baseline");
                    self.alert(Alert::check_failed(&e)).await;
                    return Err(MonitorError::Baseline(e));
                }
                self.alert(Alert::started(&self.config.label)).await;
                tracing::info!(
                    url = %self.config.url,
                    fingerprint = %current.short(),
                    "Monitor started; baseline hash saved"
                );
            }
            Some(baseline) => {
                tracing::info!(
                    url = %self.config.url,
                    baseline = %baseline.short(),
                    "Resumed with existing baseline"
                );
            }
        }

        self.phase = MonitorPhase::Monitoring;
        Ok(())
    }

    /// One steady-state check. Errors are contained in the outcome.
    pub async fn tick(&self) -> Result<TickOutcome, MonitorError> {
        if self.phase != MonitorPhase::Monitoring {
            return Err(MonitorError::NotInitialized);
        }

        let current = match self.source.signature(&self.config.url).await {
            Ok(fingerprint) => fingerprint,
            Err(e) => {
                if e.is_transient() {
                    tracing::warn!(url = %self.config.url, error = %e, "Loop error");
                } else {
                    tracing::error!(url = %self.config.url, error = %e, "Loop error");
                }
                let reason = e.to_string();
                self.alert(Alert::check_failed(&e)).await;
                return Ok(TickOutcome::Failed { reason });
            }
        };

        // Re-read rather than trusting memory; the file may have been edited
        let previous = self.store.load();
        if previous.as_ref() == Some(&current) {
            tracing::info!(fingerprint = %current.short(), "No change");
            return Ok(TickOutcome::Unchanged);
        }

        if let Err(e) = self.store.save(&current) {
            tracing::error!(error = %e, "Failed to persist new fingerprint");
            let reason = e.to_string();
            self.alert(Alert::check_failed(&e)).await;
            return Ok(TickOutcome::Failed { reason });
        }

        self.alert(Alert::changed(&self.config.label, &self.config.url))
            .await;
        tracing::info!(
            previous = previous.as_ref().map(|p| p.short()).unwrap_or("none"),
            current = %current.short(),
            "Change detected and alert sent"
        );

        Ok(TickOutcome::Changed { previous, current })
    }

    /// Initialize, then tick forever on the configured interval
    pub async fn run(mut self) -> Result<(), MonitorError> {
        self.initialize().await?;

        tracing::info!(
            url = %self.config.url,
            interval_secs = self.config.interval.as_secs(),
            "Monitoring"
        );

        loop {
            self.tick().await?;
            tokio::time::sleep(self.config.interval).await;
        }
    }

    async fn alert(&self, alert: Alert) {
        self.notifier.send(&alert.render()).await;
    }
}
