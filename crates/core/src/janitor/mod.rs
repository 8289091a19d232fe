//! Storage janitor: deletes assets older than the retention window.
//!
//! Runs once at startup, then as a background task on a fixed interval with
//! its own shutdown hook. A sweep can also be requested on demand (the UI
//! page view does so).

use chrono::{DateTime, Utc};
use serde::Serialize;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{Duration, SystemTime};
use tokio::sync::{broadcast, Mutex};
use tokio::task::JoinHandle;
use tracing::{debug, error, info, warn};

use crate::config::StorageConfig;
use crate::metrics::{JANITOR_FILES_REMOVED, JANITOR_REMOVAL_FAILURES, JANITOR_SWEEPS_TOTAL};
use crate::storage::{AssetStore, StorageArea};

/// Outcome of one sweep over both areas.
#[derive(Debug, Clone, Serialize)]
pub struct SweepReport {
    pub swept_at: DateTime<Utc>,
    /// Names removed, with their area.
    pub removed: Vec<(StorageArea, String)>,
    /// Expired entries that could not be deleted.
    pub failed: usize,
    /// Entries still inside the retention window.
    pub kept: usize,
}

impl SweepReport {
    pub fn removed_count(&self) -> usize {
        self.removed.len()
    }

    pub fn removed_from(&self, area: StorageArea) -> usize {
        self.removed.iter().filter(|(a, _)| *a == area).count()
    }
}

/// Deletes expired assets from every storage area.
pub struct Janitor {
    store: Arc<dyn AssetStore>,
    retention: Duration,
    interval: Duration,

    // Runtime state
    running: Arc<AtomicBool>,
    shutdown_tx: broadcast::Sender<()>,
    task: Mutex<Option<JoinHandle<()>>>,
}

impl Janitor {
    pub fn new(store: Arc<dyn AssetStore>, retention: Duration, interval: Duration) -> Self {
        let (shutdown_tx, _) = broadcast::channel(1);
        Self {
            store,
            retention,
            interval,
            running: Arc::new(AtomicBool::new(false)),
            shutdown_tx,
            task: Mutex::new(None),
        }
    }

    /// Creates a janitor using the configured retention window and interval.
    pub fn from_config(store: Arc<dyn AssetStore>, config: &StorageConfig) -> Self {
        Self::new(store, config.retention(), config.sweep_interval())
    }

    pub fn retention(&self) -> Duration {
        self.retention
    }

    pub fn is_running(&self) -> bool {
        self.running.load(Ordering::Relaxed)
    }

    /// Sweeps both areas against the current time.
    pub async fn sweep(&self) -> SweepReport {
        sweep_store(self.store.as_ref(), self.retention, SystemTime::now()).await
    }

    /// Sweeps both areas as if the current time were `now`.
    pub async fn sweep_at(&self, now: SystemTime) -> SweepReport {
        sweep_store(self.store.as_ref(), self.retention, now).await
    }

    /// Start the periodic sweep task.
    pub async fn start(&self) {
        if self.running.swap(true, Ordering::SeqCst) {
            warn!("Janitor already running");
            return;
        }

        let store = Arc::clone(&self.store);
        let running = Arc::clone(&self.running);
        let retention = self.retention;
        let interval = self.interval;
        let mut shutdown_rx = self.shutdown_tx.subscribe();

        let handle = tokio::spawn(async move {
            info!(interval_secs = interval.as_secs(), "Janitor loop started");
            loop {
                tokio::select! {
                    _ = shutdown_rx.recv() => {
                        info!("Janitor loop received shutdown signal");
                        break;
                    }
                    _ = tokio::time::sleep(interval) => {
                        if !running.load(Ordering::Relaxed) {
                            break;
                        }
                        sweep_store(store.as_ref(), retention, SystemTime::now()).await;
                    }
                }
            }
            info!("Janitor loop stopped");
        });

        *self.task.lock().await = Some(handle);
    }

    /// Stop the periodic sweep task and wait for it to exit.
    pub async fn stop(&self) {
        if !self.running.swap(false, Ordering::SeqCst) {
            warn!("Janitor not running");
            return;
        }

        let _ = self.shutdown_tx.send(());

        if let Some(handle) = self.task.lock().await.take() {
            if let Err(e) = handle.await {
                error!("Janitor task ended abnormally: {}", e);
            }
        }
    }
}

async fn sweep_store(store: &dyn AssetStore, retention: Duration, now: SystemTime) -> SweepReport {
    JANITOR_SWEEPS_TOTAL.inc();

    let threshold = now.checked_sub(retention).unwrap_or(SystemTime::UNIX_EPOCH);
    let mut report = SweepReport {
        swept_at: DateTime::<Utc>::from(now),
        removed: Vec::new(),
        failed: 0,
        kept: 0,
    };

    for area in StorageArea::ALL {
        let entries = match store.list(area).await {
            Ok(entries) => entries,
            Err(e) => {
                error!(area = %area, error = %e, "Failed to list storage area");
                continue;
            }
        };

        for entry in entries {
            if entry.modified >= threshold {
                report.kept += 1;
                continue;
            }

            match store.remove_entry(area, &entry).await {
                Ok(()) => {
                    info!(area = %area, file = %entry.name, "Removed expired file");
                    JANITOR_FILES_REMOVED.with_label_values(&[area.as_str()]).inc();
                    report.removed.push((area, entry.name));
                }
                Err(e) => {
                    error!(area = %area, file = %entry.name, error = %e, "Error removing expired file");
                    JANITOR_REMOVAL_FAILURES
                        .with_label_values(&[area.as_str()])
                        .inc();
                    report.failed += 1;
                }
            }
        }
    }

    debug!(
        removed = report.removed_count(),
        failed = report.failed,
        kept = report.kept,
        "Sweep finished"
    );
    report
}

