//! Scan orchestration across volumes.
//!
//! For each connected volume: walk (through the scan cache), then for each
//! discovered series enrich and merge. Volumes and series are processed one
//! at a time so the progress stream stays deterministic.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{bail, Context, Result};
use serde::Serialize;
use tracing::{info, warn};

use super::merge::{PersistedSeries, Synchronizer};
use super::progress::{ProgressCallback, ProgressReporter};
use super::volumes::{Volume, VolumeProvider};
use crate::cache::ScanCache;
use crate::metadata::Enricher;
use crate::scanner::ScanResult;

/// Share of a volume's progress range spent on the walk itself.
const WALK_SHARE: f64 = 0.1;

#[derive(Debug, Clone, Default)]
pub struct ScanOptions {
    /// Bypass the scan cache.
    pub force_refresh: bool,
    /// Only scan the volume with this id.
    pub volume: Option<String>,
}

/// A series that was discovered but could not be persisted.
#[derive(Debug, Clone, Serialize)]
pub struct SeriesFailure {
    pub path: PathBuf,
    pub error: String,
}

/// Result of scanning one volume or root.
#[derive(Debug, Clone, Serialize)]
pub struct VolumeReport {
    pub volume_id: Option<String>,
    pub name: String,
    pub path: PathBuf,
    /// Walker output, empty when the walk itself failed.
    pub result: ScanResult,
    pub persisted: Vec<PersistedSeries>,
    pub failures: Vec<SeriesFailure>,
    /// Set when the volume could not be walked at all.
    pub error: Option<String>,
}

impl VolumeReport {
    fn new(volume_id: Option<String>, name: String, path: PathBuf) -> Self {
        Self {
            result: ScanResult {
                root: path.clone(),
                ..ScanResult::default()
            },
            volume_id,
            name,
            path,
            persisted: Vec::new(),
            failures: Vec::new(),
            error: None,
        }
    }

    pub fn is_success(&self) -> bool {
        self.error.is_none() && self.failures.is_empty()
    }
}

/// Result of one `scan` call.
#[derive(Debug, Clone, Serialize)]
pub struct ScanOutcome {
    pub volumes: Vec<VolumeReport>,
    /// Ids of volumes skipped because they were not connected.
    pub skipped_volumes: Vec<String>,
    pub last_message: Option<String>,
}

impl ScanOutcome {
    pub fn is_success(&self) -> bool {
        self.volumes.iter().all(VolumeReport::is_success)
    }

    pub fn series_count(&self) -> usize {
        self.volumes.iter().map(|v| v.persisted.len()).sum()
    }
}

/// Drives walker, cache, enrichment and merge for a whole scan.
pub struct ScanOrchestrator {
    volumes: Arc<dyn VolumeProvider>,
    cache: Arc<ScanCache>,
    enricher: Arc<Enricher>,
    sync: Arc<Synchronizer>,
}

impl ScanOrchestrator {
    pub fn new(
        volumes: Arc<dyn VolumeProvider>,
        cache: Arc<ScanCache>,
        enricher: Arc<Enricher>,
        sync: Arc<Synchronizer>,
    ) -> Self {
        Self {
            volumes,
            cache,
            enricher,
            sync,
        }
    }

    /// Scan every connected volume, or only `options.volume`.
    ///
    /// Per-volume and per-series failures are recorded in the outcome. Only
    /// an unknown volume id fails the call.
    pub async fn scan(
        &self,
        options: &ScanOptions,
        progress: Option<ProgressCallback>,
    ) -> Result<ScanOutcome> {
        let reporter = ProgressReporter::new(progress);

        let mut volumes = self.volumes.volumes();
        if let Some(id) = &options.volume {
            volumes.retain(|v| &v.id == id);
            if volumes.is_empty() {
                bail!("Unknown volume: {id}");
            }
        }

        let (connected, disconnected): (Vec<Volume>, Vec<Volume>) =
            volumes.into_iter().partition(|v| v.connected);

        let mut skipped_volumes = Vec::with_capacity(disconnected.len());
        for volume in disconnected {
            info!(volume = %volume.id, path = %volume.path.display(), "Volume not connected, skipping");
            skipped_volumes.push(volume.id);
        }

        info!(volumes = connected.len(), force = options.force_refresh, "Starting scan");

        let share = 100.0 / connected.len().max(1) as f64;
        let mut reports = Vec::with_capacity(connected.len());
        for (i, volume) in connected.into_iter().enumerate() {
            let base = i as f64 * share;
            reporter.progress(format!("Scanning {}", volume.name), base);

            let mut report =
                VolumeReport::new(Some(volume.id.clone()), volume.name.clone(), volume.path.clone());
            let run = self.run(
                &volume.path,
                options.force_refresh,
                Some(volume.id.as_str()),
                &reporter,
                base,
                share,
                &mut report,
            );
            if let Err(e) = run.await {
                warn!(volume = %volume.id, path = %volume.path.display(), error = %e, "Volume scan failed");
                report.error = Some(format!("{e:#}"));
            }
            reports.push(report);
        }

        reporter.progress("Scan complete", 100.0);

        let outcome = ScanOutcome {
            volumes: reports,
            skipped_volumes,
            last_message: reporter.last_message(),
        };
        info!(
            series = outcome.series_count(),
            skipped_volumes = outcome.skipped_volumes.len(),
            success = outcome.is_success(),
            "Scan finished"
        );
        Ok(outcome)
    }

    /// Scan a single root outside the configured volumes.
    ///
    /// Fails when the root cannot be walked; series failures are recorded in
    /// the report.
    pub async fn scan_root(
        &self,
        root: &Path,
        force_refresh: bool,
        volume_id: Option<&str>,
        progress: Option<ProgressCallback>,
    ) -> Result<VolumeReport> {
        let reporter = ProgressReporter::new(progress);
        let name = root
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| root.display().to_string());
        let mut report = VolumeReport::new(volume_id.map(str::to_string), name, root.to_path_buf());

        self.run(root, force_refresh, volume_id, &reporter, 0.0, 100.0, &mut report)
            .await?;
        reporter.progress("Scan complete", 100.0);
        Ok(report)
    }

    #[allow(clippy::too_many_arguments)]
    async fn run(
        &self,
        root: &Path,
        force_refresh: bool,
        volume_id: Option<&str>,
        reporter: &ProgressReporter,
        base: f64,
        share: f64,
        report: &mut VolumeReport,
    ) -> Result<()> {
        let result = self
            .cache
            .get_or_scan(root, force_refresh)
            .await
            .with_context(|| format!("Failed to walk {}", root.display()))?;

        let total = result.series.len();
        reporter.progress(
            format!("Found {total} series in {}", root.display()),
            base + share * WALK_SHARE,
        );

        for (i, discovered) in result.series.iter().enumerate() {
            reporter.info(format!("Series found: {}", discovered.title));

            let locked = match self.sync.locked_canonical_id(&discovered.root_path) {
                Ok(id) => id,
                Err(e) => {
                    warn!(path = %discovered.root_path.display(), error = %e, "Failed to read locked canonical id");
                    None
                }
            };

            let enriched = self.enricher.enrich(discovered.clone(), locked.as_deref()).await;

            match self.sync.merge(&enriched, volume_id) {
                Ok(persisted) => report.persisted.push(persisted),
                Err(e) => {
                    warn!(path = %discovered.root_path.display(), error = %e, "Failed to persist series");
                    report.failures.push(SeriesFailure {
                        path: discovered.root_path.clone(),
                        error: e.to_string(),
                    });
                }
            }

            let done = (i + 1) as f64 / total as f64;
            reporter.progress(
                format!("Processed {}", enriched.title),
                base + share * (WALK_SHARE + (1.0 - WALK_SHARE) * done),
            );
        }

        report.result = result;
        Ok(())
    }
}
