//! Scrape coordinator: ordered scraper registry, cumulative timing and
//! the per-request rendering entry point.

use std::time::{Duration, Instant};

use tracing::debug;

use crate::collector::scrapers;
use crate::collector::traits::FileSystem;
use crate::collector::uname::UnameInfo;
use crate::exposition::{Exposition, MetricType};
use crate::server::MetricSource;

/// Identifier of one kernel-source scraper.
///
/// `ALL` is the explicit, fixed scrape order; dispatch happens through a
/// single `match`, so adding a scraper without registering it here does
/// not compile.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScraperKind {
    Cpu,
    LoadAverages,
    Memory,
    FileHandles,
    Network,
    NetworkDevices,
    Time,
    Uname,
}

impl ScraperKind {
    /// All scrapers in their fixed run order.
    pub const ALL: [ScraperKind; 8] = [
        ScraperKind::Cpu,
        ScraperKind::LoadAverages,
        ScraperKind::Memory,
        ScraperKind::FileHandles,
        ScraperKind::Network,
        ScraperKind::NetworkDevices,
        ScraperKind::Time,
        ScraperKind::Uname,
    ];

    /// Collector label value in the scrape-duration summary.
    pub fn name(&self) -> &'static str {
        match self {
            ScraperKind::Cpu => "cpu",
            ScraperKind::LoadAverages => "load_averages",
            ScraperKind::Memory => "memory",
            ScraperKind::FileHandles => "file_handles",
            ScraperKind::Network => "network",
            ScraperKind::NetworkDevices => "network_devices",
            ScraperKind::Time => "time",
            ScraperKind::Uname => "uname",
        }
    }

    fn index(&self) -> usize {
        Self::ALL.iter().position(|k| k == self).unwrap_or(0)
    }
}

/// Cumulative per-scraper timing, process-lifetime state.
///
/// Zeroed for every known scraper at construction, folded once per scrape
/// cycle per scraper, never reset while the process runs. Owned by the
/// `Exporter` (not a global) so each test can use a fresh instance.
#[derive(Debug, Clone, Default)]
pub struct ScrapeStats {
    entries: [ScrapeStat; ScraperKind::ALL.len()],
}

#[derive(Debug, Clone, Copy, Default)]
struct ScrapeStat {
    seconds: f64,
    count: u64,
}

impl ScrapeStats {
    pub fn new() -> Self {
        Self::default()
    }

    /// Folds one completed scrape into the cumulative totals.
    fn record(&mut self, kind: ScraperKind, elapsed: Duration) {
        let entry = &mut self.entries[kind.index()];
        entry.seconds += elapsed.as_secs_f64();
        entry.count += 1;
    }

    /// Cumulative (seconds, count) for one scraper.
    pub fn totals(&self, kind: ScraperKind) -> (f64, u64) {
        let entry = self.entries[kind.index()];
        (entry.seconds, entry.count)
    }
}

/// Runs all scrapers in their fixed order and renders the exposition
/// stream, folding per-scraper wall-clock deltas into `ScrapeStats`.
pub struct Exporter<F: FileSystem> {
    fs: F,
    proc_path: String,
    stats: ScrapeStats,
    uname: fn() -> Option<UnameInfo>,
}

impl<F: FileSystem> Exporter<F> {
    /// Creates an exporter reading from `proc_path` (usually "/proc").
    pub fn new(fs: F, proc_path: impl Into<String>) -> Self {
        Self {
            fs,
            proc_path: proc_path.into(),
            stats: ScrapeStats::new(),
            uname: UnameInfo::capture,
        }
    }

    /// Replaces the kernel-identity provider (used by tests).
    pub fn with_uname(mut self, uname: fn() -> Option<UnameInfo>) -> Self {
        self.uname = uname;
        self
    }

    pub fn stats(&self) -> &ScrapeStats {
        &self.stats
    }

    /// Runs one full scrape cycle and returns the rendered metric stream.
    ///
    /// Every scraper runs even when its source is absent; each one's
    /// duration is recorded and the cycle ends with the scrape-duration
    /// summary family.
    pub fn render(&mut self) -> String {
        let mut out = Exposition::new();
        let mut durations = [Duration::ZERO; ScraperKind::ALL.len()];

        for kind in ScraperKind::ALL {
            let started = Instant::now();
            self.run_scraper(kind, &mut out);
            let elapsed = started.elapsed();
            durations[kind.index()] = elapsed;
            self.stats.record(kind, elapsed);
            debug!("scraped {} in {:?}", kind.name(), elapsed);
        }

        self.write_duration_summary(&durations, &mut out);
        out.into_string()
    }

    fn run_scraper(&self, kind: ScraperKind, out: &mut Exposition) {
        let fs = &self.fs;
        let proc_path = self.proc_path.as_str();
        match kind {
            ScraperKind::Cpu => scrapers::cpu(fs, proc_path, out),
            ScraperKind::LoadAverages => scrapers::load_averages(fs, proc_path, out),
            ScraperKind::Memory => scrapers::memory(fs, proc_path, out),
            ScraperKind::FileHandles => scrapers::file_handles(fs, proc_path, out),
            ScraperKind::Network => scrapers::network(fs, proc_path, out),
            ScraperKind::NetworkDevices => scrapers::network_devices(fs, proc_path, out),
            ScraperKind::Time => scrapers::time(out),
            ScraperKind::Uname => scrapers::uname((self.uname)(), out),
        }
    }

    /// Emits the `node_exporter_scrape_duration_seconds` summary: this
    /// cycle's duration per collector plus cumulative `_sum`/`_count`.
    ///
    /// Every scrape is reported as `result="success"`; individual sources
    /// can silently yield zero samples, and no error variant exists.
    fn write_duration_summary(&self, durations: &[Duration], out: &mut Exposition) {
        const FAMILY: &str = "node_exporter_scrape_duration_seconds";

        out.begin_family(FAMILY, MetricType::Summary);
        for kind in ScraperKind::ALL {
            let labels = [("collector", kind.name()), ("result", "success")];
            let (seconds, count) = self.stats.totals(kind);

            out.emit(&labels, &durations[kind.index()].as_secs_f64().to_string());
            out.emit_named(&format!("{}_sum", FAMILY), &labels, &seconds.to_string());
            out.emit_named(&format!("{}_count", FAMILY), &labels, &count.to_string());
        }
    }
}

impl<F: FileSystem> MetricSource for Exporter<F> {
    fn render(&mut self) -> String {
        Exporter::render(self)
    }
}
