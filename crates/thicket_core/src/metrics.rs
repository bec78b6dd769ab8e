//! Run metrics and structured logging setup.

use std::collections::BTreeMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Mutex;
use std::time::{Duration, Instant};

/// Ticks between periodic info-level summaries.
pub const SUMMARY_INTERVAL: u64 = 300;

/// Counters shared by the tick driver and the application.
pub struct Metrics {
    tick_count: AtomicU64,
    population: AtomicU64,
    births: AtomicU64,
    deaths: AtomicU64,
    counters: Mutex<BTreeMap<String, u64>>,
    start_time: Instant,
}

impl Default for Metrics {
    fn default() -> Self {
        Self::new()
    }
}

impl Metrics {
    #[must_use]
    pub fn new() -> Self {
        Self {
            tick_count: AtomicU64::new(0),
            population: AtomicU64::new(0),
            births: AtomicU64::new(0),
            deaths: AtomicU64::new(0),
            counters: Mutex::new(BTreeMap::new()),
            start_time: Instant::now(),
        }
    }

    /// Records a completed tick with its wall-clock duration.
    pub fn record_tick(&self, duration: Duration, population: usize, births: usize, deaths: usize) {
        let tick = self.tick_count.fetch_add(1, Ordering::Relaxed) + 1;
        self.population.store(population as u64, Ordering::Relaxed);
        self.births.fetch_add(births as u64, Ordering::Relaxed);
        self.deaths.fetch_add(deaths as u64, Ordering::Relaxed);

        if tick % SUMMARY_INTERVAL == 0 {
            tracing::info!(
                tick,
                population,
                births = self.births.load(Ordering::Relaxed),
                deaths = self.deaths.load(Ordering::Relaxed),
                duration_us = duration.as_micros() as u64,
                "Simulation tick"
            );
        }
    }

    /// Increments a named counter.
    pub fn increment_counter(&self, name: &str) {
        let mut counters = self.counters.lock().unwrap_or_else(|e| e.into_inner());
        *counters.entry(name.to_string()).or_insert(0) += 1;
    }

    pub fn add_to_counter(&self, name: &str, amount: u64) {
        if amount == 0 {
            return;
        }
        let mut counters = self.counters.lock().unwrap_or_else(|e| e.into_inner());
        *counters.entry(name.to_string()).or_insert(0) += amount;
    }

    #[must_use]
    pub fn counter(&self, name: &str) -> u64 {
        let counters = self.counters.lock().unwrap_or_else(|e| e.into_inner());
        counters.get(name).copied().unwrap_or(0)
    }

    #[must_use]
    pub fn tick_count(&self) -> u64 {
        self.tick_count.load(Ordering::Relaxed)
    }

    #[must_use]
    pub fn population(&self) -> u64 {
        self.population.load(Ordering::Relaxed)
    }

    #[must_use]
    pub fn births(&self) -> u64 {
        self.births.load(Ordering::Relaxed)
    }

    #[must_use]
    pub fn deaths(&self) -> u64 {
        self.deaths.load(Ordering::Relaxed)
    }

    #[must_use]
    pub fn elapsed(&self) -> Duration {
        self.start_time.elapsed()
    }
}

/// Installs a fmt subscriber filtered by `RUST_LOG`, INFO when unset. Safe to
/// call more than once.
pub fn init_logging() {
    use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer())
        .try_init()
        .ok();
}
