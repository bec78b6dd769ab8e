//! Headless application runner: drives a [`World`] on the fixed-step clock
//! and streams its events as JSON lines.

use anyhow::{Context, Result};
use serde::Serialize;
use std::io::Write;
use std::time::{Duration, Instant};
use thicket_core::clock::FixedStep;
use thicket_core::{TickReport, World};
use thicket_data::{HealthTier, PopulationCounts};

#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct RunSummary {
    pub seed: u64,
    pub ticks: u64,
    pub sim_seconds: f64,
    pub counts: PopulationCounts,
    pub health_tier: HealthTier,
    pub births: u64,
    pub deaths: u64,
    pub wall_ms: u128,
    pub fingerprint: String,
}

pub struct App {
    pub world: World,
    pub running: bool,
    clock: FixedStep,
    sink: Option<Box<dyn Write>>,
    last_tier: HealthTier,
    started: Instant,
}

impl App {
    pub fn new(world: World) -> Self {
        let clock = FixedStep::new(world.config().world.tick_rate);
        let last_tier = world.health_tier();
        Self {
            world,
            running: true,
            clock,
            sink: None,
            last_tier,
            started: Instant::now(),
        }
    }

    /// Every event is written to `sink` as one JSON object per line.
    pub fn with_event_sink(mut self, sink: Box<dyn Write>) -> Self {
        self.sink = Some(sink);
        self
    }

    pub fn set_time_scale(&mut self, scale: f64) {
        self.clock.set_time_scale(scale);
    }

    /// One tick. Stops the app once nothing is left alive.
    pub fn step(&mut self) -> Result<TickReport> {
        let report = self.world.update();
        for event in &report.events {
            tracing::debug!(tick = report.tick, "{}", event.describe());
        }
        if let Some(sink) = self.sink.as_mut() {
            for event in &report.events {
                writeln!(sink, "{}", event.to_json()?).context("writing event stream")?;
            }
        }
        for outcome in &report.outcomes {
            tracing::info!(
                success = outcome.success,
                impact = outcome.ecosystem_impact,
                "{}",
                outcome.message
            );
        }
        if report.health_tier != self.last_tier {
            tracing::info!(
                tick = report.tick,
                from = %self.last_tier,
                to = %report.health_tier,
                "ecosystem health changed"
            );
            self.last_tier = report.health_tier;
        }
        if self.world.counts().total() == 0 {
            tracing::warn!(tick = report.tick, "ecosystem collapsed");
            self.running = false;
        }
        Ok(report)
    }

    /// Runs up to `ticks` steps as fast as possible.
    pub fn run_ticks(&mut self, ticks: u64) -> Result<RunSummary> {
        for _ in 0..ticks {
            if !self.running {
                break;
            }
            self.step()?;
        }
        self.finish()
    }

    /// Runs on the wall clock for `duration`, at the configured tick rate.
    pub fn run_realtime(&mut self, duration: Duration) -> Result<RunSummary> {
        let deadline = Instant::now() + duration;
        let mut last = Instant::now();
        while self.running && Instant::now() < deadline {
            let now = Instant::now();
            let due = self.clock.advance(now - last);
            last = now;
            for _ in 0..due {
                self.step()?;
            }
            std::thread::sleep(self.clock.step() / 4);
        }
        self.finish()
    }

    fn finish(&mut self) -> Result<RunSummary> {
        if let Some(sink) = self.sink.as_mut() {
            sink.flush().context("flushing event stream")?;
        }
        Ok(self.summary())
    }

    pub fn summary(&self) -> RunSummary {
        let metrics = self.world.metrics();
        RunSummary {
            seed: self.world.seed(),
            ticks: self.world.tick(),
            sim_seconds: self.world.time(),
            counts: self.world.counts(),
            health_tier: self.world.health_tier(),
            births: metrics.births(),
            deaths: metrics.deaths(),
            wall_ms: self.started.elapsed().as_millis(),
            fingerprint: self.world.config().fingerprint(),
        }
    }
}
