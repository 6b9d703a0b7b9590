//! PedalPlan - Weekly Training Plan Engine
//!
//! Command-line entry point: reads a week descriptor JSON file, plans
//! the week against the built-in template catalog, and prints the
//! accepted plan and validation report as JSON.

use anyhow::{bail, Context};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use pedalplan::config;
use pedalplan::{
    ClosestDurationSelector, InMemoryCatalog, SegmentTssCalculator, WeekDescriptor, WeekPlanner,
};

fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Starting PedalPlan v{}", env!("CARGO_PKG_VERSION"));

    let Some(path) = std::env::args().nth(1) else {
        bail!("usage: pedalplan <week-descriptor.json>");
    };

    let settings = config::load_settings().unwrap_or_else(|e| {
        tracing::warn!("Failed to load settings, using defaults: {}", e);
        config::PlannerSettings::default()
    });

    let content = std::fs::read_to_string(&path)
        .with_context(|| format!("failed to read week descriptor {path}"))?;
    let descriptor: WeekDescriptor =
        serde_json::from_str(&content).context("invalid week descriptor")?;

    let planner = WeekPlanner::with_auto_fix(settings.auto_fix);
    let catalog = InMemoryCatalog::seeded();
    let week = planner.plan_week(
        &descriptor,
        &catalog,
        &ClosestDurationSelector::new(),
        &SegmentTssCalculator::new(),
        settings.ftp,
    )?;

    println!("{}", serde_json::to_string_pretty(&week)?);
    Ok(())
}
