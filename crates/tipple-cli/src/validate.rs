//! The `validate` subcommand: report data problems in a snapshot and
//! catalog without running the pipeline.
//!
//! The pipeline itself degrades silently on bad authored data, which is
//! right for the request path but hides problems from whoever maintains
//! the data. This command surfaces them.

use std::fs;
use std::path::PathBuf;

use anyhow::Context;
use clap::Args;
use serde::Serialize;
use tipple_core::schedule::Schedule;
use tipple_core::{load_catalog, CollectionCatalog, Snapshot};

#[derive(Debug, Args)]
pub struct ValidateArgs {
    /// Path to the snapshot JSON holding venues and deals
    #[arg(long, env = "TIPPLE_SNAPSHOT", default_value = "data/sample_snapshot.json")]
    snapshot: PathBuf,

    /// Path to the collection catalog YAML
    #[arg(long, env = "TIPPLE_CATALOG", default_value = "config/collections.yaml")]
    catalog: PathBuf,
}

/// Everything the checker found, serialized to stdout as JSON.
#[derive(Debug, Default, Serialize)]
struct ValidationReport {
    venues: usize,
    deals: usize,
    /// Deal ids whose start or end time failed to parse.
    unparsable_schedules: Vec<String>,
    /// Deal ids whose valid-days string matched no weekday.
    empty_day_sets: Vec<String>,
    /// Venue ids with missing or non-finite coordinates.
    unlocated_venues: Vec<String>,
    /// Deal ids referencing a venue absent from the snapshot.
    orphaned_deals: Vec<String>,
    /// Tag slugs seen in deal data but absent from the catalog.
    unknown_tags: Vec<String>,
    /// Deal ids where the deal price exceeds the regular price.
    inverted_prices: Vec<String>,
}

impl ValidationReport {
    fn is_clean(&self) -> bool {
        self.unparsable_schedules.is_empty()
            && self.empty_day_sets.is_empty()
            && self.unlocated_venues.is_empty()
            && self.orphaned_deals.is_empty()
            && self.unknown_tags.is_empty()
            && self.inverted_prices.is_empty()
    }
}

fn build_report(snapshot: &Snapshot, catalog: &CollectionCatalog) -> ValidationReport {
    let venues = snapshot.venue_index();
    let mut report = ValidationReport {
        venues: snapshot.venues.len(),
        deals: snapshot.deals.len(),
        ..ValidationReport::default()
    };

    for venue in &snapshot.venues {
        if venue.position().is_none() {
            report.unlocated_venues.push(venue.id.clone());
        }
    }

    for deal in &snapshot.deals {
        let schedule = Schedule::parse(&deal.valid_days, &deal.start_time, &deal.end_time);
        if schedule.window.is_none() {
            report.unparsable_schedules.push(deal.id.clone());
        }
        if schedule.days.is_empty() {
            report.empty_day_sets.push(deal.id.clone());
        }
        if !venues.contains_key(deal.venue_id.as_str()) {
            report.orphaned_deals.push(deal.id.clone());
        }
        if deal.deal_price > deal.regular_price {
            report.inverted_prices.push(deal.id.clone());
        }
        for slug in deal.tag_slugs() {
            if catalog.get(&slug).is_none() {
                report.unknown_tags.push(slug);
            }
        }
    }

    report.unknown_tags.sort_unstable();
    report.unknown_tags.dedup();
    report
}

/// Load the inputs, print the report as JSON, and log a summary.
///
/// Findings are not failures: the exit code reflects only whether the
/// inputs could be loaded at all.
///
/// # Errors
///
/// Returns an error when the snapshot or catalog cannot be read or parsed.
pub fn run(args: &ValidateArgs) -> anyhow::Result<()> {
    let raw = fs::read_to_string(&args.snapshot)
        .with_context(|| format!("failed to read snapshot {}", args.snapshot.display()))?;
    let snapshot: Snapshot = serde_json::from_str(&raw)
        .with_context(|| format!("failed to parse snapshot {}", args.snapshot.display()))?;
    let catalog = load_catalog(&args.catalog)?;

    let report = build_report(&snapshot, &catalog);
    if report.is_clean() {
        tracing::info!(venues = report.venues, deals = report.deals, "snapshot is clean");
    } else {
        tracing::warn!(
            unparsable_schedules = report.unparsable_schedules.len(),
            empty_day_sets = report.empty_day_sets.len(),
            unlocated_venues = report.unlocated_venues.len(),
            orphaned_deals = report.orphaned_deals.len(),
            unknown_tags = report.unknown_tags.len(),
            inverted_prices = report.inverted_prices.len(),
            "snapshot has data problems"
        );
    }

    println!("{}", serde_json::to_string_pretty(&report)?);
    Ok(())
}
