//! The `rank` subcommand: run the full pipeline once and print the result.

use std::fs;
use std::path::PathBuf;

use anyhow::Context;
use chrono::{FixedOffset, NaiveDateTime, Utc};
use clap::{Args, ValueEnum};
use tipple_core::{
    load_catalog, rank_collections, DiversifyKey, GeoPoint, PipelineConfig, Snapshot,
    UnknownTagPolicy,
};

#[derive(Debug, Args)]
pub struct RankArgs {
    /// Path to the snapshot JSON holding venues and deals
    #[arg(long, env = "TIPPLE_SNAPSHOT", default_value = "data/sample_snapshot.json")]
    snapshot: PathBuf,

    /// Path to the collection catalog YAML
    #[arg(long, env = "TIPPLE_CATALOG", default_value = "config/collections.yaml")]
    catalog: PathBuf,

    /// Viewer latitude in decimal degrees
    #[arg(long, allow_negative_numbers = true)]
    lat: f64,

    /// Viewer longitude in decimal degrees
    #[arg(long, allow_negative_numbers = true)]
    lng: f64,

    /// Evaluation instant in venue-local civil time, `YYYY-MM-DDTHH:MM`.
    /// Defaults to the current time in the venue region.
    #[arg(long)]
    at: Option<String>,

    /// Venue-region offset from UTC in minutes, used only when --at is
    /// omitted (default is UTC+8)
    #[arg(long, env = "TIPPLE_UTC_OFFSET_MIN", default_value_t = 480)]
    utc_offset_min: i32,

    /// Comma-separated ascending radius ladder in kilometres
    #[arg(long, default_value = "5,10,15")]
    tiers: String,

    /// Handling for tag slugs missing from the catalog
    #[arg(long, value_enum, default_value = "drop")]
    unknown_tags: UnknownTagsArg,

    /// Attribute adjacent deals in a collection must differ on
    #[arg(long, value_enum, default_value = "item-name")]
    diversify: DiversifyArg,

    /// Active deals one venue may hold in the nearby collection
    #[arg(long, default_value_t = 1)]
    max_per_venue: usize,

    /// Pretty-print the JSON output
    #[arg(long)]
    pretty: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum UnknownTagsArg {
    /// Ignore tags with no catalog entry
    Drop,
    /// Surface them as auto-titled collections, sorted last
    AutoTitle,
}

impl From<UnknownTagsArg> for UnknownTagPolicy {
    fn from(arg: UnknownTagsArg) -> Self {
        match arg {
            UnknownTagsArg::Drop => UnknownTagPolicy::Drop,
            UnknownTagsArg::AutoTitle => UnknownTagPolicy::AutoTitle,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum DiversifyArg {
    /// Item name, compared case-insensitively
    ItemName,
    /// Owning venue
    Venue,
}

impl From<DiversifyArg> for DiversifyKey {
    fn from(arg: DiversifyArg) -> Self {
        match arg {
            DiversifyArg::ItemName => DiversifyKey::ItemName,
            DiversifyArg::Venue => DiversifyKey::Venue,
        }
    }
}

/// Load inputs, run the pipeline, and print the ranked collections as JSON
/// on stdout.
///
/// # Errors
///
/// Returns an error when an input file cannot be read or parsed, the
/// arguments are unusable (bad --at, bad --tiers, out-of-range offset), or
/// the pipeline rejects the viewer position or tier ladder.
pub fn run(args: &RankArgs) -> anyhow::Result<()> {
    let raw = fs::read_to_string(&args.snapshot)
        .with_context(|| format!("failed to read snapshot {}", args.snapshot.display()))?;
    let snapshot: Snapshot = serde_json::from_str(&raw)
        .with_context(|| format!("failed to parse snapshot {}", args.snapshot.display()))?;
    let catalog = load_catalog(&args.catalog)?;

    let now = resolve_now(args.at.as_deref(), args.utc_offset_min)?;
    let config = PipelineConfig {
        radius_tiers_km: parse_tiers(&args.tiers)?,
        unknown_tags: args.unknown_tags.into(),
        diversify_key: args.diversify.into(),
        nearby_max_per_venue: args.max_per_venue,
        ..PipelineConfig::default()
    };

    let viewer = GeoPoint::new(args.lat, args.lng);
    let ranked = rank_collections(&snapshot, viewer, now, &catalog, &config)?;
    tracing::info!(
        collections = ranked.collections.len(),
        radius_km = ranked.radius_km,
        at = %ranked.evaluated_at,
        "ranked collections"
    );

    let json = if args.pretty {
        serde_json::to_string_pretty(&ranked)?
    } else {
        serde_json::to_string(&ranked)?
    };
    println!("{json}");
    Ok(())
}

/// Parse the `--tiers` ladder; validation of ordering happens in the core.
fn parse_tiers(raw: &str) -> anyhow::Result<Vec<f64>> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(|s| {
            s.parse::<f64>()
                .map_err(|_| anyhow::anyhow!("invalid radius '{s}' in --tiers"))
        })
        .collect()
}

/// Resolve the evaluation instant: an explicit `--at` wins, otherwise the
/// current wall-clock time shifted into the venue region's offset.
fn resolve_now(at: Option<&str>, utc_offset_min: i32) -> anyhow::Result<NaiveDateTime> {
    if let Some(raw) = at {
        return NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M")
            .or_else(|_| NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S"))
            .map_err(|_| anyhow::anyhow!("cannot parse --at '{raw}'; expected YYYY-MM-DDTHH:MM"));
    }
    let offset = utc_offset_min
        .checked_mul(60)
        .and_then(FixedOffset::east_opt)
        .ok_or_else(|| anyhow::anyhow!("utc offset {utc_offset_min} minutes is out of range"))?;
    Ok(Utc::now().with_timezone(&offset).naive_local())
}
