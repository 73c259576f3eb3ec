//! Subcommand bodies. Each returns the JSON the binary prints.

use std::path::Path;
use std::sync::Arc;

use anyhow::{bail, Context};
use serde_json::{json, Value};
use tracing::{info, warn};

use chains_core::models::Venue;
use chains_matching::{run_batch, Resolver};
use chains_storage::StoreVenueSource;

use crate::app::App;

/// Cache every venue in a JSON array of location-API payloads.
pub fn import(app: &App, file: &Path) -> anyhow::Result<Value> {
    let text = std::fs::read_to_string(file)
        .with_context(|| format!("reading {}", file.display()))?;
    let payload: Value = serde_json::from_str(&text)
        .with_context(|| format!("parsing {}", file.display()))?;
    let Some(entries) = payload.as_array() else {
        bail!("{} must hold a JSON array of venues", file.display());
    };

    let venues = app.venues();
    let mut imported = 0usize;
    let mut rejected = Vec::new();
    for (index, entry) in entries.iter().enumerate() {
        match Venue::from_api_json(entry) {
            Ok(venue) => {
                venues.put(&venue)?;
                imported += 1;
            }
            Err(e) => {
                warn!(index, error = %e, "malformed venue payload skipped");
                rejected.push(index);
            }
        }
    }
    info!(imported, rejected = rejected.len(), "venues imported");
    Ok(json!({ "imported": imported, "rejected": rejected }))
}

/// Resolve the whole cached corpus.
pub fn resolve(app: &App, global: bool) -> anyhow::Result<Value> {
    let mut config = app.config.matching.clone();
    config.global_search |= global;
    let mut resolver = Resolver::new(app.store.clone(), app.filter.clone(), config);
    if global {
        resolver = resolver.with_source(Arc::new(StoreVenueSource::new(app.store.clone())));
    }
    let stats = run_batch(&mut resolver)?;
    Ok(serde_json::to_value(stats)?)
}

pub fn lookup(app: &App, venue_id: &str) -> anyhow::Result<Value> {
    match app.chains().live_lookup(venue_id)? {
        Some(entry) => Ok(serde_json::to_value(entry)?),
        None => Ok(json!({ "venue_id": venue_id, "chain_id": null })),
    }
}

pub fn show(app: &App, chain_id: &str) -> anyhow::Result<Value> {
    let chain = app.chains().load(chain_id)?.into_chain();
    Ok(serde_json::to_value(chain)?)
}

/// Prune one chain, or every chain when no id is given.
pub fn prune(app: &App, chain_id: Option<&str>, threshold: Option<f64>) -> anyhow::Result<Value> {
    let threshold = threshold.unwrap_or(app.config.matching.prune_threshold);
    if !threshold.is_finite() || threshold < 0.0 {
        bail!("threshold must be a non-negative number, got {threshold}");
    }
    let chains = app.chains();
    let resolver = app.resolver();
    let ids: Vec<String> = match chain_id {
        Some(id) => vec![id.to_string()],
        None => chains.all_chains()?.into_iter().map(|c| c.id).collect(),
    };

    let mut pruned = Vec::new();
    for id in ids {
        let outcome = chains.prune(&id, resolver.scorer(), threshold)?;
        if !outcome.removed.is_empty() {
            pruned.push(json!({
                "chain_id": id,
                "removed": outcome.removed,
                "remaining": outcome.chain.len(),
            }));
        }
    }
    Ok(json!({ "threshold": threshold, "pruned": pruned }))
}

pub fn merge(app: &App, chain_a: &str, chain_b: &str) -> anyhow::Result<Value> {
    let merged = app.chains().merge(chain_a, chain_b)?;
    Ok(json!({ "chain_id": merged.id, "members": merged.len() }))
}

pub fn remove(app: &App, chain_id: &str, venue_id: &str) -> anyhow::Result<Value> {
    let left = app.chains().remove_from_chain(chain_id, venue_id)?;
    Ok(json!({
        "chain_id": chain_id,
        "venue_id": venue_id,
        "chain_deleted": left.is_none(),
        "remaining": left.map_or(0, |c| c.len()),
    }))
}

pub fn delete(app: &App, chain_id: &str) -> anyhow::Result<Value> {
    let chain = app.chains().delete(chain_id)?;
    Ok(json!({ "chain_id": chain.id, "released": chain.len() }))
}

pub fn repair(app: &App) -> anyhow::Result<Value> {
    let report = app.chains().repair_lookups()?;
    Ok(json!({
        "chains": report.chains,
        "repaired": report.repaired,
        "orphans_removed": report.orphans_removed,
        "conflicts": report.conflicts,
    }))
}

pub fn stats(app: &App) -> anyhow::Result<Value> {
    let venues = app.venues().all()?.len();
    let chains = app.chains().all_chains()?;
    let chained: usize = chains.iter().map(|c| c.len()).sum();
    let largest = chains.iter().map(|c| c.len()).max().unwrap_or(0);
    Ok(json!({
        "venues": venues,
        "chains": chains.len(),
        "chained_venues": chained,
        "largest_chain": largest,
    }))
}
