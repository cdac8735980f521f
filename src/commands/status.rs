use anyhow::Result;
use expocal_core::Credential;
use owo_colors::OwoColorize;

use super::Context;
use crate::render::last_updated;

pub fn run() -> Result<()> {
    let ctx = Context::load()?;
    let snapshot = ctx.offline_cache().cached()?;

    println!("Last updated: {}", last_updated(snapshot.as_ref().map(|s| s.fetched_at)));

    if let Some(snapshot) = &snapshot {
        let count = snapshot.events.len();
        println!("Events:       {count}");

        let skipped = snapshot.index().rejected();
        if skipped > 0 {
            println!("Skipped:      {skipped} with unusable dates");
        }
        if snapshot.stale {
            println!("Freshness:    {}", "stale, refreshes on next view".yellow());
        } else {
            println!("Freshness:    {}", "fresh".green());
        }
    }

    if Credential::is_stored(ctx.store.as_ref())? {
        println!("API key:      {}", "stored".green());
    } else {
        println!("API key:      {} (run `expocal auth`)", "missing".red());
    }

    println!("{}", format!("Store: {}", ctx.store.path().display()).dimmed());

    Ok(())
}
