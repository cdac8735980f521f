use anyhow::Result;
use dialoguer::Confirm;
use owo_colors::OwoColorize;

use super::Context;
use crate::render::last_updated;

pub async fn run(yes: bool) -> Result<()> {
    let ctx = Context::load()?;

    // Fail on a missing key before asking anything.
    ctx.credential()?;

    if !yes {
        let confirmed = Confirm::new()
            .with_prompt(
                "Updating will search the live web for the latest data. \
                 This may take a few seconds. Continue?",
            )
            .default(true)
            .interact()?;

        if !confirmed {
            return Ok(());
        }
    }

    match ctx.load_events(true).await? {
        Some(snapshot) => println!(
            "{}",
            format!("Last updated: {}", last_updated(Some(snapshot.fetched_at))).dimmed()
        ),
        None => println!("{}", "No events stored".dimmed()),
    }

    Ok(())
}
