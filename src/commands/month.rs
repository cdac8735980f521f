use anyhow::Result;
use expocal_core::{Clock, DayIndex, Month, MonthGrid};
use owo_colors::OwoColorize;

use super::Context;
use crate::render::{MonthView, Render, last_updated};

pub async fn run(month: Option<&str>, refresh: bool) -> Result<()> {
    let ctx = Context::load()?;
    let today = ctx.clock.today();

    let month = match month {
        Some(s) => s.parse::<Month>()?,
        None => Month::containing(today),
    };

    let snapshot = ctx.load_events(refresh).await?;
    let index = match &snapshot {
        Some(snapshot) => snapshot.index(),
        None => DayIndex::build(&[]),
    };

    let grid = MonthGrid::new(month, today);
    println!("{}", MonthView { grid: &grid, index: &index }.render());

    let updated = last_updated(snapshot.as_ref().map(|s| s.fetched_at));
    println!();
    println!("{}", format!("Last updated: {updated}").dimmed());
    if snapshot.as_ref().is_some_and(|s| s.stale) {
        println!("{}", "Showing previously stored events.".yellow());
    }

    let (prev, next) = (month.prev(), month.next());
    println!(
        "{}",
        format!("Previous: expocal month {prev}   Next: expocal month {next}").dimmed()
    );

    Ok(())
}
