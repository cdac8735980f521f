use anyhow::Result;
use expocal_core::DayIndex;
use expocal_core::date_range::parse_date;

use super::Context;
use crate::render::Render;

pub async fn run(date: &str) -> Result<()> {
    let date = parse_date(date)?;
    let ctx = Context::load()?;

    let index = match ctx.load_events(false).await? {
        Some(snapshot) => snapshot.index(),
        None => DayIndex::build(&[]),
    };

    println!("{}", index.select(date).render());

    Ok(())
}
