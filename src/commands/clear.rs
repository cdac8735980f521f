use anyhow::Result;
use owo_colors::OwoColorize;

use super::Context;

pub fn run() -> Result<()> {
    let ctx = Context::load()?;
    ctx.offline_cache().clear()?;

    println!("{}", "Cleared stored events".dimmed());

    Ok(())
}
