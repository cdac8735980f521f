use anyhow::{Context as _, Result};
use expocal_core::Credential;
use owo_colors::OwoColorize;

use super::Context;

pub fn run(forget: bool) -> Result<()> {
    let ctx = Context::load()?;
    let store = ctx.store.as_ref();

    if forget {
        if !Credential::is_stored(store)? {
            println!("{}", "No API key stored".dimmed());
            return Ok(());
        }
        Credential::forget(store)?;
        println!("API key removed.");
        return Ok(());
    }

    if Credential::is_stored(store)? {
        println!("{}", "An API key is already stored; entering a new one replaces it.".dimmed());
    }

    let input = rpassword::prompt_password("Gemini API key: ").context("Failed to read API key")?;
    let credential = Credential::parse(&input)?;
    credential.save(store)?;

    println!("{} API key saved.", "✓".green());
    println!("\nRun `expocal` to see this month's exhibitions.");

    Ok(())
}
