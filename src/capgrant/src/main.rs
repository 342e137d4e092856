use anyhow::Context;

use capgrant::cli::cli_main;

fn main() -> anyhow::Result<()> {
    cli_main().context("capgrant failed")?;
    logger::debug!("cli_main done");
    Ok(())
}
