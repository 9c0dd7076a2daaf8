use super::{render, AppContext};
use crate::output::Output;
use color_eyre::Result;

/// Reads the stored list directly; no API key needed.
pub fn run_watched(output: &Output) -> Result<()> {
    let ctx = AppContext::load()?;
    let store = ctx.watched_store();
    tracing::debug!("Reading watched list from {:?}", store.path());

    let watched = store.load();
    render::print_watched(output, &watched, &ctx.display);
    Ok(())
}
