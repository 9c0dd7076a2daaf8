use super::{render, AppContext};
use crate::output::Output;
use color_eyre::Result;
use indicatif::{ProgressBar, ProgressStyle};
use popcorn_core::StateChange;
use std::time::Duration;

pub(crate) fn spinner(output: &Output, message: String) -> ProgressBar {
    if !output.is_human() || output.is_quiet() {
        return ProgressBar::hidden();
    }

    let spinner = ProgressBar::new_spinner();
    if let Ok(style) = ProgressStyle::default_spinner().template("{spinner:.blue} {msg}") {
        spinner.set_style(style);
    }
    spinner.set_message(message);
    spinner.enable_steady_tick(Duration::from_millis(100));
    spinner
}

pub async fn run_search(query: String, output: &Output) -> Result<()> {
    let ctx = AppContext::load()?;
    let mut ctrl = ctx.controller()?;

    let spinner = spinner(output, format!("Searching for \"{}\"...", query));
    ctrl.set_query(query);
    let change = ctrl.next_update().await;
    spinner.finish_and_clear();

    match change {
        StateChange::SearchResults { .. } => {
            render::print_search(output, &ctrl.view(), &ctx.display, ctx.config.display.viewport_width);
            Ok(())
        }
        StateChange::SearchFailed { query } => {
            Err(color_eyre::eyre::eyre!("Search for \"{}\" failed; run with -v for details", query))
        }
        other => Err(color_eyre::eyre::eyre!("Unexpected search outcome: {:?}", other)),
    }
}
