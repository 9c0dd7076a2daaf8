use super::search::spinner;
use super::{render, AppContext};
use crate::output::Output;
use color_eyre::Result;
use popcorn_core::{AddOutcome, AppController, StateChange};
use popcorn_models::{MovieDetail, MovieId};
use popcorn_sources::TmdbClient;
use serde_json::json;

/// Select `id` and wait for its detail to load.
async fn load_detail(ctrl: &mut AppController<TmdbClient>, id: MovieId, output: &Output) -> Result<MovieDetail> {
    let spinner = spinner(output, format!("Loading movie {}...", id));
    ctrl.toggle_selection(id);
    let change = ctrl.next_update().await;
    spinner.finish_and_clear();

    match change {
        StateChange::DetailLoaded { .. } => ctrl
            .detail()
            .loaded()
            .cloned()
            .ok_or_else(|| color_eyre::eyre::eyre!("Movie {} was not loaded", id)),
        StateChange::DetailFailed { id } => {
            Err(color_eyre::eyre::eyre!("Could not load movie {}; run with -v for details", id))
        }
        other => Err(color_eyre::eyre::eyre!("Unexpected detail outcome: {:?}", other)),
    }
}

pub async fn run_show(id: MovieId, output: &Output) -> Result<()> {
    let ctx = AppContext::load()?;
    let mut ctrl = ctx.controller()?;

    let detail = load_detail(&mut ctrl, id, output).await?;
    render::print_detail(output, &detail, ctrl.watched().contains(id), render::AddHint::Command, &ctx.display);
    Ok(())
}

pub async fn run_watch(id: MovieId, output: &Output) -> Result<()> {
    let ctx = AppContext::load()?;
    let mut ctrl = ctx.controller()?;

    if ctrl.watched().contains(id) {
        report_already_watched(id, ctrl.watched().get(id).map(|m| m.title.as_str()), output);
        return Ok(());
    }

    let detail = load_detail(&mut ctrl, id, output).await?;
    match ctrl.add_selected_to_watched() {
        Some(AddOutcome::Added { persisted }) => {
            if output.is_human() {
                output.success(format!("Added \"{}\" to your watched list", detail.title));
                if !persisted {
                    output.warn("The watched list could not be saved; check the log for details");
                }
                output.info(popcorn_core::display::stats_line(ctrl.watched().len()));
            } else {
                output.json(&json!({
                    "type": "watched_added",
                    "id": id,
                    "title": detail.title,
                    "persisted": persisted,
                    "count": ctrl.watched().len(),
                }));
            }
            Ok(())
        }
        Some(AddOutcome::AlreadyWatched) => {
            report_already_watched(id, Some(&detail.title), output);
            Ok(())
        }
        None => Err(color_eyre::eyre::eyre!("Movie {} was not loaded", id)),
    }
}

fn report_already_watched(id: MovieId, title: Option<&str>, output: &Output) {
    if output.is_human() {
        output.info(format!("\"{}\" is already on your watched list", title.unwrap_or("?")));
    } else {
        output.json(&json!({
            "type": "already_watched",
            "id": id,
            "title": title,
        }));
    }
}
