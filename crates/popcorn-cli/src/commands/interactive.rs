use super::{render, AppContext};
use crate::output::Output;
use color_eyre::Result;
use popcorn_core::display::stats_line;
use popcorn_core::{AddOutcome, AppController, StateChange};
use popcorn_models::MovieId;
use popcorn_sources::TmdbClient;
use tokio::io::{AsyncBufReadExt, BufReader};

const HELP: &str = "\
Type a title to search. An empty line clears the query.
  :select <id>   open a movie (again to close it)
  :back          close the open movie
  :add           add the open movie to your watched list
  :list          show your watched list
  :help          show this help
  :quit          leave";

/// One line of input from the session prompt.
#[derive(Debug, Clone, PartialEq, Eq)]
enum SessionCommand {
    Query(String),
    Select(MovieId),
    Back,
    Add,
    List,
    Help,
    Quit,
    Invalid(String),
}

impl SessionCommand {
    fn parse(line: &str) -> Self {
        let line = line.trim();
        let Some(command) = line.strip_prefix(':') else {
            return SessionCommand::Query(line.to_string());
        };

        let mut parts = command.split_whitespace();
        match (parts.next(), parts.next(), parts.next()) {
            (Some("select" | "s"), Some(id), None) => match id.parse() {
                Ok(id) => SessionCommand::Select(id),
                Err(_) => SessionCommand::Invalid(format!("Not a movie id: {}", id)),
            },
            (Some("select" | "s"), None, None) => {
                SessionCommand::Invalid("Usage: :select <id>".to_string())
            }
            (Some("back" | "b"), None, None) => SessionCommand::Back,
            (Some("add" | "a"), None, None) => SessionCommand::Add,
            (Some("list" | "l"), None, None) => SessionCommand::List,
            (Some("help" | "h" | "?"), None, None) => SessionCommand::Help,
            (Some("quit" | "q" | "exit"), None, None) => SessionCommand::Quit,
            _ => SessionCommand::Invalid(format!("Unknown command: {}", line)),
        }
    }
}

struct Session<'a> {
    ctx: &'a AppContext,
    output: &'a Output,
    ctrl: AppController<TmdbClient>,
}

impl Session<'_> {
    fn prompt(&self) {
        if self.output.is_human() {
            if let Err(e) = self.output.print("popcorn> ") {
                tracing::debug!("Failed to write prompt: {}", e);
            }
        }
    }

    /// Returns false when the session should end.
    fn handle_command(&mut self, command: SessionCommand) -> bool {
        match command {
            SessionCommand::Query(query) => {
                tracing::debug!(query = %query, "Query changed");
                self.ctrl.set_query(query);
            }
            SessionCommand::Select(id) => {
                self.ctrl.toggle_selection(id);
                if self.ctrl.selection().is_selected(id) {
                    self.output.info(format!("Loading movie {}...", id));
                } else {
                    self.output.info("Closed movie");
                }
            }
            SessionCommand::Back => {
                if self.ctrl.selection().id().is_some() {
                    self.ctrl.clear_selection();
                    self.output.info("Closed movie");
                }
            }
            SessionCommand::Add => self.add_selected(),
            SessionCommand::List => {
                render::print_watched(self.output, self.ctrl.watched(), &self.ctx.display)
            }
            SessionCommand::Help => self.output.block(HELP),
            SessionCommand::Quit => return false,
            SessionCommand::Invalid(message) => self.output.warn(message),
        }
        true
    }

    fn add_selected(&mut self) {
        let title = self.ctrl.detail().loaded().map(|d| d.title.clone());
        match self.ctrl.add_selected_to_watched() {
            None if self.ctrl.detail().is_loading() => {
                self.output.warn("The movie is still loading")
            }
            None => self.output.warn("No movie open; use :select <id> first"),
            Some(AddOutcome::Added { persisted }) => {
                self.output.success(format!(
                    "Added \"{}\" to your watched list ({})",
                    title.unwrap_or_default(),
                    stats_line(self.ctrl.watched().len())
                ));
                if !persisted {
                    self.output.warn("The watched list could not be saved; check the log for details");
                }
            }
            Some(AddOutcome::AlreadyWatched) => self.output.info("You already watched this movie"),
        }
    }

    fn handle_change(&mut self, change: StateChange) {
        match change {
            StateChange::SearchResults { .. } => render::print_search(
                self.output,
                &self.ctrl.view(),
                &self.ctx.display,
                self.ctx.config.display.viewport_width,
            ),
            StateChange::SearchFailed { query } => {
                self.output.warn(format!("Search for \"{}\" failed; previous results kept", query))
            }
            StateChange::DetailLoaded { .. } => {
                let view = self.ctrl.view();
                if let Some(detail) = view.detail.loaded() {
                    render::print_detail(
                        self.output,
                        detail,
                        view.is_selected_watched(),
                        render::AddHint::Session,
                        &self.ctx.display,
                    );
                }
            }
            StateChange::DetailFailed { id } => {
                self.output.error(format!("Could not load movie {}", id))
            }
            StateChange::Discarded => {}
        }
    }
}

pub async fn run_interactive(output: &Output) -> Result<()> {
    let ctx = AppContext::load()?;
    let ctrl = ctx.controller()?;
    let mut session = Session { ctx: &ctx, output, ctrl };

    output.info(format!(
        "🍿 usePopcorn ({}). Type :help for commands.",
        stats_line(session.ctrl.view().watched_count())
    ));
    session.prompt();

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        tokio::select! {
            line = lines.next_line() => {
                let Some(line) = line? else {
                    break;
                };
                if !session.handle_command(SessionCommand::parse(&line)) {
                    break;
                }
            }
            change = session.ctrl.next_update() => {
                if matches!(change, StateChange::Discarded) {
                    continue;
                }
                session.handle_change(change);
            }
        }
        session.prompt();
    }

    session.ctrl.shutdown();
    tracing::info!("Interactive session ended");
    Ok(())
}
