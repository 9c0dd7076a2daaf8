use clap::{ArgAction, Parser, Subcommand};
use commands::{config, interactive, movie, search, watched};
use popcorn_config::PathManager;

mod commands;
mod logging;
mod output;

#[derive(Parser)]
#[command(name = "popcorn")]
#[command(about = "popcorn - search movies and keep track of the ones you've watched")]
#[command(version)]
struct Cli {
    /// Enable verbose output (use multiple times for more verbosity: -v, -vv, -vvv)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,

    /// Suppress all output except errors
    #[arg(short, long, global = true)]
    quiet: bool,

    /// Output format
    #[arg(long, global = true, default_value = "human", value_enum)]
    output: output::OutputFormat,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Search movies by title
    #[command(long_about = "Search TMDB for movies matching the query and list the first page of results. The request goes out after the configured debounce delay, just like in the interactive session.")]
    Search {
        /// Title to search for (may be empty)
        #[arg(num_args = 0.., trailing_var_arg = true)]
        query: Vec<String>,
    },
    /// Show details for one movie
    Show {
        /// TMDB movie id
        id: u64,
    },
    /// Mark a movie as watched
    #[command(long_about = "Fetch the movie's details and add it to the watched list. Adding a movie that is already on the list changes nothing.")]
    Watch {
        /// TMDB movie id
        id: u64,
    },
    /// List the movies you've watched
    Watched,
    /// Interactive search session
    #[command(long_about = "Line-driven session: type a title to search (only the last of several fast edits is sent), an empty line to clear the query, ':select <id>' to open a movie, ':back' to close it, ':add' to mark it watched, ':list' to show the watched list and ':quit' to leave. Logs go to the log directory instead of the terminal.")]
    Interactive,
    /// Manage configuration and the API key
    Config {
        #[command(subcommand)]
        cmd: ConfigCommands,
    },
}

#[derive(Subcommand)]
enum ConfigCommands {
    /// Show current configuration (masks the API key)
    Show {
        /// Show the API key unmasked
        #[arg(long, action = ArgAction::SetTrue)]
        full: bool,
    },
    /// Write a config file with default values
    Init {
        /// Overwrite an existing config file
        #[arg(long, action = ArgAction::SetTrue)]
        force: bool,
    },
    /// Store the TMDB API key
    #[command(long_about = "Store the TMDB API key in the credentials file. Prompts with hidden input when --key is omitted. The POPCORN_TMDB_API_KEY environment variable overrides the stored key.")]
    ApiKey {
        /// TMDB API key (if not provided, will prompt)
        #[arg(long)]
        key: Option<String>,
    },
}

#[tokio::main]
async fn main() -> color_eyre::Result<()> {
    color_eyre::install()?;

    let cli = Cli::parse();

    // The interactive session owns the terminal, so its logs go to a file
    let log_file = match cli.command {
        Commands::Interactive => Some(PathManager::default().session_log_file()),
        _ => None,
    };
    logging::init_logging_with_file(cli.verbose, cli.quiet, log_file)
        .map_err(|e| color_eyre::eyre::eyre!("{}", e))?;

    let output = output::Output::new(cli.output, cli.quiet);

    match cli.command {
        Commands::Search { query } => search::run_search(query.join(" "), &output).await,
        Commands::Show { id } => movie::run_show(id, &output).await,
        Commands::Watch { id } => movie::run_watch(id, &output).await,
        Commands::Watched => watched::run_watched(&output),
        Commands::Interactive => interactive::run_interactive(&output).await,
        Commands::Config { cmd } => config::run_config(cmd, &output),
    }
}
