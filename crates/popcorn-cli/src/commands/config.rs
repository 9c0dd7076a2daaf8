use super::prompts;
use crate::output::Output;
use color_eyre::Result;
use comfy_table::{Attribute, Cell, Color, Table};
use owo_colors::OwoColorize;
use popcorn_config::{Config, CredentialStore, PathManager, API_KEY_ENV};
use serde_json::json;

pub fn run_config(cmd: crate::ConfigCommands, output: &Output) -> Result<()> {
    match cmd {
        crate::ConfigCommands::Show { full } => show_config(full, output),
        crate::ConfigCommands::Init { force } => init_config(force, output),
        crate::ConfigCommands::ApiKey { key } => configure_api_key(key, output),
    }
}

fn load_credentials(path_manager: &PathManager) -> Result<CredentialStore> {
    let credentials_file = path_manager.credentials_file();
    let mut cred_store = CredentialStore::new(credentials_file.clone());
    cred_store
        .load()
        .map_err(|e| color_eyre::eyre::eyre!("Failed to load credentials from {}: {}", credentials_file.display(), e))?;
    Ok(cred_store)
}

fn show_config(full: bool, output: &Output) -> Result<()> {
    let path_manager = PathManager::default();
    let config_file = path_manager.config_file();

    let config = Config::load_or_default(&config_file)
        .map_err(|e| color_eyre::eyre::eyre!("Failed to load config from {}: {}", config_file.display(), e))?;
    let cred_store = load_credentials(&path_manager)?;

    let key_from_env = std::env::var(API_KEY_ENV).map(|v| !v.trim().is_empty()).unwrap_or(false);
    let api_key = cred_store.resolve_tmdb_api_key().unwrap_or_default();
    let api_key_display = if full { api_key.clone() } else { mask_string(&api_key) };

    if !output.is_human() {
        output.json(&json!({
            "type": "config",
            "config_file": config_file.display().to_string(),
            "config_file_exists": config_file.exists(),
            "data_dir": path_manager.data_dir().display().to_string(),
            "log_dir": path_manager.log_dir().display().to_string(),
            "api_key": api_key_display,
            "api_key_from_env": key_from_env,
            "config": config,
        }));
        return Ok(());
    }

    if output.is_quiet() {
        return Ok(());
    }

    println!("\n{}", "Configuration".bright_cyan().bold());
    if !config_file.exists() {
        output.warn(format!(
            "No config file at {}; showing defaults. Run 'popcorn config init' to write one.",
            config_file.display()
        ));
    }

    let mut paths_table = Table::new();
    paths_table.load_preset(comfy_table::presets::UTF8_FULL);
    paths_table.apply_modifier(comfy_table::modifiers::UTF8_ROUND_CORNERS);
    paths_table.set_header(vec![
        Cell::new("Paths").fg(Color::Cyan).add_attribute(Attribute::Bold),
        Cell::new(""),
    ]);
    paths_table.add_row(vec![Cell::new("Config File"), Cell::new(config_file.display())]);
    paths_table.add_row(vec![Cell::new("Data Directory"), Cell::new(path_manager.data_dir().display())]);
    paths_table.add_row(vec![Cell::new("Log Directory"), Cell::new(path_manager.log_dir().display())]);
    println!("{}", paths_table);

    let mut tmdb_table = Table::new();
    tmdb_table.load_preset(comfy_table::presets::UTF8_FULL);
    tmdb_table.apply_modifier(comfy_table::modifiers::UTF8_ROUND_CORNERS);
    tmdb_table.set_header(vec![
        Cell::new("TMDB").fg(Color::Cyan).add_attribute(Attribute::Bold),
        Cell::new(""),
    ]);
    let key_source = if key_from_env { format!(" (from {})", API_KEY_ENV) } else { String::new() };
    tmdb_table.add_row(vec![Cell::new("API Key"), Cell::new(format!("{}{}", api_key_display, key_source))]);
    tmdb_table.add_row(vec![Cell::new("API Base URL"), Cell::new(&config.tmdb.api_base_url)]);
    tmdb_table.add_row(vec![Cell::new("Image Base URL"), Cell::new(&config.tmdb.image_base_url)]);
    tmdb_table.add_row(vec![
        Cell::new("Include Adult"),
        Cell::new(if config.tmdb.include_adult { "✓".green().to_string() } else { "✗".red().to_string() }),
    ]);
    println!("{}", tmdb_table);

    let mut app_table = Table::new();
    app_table.load_preset(comfy_table::presets::UTF8_FULL);
    app_table.apply_modifier(comfy_table::modifiers::UTF8_ROUND_CORNERS);
    app_table.set_header(vec![
        Cell::new("Behaviour").fg(Color::Cyan).add_attribute(Attribute::Bold),
        Cell::new(""),
    ]);
    app_table.add_row(vec![Cell::new("Search Debounce"), Cell::new(format!("{} ms", config.search.debounce_ms))]);
    app_table.add_row(vec![Cell::new("Watched List Key"), Cell::new(&config.storage.watched_key)]);
    app_table.add_row(vec![Cell::new("Title Limit"), Cell::new(config.display.title_max_chars)]);
    app_table.add_row(vec![Cell::new("Overview Limit"), Cell::new(config.display.overview_max_chars)]);
    app_table.add_row(vec![Cell::new("Wide Viewport From"), Cell::new(config.display.wide_viewport_min_width)]);
    app_table.add_row(vec![Cell::new("Viewport Width"), Cell::new(config.display.viewport_width)]);
    println!("{}", app_table);

    Ok(())
}

fn init_config(force: bool, output: &Output) -> Result<()> {
    let path_manager = PathManager::default();
    let config_file = path_manager.config_file();

    if config_file.exists() && !force {
        return Err(color_eyre::eyre::eyre!(
            "Config file already exists at {}. Use --force to overwrite it.",
            config_file.display()
        ));
    }

    path_manager
        .ensure_directories()
        .map_err(|e| color_eyre::eyre::eyre!("Failed to create directories: {}", e))?;
    Config::default()
        .save_to_file(&config_file)
        .map_err(|e| color_eyre::eyre::eyre!("Failed to write config to {}: {}", config_file.display(), e))?;

    if output.is_human() {
        output.success(format!("Wrote default configuration to {}", config_file.display()));
    } else {
        output.json(&json!({
            "type": "config_init",
            "config_file": config_file.display().to_string(),
        }));
    }
    Ok(())
}

fn configure_api_key(key_arg: Option<String>, output: &Output) -> Result<()> {
    let path_manager = PathManager::default();
    let mut cred_store = load_credentials(&path_manager)?;

    if let Some(existing) = cred_store.get_tmdb_api_key() {
        if key_arg.is_none() && !existing.is_empty() {
            output.info(format!("A TMDB API key is already stored ({})", mask_string(existing)));
            if !prompts::prompt_yes_no("Replace it?", Some(false))? {
                return Ok(());
            }
        }
    }

    let key = match key_arg {
        Some(k) => k,
        None => {
            output.info("Get a key at https://www.themoviedb.org/settings/api");
            prompts::prompt_password("TMDB API key")?
        }
    };
    let key = key.trim().to_string();
    validate_api_key(&key).map_err(|e| color_eyre::eyre::eyre!("{}", e))?;

    cred_store.set_tmdb_api_key(key);
    cred_store
        .save()
        .map_err(|e| color_eyre::eyre::eyre!("Failed to save credentials: {}", e))?;
    tracing::info!("Stored TMDB API key in {:?}", path_manager.credentials_file());

    if output.is_human() {
        output.success(format!("TMDB API key saved to {}", path_manager.credentials_file().display()));
        if std::env::var(API_KEY_ENV).map(|v| !v.trim().is_empty()).unwrap_or(false) {
            output.warn(format!("{} is set and takes precedence over the stored key", API_KEY_ENV));
        }
    } else {
        output.json(&json!({
            "type": "api_key_saved",
            "credentials_file": path_manager.credentials_file().display().to_string(),
        }));
    }
    Ok(())
}

fn validate_api_key(input: &str) -> Result<(), &'static str> {
    if input.is_empty() {
        return Err("API key cannot be empty");
    }
    if input.chars().any(char::is_whitespace) {
        return Err("API key cannot contain whitespace");
    }
    Ok(())
}

fn mask_string(s: &str) -> String {
    if s.is_empty() {
        return "<not set>".to_string();
    }
    let chars: Vec<char> = s.chars().collect();
    if chars.len() <= 4 {
        return "*".repeat(chars.len());
    }
    let head: String = chars[..2].iter().collect();
    let tail: String = chars[chars.len() - 2..].iter().collect();
    format!("{}***{}", head, tail)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mask_string() {
        assert_eq!(mask_string(""), "<not set>");
        assert_eq!(mask_string("abc"), "***");
        assert_eq!(mask_string("0123456789abcdef"), "01***ef");
    }

    #[test]
    fn test_validate_api_key() {
        assert!(validate_api_key("").is_err());
        assert!(validate_api_key("abc def").is_err());
        assert!(validate_api_key("0123456789abcdef").is_ok());
    }
}
