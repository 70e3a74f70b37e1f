use anyhow::Result;
use clap::Parser;
use std::sync::Arc;

use rolodex::app::App;
use rolodex::backend::HttpContactFetcher;
use rolodex::cli::Cli;
use rolodex::config::{get_config_path, Config};

/// Set up panic hook to restore terminal state on panic
fn setup_panic_hook() {
    let original_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |panic_info| {
        // Restore terminal state before handling panic so the shell
        // stays usable afterwards
        let _ = crossterm::terminal::disable_raw_mode();
        let _ = crossterm::execute!(std::io::stdout(), crossterm::terminal::LeaveAlternateScreen);
        original_hook(panic_info);
    }));
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let config_path = cli.config.clone().unwrap_or_else(get_config_path);
    let mut config = Config::load_or_create(&config_path)?;
    if let Some(api_url) = &cli.api_url {
        config.api_url = api_url.clone();
    }

    // Non-TUI subcommands run and exit before any terminal setup
    if cli.execute(&config)? {
        return Ok(());
    }

    setup_panic_hook();

    // The TUI owns the terminal, so logs go to a file
    let log_dir = dirs::cache_dir()
        .unwrap_or_else(|| dirs::home_dir().unwrap_or_default())
        .join("rolodex");
    std::fs::create_dir_all(&log_dir)?;

    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));
    let file_appender = tracing_appender::rolling::never(&log_dir, "rolodex.log");
    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(non_blocking)
        .with_ansi(false)
        .init();

    let account_id = cli.account_id.clone().or_else(|| config.account_id.clone());
    let page_size = cli.page_size.clone().or_else(|| config.page_size.clone());
    let fetcher = Arc::new(HttpContactFetcher::new(
        config.api_url.clone(),
        config.token.clone(),
    ));

    let mut app = App::new(fetcher, account_id, page_size, config.link_base.clone())?;
    let result = app.run();

    drop(guard);
    result
}
