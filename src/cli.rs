use crate::backend::{ContactFetcher, HttpContactFetcher};
use crate::config::Config;
use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tokio::runtime::Runtime;

/// A terminal viewer for CRM account contacts
#[derive(Parser, Debug)]
#[command(name = "rolodex", version, about = "A terminal viewer for CRM account contacts", long_about = None)]
pub struct Cli {
    /// Account whose contacts to show (overrides the config file)
    pub account_id: Option<String>,

    /// Rows per page; values that are not a positive integer fall back to 10
    #[arg(short, long)]
    pub page_size: Option<String>,

    /// Base URL of the contacts API (overrides the config file)
    #[arg(long)]
    pub api_url: Option<String>,

    /// Path to the config file
    #[arg(long)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Print an account's contacts and exit (no TUI)
    List {
        /// Account to list (falls back to the configured default)
        account_id: Option<String>,
        /// Filter contacts by a search term
        #[arg(short, long)]
        search: Option<String>,
    },
}

impl Cli {
    /// Execute a non-TUI subcommand. Returns `Ok(false)` when no subcommand
    /// was given and the TUI should launch instead.
    pub fn execute(&self, config: &Config) -> Result<bool> {
        match &self.command {
            Some(Commands::List { account_id, search }) => {
                Self::cmd_list(config, account_id.as_deref(), search.as_deref())?;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    fn cmd_list(config: &Config, account_id: Option<&str>, search: Option<&str>) -> Result<()> {
        let Some(account) = account_id
            .map(str::to_string)
            .or_else(|| config.account_id.clone())
        else {
            eprintln!("❌ No account id given. Pass one or set `account_id` in the config file.");
            std::process::exit(1);
        };

        let fetcher = HttpContactFetcher::new(config.api_url.clone(), config.token.clone());
        let runtime = Runtime::new().context("Failed to create tokio runtime")?;
        let outcome =
            runtime.block_on(fetcher.fetch_contacts(&account, search.unwrap_or_default()));

        let records = match outcome {
            Ok(records) => records,
            Err(err) => {
                eprintln!("❌ {}", err.user_message());
                std::process::exit(1);
            }
        };

        if records.is_empty() {
            println!("No contacts found for account {account}.");
            return Ok(());
        }

        println!("Contacts for account {account} ({}):", records.len());
        for record in records {
            println!(
                "  {} — {} <{}> {} ({})",
                record.name, record.title, record.email, record.phone, record.account_name
            );
        }
        Ok(())
    }
}
