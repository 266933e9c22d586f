//! papers2code - browse the Papers2Code paper list from the terminal
//!
//! Searches, filters and pages through papers with the same query
//! semantics as the web list, and prints share links for the result.

use std::process::ExitCode;

use anyhow::Result;
use clap::{Parser, Subcommand};

mod cmd;
mod config;
mod progress;
mod render;

use config::Config;
use progress::ProgressContext;

#[derive(Parser)]
#[command(name = "papers2code")]
#[command(about = "Search and browse the Papers2Code paper list")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Command,

    /// Enable debug logging
    #[arg(long, global = true)]
    debug: bool,

    /// Only log warnings and errors
    #[arg(short, long, global = true)]
    quiet: bool,

    /// Config file path (default: ./papers2code.toml or ~/.config/papers2code/config.toml)
    #[arg(short, long, global = true)]
    config: Option<std::path::PathBuf>,

    /// API base URL, e.g. https://papers2code.example/api
    #[arg(long, global = true)]
    api_url: Option<String>,

    /// Request timeout in seconds
    #[arg(long, global = true)]
    timeout: Option<u64>,
}

#[derive(Subcommand)]
enum Command {
    /// Fetch one page of papers and print it
    List(cmd::list::ListArgs),
    /// Interactive list: search, filter and page from stdin
    Browse(cmd::browse::BrowseArgs),
    /// Upvote a paper or retract a vote
    Vote(cmd::vote::VoteArgs),
    /// Decode a share link
    Url(cmd::url::UrlArgs),
    /// Show current configuration
    Config,
}

fn main() -> Result<ExitCode> {
    let cli = Cli::parse();

    let progress = ProgressContext::new();

    // TTY: warn unless --debug, spinners show activity. Otherwise info.
    let is_tty = progress.is_tty();
    let multi = if is_tty { Some(progress.multi()) } else { None };
    let quiet = cli.quiet || (is_tty && !cli.debug);
    papers2code_core::init_logging(quiet, cli.debug, multi);

    let mut config = if let Some(path) = &cli.config {
        Config::from_file(path)?
    } else {
        Config::load()?
    };
    if let Some(url) = cli.api_url {
        config.api.base_url = url;
    }
    if let Some(secs) = cli.timeout {
        config.api.timeout_secs = secs;
    }
    log::debug!("Using API at {}", config.api.base_url);

    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()?;

    match cli.command {
        Command::List(args) => runtime.block_on(cmd::list::run(args, &config, &progress)),
        Command::Browse(args) => runtime.block_on(cmd::browse::run(args, &config)),
        Command::Vote(args) => runtime.block_on(cmd::vote::run(args, &config, &progress)),
        Command::Url(args) => {
            cmd::url::run(args);
            Ok(ExitCode::SUCCESS)
        }
        Command::Config => {
            use comfy_table::{
                Cell, Color, Table, modifiers::UTF8_ROUND_CORNERS, presets::UTF8_FULL,
            };

            let mut table = Table::new();
            table
                .load_preset(UTF8_FULL)
                .apply_modifier(UTF8_ROUND_CORNERS)
                .set_header(vec![
                    Cell::new("Setting").fg(Color::Cyan),
                    Cell::new("Value").fg(Color::Cyan),
                ]);

            table.add_row(vec!["API base URL", &config.api.base_url]);
            table.add_row(vec!["Page size", &config.api.page_size.to_string()]);
            table.add_row(vec!["Timeout", &format!("{}s", config.api.timeout_secs)]);
            table.add_row(vec![
                "Access token",
                if config.auth.access_token.is_some() {
                    "configured"
                } else {
                    "not set"
                },
            ]);
            table.add_row(vec!["Debounce", &format!("{}ms", config.ui.debounce_ms)]);
            table.add_row(vec!["Page window", &config.ui.page_window.to_string()]);

            eprintln!("\n{table}");
            Ok(ExitCode::SUCCESS)
        }
    }
}
