//! List subcommand - one query, one page

use std::process::ExitCode;

use anyhow::Result;
use chrono::NaiveDate;
use clap::Args;
use papers2code_client::PaperListController;
use papers2code_core::{History, MemoryHistory, UrlState};

use super::{SortArg, build_api, controller_options, parse_date, print_login_hint};
use crate::config::Config;
use crate::progress::ProgressContext;
use crate::render;

#[derive(Args, Debug)]
pub struct ListArgs {
    /// Share-link query string to start from (e.g. "searchQuery=gan&page=2")
    #[arg(long)]
    pub from_url: Option<String>,

    /// Full-text search (ranks by relevance)
    #[arg(short, long)]
    pub search: Option<String>,

    /// Sort order when not searching
    #[arg(long, value_enum)]
    pub sort: Option<SortArg>,

    /// Page number (1-based)
    #[arg(short, long)]
    pub page: Option<u32>,

    /// Only papers published on or after this date (YYYY-MM-DD)
    #[arg(long, value_parser = parse_date)]
    pub start_date: Option<NaiveDate>,

    /// Only papers published on or before this date (YYYY-MM-DD)
    #[arg(long, value_parser = parse_date)]
    pub end_date: Option<NaiveDate>,

    /// Author search (ranks by relevance)
    #[arg(long)]
    pub authors: Option<String>,

    /// Tags (comma-separated)
    #[arg(long, value_delimiter = ',')]
    pub tags: Vec<String>,

    /// Only papers with a linked implementation
    #[arg(long)]
    pub has_code: bool,

    /// Only papers with this contributor
    #[arg(long)]
    pub contributor: Option<String>,
}

impl ListArgs {
    /// Starting URL state: the share link, overridden by explicit flags.
    pub fn url_state(&self) -> Result<UrlState> {
        let mut state = UrlState::decode(self.from_url.as_deref().unwrap_or(""));
        if let Some(search) = &self.search {
            state.search = search.clone();
            state.page = 1;
        }
        if let Some(sort) = self.sort {
            state.sort = sort.into();
        }
        let f = &mut state.filters;
        if self.start_date.is_some() {
            f.start_date = self.start_date;
        }
        if self.end_date.is_some() {
            f.end_date = self.end_date;
        }
        if let Some(authors) = &self.authors {
            f.search_authors = authors.clone();
        }
        if !self.tags.is_empty() {
            f.tags = self.tags.clone();
        }
        if self.has_code {
            f.has_code = true;
        }
        if let Some(contributor) = &self.contributor {
            f.contributor_id = contributor.clone();
        }
        state.filters = state.filters.normalized();
        state.filters.validate()?;
        if let Some(page) = self.page {
            state.page = page.max(1);
        }
        Ok(state)
    }
}

pub async fn run(args: ListArgs, config: &Config, progress: &ProgressContext) -> Result<ExitCode> {
    let start = args.url_state()?;
    let api = build_api(config)?;
    let history = MemoryHistory::new(start.encode());
    let mut controller = PaperListController::new(api, history, controller_options(config));

    let spinner = progress.spinner("Loading papers...");
    controller.mount();
    controller.settle().await;
    spinner.finish_and_clear();

    if controller.login_required() {
        print_login_hint();
        return Ok(ExitCode::from(super::EXIT_LOGIN_REQUIRED));
    }
    if let Some(error) = controller.error() {
        eprintln!("Error: {error}");
        return Ok(ExitCode::FAILURE);
    }

    let labels = controller.page_labels(config.ui.page_window);
    if controller.papers().is_empty() {
        println!("No papers match this query.");
    } else {
        println!("{}", render::papers_table(controller.papers()));
    }
    println!("{}", render::footer(controller.state(), &labels));
    let share = controller.history().location();
    if !share.is_empty() {
        println!("Share: ?{share}");
    }
    Ok(ExitCode::SUCCESS)
}
