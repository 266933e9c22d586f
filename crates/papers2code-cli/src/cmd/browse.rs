//! Browse subcommand - interactive, line-driven paper list
//!
//! Each input line is one intent. Search edits go through the debouncer, so
//! several quick `/query` lines (e.g. piped input) produce a single request.

use std::process::ExitCode;

use anyhow::Result;
use chrono::NaiveDate;
use clap::Args;
use papers2code_client::{ListEvent, PaperListController, PapersApi};
use papers2code_core::{FilterField, History, MemoryHistory, SortPreference, Transition, Vote};
use tokio::io::{AsyncBufReadExt, BufReader};

use super::print_login_hint;
use crate::config::Config;
use crate::render;

const HELP: &str = "\
commands:
  /<text> | search <text>   search (empty clears)
  sort newest|oldest|upvotes
  n | p | page <n>          paging
  authors <text>            draft filter: author search
  tags <a,b>                draft filter: tags
  from <date|->  to <date|->  draft filter: publication date range
  code on|off               draft filter: has implementation
  contributor <id|->        draft filter: contributor
  apply | clear             apply or clear the draft filters
  vote <id> up|none         vote on a listed paper
  back | forward            history navigation
  reload | url | help | quit";

#[derive(Args, Debug)]
pub struct BrowseArgs {
    /// Share-link query string to start from
    #[arg(long)]
    pub from_url: Option<String>,
}

/// One parsed input line.
#[derive(Debug, PartialEq, Eq)]
pub enum BrowseCommand {
    Search(String),
    Sort(SortPreference),
    Next,
    Prev,
    Page(u32),
    Filter(FilterField),
    Apply,
    Clear,
    Vote(String, Vote),
    Back,
    Forward,
    Reload,
    ShowUrl,
    Help,
    Quit,
}

fn optional_date(arg: &str) -> Result<Option<NaiveDate>, String> {
    if arg == "-" || arg.is_empty() {
        return Ok(None);
    }
    super::parse_date(arg).map(Some)
}

fn optional_text(arg: &str) -> String {
    if arg == "-" {
        String::new()
    } else {
        arg.to_string()
    }
}

pub fn parse_command(line: &str) -> Result<BrowseCommand, String> {
    let line = line.trim();
    if let Some(text) = line.strip_prefix('/') {
        return Ok(BrowseCommand::Search(text.trim().to_string()));
    }
    let (word, rest) = match line.split_once(char::is_whitespace) {
        Some((word, rest)) => (word, rest.trim()),
        None => (line, ""),
    };
    let cmd = match word {
        "search" | "s" => BrowseCommand::Search(rest.to_string()),
        "sort" => BrowseCommand::Sort(
            SortPreference::from_name(rest)
                .ok_or_else(|| format!("unknown sort {rest:?} (newest, oldest, upvotes)"))?,
        ),
        "n" | "next" => BrowseCommand::Next,
        "p" | "prev" => BrowseCommand::Prev,
        "page" => BrowseCommand::Page(
            rest.parse()
                .map_err(|_| format!("invalid page number {rest:?}"))?,
        ),
        "authors" => BrowseCommand::Filter(FilterField::SearchAuthors(optional_text(rest))),
        "tags" => BrowseCommand::Filter(FilterField::Tags(
            rest.split(',').map(str::to_string).collect(),
        )),
        "from" => BrowseCommand::Filter(FilterField::StartDate(optional_date(rest)?)),
        "to" => BrowseCommand::Filter(FilterField::EndDate(optional_date(rest)?)),
        "code" => BrowseCommand::Filter(FilterField::HasCode(match rest {
            "on" | "yes" | "true" => true,
            "off" | "no" | "false" => false,
            other => return Err(format!("expected on/off, got {other:?}")),
        })),
        "contributor" => BrowseCommand::Filter(FilterField::ContributorId(optional_text(rest))),
        "apply" => BrowseCommand::Apply,
        "clear" => BrowseCommand::Clear,
        "vote" => {
            let (id, vote) = rest
                .split_once(char::is_whitespace)
                .ok_or("usage: vote <id> up|none")?;
            let vote = Vote::from_name(vote.trim())
                .ok_or_else(|| format!("unknown vote {vote:?} (up, none)"))?;
            BrowseCommand::Vote(id.to_string(), vote)
        }
        "back" => BrowseCommand::Back,
        "forward" => BrowseCommand::Forward,
        "reload" | "r" => BrowseCommand::Reload,
        "url" => BrowseCommand::ShowUrl,
        "help" | "?" => BrowseCommand::Help,
        "quit" | "q" | "exit" => BrowseCommand::Quit,
        other => return Err(format!("unknown command {other:?}, try `help`")),
    };
    Ok(cmd)
}

enum Wake {
    Line(Option<String>),
    Event(ListEvent),
}

pub async fn run(args: BrowseArgs, config: &Config) -> Result<ExitCode> {
    let api = super::build_api(config)?;
    let history = MemoryHistory::new(args.from_url.unwrap_or_default());
    let mut controller = PaperListController::new(api, history, super::controller_options(config));
    controller.mount();
    eprintln!("{HELP}");

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        let wake = tokio::select! {
            line = lines.next_line() => Wake::Line(line?),
            event = controller.next_event() => Wake::Event(event),
        };
        match wake {
            Wake::Line(None) => break,
            Wake::Line(Some(line)) if line.trim().is_empty() => {}
            Wake::Line(Some(line)) => match parse_command(&line) {
                Ok(BrowseCommand::Quit) => break,
                Ok(cmd) => execute(&mut controller, cmd, config).await,
                Err(msg) => eprintln!("{msg}"),
            },
            Wake::Event(event) => show_event(&mut controller, event, config),
        }
    }

    // Drain so piped input still prints its final page
    for event in controller.settle().await {
        show_event(&mut controller, event, config);
    }
    Ok(ExitCode::SUCCESS)
}

async fn execute<A: PapersApi>(
    c: &mut PaperListController<A, MemoryHistory>,
    cmd: BrowseCommand,
    config: &Config,
) {
    let transition = match cmd {
        BrowseCommand::Search(text) => {
            c.set_search_term(text);
            return;
        }
        BrowseCommand::Sort(sort) => c.set_sort(sort),
        BrowseCommand::Next => c.next_page(),
        BrowseCommand::Prev => c.prev_page(),
        BrowseCommand::Page(n) => c.set_page(n),
        BrowseCommand::Filter(field) => {
            c.set_filter_field(field);
            eprintln!("draft: {:?} (type `apply` to search)", c.draft_filters());
            return;
        }
        BrowseCommand::Apply => c.apply_filters(),
        BrowseCommand::Clear => c.clear_filters(),
        BrowseCommand::Vote(id, vote) => {
            match c.vote(&id, vote).await {
                Ok(()) => show_list(c, config),
                Err(e) if e.requires_login() => {
                    print_login_hint();
                    c.acknowledge_login_prompt();
                }
                Err(e) => eprintln!("Vote failed: {e}"),
            }
            return;
        }
        BrowseCommand::Back => navigate(c, MemoryHistory::back),
        BrowseCommand::Forward => navigate(c, MemoryHistory::forward),
        BrowseCommand::Reload => {
            c.reload();
            return;
        }
        BrowseCommand::ShowUrl => {
            println!("?{}", c.history().location());
            return;
        }
        BrowseCommand::Help => {
            eprintln!("{HELP}");
            return;
        }
        BrowseCommand::Quit => return,
    };
    if let Some(reason) = transition.rejected {
        eprintln!("{reason}");
    } else if !transition.refetch {
        eprintln!("nothing changed");
    }
}

fn navigate<A: PapersApi>(
    c: &mut PaperListController<A, MemoryHistory>,
    step: fn(&mut MemoryHistory) -> bool,
) -> Transition {
    if !step(c.history_mut()) {
        eprintln!("no further history");
    }
    c.location_changed()
}

fn show_event<A: PapersApi>(
    c: &mut PaperListController<A, MemoryHistory>,
    event: ListEvent,
    config: &Config,
) {
    match event {
        ListEvent::SearchSettled(term) => log::debug!("Searching for {term:?}"),
        ListEvent::Loaded { .. } => {
            // A clamped page triggers one more fetch; wait for it
            if !c.is_loading() {
                show_list(c, config);
            }
        }
        ListEvent::Failed(e) => eprintln!("Error: {e}"),
        ListEvent::LoginRequired => {
            print_login_hint();
            c.acknowledge_login_prompt();
        }
    }
}

fn show_list<A: PapersApi>(c: &PaperListController<A, MemoryHistory>, config: &Config) {
    if c.papers().is_empty() {
        println!("No papers match this query.");
    } else {
        println!("{}", render::papers_table(c.papers()));
    }
    let labels = c.page_labels(config.ui.page_window);
    println!("{}", render::footer(c.state(), &labels));
}
