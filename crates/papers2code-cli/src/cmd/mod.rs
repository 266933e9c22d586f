//! Subcommands

use std::sync::Arc;

use anyhow::Result;
use chrono::NaiveDate;
use clap::ValueEnum;
use papers2code_client::{ControllerOptions, HttpPapersApi, Session};
use papers2code_core::SortPreference;

use crate::config::Config;

pub mod browse;
pub mod list;
pub mod url;
pub mod vote;

/// Exit code when the server asks for a login
pub const EXIT_LOGIN_REQUIRED: u8 = 2;

#[derive(Clone, Copy, ValueEnum, Debug)]
pub enum SortArg {
    Newest,
    Oldest,
    Upvotes,
}

impl From<SortArg> for SortPreference {
    fn from(s: SortArg) -> Self {
        match s {
            SortArg::Newest => SortPreference::Newest,
            SortArg::Oldest => SortPreference::Oldest,
            SortArg::Upvotes => SortPreference::Upvotes,
        }
    }
}

pub fn parse_date(s: &str) -> Result<NaiveDate, String> {
    papers2code_core::parse_date(s).ok_or_else(|| format!("invalid date {s:?}, expected YYYY-MM-DD"))
}

pub fn build_api(config: &Config) -> Result<Arc<HttpPapersApi>> {
    let session = Arc::new(Session::new(config.auth.access_token.clone()));
    let api = HttpPapersApi::new(&config.api.base_url, config.timeout(), session)?;
    Ok(Arc::new(api))
}

pub fn controller_options(config: &Config) -> ControllerOptions {
    ControllerOptions {
        page_size: config.api.page_size,
        debounce: config.debounce(),
    }
}

pub fn print_login_hint() {
    eprintln!(
        "Login required. Set {} or [auth] access_token in the config file.",
        crate::config::TOKEN_ENV
    );
}
