//! Vote subcommand

use std::process::ExitCode;

use anyhow::Result;
use clap::{Args, ValueEnum};
use papers2code_client::PapersApi;
use papers2code_core::Vote;

use super::{EXIT_LOGIN_REQUIRED, print_login_hint};
use crate::config::Config;
use crate::progress::ProgressContext;
use crate::render;

#[derive(Clone, Copy, ValueEnum, Debug)]
pub enum VoteArg {
    Up,
    #[value(name = "none")]
    Retract,
}

impl From<VoteArg> for Vote {
    fn from(v: VoteArg) -> Self {
        match v {
            VoteArg::Up => Vote::Up,
            VoteArg::Retract => Vote::Neutral,
        }
    }
}

#[derive(Args, Debug)]
pub struct VoteArgs {
    /// Paper id
    pub id: String,

    /// `up` to upvote, `none` to retract
    #[arg(value_enum, default_value = "up")]
    pub vote: VoteArg,
}

pub async fn run(args: VoteArgs, config: &Config, progress: &ProgressContext) -> Result<ExitCode> {
    let api = super::build_api(config)?;
    let pb = progress.spinner(&format!("Voting on {}", args.id));
    let result = api.vote(&args.id, args.vote.into()).await;
    pb.finish_and_clear();

    match result {
        Ok(paper) => {
            println!("{}", render::papers_table(std::slice::from_ref(&paper)));
            Ok(ExitCode::SUCCESS)
        }
        Err(e) if e.requires_login() => {
            print_login_hint();
            Ok(ExitCode::from(EXIT_LOGIN_REQUIRED))
        }
        Err(e) => Err(e.into()),
    }
}
