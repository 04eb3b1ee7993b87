use crate::cli::{Cli, Command};
use crate::dependency::{CommandRunner, ProcessRunner};
use crate::error::Result;
use crate::fs::{FileSystem, RealFs};
use crate::http::{HttpClient, ReqwestHttpClient};
use crate::prompt::{Prompter, TerminalPrompter};
use std::path::PathBuf;

pub mod add;
pub mod init;
pub mod list;

/// コマンドが使う外部要素
pub struct Context<'a> {
    pub fs: &'a dyn FileSystem,
    pub http: &'a dyn HttpClient,
    pub runner: &'a dyn CommandRunner,
    pub prompter: &'a dyn Prompter,
    pub cwd: PathBuf,
}

pub async fn dispatch(cli: Cli) -> Result<()> {
    let fs = RealFs;
    let http = ReqwestHttpClient::default();
    let runner = ProcessRunner;
    let prompter = TerminalPrompter::new();
    let ctx = Context {
        fs: &fs,
        http: &http,
        runner: &runner,
        prompter: &prompter,
        cwd: std::env::current_dir()?,
    };

    match cli.command {
        Command::Add(args) => add::run(args, &ctx).await,
        Command::Init(args) => init::run(args, &ctx).await,
        Command::List(args) => list::run(args, &ctx).await,
    }
}
