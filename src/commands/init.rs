//! haber init コマンド
//!
//! 質問に答えて haber.json を作成する。既存の設定は確認のうえ更新し、
//! レジストリURLは引き継ぐ。

use crate::commands::Context;
use crate::config::{
    ConfigPatch, ProjectConfig, Style, CONFIG_FILE, DEFAULT_COMPONENT_DIR, DEFAULT_IMPORT_PATH,
};
use crate::error::Result;
use crate::prompt::Prompter;
use clap::Parser;
use owo_colors::OwoColorize;
use std::path::PathBuf;
use tracing::debug;

#[derive(Debug, Parser)]
pub struct Args {
    /// Project directory (defaults to the current directory)
    #[arg(long)]
    pub cwd: Option<PathBuf>,

    /// Accept all defaults without prompting
    #[arg(short, long)]
    pub yes: bool,
}

/// 質問への回答
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InitAnswers {
    pub style: Style,
    pub tailwind: bool,
    pub component_dir: String,
    pub import_path: String,
}

impl Default for InitAnswers {
    fn default() -> Self {
        Self {
            style: Style::Tailwind,
            tailwind: true,
            component_dir: DEFAULT_COMPONENT_DIR.to_string(),
            import_path: DEFAULT_IMPORT_PATH.to_string(),
        }
    }
}

impl InitAnswers {
    fn into_patch(self) -> ConfigPatch {
        ConfigPatch {
            style: Some(self.style),
            tailwind: Some(self.tailwind),
            component_dir: Some(self.component_dir),
            import_path: Some(self.import_path),
            registry: None,
        }
    }

    fn into_config(self) -> ProjectConfig {
        ProjectConfig {
            style: self.style,
            tailwind: self.tailwind,
            component_dir: self.component_dir,
            import_path: self.import_path,
            ..ProjectConfig::default()
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InitOutcome {
    Created(PathBuf),
    Updated(PathBuf),
    Cancelled,
}

const STYLES: [Style; 2] = [Style::Tailwind, Style::Css];

/// 対話で回答を集める
pub fn collect_answers(prompter: &dyn Prompter) -> Result<InitAnswers> {
    let labels: Vec<&str> = STYLES.iter().map(Style::label).collect();
    let index = prompter.select("Which style would you like to use?", &labels, 0)?;
    let style = STYLES.get(index).copied().unwrap_or_default();

    // CSS Modules では Tailwind を使わない
    let tailwind = match style {
        Style::Tailwind => prompter.confirm("Would you like to use Tailwind CSS?", true)?,
        Style::Css => false,
    };

    let component_dir = prompter.input(
        "Where would you like to install components?",
        Some(DEFAULT_COMPONENT_DIR),
    )?;
    let import_path = prompter.input(
        "Configure the import alias for components:",
        Some(DEFAULT_IMPORT_PATH),
    )?;

    Ok(InitAnswers {
        style,
        tailwind,
        component_dir: non_empty_or(component_dir, DEFAULT_COMPONENT_DIR),
        import_path: non_empty_or(import_path, DEFAULT_IMPORT_PATH),
    })
}

fn non_empty_or(value: String, default: &str) -> String {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        default.to_string()
    } else {
        trimmed.to_string()
    }
}

pub async fn run(args: Args, ctx: &Context<'_>) -> Result<()> {
    match execute(&args, ctx)? {
        InitOutcome::Created(path) | InitOutcome::Updated(path) => {
            println!(
                "{} Configuration saved to {}",
                "✓".green(),
                path.display().bold()
            );
            println!(
                "\nYou can now add components with {}",
                "haber add <component>".cyan()
            );
        }
        InitOutcome::Cancelled => println!("Operation cancelled."),
    }
    Ok(())
}

pub fn execute(args: &Args, ctx: &Context<'_>) -> Result<InitOutcome> {
    let project_dir = match &args.cwd {
        Some(dir) => ctx.cwd.join(dir),
        None => ctx.cwd.clone(),
    };
    let exists = ctx.fs.exists(&ProjectConfig::path(&project_dir));

    if exists && !args.yes {
        let overwrite = ctx.prompter.confirm(
            &format!("A {} already exists. Overwrite it?", CONFIG_FILE),
            false,
        )?;
        if !overwrite {
            return Ok(InitOutcome::Cancelled);
        }
    }

    let answers = if args.yes {
        InitAnswers::default()
    } else {
        collect_answers(ctx.prompter)?
    };
    debug!(?answers, dir = %project_dir.display(), "init answers");

    if exists {
        // 読める設定ならレジストリURLを引き継ぐ
        if ProjectConfig::update(ctx.fs, answers.clone().into_patch(), &project_dir)?.is_some() {
            return Ok(InitOutcome::Updated(ProjectConfig::path(&project_dir)));
        }
        let path = answers.into_config().save(ctx.fs, &project_dir)?;
        return Ok(InitOutcome::Updated(path));
    }

    let path = answers.into_config().save(ctx.fs, &project_dir)?;
    Ok(InitOutcome::Created(path))
}

#[cfg(test)]
#[path = "init_test.rs"]
mod tests;
