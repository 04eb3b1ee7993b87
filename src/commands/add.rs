//! haber add コマンド
//!
//! 記述子を取得し、依存を入れてからコンポーネントのファイルを書き込む。

use crate::commands::Context;
use crate::config::ProjectConfig;
use crate::dependency::{InstallContext, InstallOptions, InstallPolicy, InstallReport, Installer};
use crate::error::{HaberError, Result};
use crate::output::{CommandSummary, Spinner, Stage};
use crate::registry::{normalize_name, Component, CssVars, RegistryClient};
use crate::writer::{needs_overwrite_prompt, plan_writes, write_plan};
use clap::Parser;
use owo_colors::OwoColorize;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use tracing::debug;

#[derive(Debug, Parser)]
pub struct Args {
    /// Component to add (prompted when omitted)
    pub component: Option<String>,

    /// Skip confirmation prompts
    #[arg(short, long)]
    pub yes: bool,

    /// Overwrite existing files
    #[arg(short, long)]
    pub overwrite: bool,

    /// Fail when any dependency cannot be installed
    #[arg(long)]
    pub strict: bool,
}

impl Args {
    fn install_options(&self) -> InstallOptions {
        InstallOptions {
            yes: self.yes,
            overwrite: self.overwrite,
            policy: if self.strict {
                InstallPolicy::Strict
            } else {
                InstallPolicy::Lenient
            },
        }
    }
}

/// 追加が完了したコンポーネント
#[derive(Debug)]
pub struct AddedComponent {
    pub component: Component,
    pub written: Vec<PathBuf>,
    pub import_path: String,
    pub report: InstallReport,
}

#[derive(Debug)]
pub enum AddOutcome {
    Added(AddedComponent),
    /// 上書き確認で No
    Cancelled,
}

pub async fn run(args: Args, ctx: &Context<'_>) -> Result<()> {
    let spinner = Spinner::for_terminal();

    match execute(&args, ctx, &spinner).await {
        Ok(AddOutcome::Added(added)) => {
            spinner.succeed(&completion_message(&added.component.name, &added.report));
            print_added(&added, &ctx.cwd);
            Ok(())
        }
        Ok(AddOutcome::Cancelled) => {
            spinner.clear();
            println!("Operation cancelled.");
            Ok(())
        }
        Err(e) => {
            spinner.fail("Failed to add component");
            Err(e)
        }
    }
}

/// add パイプライン本体
pub async fn execute(args: &Args, ctx: &Context<'_>, spinner: &Spinner) -> Result<AddOutcome> {
    let config = ProjectConfig::resolve(ctx.fs, &ctx.cwd)
        .ok_or_else(|| HaberError::NotInitialized(ctx.cwd.clone()))?;

    let requested = match &args.component {
        Some(name) => name.clone(),
        None => spinner
            .suspend(|| ctx.prompter.input("Which component would you like to add?", None))?,
    };
    let name = normalize_name(&requested)?;

    spinner.stage(Stage::Fetching(name.clone()));
    let registry = RegistryClient::new(ctx.fs, ctx.http, &ctx.cwd, &config.registry);
    let component = registry
        .fetch_component(&name)
        .await?
        .ok_or_else(|| HaberError::ComponentNotFound(name.clone()))?;

    let plan = plan_writes(&component, &config.component_dir(&ctx.cwd))?;
    if needs_overwrite_prompt(plan.has_conflicts(ctx.fs), args.yes, args.overwrite) {
        let confirmed = spinner.suspend(|| {
            ctx.prompter.confirm(
                &format!("Component {} already exists. Overwrite?", name),
                false,
            )
        })?;
        if !confirmed {
            debug!(component = %name, "overwrite declined");
            return Ok(AddOutcome::Cancelled);
        }
    }

    let install_ctx = InstallContext {
        fs: ctx.fs,
        registry: &registry,
        runner: ctx.runner,
        prompter: ctx.prompter,
        config: &config,
        project_dir: &ctx.cwd,
        spinner,
    };
    let report = Installer::new(install_ctx, args.install_options())
        .install_dependencies(&component)
        .await?;

    spinner.stage(Stage::Writing(name.clone()));
    let written = write_plan(ctx.fs, &plan)?.paths();

    Ok(AddOutcome::Added(AddedComponent {
        import_path: config.import_for(&name),
        component,
        written,
        report,
    }))
}

fn print_added(added: &AddedComponent, cwd: &Path) {
    for path in &added.written {
        let display = path.strip_prefix(cwd).unwrap_or(path);
        println!("  {} {}", "→".dimmed(), display.display());
    }

    let report = &added.report;
    if !report.installed.is_empty() || !report.skipped.is_empty() || !report.failures.is_empty() {
        println!(
            "\n{}",
            CommandSummary::format(
                report.installed.len(),
                report.skipped.len(),
                report.failures.len()
            )
        );
        for failure in &report.failures {
            println!(
                "  {} {}: run `{}`",
                "•".red(),
                failure.dependency,
                failure.recovery.cyan()
            );
        }
    }

    println!("\nImport it with:");
    println!(
        "  {}",
        import_statement(&added.component.name, &added.import_path).cyan()
    );

    if let Some(css_vars) = added.component.css_vars.as_ref().filter(|v| !v.is_empty()) {
        println!("\nAdd these CSS variables to your stylesheet:");
        println!("{}", css_vars_block(css_vars));
    }
}

/// 完了行（失敗した依存があれば件数を添える）
pub fn completion_message(name: &str, report: &InstallReport) -> String {
    if report.is_clean() {
        format!("Added {}", name.bold())
    } else {
        format!(
            "Added {} ({} {} failed)",
            name.bold(),
            report.failures.len(),
            if report.failures.len() == 1 { "dependency" } else { "dependencies" }
        )
    }
}

/// `import { ThinkingState } from "@/components/haber-ui/thinking-state"`
pub fn import_statement(name: &str, import_path: &str) -> String {
    format!("import {{ {} }} from \"{}\"", pascal_case(name), import_path)
}

pub fn pascal_case(name: &str) -> String {
    name.split(['-', '_', '.'])
        .filter(|part| !part.is_empty())
        .map(|part| {
            let mut chars = part.chars();
            match chars.next() {
                Some(first) => first.to_ascii_uppercase().to_string() + chars.as_str(),
                None => String::new(),
            }
        })
        .collect()
}

/// `:root { ... }` と `.dark { ... }` のブロック
pub fn css_vars_block(css_vars: &CssVars) -> String {
    let mut blocks = Vec::new();
    for (selector, vars) in [(":root", &css_vars.light), (".dark", &css_vars.dark)] {
        if !vars.is_empty() {
            blocks.push(css_block(selector, vars));
        }
    }
    blocks.join("\n\n")
}

fn css_block(selector: &str, vars: &BTreeMap<String, String>) -> String {
    let body: Vec<String> = vars
        .iter()
        .map(|(key, value)| {
            let key = if key.starts_with("--") {
                key.clone()
            } else {
                format!("--{}", key)
            };
            format!("  {}: {};", key, value)
        })
        .collect();
    format!("{} {{\n{}\n}}", selector, body.join("\n"))
}

#[cfg(test)]
#[path = "add_test.rs"]
mod tests;
