//! haber list コマンド
//!
//! レジストリのインデックスを一覧表示する。

use crate::commands::Context;
use crate::config::ProjectConfig;
use crate::error::Result;
use crate::registry::{ComponentSummary, RegistryClient};
use clap::Parser;
use comfy_table::{presets::UTF8_FULL_CONDENSED, Table};
use owo_colors::OwoColorize;

#[derive(Debug, Parser)]
pub struct Args {
    /// Output in JSON format
    #[arg(long)]
    pub json: bool,
}

pub async fn run(args: Args, ctx: &Context<'_>) -> Result<()> {
    let components = fetch(ctx).await?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&components)?);
        return Ok(());
    }

    if components.is_empty() {
        println!("No components found.");
        return Ok(());
    }

    println!("{}", build_table(&components));
    println!(
        "\nRun {} to add a component to your project.",
        "haber add <component>".cyan()
    );
    Ok(())
}

/// 設定が無い場合は既定のレジストリを参照する
pub async fn fetch(ctx: &Context<'_>) -> Result<Vec<ComponentSummary>> {
    let config = ProjectConfig::resolve_or_default(ctx.fs, &ctx.cwd);
    let registry = RegistryClient::new(ctx.fs, ctx.http, &ctx.cwd, &config.registry);
    let mut components = registry.get_components().await?;
    components.sort_by(|a, b| a.name.cmp(&b.name));
    Ok(components)
}

pub fn build_table(components: &[ComponentSummary]) -> Table {
    let mut table = Table::new();
    table.load_preset(UTF8_FULL_CONDENSED);
    table.set_header(vec!["Name", "Version", "Description"]);

    for component in components {
        let version = if component.version.is_empty() {
            "-".to_string()
        } else {
            format!("v{}", component.version)
        };
        table.add_row(vec![
            component.name.clone(),
            version,
            component.description.clone().unwrap_or_default(),
        ]);
    }

    table
}
