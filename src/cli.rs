use clap::{Parser, Subcommand};

use crate::commands::{add, init, list};

#[derive(Debug, Parser)]
#[command(name = "haber", version)]
#[command(about = "CLI to add HaberUI components to your project", long_about = None)]
pub struct Cli {
    /// デバッグログと詳細なエラー表示
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Add a component to your project
    Add(add::Args),

    /// Initialize HaberUI configuration in your project
    Init(init::Args),

    /// List available components
    List(list::Args),
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_add_flags() {
        let cli = Cli::parse_from(["haber", "add", "thinking-state", "-y", "--overwrite", "--strict"]);
        match cli.command {
            Command::Add(args) => {
                assert_eq!(args.component.as_deref(), Some("thinking-state"));
                assert!(args.yes);
                assert!(args.overwrite);
                assert!(args.strict);
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn test_parse_add_without_component() {
        let cli = Cli::parse_from(["haber", "add"]);
        assert!(matches!(cli.command, Command::Add(ref args) if args.component.is_none()));
    }

    #[test]
    fn test_parse_init_with_cwd() {
        let cli = Cli::parse_from(["haber", "init", "--cwd", "apps/web", "--yes"]);
        match cli.command {
            Command::Init(args) => {
                assert_eq!(args.cwd, Some(std::path::PathBuf::from("apps/web")));
                assert!(args.yes);
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn test_verbose_is_global() {
        let cli = Cli::parse_from(["haber", "list", "-v"]);
        assert!(cli.verbose);
    }
}
