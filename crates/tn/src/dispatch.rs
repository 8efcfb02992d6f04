//! Command dispatch module for routing CLI commands to their handlers.
//!
//! Commands split by whether they talk to the TaskNotes API. Local commands
//! (config, completions, filter help and checking) run without building an
//! HTTP client, so they work when the server is down or misconfigured.

use tasknotes_api_rs::client::TaskNotesClient;

use crate::cli::{Cli, Commands, ConfigCommands, Shell};
use crate::commands::config::Config;
use crate::commands::{self, CommandContext, CommandError, Result};

/// Trait for commands that run without the API.
pub trait LocalCommand {
    fn execute(&self, ctx: &CommandContext) -> Result<()>;
}

/// Trait for commands that call the TaskNotes API.
#[allow(async_fn_in_trait)]
pub trait ApiCommand {
    async fn execute(&self, ctx: &CommandContext, client: &TaskNotesClient) -> Result<()>;
}

/// Commands that don't need the API.
pub enum LocalDispatch<'a> {
    Config(&'a Option<ConfigCommands>),
    Completions(&'a Shell),
    FilterHelp,
    FilterCheck(&'a str),
    Help,
}

impl<'a> LocalDispatch<'a> {
    /// Returns None if the command needs the API.
    pub fn try_from_cli(cli: &'a Cli) -> Option<Self> {
        match &cli.command {
            Some(Commands::Config { command }) => Some(Self::Config(command)),
            Some(Commands::Completions { shell }) => Some(Self::Completions(shell)),
            Some(Commands::FilterHelp) => Some(Self::FilterHelp),
            Some(Commands::FilterCheck { expression }) => Some(Self::FilterCheck(expression)),
            None => Some(Self::Help),
            _ => None,
        }
    }
}

impl LocalCommand for LocalDispatch<'_> {
    fn execute(&self, ctx: &CommandContext) -> Result<()> {
        match self {
            Self::Config(command) => dispatch_config(ctx, command),
            Self::Completions(shell) => {
                commands::completions::execute(shell).map_err(CommandError::Io)
            }
            Self::FilterHelp => commands::filter_help::execute(ctx),
            Self::FilterCheck(expression) => commands::filter_check::execute(ctx, expression),
            Self::Help => {
                if !ctx.quiet {
                    println!("tn - TaskNotes CLI");
                    println!("Use --help for usage information");
                }
                Ok(())
            }
        }
    }
}

fn dispatch_config(ctx: &CommandContext, command: &Option<ConfigCommands>) -> Result<()> {
    match command {
        Some(ConfigCommands::Show) | None => commands::config::execute_show(ctx),
        Some(ConfigCommands::Set { key, value }) => {
            let opts = commands::config::ConfigSetOptions {
                key: key.clone(),
                value: value.clone(),
            };
            commands::config::execute_set(ctx, &opts)
        }
        Some(ConfigCommands::Path) => commands::config::execute_path(ctx),
    }
}

/// Commands that call the API, with their options resolved.
pub enum ApiDispatch {
    List(commands::list::ListOptions),
    Add(commands::add::AddOptions),
    Done(commands::done::DoneOptions),
    Archive(commands::archive::ArchiveOptions),
    Delete(commands::delete::DeleteOptions),
    Health,
}

impl ApiDispatch {
    /// Resolves options against the config; None for local commands.
    pub fn from_cli(cli: &Cli, config: &Config) -> Result<Option<Self>> {
        let dispatch = match &cli.command {
            Some(Commands::List {
                filter,
                status,
                priority,
                tag,
                context,
                project,
                overdue,
                archived,
                limit,
                all,
                sort,
                reverse,
                local,
            }) => Self::List(commands::list::ListOptions {
                filter: filter.clone(),
                status: status.clone(),
                priority: priority.clone(),
                tags: tag.clone(),
                contexts: context.clone(),
                projects: project.clone(),
                overdue: *overdue,
                archived: *archived,
                limit: commands::list::ListOptions::resolve_limit(*all, *limit, config.list.limit),
                sort: *sort,
                reverse: *reverse,
                local: *local || config.list.local_filtering.unwrap_or(false),
            }),
            Some(Commands::Add { text, raw }) => {
                Self::Add(commands::add::AddOptions::from_words(text, *raw)?)
            }
            Some(Commands::Done { task_ids }) => Self::Done(commands::done::DoneOptions {
                task_ids: task_ids.clone(),
            }),
            Some(Commands::Archive { task_ids }) => {
                Self::Archive(commands::archive::ArchiveOptions {
                    task_ids: task_ids.clone(),
                })
            }
            Some(Commands::Delete { task_ids, force }) => {
                Self::Delete(commands::delete::DeleteOptions {
                    task_ids: task_ids.clone(),
                    force: *force,
                })
            }
            Some(Commands::Health) => Self::Health,
            _ => return Ok(None),
        };
        Ok(Some(dispatch))
    }
}

impl ApiCommand for ApiDispatch {
    async fn execute(&self, ctx: &CommandContext, client: &TaskNotesClient) -> Result<()> {
        match self {
            Self::List(opts) => commands::list::execute(ctx, opts, client).await,
            Self::Add(opts) => commands::add::execute(ctx, opts, client).await,
            Self::Done(opts) => commands::done::execute(ctx, opts, client).await,
            Self::Archive(opts) => commands::archive::execute(ctx, opts, client).await,
            Self::Delete(opts) => commands::delete::execute(ctx, opts, client).await,
            Self::Health => commands::health::execute(ctx, client).await,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    fn parse(args: &[&str]) -> Cli {
        Cli::try_parse_from(args).unwrap()
    }

    #[test]
    fn test_local_commands() {
        for args in [
            &["tn"][..],
            &["tn", "filter-help"],
            &["tn", "filter-check", "status:open"],
            &["tn", "config", "path"],
            &["tn", "completions", "bash"],
        ] {
            let cli = parse(args);
            assert!(LocalDispatch::try_from_cli(&cli).is_some(), "{args:?}");
            assert!(ApiDispatch::from_cli(&cli, &Config::default())
                .unwrap()
                .is_none());
        }
    }

    #[test]
    fn test_api_commands() {
        for args in [
            &["tn", "list"][..],
            &["tn", "add", "Buy milk"],
            &["tn", "done", "a.md"],
            &["tn", "archive", "a.md"],
            &["tn", "delete", "a.md"],
            &["tn", "health"],
        ] {
            let cli = parse(args);
            assert!(LocalDispatch::try_from_cli(&cli).is_none(), "{args:?}");
            assert!(ApiDispatch::from_cli(&cli, &Config::default())
                .unwrap()
                .is_some());
        }
    }

    #[test]
    fn test_list_options_use_config_defaults() {
        let mut config = Config::default();
        config.list.limit = Some(7);
        config.list.local_filtering = Some(true);

        let cli = parse(&["tn", "list"]);
        match ApiDispatch::from_cli(&cli, &config).unwrap() {
            Some(ApiDispatch::List(opts)) => {
                assert_eq!(opts.limit, Some(7));
                assert!(opts.local);
            }
            _ => panic!("Expected list dispatch"),
        }

        let cli = parse(&["tn", "list", "--all"]);
        match ApiDispatch::from_cli(&cli, &config).unwrap() {
            Some(ApiDispatch::List(opts)) => assert_eq!(opts.limit, None),
            _ => panic!("Expected list dispatch"),
        }
    }
}
