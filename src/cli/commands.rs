//! Command dispatch: maps parsed arguments onto session operations.

use std::io;
use std::sync::Arc;

use clap::CommandFactory;
use clap_complete::generate;
use tracing::{debug, instrument};

use crate::application::services::{
    join_names, parse_name_list, AddNodeOutcome, AddNodeRequest, SearchOutcome, TreeSession,
};
use crate::cli::args::{Cli, Commands, TreeCommands};
use crate::cli::output::{self, Message};
use crate::cli::shell;
use crate::cli::CliResult;
use crate::config::Settings;

pub fn execute_command(cli: &Cli) -> CliResult<()> {
    let settings = Arc::new(Settings::load(cli.config.as_deref())?);
    debug!(?settings, "settings loaded");

    match &cli.command {
        Some(Commands::Config { template }) => {
            if *template {
                output::info(&Settings::template());
            } else {
                output::info(&settings.to_toml()?);
            }
            Ok(())
        }
        Some(Commands::Completion { shell }) => {
            let mut cmd = Cli::command();
            let name = cmd.get_name().to_string();
            generate(*shell, &mut cmd, name, &mut io::stdout());
            Ok(())
        }
        Some(Commands::Shell) => {
            let session = open_session(cli, settings)?;
            let stdin = io::stdin();
            shell::run_shell(&session, stdin.lock(), &mut io::stdout())
        }
        Some(Commands::Tree(command)) => {
            let session = open_session(cli, settings)?;
            for message in run_tree_command(&session, command, true)? {
                output::emit(&message);
            }
            Ok(())
        }
        None => {
            let session = open_session(cli, settings)?;
            output::info(session.display_tree()?.trim_end());
            Ok(())
        }
    }
}

fn open_session(cli: &Cli, settings: Arc<Settings>) -> CliResult<TreeSession> {
    let session = TreeSession::with_seed(settings)?;
    if cli.edit {
        session.set_edit_mode(true);
    }
    Ok(session)
}

/// Run one tree command and collect its output.
///
/// With `show_tree` set, successful mutations append the resulting tree.
#[instrument(level = "debug", skip(session))]
pub fn run_tree_command(
    session: &TreeSession,
    command: &TreeCommands,
    show_tree: bool,
) -> CliResult<Vec<Message>> {
    let mut messages = match command {
        TreeCommands::Show => {
            return Ok(vec![Message::Info(
                session.display_tree()?.trim_end().to_string(),
            )])
        }
        TreeCommands::Search { query } => {
            let outcome = session.search(query)?;
            return Ok(vec![match outcome {
                SearchOutcome::Found(_) => {
                    Message::Info(outcome.to_string().trim_end().to_string())
                }
                SearchOutcome::NoResults { .. } => Message::Warning(outcome.to_string()),
            }]);
        }
        TreeCommands::Add {
            name,
            parent,
            reassign,
            new_root,
        } => _add(
            session,
            AddNodeRequest {
                parent: parent.clone(),
                name: name.clone(),
                reassign: reassign.iter().flat_map(|r| parse_name_list(r)).collect(),
                new_root: *new_root,
            },
        )?,
        TreeCommands::Rename { name, new_name } => {
            let old = session.rename(name, new_name)?;
            vec![Message::Success(format!(
                "Node '{}' renamed to '{}'.",
                old,
                new_name.trim()
            ))]
        }
        TreeCommands::Move { name, new_parent } => {
            session.move_node(name, new_parent)?;
            vec![Message::Success(format!(
                "Node '{}' moved under '{}'.",
                name.trim(),
                new_parent.trim()
            ))]
        }
        TreeCommands::Delete { name, policy } => {
            let outcome = session.delete(name, *policy)?;
            let mut lines = vec![Message::Success(format!(
                "Node '{}' deleted.",
                outcome.removed.first().map(String::as_str).unwrap_or(name.as_str())
            ))];
            if !outcome.promoted.is_empty() {
                lines.push(Message::Detail(format!(
                    "Moved up: {}",
                    join_names(&outcome.promoted)
                )));
            }
            if outcome.removed.len() > 1 {
                lines.push(Message::Detail(format!(
                    "Removed with it: {}",
                    join_names(&outcome.removed[1..])
                )));
            }
            lines
        }
    };

    if show_tree {
        messages.push(Message::Header("Tree:".to_string()));
        messages.push(Message::Info(session.display_tree()?.trim_end().to_string()));
    }
    Ok(messages)
}

fn _add(session: &TreeSession, request: AddNodeRequest) -> CliResult<Vec<Message>> {
    let outcome = session.add_node(&request)?;
    let mut messages = Vec::new();
    if let AddNodeOutcome::Added(report) = &outcome {
        for warning in &report.warnings {
            messages.push(Message::Warning(warning.to_string()));
        }
    }
    messages.extend(outcome.to_string().lines().map(|l| Message::Success(l.to_string())));
    Ok(messages)
}
