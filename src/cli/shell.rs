//! Interactive line shell over one session.
//!
//! Each line is split into words (double or single quotes group names with
//! spaces) and parsed with the same clap grammar as the subcommands.

use std::io::{BufRead, Write};

use clap::Parser;
use tracing::{debug, instrument};

use crate::application::services::TreeSession;
use crate::cli::args::{EditState, ShellCommands, ShellLine};
use crate::cli::commands::run_tree_command;
use crate::cli::output::{write_plain, Message};
use crate::cli::{CliError, CliResult};

const EDIT_ON: &str = "Edit Mode activated. You can now add, edit, or delete nodes.";
const EDIT_OFF: &str = "Edit Mode deactivated.";

/// Split a shell line into words, honoring quotes.
pub fn split_words(line: &str) -> CliResult<Vec<String>> {
    let mut words = Vec::new();
    let mut current = String::new();
    let mut in_word = false;
    let mut quote: Option<char> = None;

    for c in line.chars() {
        match quote {
            Some(q) if c == q => quote = None,
            Some(_) => current.push(c),
            None if c == '"' || c == '\'' => {
                quote = Some(c);
                in_word = true;
            }
            None if c.is_whitespace() => {
                if in_word {
                    words.push(std::mem::take(&mut current));
                    in_word = false;
                }
            }
            None => {
                current.push(c);
                in_word = true;
            }
        }
    }
    if let Some(q) = quote {
        return Err(CliError::Usage(format!("unterminated {} quote", q)));
    }
    if in_word {
        words.push(current);
    }
    Ok(words)
}

fn prompt(session: &TreeSession) -> &'static str {
    if session.edit_mode() {
        "phylotree[edit]> "
    } else {
        "phylotree> "
    }
}

/// Read commands from `input` until EOF or `exit`, writing results to `out`.
///
/// Command errors are printed and the loop continues.
#[instrument(level = "debug", skip_all)]
pub fn run_shell<R: BufRead, W: Write>(
    session: &TreeSession,
    input: R,
    out: &mut W,
) -> CliResult<()> {
    writeln!(
        out,
        "Phylogeny Tree Viewer: type 'help' for commands, 'exit' to leave."
    )?;
    write!(out, "{}", prompt(session))?;
    out.flush()?;

    for line in input.lines() {
        let line = line?;
        let trimmed = line.trim();
        if trimmed.is_empty() || trimmed.starts_with('#') {
            write!(out, "{}", prompt(session))?;
            out.flush()?;
            continue;
        }
        debug!(line = trimmed, "shell input");

        let words = match split_words(trimmed) {
            Ok(words) => words,
            Err(e) => {
                writeln!(out, "error: {}", e)?;
                write!(out, "{}", prompt(session))?;
                out.flush()?;
                continue;
            }
        };

        match ShellLine::try_parse_from(&words) {
            Ok(parsed) => match parsed.command {
                ShellCommands::Exit => break,
                ShellCommands::Edit { state } => {
                    let enabled = match state {
                        Some(EditState::On) => {
                            session.set_edit_mode(true);
                            true
                        }
                        Some(EditState::Off) => {
                            session.set_edit_mode(false);
                            false
                        }
                        None => session.toggle_edit_mode(),
                    };
                    writeln!(out, "{}", if enabled { EDIT_ON } else { EDIT_OFF })?;
                }
                ShellCommands::Tree(command) => {
                    match run_tree_command(session, &command, false) {
                        Ok(messages) => write_plain(out, &messages)?,
                        Err(e) => write_plain(out, &[Message::Info(format!("error: {}", e))])?,
                    }
                }
            },
            // help and usage errors render their own text
            Err(e) => write!(out, "{}", e)?,
        }
        write!(out, "{}", prompt(session))?;
        out.flush()?;
    }
    writeln!(out)?;
    Ok(())
}
