//! Terminal output formatting with colors
//!
//! Respects NO_COLOR, CLICOLOR, CLICOLOR_FORCE automatically.

use std::fmt;
use std::io::{self, Write};

use colored::Colorize;

/// One line of command output, rendered with color on the terminal
/// and as plain text inside the shell.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Message {
    Header(String),
    Info(String),
    Success(String),
    Warning(String),
    Detail(String),
}

impl fmt::Display for Message {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Message::Header(m) | Message::Info(m) | Message::Success(m) => write!(f, "{}", m),
            Message::Warning(m) => write!(f, "Warning: {}", m),
            Message::Detail(m) => write!(f, "  {}", m),
        }
    }
}

/// Print a message to stdout/stderr with its color.
pub fn emit(message: &Message) {
    match message {
        Message::Header(m) => header(m),
        Message::Info(m) => info(m),
        Message::Success(m) => success(m),
        Message::Warning(m) => warning(m),
        Message::Detail(m) => detail(m),
    }
}

/// Write messages as plain text.
pub fn write_plain<W: Write>(out: &mut W, messages: &[Message]) -> io::Result<()> {
    for message in messages {
        writeln!(out, "{}", message)?;
    }
    Ok(())
}

/// Print error (red bold "error:" prefix) to stderr
pub fn error(msg: &(impl std::fmt::Display + ?Sized)) {
    eprintln!("{}: {}", "error".red().bold(), msg);
}

/// Print warning (yellow "Warning:" prefix) to stderr
pub fn warning(msg: &(impl std::fmt::Display + ?Sized)) {
    eprintln!("{}: {}", "Warning".yellow(), msg);
}

/// Print success status (green checkmark)
pub fn success(msg: &(impl std::fmt::Display + ?Sized)) {
    println!("{} {}", "✓".green(), msg);
}

/// Print section header (cyan bold)
pub fn header(msg: &(impl std::fmt::Display + ?Sized)) {
    println!("{}", msg.to_string().cyan().bold());
}

/// Print indented detail (no color)
pub fn detail(msg: &(impl std::fmt::Display + ?Sized)) {
    println!("  {}", msg);
}

/// Print plain output (no color, for tree text)
pub fn info(msg: &(impl std::fmt::Display + ?Sized)) {
    println!("{}", msg);
}
