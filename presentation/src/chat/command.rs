//! Slash command parsing

use std::path::PathBuf;

/// A `/command` typed at the chat prompt
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReplCommand {
    Help,
    Quit,
    History,
    Suggest,
    /// Send the n-th (1-based) suggested question
    Ask(usize),
    Export(PathBuf),
    Status,
    /// Recognised command with bad arguments; carries a usage hint
    Usage(&'static str),
    Unknown(String),
}

impl ReplCommand {
    /// Parse a line starting with `/`. Returns `None` for ordinary messages.
    pub fn parse(line: &str) -> Option<Self> {
        let line = line.trim();
        let rest = line.strip_prefix('/')?;
        let (name, arg) = match rest.split_once(char::is_whitespace) {
            Some((name, arg)) => (name, arg.trim()),
            None => (rest, ""),
        };

        let command = match name {
            "help" | "h" | "?" => ReplCommand::Help,
            "quit" | "exit" | "q" => ReplCommand::Quit,
            "history" => ReplCommand::History,
            "suggest" => ReplCommand::Suggest,
            "status" => ReplCommand::Status,
            "ask" => match arg.parse::<usize>() {
                Ok(n) => ReplCommand::Ask(n),
                Err(_) => ReplCommand::Usage("/ask <number>"),
            },
            "export" if arg.is_empty() => ReplCommand::Usage("/export <path>"),
            "export" => ReplCommand::Export(PathBuf::from(arg)),
            _ => ReplCommand::Unknown(line.to_string()),
        };
        Some(command)
    }
}
