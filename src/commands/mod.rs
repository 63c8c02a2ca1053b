use crate::error::Result;
use crate::repl::Repl;

pub mod builtin;

/// Result of command execution
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CommandResult {
    /// Continue REPL loop
    Continue,
    /// Exit REPL loop
    Exit,
}

/// Enum representing all available REPL commands
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    Exit,
    Reset,
    History,
    Health,
    Status,
    Help,
}

impl Command {
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "/exit" | "/quit" | "/q" => Some(Command::Exit),
            "/reset" | "/clear" => Some(Command::Reset),
            "/history" => Some(Command::History),
            "/health" => Some(Command::Health),
            "/status" => Some(Command::Status),
            "/help" | "/?" => Some(Command::Help),
            _ => None,
        }
    }

    pub async fn execute(&self, repl: &mut Repl) -> Result<CommandResult> {
        match self {
            Command::Exit => builtin::exit_command(repl),
            Command::Reset => builtin::reset_command(repl).await,
            Command::History => builtin::history_command(repl),
            Command::Health => builtin::health_command(repl).await,
            Command::Status => builtin::status_command(repl).await,
            Command::Help => builtin::help_command(repl),
        }
    }
}

/// All available commands as strings
pub static COMMANDS: &[&str] = &[
    "/exit", "/quit", "/q", "/reset", "/clear", "/history", "/health", "/status", "/help", "/?",
];
