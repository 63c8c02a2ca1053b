use crate::api::{AgentStatus, HealthStatus};
use crate::conversation::{Message, Role};
use crate::error::LogSearchError;
use crate::session::SessionView;
use crate::syntax::SyntaxHighlighter;
use colored::Colorize;
use crossterm::cursor::{Hide, MoveToPreviousLine, Show};
use crossterm::{event, execute};
use crossterm::terminal::{Clear, ClearType};
use std::io::{self, stdout, IsTerminal, Write};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::Duration;

/// Message severity levels for consistent UI feedback
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum MessageSeverity {
    /// Recoverable issues, non-critical problems
    Warning,
    /// Actual failures (network, parsing errors)
    Error,
    Info,
    Success,
}

impl MessageSeverity {
    pub fn prefix(&self) -> colored::ColoredString {
        match self {
            Self::Warning => "Warning:".bright_yellow().bold(),
            Self::Error => "Error:".bright_red().bold(),
            Self::Info => "Info:".bright_cyan().bold(),
            Self::Success => "Success:".bright_green().bold(),
        }
    }
}

/// Animated "waiting for the agent" line, drawn on a background thread.
/// Stops and erases itself when dropped. Does nothing when stdout is not a
/// terminal.
pub struct Spinner {
    running: Arc<AtomicBool>,
    handle: Option<JoinHandle<()>>,
}

impl Spinner {
    pub fn start(action_message: impl Into<String>) -> Self {
        let action_message = action_message.into();
        let running = Arc::new(AtomicBool::new(true));
        if !stdout().is_terminal() {
            return Self {
                running,
                handle: None,
            };
        }
        let running_anim = Arc::clone(&running);

        let handle = thread::spawn(move || {
            let frames = ["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"];
            let mut frame_idx = 0;
            let mut out = stdout();
            let _ = execute!(out, Hide);

            while running_anim.load(Ordering::SeqCst) {
                print!(
                    "\r{} {}",
                    frames[frame_idx].truecolor(0x3B, 0x82, 0xF6),
                    action_message.truecolor(0x3B, 0x82, 0xF6),
                );
                let _ = out.flush();
                frame_idx = (frame_idx + 1) % frames.len();
                thread::sleep(Duration::from_millis(80));
            }

            let _ = execute!(out, Clear(ClearType::CurrentLine), Show);
            print!("\r");
            let _ = out.flush();
        });

        Self {
            running,
            handle: Some(handle),
        }
    }

    pub fn stop(mut self) {
        self.halt();
    }

    fn halt(&mut self) {
        self.running.store(false, Ordering::SeqCst);
        if let Some(handle) = self.handle.take() {
            let _ = handle.join();
        }
    }
}

impl Drop for Spinner {
    fn drop(&mut self) {
        self.halt();
    }
}

/// Keeps the terminal in raw mode for as long as it lives
struct RawModeGuard;

impl RawModeGuard {
    fn new() -> Option<Self> {
        crossterm::terminal::enable_raw_mode().ok().map(|()| Self)
    }
}

impl Drop for RawModeGuard {
    fn drop(&mut self) {
        let _ = crossterm::terminal::disable_raw_mode();
    }
}

/// Throws away input typed while a request was in flight so it is not
/// submitted as the next prompt. Returns how many events were dropped.
pub fn discard_typeahead() -> usize {
    let Some(_guard) = RawModeGuard::new() else {
        return 0;
    };
    drain_events(
        || event::poll(Duration::ZERO).unwrap_or(false),
        || event::read().is_ok(),
    )
}

fn drain_events(mut ready: impl FnMut() -> bool, mut consume: impl FnMut() -> bool) -> usize {
    let mut dropped = 0;
    while ready() && consume() {
        dropped += 1;
    }
    dropped
}

/// Terminal rendering of the conversation
pub struct UI {
    highlighter: SyntaxHighlighter,
}

impl UI {
    pub fn new() -> Self {
        Self {
            highlighter: SyntaxHighlighter::new(),
        }
    }

    pub fn print_message(severity: MessageSeverity, message: &str) {
        eprintln!("{} {}", severity.prefix(), message);
    }

    pub fn print_warning(message: &str) {
        Self::print_message(MessageSeverity::Warning, message);
    }

    pub fn print_info(message: &str) {
        Self::print_message(MessageSeverity::Info, message);
    }

    pub fn print_success(message: &str) {
        Self::print_message(MessageSeverity::Success, message);
    }

    pub fn print_error_with_hint(error: &LogSearchError) {
        eprintln!("{} {}", MessageSeverity::Error.prefix(), error);
        if let Some(hint) = error.hint() {
            eprintln!("  {} {}", "Hint:".bright_cyan(), hint);
        }
    }

    /// Persistent banner for the session's last error
    pub fn print_error_banner(text: &str) {
        eprintln!("{} {}", "✗".bright_red().bold(), text.red());
    }

    pub fn print_welcome() {
        println!("{}", "Log Search Assistant".bright_blue().bold());
        println!("{}", "Ask questions about your logs and metrics.".dimmed());
        println!();
        println!(
            "{}",
            "For example: \"Show me errors from today\" or \"What's the status of the payment service?\""
                .dimmed()
        );
        println!(
            "{}",
            "You can ask follow-up questions - the assistant remembers our conversation.".dimmed()
        );
        println!(
            "{}",
            "Type /help for commands, /reset to start over, /exit to quit.".dimmed()
        );
        println!();
    }

    pub fn print_help() {
        let commands = [
            ("/reset", "Reset the conversation on the backend and locally"),
            ("/history", "Show the whole conversation again"),
            ("/health", "Check whether the backend is healthy"),
            ("/status", "Show the agent's status"),
            ("/help", "Show this help"),
            ("/exit, /quit, /q", "Leave"),
        ];
        println!();
        for (name, description) in commands {
            println!("  {:<18} {}", name.bright_cyan(), description.dimmed());
        }
        println!();
    }

    pub fn print_goodbye() {
        println!("{}", "Goodbye!".bright_blue());
    }

    pub fn print_prompt() {
        print!("{} ", "›".bright_blue().bold());
        let _ = io::stdout().flush();
    }

    /// Removes the line the user just typed so it can be redrawn as a message
    pub fn erase_typed_line() {
        let mut out = stdout();
        let _ = execute!(out, MoveToPreviousLine(1), Clear(ClearType::CurrentLine));
    }

    pub fn display_message(&self, message: &Message) {
        let time = message.time_label().dimmed();
        match message.role() {
            Role::User => {
                println!("{} {}  {}", "You".bright_blue().bold(), time, message.content());
            }
            Role::Agent => {
                println!("{} {}", "Assistant".bright_green().bold(), time);
                println!("{}", self.highlighter.highlight_text(message.content()));
            }
            Role::Error => {
                println!("{} {}", "Error".bright_red().bold(), time);
                println!("{}", message.content().red());
            }
        }
        println!();
    }

    pub fn display_history(&self, view: &SessionView<'_>) {
        if view.messages.is_empty() {
            println!(
                "{}",
                "No messages yet. Start by asking a question about your logs or metrics.".dimmed()
            );
            println!();
            return;
        }

        println!("{}", "═".repeat(60).bright_blue());
        println!("{}", "Conversation".bright_blue().bold());
        println!("{}", "═".repeat(60).bright_blue());
        println!();

        for message in view.messages {
            self.display_message(message);
        }

        if let Some(error) = view.last_error {
            Self::print_error_banner(error);
        }

        println!("{}", "═".repeat(60).bright_blue());
        println!();
    }

    pub fn display_health(health: &HealthStatus) {
        let status = if health.is_healthy() {
            health.status.bright_green()
        } else {
            health.status.bright_red()
        };
        println!("{:<16} {}", "Backend:".bright_white(), status);
        if let Some(agent) = &health.agent_status {
            println!("{:<16} {}", "Agent:".bright_white(), agent);
        }
        if let Some(error) = &health.error {
            println!("{:<16} {}", "Error:".bright_white(), error.red());
        }
        println!();
    }

    pub fn display_agent_status(status: &AgentStatus) {
        println!("{:<20} {}", "Status:".bright_white(), status.status);
        println!(
            "{:<20} {}",
            "Agent initialized:".bright_white(),
            yes_no(status.agent_initialized)
        );
        println!(
            "{:<20} {}",
            "Context active:".bright_white(),
            yes_no(status.context_active)
        );
        println!();
    }
}

impl Default for UI {
    fn default() -> Self {
        Self::new()
    }
}

fn yes_no(value: bool) -> colored::ColoredString {
    if value {
        "yes".bright_green()
    } else {
        "no".bright_yellow()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    #[test]
    fn test_drain_events_consumes_everything_queued() {
        let queued = Cell::new(3);
        let dropped = drain_events(
            || queued.get() > 0,
            || {
                queued.set(queued.get() - 1);
                true
            },
        );

        assert_eq!(dropped, 3);
        assert_eq!(queued.get(), 0);
    }

    #[test]
    fn test_drain_events_stops_on_read_failure() {
        let mut reads = 0;
        let dropped = drain_events(
            || true,
            || {
                reads += 1;
                reads < 2
            },
        );

        assert_eq!(dropped, 1);
        assert_eq!(reads, 2);
    }
}
