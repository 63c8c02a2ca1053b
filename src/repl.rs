use crate::api::{AgentBackend, BackendClient};
use crate::commands::{Command, CommandResult};
use crate::error::Result;
use crate::session::{ConversationSession, ResetOutcome, SubmitOutcome};
use crate::ui::{self, Spinner, UI};
use std::io::IsTerminal;
use tokio::io::{AsyncBufReadExt, BufReader};

/// Line based terminal front end for a conversation session
pub struct Repl {
    session: ConversationSession<BackendClient>,
    ui: UI,
    /// How many log entries are already on screen
    rendered: usize,
    interactive: bool,
}

impl Repl {
    pub fn new(client: BackendClient) -> Self {
        Self {
            session: ConversationSession::new(client),
            ui: UI::new(),
            rendered: 0,
            interactive: std::io::stdin().is_terminal() && std::io::stdout().is_terminal(),
        }
    }

    pub async fn run(&mut self) -> Result<()> {
        UI::print_welcome();

        let mut lines = BufReader::new(tokio::io::stdin()).lines();

        loop {
            UI::print_prompt();

            let Some(line) = lines.next_line().await? else {
                println!();
                UI::print_goodbye();
                break;
            };

            if line.trim().is_empty() {
                continue;
            }

            if let Some(command) = Command::parse(&line) {
                match command.execute(self).await {
                    Ok(CommandResult::Exit) => break,
                    Ok(CommandResult::Continue) => {}
                    Err(e) => UI::print_error_with_hint(&e),
                }
                self.discard_typeahead();
                continue;
            }

            if self.interactive {
                UI::erase_typed_line();
            }
            self.process_prompt(&line).await;
            self.discard_typeahead();
        }

        Ok(())
    }

    /// Runs one prompt outside the interactive loop
    pub async fn process_single_prompt(&mut self, prompt: &str) -> SubmitOutcome {
        self.process_prompt(prompt).await
    }

    async fn process_prompt(&mut self, prompt: &str) -> SubmitOutcome {
        let Some(pending) = self.session.begin_submit(prompt) else {
            return SubmitOutcome::Skipped;
        };
        self.render_new_messages();

        let spinner = Spinner::start("Searching logs...");
        let result = self.session.backend().query(pending.prompt()).await;
        spinner.stop();

        let outcome = self.session.complete_submit(pending, result);
        self.render_new_messages();
        self.render_error_banner();
        outcome
    }

    pub async fn handle_reset(&mut self) -> ResetOutcome {
        let Some(pending) = self.session.begin_reset() else {
            return ResetOutcome::Skipped;
        };

        let spinner = Spinner::start("Resetting conversation...");
        let result = self.session.backend().reset().await;
        spinner.stop();

        let outcome = self.session.complete_reset(pending, result);
        match outcome {
            ResetOutcome::Cleared => {
                self.rendered = 0;
                UI::print_success("Conversation history reset.");
                println!();
            }
            ResetOutcome::Failed => self.render_error_banner(),
            ResetOutcome::Skipped => {}
        }
        outcome
    }

    pub fn show_history(&mut self) {
        self.ui.display_history(&self.session.view());
        self.rendered = self.session.messages().len();
    }

    pub async fn show_health(&self) -> Result<()> {
        let health = self.session.backend().health().await?;
        UI::display_health(&health);
        Ok(())
    }

    pub async fn show_agent_status(&self) -> Result<()> {
        let status = self.session.backend().agent_status().await?;
        UI::display_agent_status(&status);
        Ok(())
    }

    /// Lines typed while a request was pending are dropped, not queued
    fn discard_typeahead(&self) {
        if self.interactive {
            let dropped = ui::discard_typeahead();
            if dropped > 0 {
                tracing::debug!(dropped, "Discarded input typed while waiting");
            }
        }
    }

    fn render_new_messages(&mut self) {
        let messages = self.session.messages();
        if self.rendered > messages.len() {
            self.rendered = 0;
        }
        for message in &messages[self.rendered..] {
            self.ui.display_message(message);
        }
        self.rendered = messages.len();
    }

    fn render_error_banner(&self) {
        if let Some(error) = self.session.last_error() {
            UI::print_error_banner(error);
            println!();
        }
    }
}
