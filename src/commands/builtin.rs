use super::CommandResult;
use crate::error::Result;
use crate::repl::Repl;
use crate::ui::UI;

pub fn exit_command(_repl: &mut Repl) -> Result<CommandResult> {
    UI::print_goodbye();
    Ok(CommandResult::Exit)
}

pub async fn reset_command(repl: &mut Repl) -> Result<CommandResult> {
    repl.handle_reset().await;
    Ok(CommandResult::Continue)
}

pub fn history_command(repl: &mut Repl) -> Result<CommandResult> {
    repl.show_history();
    Ok(CommandResult::Continue)
}

pub async fn health_command(repl: &mut Repl) -> Result<CommandResult> {
    if let Err(e) = repl.show_health().await {
        UI::print_error_with_hint(&e);
    }
    Ok(CommandResult::Continue)
}

pub async fn status_command(repl: &mut Repl) -> Result<CommandResult> {
    if let Err(e) = repl.show_agent_status().await {
        UI::print_error_with_hint(&e);
    }
    Ok(CommandResult::Continue)
}

pub fn help_command(_repl: &mut Repl) -> Result<CommandResult> {
    UI::print_help();
    Ok(CommandResult::Continue)
}
