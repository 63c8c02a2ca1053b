mod reply;
mod state;


pub use reply::{AgentReply, ReplyKind, REPLY_PRECEDENCE};
pub use state::{
    ConversationSession, PendingPrompt, PendingReset, ResetOutcome, SessionStatus, SessionView,
    SubmitOutcome, LAST_ERROR_PREFIX, RESET_ERROR_PREFIX, TURN_ERROR_PREFIX,
};
