use crate::error::{LogSearchError, Result};

/// Wraps a failure with a message saying what was being attempted
pub trait ResultExt<T> {
    fn context(self, msg: impl Into<String>) -> Result<T>;
    fn with_context<F>(self, f: F) -> Result<T>
    where
        F: FnOnce() -> String;
}

impl<T, E> ResultExt<T> for std::result::Result<T, E>
where
    E: Into<LogSearchError>,
{
    fn context(self, msg: impl Into<String>) -> Result<T> {
        self.with_context(|| msg.into())
    }

    fn with_context<F>(self, f: F) -> Result<T>
    where
        F: FnOnce() -> String,
    {
        self.map_err(|e| LogSearchError::Context {
            message: f(),
            source: Box::new(e.into()),
        })
    }
}
