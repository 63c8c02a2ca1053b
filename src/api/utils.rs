use crate::error::{LogSearchError, Result};
use reqwest::StatusCode;
use std::time::Duration;

pub const HEALTH_TIMEOUT: Duration = Duration::from_secs(5);

/// Turns a non-success response into `LogSearchError::Api`, with `describe`
/// producing the user facing message for the status.
pub async fn check_response_status<F>(
    response: reqwest::Response,
    describe: F,
) -> Result<reqwest::Response>
where
    F: FnOnce(StatusCode) -> String,
{
    if !response.status().is_success() {
        let status = response.status();
        let error_text = response.text().await.unwrap_or_default();
        tracing::debug!(
            status = %status,
            error = %error_text,
            "Backend request failed"
        );
        return Err(LogSearchError::Api {
            status,
            message: describe(status),
        });
    }
    Ok(response)
}

/// Reads the whole body and parses it as JSON, reporting anything else as a
/// protocol error rather than a transport one.
pub async fn read_json_body(response: reqwest::Response) -> Result<serde_json::Value> {
    let text = response.text().await?;
    serde_json::from_str(&text).map_err(|e| {
        tracing::debug!(error = %e, body = %text, "Backend returned a non-JSON body");
        LogSearchError::Protocol(format!("response body is not valid JSON ({})", e))
    })
}
