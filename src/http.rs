//! Human-readable descriptions of OpenAI API failures.
//!
//! Shared by the transcription and translation clients so both report
//! network and HTTP errors the same way.

/// Describes a request that never produced a response.
pub fn describe_send_error(service: &str, e: &reqwest::Error) -> String {
    if e.is_connect() {
        format!("Failed to connect to the {service} server. Check your internet connection.")
    } else if e.is_timeout() {
        format!("Request to {service} timed out. The API server is not responding.")
    } else if e.is_builder() {
        format!("Failed to build {service} request: {e}. This may be a configuration error.")
    } else {
        format!("{service} network error: {e}")
    }
}

/// Describes a non-success HTTP status.
pub fn describe_status(service: &str, status: u16, body: &str) -> String {
    match status {
        401 => format!("{service} API key is invalid or expired. Run 'ejsub auth' to update your API key."),
        403 => format!("You don't have permission to use {service}. Check your API key and account status."),
        429 => format!("Too many requests to {service}. You've hit the rate limit or quota. Please wait and try again."),
        500 | 502 | 503 | 504 => format!("{service} server is experiencing issues. Please try again later."),
        _ => format!("{service} error (status {status}): {body}"),
    }
}

/// Sends a prepared request and returns the response body on success.
///
/// # Errors
/// - If the request cannot be sent
/// - If the server answers with a non-success status
/// - If a success response body cannot be read
pub async fn send(service: &str, request: reqwest::RequestBuilder) -> anyhow::Result<String> {
    let response = request
        .send()
        .await
        .map_err(|e| anyhow::anyhow!(describe_send_error(service, &e)))?;

    let status = response.status();
    let body = response.text().await;

    if !status.is_success() {
        let body = body.unwrap_or_else(|_| "Unknown error".to_string());
        return Err(anyhow::anyhow!(describe_status(service, status.as_u16(), &body)));
    }

    body.map_err(|e| anyhow::anyhow!("Failed to read {service} response: {e}"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;

    #[test]
    fn test_auth_failure_points_to_auth_command() {
        let message = describe_status("OpenAI", 401, "");
        assert!(message.contains("ejsub auth"));
    }

    #[test]
    fn test_quota_failure_is_readable() {
        let message = describe_status("OpenAI", 429, "{}");
        assert!(message.contains("rate limit"));
    }

    #[test]
    fn test_unknown_status_includes_body() {
        let message = describe_status("OpenAI", 400, "unknown parameter");
        assert_eq!(message, "OpenAI error (status 400): unknown parameter");
    }

    /// Serves one response whose body is shorter than its Content-Length.
    async fn truncated_response(status: &'static str) -> String {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let url = format!("http://{}/models", listener.local_addr().unwrap());

        tokio::spawn(async move {
            let (mut stream, _) = listener.accept().await.unwrap();
            let mut buf = [0u8; 4096];
            let _ = stream.read(&mut buf).await.unwrap();
            let response = format!(
                "HTTP/1.1 {status}\r\nContent-Length: 100\r\nConnection: close\r\n\r\n{{\"da"
            );
            stream.write_all(response.as_bytes()).await.unwrap();
            stream.shutdown().await.unwrap();
        });

        url
    }

    fn client() -> reqwest::Client {
        reqwest::Client::builder().no_proxy().build().unwrap()
    }

    #[tokio::test]
    async fn test_unreadable_success_body_is_an_error() {
        let url = truncated_response("200 OK").await;

        let err = send("OpenAI", client().get(&url)).await.unwrap_err();
        assert!(err.to_string().starts_with("Failed to read OpenAI response"));
    }

    #[tokio::test]
    async fn test_unreadable_error_body_still_describes_status() {
        let url = truncated_response("503 Service Unavailable").await;

        let err = send("OpenAI", client().get(&url)).await.unwrap_err();
        assert_eq!(
            err.to_string(),
            "OpenAI server is experiencing issues. Please try again later."
        );
    }
}
