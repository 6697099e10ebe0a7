use anyhow::Result;
use reqwest::{header, Client};
use std::time::Duration;

pub const DEFAULT_TIMEOUT_SECONDS: u64 = 30;

/// Creates the HTTP client shared by every API call
pub fn create_http_client(user_agent: &str) -> Result<Client> {
    create_http_client_with_timeout(user_agent, Duration::from_secs(DEFAULT_TIMEOUT_SECONDS))
}

/// Creates an HTTP client that speaks JSON and gives up after `timeout`
pub fn create_http_client_with_timeout(user_agent: &str, timeout: Duration) -> Result<Client> {
    let mut headers = header::HeaderMap::new();

    headers.insert(
        header::ACCEPT,
        header::HeaderValue::from_static("application/json")
    );
    headers.insert(
        header::ACCEPT_LANGUAGE,
        header::HeaderValue::from_static("en-IN,en;q=0.9")
    );

    let client = Client::builder()
        .user_agent(user_agent)
        .default_headers(headers)
        .timeout(timeout)
        .build()?;

    Ok(client)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_http_client_succeeds() {
        let result = create_http_client("staybook-test/0.1");
        assert!(result.is_ok(), "Client creation should succeed");
    }

    #[test]
    fn test_http_client_with_different_user_agents() {
        let user_agents = vec![
            "staybook/0.1",
            "Mozilla/5.0 (X11; Linux x86_64) AppleWebKit/537.36",
            "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7)",
        ];

        for ua in user_agents {
            let client = create_http_client(ua);
            assert!(client.is_ok(), "Failed to create client with user agent: {}", ua);
        }
    }

    #[tokio::test]
    async fn test_http_client_timeout_works() {
        let client = create_http_client_with_timeout("staybook-test/0.1", Duration::from_millis(200))
            .expect("Failed to create HTTP client");

        // Non-routable address, must fail instead of hanging
        let result = client.get("http://10.255.255.1").send().await;

        assert!(result.is_err(), "Request to non-routable IP should fail/timeout");
    }
}
