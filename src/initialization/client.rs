//! HTTP client initialization.

use std::time::Duration;

use reqwest::ClientBuilder;

use crate::config::Config;
use crate::error_handling::InitializationError;

/// Initializes the HTTP client used for feed downloads and archive uploads.
///
/// Requests have no timeout unless `timeout_seconds` is configured.
///
/// # Errors
///
/// Returns `InitializationError::HttpClientError` if client creation fails.
pub fn init_client(config: &Config) -> Result<reqwest::Client, InitializationError> {
    let mut builder = ClientBuilder::new().user_agent(concat!(
        env!("CARGO_PKG_NAME"),
        "/",
        env!("CARGO_PKG_VERSION")
    ));
    if let Some(secs) = config.timeout_seconds {
        builder = builder.timeout(Duration::from_secs(secs));
    }
    Ok(builder.build()?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_init_client_default_and_timeout() {
        assert!(init_client(&Config::default()).is_ok());

        let config = Config {
            timeout_seconds: Some(5),
            ..Default::default()
        };
        assert!(init_client(&config).is_ok());
    }
}
