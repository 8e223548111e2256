use crate::client::config::Config;
use crate::client::consts::{AUTHORIZATION_HEADER, CALL_PATH};
use secrecy::ExposeSecret;
use tokio_tungstenite::tungstenite::client::IntoClientRequest;
use tokio_tungstenite::tungstenite::handshake::client::Request;

pub fn build_request(config: &Config) -> tokio_tungstenite::tungstenite::Result<Request> {
    let mut request = format!("{}{}", config.base_url(), CALL_PATH).into_client_request()?;
    request.headers_mut().insert(
        AUTHORIZATION_HEADER,
        format!("Bearer {}", config.api_key().expose_secret())
            .as_str()
            .parse()?,
    );
    Ok(request)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_request_sets_url_and_bearer() {
        let config = Config::builder()
            .with_base_url("ws://localhost:8787")
            .with_api_key("abc")
            .build();
        let request = build_request(&config).unwrap();
        assert_eq!(request.uri().to_string(), "ws://localhost:8787/call/web/ws");
        assert_eq!(request.headers()[AUTHORIZATION_HEADER], "Bearer abc");
    }
}
