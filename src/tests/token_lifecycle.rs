#[cfg(test)]
mod test {
    use std::time::Duration;

    use chrono::Utc;
    use httpmock::Method::POST;
    use httpmock::MockServer;
    use serde_json::json;

    use crate::client::error::TokenError;
    use crate::tests::common::*;
    use crate::token::{Grant, Token};

    #[test]
    fn fresh_token_is_valid_and_formats_header() {
        let token = Token::new("T".into(), 3600, "Bearer".into(), Some("R".into()));

        assert!(token.is_valid());
        assert_eq!(token.authorization_header(), "Bearer T");
        assert_eq!(token.refresh_token(), Some("R"));
        let remaining = token.expires_at() - Utc::now();
        assert!(remaining.num_seconds() > 3590 && remaining.num_seconds() <= 3600);
    }

    #[test]
    fn validity_is_strictly_before_expiry() {
        let token = Token::new("T".into(), 60, "Bearer".into(), None);
        let expiry = token.expires_at();

        assert!(token.is_valid_at(expiry - chrono::Duration::milliseconds(1)));
        assert!(!token.is_valid_at(expiry));
        assert!(!token.is_valid_at(expiry + chrono::Duration::seconds(1)));
    }

    #[test]
    fn zero_lifetime_token_is_never_valid() {
        let token = Token::new("T".into(), 0, "Bearer".into(), None);
        assert!(!token.is_valid());
    }

    #[tokio::test]
    async fn token_expires_after_its_lifetime() {
        let token = Token::new("short-val".into(), 1, "Bearer".into(), None);
        assert!(token.is_valid());

        tokio::time::sleep(Duration::from_millis(1100)).await;
        assert!(!token.is_valid());
    }

    #[test]
    fn oversized_lifetime_saturates_expiry() {
        let token = Token::new("T".into(), i64::MAX, "Bearer".into(), None);

        assert!(token.is_valid());
        assert_eq!(token.expires_at(), chrono::DateTime::<Utc>::MAX_UTC);
        assert_eq!(token.expires_in(), i64::MAX);
    }

    #[test]
    fn grant_precedence() {
        let with_refresh = Token::new("T".into(), 60, "Bearer".into(), Some("R".into()));
        let without_refresh = Token::new("T".into(), 60, "Bearer".into(), Some(String::new()));

        assert_eq!(Grant::select(false, None, None), Grant::ClientCredentials);
        assert_eq!(Grant::select(false, None, Some("jwt")), Grant::JwtBearer { assertion: "jwt" });
        assert_eq!(Grant::select(false, Some(&with_refresh), None), Grant::ClientCredentials);
        assert_eq!(Grant::select(true, Some(&with_refresh), Some("jwt")), Grant::Refresh { refresh_token: "R" });
        assert_eq!(Grant::select(true, Some(&without_refresh), None), Grant::ClientCredentials);
        assert_eq!(Grant::select(true, None, Some("jwt")), Grant::JwtBearer { assertion: "jwt" });
        assert_eq!(Grant::select(false, None, Some("")), Grant::ClientCredentials);
    }

    #[tokio::test]
    async fn generate_token_uses_client_credentials() {
        let server = MockServer::start_async().await;
        let token_mock = server
            .mock_async(|when, then| {
                when.method(POST)
                    .path("/token")
                    .header("Authorization", MOCK_BASIC_AUTH)
                    .header("Content-Type", "application/x-www-form-urlencoded")
                    .body("grant_type=client_credentials&scope=am_application_scope%2Cdefault");
                then.status(200).json_body(mock_token_response());
            })
            .await;

        let mut client = mock_client(&server);
        client.generate_token().await.unwrap();

        token_mock.assert_async().await;
        let token = client.token().unwrap();
        assert_eq!(token.value(), "mockAccessToken");
        assert_eq!(token.token_type(), "Bearer");
        assert_eq!(token.authorization_header(), "Bearer mockAccessToken");
        assert_eq!(token.refresh_token(), Some("mockRefreshToken"));
        assert!(token.is_valid());
    }

    #[tokio::test]
    async fn generate_token_prefers_jwt_assertion() {
        let server = MockServer::start_async().await;
        let token_mock = server
            .mock_async(|when, then| {
                when.method(POST)
                    .path("/token")
                    .body("grant_type=urn%3Aietf%3Aparams%3Aoauth%3Agrant-type%3Ajwt-bearer&assertion=user-jwt");
                then.status(200).json_body(mock_token_response());
            })
            .await;

        let cfg = mock_config(&server.base_url()).with_user_web_token("user-jwt");
        let mut client = crate::RapidClient::new(&cfg).unwrap();
        client.generate_token().await.unwrap();

        token_mock.assert_async().await;
        assert_eq!(client.token().unwrap().value(), "mockAccessToken");
    }

    #[tokio::test]
    async fn refresh_token_uses_held_refresh_value() {
        let server = MockServer::start_async().await;
        let token_mock = server
            .mock_async(|when, then| {
                when.method(POST)
                    .path("/token")
                    .header("Authorization", MOCK_BASIC_AUTH)
                    .body("grant_type=refresh_token&refresh_token=heldRefresh");
                then.status(200).json_body(mock_token_response());
            })
            .await;

        let mut client = mock_client(&server);
        client.set_token(Token::new("old".into(), 0, "Bearer".into(), Some("heldRefresh".into())));
        client.refresh_token().await.unwrap();

        token_mock.assert_async().await;
        let token = client.token().unwrap();
        assert_eq!(token.value(), "mockAccessToken");
        assert_eq!(token.authorization_header(), "Bearer mockAccessToken");
        assert_eq!(token.refresh_token(), Some("mockRefreshToken"));
    }

    #[tokio::test]
    async fn refresh_without_token_falls_back_to_generation() {
        let server = MockServer::start_async().await;
        let token_mock = server
            .mock_async(|when, then| {
                when.method(POST)
                    .path("/token")
                    .body_includes("grant_type=client_credentials");
                then.status(200).json_body(mock_token_response());
            })
            .await;

        let mut client = mock_client(&server);
        client.refresh_token().await.unwrap();

        token_mock.assert_async().await;
        assert_eq!(client.token().unwrap().value(), "mockAccessToken");
    }

    #[tokio::test]
    async fn huge_expires_in_from_server_is_held() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(POST).path("/token");
                then.status(200).json_body(json!({
                    "access_token": "T",
                    "expires_in": 9007199254740991i64,
                    "token_type": "Bearer"
                }));
            })
            .await;

        let mut client = mock_client(&server);
        client.generate_token().await.unwrap();

        let token = client.token().unwrap();
        assert_eq!(token.value(), "T");
        assert!(token.is_valid());
        assert!(token.refresh_token().is_none());
    }

    #[tokio::test]
    async fn rejected_grant_keeps_previous_token() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(POST).path("/token");
                then.status(401).json_body(json!({"error": "invalid_client"}));
            })
            .await;

        let mut client = mock_client(&server);
        client.set_token(Token::new("held".into(), 3600, "Bearer".into(), Some("R".into())));

        let err = client.refresh_token().await.unwrap_err();
        assert!(matches!(err, TokenError::UnexpectedStatus(status) if status.as_u16() == 401));
        assert_eq!(client.token().unwrap().value(), "held");

        let err = client.generate_token().await.unwrap_err();
        assert!(matches!(err, TokenError::UnexpectedStatus(_)));
        assert_eq!(client.token().unwrap().value(), "held");
    }

    #[tokio::test]
    async fn non_200_success_status_is_rejected() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(POST).path("/token");
                then.status(201).json_body(mock_token_response());
            })
            .await;

        let mut client = mock_client(&server);
        let err = client.generate_token().await.unwrap_err();

        assert!(matches!(err, TokenError::UnexpectedStatus(status) if status.as_u16() == 201));
        assert!(client.token().is_none());
    }

    #[tokio::test]
    async fn malformed_token_body_is_decode_error() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(POST).path("/token");
                then.status(200).body("not json");
            })
            .await;

        let mut client = mock_client(&server);
        let err = client.generate_token().await.unwrap_err();

        assert!(matches!(err, TokenError::Decode(_)));
        assert!(client.token().is_none());
    }

    #[tokio::test]
    async fn unreachable_token_endpoint_is_request_error() {
        // nothing listens on the discard port
        let mut client = crate::RapidClient::new(&mock_config("http://127.0.0.1:9")).unwrap();
        let err = client.generate_token().await.unwrap_err();

        assert!(matches!(err, TokenError::Request(_)));
        assert!(err.to_string().starts_with("failed to generate token"));
    }
}
