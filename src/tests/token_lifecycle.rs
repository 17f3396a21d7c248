// Token manager against a mocked supplier auth endpoint:
//  - cache hits never touch the network
//  - absent or expired tokens cost exactly one login exchange
//  - login response shapes, failures and candidate auth paths

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::time::{Duration, Instant};

    use httpmock::Method::POST;
    use httpmock::MockServer;
    use reqwest::StatusCode;
    use serde_json::json;

    use crate::cache::token::Token;
    use crate::error::ProxyError;
    use crate::helpers::time::{expires_in, now_i64};
    use crate::tests::common::{build_gateway, build_gateway_with_timeout, mock_login, upstream_config};
    use crate::utils::constants::{DEFAULT_AUTH_PATH, DEFAULT_TOKEN_TTL_SECONDS, ENV_LOGIN};

    #[tokio::test]
    async fn valid_cached_token_needs_no_login() {
        let server = MockServer::start_async().await;
        let login = mock_login(&server, DEFAULT_AUTH_PATH, "never-issued-token").await;

        let gateway = build_gateway(&upstream_config(&server));
        let tokens = gateway.token_manager();
        tokens
            .cache()
            .set(Token::new("cached-token-123".into(), expires_in(60)))
            .await;

        assert_eq!(tokens.acquire_token().await.unwrap(), "cached-token-123");
        assert_eq!(tokens.acquire_token().await.unwrap(), "cached-token-123");
        login.assert_hits_async(0).await;
    }

    #[tokio::test]
    async fn expired_token_costs_one_login_and_gets_55_minutes() {
        let server = MockServer::start_async().await;
        let login = mock_login(&server, DEFAULT_AUTH_PATH, "abc123xyz0").await;

        let gateway = build_gateway(&upstream_config(&server));
        let tokens = gateway.token_manager();
        tokens
            .cache()
            .set(Token::new("expired-token-1".into(), now_i64() - 5))
            .await;

        let before = now_i64();
        assert_eq!(tokens.acquire_token().await.unwrap(), "abc123xyz0");
        let after = now_i64();
        login.assert_hits_async(1).await;

        let cached = tokens.cache().get().await.expect("token cached");
        assert_eq!(cached.value, "abc123xyz0");
        let ttl = DEFAULT_TOKEN_TTL_SECONDS as i64;
        assert_eq!(ttl, 55 * 60);
        assert!(cached.expires_at_unix_ts >= before + ttl);
        assert!(cached.expires_at_unix_ts <= after + ttl);
    }

    #[tokio::test]
    async fn bare_quoted_string_response() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(POST).path(DEFAULT_AUTH_PATH);
                then.status(200).body("\"tok_9999999999\"");
            })
            .await;

        let gateway = build_gateway(&upstream_config(&server));
        assert_eq!(
            gateway.token_manager().acquire_token().await.unwrap(),
            "tok_9999999999"
        );
    }

    #[tokio::test]
    async fn too_short_token_is_a_decode_error() {
        let server = MockServer::start_async().await;
        mock_login(&server, DEFAULT_AUTH_PATH, "ab").await;

        let gateway = build_gateway(&upstream_config(&server));
        let err = gateway.token_manager().acquire_token().await.unwrap_err();

        assert!(matches!(err, ProxyError::Decode(_)), "{:?}", err);
        assert!(gateway.token_manager().cache().get().await.is_none());
    }

    #[tokio::test]
    async fn missing_credential_fails_without_network() {
        let server = MockServer::start_async().await;
        let login = mock_login(&server, DEFAULT_AUTH_PATH, "never-issued-token").await;

        let mut upstream = upstream_config(&server);
        upstream.login = None;
        let gateway = build_gateway(&upstream);

        let err = gateway.token_manager().acquire_token().await.unwrap_err();
        assert!(matches!(err, ProxyError::Config(_)), "{:?}", err);
        assert!(err.to_string().contains(ENV_LOGIN));
        login.assert_hits_async(0).await;
    }

    #[tokio::test]
    async fn rejected_login_carries_status_and_body() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(POST).path(DEFAULT_AUTH_PATH);
                then.status(403).body("invalid login or password");
            })
            .await;

        let gateway = build_gateway(&upstream_config(&server));
        match gateway.token_manager().acquire_token().await.unwrap_err() {
            ProxyError::Auth { status, body } => {
                assert_eq!(status, StatusCode::FORBIDDEN);
                assert_eq!(body, "invalid login or password");
            }
            other => panic!("unexpected error {:?}", other),
        }
    }

    #[tokio::test]
    async fn candidate_paths_stop_at_first_token() {
        let server = MockServer::start_async().await;
        let legacy = server
            .mock_async(|when, then| {
                when.method(POST).path("/api/login");
                then.status(404).body("not found");
            })
            .await;
        let current = mock_login(&server, "/auth/token", "path-two-token").await;
        let never = mock_login(&server, "/v2/auth/token", "path-three-token").await;

        let mut upstream = upstream_config(&server);
        upstream.auth_paths = vec![
            "/api/login".to_string(),
            "/auth/token".to_string(),
            "/v2/auth/token".to_string(),
        ];
        let gateway = build_gateway(&upstream);

        assert_eq!(
            gateway.token_manager().acquire_token().await.unwrap(),
            "path-two-token"
        );
        legacy.assert_hits_async(1).await;
        current.assert_hits_async(1).await;
        never.assert_hits_async(0).await;
    }

    #[tokio::test]
    async fn last_candidate_failure_is_surfaced() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(POST).path("/api/login");
                then.status(404).body("not found");
            })
            .await;
        server
            .mock_async(|when, then| {
                when.method(POST).path("/auth/token");
                then.status(503).body("maintenance");
            })
            .await;

        let mut upstream = upstream_config(&server);
        upstream.auth_paths = vec!["/api/login".to_string(), "/auth/token".to_string()];
        let gateway = build_gateway(&upstream);

        let err = gateway.token_manager().acquire_token().await.unwrap_err();
        assert_eq!(err.status(), Some(StatusCode::SERVICE_UNAVAILABLE));
        assert!(err.to_string().contains("maintenance"));
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn concurrent_misses_share_one_login() {
        let server = MockServer::start_async().await;
        let login = server
            .mock_async(|when, then| {
                when.method(POST).path(DEFAULT_AUTH_PATH);
                then.status(200)
                    .delay(Duration::from_millis(200))
                    .json_body(json!({"access_token": "shared-token-01"}));
            })
            .await;

        let gateway = Arc::new(build_gateway(&upstream_config(&server)));
        let tasks: Vec<_> = (0..8)
            .map(|_| {
                let gateway = gateway.clone();
                tokio::spawn(async move { gateway.token_manager().acquire_token().await })
            })
            .collect();

        for task in tasks {
            assert_eq!(task.await.unwrap().unwrap(), "shared-token-01");
        }
        login.assert_hits_async(1).await;
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn concurrent_misses_share_one_failed_login() {
        let server = MockServer::start_async().await;
        let login = server
            .mock_async(|when, then| {
                when.method(POST).path(DEFAULT_AUTH_PATH);
                then.status(503)
                    .delay(Duration::from_millis(300))
                    .body("maintenance");
            })
            .await;

        let gateway = Arc::new(build_gateway(&upstream_config(&server)));
        let started = Instant::now();
        let tasks: Vec<_> = (0..6)
            .map(|_| {
                let gateway = gateway.clone();
                tokio::spawn(async move { gateway.token_manager().acquire_token().await })
            })
            .collect();

        for task in tasks {
            let err = task.await.unwrap().unwrap_err();
            assert_eq!(err.status(), Some(StatusCode::SERVICE_UNAVAILABLE));
        }
        // one exchange worth of waiting, not one per caller
        assert!(started.elapsed() < Duration::from_millis(1_200), "{:?}", started.elapsed());
        login.assert_hits_async(1).await;

        // a later caller is not served the stale failure
        assert!(gateway.token_manager().acquire_token().await.is_err());
        login.assert_hits_async(2).await;
    }

    #[tokio::test]
    async fn hanging_login_times_out() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(POST).path(DEFAULT_AUTH_PATH);
                then.status(200)
                    .delay(Duration::from_secs(3))
                    .json_body(json!({"access_token": "too-late-token"}));
            })
            .await;

        let gateway = build_gateway_with_timeout(&upstream_config(&server), 200);
        let started = Instant::now();
        let err = gateway.token_manager().acquire_token().await.unwrap_err();

        assert!(matches!(err, ProxyError::Transport(_)), "{:?}", err);
        assert!(started.elapsed() < Duration::from_secs(2));
        assert!(gateway.token_manager().cache().get().await.is_none());
    }

    #[tokio::test]
    async fn trailing_slash_in_base_url_is_ignored() {
        let server = MockServer::start_async().await;
        let login = mock_login(&server, DEFAULT_AUTH_PATH, "slash-token-01").await;

        let mut upstream = upstream_config(&server);
        upstream.base_url = format!("{}/", server.base_url());
        let gateway = build_gateway(&upstream);

        assert_eq!(
            gateway.token_manager().acquire_token().await.unwrap(),
            "slash-token-01"
        );
        login.assert_hits_async(1).await;
    }

    #[tokio::test]
    async fn static_token_needs_no_login() {
        let server = MockServer::start_async().await;
        let login = mock_login(&server, DEFAULT_AUTH_PATH, "never-issued-token").await;

        let mut upstream = upstream_config(&server);
        upstream.login = None;
        upstream.password = None;
        upstream.static_token = Some("pre-shared-token-42".to_string());
        let gateway = build_gateway(&upstream);

        assert_eq!(
            gateway.token_manager().acquire_token().await.unwrap(),
            "pre-shared-token-42"
        );
        login.assert_hits_async(0).await;
    }
}
