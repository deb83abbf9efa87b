//! Token exchange against a mock OAuth2 endpoint

use serde_json::json;
use svcauth::{
    AssertionBuilder, AuthConfig, AuthError, Credential, FixedClock, ServiceAccountSession,
    TokenExchanger,
};
use wiremock::matchers::{body_string_contains, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const RSA_KEY: &str = include_str!("fixtures/rsa_2048.pem");
const T: i64 = 1_700_000_000;

fn credential(token_uri: &str) -> Credential {
    Credential::new("svc@example.iam", RSA_KEY, token_uri).unwrap()
}

fn config_for(server: &MockServer) -> AuthConfig {
    AuthConfig {
        token_endpoint: format!("{}/token", server.uri()),
        ..AuthConfig::default()
    }
}

fn fixed_session(server: &MockServer) -> ServiceAccountSession {
    let config = config_for(server);
    let assertions = AssertionBuilder::from_config(credential(&config.token_endpoint), &config)
        .with_clock(FixedClock::from_unix(T).unwrap());
    ServiceAccountSession::from_parts(assertions, TokenExchanger::new(&config).unwrap())
}

#[tokio::test]
async fn successful_exchange_stores_token() {
    svcauth::logging::init_test();
    let server = MockServer::start().await;
    let session = fixed_session(&server);
    let assertion = session.assertions().build().unwrap();

    Mock::given(method("POST"))
        .and(path("/token"))
        .and(header("content-type", "application/x-www-form-urlencoded"))
        .and(header("cache-control", "no-store"))
        .and(body_string_contains(
            "grant_type=urn%3Aietf%3Aparams%3Aoauth%3Agrant-type%3Ajwt-bearer",
        ))
        .and(body_string_contains(format!("assertion={assertion}")))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "access_token": "ya29.mock-token",
            "token_type": "Bearer",
            "expires_in": 3599
        })))
        .expect(1)
        .mount(&server)
        .await;

    assert!(session.access_token().is_none());
    let token = session.authenticate().await.unwrap();
    assert_eq!(token.as_str(), "ya29.mock-token");
    assert_eq!(token.issued_at(), T);
    assert_eq!(token.expires_at(), T + 3599);

    let held = session.access_token().unwrap();
    assert_eq!(held.as_str(), "ya29.mock-token");
    assert_eq!(session.bearer_header().unwrap(), "Bearer ya29.mock-token");
}

#[tokio::test]
async fn rejected_exchange_leaves_token_unset() {
    svcauth::logging::init_test();
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/token"))
        .respond_with(
            ResponseTemplate::new(400)
                .set_body_string(r#"{"error":"invalid_grant","error_description":"Invalid JWT"}"#),
        )
        .mount(&server)
        .await;

    let config = config_for(&server);
    let session = ServiceAccountSession::connect(credential(&config.token_endpoint), &config)
        .await
        .unwrap();

    assert!(session.access_token().is_none());
    assert!(!session.is_authenticated());
    assert!(matches!(
        session.require_token(),
        Err(AuthError::NotAuthenticated)
    ));

    match session.authenticate().await {
        Err(AuthError::TokenExchange { status, body }) => {
            assert_eq!(status, 400);
            assert!(body.contains("invalid_grant"));
        }
        other => panic!("expected token exchange failure, got {other:?}"),
    }
    assert!(session.access_token().is_none());
}

#[tokio::test]
async fn failed_exchange_keeps_previous_token() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/token"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"access_token": "first"})))
        .up_to_n_times(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/token"))
        .respond_with(ResponseTemplate::new(503).set_body_string("unavailable"))
        .mount(&server)
        .await;

    let session = fixed_session(&server);
    session.authenticate().await.unwrap();
    let err = session.authenticate().await.unwrap_err();
    assert!(err.is_exchange_rejection());

    let held = session.access_token().unwrap();
    assert_eq!(held.as_str(), "first");
    // no expires_in: the assertion lifetime applies
    assert_eq!(held.expires_at(), T + 3660);

    session.clear();
    assert!(session.access_token().is_none());
}

#[tokio::test]
async fn success_status_other_than_200_is_rejected() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({"access_token": "t"})))
        .mount(&server)
        .await;

    let session = fixed_session(&server);
    assert!(matches!(
        session.authenticate().await,
        Err(AuthError::TokenExchange { status: 201, .. })
    ));
    assert!(session.access_token().is_none());
}

#[tokio::test]
async fn ok_without_access_token_is_invalid_response() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"token_type": "Bearer"})))
        .mount(&server)
        .await;

    let session = fixed_session(&server);
    assert!(matches!(
        session.authenticate().await,
        Err(AuthError::InvalidTokenResponse(_))
    ));
    assert!(session.access_token().is_none());
}

#[tokio::test]
async fn unreachable_endpoint_is_transport_error() {
    let exchanger =
        TokenExchanger::with_client(reqwest::Client::new(), "http://127.0.0.1:1/token");
    assert!(matches!(
        exchanger.exchange("a.b.c").await,
        Err(AuthError::Transport(_))
    ));
}

#[tokio::test]
async fn signing_failure_skips_the_request() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let config = config_for(&server);
    let bad = Credential::new("svc@example.iam", "not a key", &config.token_endpoint).unwrap();
    let session = ServiceAccountSession::connect(bad, &config).await.unwrap();
    assert!(session.access_token().is_none());
    assert!(matches!(
        session.authenticate().await,
        Err(AuthError::Jwt(_))
    ));
}

// Answers one request with `head` plus a body shorter than its
// Content-Length, then closes the connection.
async fn serve_truncated(head: &'static str) -> String {
    use tokio::io::{AsyncReadExt, AsyncWriteExt};

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        let (mut socket, _) = listener.accept().await.unwrap();
        let mut request = Vec::new();
        let mut buf = [0u8; 4096];
        loop {
            let n = socket.read(&mut buf).await.unwrap();
            request.extend_from_slice(&buf[..n]);
            let text = String::from_utf8_lossy(&request);
            if let Some(head_end) = text.find("\r\n\r\n") {
                let content_length = text[..head_end]
                    .lines()
                    .find_map(|line| {
                        let (name, value) = line.split_once(':')?;
                        name.eq_ignore_ascii_case("content-length")
                            .then(|| value.trim().parse::<usize>().ok())
                            .flatten()
                    })
                    .unwrap_or(0);
                if request.len() >= head_end + 4 + content_length {
                    break;
                }
            }
            if n == 0 {
                break;
            }
        }
        socket.write_all(head.as_bytes()).await.unwrap();
        socket.shutdown().await.unwrap();
    });
    format!("http://{addr}/token")
}

#[tokio::test]
async fn unreadable_error_body_keeps_status() {
    let uri = serve_truncated(
        "HTTP/1.1 500 Internal Server Error\r\nContent-Length: 100\r\n\r\npartial",
    )
    .await;
    let exchanger = TokenExchanger::with_client(reqwest::Client::new(), &uri);

    match exchanger.exchange("a.b.c").await {
        Err(AuthError::TokenExchange { status, body }) => {
            assert_eq!(status, 500);
            assert!(body.is_empty());
        }
        other => panic!("expected token exchange failure, got {other:?}"),
    }
}

#[tokio::test]
async fn unreadable_success_body_is_transport_error() {
    let uri = serve_truncated("HTTP/1.1 200 OK\r\nContent-Length: 100\r\n\r\n{\"access").await;
    let exchanger = TokenExchanger::with_client(reqwest::Client::new(), &uri);
    assert!(matches!(
        exchanger.exchange("a.b.c").await,
        Err(AuthError::Transport(_))
    ));
}
