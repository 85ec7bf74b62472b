use super::*;
use crate::backend::config::BackendTimeouts;

const CALLBACK: &str = "http://localhost:3000/auth/callback";

fn client() -> SupabaseClient {
    let config = BackendConfig::new(
        Some("https://abc.supabase.co/".into()),
        Some("anon-key".into()),
        BackendTimeouts::default(),
    )
    .unwrap();
    SupabaseClient::new(config).unwrap()
}

fn session(expires_at: Option<i64>) -> Session {
    Session {
        access_token: "at".into(),
        refresh_token: "rt".into(),
        token_type: "bearer".into(),
        expires_in: Some(3600),
        expires_at,
        user: SessionUser { id: "u1".into(), email: Some("a@b.co".into()), user_metadata: serde_json::json!({}) },
    }
}

// =============================================================================
// parse_session
// =============================================================================

#[test]
fn parse_session_derives_expires_at_from_expires_in() {
    let json = serde_json::json!({
        "access_token": "at",
        "refresh_token": "rt",
        "token_type": "bearer",
        "expires_in": 3600,
        "user": { "id": "u1", "email": "a@b.co" }
    })
    .to_string();
    let session = parse_session(&json, 1_000).unwrap();
    assert_eq!(session.expires_at, Some(4_600));
    assert_eq!(session.user.id, "u1");
    assert_eq!(session.user.email.as_deref(), Some("a@b.co"));
}

#[test]
fn parse_session_keeps_server_expires_at() {
    let json = serde_json::json!({
        "access_token": "at",
        "expires_in": 3600,
        "expires_at": 99,
        "user": { "id": "u1" }
    })
    .to_string();
    let session = parse_session(&json, 1_000).unwrap();
    assert_eq!(session.expires_at, Some(99));
    assert_eq!(session.token_type, "bearer");
}

#[test]
fn parse_session_rejects_missing_user() {
    let err = parse_session(r#"{"access_token":"at"}"#, 0).unwrap_err();
    assert!(matches!(err, BackendError::Parse(_)));
}

// =============================================================================
// parse_auth_error
// =============================================================================

#[test]
fn auth_error_prefers_error_description() {
    let err = parse_auth_error(400, r#"{"error":"invalid_grant","error_description":"Invalid Refresh Token"}"#);
    assert!(matches!(err, BackendError::Auth { ref message } if message == "Invalid Refresh Token"));
}

#[test]
fn auth_error_reads_msg_field() {
    let err = parse_auth_error(422, r#"{"code":422,"msg":"Email address is invalid"}"#);
    assert_eq!(err.to_string(), "Email address is invalid");
}

#[test]
fn auth_error_falls_back_on_unparseable_body() {
    let err = parse_auth_error(401, "nope");
    assert!(matches!(err, BackendError::Auth { ref message } if message.contains("401")));
}

#[test]
fn server_error_is_not_an_auth_error() {
    let err = parse_auth_error(503, "upstream down");
    assert!(matches!(err, BackendError::Response { status: 503, ref body } if body == "upstream down"));
}

// =============================================================================
// CLIENT (no network)
// =============================================================================

#[tokio::test]
async fn get_session_empty_by_default() {
    assert!(client().get_session().await.unwrap().is_none());
}

#[tokio::test]
async fn set_session_announces_signed_in() {
    let client = client();
    let mut rx = client.on_session_change();
    client.set_session(session(None)).await.unwrap();

    let change = rx.recv().await.unwrap();
    assert_eq!(change.event, AuthEvent::SignedIn);
    assert_eq!(change.session.unwrap().user.id, "u1");
    assert_eq!(client.get_session().await.unwrap().unwrap().access_token, "at");
}

#[tokio::test]
async fn get_session_returns_fresh_session_without_refresh() {
    let client = client();
    client.set_session(session(Some(now_unix() + 3_600))).await.unwrap();
    let current = client.get_session().await.unwrap().unwrap();
    assert_eq!(current.access_token, "at");
}

#[tokio::test]
async fn sign_out_without_session_clears_and_announces() {
    let client = client();
    let mut rx = client.on_session_change();
    client.sign_out().await.unwrap();
    let change = rx.recv().await.unwrap();
    assert_eq!(change.event, AuthEvent::SignedOut);
    assert!(change.session.is_none());
}

#[tokio::test]
async fn exchange_without_pending_verifier_is_auth_error() {
    let err = client().exchange_code_for_session("code", None).await.unwrap_err();
    assert!(matches!(err, BackendError::Auth { .. }));
    let err = client().exchange_code_for_session("code", Some("f1")).await.unwrap_err();
    assert!(matches!(err, BackendError::Auth { .. }));
}

fn flow_of(authorize_url: &str) -> String {
    let encoded = authorize_url
        .split("redirect_to=")
        .nth(1)
        .and_then(|rest| rest.split('&').next())
        .unwrap();
    let redirect = urlencoding::decode(encoded).unwrap();
    redirect.split("flow=").nth(1).unwrap().to_owned()
}

#[tokio::test]
async fn overlapping_sign_ins_keep_their_own_verifiers() {
    let client = client();
    let first = client.authorize_url(OAuthProvider::Google, CALLBACK).await.unwrap();
    let second = client.authorize_url(OAuthProvider::Github, CALLBACK).await.unwrap();
    let (first_flow, second_flow) = (flow_of(&first), flow_of(&second));
    assert_ne!(first_flow, second_flow);

    let first_verifier = client.take_verifier(Some(&first_flow)).await.unwrap();
    assert!(first.contains(&format!("code_challenge={}", pkce::challenge_for(&first_verifier))));
    assert!(client.take_verifier(Some(&first_flow)).await.is_none());

    let second_verifier = client.take_verifier(Some(&second_flow)).await.unwrap();
    assert!(second.contains(&format!("code_challenge={}", pkce::challenge_for(&second_verifier))));
}

#[tokio::test]
async fn callback_without_flow_uses_newest_verifier() {
    let client = client();
    client.authorize_url(OAuthProvider::Google, CALLBACK).await.unwrap();
    let newest = client.authorize_url(OAuthProvider::Github, CALLBACK).await.unwrap();
    let verifier = client.take_verifier(None).await.unwrap();
    assert!(newest.contains(&format!("code_challenge={}", pkce::challenge_for(&verifier))));
}

#[tokio::test]
async fn pending_flows_are_bounded() {
    let client = client();
    let first = client.authorize_url(OAuthProvider::Google, CALLBACK).await.unwrap();
    for _ in 0..MAX_PENDING_FLOWS {
        client.authorize_url(OAuthProvider::Google, CALLBACK).await.unwrap();
    }
    assert_eq!(client.pending_flows.lock().await.len(), MAX_PENDING_FLOWS);
    assert!(client.take_verifier(Some(&flow_of(&first))).await.is_none());
}

#[test]
fn with_flow_picks_separator() {
    assert_eq!(with_flow("http://h/auth/callback", "ab"), "http://h/auth/callback?flow=ab");
    assert_eq!(with_flow("http://h/auth/callback?next=%2F", "ab"), "http://h/auth/callback?next=%2F&flow=ab");
}

#[tokio::test]
async fn authorize_url_carries_provider_redirect_and_challenge() {
    let client = client();
    let url = client.authorize_url(OAuthProvider::Github, CALLBACK).await.unwrap();
    assert!(url.starts_with("https://abc.supabase.co/auth/v1/authorize?provider=github&"));
    assert!(url.contains("redirect_to=http%3A%2F%2Flocalhost%3A3000%2Fauth%2Fcallback%3Fflow%3D"));
    assert!(url.ends_with("&code_challenge_method=s256"));

    let verifier = client.take_verifier(None).await.unwrap();
    assert!(url.contains(&format!("code_challenge={}", pkce::challenge_for(&verifier))));
}

#[tokio::test]
async fn refresh_session_without_session_is_none() {
    assert!(client().refresh_session().await.unwrap().is_none());
}
