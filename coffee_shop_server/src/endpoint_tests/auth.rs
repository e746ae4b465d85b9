use std::sync::Arc;

use actix_web::{http::StatusCode, test::TestRequest};
use async_trait::async_trait;
use jsonwebtoken::{jwk::JwkSet, Algorithm};
use log::debug;

use super::{
    helpers::*,
    mocks::MockDrinkManager,
};
use crate::{
    auth::{KeyProvider, TokenVerifier},
    errors::AuthError,
};

const UNAUTHENTICATED: &str = r#"{"success":false,"error":401,"message":"Unauthenticated"}"#;
const UNAUTHORIZED: &str = r#"{"success":false,"error":403,"message":"Unauthorized"}"#;

/// A backend that must never be reached.
fn untouched_db() -> MockDrinkManager {
    let mut db = MockDrinkManager::new();
    db.expect_fetch_drinks().never();
    db.expect_insert_drink().never();
    db.expect_update_drink().never();
    db.expect_delete_drink().never();
    db
}

#[actix_web::test]
async fn no_authorization_header() {
    let _ = env_logger::try_init().ok();
    let res = send(TestRequest::get().uri("/drinks-detail"), untouched_db()).await;
    assert_eq!(res.status, StatusCode::UNAUTHORIZED);
    assert_eq!(res.body, UNAUTHENTICATED);

    let res = send(TestRequest::delete().uri("/drinks/1"), untouched_db()).await;
    assert_eq!(res.status, StatusCode::UNAUTHORIZED);
    assert_eq!(res.body, UNAUTHENTICATED);
}

#[actix_web::test]
async fn authorization_runs_before_body_checks() {
    let _ = env_logger::try_init().ok();
    let res = send(TestRequest::patch().uri("/drinks/1"), untouched_db()).await;
    assert_eq!(res.status, StatusCode::UNAUTHORIZED);

    let req = TestRequest::post().uri("/drinks").insert_header(("Content-Type", "application/json")).set_payload("{");
    let res = send(req, untouched_db()).await;
    assert_eq!(res.status, StatusCode::UNAUTHORIZED);
}

#[actix_web::test]
async fn malformed_authorization_headers() {
    let _ = env_logger::try_init().ok();
    let token = issue_token(&TestClaims::new(&["get:drinks-detail"]));
    let headers = [
        format!("Basic {token}"),
        "Bearer".to_string(),
        format!("Bearer {token} {token}"),
        token.clone(),
        String::new(),
    ];
    for header in headers {
        debug!("Trying Authorization: {header}");
        let req = TestRequest::get().uri("/drinks-detail").insert_header(("Authorization", header.as_str()));
        let res = send(req, untouched_db()).await;
        assert_eq!(res.status, StatusCode::UNAUTHORIZED, "Authorization: {header}");
        assert_eq!(res.body, UNAUTHENTICATED);
    }
}

#[actix_web::test]
async fn bearer_prefix_must_match_exactly() {
    let _ = env_logger::try_init().ok();
    let token = issue_token(&TestClaims::new(&["get:drinks-detail"]));
    for scheme in ["bearer", "BEARER"] {
        let req =
            TestRequest::get().uri("/drinks-detail").insert_header(("Authorization", format!("{scheme} {token}")));
        let res = send(req, untouched_db()).await;
        assert_eq!(res.status, StatusCode::UNAUTHORIZED, "scheme: {scheme}");
        assert_eq!(res.body, UNAUTHENTICATED);
    }

    let mut db = MockDrinkManager::new();
    db.expect_fetch_drinks().returning(|| Ok(vec![latte()]));
    let req = TestRequest::get().uri("/drinks-detail").insert_header(("Authorization", format!("Bearer {token}")));
    let res = send(req, db).await;
    assert_eq!(res.status, StatusCode::OK);
}

#[actix_web::test]
async fn tampered_token() {
    let _ = env_logger::try_init().ok();
    let mut token = issue_token(&TestClaims::new(&["delete:drinks"]));
    token.replace_range(token.len() - 10..token.len() - 5, "AAAAA");
    debug!("Calling DELETE /drinks/1 with invalid token {token}");
    let req = TestRequest::delete().uri("/drinks/1").insert_header(("Authorization", format!("Bearer {token}")));
    let res = send(req, untouched_db()).await;
    assert_eq!(res.status, StatusCode::UNAUTHORIZED);
    assert_eq!(res.body, UNAUTHENTICATED);
}

#[actix_web::test]
async fn token_signed_by_someone_else() {
    let _ = env_logger::try_init().ok();
    let claims = TestClaims::new(&["delete:drinks"]);
    let token = issue_token_with(&claims, OTHER_PRIVATE_KEY, Some(TEST_KID), Algorithm::RS256);
    let req = TestRequest::delete().uri("/drinks/1").insert_header(("Authorization", format!("Bearer {token}")));
    let res = send(req, untouched_db()).await;
    assert_eq!(res.status, StatusCode::UNAUTHORIZED);
}

#[actix_web::test]
async fn expired_token() {
    let _ = env_logger::try_init().ok();
    let token = issue_token(&TestClaims::new(&["post:drinks"]).expired());
    let req = TestRequest::post().uri("/drinks").insert_header(("Authorization", format!("Bearer {token}")));
    let res = send(req, untouched_db()).await;
    assert_eq!(res.status, StatusCode::UNAUTHORIZED);
    assert_eq!(res.body, UNAUTHENTICATED);
}

#[actix_web::test]
async fn token_for_another_api() {
    let _ = env_logger::try_init().ok();
    let token = issue_token(&TestClaims::new(&["get:drinks-detail"]).with_audience("payroll"));
    let req = TestRequest::get().uri("/drinks-detail").insert_header(("Authorization", format!("Bearer {token}")));
    let res = send(req, untouched_db()).await;
    assert_eq!(res.status, StatusCode::UNAUTHORIZED);
}

#[actix_web::test]
async fn missing_permission() {
    let _ = env_logger::try_init().ok();
    let req = TestRequest::delete().uri("/drinks/1").insert_header(bearer(&["get:drinks-detail", "patch:drinks"]));
    let res = send(req, untouched_db()).await;
    assert_eq!(res.status, StatusCode::FORBIDDEN);
    assert_eq!(res.body, UNAUTHORIZED);
}

#[actix_web::test]
async fn barista_cannot_change_the_menu() {
    let _ = env_logger::try_init().ok();
    let barista = ["get:drinks-detail"];
    let req = TestRequest::post().uri("/drinks").insert_header(bearer(&barista));
    assert_eq!(send(req, untouched_db()).await.status, StatusCode::FORBIDDEN);
    let req = TestRequest::patch().uri("/drinks/1").insert_header(bearer(&barista));
    assert_eq!(send(req, untouched_db()).await.status, StatusCode::FORBIDDEN);
    let req = TestRequest::delete().uri("/drinks/1").insert_header(bearer(&barista));
    assert_eq!(send(req, untouched_db()).await.status, StatusCode::FORBIDDEN);
}

#[actix_web::test]
async fn token_without_permissions_claim() {
    let _ = env_logger::try_init().ok();
    let token = issue_token(&TestClaims::without_permissions());
    let req = TestRequest::get().uri("/drinks-detail").insert_header(("Authorization", format!("Bearer {token}")));
    let res = send(req, untouched_db()).await;
    assert_eq!(res.status, StatusCode::UNAUTHORIZED);
    assert_eq!(res.body, UNAUTHENTICATED);
}

#[actix_web::test]
async fn key_set_unavailable() {
    struct Offline;
    #[async_trait]
    impl KeyProvider for Offline {
        async fn fetch_keys(&self) -> Result<Arc<JwkSet>, AuthError> {
            Err(AuthError::KeySetUnavailable("connection refused".into()))
        }
    }

    let _ = env_logger::try_init().ok();
    let verifier = TokenVerifier::new(&test_auth_config(), Arc::new(Offline));
    let req = TestRequest::get().uri("/drinks-detail").insert_header(bearer(&["get:drinks-detail"]));
    let res = send_with_verifier(req, untouched_db(), verifier).await;
    assert_eq!(res.status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(res.body, r#"{"success":false,"error":500,"message":"internal server error"}"#);
}
