//! Guard chain tests.
//!
//! Global protection applied by the `AccessControl` middleware: ignored
//! paths, credential loading, and the login and role gates on secured paths.


use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use actix_web::error::ErrorServiceUnavailable;
use actix_web::http::{header, StatusCode};
use actix_web::{test, HttpResponse};

use actix_access_control_core::http::access::{
    AccessControl, AccessControlConfig, AccessControlOptions, Credentials, PathRule, PathRules,
};
use actix_access_control_core::roles;

use common::{
    admin_config, create_test_app, credential_options, credentials, read_state, with_credentials,
    RetrieveCounter,
};

// =============================================================================
// End-to-end Scenario
// =============================================================================

#[actix_web::test]
async fn test_super_admin_passes_role_gate() {
    let counter = RetrieveCounter::default();
    let config = with_credentials(admin_config(), credentials(false, &["root"]), &counter);
    let app = create_test_app(AccessControl::new(config)).await;

    let req = test::TestRequest::get().uri("/admin").to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
}

#[actix_web::test]
async fn test_missing_role_invokes_unauthorized() {
    let denied = Arc::new(AtomicUsize::new(0));
    let counted = Arc::clone(&denied);
    let counter = RetrieveCounter::default();
    let config = with_credentials(admin_config(), credentials(true, &["guest"]), &counter)
        .unauthorized(move |_req| {
            counted.fetch_add(1, Ordering::SeqCst);
            HttpResponse::Unauthorized().body("denied")
        });
    let app = create_test_app(AccessControl::new(config)).await;

    let req = test::TestRequest::get().uri("/admin").to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(denied.load(Ordering::SeqCst), 1);

    let body = test::read_body(resp).await;
    assert_eq!(&body[..], b"denied");
}

#[actix_web::test]
async fn test_unsecured_path_bypasses_role_gate() {
    let counter = RetrieveCounter::default();
    let config = with_credentials(admin_config(), credentials(true, &["guest"]), &counter);
    let app = create_test_app(AccessControl::new(config)).await;

    let req = test::TestRequest::get().uri("/public").to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(counter.count(), 1);
}

#[actix_web::test]
async fn test_default_unauthorized_is_forbidden() {
    let counter = RetrieveCounter::default();
    let config = with_credentials(admin_config(), credentials(true, &["guest"]), &counter);
    let app = create_test_app(AccessControl::new(config)).await;

    let req = test::TestRequest::get().uri("/admin").to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::FORBIDDEN);

    let body = test::read_body(resp).await;
    assert_eq!(&body[..], b"Forbidden");
}

// =============================================================================
// Path Matching
// =============================================================================

#[actix_web::test]
async fn test_exact_secured_path_does_not_match_subpaths() {
    let counter = RetrieveCounter::default();
    let config = with_credentials(admin_config(), credentials(true, &[]), &counter);
    let app = create_test_app(AccessControl::new(config)).await;

    let req = test::TestRequest::get().uri("/admin/users").to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
}

#[actix_web::test]
async fn test_pattern_secured_path() {
    let counter = RetrieveCounter::default();
    let config = AccessControlConfig::default()
        .secured_path(PathRule::pattern("^/admin").unwrap())
        .required_roles("admin");
    let config = with_credentials(config, credentials(true, &[]), &counter);
    let app = create_test_app(AccessControl::new(config)).await;

    for uri in ["/admin", "/admin/users"] {
        let req = test::TestRequest::get().uri(uri).to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::FORBIDDEN, "{}", uri);
    }
}

#[actix_web::test]
async fn test_ignored_path_never_retrieves() {
    let counter = RetrieveCounter::default();
    let config = AccessControlConfig::default()
        .ignored_path(PathRule::custom(|path: &str| path.starts_with("/pub")))
        .secured_path(PathRule::pattern(".*").unwrap())
        .required_logged_in(true);
    let config = with_credentials(config, credentials(false, &[]), &counter);
    let app = create_test_app(AccessControl::new(config)).await;

    for uri in ["/favicon.ico", "/public"] {
        let req = test::TestRequest::get().uri(uri).to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::OK, "{}", uri);
    }
    assert_eq!(counter.count(), 0);

    let req = test::TestRequest::get().uri("/admin").to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::FOUND);
    assert_eq!(counter.count(), 1);
}

// =============================================================================
// Credentials
// =============================================================================

#[actix_web::test]
async fn test_unavailable_credentials_skip_gates() {
    let counter = RetrieveCounter::default();
    let config = admin_config().required_logged_in(true);
    let config = with_credentials(config, Credentials::unavailable(), &counter);
    let app = create_test_app(AccessControl::new(config)).await;

    let req = test::TestRequest::get().uri("/admin").to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);

    let req = test::TestRequest::get().uri("/whoami").to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(read_state(resp).await, None);
}

#[actix_web::test]
async fn test_principal_reaches_handler() {
    let counter = RetrieveCounter::default();
    let config = with_credentials(
        AccessControlConfig::default(),
        credentials(true, &["editor", "editor", "admin"]),
        &counter,
    );
    let app = create_test_app(AccessControl::new(config)).await;

    let req = test::TestRequest::get().uri("/whoami").to_request();
    let resp = test::call_service(&app, req).await;
    let state = read_state(resp).await.unwrap();
    assert!(state.logged_in);
    assert_eq!(state.roles, vec!["editor", "admin"]);
}

#[actix_web::test]
async fn test_retrieve_error_aborts_chain() {
    let config = AccessControlConfig::default()
        .retrieve(|_req| async { Err(ErrorServiceUnavailable("store down")) });
    let app = create_test_app(AccessControl::new(config)).await;

    let req = test::TestRequest::get().uri("/public").to_request();
    let status = match test::try_call_service(&app, req).await {
        Ok(resp) => resp.status(),
        Err(err) => err.as_response_error().status_code(),
    };
    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
}

// =============================================================================
// Login Gate
// =============================================================================

#[actix_web::test]
async fn test_login_gate_runs_before_role_gate() {
    let unauthenticated = Arc::new(AtomicUsize::new(0));
    let unauthorized = Arc::new(AtomicUsize::new(0));
    let (a, b) = (Arc::clone(&unauthenticated), Arc::clone(&unauthorized));

    let counter = RetrieveCounter::default();
    let config = admin_config()
        .required_logged_in(true)
        .unauthenticated(move |_req| {
            a.fetch_add(1, Ordering::SeqCst);
            HttpResponse::Unauthorized().finish()
        })
        .unauthorized(move |_req| {
            b.fetch_add(1, Ordering::SeqCst);
            HttpResponse::Forbidden().finish()
        });
    let config = with_credentials(config, credentials(false, &[]), &counter);
    let app = create_test_app(AccessControl::new(config)).await;

    let req = test::TestRequest::get().uri("/admin").to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(unauthenticated.load(Ordering::SeqCst), 1);
    assert_eq!(unauthorized.load(Ordering::SeqCst), 0);
}

#[actix_web::test]
async fn test_logged_in_principal_reaches_role_gate() {
    let counter = RetrieveCounter::default();
    let config = admin_config().required_logged_in(true);
    let config = with_credentials(config, credentials(true, &["guest"]), &counter);
    let app = create_test_app(AccessControl::new(config)).await;

    let req = test::TestRequest::get().uri("/admin").to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::FORBIDDEN);
}

#[actix_web::test]
async fn test_default_unauthenticated_redirects_to_login() {
    let counter = RetrieveCounter::default();
    let config = AccessControlConfig::default()
        .secured_path("/admin")
        .required_logged_in(true)
        .login_path("/signin");
    let config = with_credentials(config, credentials(false, &["admin"]), &counter);
    let app = create_test_app(AccessControl::new(config)).await;

    let req = test::TestRequest::get().uri("/admin").to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::FOUND);

    let location = resp
        .headers()
        .get(header::LOCATION)
        .unwrap()
        .to_str()
        .unwrap()
        .to_string();
    assert!(location.starts_with("http://"), "{}", location);
    assert!(location.ends_with("/signin"), "{}", location);
    assert_eq!(
        resp.headers().get(header::CONTENT_TYPE).unwrap(),
        "text/html"
    );

    let body = test::read_body(resp).await;
    assert!(String::from_utf8_lossy(&body).contains(&location));
}

// =============================================================================
// Options
// =============================================================================

#[actix_web::test]
async fn test_options_merge_onto_defaults() {
    let counter = RetrieveCounter::default();
    let options = AccessControlOptions {
        secured_paths: Some(PathRules::new().with("/admin")),
        required_roles: Some(roles![["admin", "moderator"]].into()),
        super_admin: Some(vec!["root".to_string()]),
        ..credential_options(credentials(true, &["superadmin"]), &counter)
    };
    let access = AccessControl::from_options(options);
    assert_eq!(access.config().super_admin_roles(), ["superadmin", "root"]);
    let app = create_test_app(access).await;

    // default super admin survives the merge
    let req = test::TestRequest::get().uri("/admin").to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);

    // default ignored path survives the merge
    let req = test::TestRequest::get().uri("/favicon.ico").to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(counter.count(), 1);
}
