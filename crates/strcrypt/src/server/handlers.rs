//! Axum request handlers for all service endpoints.

use axum::{
    extract::{rejection::FormRejection, State},
    http::StatusCode,
    response::{Html, IntoResponse, Response},
    Form, Json,
};
use common::protocol::{CryptRequest, CryptResponse, ErrorResponse, HealthResponse, KeyResponse};
use common::ServiceError;
use tracing::{info, info_span, warn};
use uuid::Uuid;

use super::page::{self, Flash, FormView};
use super::state::AppState;
use crate::endpoint::{EndpointError, Operation};

/// `GET /`: landing page.
pub async fn index() -> Html<String> {
    Html(page::landing())
}

/// `GET /encode`: empty encode form.
pub async fn encode_form() -> Html<String> {
    Html(page::form_page(Operation::Encode, &FormView::default(), &[]))
}

/// `POST /encode`: encrypt the submitted value and re-render the form.
pub async fn encode_submit(
    State(state): State<AppState>,
    form: Result<Form<CryptRequest>, FormRejection>,
) -> Response {
    match submission(form) {
        Ok(req) => submit_form(&state, Operation::Encode, req).into_response(),
        Err(rejection) => rejection.into_response(),
    }
}

/// `GET /decode`: empty decode form.
pub async fn decode_form() -> Html<String> {
    Html(page::form_page(Operation::Decode, &FormView::default(), &[]))
}

/// `POST /decode`: decrypt the submitted value and re-render the form.
pub async fn decode_submit(
    State(state): State<AppState>,
    form: Result<Form<CryptRequest>, FormRejection>,
) -> Response {
    match submission(form) {
        Ok(req) => submit_form(&state, Operation::Decode, req).into_response(),
        Err(rejection) => rejection.into_response(),
    }
}

/// `POST /api/encode`: JSON variant of the encode form.
pub async fn api_encode(State(state): State<AppState>, Json(req): Json<CryptRequest>) -> Response {
    api_dispatch(&state, Operation::Encode, &req)
}

/// `POST /api/decode`: JSON variant of the decode form.
pub async fn api_decode(State(state): State<AppState>, Json(req): Json<CryptRequest>) -> Response {
    api_dispatch(&state, Operation::Decode, &req)
}

/// `GET /api/key`: generate a fresh key in its ASCII-safe encoding.
pub async fn api_key(State(state): State<AppState>) -> Response {
    match state.endpoint.generate_key() {
        Ok(key) => (StatusCode::OK, Json(KeyResponse { key })).into_response(),
        Err(e) => {
            warn!(error = %e, "key generation failed");
            error_response(&ServiceError::from(e))
        }
    }
}

/// `GET /health`: liveness check.
pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".into(),
        version: env!("CARGO_PKG_VERSION").into(),
    })
}

/// Catch-all 404 handler.
pub async fn not_found() -> Response {
    error_response(&ServiceError::NotFound(
        "the requested resource does not exist".into(),
    ))
}

/// A body that cannot be read (e.g. over the size limit) is rejected. A body
/// that is not a urlencoded form counts as an empty submission, so the form
/// is re-rendered with its field errors.
fn submission(
    form: Result<Form<CryptRequest>, FormRejection>,
) -> Result<CryptRequest, FormRejection> {
    match form {
        Ok(Form(req)) => Ok(req),
        Err(rejection @ FormRejection::BytesRejection(_)) => Err(rejection),
        Err(rejection) => {
            info!(%rejection, "unreadable form submission treated as empty");
            Ok(CryptRequest::default())
        }
    }
}

fn submit_form(state: &AppState, op: Operation, mut req: CryptRequest) -> Html<String> {
    // Text inputs are trimmed before validation, so whitespace-only is blank.
    req.value = req.value.trim().to_owned();
    req.key = req.key.trim().to_owned();

    let outcome = run(state, op, &req);
    let flashes: Vec<Flash> = Flash::from_outcome(op, &outcome).into_iter().collect();
    let form = FormView {
        value: &req.value,
        key: &req.key,
        violations: outcome
            .as_ref()
            .err()
            .map(EndpointError::violations)
            .unwrap_or_default(),
    };
    Html(page::form_page(op, &form, &flashes))
}

fn api_dispatch(state: &AppState, op: Operation, req: &CryptRequest) -> Response {
    match run(state, op, req) {
        Ok(output) => (StatusCode::OK, Json(CryptResponse { output })).into_response(),
        Err(e) => error_response(&ServiceError::from(e)),
    }
}

/// Dispatch one operation inside a request span and log its outcome.
///
/// Only the operation, the outcome kind and a request id are recorded.
fn run(state: &AppState, op: Operation, req: &CryptRequest) -> Result<String, EndpointError> {
    let request_id = Uuid::new_v4();
    let span = info_span!("crypt", %request_id, op = op.as_str());
    let _guard = span.enter();

    let outcome = state.endpoint.dispatch(op, req);
    match &outcome {
        Ok(_) => info!("operation succeeded"),
        Err(e) => match e.kind() {
            Some(kind) => warn!(%kind, "operation failed"),
            None => info!(violations = e.violations().len(), "submission rejected"),
        },
    }
    outcome
}

fn error_response(err: &ServiceError) -> Response {
    let status =
        StatusCode::from_u16(err.http_status()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
    (status, Json(ErrorResponse::from(err))).into_response()
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::crypto::entropy::{EntropyError, MockEntropySource};
    use crate::endpoint::EncryptionEndpoint;
    use crate::server::{middleware::Limits, router};
    use axum_test::TestServer;

    /// Key whose bytes are `0x00..=0x1F`.
    const TEST_KEY: &str = "def00000000102030405060708090a0b0c0d0e0f101112131415161718191a1b1c1d1e1fc8bd80416dc6496a3834f9792dfed9fae0cdfcb55b5231ed6489b86a4322d302";

    fn server() -> TestServer {
        TestServer::new(router::build(AppState::default(), Limits::default())).unwrap()
    }

    /// Extract the output shown in a success flash.
    fn flash_output(html: &str) -> &str {
        let start = html.find("<code>").expect("no success flash") + "<code>".len();
        let end = html[start..].find("</code>").unwrap() + start;
        &html[start..end]
    }

    #[tokio::test]
    async fn index_links_forms() {
        let resp = server().get("/").await;
        assert_eq!(resp.status_code(), StatusCode::OK);
        assert!(resp.text().contains("href=\"/encode\""));
    }

    #[tokio::test]
    async fn get_encode_renders_empty_form() {
        let resp = server().get("/encode").await;
        assert_eq!(resp.status_code(), StatusCode::OK);
        let html = resp.text();
        assert!(html.contains("action=\"/encode\""));
        assert!(!html.contains("flash"));
    }

    #[tokio::test]
    async fn form_round_trip() {
        let server = server();
        let html = server
            .post("/encode")
            .form(&CryptRequest::new("hello world", TEST_KEY))
            .await
            .text();
        assert!(html.contains("<b>Encode string</b>: "));
        let ciphertext = flash_output(&html).to_owned();
        assert_ne!(ciphertext, "hello world");

        let html = server
            .post("/decode")
            .form(&CryptRequest::new(ciphertext, TEST_KEY))
            .await
            .text();
        assert!(html.contains("<b>Decode string</b>: "));
        assert_eq!(flash_output(&html), "hello world");
    }

    #[tokio::test]
    async fn form_trims_surrounding_whitespace() {
        let server = server();
        let html = server
            .post("/encode")
            .form(&CryptRequest::new("  padded  ", format!("  {TEST_KEY}\n")))
            .await
            .text();
        let ciphertext = flash_output(&html).to_owned();

        let resp: CryptResponse = server
            .post("/api/decode")
            .json(&CryptRequest::new(ciphertext, TEST_KEY))
            .await
            .json();
        assert_eq!(resp.output, "padded");
    }

    #[tokio::test]
    async fn form_blank_fields_show_violations() {
        let html = server()
            .post("/encode")
            .form(&CryptRequest::new("   ", ""))
            .await
            .text();
        assert_eq!(html.matches("This value should not be blank.").count(), 2);
        assert!(!html.contains("class=\"flash"));
    }

    #[tokio::test]
    async fn form_missing_fields_are_blank() {
        let html = server()
            .post("/decode")
            .form(&[("value", "abc")])
            .await
            .text();
        assert_eq!(html.matches("This value should not be blank.").count(), 1);
    }

    #[tokio::test]
    async fn form_decode_wrong_data_is_prefixed() {
        let server = server();
        let html = server
            .post("/decode")
            .form(&CryptRequest::new("garbage-ciphertext", TEST_KEY))
            .await
            .text();
        assert!(html
            .contains("class=\"flash errors\">Key error: ciphertext has invalid hex encoding"));

        let html = server
            .post("/decode")
            .form(&CryptRequest::new("hello", "not-a-valid-key"))
            .await
            .text();
        assert!(html.contains("Key error: key is not a valid hex string"));

        let other = EncryptionEndpoint::default().generate_key().unwrap();
        let c = EncryptionEndpoint::default()
            .encode(&CryptRequest::new("secret", other))
            .unwrap();
        let html = server
            .post("/decode")
            .form(&CryptRequest::new(c, TEST_KEY))
            .await
            .text();
        assert!(html.contains("Decrypt error: integrity check failed"));
    }

    #[tokio::test]
    async fn form_encode_bad_key_is_unprefixed() {
        let html = server()
            .post("/encode")
            .form(&CryptRequest::new("hello", "not-a-valid-key"))
            .await
            .text();
        assert!(html.contains("class=\"flash errors\">key is not a valid hex string</div>"));
    }

    #[tokio::test]
    async fn api_round_trip() {
        let server = server();
        let encoded: CryptResponse = server
            .post("/api/encode")
            .json(&CryptRequest::new("hello world", TEST_KEY))
            .await
            .json();
        let decoded = server
            .post("/api/decode")
            .json(&CryptRequest::new(encoded.output, TEST_KEY))
            .await;
        assert_eq!(decoded.status_code(), StatusCode::OK);
        assert_eq!(decoded.json::<CryptResponse>().output, "hello world");
    }

    #[tokio::test]
    async fn api_does_not_trim() {
        let server = server();
        let encoded: CryptResponse = server
            .post("/api/encode")
            .json(&CryptRequest::new(" x ", TEST_KEY))
            .await
            .json();
        let decoded: CryptResponse = server
            .post("/api/decode")
            .json(&CryptRequest::new(encoded.output, TEST_KEY))
            .await
            .json();
        assert_eq!(decoded.output, " x ");
    }

    #[tokio::test]
    async fn api_error_statuses() {
        let server = server();

        let resp = server
            .post("/api/encode")
            .json(&CryptRequest::new("", TEST_KEY))
            .expect_failure()
            .await;
        assert_eq!(resp.status_code(), StatusCode::BAD_REQUEST);
        assert_eq!(resp.json::<ErrorResponse>().code, "bad_request");

        let resp = server
            .post("/api/encode")
            .json(&CryptRequest::new("v", "not-a-valid-key"))
            .expect_failure()
            .await;
        assert_eq!(resp.status_code(), StatusCode::BAD_REQUEST);
        assert_eq!(resp.json::<ErrorResponse>().code, "key_format_error");

        let resp = server
            .post("/api/decode")
            .json(&CryptRequest::new("garbage-ciphertext", TEST_KEY))
            .expect_failure()
            .await;
        assert_eq!(resp.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(resp.json::<ErrorResponse>().code, "environment_error");

        let other = EncryptionEndpoint::default().generate_key().unwrap();
        let c = EncryptionEndpoint::default()
            .encode(&CryptRequest::new("secret", other))
            .unwrap();
        let resp = server
            .post("/api/decode")
            .json(&CryptRequest::new(c, TEST_KEY))
            .expect_failure()
            .await;
        assert_eq!(resp.status_code(), StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(resp.json::<ErrorResponse>().code, "authentication_error");
    }

    #[tokio::test]
    async fn api_key_returns_usable_key() {
        let server = server();
        let key: KeyResponse = server.get("/api/key").await.json();
        assert!(key.key.starts_with("def00000"));
        let resp = server
            .post("/api/encode")
            .json(&CryptRequest::new("x", key.key))
            .await;
        assert_eq!(resp.status_code(), StatusCode::OK);
    }

    #[tokio::test]
    async fn broken_entropy_surfaces_as_environment_error() {
        let mut entropy = MockEntropySource::new();
        entropy
            .expect_fill()
            .returning(|_| Err(EntropyError::new("no randomness")));
        let state = AppState::new(EncryptionEndpoint::new(Arc::new(entropy)));
        let server = TestServer::new(router::build(state, Limits::default())).unwrap();

        let resp = server.get("/api/key").expect_failure().await;
        assert_eq!(resp.status_code(), StatusCode::INTERNAL_SERVER_ERROR);

        let html = server
            .post("/encode")
            .form(&CryptRequest::new("hello", TEST_KEY))
            .await
            .text();
        assert!(html.contains("could not gather sufficient random data"));
    }

    #[tokio::test]
    async fn health_reports_ok() {
        let resp = server().get("/health").await;
        assert_eq!(resp.status_code(), StatusCode::OK);
        assert_eq!(resp.json::<HealthResponse>().status, "ok");
    }
}
