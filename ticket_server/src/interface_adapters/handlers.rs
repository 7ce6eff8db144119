use crate::domain::email::AllowedDomain;
use crate::domain::errors::LookupError;
use crate::interface_adapters::protocol::{ErrorResponse, GetTicketRequest, GetTicketResponse};
use crate::interface_adapters::state::AppState;
use crate::use_cases::LookupTicketUseCase;
use axum::{
    Json,
    body::Bytes,
    extract::State,
    http::{Method, StatusCode},
    response::{IntoResponse, Response},
};
use std::any::Any;

type ErrorReply = (StatusCode, Json<ErrorResponse>);

// Handler for looking up the caller's ticket record.
#[tracing::instrument(name = "get_ticket", skip_all)]
pub async fn get_ticket(
    State(state): State<AppState>,
    body: Bytes,
) -> Result<Json<GetTicketResponse>, ErrorReply> {
    // Browsers posting a plain string send text/plain, so the content type is not checked.
    let payload = GetTicketRequest::from_body(&body).map_err(|err| {
        tracing::warn!(error = %err, "rejected unreadable request body");
        error_response(StatusCode::BAD_REQUEST, "Invalid request body")
    })?;

    let use_case = LookupTicketUseCase {
        verifier: state.verifier.clone(),
        store: state.store.clone(),
        allowed_domain: state.allowed_domain.as_ref(),
    };

    let lookup = use_case
        .execute(payload.google_access_token.as_deref())
        .await
        .map_err(|err| map_lookup_error(err, &state.allowed_domain))?;

    let response = GetTicketResponse::from(lookup);
    tracing::info!(found = response.found, "ticket lookup completed");

    Ok(Json(response))
}

// Fallback for every verb other than POST on the ticket route.
pub async fn method_not_allowed(method: Method) -> ErrorReply {
    tracing::debug!(%method, "rejected method");
    error_response(StatusCode::METHOD_NOT_ALLOWED, "Method not allowed")
}

pub async fn not_found() -> ErrorReply {
    error_response(StatusCode::NOT_FOUND, "Not found")
}

// Helper to build a JSON error response.
fn error_response(status: StatusCode, message: &str) -> ErrorReply {
    (
        status,
        Json(ErrorResponse {
            error: message.to_string(),
        }),
    )
}

fn map_lookup_error(err: LookupError, allowed_domain: &AllowedDomain) -> ErrorReply {
    match err {
        LookupError::MissingToken => {
            error_response(StatusCode::BAD_REQUEST, "Missing Google access token")
        }
        LookupError::InvalidToken => error_response(StatusCode::UNAUTHORIZED, "Invalid Google token"),
        LookupError::DomainNotAllowed => {
            error_response(StatusCode::FORBIDDEN, &allowed_domain.rejection_message())
        }
        // Details were logged where the failure happened.
        LookupError::IdentityUnavailable | LookupError::StorageFailure => {
            error_response(StatusCode::INTERNAL_SERVER_ERROR, "Internal server error")
        }
    }
}

// Last-resort response when a handler panics; the panic detail stays in the logs.
pub fn handle_panic(err: Box<dyn Any + Send + 'static>) -> Response {
    let detail = err
        .downcast_ref::<String>()
        .map(String::as_str)
        .or_else(|| err.downcast_ref::<&str>().copied())
        .unwrap_or("unknown panic payload");
    tracing::error!(panic = detail, "request handler panicked");

    error_response(StatusCode::INTERNAL_SERVER_ERROR, "Internal server error").into_response()
}
