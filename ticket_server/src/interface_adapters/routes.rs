use crate::interface_adapters::handlers::{get_ticket, handle_panic, method_not_allowed, not_found};
use crate::interface_adapters::state::AppState;
use axum::{
    Router,
    http::{
        HeaderValue,
        header::{ACCESS_CONTROL_ALLOW_HEADERS, ACCESS_CONTROL_ALLOW_ORIGIN, CONTENT_TYPE},
    },
    routing::post,
};
use tower_http::{catch_panic::CatchPanicLayer, set_header::SetResponseHeaderLayer};

pub const TICKET_PATH: &str = "/get-ticket";
// Path the browser clients were built against.
pub const NETLIFY_TICKET_PATH: &str = "/.netlify/functions/get-ticket";

pub fn app(state: AppState) -> Router {
    let ticket = post(get_ticket).fallback(method_not_allowed);

    Router::new()
        .route(TICKET_PATH, ticket.clone())
        .route(NETLIFY_TICKET_PATH, ticket)
        .fallback(not_found)
        .layer(CatchPanicLayer::custom(handle_panic))
        // Every response, errors included, is JSON and readable cross-origin.
        .layer(SetResponseHeaderLayer::if_not_present(
            CONTENT_TYPE,
            HeaderValue::from_static("application/json"),
        ))
        .layer(SetResponseHeaderLayer::overriding(
            ACCESS_CONTROL_ALLOW_ORIGIN,
            HeaderValue::from_static("*"),
        ))
        .layer(SetResponseHeaderLayer::overriding(
            ACCESS_CONTROL_ALLOW_HEADERS,
            HeaderValue::from_static("Content-Type"),
        ))
        .with_state(state)
}
