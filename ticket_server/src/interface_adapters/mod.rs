// Interface adapters: HTTP surface and clients for external services.

pub mod clients;
pub mod handlers;
pub mod protocol;
pub mod routes;
pub mod state;
pub mod stores;
