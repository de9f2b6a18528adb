//! Sidekick relay — exposes the background coordinator to the content script
//! over local HTTP.

pub mod routes;
pub mod state;

pub use routes::build_router;
pub use state::AppState;
