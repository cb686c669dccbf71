// file: src/gateway/mod.rs
// description: forwarding gateway HTTP surface and lifecycle
// reference: internal module structure

pub mod dispatcher;
pub mod forwarding;
pub mod handlers;
pub mod router;
pub mod server;
pub mod state;

pub use dispatcher::{BackgroundDispatcher, IndexJob};
pub use router::build_router;
pub use server::{Gateway, run_server};
pub use state::AppState;
