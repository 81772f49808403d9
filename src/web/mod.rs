/// HTML rendering.
pub mod page;

/// Routing and form handling.
pub mod routes;

/// `tiny_http` listener and workers.
pub mod server;

pub use routes::{handle, Reply};
pub use server::run_server;
