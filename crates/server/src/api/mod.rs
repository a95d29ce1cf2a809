pub mod handlers;
pub mod routes;
pub mod session;
pub mod ws;

pub use routes::create_router;
