pub mod actions;
pub mod health;
pub mod resources;
pub mod routes;

pub use routes::{create_router, RouterOptions};
