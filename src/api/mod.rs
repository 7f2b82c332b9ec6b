pub mod server;

pub use server::{AppState, ApplyDatabaseRequest, router};
