pub mod analysis;
pub mod app;
pub mod config;
pub mod conversation;
pub mod errors;
pub mod handlers;
pub mod journal;
pub mod models;
pub mod session;
pub mod state;
pub mod stats;
pub mod storage;

pub use app::router;
pub use config::Config;
pub use state::AppState;
pub use storage::{StoragePaths, load_session};
