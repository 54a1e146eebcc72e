pub mod api;
pub mod app;
pub mod config;
pub mod dashboard;
pub mod errors;
pub mod handlers;
pub mod models;
pub mod mood;
pub mod mood_form;
pub mod session;
pub mod state;
pub mod storage;
pub mod ui;

pub use api::ApiClient;
pub use app::router;
pub use config::Config;
pub use session::SessionStore;
pub use state::AppState;
