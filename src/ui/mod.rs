//! User Interface module
//!
//! Terminal frontend using ratatui. Reads engine snapshots and feeds input.

pub mod app;
pub mod messages;

pub use app::App;
pub use messages::MessageLog;
