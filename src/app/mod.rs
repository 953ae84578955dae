pub mod changes;
pub mod cli;
pub mod commands;
pub mod config;
pub mod lock;
pub mod logging;
pub mod session;
pub mod state;

pub use session::{LoadOutcome, Session};
pub use state::GalleryStore;
