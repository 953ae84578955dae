pub mod api;
pub mod app;
pub mod error;
pub mod gallery;
pub mod ui;
