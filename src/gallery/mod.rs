pub mod mapper;
pub mod paths;
pub mod projection;
pub mod reconcile;
pub mod sort;
pub mod types;

pub use projection::albums_with_files_to_show;
pub use reconcile::{apply_changes, Effective};
pub use types::*;
