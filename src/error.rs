use thiserror::Error;

/// Local, non-fatal failures of store operations.
///
/// None of these leave the store half-updated: the operation that produced
/// the error is dropped and the pending queue stays as it was.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GalleryError {
    #[error("error updating the album: no album at `{0}`")]
    StaleAlbum(String),

    #[error("error updating the file: no file named `{0}`")]
    StaleFile(String),

    #[error("invalid token: {0}")]
    MalformedToken(String),
}

/// Failures talking to the gallery backend.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("{method} {path} failed with status {status}")]
    Status {
        method: String,
        path: String,
        status: u16,
    },

    #[error("{method} {path} returned no usable body")]
    EmptyBody { method: String, path: String },

    #[error(transparent)]
    Http(#[from] reqwest::Error),
}
