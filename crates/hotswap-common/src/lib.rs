// Types shared by the runtime client, the migrator and the binary

pub use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Suffix of the replacement container's name until it takes over.
pub const NEW_CONTAINER_SUFFIX: &str = "_newContainer";
/// Suffix the original container is renamed to once replaced.
pub const OLD_CONTAINER_SUFFIX: &str = "_oldContainer";

#[derive(Error, Debug)]
pub enum SwapError {
    #[error("No such container: {container}: {message}")]
    NotFound { container: String, message: String },

    #[error("No such image: {image}: {message}")]
    ImageNotFound { image: String, message: String },

    #[error("Container name already in use: {name}: {message}")]
    NameConflict { name: String, message: String },

    #[error("No such file in container {container}: {path}: {message}")]
    FileNotFound {
        container: String,
        path: String,
        message: String,
    },

    #[error("Failed to start container {container}: {message}")]
    StartFailed { container: String, message: String },

    #[error("Failed to write {path} into container {container}: {message}")]
    WriteFailed {
        container: String,
        path: String,
        message: String,
    },

    #[error("Container runtime unavailable: {0}")]
    RuntimeUnavailable(String),

    #[error("{operation} failed: {message}")]
    Operation {
        operation: &'static str,
        message: String,
    },

    #[error("Serialization Error: {0}")]
    Serialization(String),
}

pub type Result<T> = std::result::Result<T, SwapError>;

/// Name the replacement is created under while the original still exists.
pub fn new_container_name(name: &str) -> String {
    format!("{name}{NEW_CONTAINER_SUFFIX}")
}

/// Name the original is moved to when the replacement takes over.
pub fn old_container_name(name: &str) -> String {
    format!("{name}{OLD_CONTAINER_SUFFIX}")
}

/// What to carry over and what to do once the swap completes.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MigrationPlan {
    /// Absolute paths copied from the source into the replacement, in order.
    pub copy_files: Vec<String>,
    /// Image for the replacement; the source's image when `None`.
    pub image: Option<String>,
    pub remove_original: bool,
}

impl MigrationPlan {
    pub fn new(copy_files: Vec<String>, image: Option<String>, remove_original: bool) -> Self {
        Self {
            copy_files,
            // an empty override means "keep the image"
            image: image.filter(|i| !i.is_empty()),
            remove_original,
        }
    }
}
