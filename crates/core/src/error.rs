use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Fatal failures of a build. Soft parse gaps never surface here; they degrade
/// to empty fields in the model instead.
#[derive(Debug, Error)]
pub enum Error {
    #[error("failed to read {}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to write {}", path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("template not found: {}", .0.display())]
    TemplateNotFound(PathBuf),

    #[error("invalid JSON config at {}", path.display())]
    InvalidConfig {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("config at {} must be a JSON object", .0.display())]
    ConfigNotObject(PathBuf),

    #[error("could not parse resume name; expected a first heading like '# First Last'")]
    MissingName,

    #[error("input must be a Markdown file (.md or .markdown): {}", .0.display())]
    NotMarkdown(PathBuf),

    #[error("failed to serialize document")]
    Serialize(#[from] serde_json::Error),

    #[error(transparent)]
    Io(#[from] io::Error),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
