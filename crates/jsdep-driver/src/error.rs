use std::io;
use std::path::PathBuf;

use jsdep_files::FindError;
use jsdep_resolver::ErrorKind;
use thiserror::Error;

use crate::config::ConfigError;

#[derive(Debug, Error)]
pub enum DriverError {
    #[error(transparent)]
    Resolve(#[from] jsdep_resolver::Error),

    #[error("invalid configuration: {0}")]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Find(#[from] FindError),

    /// The compile step for `root` could not be started.
    #[error("cannot compile {}: {source}", .root.display())]
    Process {
        root: PathBuf,
        #[source]
        source: io::Error,
    },
}

impl DriverError {
    /// Process exit status for this failure.
    pub fn exit_code(&self) -> u8 {
        match self {
            DriverError::Resolve(e) => match e.kind() {
                ErrorKind::MissingFile => 2,
                ErrorKind::Recursion => 3,
                ErrorKind::Parsing => 4,
                ErrorKind::CannotWrite => 5,
            },
            _ => 1,
        }
    }
}

pub type Result<T> = std::result::Result<T, DriverError>;
