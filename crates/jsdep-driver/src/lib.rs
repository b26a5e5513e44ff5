//! jsdep driver library
//!
//! Configuration, the compile step and the build pipeline behind the
//! `jsdep` command.

pub mod build;
pub mod config;
pub mod error;
pub mod processor;
pub mod report;

pub use build::{build, clean, manifests, processor_for, resolve, Artifact};
pub use config::{BuildConfig, CompilerCommand, ConfigError, DEFAULT_REMOTE_SYMBOL};
pub use error::{DriverError, Result};
pub use processor::{CommandProcessor, ConcatProcessor, ProcessOutput, Processor};
pub use report::report;
