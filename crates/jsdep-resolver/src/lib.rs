//! # jsdep resolver
//!
//! Turns an entry script into an ordered [`DependencySetCollection`]:
//! one [`DependencySet`] per package root, deepest package first and the
//! entry root last. Within a set every script follows the scripts it
//! requires, and the root itself comes last.
//!
//! ```text
//! entry.js ──▶ DependencyResolver ──▶ DependencySetCollection
//!                                         │
//!                                         ▼
//!                               ManifestContentsGenerator
//!                                         │
//!                                         ▼
//!                          sets with manifests spliced in
//! ```
//!
//! ```
//! use jsdep_files::MemoryFileAccess;
//! use jsdep_resolver::DependencyResolver;
//!
//! let files = MemoryFileAccess::new()
//!     .with_file("main.js", "// @require util.js\n")
//!     .with_file("util.js", "");
//!
//! let collection = DependencyResolver::new(files).resolve("main.js")?;
//! let order: Vec<_> = collection.peek_root().unwrap().dependency_paths().collect();
//! assert_eq!(order, ["util.js", "main.js"].map(std::path::Path::new));
//! # Ok::<(), jsdep_resolver::Error>(())
//! ```

pub mod collection;
pub mod dependency_set;
pub mod error;
pub mod manifest;
pub mod remote;
pub mod resolver;
pub mod source_file;

pub use collection::DependencySetCollection;
pub use dependency_set::{Dependency, DependencySet};
pub use error::{Error, ErrorKind, Result};
pub use manifest::ManifestContentsGenerator;
pub use remote::RemoteConfig;
pub use resolver::{DependencyResolver, Resolved};
pub use source_file::SourceFile;
