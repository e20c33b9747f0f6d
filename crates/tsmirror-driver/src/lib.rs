//! Tsmirror Build Driver
//!
//! Resolves entry globs, classifies every input as compiled or copied,
//! compiles TypeScript sources with rewritten module references, and
//! mirrors the result into a freshly cleaned output directory.

pub mod artifact;
pub mod build;
pub mod classify;
pub mod context;
pub mod entries;
pub mod error;
pub mod options;
pub mod output;

pub use artifact::Artifact;
pub use build::{build, build_with_context, plan_artifacts, BuildSummary};
pub use classify::{classify, ArtifactKind};
pub use context::BuildContext;
pub use entries::{resolve_entries, ResolvedEntry};
pub use error::{BuildError, BuildResult, OptionsError};
pub use options::{BuildOptions, Location};
pub use output::{clear_output, write_artifacts};
pub use tsmirror_compiler::Platform;
