//! Tsmirror Compile Pipeline
//!
//! Turns one TypeScript module into JavaScript plus a source map:
//! parse with swc, rewrite in-build module references, then emit with the
//! module format the target platform needs.

mod compiler;
mod error;
mod platform;

pub use compiler::{source_map_origin, CompileRequest, CompiledModule, ModuleCompiler};
pub use error::{CompileError, CompileResult, ParseDiagnostic};
pub use platform::{Platform, UnknownPlatform};
