//! Tsmirror Reference Rewriter
//!
//! Finds the static and dynamic module references of a parsed TypeScript
//! module and rewrites the relative ones that point at files of the same
//! build, so they still resolve once `.ts` sources have become `.js`.

pub mod rewriter;
pub mod specifier;

pub use rewriter::{rewrite_module, ModuleReference, ReferenceKind, ReferenceRewriter};
pub use specifier::{
    is_declaration, is_relative, normalize_path, with_runtime_suffix, InclusionSet,
    DECLARATION_SUFFIXES, DEFAULT_RUNTIME_EXT,
};
