//! Pass-through vs compile classification

use std::path::Path;

use tsmirror_rewrite::is_declaration;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArtifactKind {
    /// Copied byte-for-byte
    PassThrough,
    /// Compiled to JavaScript with a source map
    Compile,
}

/// Classify a file by name only: declaration files and files ending in one of
/// `exclude` are passed through, everything else is compiled.
pub fn classify(path: &Path, exclude: &[String]) -> ArtifactKind {
    let name = path.to_string_lossy();
    if is_declaration(&name) || exclude.iter().any(|suffix| name.ends_with(suffix.as_str())) {
        ArtifactKind::PassThrough
    } else {
        ArtifactKind::Compile
    }
}
