//! Immutable per-build state derived from [`BuildOptions`]

use std::path::{Path, PathBuf};

use tsmirror_compiler::Platform;
use tsmirror_rewrite::{with_runtime_suffix, InclusionSet, DEFAULT_RUNTIME_EXT};

use crate::entries::{resolve_entries, ResolvedEntry};
use crate::error::OptionsError;
use crate::options::BuildOptions;

/// Validated build configuration, constructed once and shared read-only by
/// every stage.
#[derive(Debug, Clone)]
pub struct BuildContext {
    root: PathBuf,
    output: PathBuf,
    entries: Vec<ResolvedEntry>,
    inclusion: InclusionSet,
    platform: Platform,
    exclude: Vec<String>,
    ext: String,
}

impl BuildContext {
    /// Validate `options` and resolve the entry list. Nothing is written.
    pub fn from_options(options: &BuildOptions) -> Result<Self, OptionsError> {
        let ext = options
            .ext
            .clone()
            .unwrap_or_else(|| DEFAULT_RUNTIME_EXT.to_string());
        if !ext.starts_with('.') || ext.len() < 2 || ext.contains(|c: char| c == '/' || c == '\\') {
            return Err(OptionsError::InvalidExtension(ext));
        }
        if options.exclude.iter().any(String::is_empty) {
            return Err(OptionsError::EmptyExclusion);
        }

        let root = options.root.to_absolute()?;
        let output = options.output.to_absolute()?;

        if !root.exists() {
            return Err(OptionsError::MissingRoot(root));
        }
        if !root.is_dir() {
            return Err(OptionsError::RootNotDirectory(root));
        }
        // the output directory is wiped; it must never hold the sources
        if root.starts_with(&output) {
            return Err(OptionsError::OutputContainsRoot { root, output });
        }

        let entries = resolve_entries(&root, &options.entries, &options.ignore, &output)?;
        let inclusion = entries.iter().map(|e| e.absolute.clone()).collect();

        Ok(Self {
            root,
            output,
            entries,
            inclusion,
            platform: options.platform,
            exclude: options.exclude.clone(),
            ext,
        })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn output(&self) -> &Path {
        &self.output
    }

    pub fn entries(&self) -> &[ResolvedEntry] {
        &self.entries
    }

    pub fn inclusion(&self) -> &InclusionSet {
        &self.inclusion
    }

    pub fn platform(&self) -> Platform {
        self.platform
    }

    pub fn exclude(&self) -> &[String] {
        &self.exclude
    }

    pub fn ext(&self) -> &str {
        &self.ext
    }

    /// Output-relative path of a compiled source.
    pub fn compiled_name(&self, relative: &Path) -> PathBuf {
        match with_runtime_suffix(&relative.to_string_lossy(), &self.ext) {
            Some(renamed) => PathBuf::from(renamed),
            None => relative.to_path_buf(),
        }
    }
}
