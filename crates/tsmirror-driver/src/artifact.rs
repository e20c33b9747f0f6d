//! Output units computed by a build

use std::path::{Path, PathBuf};

use tsmirror_compiler::CompiledModule;

use crate::entries::ResolvedEntry;

/// One file to be written under the output directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Artifact {
    /// Path relative to the output directory
    pub path: PathBuf,
    /// Absolute path of the input file
    pub source: PathBuf,
    /// Compiled code; `None` means the source is copied verbatim
    pub contents: Option<String>,
    pub source_map: Option<String>,
}

impl Artifact {
    /// A file copied under its original name.
    pub fn pass_through(entry: &ResolvedEntry) -> Self {
        Self {
            path: entry.relative.clone(),
            source: entry.absolute.clone(),
            contents: None,
            source_map: None,
        }
    }

    pub fn compiled(path: PathBuf, source: &Path, module: CompiledModule) -> Self {
        Self {
            path,
            source: source.to_path_buf(),
            contents: Some(module.code),
            source_map: module.source_map,
        }
    }

    pub fn is_compiled(&self) -> bool {
        self.contents.is_some()
    }

    /// Output-relative path of the accompanying source map.
    pub fn map_path(&self) -> Option<PathBuf> {
        self.source_map.as_ref().map(|_| with_map_suffix(&self.path))
    }
}

/// `a.js` → `a.js.map`
pub(crate) fn with_map_suffix(path: &Path) -> PathBuf {
    let mut name = path.as_os_str().to_owned();
    name.push(".map");
    PathBuf::from(name)
}
