//! Module specifier classification and path helpers

use std::collections::HashSet;
use std::path::{Component, Path, PathBuf};

/// Suffixes of type-only declaration files. These are copied, never compiled,
/// and references to them are never rewritten.
pub const DECLARATION_SUFFIXES: [&str; 3] = [".d.ts", ".d.cts", ".d.mts"];

/// Output suffix used for `.ts` sources when no override is configured.
pub const DEFAULT_RUNTIME_EXT: &str = ".js";

/// Whether a specifier points at a file path rather than a package.
pub fn is_relative(specifier: &str) -> bool {
    specifier.starts_with('.') || specifier.starts_with('/')
}

/// Whether a specifier or file name refers to a declaration file.
pub fn is_declaration(name: &str) -> bool {
    DECLARATION_SUFFIXES
        .iter()
        .any(|suffix| name.ends_with(suffix))
}

/// Replace the TypeScript suffix of `name` with its runtime counterpart.
///
/// `.ts` becomes `ext`, `.mts` becomes `.mjs` and `.cts` becomes `.cjs`.
/// Returns `None` for declaration files and for names without a TypeScript
/// suffix.
pub fn with_runtime_suffix(name: &str, ext: &str) -> Option<String> {
    if is_declaration(name) {
        return None;
    }

    if let Some(stem) = name.strip_suffix(".mts") {
        Some(format!("{stem}.mjs"))
    } else if let Some(stem) = name.strip_suffix(".cts") {
        Some(format!("{stem}.cjs"))
    } else {
        name.strip_suffix(".ts").map(|stem| format!("{stem}{ext}"))
    }
}

/// Lexically normalize a path: drop `.` segments and fold `..` into the
/// preceding segment. The filesystem is never consulted, so symlinks are
/// not followed.
pub fn normalize_path(path: &Path) -> PathBuf {
    let mut normalized = PathBuf::new();

    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => match normalized.components().next_back() {
                Some(Component::Normal(_)) => {
                    normalized.pop();
                }
                // `/..` is `/`
                Some(Component::RootDir) | Some(Component::Prefix(_)) => {}
                _ => normalized.push(".."),
            },
            other => normalized.push(other.as_os_str()),
        }
    }

    normalized
}

/// Absolute paths of every file taking part in a build.
///
/// Membership decides whether a relative reference is rewritten.
#[derive(Debug, Clone, Default)]
pub struct InclusionSet {
    files: HashSet<PathBuf>,
}

impl InclusionSet {
    /// Create an inclusion set; every path is normalized on insertion.
    pub fn new<I>(files: I) -> Self
    where
        I: IntoIterator<Item = PathBuf>,
    {
        Self {
            files: files.into_iter().map(|f| normalize_path(&f)).collect(),
        }
    }

    pub fn contains(&self, path: &Path) -> bool {
        self.files.contains(&normalize_path(path))
    }

    /// Whether `specifier`, written inside `from_file`, resolves to a member.
    pub fn resolves(&self, specifier: &str, from_file: &Path) -> bool {
        let from_dir = from_file.parent().unwrap_or_else(|| Path::new(""));
        self.contains(&from_dir.join(specifier))
    }

    pub fn len(&self) -> usize {
        self.files.len()
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }
}

impl FromIterator<PathBuf> for InclusionSet {
    fn from_iter<I: IntoIterator<Item = PathBuf>>(iter: I) -> Self {
        Self::new(iter)
    }
}
