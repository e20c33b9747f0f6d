//! Entry resolution: glob patterns → in-build files

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use glob::{MatchOptions, Pattern};
use tracing::{debug, warn};
use tsmirror_rewrite::normalize_path;

use crate::error::OptionsError;

/// A file selected by the entry patterns.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedEntry {
    /// Path relative to the build root
    pub relative: PathBuf,
    /// Absolute, normalized path
    pub absolute: PathBuf,
}

/// `*` stays within one path segment and dotfiles need an explicit dot,
/// matching how node's `glob` behaves.
const MATCH_OPTIONS: MatchOptions = MatchOptions {
    case_sensitive: true,
    require_literal_separator: true,
    require_literal_leading_dot: true,
};

/// Expand `patterns` under `root`.
///
/// Matches are ordered by pattern, then alphabetically. Directories,
/// duplicates, files under `output`, and files matching an `ignore` pattern
/// are dropped. A pattern that matches nothing only produces a warning.
pub fn resolve_entries(
    root: &Path,
    patterns: &[String],
    ignore: &[String],
    output: &Path,
) -> Result<Vec<ResolvedEntry>, OptionsError> {
    let ignore = ignore
        .iter()
        .map(|pattern| {
            Pattern::new(pattern).map_err(|source| OptionsError::InvalidPattern {
                pattern: pattern.clone(),
                source,
            })
        })
        .collect::<Result<Vec<_>, _>>()?;

    let escaped_root = PathBuf::from(Pattern::escape(&root.to_string_lossy()));
    let mut seen = HashSet::new();
    let mut entries = Vec::new();

    for pattern in patterns {
        let full_pattern = escaped_root.join(pattern);
        let paths = glob::glob_with(&full_pattern.to_string_lossy(), MATCH_OPTIONS).map_err(
            |source| OptionsError::InvalidPattern {
                pattern: pattern.clone(),
                source,
            },
        )?;

        let mut matched = 0usize;
        for path in paths {
            let path = match path {
                Ok(path) => path,
                Err(err) => {
                    warn!(pattern = %pattern, error = %err, "skipping unreadable path");
                    continue;
                }
            };
            if !path.is_file() {
                continue;
            }

            let absolute = normalize_path(&path);
            if absolute.starts_with(output) {
                debug!(path = %absolute.display(), "skipping file inside the output directory");
                continue;
            }
            let Ok(relative) = absolute.strip_prefix(root).map(Path::to_path_buf) else {
                warn!(path = %absolute.display(), "skipping match outside the root directory");
                continue;
            };
            if ignore
                .iter()
                .any(|pattern| pattern.matches_path_with(&relative, MATCH_OPTIONS))
            {
                continue;
            }

            matched += 1;
            if seen.insert(relative.clone()) {
                entries.push(ResolvedEntry { relative, absolute });
            }
        }

        if matched == 0 {
            warn!(pattern = %pattern, root = %root.display(), "entry pattern matched no files");
        }
    }

    Ok(entries)
}
