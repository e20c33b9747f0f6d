//! Output directory reconciliation

use std::fs;
use std::io;
use std::path::Path;

use tracing::info;

use crate::artifact::{with_map_suffix, Artifact};
use crate::error::{BuildError, BuildResult};

/// Remove `dir` and everything below it. A missing directory is already clean.
pub fn clear_output(dir: &Path) -> BuildResult<()> {
    match fs::remove_dir_all(dir) {
        Ok(()) => Ok(()),
        Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(()),
        Err(source) => Err(BuildError::Clean {
            path: dir.to_path_buf(),
            source,
        }),
    }
}

/// Write every artifact below `output`, recreating the directory tree.
pub fn write_artifacts(output: &Path, artifacts: &[Artifact]) -> BuildResult<()> {
    for artifact in artifacts {
        let target = output.join(&artifact.path);

        if let Some(parent) = target.parent() {
            fs::create_dir_all(parent).map_err(|source| BuildError::CreateDir {
                path: parent.to_path_buf(),
                source,
            })?;
        }

        info!("Emitting: {}", artifact.path.display());
        match &artifact.contents {
            Some(contents) => fs::write(&target, contents).map_err(|source| BuildError::Write {
                path: target.clone(),
                source,
            })?,
            None => {
                fs::copy(&artifact.source, &target).map_err(|source| BuildError::Copy {
                    from: artifact.source.clone(),
                    to: target.clone(),
                    source,
                })?;
            }
        }

        if let Some(map) = &artifact.source_map {
            let map_target = with_map_suffix(&target);
            info!("Emitting: {}", with_map_suffix(&artifact.path).display());
            fs::write(&map_target, map).map_err(|source| BuildError::Write {
                path: map_target.clone(),
                source,
            })?;
        }
    }

    Ok(())
}
