//! Error types for the build driver

use std::io;
use std::path::PathBuf;

use thiserror::Error;
use tsmirror_compiler::CompileError;

/// Problems with the build configuration. All of them are detected before
/// the output directory is touched.
#[derive(Debug, Error)]
pub enum OptionsError {
    #[error("invalid location `{value}`: {source}")]
    InvalidLocation {
        value: String,
        #[source]
        source: url::ParseError,
    },

    #[error("`{0}` is not a local file URL")]
    NotAFileUrl(String),

    #[error("cannot resolve `{}` to an absolute path: {source}", path.display())]
    Absolute {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("root directory `{}` does not exist", .0.display())]
    MissingRoot(PathBuf),

    #[error("root `{}` is not a directory", .0.display())]
    RootNotDirectory(PathBuf),

    #[error("output `{}` must not be or contain the root `{}`", output.display(), root.display())]
    OutputContainsRoot { root: PathBuf, output: PathBuf },

    #[error("invalid output extension `{0}`: expected a suffix such as `.js`")]
    InvalidExtension(String),

    #[error("exclusion suffixes must not be empty")]
    EmptyExclusion,

    #[error("invalid glob pattern `{pattern}`: {source}")]
    InvalidPattern {
        pattern: String,
        #[source]
        source: glob::PatternError,
    },

    #[error("failed to read config {}: {source}", path.display())]
    ReadConfig {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to parse config {}: {source}", path.display())]
    ParseConfig {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

#[derive(Debug, Error)]
pub enum BuildError {
    #[error(transparent)]
    Options(#[from] OptionsError),

    #[error(transparent)]
    Compile(#[from] CompileError),

    #[error("`{}` and `{}` both produce `{}`", first.display(), second.display(), output.display())]
    OutputCollision {
        output: PathBuf,
        first: PathBuf,
        second: PathBuf,
    },

    #[error("failed to clean output directory {}: {source}", path.display())]
    Clean {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to create directory {}: {source}", path.display())]
    CreateDir {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to write {}: {source}", path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to copy {} to {}: {source}", from.display(), to.display())]
    Copy {
        from: PathBuf,
        to: PathBuf,
        #[source]
        source: io::Error,
    },
}

pub type BuildResult<T> = Result<T, BuildError>;
