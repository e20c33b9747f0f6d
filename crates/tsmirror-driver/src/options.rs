//! Build options as supplied by a caller or a JSON config file

use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use serde::Deserialize;
use tsmirror_compiler::Platform;
use tsmirror_rewrite::normalize_path;
use url::Url;

use crate::error::OptionsError;

/// A directory given either as a filesystem path or as a `file://` URL.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(try_from = "String")]
pub enum Location {
    Path(PathBuf),
    Url(Url),
}

impl Location {
    pub fn parse(value: &str) -> Result<Self, OptionsError> {
        if value.starts_with("file:") {
            Url::parse(value)
                .map(Location::Url)
                .map_err(|source| OptionsError::InvalidLocation {
                    value: value.to_string(),
                    source,
                })
        } else {
            Ok(Location::Path(PathBuf::from(value)))
        }
    }

    /// Absolute, lexically normalized form. Relative paths are resolved
    /// against the current directory.
    pub fn to_absolute(&self) -> Result<PathBuf, OptionsError> {
        let path = match self {
            Location::Path(path) => {
                std::path::absolute(path).map_err(|source| OptionsError::Absolute {
                    path: path.clone(),
                    source,
                })?
            }
            Location::Url(url) => url
                .to_file_path()
                .map_err(|()| OptionsError::NotAFileUrl(url.to_string()))?,
        };
        Ok(normalize_path(&path))
    }

    /// Resolve a relative path against `base`; URLs and absolute paths are
    /// returned unchanged.
    pub fn rebase(self, base: &Path) -> Self {
        match self {
            Location::Path(path) if path.is_relative() => Location::Path(base.join(path)),
            other => other,
        }
    }
}

impl FromStr for Location {
    type Err = OptionsError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Location::parse(s)
    }
}

impl TryFrom<String> for Location {
    type Error = OptionsError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Location::parse(&value)
    }
}

impl From<PathBuf> for Location {
    fn from(path: PathBuf) -> Self {
        Location::Path(path)
    }
}

impl From<&Path> for Location {
    fn from(path: &Path) -> Self {
        Location::Path(path.to_path_buf())
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Location::Path(path) => write!(f, "{}", path.display()),
            Location::Url(url) => write!(f, "{url}"),
        }
    }
}

fn default_root() -> Location {
    Location::Path(PathBuf::from("."))
}

fn default_output() -> Location {
    Location::Path(PathBuf::from("./dist"))
}

/// Options for a single build.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct BuildOptions {
    /// Directory entry patterns are matched against
    #[serde(default = "default_root")]
    pub root: Location,
    /// Destination directory; wiped at the start of every build
    #[serde(default = "default_output")]
    pub output: Location,
    /// Glob patterns selecting the input files
    #[serde(default)]
    pub entries: Vec<String>,
    #[serde(default)]
    pub platform: Platform,
    /// Extra suffixes copied verbatim instead of compiled
    #[serde(default)]
    pub exclude: Vec<String>,
    /// Output suffix for `.ts` sources, `.js` when unset
    #[serde(default)]
    pub ext: Option<String>,
    /// Glob patterns removed from the entry matches
    #[serde(default)]
    pub ignore: Vec<String>,
}

impl Default for BuildOptions {
    fn default() -> Self {
        Self {
            root: default_root(),
            output: default_output(),
            entries: Vec::new(),
            platform: Platform::default(),
            exclude: Vec::new(),
            ext: None,
            ignore: Vec::new(),
        }
    }
}

impl BuildOptions {
    pub fn new(root: impl Into<Location>, output: impl Into<Location>) -> Self {
        Self {
            root: root.into(),
            output: output.into(),
            ..Self::default()
        }
    }

    pub fn with_entries<I, S>(mut self, entries: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.entries = entries.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_platform(mut self, platform: Platform) -> Self {
        self.platform = platform;
        self
    }

    pub fn with_exclude<I, S>(mut self, exclude: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.exclude = exclude.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_ext(mut self, ext: impl Into<String>) -> Self {
        self.ext = Some(ext.into());
        self
    }

    pub fn with_ignore<I, S>(mut self, ignore: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.ignore = ignore.into_iter().map(Into::into).collect();
        self
    }

    /// Load options from a JSON file. Relative `root` and `output` paths are
    /// taken relative to the file's directory.
    pub fn from_json_file(path: &Path) -> Result<Self, OptionsError> {
        let content = fs::read_to_string(path).map_err(|source| OptionsError::ReadConfig {
            path: path.to_path_buf(),
            source,
        })?;
        let options: BuildOptions =
            serde_json::from_str(&content).map_err(|source| OptionsError::ParseConfig {
                path: path.to_path_buf(),
                source,
            })?;

        let base = path.parent().unwrap_or_else(|| Path::new(""));
        Ok(Self {
            root: options.root.rebase(base),
            output: options.output.rebase(base),
            ..options
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_location_parse() {
        assert_eq!(
            Location::parse("./src").unwrap(),
            Location::Path(PathBuf::from("./src"))
        );
        assert!(matches!(
            Location::parse("file:///tmp/project").unwrap(),
            Location::Url(_)
        ));
        assert!(matches!(
            Location::parse("file://["),
            Err(OptionsError::InvalidLocation { .. })
        ));
    }

    #[cfg(unix)]
    #[test]
    fn test_location_to_absolute() {
        let url = Location::parse("file:///tmp/project/./src/../lib").unwrap();
        assert_eq!(url.to_absolute().unwrap(), PathBuf::from("/tmp/project/lib"));

        let path = Location::from(PathBuf::from("/tmp/a/../b"));
        assert_eq!(path.to_absolute().unwrap(), PathBuf::from("/tmp/b"));

        let relative = Location::from(PathBuf::from("dist"));
        assert!(relative.to_absolute().unwrap().is_absolute());
    }

    #[test]
    fn test_non_file_url_is_rejected() {
        let url = Location::Url(Url::parse("https://example.com/src").unwrap());
        assert!(matches!(url.to_absolute(), Err(OptionsError::NotAFileUrl(_))));
    }

    #[test]
    fn test_deserialize_defaults() {
        let options: BuildOptions = serde_json::from_str(r#"{ "entries": ["src/**/*.ts"] }"#).unwrap();
        assert_eq!(options.root, default_root());
        assert_eq!(options.output, default_output());
        assert_eq!(options.entries, vec!["src/**/*.ts"]);
        assert_eq!(options.platform, Platform::Node);
        assert_eq!(options.ext, None);
    }

    #[test]
    fn test_deserialize_full() {
        let options: BuildOptions = serde_json::from_str(
            r#"{
                "root": "file:///srv/app",
                "output": "out",
                "entries": ["**/*.ts"],
                "platform": "neutral",
                "exclude": [".gen.ts"],
                "ext": ".mjs",
                "ignore": ["**/*.test.ts"]
            }"#,
        )
        .unwrap();
        assert!(matches!(options.root, Location::Url(_)));
        assert_eq!(options.platform, Platform::Neutral);
        assert_eq!(options.exclude, vec![".gen.ts"]);
        assert_eq!(options.ext.as_deref(), Some(".mjs"));
        assert_eq!(options.ignore, vec!["**/*.test.ts"]);
    }

    #[test]
    fn test_deserialize_rejects_bad_values() {
        assert!(serde_json::from_str::<BuildOptions>(r#"{ "platform": "browser" }"#).is_err());
        assert!(serde_json::from_str::<BuildOptions>(r#"{ "outDir": "x" }"#).is_err());
    }

    #[test]
    fn test_from_json_file_rebases_relative_paths() {
        let dir = tempfile::tempdir().unwrap();
        let config = dir.path().join("tsmirror.json");
        fs::write(&config, r#"{ "root": "src", "output": "file:///tmp/out" }"#).unwrap();

        let options = BuildOptions::from_json_file(&config).unwrap();
        assert_eq!(options.root, Location::Path(dir.path().join("src")));
        assert!(matches!(options.output, Location::Url(_)));
    }

    #[test]
    fn test_from_json_file_errors() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("missing.json");
        assert!(matches!(
            BuildOptions::from_json_file(&missing),
            Err(OptionsError::ReadConfig { .. })
        ));

        let broken = dir.path().join("broken.json");
        fs::write(&broken, "{ entries: }").unwrap();
        assert!(matches!(
            BuildOptions::from_json_file(&broken),
            Err(OptionsError::ParseConfig { .. })
        ));
    }
}
