//! Target platform and the module format it implies

use std::fmt;
use std::str::FromStr;

use serde::Deserialize;
use thiserror::Error;

/// Runtime the emitted modules are meant for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Platform {
    /// Node.js: ES modules, with `import x = require()` lowered through `createRequire`
    #[default]
    Node,
    /// Any ES module host
    Neutral,
}

impl Platform {
    /// Module type understood by the swc code generator.
    pub fn module_type(self) -> &'static str {
        match self {
            Platform::Node => "nodenext",
            Platform::Neutral => "es6",
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Platform::Node => "node",
            Platform::Neutral => "neutral",
        }
    }
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown platform `{0}` (expected `node` or `neutral`)")]
pub struct UnknownPlatform(pub String);

impl FromStr for Platform {
    type Err = UnknownPlatform;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "node" => Ok(Platform::Node),
            "neutral" => Ok(Platform::Neutral),
            other => Err(UnknownPlatform(other.to_string())),
        }
    }
}
