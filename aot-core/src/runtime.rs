//! Target runtime of a generation run.

use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};

/// The deployment runtime a generation run targets.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Deserialize, Serialize)]
#[serde(rename_all = "lowercase", try_from = "String")]
pub enum Runtime {
    /// A regular process that still loads code dynamically.
    #[default]
    Jit,
    /// A natively compiled image where every decision must be made at build time.
    Native,
}

impl Runtime {
    /// Returns the runtime identifier as a static string.
    pub fn as_str(&self) -> &'static str {
        match self {
            Runtime::Jit => "jit",
            Runtime::Native => "native",
        }
    }
}

impl fmt::Display for Runtime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for Runtime {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "jit" => Ok(Runtime::Jit),
            "native" => Ok(Runtime::Native),
            _ => Err(format!(
                "unknown runtime '{}', expected 'jit' or 'native'",
                s
            )),
        }
    }
}

impl TryFrom<String> for Runtime {
    type Error = String;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        s.parse()
    }
}
