//! Resolution of a host script path to the runtime that executes it.

use serde::Deserialize;
use std::path::Path;

/// The closed set of script kinds a tool host can be written in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HostKind {
    Python,
    Node,
}

impl HostKind {
    /// Pick the host kind from the file suffix, or `None` if unsupported.
    pub fn from_path(path: impl AsRef<Path>) -> Option<Self> {
        match path.as_ref().extension()?.to_str()? {
            "py" => Some(Self::Python),
            "js" => Some(Self::Node),
            _ => None,
        }
    }
}

/// Interpreter commands used to launch each host kind.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct HostCommands {
    pub python: String,
    pub node: String,
}

impl Default for HostCommands {
    fn default() -> Self {
        Self {
            python: "python".to_string(),
            node: "node".to_string(),
        }
    }
}

impl HostCommands {
    /// Interpreter for the given kind.
    pub fn program(&self, kind: HostKind) -> &str {
        match kind {
            HostKind::Python => &self.python,
            HostKind::Node => &self.node,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn supported_suffixes() {
        assert_eq!(HostKind::from_path("weather.py"), Some(HostKind::Python));
        assert_eq!(HostKind::from_path("/srv/tools/build/index.js"), Some(HostKind::Node));
    }

    #[test]
    fn unsupported_suffixes() {
        for path in ["server.rb", "server", "server.py.bak", "server.PY", ".py", "dir/"] {
            assert_eq!(HostKind::from_path(path), None, "{path}");
        }
    }

    #[test]
    fn program_follows_kind() {
        let commands = HostCommands {
            python: "python3".into(),
            ..HostCommands::default()
        };
        assert_eq!(commands.program(HostKind::Python), "python3");
        assert_eq!(commands.program(HostKind::Node), "node");
    }
}
