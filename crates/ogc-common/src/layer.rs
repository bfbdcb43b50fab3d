//! Workspace-qualified GeoServer layer names.

use serde::{Deserialize, Serialize};

/// A GeoServer layer or feature type name, optionally prefixed by its
/// workspace (`"topp:states"`).
///
/// No validation is applied; a malformed name is passed through and
/// surfaces as a server-side error when the request is made.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct QualifiedName {
    pub workspace: Option<String>,
    pub name: String,
}

impl QualifiedName {
    /// Join a workspace and a layer name as `{workspace}:{name}`.
    pub fn new(workspace: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            workspace: Some(workspace.into()),
            name: name.into(),
        }
    }

    /// Parse a compound name like "topp:states". Only the first `:` splits.
    pub fn parse(s: &str) -> Self {
        match s.split_once(':') {
            Some((workspace, name)) => Self::new(workspace, name),
            None => Self {
                workspace: None,
                name: s.to_string(),
            },
        }
    }

    /// [`parse`](Self::parse), then apply `default_workspace` when the name
    /// carries none.
    pub fn parse_with_default(s: &str, default_workspace: Option<&str>) -> Self {
        match (Self::parse(s), default_workspace) {
            (Self { workspace: None, name }, Some(workspace)) => Self::new(workspace, name),
            (parsed, _) => parsed,
        }
    }
}

impl std::fmt::Display for QualifiedName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match &self.workspace {
            Some(workspace) => write!(f, "{}:{}", workspace, self.name),
            None => write!(f, "{}", self.name),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_qualified_display() {
        assert_eq!(QualifiedName::new("ws", "roads").to_string(), "ws:roads");
    }

    #[test]
    fn test_default_workspace_only_for_bare_names() {
        assert_eq!(
            QualifiedName::parse_with_default("roads", Some("city")).to_string(),
            "city:roads"
        );
        assert_eq!(
            QualifiedName::parse_with_default("ws:roads", Some("city")).to_string(),
            "ws:roads"
        );
        assert_eq!(QualifiedName::parse_with_default("roads", None).to_string(), "roads");
    }

    #[test]
    fn test_parse_without_workspace() {
        let name = QualifiedName::parse("roads");
        assert_eq!(name.workspace, None);
        assert_eq!(name.to_string(), "roads");
    }

    #[test]
    fn test_parse_splits_once() {
        let name = QualifiedName::parse("topp:states:extra");
        assert_eq!(name.workspace.as_deref(), Some("topp"));
        assert_eq!(name.name, "states:extra");
    }
}
