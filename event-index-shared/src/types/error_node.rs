//! Error node types for the event data bag.
//!
//! An error is a singly linked chain of causes: each node may point at one
//! `inner` node of the same shape. Producers guarantee the chain is acyclic.

use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};

use super::known_keys;

/// One link of an error-cause chain.
///
/// Used for both the full error (`@error`) and the reduced simple error
/// (`@simple_error`) representations. All fields are optional; the
/// flattening transform skips whatever a node does not carry.
///
/// Dropping a chain is iterative, so chains of any length are safe to build
/// and discard. Serde (de)serialization recurses per node, and `serde_json`
/// refuses input nested deeper than 128 levels, so chains longer than about
/// 125 nodes do not round-trip through JSON text.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct ErrorNode {
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub type_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,
    #[serde(default, skip_serializing_if = "Map::is_empty")]
    pub data: Map<String, Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub inner: Option<Box<ErrorNode>>,
}

impl ErrorNode {
    /// Create an empty node.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_type(mut self, type_name: impl Into<String>) -> Self {
        self.type_name = Some(type_name.into());
        self
    }

    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }

    pub fn with_code(mut self, code: impl Into<String>) -> Self {
        self.code = Some(code.into());
        self
    }

    /// Attach the cause of this error.
    pub fn with_inner(mut self, inner: ErrorNode) -> Self {
        self.inner = Some(Box::new(inner));
        self
    }

    /// Record the target site of the exception under `data.@target`.
    ///
    /// `method` is only meaningful for full errors; simple errors carry the
    /// exception type alone.
    pub fn with_target(mut self, exception_type: impl Into<String>, method: Option<&str>) -> Self {
        let mut target = json!({ "ExceptionType": exception_type.into() });
        if let Some(method) = method {
            target["Method"] = json!(method);
        }
        self.data
            .insert(known_keys::error::TARGET_INFO.to_string(), target);
        self
    }

    /// Number of nodes in the chain starting at this node.
    pub fn depth(&self) -> usize {
        let mut depth = 0;
        let mut current = Some(self);
        while let Some(node) = current {
            depth += 1;
            current = node.inner.as_deref();
        }
        depth
    }
}

impl Drop for ErrorNode {
    fn drop(&mut self) {
        let mut next = self.inner.take();
        while let Some(mut node) = next {
            next = node.inner.take();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_serializes_type_key() {
        let node = ErrorNode::new()
            .with_type("System.InvalidOperationException")
            .with_message("boom");

        let value = serde_json::to_value(&node).unwrap();

        assert_eq!(value["type"], "System.InvalidOperationException");
        assert_eq!(value["message"], "boom");
        assert!(value.get("code").is_none());
        assert!(value.get("inner").is_none());
        assert!(value.get("data").is_none());
    }

    #[test]
    fn test_inner_chain_serialization() {
        let node = ErrorNode::new()
            .with_type("Outer")
            .with_inner(ErrorNode::new().with_type("Inner").with_code("42"));

        let value = serde_json::to_value(&node).unwrap();

        assert_eq!(value["inner"]["type"], "Inner");
        assert_eq!(value["inner"]["code"], "42");
    }

    #[test]
    fn test_depth() {
        let node = ErrorNode::new()
            .with_type("A")
            .with_inner(ErrorNode::new().with_inner(ErrorNode::new().with_code("c3")));

        assert_eq!(node.depth(), 3);
        assert_eq!(ErrorNode::new().depth(), 1);
    }

    #[test]
    fn test_drop_long_chain() {
        let mut node = ErrorNode::new().with_type("Root");
        for i in 0..100_000 {
            node = ErrorNode::new().with_code(i.to_string()).with_inner(node);
        }

        assert_eq!(node.depth(), 100_001);
        drop(node);
    }

    #[test]
    fn test_with_target() {
        let node = ErrorNode::new().with_target("System.Exception", Some("DoWork"));
        assert_eq!(node.data["@target"]["ExceptionType"], "System.Exception");
        assert_eq!(node.data["@target"]["Method"], "DoWork");

        let simple = ErrorNode::new().with_target("System.Exception", None);
        assert!(simple.data["@target"].get("Method").is_none());
    }

    #[test]
    fn test_deserialize_missing_fields() {
        let node: ErrorNode = serde_json::from_str(r#"{"message":"only a message"}"#).unwrap();

        assert!(node.type_name.is_none());
        assert_eq!(node.message.as_deref(), Some("only a message"));
        assert!(node.inner.is_none());
    }
}
