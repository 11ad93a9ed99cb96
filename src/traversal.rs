//! Depth-first traversal of an XSD document
//!
//! The driver owns the walk; a [`Visitor`] owns what happens at each node.
//! Every `enter_state` is paired with an `exit_state`, even when the
//! visitor or a descendant fails, so a visitor's stack is balanced again
//! once the error reaches the caller.

use crate::documents::{Element, XsdDocument};
use crate::error::Result;
use crate::jsonschema::SchemaRef;
use crate::limits::Limits;

/// Per-node callbacks driven by [`DepthFirstTraversal`]
pub trait Visitor {
    /// Called once before the root element is entered
    fn on_begin(&mut self, _json_schema: &SchemaRef, _xsd: &XsdDocument) -> Result<()> {
        Ok(())
    }

    /// Push state for `node`
    fn enter_state(&mut self, node: &Element);

    /// Handle `node`; `Ok(false)` prunes its children
    fn visit(&mut self, node: &Element, json_schema: &SchemaRef, xsd: &XsdDocument)
        -> Result<bool>;

    /// Pop the state pushed by the matching `enter_state`
    fn exit_state(&mut self) -> Result<()>;

    /// Called once after a successful walk
    fn on_end(&mut self, _json_schema: &SchemaRef, _xsd: &XsdDocument) -> Result<()> {
        Ok(())
    }
}

/// Walks element children in document order; text and comments are skipped
#[derive(Debug, Clone, Default)]
pub struct DepthFirstTraversal {
    limits: Limits,
}

impl DepthFirstTraversal {
    /// A driver with default limits
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the limits
    pub fn with_limits(mut self, limits: Limits) -> Self {
        self.limits = limits;
        self
    }

    /// Walk `xsd` from its root element
    pub fn traverse<V: Visitor + ?Sized>(
        &self,
        visitor: &mut V,
        json_schema: &SchemaRef,
        xsd: &XsdDocument,
    ) -> Result<()> {
        tracing::debug!(document = %xsd.uri, "traversal started");
        visitor.on_begin(json_schema, xsd)?;
        self.walk(visitor, &xsd.root, json_schema, xsd, 0)?;
        visitor.on_end(json_schema, xsd)
    }

    fn walk<V: Visitor + ?Sized>(
        &self,
        visitor: &mut V,
        node: &Element,
        json_schema: &SchemaRef,
        xsd: &XsdDocument,
        depth: usize,
    ) -> Result<()> {
        self.limits.check_depth(depth)?;
        visitor.enter_state(node);
        let result = self.descend(visitor, node, json_schema, xsd, depth);
        let exited = visitor.exit_state();
        result.and(exited)
    }

    fn descend<V: Visitor + ?Sized>(
        &self,
        visitor: &mut V,
        node: &Element,
        json_schema: &SchemaRef,
        xsd: &XsdDocument,
        depth: usize,
    ) -> Result<()> {
        if visitor.visit(node, json_schema, xsd)? {
            for child in node.elements() {
                self.walk(visitor, child, json_schema, xsd, depth + 1)?;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;

    /// Records the event sequence and fails on a chosen tag
    #[derive(Default)]
    struct Recorder {
        events: Vec<String>,
        open: usize,
        prune: Option<&'static str>,
        fail_on: Option<&'static str>,
    }

    impl Visitor for Recorder {
        fn enter_state(&mut self, node: &Element) {
            self.open += 1;
            self.events.push(format!("enter {}", node.local_name()));
        }

        fn visit(&mut self, node: &Element, _: &SchemaRef, _: &XsdDocument) -> Result<bool> {
            if self.fail_on == Some(node.local_name()) {
                return Err(Error::UnhandledConstruct {
                    tag: node.local_name().to_string(),
                    path: String::new(),
                });
            }
            Ok(self.prune != Some(node.local_name()))
        }

        fn exit_state(&mut self) -> Result<()> {
            self.open -= 1;
            self.events.push("exit".to_string());
            Ok(())
        }
    }

    const XSD: &str = r#"<xs:schema xmlns:xs="http://www.w3.org/2001/XMLSchema">
  <!-- a comment -->
  <xs:element name="A">
    <xs:annotation><xs:documentation>text</xs:documentation></xs:annotation>
  </xs:element>
  <xs:element name="B"/>
</xs:schema>"#;

    fn doc() -> XsdDocument {
        XsdDocument::from_string("t.xsd", XSD).unwrap()
    }

    #[test]
    fn test_document_order_and_pairing() {
        let mut visitor = Recorder::default();
        DepthFirstTraversal::new()
            .traverse(&mut visitor, &SchemaRef::blank(), &doc())
            .unwrap();
        assert_eq!(
            visitor.events,
            vec![
                "enter schema",
                "enter element",
                "enter annotation",
                "enter documentation",
                "exit",
                "exit",
                "exit",
                "enter element",
                "exit",
                "exit",
            ]
        );
        assert_eq!(visitor.open, 0);
    }

    #[test]
    fn test_false_prunes_children() {
        let mut visitor = Recorder {
            prune: Some("annotation"),
            ..Recorder::default()
        };
        DepthFirstTraversal::new()
            .traverse(&mut visitor, &SchemaRef::blank(), &doc())
            .unwrap();
        assert!(!visitor.events.iter().any(|e| e == "enter documentation"));
    }

    #[test]
    fn test_failure_still_unwinds() {
        let mut visitor = Recorder {
            fail_on: Some("documentation"),
            ..Recorder::default()
        };
        let err = DepthFirstTraversal::new()
            .traverse(&mut visitor, &SchemaRef::blank(), &doc())
            .unwrap_err();
        assert!(matches!(err, Error::UnhandledConstruct { .. }));
        assert_eq!(visitor.open, 0);
        assert_eq!(visitor.events.iter().filter(|e| *e == "enter element").count(), 1);
    }

    #[test]
    fn test_depth_limit() {
        let mut visitor = Recorder::default();
        let limits = Limits {
            max_depth: 1,
            ..Limits::default()
        };
        let err = DepthFirstTraversal::new()
            .with_limits(limits)
            .traverse(&mut visitor, &SchemaRef::blank(), &doc())
            .unwrap_err();
        assert!(matches!(err, Error::LimitExceeded(_)));
        assert_eq!(visitor.open, 0);
    }
}
