//! XML usage visitor
//!
//! Counts how often each tag appears, either per document or summed over
//! every document it is driven over. Runs on the same traversal as the
//! converter and never prunes.

use crate::documents::{Element, XsdDocument};
use crate::error::Result;
use crate::jsonschema::SchemaRef;
use crate::traversal::Visitor;
use indexmap::IndexMap;
use std::fmt::Write as _;

/// Key used for the summed counts
pub const SUMMED_KEY: &str = "all";

/// Tag usage counts
#[derive(Debug, Clone, Default)]
pub struct XmlUsageVisitor {
    sum: bool,
    current: String,
    uris: IndexMap<String, IndexMap<String, usize>>,
}

impl XmlUsageVisitor {
    /// Counts kept per document
    pub fn new() -> Self {
        Self::default()
    }

    /// Counts summed over all documents under [`SUMMED_KEY`]
    pub fn summed() -> Self {
        Self {
            sum: true,
            ..Self::default()
        }
    }

    /// Counts by document (or [`SUMMED_KEY`]), then by tag name
    pub fn counts(&self) -> &IndexMap<String, IndexMap<String, usize>> {
        &self.uris
    }

    /// Count of one tag in one document
    pub fn count(&self, document: &str, tag: &str) -> usize {
        self.uris
            .get(document)
            .and_then(|tags| tags.get(tag))
            .copied()
            .unwrap_or(0)
    }

    /// Report sorted by tag name, one document per block
    pub fn dump(&self) -> String {
        let mut out = String::new();
        for (document, tags) in &self.uris {
            let _ = writeln!(out, "{}", document);
            let mut sorted: Vec<_> = tags.iter().collect();
            sorted.sort_by(|a, b| a.0.cmp(b.0));
            for (tag, count) in sorted {
                let _ = writeln!(out, "  {}: {}", tag, count);
            }
        }
        out
    }
}

impl Visitor for XmlUsageVisitor {
    fn on_begin(&mut self, _json_schema: &SchemaRef, xsd: &XsdDocument) -> Result<()> {
        self.current = if self.sum {
            SUMMED_KEY.to_string()
        } else {
            xsd.base_filename.clone()
        };
        self.uris.entry(self.current.clone()).or_default();
        Ok(())
    }

    fn enter_state(&mut self, _node: &Element) {}

    fn visit(&mut self, node: &Element, _json_schema: &SchemaRef, _xsd: &XsdDocument) -> Result<bool> {
        *self
            .uris
            .entry(self.current.clone())
            .or_default()
            .entry(node.tag_name())
            .or_insert(0) += 1;
        Ok(true)
    }

    fn exit_state(&mut self) -> Result<()> {
        Ok(())
    }
}
