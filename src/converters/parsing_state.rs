//! Parsing state stack
//!
//! One frame per source element currently open in the traversal. A frame
//! records which schema nodes the handlers of that element settled on; the
//! lookups walk down from the top so nested constructs inherit the nodes of
//! their enclosing scope until they choose their own.

use crate::documents::Element;
use crate::error::{Error, Result};
use crate::jsonschema::SchemaRef;

/// State of one open source element
#[derive(Debug, Clone, Default)]
pub struct StateFrame {
    /// Local name of the tag
    pub name: String,
    /// Value of the element's `name` attribute, if any
    pub node_name: Option<String>,
    /// Container whose `properties` receive child elements
    pub working: Option<SchemaRef>,
    /// Node described by annotations (`description`, `x-totvs`)
    pub property: Option<SchemaRef>,
    /// Node receiving restrictions and facets
    pub content: Option<SchemaRef>,
    /// Array of a `ListOf` wrapper waiting for its item element
    pub list_of: Option<SchemaRef>,
}

impl StateFrame {
    /// A frame with nothing chosen yet
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    /// A frame for a source element
    pub fn for_element(element: &Element) -> Self {
        Self {
            name: element.local_name().to_string(),
            node_name: element
                .attribute("name")
                .or_else(|| element.attribute("ref"))
                .map(str::to_string),
            ..Self::default()
        }
    }

    /// Set the working container (builder style)
    pub fn with_working(mut self, working: SchemaRef) -> Self {
        self.working = Some(working);
        self
    }

    /// True when the frame has the given tag name
    pub fn is(&self, name: &str) -> bool {
        self.name == name
    }
}

/// Stack of [`StateFrame`]s
#[derive(Debug, Default)]
pub struct ParsingState {
    frames: Vec<StateFrame>,
}

impl ParsingState {
    /// An empty stack
    pub fn new() -> Self {
        Self::default()
    }

    /// Push a frame
    pub fn enter_state(&mut self, frame: StateFrame) {
        tracing::trace!(tag = %frame.name, depth = self.frames.len(), "enter state");
        self.frames.push(frame);
    }

    /// Pop the top frame
    pub fn exit_state(&mut self) -> Result<StateFrame> {
        let frame = self
            .frames
            .pop()
            .ok_or_else(|| Error::State("exit_state() called on an empty parsing state".into()))?;
        tracing::trace!(tag = %frame.name, depth = self.frames.len(), "exit state");
        Ok(frame)
    }

    /// Number of open frames
    pub fn depth(&self) -> usize {
        self.frames.len()
    }

    /// True when no frame is open
    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }

    /// Drop every frame
    pub fn clear(&mut self) {
        self.frames.clear();
    }

    /// Top frame
    pub fn current(&self) -> Option<&StateFrame> {
        self.frames.last()
    }

    /// Top frame, mutable
    pub fn current_mut(&mut self) -> Result<&mut StateFrame> {
        self.frames
            .last_mut()
            .ok_or_else(|| Error::State("no current parsing state".into()))
    }

    /// Tag name of the top frame
    pub fn current_name(&self) -> Option<&str> {
        self.current().map(|f| f.name.as_str())
    }

    /// Frame `n` levels below the top (`ancestor(0)` is the top)
    pub fn ancestor(&self, n: usize) -> Option<&StateFrame> {
        self.frames.iter().rev().nth(n)
    }

    /// Frame directly below the top
    pub fn parent(&self) -> Option<&StateFrame> {
        self.ancestor(1)
    }

    /// Nearest frame, top included, whose working container is set
    pub fn working_schema(&self) -> Option<SchemaRef> {
        self.frames.iter().rev().find_map(|f| f.working.clone())
    }

    /// Nearest frame, top included, whose described node is set
    pub fn property_schema(&self) -> Option<SchemaRef> {
        self.frames.iter().rev().find_map(|f| f.property.clone())
    }

    /// Nearest frame, top included, whose content node is set
    pub fn content_schema(&self) -> Option<SchemaRef> {
        self.frames.iter().rev().find_map(|f| f.content.clone())
    }

    /// `ListOf` array owned by the element (or named type) directly enclosing the top
    ///
    /// The search stops at the first enclosing `element`, so only the
    /// wrapper's immediate item element sees it.
    pub fn enclosing_list_of(&self) -> Option<SchemaRef> {
        for frame in self.frames.iter().rev().skip(1) {
            if let Some(list) = &frame.list_of {
                return Some(list.clone());
            }
            if frame.is("element") {
                return None;
            }
        }
        None
    }

    /// True when the nearest enclosing model group is a `choice`
    pub fn in_choice(&self) -> bool {
        self.frames
            .iter()
            .rev()
            .skip(1)
            .find(|f| matches!(f.name.as_str(), "sequence" | "choice" | "all"))
            .map_or(false, |f| f.is("choice"))
    }

    /// Tag path from the root, named elements shown as `element[Name]`
    pub fn path(&self) -> String {
        self.frames
            .iter()
            .map(|f| match &f.node_name {
                Some(name) => format!("{}[{}]", f.name, name),
                None => f.name.clone(),
            })
            .collect::<Vec<_>>()
            .join("/")
    }
}
