//! Namespace manager
//!
//! Type and global element tables per namespace, organised as a tree keyed
//! by the segments of the namespace URI with its scheme removed. One manager
//! lives as long as one top-level conversion (the file and its includes).

use super::builtins;
use crate::documents::XsdDocument;
use crate::error::{Error, Result};
use crate::jsonschema::{JsonSchema, SchemaRef};
use crate::names;
use crate::namespaces::QName;
use indexmap::IndexMap;

/// Tables of one namespace plus its nested namespaces
#[derive(Debug, Default)]
pub struct Namespace {
    types: IndexMap<String, SchemaRef>,
    elements: IndexMap<String, SchemaRef>,
    children: IndexMap<String, Namespace>,
}

impl Namespace {
    /// Named types, forward placeholders included
    pub fn types(&self) -> &IndexMap<String, SchemaRef> {
        &self.types
    }

    /// Global elements, forward placeholders included
    pub fn elements(&self) -> &IndexMap<String, SchemaRef> {
        &self.elements
    }

    fn collect_unresolved(&self, path: &str, out: &mut Vec<String>) {
        let forward = self
            .types
            .iter()
            .chain(self.elements.iter())
            .filter(|(_, node)| node.borrow().is_forward_reference());
        for (name, _) in forward {
            out.push(if path.is_empty() {
                name.clone()
            } else {
                format!("{}/{}", path, name)
            });
        }
        for (segment, child) in &self.children {
            let child_path = if path.is_empty() {
                segment.clone()
            } else {
                format!("{}/{}", path, segment)
            };
            child.collect_unresolved(&child_path, out);
        }
    }
}

/// Resolves type names to schema nodes
#[derive(Debug, Default)]
pub struct NamespaceManager {
    root: Namespace,
}

impl NamespaceManager {
    /// An empty manager
    pub fn new() -> Self {
        Self::default()
    }

    /// Container for a `/` separated namespace path, created on demand
    pub fn get_namespace(&mut self, path: &str) -> &mut Namespace {
        let mut current = &mut self.root;
        for segment in path.split('/').filter(|s| !s.is_empty()) {
            current = current.children.entry(segment.to_string()).or_default();
        }
        current
    }

    /// Container for a `/` separated namespace path, if it exists
    pub fn find_namespace(&self, path: &str) -> Option<&Namespace> {
        let mut current = &self.root;
        for segment in path.split('/').filter(|s| !s.is_empty()) {
            current = current.children.get(segment)?;
        }
        Some(current)
    }

    /// Container for a namespace URI (`None` is the no-namespace root)
    pub fn namespace_for(&mut self, uri: Option<&str>) -> &mut Namespace {
        let path = uri.map(names::safe_namespace).unwrap_or_default();
        self.get_namespace(&path)
    }

    /// Resolve a qualified name against the document's prefix bindings
    ///
    /// Unprefixed names belong to the default namespace, or to the target
    /// namespace when no default is declared.
    pub fn resolve_name(&self, name: &str, xsd: &XsdDocument) -> Result<QName> {
        xsd.namespaces().resolve(name.trim(), xsd.target_namespace())
    }

    /// The node for a type name
    ///
    /// Built-in types yield a fresh node on every call. Other types yield
    /// the shared node of their namespace table, a forward placeholder when
    /// the definition has not been visited yet.
    pub fn get_type(
        &mut self,
        type_name: &str,
        json_schema: &SchemaRef,
        xsd: &XsdDocument,
    ) -> Result<SchemaRef> {
        let qname = self.resolve_name(type_name, xsd)?;
        if qname.is_xsd() {
            return builtins::builtin_schema(&qname.local_name).ok_or_else(|| {
                Error::value(format!("'{}' is not a built-in XSD type", type_name))
            });
        }

        let namespace = self.namespace_for(qname.namespace.as_deref());
        if let Some(existing) = namespace.types.get(&qname.local_name) {
            return Ok(existing.clone());
        }
        let placeholder = forward_node(definition_pointer(&qname.local_name));
        namespace
            .types
            .insert(qname.local_name.clone(), placeholder.clone());
        tracing::debug!(
            type_name,
            document = json_schema.borrow().id.as_deref().unwrap_or(""),
            "forward type reference"
        );
        Ok(placeholder)
    }

    /// Register the definition of a named type
    ///
    /// Fills in a forward placeholder when one exists. Returns `None` when
    /// the type is already defined.
    pub fn define_type(
        &mut self,
        namespace: Option<&str>,
        name: &str,
        site: Option<&str>,
    ) -> Option<SchemaRef> {
        let table = &mut self.namespace_for(namespace).types;
        define(table, name, definition_pointer(name), site)
    }

    /// The node for a global element referenced by `ref`
    pub fn get_element(&mut self, element_name: &str, xsd: &XsdDocument) -> Result<SchemaRef> {
        let qname = self.resolve_name(element_name, xsd)?;
        let pointer = element_pointer(qname.namespace.as_deref(), &qname.local_name);
        let namespace = self.namespace_for(qname.namespace.as_deref());
        if let Some(existing) = namespace.elements.get(&qname.local_name) {
            return Ok(existing.clone());
        }
        let placeholder = forward_node(pointer);
        namespace
            .elements
            .insert(qname.local_name.clone(), placeholder.clone());
        Ok(placeholder)
    }

    /// Register a global element; `None` when it is already defined
    pub fn define_element(
        &mut self,
        namespace: Option<&str>,
        name: &str,
        site: Option<&str>,
    ) -> Option<SchemaRef> {
        let pointer = element_pointer(namespace, name);
        let table = &mut self.namespace_for(namespace).elements;
        define(table, name, pointer, site)
    }

    /// Names referenced but never defined
    pub fn unresolved(&self) -> Vec<String> {
        let mut out = Vec::new();
        self.root.collect_unresolved("", &mut out);
        out
    }

    /// Fail with [`Error::UnresolvedTypes`] when a forward reference remains
    pub fn check_resolved(&self) -> Result<()> {
        let unresolved = self.unresolved();
        if unresolved.is_empty() {
            Ok(())
        } else {
            Err(Error::UnresolvedTypes(unresolved))
        }
    }
}

fn forward_node(pointer: String) -> SchemaRef {
    SchemaRef::new(JsonSchema {
        pointer: Some(pointer),
        forward: true,
        ..JsonSchema::default()
    })
}

fn define(
    table: &mut IndexMap<String, SchemaRef>,
    name: &str,
    pointer: String,
    site: Option<&str>,
) -> Option<SchemaRef> {
    if let Some(existing) = table.get(name) {
        let mut node = existing.borrow_mut();
        if !node.forward {
            return None;
        }
        node.forward = false;
        node.definition_site = site.map(str::to_string);
        return Some(existing.clone());
    }
    let node = SchemaRef::new(JsonSchema {
        pointer: Some(pointer),
        definition_site: site.map(str::to_string),
        ..JsonSchema::default()
    });
    table.insert(name.to_string(), node.clone());
    Some(node)
}

/// `#/definitions/<name>`
pub fn definition_pointer(name: &str) -> String {
    format!("#/definitions/{}", names::escape_pointer_token(name))
}

/// `#/<namespace segments>/<name>`, where global elements are placed
pub fn element_pointer(namespace: Option<&str>, name: &str) -> String {
    let mut pointer = String::from("#");
    for segment in namespace.map(names::namespace_segments).unwrap_or_default() {
        pointer.push('/');
        pointer.push_str(&names::escape_pointer_token(&segment));
    }
    pointer.push('/');
    pointer.push_str(&names::escape_pointer_token(name));
    pointer
}
