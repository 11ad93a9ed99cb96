//! Base converter
//!
//! One handler per XSD construct. Each handler reads the source element,
//! mutates the document model, records in its parsing state frame which
//! nodes its children should populate and returns whether the traversal
//! should descend into those children.

use super::builtins;
use super::namespace_manager::NamespaceManager;
use super::parsing_state::{ParsingState, StateFrame};
use super::XsdTag;
use crate::documents::{Element, XsdDocument};
use crate::error::{Error, Result};
use crate::jsonschema::{Additional, Items, JsonSchema, JsonSchemaType, SchemaRef};
use crate::names;
use crate::traversal::Visitor;
use rust_decimal::Decimal;
use serde_json::Value;
use std::str::FromStr;

/// Parsed `maxOccurs`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MaxOccurs {
    /// A finite bound (1 when absent)
    Bounded(u64),
    /// `unbounded`
    Unbounded,
}

impl MaxOccurs {
    /// Read `maxOccurs` from an element
    pub fn of(node: &Element) -> Result<Self> {
        match node.attribute("maxOccurs").map(str::trim) {
            None => Ok(MaxOccurs::Bounded(1)),
            Some("unbounded") => Ok(MaxOccurs::Unbounded),
            Some(value) => value
                .parse()
                .map(MaxOccurs::Bounded)
                .map_err(|_| Error::value(format!("invalid maxOccurs '{}'", value))),
        }
    }

    /// More than one occurrence allowed
    pub fn is_repeatable(&self) -> bool {
        match self {
            MaxOccurs::Bounded(n) => *n > 1,
            MaxOccurs::Unbounded => true,
        }
    }

    /// The finite bound, if any
    pub fn bound(&self) -> Option<u64> {
        match self {
            MaxOccurs::Bounded(n) => Some(*n),
            MaxOccurs::Unbounded => None,
        }
    }
}

/// `minOccurs`, 1 when absent
fn min_occurs(node: &Element) -> Result<u64> {
    match node.attribute("minOccurs").map(str::trim) {
        None => Ok(1),
        Some(value) => value
            .parse()
            .map_err(|_| Error::value(format!("invalid minOccurs '{}'", value))),
    }
}

/// The single element of a type's `sequence`, if it has exactly one
fn has_single_item(complex_type: &Element) -> bool {
    complex_type
        .first_child("sequence")
        .map_or(false, |sequence| sequence.find_children("element").count() == 1)
}

/// Documentation attached directly to an enumeration value
fn enumeration_documentation(node: &Element) -> Option<String> {
    node.first_child("annotation")?
        .first_child("documentation")
        .map(Element::text)
        .filter(|text| !text.is_empty())
}

/// An enumeration value as a JSON literal of the restricted type
fn enum_literal(value: &str, schema_type: Option<JsonSchemaType>) -> Value {
    let trimmed = value.trim();
    let typed = match schema_type {
        Some(JsonSchemaType::Integer) => trimmed.parse::<i64>().ok().map(Value::from),
        Some(JsonSchemaType::Number) => trimmed.parse::<serde_json::Number>().ok().map(Value::Number),
        Some(JsonSchemaType::Boolean) => match trimmed {
            "true" | "1" => Some(Value::Bool(true)),
            "false" | "0" => Some(Value::Bool(false)),
            _ => None,
        },
        _ => None,
    };
    typed.unwrap_or_else(|| Value::String(value.to_string()))
}

/// What an element's declaration says about its content
enum ElementContent {
    /// `type="..."`, already turned into a reference
    Typed(SchemaRef),
    /// Inline `complexType`
    Complex,
    /// Inline `simpleType`
    Simple,
    /// Neither
    Untyped,
}

impl ElementContent {
    fn into_node(self) -> SchemaRef {
        match self {
            ElementContent::Typed(node) => node,
            ElementContent::Complex | ElementContent::Untyped => {
                SchemaRef::of_type(JsonSchemaType::Object)
            }
            ElementContent::Simple => SchemaRef::blank(),
        }
    }
}

/// Numeric bound facets
#[derive(Debug, Clone, Copy)]
enum Bound {
    MinInclusive,
    MaxInclusive,
    MinExclusive,
    MaxExclusive,
}

/// Converts an XSD document into a JSON Schema document
///
/// Drive it with [`DepthFirstTraversal`](crate::traversal::DepthFirstTraversal).
/// The namespace manager outlives a single traversal so the includes of a
/// file can be converted first with the same converter; create a new
/// converter for every top-level file.
#[derive(Debug, Default)]
pub struct BaseConverter {
    pub(super) parsing_state: ParsingState,
    pub(super) namespace_manager: NamespaceManager,
}

impl BaseConverter {
    /// A converter with an empty namespace manager
    pub fn new() -> Self {
        Self::default()
    }

    /// The parsing state stack
    pub fn parsing_state(&self) -> &ParsingState {
        &self.parsing_state
    }

    /// The parsing state stack, mutable (for driving handlers by hand)
    pub fn parsing_state_mut(&mut self) -> &mut ParsingState {
        &mut self.parsing_state
    }

    /// The namespace manager
    pub fn namespace_manager(&self) -> &NamespaceManager {
        &self.namespace_manager
    }

    /// Container currently receiving properties
    pub fn working_json_schema(&self) -> Option<SchemaRef> {
        self.parsing_state.working_schema()
    }

    /// Dispatch `node` to the handler for its tag
    pub fn process(
        &mut self,
        node: &Element,
        json_schema: &SchemaRef,
        xsd: &XsdDocument,
    ) -> Result<bool> {
        let tag = XsdTag::from_local_name(node.local_name()).ok_or_else(|| {
            Error::UnhandledConstruct {
                tag: node.tag_name(),
                path: self.parsing_state.path(),
            }
        })?;
        tracing::trace!(%tag, path = %self.parsing_state.path(), "visit");

        match tag {
            XsdTag::Schema => self.schema(json_schema, xsd),
            XsdTag::ComplexType => match node.attribute("name") {
                Some(name) => {
                    self.named_type(node, name, Some(JsonSchemaType::Object), json_schema, xsd)
                }
                None => Ok(true),
            },
            XsdTag::SimpleType => match node.attribute("name") {
                Some(name) => self.named_type(node, name, None, json_schema, xsd),
                None => Ok(true),
            },
            XsdTag::Sequence | XsdTag::Choice | XsdTag::All => self.model_group(node),
            XsdTag::Element => self.element(node, json_schema, xsd),
            XsdTag::Attribute => self.attribute(node, json_schema, xsd),
            XsdTag::ComplexContent | XsdTag::SimpleContent => Ok(true),
            XsdTag::Restriction => self.restriction(node, json_schema, xsd),
            XsdTag::Extension => self.extension(node, json_schema, xsd),
            XsdTag::Any | XsdTag::AnyAttribute => self.any(),
            XsdTag::Include
            | XsdTag::Import
            | XsdTag::Notation
            | XsdTag::Unique
            | XsdTag::Key
            | XsdTag::KeyRef
            | XsdTag::WhiteSpace => Ok(false),

            XsdTag::Enumeration => self.enumeration(node),
            XsdTag::Pattern => self.pattern(node),
            XsdTag::Length | XsdTag::MinLength | XsdTag::MaxLength => self.length(node, tag),
            XsdTag::MinInclusive => self.bound(node, Bound::MinInclusive),
            XsdTag::MaxInclusive => self.bound(node, Bound::MaxInclusive),
            XsdTag::MinExclusive => self.bound(node, Bound::MinExclusive),
            XsdTag::MaxExclusive => self.bound(node, Bound::MaxExclusive),
            XsdTag::TotalDigits => self.total_digits(node),
            XsdTag::FractionDigits => self.fraction_digits(node),

            XsdTag::Annotation => Ok(true),
            XsdTag::Documentation => self.documentation(node, json_schema),
            XsdTag::AppInfo => self.appinfo(node, json_schema),

            XsdTag::MessageDocumentation => self.message_documentation(json_schema, xsd),
            XsdTag::Name | XsdTag::Segment => self.message_field(node, tag, json_schema),
            XsdTag::Description | XsdTag::Note => self.description(node, json_schema),
            XsdTag::ProductInformation => self.product_information(node, json_schema),
            XsdTag::Contact | XsdTag::Adapter => self.product_field(node, tag, json_schema),
            XsdTag::Send | XsdTag::Receive => Ok(false),
            XsdTag::FieldDocumentation => self.field_documentation(node),
            XsdTag::Field | XsdTag::Required | XsdTag::Type | XsdTag::FieldLength => {
                self.field_item(node, tag)
            }
        }
    }

    // =========================================================================
    // Frame helpers
    // =========================================================================

    pub(super) fn frame(&mut self) -> Result<&mut StateFrame> {
        self.parsing_state.current_mut()
    }

    fn working(&self) -> Result<SchemaRef> {
        self.parsing_state
            .working_schema()
            .ok_or_else(|| self.state_error("no working schema"))
    }

    fn content(&self) -> Result<SchemaRef> {
        self.parsing_state
            .content_schema()
            .ok_or_else(|| self.state_error("no schema to restrict"))
    }

    fn state_error(&self, message: &str) -> Error {
        Error::State(format!("{} at {}", message, self.parsing_state.path()))
    }

    fn value_error(&self, message: &str) -> Error {
        Error::value(format!("{} at {}", message, self.parsing_state.path()))
    }

    fn facet_value<'a>(&self, node: &'a Element) -> Result<&'a str> {
        node.attribute("value").ok_or_else(|| {
            self.value_error(&format!("<{}> without a value", node.local_name()))
        })
    }

    fn facet_count(&self, node: &Element) -> Result<u32> {
        let value = self.facet_value(node)?.trim();
        value.parse().map_err(|_| {
            self.value_error(&format!("<{}> value '{}' is not a count", node.local_name(), value))
        })
    }

    // =========================================================================
    // Structure
    // =========================================================================

    fn schema(&mut self, json_schema: &SchemaRef, xsd: &XsdDocument) -> Result<bool> {
        self.namespace_manager.namespace_for(xsd.target_namespace());
        for (prefix, uri) in xsd.namespaces().prefixes() {
            tracing::trace!(prefix, uri, "namespace declared");
            self.namespace_manager.namespace_for(Some(uri));
        }
        self.frame()?.working = Some(json_schema.clone());
        Ok(true)
    }

    /// Named `complexType` / `simpleType`: a `definitions` entry
    fn named_type(
        &mut self,
        node: &Element,
        name: &str,
        schema_type: Option<JsonSchemaType>,
        json_schema: &SchemaRef,
        xsd: &XsdDocument,
    ) -> Result<bool> {
        names::validate_ncname(name)?;
        let site = json_schema.borrow().id.clone();
        let Some(definition) =
            self.namespace_manager
                .define_type(xsd.target_namespace(), name, site.as_deref())
        else {
            tracing::warn!(type_name = name, path = %self.parsing_state.path(), "duplicate type definition ignored");
            return Ok(false);
        };

        let list_of = schema_type == Some(JsonSchemaType::Object)
            && names::is_list_of(name)
            && has_single_item(node);
        definition.borrow_mut().schema_type = if list_of {
            Some(JsonSchemaType::Array)
        } else {
            schema_type
        };
        json_schema.borrow_mut().set_definition(name, definition.clone());

        let frame = self.frame()?;
        frame.working = Some(definition.clone());
        frame.property = Some(definition.clone());
        frame.content = Some(definition.clone());
        if list_of {
            frame.list_of = Some(definition);
        }
        Ok(true)
    }

    /// `sequence`, `choice`, `all`
    ///
    /// A repeatable group that is the whole content of a named type turns
    /// the type into an array of objects; any other group only passes its
    /// children through.
    fn model_group(&mut self, node: &Element) -> Result<bool> {
        let max = MaxOccurs::of(node)?;
        let is_type_content = self
            .parsing_state
            .parent()
            .map_or(false, |f| f.is("complexType") && f.node_name.is_some());
        if is_type_content && max.is_repeatable() {
            let definition = self.content()?;
            let items = SchemaRef::of_type(JsonSchemaType::Object);
            {
                let mut schema = definition.borrow_mut();
                schema.schema_type = Some(JsonSchemaType::Array);
                schema.max_items = max.bound();
                schema.items = Some(Items::Single(items.clone()));
            }
            self.frame()?.working = Some(items);
        }
        Ok(true)
    }

    fn element(&mut self, node: &Element, json_schema: &SchemaRef, xsd: &XsdDocument) -> Result<bool> {
        if self.parsing_state.parent().map_or(false, |f| f.is("schema")) {
            self.handle_element_global(node, json_schema, xsd)
        } else {
            self.handle_element_local(node, json_schema, xsd)
        }
    }

    fn element_content(
        &mut self,
        node: &Element,
        json_schema: &SchemaRef,
        xsd: &XsdDocument,
    ) -> Result<ElementContent> {
        if let Some(type_name) = node.attribute("type") {
            let site = json_schema.borrow().id.clone();
            let node_type = self.namespace_manager.get_type(type_name, json_schema, xsd)?;
            return Ok(ElementContent::Typed(node_type.to_reference_from(site.as_deref())));
        }
        Ok(if node.first_child("complexType").is_some() {
            ElementContent::Complex
        } else if node.first_child("simpleType").is_some() {
            ElementContent::Simple
        } else {
            ElementContent::Untyped
        })
    }

    /// Schema-level element: a subschema of the target namespace container
    ///
    /// The root gets a property referencing it plus an `anyOf` branch
    /// requiring that property.
    pub fn handle_element_global(
        &mut self,
        node: &Element,
        json_schema: &SchemaRef,
        xsd: &XsdDocument,
    ) -> Result<bool> {
        let name = node
            .attribute("name")
            .ok_or_else(|| self.value_error("global element without a name"))?;
        names::validate_ncname(name)?;
        let content = self.element_content(node, json_schema, xsd)?;
        let site = json_schema.borrow().id.clone();
        let Some(container) =
            self.namespace_manager
                .define_element(xsd.target_namespace(), name, site.as_deref())
        else {
            tracing::warn!(element = name, "duplicate global element ignored");
            return Ok(false);
        };

        let complex = matches!(content, ElementContent::Complex);
        match content {
            ElementContent::Typed(reference) => {
                let reference = reference.borrow();
                let mut schema = container.borrow_mut();
                schema.dollar_ref = reference.dollar_ref.clone();
                schema.schema_type = reference.schema_type;
                schema.format = reference.format.clone();
            }
            ElementContent::Complex | ElementContent::Untyped => {
                container.borrow_mut().schema_type = Some(JsonSchemaType::Object);
            }
            ElementContent::Simple => {}
        }

        json_schema.add_sub_schema(name, container.clone());
        json_schema
            .borrow_mut()
            .add_required_any_of_property_by_reference(name, &container)?;

        let frame = self.frame()?;
        frame.property = Some(container.clone());
        frame.content = Some(container.clone());
        if complex {
            frame.working = Some(container);
        }
        Ok(true)
    }

    /// Element inside a type: a property of the working container
    pub fn handle_element_local(
        &mut self,
        node: &Element,
        json_schema: &SchemaRef,
        xsd: &XsdDocument,
    ) -> Result<bool> {
        let (name, content, inline_complex) = match node.attribute("ref") {
            Some(reference) => {
                let site = json_schema.borrow().id.clone();
                let (_, local) = names::split_qname(reference);
                let target = self.namespace_manager.get_element(reference, xsd)?;
                (local.to_string(), target.to_reference_from(site.as_deref()), false)
            }
            None => {
                let name = node
                    .attribute("name")
                    .ok_or_else(|| self.value_error("element without a name or ref"))?;
                names::validate_ncname(name)?;
                let content = self.element_content(node, json_schema, xsd)?;
                let inline_complex = matches!(content, ElementContent::Complex);
                (name.to_string(), content.into_node(), inline_complex)
            }
        };
        let min = min_occurs(node)?;
        let max = MaxOccurs::of(node)?;

        // Item of a ListOf wrapper: fills the wrapper's array, no property
        if let Some(list) = self.parsing_state.enclosing_list_of() {
            {
                let mut array = list.borrow_mut();
                array.items = Some(Items::Single(content.clone()));
                if let MaxOccurs::Bounded(n) = max {
                    if n > 1 {
                        array.max_items = Some(n);
                    }
                }
            }
            let frame = self.frame()?;
            frame.property = Some(content.clone());
            frame.content = Some(content.clone());
            if inline_complex {
                frame.working = Some(content);
            }
            return Ok(true);
        }

        let wrapper = node.attribute("ref").is_none()
            && node.attribute("type").is_none()
            && names::is_list_of(&name)
            && node.first_child("complexType").map_or(false, has_single_item);
        let property = if wrapper {
            if max.is_repeatable() {
                tracing::warn!(
                    element = %name,
                    path = %self.parsing_state.path(),
                    "maxOccurs on a ListOf wrapper is ignored, the item element sets maxItems"
                );
            }
            SchemaRef::of_type(JsonSchemaType::Array)
        } else if max.is_repeatable() {
            SchemaRef::new(JsonSchema {
                schema_type: Some(JsonSchemaType::Array),
                max_items: max.bound(),
                items: Some(Items::Single(content.clone())),
                ..JsonSchema::default()
            })
        } else {
            content.clone()
        };

        let working = self.working()?;
        {
            let mut container = working.borrow_mut();
            if container.schema_type.is_none() {
                container.schema_type = Some(JsonSchemaType::Object);
            }
            container.set_property(name.clone(), property.clone());
            if min >= 1 && !self.parsing_state.in_choice() {
                container.add_required(&name);
            }
        }

        let frame = self.frame()?;
        frame.property = Some(property.clone());
        frame.content = Some(content.clone());
        if inline_complex {
            frame.working = Some(content);
        }
        if wrapper {
            frame.list_of = Some(property);
        }
        Ok(true)
    }

    /// `attribute`: a property with a lowercased first letter
    fn attribute(&mut self, node: &Element, json_schema: &SchemaRef, xsd: &XsdDocument) -> Result<bool> {
        let global = self.parsing_state.parent().map_or(false, |f| f.is("schema"));
        let site = json_schema.borrow().id.clone();

        let (name, content) = match node.attribute("ref") {
            Some(reference) => {
                let (_, local) = names::split_qname(reference);
                let declared = json_schema
                    .global_attributes_schema()
                    .borrow()
                    .property(&names::lower_case_first_letter(local));
                let content = match declared {
                    Some(node) => node.deep_clone(),
                    None => builtins::builtin_schema("string").unwrap_or_else(SchemaRef::blank),
                };
                (local.to_string(), content)
            }
            None => {
                let name = node
                    .attribute("name")
                    .ok_or_else(|| self.value_error("attribute without a name or ref"))?;
                names::validate_ncname(name)?;
                let content = match node.attribute("type") {
                    Some(type_name) => self
                        .namespace_manager
                        .get_type(type_name, json_schema, xsd)?
                        .to_reference_from(site.as_deref()),
                    None if node.first_child("simpleType").is_some() => SchemaRef::blank(),
                    None => builtins::builtin_schema("string").unwrap_or_else(SchemaRef::blank),
                };
                (name.to_string(), content)
            }
        };
        if let Some(default) = node.attribute("default").or_else(|| node.attribute("fixed")) {
            content.borrow_mut().default = Some(Value::String(default.to_string()));
        }

        let required = node.attribute("use") == Some("required");
        if global {
            json_schema
                .global_attributes_schema()
                .borrow_mut()
                .add_attribute_property(&name, content.clone(), false);
        } else {
            let working = self.working()?;
            let mut container = working.borrow_mut();
            if container.schema_type.is_none() {
                container.schema_type = Some(JsonSchemaType::Object);
            }
            container.add_attribute_property(&name, content.clone(), required);
        }

        let frame = self.frame()?;
        frame.property = Some(content.clone());
        frame.content = Some(content);
        Ok(true)
    }

    /// Replace the content's own type with `allOf: [$ref base, extension]`
    fn derive(&mut self, base: &SchemaRef) -> Result<SchemaRef> {
        let content = self.content()?;
        let extension = {
            let mut schema = content.borrow_mut();
            schema.schema_type = None;
            schema.extend(Some(base), None)?
        };
        let frame = self.frame()?;
        frame.working = Some(extension.clone());
        frame.content = Some(extension.clone());
        Ok(extension)
    }

    fn base_reference(
        &mut self,
        base: &str,
        json_schema: &SchemaRef,
        xsd: &XsdDocument,
    ) -> Result<SchemaRef> {
        let site = json_schema.borrow().id.clone();
        Ok(self
            .namespace_manager
            .get_type(base, json_schema, xsd)?
            .to_reference_from(site.as_deref()))
    }

    /// `restriction`: built-in bases set `type`/`format`, named bases derive
    fn restriction(&mut self, node: &Element, json_schema: &SchemaRef, xsd: &XsdDocument) -> Result<bool> {
        let Some(base) = node.attribute("base") else {
            return Ok(true);
        };
        let qname = self.namespace_manager.resolve_name(base, xsd)?;
        if qname.is_xsd() {
            let builtin = builtins::get_builtin_type(&qname.local_name).ok_or_else(|| {
                self.value_error(&format!("'{}' is not a built-in XSD type", base))
            })?;
            if builtin.schema_type.is_some() {
                let content = self.content()?;
                let mut schema = content.borrow_mut();
                schema.schema_type = builtin.schema_type;
                schema.format = builtin.format.map(str::to_string);
            }
            return Ok(true);
        }
        let base = self.base_reference(base, json_schema, xsd)?;
        self.derive(&base)?;
        Ok(true)
    }

    /// `extension`: inheritance through `allOf`; built-in bases keep the type as is
    fn extension(&mut self, node: &Element, json_schema: &SchemaRef, xsd: &XsdDocument) -> Result<bool> {
        let base = node
            .attribute("base")
            .ok_or_else(|| self.value_error("extension without a base"))?;
        if self.namespace_manager.resolve_name(base, xsd)?.is_xsd() {
            return Ok(true);
        }
        let base = self.base_reference(base, json_schema, xsd)?;
        self.derive(&base)?;
        Ok(true)
    }

    fn any(&mut self) -> Result<bool> {
        let working = self.working()?;
        working.borrow_mut().additional_properties = Some(Additional::Allowed(true));
        Ok(false)
    }

    // =========================================================================
    // Facets
    // =========================================================================

    /// Append the value to `enum`; documented values extend `description`
    fn enumeration(&mut self, node: &Element) -> Result<bool> {
        let value = self.facet_value(node)?;
        let content = self.content()?;
        let mut schema = content.borrow_mut();
        let literal = enum_literal(value, schema.schema_type);
        schema.enum_values.push(literal);

        if let Some(text) = enumeration_documentation(node) {
            let entry = format!("{} - {}", value, text);
            schema.description = Some(match schema.description.take() {
                Some(previous) if !previous.is_empty() => format!("{} / {}", previous, entry),
                _ => entry,
            });
        }
        Ok(true)
    }

    fn pattern(&mut self, node: &Element) -> Result<bool> {
        let value = self.facet_value(node)?;
        self.content()?.borrow_mut().pattern = Some(value.to_string());
        Ok(false)
    }

    fn length(&mut self, node: &Element, tag: XsdTag) -> Result<bool> {
        let value = u64::from(self.facet_count(node)?);
        let content = self.content()?;
        let mut schema = content.borrow_mut();
        match tag {
            XsdTag::Length => {
                schema.min_length = value;
                schema.max_length = Some(value);
            }
            XsdTag::MinLength => schema.min_length = value,
            _ => schema.max_length = Some(value),
        }
        Ok(false)
    }

    fn bound(&mut self, node: &Element, bound: Bound) -> Result<bool> {
        let raw = self.facet_value(node)?.trim();
        let Ok(value) = Decimal::from_str(raw).or_else(|_| Decimal::from_scientific(raw)) else {
            tracing::warn!(facet = node.local_name(), value = raw, "non-numeric bound ignored");
            return Ok(false);
        };
        let content = self.content()?;
        let mut schema = content.borrow_mut();
        match bound {
            Bound::MinInclusive => {
                schema.minimum = Some(value);
                schema.exclusive_minimum = false;
            }
            Bound::MaxInclusive => {
                schema.maximum = Some(value);
                schema.exclusive_maximum = false;
            }
            Bound::MinExclusive => {
                schema.minimum = Some(value);
                schema.exclusive_minimum = true;
            }
            Bound::MaxExclusive => {
                schema.maximum = Some(value);
                schema.exclusive_maximum = true;
            }
        }
        Ok(false)
    }

    fn total_digits(&mut self, node: &Element) -> Result<bool> {
        let digits = self.facet_count(node)?;
        self.content()?.borrow_mut().apply_total_digits(digits)?;
        Ok(false)
    }

    fn fraction_digits(&mut self, node: &Element) -> Result<bool> {
        let digits = self.facet_count(node)?;
        self.content()?.borrow_mut().apply_fraction_digits(digits)?;
        Ok(false)
    }

    // =========================================================================
    // Annotations
    // =========================================================================

    /// `documentation`: `description` of the annotated node
    ///
    /// Declines inside an enumeration, whose text is folded into the
    /// restricted node's description by the enumeration handler.
    fn documentation(&mut self, node: &Element, json_schema: &SchemaRef) -> Result<bool> {
        if self
            .parsing_state
            .ancestor(2)
            .map_or(false, |f| f.is("enumeration"))
        {
            return Ok(false);
        }
        let text = node.text();
        if !text.is_empty() {
            let target = self
                .parsing_state
                .property_schema()
                .unwrap_or_else(|| json_schema.clone());
            target.borrow_mut().description = Some(text);
        }
        Ok(false)
    }

    /// `appinfo`: flags a schema-level block carrying two MessageDocumentation children
    fn appinfo(&mut self, node: &Element, json_schema: &SchemaRef) -> Result<bool> {
        let schema_level = self
            .parsing_state
            .ancestor(2)
            .map_or(false, |f| f.is("schema"));
        if schema_level && node.find_children("MessageDocumentation").count() > 1 {
            tracing::warn!(
                document = json_schema.borrow().filename().unwrap_or(""),
                "more than one MessageDocumentation block, keeping the first"
            );
            json_schema.borrow_mut().info_mut().warning_conversor_auto = true;
        }
        Ok(true)
    }
}

impl Visitor for BaseConverter {
    fn on_begin(&mut self, _json_schema: &SchemaRef, _xsd: &XsdDocument) -> Result<()> {
        self.parsing_state.clear();
        Ok(())
    }

    fn enter_state(&mut self, node: &Element) {
        self.parsing_state.enter_state(StateFrame::for_element(node));
    }

    fn visit(&mut self, node: &Element, json_schema: &SchemaRef, xsd: &XsdDocument) -> Result<bool> {
        self.process(node, json_schema, xsd)
    }

    fn exit_state(&mut self) -> Result<()> {
        let frame = self.parsing_state.exit_state()?;
        if let Some(working) = frame.working {
            working.remove_empty_schemas();
        }
        Ok(())
    }

    fn on_end(&mut self, _json_schema: &SchemaRef, _xsd: &XsdDocument) -> Result<()> {
        self.namespace_manager.check_resolved()
    }
}
