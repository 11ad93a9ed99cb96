//! Schema nodes and the shared handle around them

use super::{JsonSchemaType, MessageInfo, XTotvsRecord, DRAFT_04_SCHEMA};
use super::GLOBAL_ATTRIBUTES_SCHEMA_NAME;
use crate::error::{Error, Result};
use crate::names;
use indexmap::IndexMap;
use rust_decimal::Decimal;
use serde_json::Value;
use std::cell::{Ref, RefCell, RefMut};
use std::fmt;
use std::path::Path;
use std::rc::Rc;
use url::Url;

/// `items`: one schema for every element, or one per position
#[derive(Debug, Clone)]
pub enum Items {
    /// Every array element matches this schema
    Single(SchemaRef),
    /// Positional schemas
    Tuple(Vec<SchemaRef>),
}

/// `additionalItems` / `additionalProperties`
#[derive(Debug, Clone)]
pub enum Additional {
    /// `true` or `false`
    Allowed(bool),
    /// Extra members must match this schema
    Schema(SchemaRef),
}

/// A `dependencies` entry
#[derive(Debug, Clone)]
pub enum Dependency {
    /// Property dependency: names that must be present too
    Property(Vec<String>),
    /// Schema dependency: the instance must also match this schema
    Schema(SchemaRef),
}

/// Options for creating a root document node
#[derive(Debug, Clone, Default)]
pub struct SchemaOptions {
    base_filename: Option<String>,
    base_id: Option<String>,
    target_namespace: Option<String>,
    title: Option<String>,
    pointer: Option<String>,
    dollar_ref: Option<String>,
}

impl SchemaOptions {
    /// Create empty options
    pub fn new() -> Self {
        Self::default()
    }

    /// File name of the XSD the document is generated from
    pub fn with_base_filename(mut self, name: impl Into<String>) -> Self {
        self.base_filename = Some(name.into());
        self
    }

    /// URI prefix used to build the document `id`
    pub fn with_base_id(mut self, base_id: impl Into<String>) -> Self {
        self.base_id = Some(base_id.into());
        self
    }

    /// Target namespace; builds the nested subschema containers
    pub fn with_target_namespace(mut self, namespace: impl Into<String>) -> Self {
        self.target_namespace = Some(namespace.into());
        self
    }

    /// Override the generated title
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    /// JSON Pointer naming this node, used by `to_reference`
    pub fn with_pointer(mut self, pointer: impl Into<String>) -> Self {
        self.pointer = Some(pointer.into());
        self
    }

    /// Make the node a `$ref` instance
    pub fn with_dollar_ref(mut self, dollar_ref: impl Into<String>) -> Self {
        self.dollar_ref = Some(dollar_ref.into());
        self
    }
}

/// One JSON Schema draft-04 node
#[derive(Debug, Clone, Default)]
pub struct JsonSchema {
    pub(crate) filename: Option<String>,
    pub(crate) target_namespace: Option<String>,
    /// Keys from this node down to its innermost namespace container
    pub(crate) target_path: Vec<String>,
    /// JSON Pointer of a named node
    pub(crate) pointer: Option<String>,
    /// `id` of the document that defines a named node
    pub(crate) definition_site: Option<String>,
    /// Named node referenced but not defined yet
    pub(crate) forward: bool,
    /// totalDigits seen on this node, for fractionDigits rescaling
    pub(crate) total_digits: Option<u32>,

    /// `$ref`
    pub dollar_ref: Option<String>,
    /// `id`
    pub id: Option<String>,
    /// `$schema`
    pub schema: Option<String>,
    /// `title`
    pub title: Option<String>,
    /// `description`
    pub description: Option<String>,
    /// `default`
    pub default: Option<Value>,
    /// `format`
    pub format: Option<String>,

    /// `multipleOf`
    pub multiple_of: Option<Decimal>,
    /// `maximum`
    pub maximum: Option<Decimal>,
    /// `exclusiveMaximum`
    pub exclusive_maximum: bool,
    /// `minimum`
    pub minimum: Option<Decimal>,
    /// `exclusiveMinimum`
    pub exclusive_minimum: bool,

    /// `maxLength`
    pub max_length: Option<u64>,
    /// `minLength`
    pub min_length: u64,
    /// `pattern`
    pub pattern: Option<String>,

    /// `additionalItems`
    pub additional_items: Option<Additional>,
    /// `items`
    pub items: Option<Items>,
    /// `maxItems`
    pub max_items: Option<u64>,
    /// `minItems`
    pub min_items: u64,
    /// `uniqueItems`
    pub unique_items: bool,

    /// `maxProperties`
    pub max_properties: Option<u64>,
    /// `minProperties`
    pub min_properties: u64,
    /// `required`
    pub required: Vec<String>,
    /// `additionalProperties`
    pub additional_properties: Option<Additional>,
    /// `properties`
    pub properties: IndexMap<String, SchemaRef>,
    /// `patternProperties`
    pub pattern_properties: IndexMap<String, SchemaRef>,
    /// `dependencies`
    pub dependencies: IndexMap<String, Dependency>,

    /// `enum`
    pub enum_values: Vec<Value>,
    /// `type`
    pub schema_type: Option<JsonSchemaType>,
    /// `allOf`
    pub all_of: Vec<SchemaRef>,
    /// `anyOf`
    pub any_of: Vec<SchemaRef>,
    /// `oneOf`
    pub one_of: Vec<SchemaRef>,
    /// `not`
    pub not: Option<SchemaRef>,
    /// `definitions`
    pub definitions: IndexMap<String, SchemaRef>,

    /// `x-totvs`
    pub xtotvs: Vec<XTotvsRecord>,
    /// `info`
    pub info: Option<MessageInfo>,

    /// Namespace containers, keyed by path segment
    pub sub_schemas: IndexMap<String, SchemaRef>,
}

impl JsonSchema {
    /// A blank node
    pub fn new() -> Self {
        Self::default()
    }

    /// A node with only `type` set
    pub fn of_type(schema_type: JsonSchemaType) -> Self {
        Self {
            schema_type: Some(schema_type),
            ..Self::default()
        }
    }

    /// Output file name (`<stem>.json`) of a root document
    pub fn filename(&self) -> Option<&str> {
        self.filename.as_deref()
    }

    /// Target namespace of a root document
    pub fn target_namespace(&self) -> Option<&str> {
        self.target_namespace.as_deref()
    }

    /// Segments leading to the innermost namespace container
    pub fn target_path(&self) -> &[String] {
        &self.target_path
    }

    /// JSON Pointer of a named node
    pub fn pointer(&self) -> Option<&str> {
        self.pointer.as_deref()
    }

    /// True while a named node has been referenced but not defined
    pub fn is_forward_reference(&self) -> bool {
        self.forward
    }

    /// True when every keyword holds its empty/default value and there are no subschemas
    pub fn is_blank(&self) -> bool {
        self.filename.is_none()
            && self.target_path.is_empty()
            && self.target_namespace.is_none()
            && self.pointer.is_none()
            && self.dollar_ref.is_none()
            && self.id.is_none()
            && self.sub_schemas.is_empty()
            && self.schema.is_none()
            && self.title.is_none()
            && self.description.is_none()
            && self.default.is_none()
            && self.format.is_none()
            && self.multiple_of.is_none()
            && self.maximum.is_none()
            && !self.exclusive_maximum
            && self.minimum.is_none()
            && !self.exclusive_minimum
            && self.max_length.is_none()
            && self.min_length == 0
            && self.pattern.is_none()
            && self.additional_items.is_none()
            && self.items.is_none()
            && self.max_items.is_none()
            && self.min_items == 0
            && !self.unique_items
            && self.max_properties.is_none()
            && self.min_properties == 0
            && self.required.is_empty()
            && self.additional_properties.is_none()
            && self.properties.is_empty()
            && self.pattern_properties.is_empty()
            && self.dependencies.is_empty()
            && self.enum_values.is_empty()
            && self.schema_type.is_none()
            && self.all_of.is_empty()
            && self.any_of.is_empty()
            && self.one_of.is_empty()
            && self.not.is_none()
            && self.definitions.is_empty()
            && self.xtotvs.is_empty()
            && self.info.is_none()
    }

    /// Property by name
    pub fn property(&self, name: &str) -> Option<SchemaRef> {
        self.properties.get(name).cloned()
    }

    /// Set a property, replacing any previous one with the same name
    pub fn set_property(&mut self, name: impl Into<String>, node: SchemaRef) {
        self.properties.insert(name.into(), node);
    }

    /// The most recently added property
    pub fn last_property(&self) -> Option<(&str, SchemaRef)> {
        self.properties
            .last()
            .map(|(name, node)| (name.as_str(), node.clone()))
    }

    /// Definition by name
    pub fn definition(&self, name: &str) -> Option<SchemaRef> {
        self.definitions.get(name).cloned()
    }

    /// Add a definition
    pub fn set_definition(&mut self, name: impl Into<String>, node: SchemaRef) {
        self.definitions.insert(name.into(), node);
    }

    /// Append to `required` unless already listed
    pub fn add_required(&mut self, name: &str) {
        if !self.required.iter().any(|r| r == name) {
            self.required.push(name.to_string());
        }
    }

    /// Add a property for an XML attribute (first letter lowercased)
    pub fn add_attribute_property(&mut self, name: &str, node: SchemaRef, required: bool) {
        let name = names::lower_case_first_letter(name);
        if required {
            self.add_required(&name);
        }
        self.set_property(name, node);
    }

    /// Express inheritance as `allOf: [$ref base, extension]`
    ///
    /// Returns the extension node for the caller to populate.
    pub fn extend(
        &mut self,
        base: Option<&SchemaRef>,
        primitive: Option<JsonSchemaType>,
    ) -> Result<SchemaRef> {
        let base = base.ok_or_else(|| Error::contract("extend() requires a base type"))?;
        let extension = SchemaRef::new(JsonSchema {
            schema_type: primitive,
            ..JsonSchema::default()
        });
        self.all_of.push(base.to_reference());
        self.all_of.push(extension.clone());
        Ok(extension)
    }

    /// Expose a type as a property that is required in one `anyOf` branch
    pub fn add_required_any_of_property_by_reference(
        &mut self,
        name: &str,
        node: &SchemaRef,
    ) -> Result<()> {
        if self.properties.contains_key(name) {
            return Err(Error::contract(format!(
                "property '{}' is already defined with a different type",
                name
            )));
        }
        let mut alternative = JsonSchema::new();
        alternative.add_required(name);
        self.any_of.push(SchemaRef::new(alternative));
        self.set_property(name, node.to_reference());
        Ok(())
    }

    /// True when `name` has a property dependency
    pub fn is_property_dependency_defined(&self, name: &str) -> bool {
        matches!(self.dependencies.get(name), Some(Dependency::Property(_)))
    }

    /// True when `name` has a schema dependency
    pub fn is_schema_dependency_defined(&self, name: &str) -> bool {
        matches!(self.dependencies.get(name), Some(Dependency::Schema(_)))
    }

    /// Add a property dependency; any existing dependency for `name` is an error
    pub fn add_property_dependency(&mut self, name: &str, properties: Vec<String>) -> Result<()> {
        if self.dependencies.contains_key(name) {
            return Err(Error::contract(format!(
                "a dependency named '{}' is already defined",
                name
            )));
        }
        self.dependencies
            .insert(name.to_string(), Dependency::Property(properties));
        Ok(())
    }

    /// Append one name to a property dependency, creating it when needed
    pub fn append_property_dependency(&mut self, name: &str, property: &str) -> Result<()> {
        match self.dependencies.get_mut(name) {
            Some(Dependency::Property(list)) => {
                if !list.iter().any(|p| p == property) {
                    list.push(property.to_string());
                }
                Ok(())
            }
            Some(Dependency::Schema(_)) => Err(Error::contract(format!(
                "'{}' already has a schema dependency",
                name
            ))),
            None => self.add_property_dependency(name, vec![property.to_string()]),
        }
    }

    /// Add a schema dependency; any existing dependency for `name` is an error
    pub fn add_schema_dependency(&mut self, name: &str, schema: SchemaRef) -> Result<()> {
        if self.dependencies.contains_key(name) {
            return Err(Error::contract(format!(
                "a dependency named '{}' is already defined",
                name
            )));
        }
        self.dependencies
            .insert(name.to_string(), Dependency::Schema(schema));
        Ok(())
    }

    /// Drop blank members of `allOf`, `anyOf` and `oneOf`
    pub fn remove_empty_schemas(&mut self) {
        for list in [&mut self.all_of, &mut self.any_of, &mut self.one_of] {
            list.retain(|node| !node.borrow().is_blank());
        }
    }

    /// The `info` object, created on first use
    pub fn info_mut(&mut self) -> &mut MessageInfo {
        self.info.get_or_insert_with(MessageInfo::default)
    }

    /// `totalDigits`: bounds of ±(10^N - 1), scaled when `multipleOf` is fractional
    pub fn apply_total_digits(&mut self, digits: u32) -> Result<()> {
        let bound = digits_bound(digits)?;
        self.total_digits = Some(digits);
        let bound = match self.multiple_of {
            Some(step) if !step.fract().is_zero() => bound * step,
            _ => bound,
        };
        self.maximum = Some(bound);
        self.minimum = Some(-bound);
        Ok(())
    }

    /// `fractionDigits`: `multipleOf` of 10^-N, rescaling totalDigits bounds
    pub fn apply_fraction_digits(&mut self, digits: u32) -> Result<()> {
        let step = Decimal::try_new(1, digits)
            .map_err(|_| Error::value(format!("fractionDigits {} is out of range", digits)))?;
        self.multiple_of = Some(step);
        if let Some(total) = self.total_digits {
            let bound = digits_bound(total)? * step;
            self.maximum = Some(bound);
            self.minimum = Some(-bound);
        }
        Ok(())
    }
}

/// 10^N - 1
fn digits_bound(digits: u32) -> Result<Decimal> {
    (0..digits)
        .try_fold(Decimal::ONE, |acc, _| acc.checked_mul(Decimal::TEN))
        .map(|power| power - Decimal::ONE)
        .ok_or_else(|| Error::value(format!("totalDigits {} is out of range", digits)))
}

/// Shared, mutable handle to a [`JsonSchema`]
#[derive(Clone)]
pub struct SchemaRef(Rc<RefCell<JsonSchema>>);

impl fmt::Debug for SchemaRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.0.try_borrow() {
            Ok(schema) => schema.fmt(f),
            Err(_) => f.write_str("SchemaRef(<borrowed>)"),
        }
    }
}

impl From<JsonSchema> for SchemaRef {
    fn from(schema: JsonSchema) -> Self {
        SchemaRef::new(schema)
    }
}

impl SchemaRef {
    /// Wrap a node
    pub fn new(schema: JsonSchema) -> Self {
        SchemaRef(Rc::new(RefCell::new(schema)))
    }

    /// A blank node
    pub fn blank() -> Self {
        Self::new(JsonSchema::new())
    }

    /// A node with only `type` set
    pub fn of_type(schema_type: JsonSchemaType) -> Self {
        Self::new(JsonSchema::of_type(schema_type))
    }

    /// Create a node, a whole root document when a base filename is given
    ///
    /// Root documents get `id` (`base_id` with its file name replaced by
    /// `<stem>.json`), `$schema`, a generated title, `type: object` and
    /// one nested subschema per target namespace segment.
    pub fn create(options: SchemaOptions) -> Result<Self> {
        let mut schema = JsonSchema::new();

        if let Some(base_filename) = options.base_filename.as_deref() {
            let stem = Path::new(base_filename)
                .file_stem()
                .and_then(|s| s.to_str())
                .unwrap_or(base_filename);
            let filename = format!("{}.json", stem);
            schema.id = Some(match options.base_id.as_deref() {
                Some(base) => Url::parse(base)?.join(&filename)?.to_string(),
                None => filename.clone(),
            });
            schema.filename = Some(filename);
            schema.schema = Some(DRAFT_04_SCHEMA.to_string());
            schema.title = Some(format!(
                "This JSON Schema file was generated from {} on {}.  For more information please see http://www.xsd2jsonschema.org",
                base_filename,
                chrono::Local::now().format("%a %b %d %Y %H:%M:%S %z")
            ));
            schema.schema_type = Some(JsonSchemaType::Object);
        }
        schema.target_namespace = options.target_namespace;
        if let Some(title) = options.title {
            schema.title = Some(title);
        }
        schema.pointer = options.pointer;
        schema.dollar_ref = options.dollar_ref;

        let node = SchemaRef::new(schema);
        node.initialize_sub_schemas();
        Ok(node)
    }

    fn initialize_sub_schemas(&self) {
        let segments = match self.borrow().target_namespace.as_deref() {
            Some(ns) => names::namespace_segments(ns),
            None => return,
        };
        let mut container = self.clone();
        for segment in &segments {
            let child = SchemaRef::blank();
            container
                .borrow_mut()
                .sub_schemas
                .insert(segment.clone(), child.clone());
            container = child;
        }
        self.borrow_mut().target_path = segments;
    }

    /// Immutable access
    pub fn borrow(&self) -> Ref<'_, JsonSchema> {
        self.0.borrow()
    }

    /// Mutable access
    pub fn borrow_mut(&self) -> RefMut<'_, JsonSchema> {
        self.0.borrow_mut()
    }

    /// True when both handles point at the same node
    pub fn ptr_eq(&self, other: &SchemaRef) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }

    /// The innermost namespace container (the node itself when there is none)
    pub fn target(&self) -> SchemaRef {
        let path = self.borrow().target_path.clone();
        let mut current = self.clone();
        for segment in &path {
            let next = current.borrow().sub_schemas.get(segment).cloned();
            match next {
                Some(node) => current = node,
                None => break,
            }
        }
        current
    }

    /// Insert a subschema under the target container
    pub fn add_sub_schema(&self, name: impl Into<String>, node: SchemaRef) {
        self.target().borrow_mut().sub_schemas.insert(name.into(), node);
    }

    /// Find a subschema by name anywhere below this node
    pub fn sub_schema(&self, name: &str) -> Option<SchemaRef> {
        let schema = self.borrow();
        if let Some(found) = schema.sub_schemas.get(name) {
            return Some(found.clone());
        }
        schema.sub_schemas.values().find_map(|child| child.sub_schema(name))
    }

    /// Subschema collecting schema-level attributes, created on first use
    pub fn global_attributes_schema(&self) -> SchemaRef {
        let target = self.target();
        let existing = target
            .borrow()
            .sub_schemas
            .get(GLOBAL_ATTRIBUTES_SCHEMA_NAME)
            .cloned();
        existing.unwrap_or_else(|| {
            let node = SchemaRef::of_type(JsonSchemaType::Object);
            target
                .borrow_mut()
                .sub_schemas
                .insert(GLOBAL_ATTRIBUTES_SCHEMA_NAME.to_string(), node.clone());
            node
        })
    }

    /// A `$ref` node for a named node, or the node itself when anonymous
    pub fn to_reference(&self) -> SchemaRef {
        self.to_reference_from(None)
    }

    /// Like [`to_reference`](Self::to_reference), seen from document `site`
    ///
    /// Nodes defined by another document get that document's `id` in
    /// front of the pointer.
    pub fn to_reference_from(&self, site: Option<&str>) -> SchemaRef {
        let schema = self.borrow();
        let Some(pointer) = schema.pointer.as_deref() else {
            return self.clone();
        };
        let dollar_ref = match (schema.definition_site.as_deref(), site) {
            (Some(defined_in), Some(site)) if defined_in != site => {
                format!("{}{}", defined_in, pointer)
            }
            _ => pointer.to_string(),
        };
        SchemaRef::new(JsonSchema {
            dollar_ref: Some(dollar_ref),
            schema_type: Some(schema.schema_type.unwrap_or(JsonSchemaType::Object)),
            ..JsonSchema::default()
        })
    }

    /// Recursive value copy of the whole subtree
    pub fn deep_clone(&self) -> SchemaRef {
        let source = self.borrow();
        let mut copy = source.clone();
        copy.items = source.items.as_ref().map(|items| match items {
            Items::Single(node) => Items::Single(node.deep_clone()),
            Items::Tuple(nodes) => Items::Tuple(deep_list(nodes)),
        });
        copy.additional_items = source.additional_items.as_ref().map(deep_additional);
        copy.additional_properties = source.additional_properties.as_ref().map(deep_additional);
        copy.properties = deep_map(&source.properties);
        copy.pattern_properties = deep_map(&source.pattern_properties);
        copy.dependencies = source
            .dependencies
            .iter()
            .map(|(name, dep)| {
                let dep = match dep {
                    Dependency::Property(list) => Dependency::Property(list.clone()),
                    Dependency::Schema(node) => Dependency::Schema(node.deep_clone()),
                };
                (name.clone(), dep)
            })
            .collect();
        copy.all_of = deep_list(&source.all_of);
        copy.any_of = deep_list(&source.any_of);
        copy.one_of = deep_list(&source.one_of);
        copy.not = source.not.as_ref().map(SchemaRef::deep_clone);
        copy.definitions = deep_map(&source.definitions);
        copy.sub_schemas = deep_map(&source.sub_schemas);
        SchemaRef::new(copy)
    }

    /// Drop blank composition members of this node
    pub fn remove_empty_schemas(&self) {
        self.borrow_mut().remove_empty_schemas();
    }
}

fn deep_list(nodes: &[SchemaRef]) -> Vec<SchemaRef> {
    nodes.iter().map(SchemaRef::deep_clone).collect()
}

fn deep_map(map: &IndexMap<String, SchemaRef>) -> IndexMap<String, SchemaRef> {
    map.iter()
        .map(|(name, node)| (name.clone(), node.deep_clone()))
        .collect()
}

fn deep_additional(additional: &Additional) -> Additional {
    match additional {
        Additional::Allowed(allowed) => Additional::Allowed(*allowed),
        Additional::Schema(node) => Additional::Schema(node.deep_clone()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    fn root() -> SchemaRef {
        SchemaRef::create(
            SchemaOptions::new()
                .with_base_filename("Financing_1_000.xsd")
                .with_base_id("http://www.xsd2jsonschema.org/unittests/")
                .with_target_namespace("http://www.xsd2jsonschema.org/example"),
        )
        .unwrap()
    }

    #[test]
    fn test_create_root_document() {
        let node = root();
        let schema = node.borrow();
        assert_eq!(schema.filename(), Some("Financing_1_000.json"));
        assert_eq!(
            schema.id.as_deref(),
            Some("http://www.xsd2jsonschema.org/unittests/Financing_1_000.json")
        );
        assert_eq!(schema.schema.as_deref(), Some(DRAFT_04_SCHEMA));
        assert_eq!(schema.schema_type, Some(JsonSchemaType::Object));
        assert!(schema
            .title
            .as_deref()
            .unwrap()
            .starts_with("This JSON Schema file was generated from Financing_1_000.xsd"));
        assert_eq!(schema.target_path(), ["example".to_string()]);
        assert!(schema.sub_schemas.contains_key("example"));
    }

    #[test]
    fn test_id_replaces_base_file_name() {
        let node = SchemaRef::create(
            SchemaOptions::new()
                .with_base_filename("Bank_1_000.xsd")
                .with_base_id("http://www.xsd2jsonschema.org/defaultBaseId"),
        )
        .unwrap();
        assert_eq!(
            node.borrow().id.as_deref(),
            Some("http://www.xsd2jsonschema.org/Bank_1_000.json")
        );
    }

    #[test]
    fn test_add_sub_schema_goes_to_target() {
        let node = root();
        node.add_sub_schema("BusinessContent", SchemaRef::of_type(JsonSchemaType::Object));

        assert!(!node.borrow().sub_schemas.contains_key("BusinessContent"));
        let example = node.borrow().sub_schemas["example"].clone();
        assert!(example.borrow().sub_schemas.contains_key("BusinessContent"));
        assert!(node.sub_schema("BusinessContent").is_some());
        let pointer = crate::converters::element_pointer(
            node.borrow().target_namespace.as_deref(),
            "BusinessContent",
        );
        assert_eq!(pointer, "#/example/BusinessContent");
        let serialized = node.to_json().unwrap();
        assert!(serialized.pointer(&pointer[1..]).is_some());
    }

    #[test]
    fn test_blankness() {
        assert!(JsonSchema::new().is_blank());
        assert!(!JsonSchema::of_type(JsonSchemaType::String).is_blank());
        let mut schema = JsonSchema::new();
        schema.exclusive_minimum = true;
        assert!(!schema.is_blank());
        assert!(!root().borrow().is_blank());
    }

    #[test]
    fn test_set_property_overwrites() {
        let mut schema = JsonSchema::new();
        schema.set_property("Code", SchemaRef::of_type(JsonSchemaType::String));
        schema.set_property("Code", SchemaRef::of_type(JsonSchemaType::Integer));
        assert_eq!(schema.properties.len(), 1);
        assert_eq!(
            schema.property("Code").unwrap().borrow().schema_type,
            Some(JsonSchemaType::Integer)
        );
    }

    #[test]
    fn test_add_required_once() {
        let mut schema = JsonSchema::new();
        schema.add_required("Code");
        schema.add_required("Name");
        schema.add_required("Code");
        assert_eq!(schema.required, vec!["Code", "Name"]);
    }

    #[test]
    fn test_attribute_property_is_lowercased() {
        let mut schema = JsonSchema::new();
        schema.add_attribute_property("Version", SchemaRef::of_type(JsonSchemaType::String), true);
        assert!(schema.property("version").is_some());
        assert_eq!(schema.required, vec!["version"]);
    }

    #[test]
    fn test_extend() {
        let base = SchemaRef::create(
            SchemaOptions::new().with_pointer("#/definitions/PartyType"),
        )
        .unwrap();
        let mut derived = JsonSchema::new();
        let extension = derived
            .extend(Some(&base), Some(JsonSchemaType::Object))
            .unwrap();

        assert_eq!(derived.all_of.len(), 2);
        assert_eq!(
            derived.all_of[0].borrow().dollar_ref.as_deref(),
            Some("#/definitions/PartyType")
        );
        assert!(derived.all_of[1].ptr_eq(&extension));
        assert!(matches!(derived.extend(None, None), Err(Error::Contract(_))));
    }

    #[test]
    fn test_required_any_of_property_by_reference() {
        let node = SchemaRef::create(SchemaOptions::new().with_pointer("#/example/Order")).unwrap();
        let mut schema = JsonSchema::new();
        schema
            .add_required_any_of_property_by_reference("Order", &node)
            .unwrap();

        assert_eq!(schema.any_of.len(), 1);
        assert_eq!(schema.any_of[0].borrow().required, vec!["Order"]);
        assert_eq!(
            schema.property("Order").unwrap().borrow().dollar_ref.as_deref(),
            Some("#/example/Order")
        );
        assert!(matches!(
            schema.add_required_any_of_property_by_reference("Order", &node),
            Err(Error::Contract(_))
        ));
    }

    #[test]
    fn test_dependencies_are_guarded() {
        let mut schema = JsonSchema::new();
        schema.add_property_dependency("Card", vec!["Billing".into()]).unwrap();
        assert!(schema.is_property_dependency_defined("Card"));
        assert!(schema.add_property_dependency("Card", vec!["Other".into()]).is_err());
        assert!(schema.add_schema_dependency("Card", SchemaRef::blank()).is_err());

        schema.append_property_dependency("Card", "Shipping").unwrap();
        match &schema.dependencies["Card"] {
            Dependency::Property(list) => assert_eq!(list, &vec!["Billing", "Shipping"]),
            Dependency::Schema(_) => panic!("expected a property dependency"),
        }

        schema.add_schema_dependency("Bank", SchemaRef::blank()).unwrap();
        assert!(schema.is_schema_dependency_defined("Bank"));
        assert!(schema.add_property_dependency("Bank", vec![]).is_err());
        assert!(schema.append_property_dependency("Bank", "Agency").is_err());
    }

    #[test]
    fn test_remove_empty_schemas() {
        let mut schema = JsonSchema::new();
        schema.all_of = vec![
            SchemaRef::blank(),
            SchemaRef::of_type(JsonSchemaType::String),
            SchemaRef::blank(),
            SchemaRef::blank(),
        ];
        schema.any_of = vec![SchemaRef::blank(), SchemaRef::blank()];
        schema.remove_empty_schemas();

        assert_eq!(schema.all_of.len(), 1);
        assert!(schema.any_of.is_empty());
    }

    #[test]
    fn test_total_digits() {
        let mut schema = JsonSchema::of_type(JsonSchemaType::Number);
        schema.apply_total_digits(10).unwrap();
        assert_eq!(schema.maximum, Some(dec("9999999999")));
        assert_eq!(schema.minimum, Some(dec("-9999999999")));
    }

    #[test]
    fn test_total_and_fraction_digits_in_either_order() {
        let mut schema = JsonSchema::of_type(JsonSchemaType::Number);
        schema.apply_total_digits(10).unwrap();
        schema.apply_fraction_digits(2).unwrap();
        assert_eq!(schema.maximum, Some(dec("99999999.99")));
        assert_eq!(schema.minimum, Some(dec("-99999999.99")));
        assert_eq!(schema.multiple_of, Some(dec("0.01")));

        let mut schema = JsonSchema::of_type(JsonSchemaType::Number);
        schema.apply_fraction_digits(2).unwrap();
        schema.apply_total_digits(10).unwrap();
        assert_eq!(schema.maximum, Some(dec("99999999.99")));
    }

    #[test]
    fn test_digits_out_of_range() {
        let mut schema = JsonSchema::new();
        assert!(schema.apply_total_digits(40).is_err());
        assert!(schema.apply_fraction_digits(40).is_err());
    }

    #[test]
    fn test_to_reference() {
        let anonymous = SchemaRef::of_type(JsonSchemaType::String);
        assert!(anonymous.to_reference().ptr_eq(&anonymous));

        let named = SchemaRef::create(SchemaOptions::new().with_pointer("#/definitions/Code")).unwrap();
        named.borrow_mut().definition_site = Some("http://x/commons.json".into());
        let local = named.to_reference_from(Some("http://x/commons.json"));
        assert_eq!(local.borrow().dollar_ref.as_deref(), Some("#/definitions/Code"));
        assert_eq!(local.borrow().schema_type, Some(JsonSchemaType::Object));
        let remote = named.to_reference_from(Some("http://x/Order.json"));
        assert_eq!(
            remote.borrow().dollar_ref.as_deref(),
            Some("http://x/commons.json#/definitions/Code")
        );
    }

    #[test]
    fn test_deep_clone_is_independent() {
        let original = root();
        original
            .target()
            .borrow_mut()
            .set_property("Code", SchemaRef::of_type(JsonSchemaType::String));

        let copy = original.deep_clone();
        copy.target()
            .borrow()
            .property("Code")
            .unwrap()
            .borrow_mut()
            .schema_type = Some(JsonSchemaType::Integer);

        assert!(!copy.target().ptr_eq(&original.target()));
        assert_eq!(
            original.target().borrow().property("Code").unwrap().borrow().schema_type,
            Some(JsonSchemaType::String)
        );
    }

    #[test]
    fn test_global_attributes_schema_is_created_once() {
        let node = root();
        let first = node.global_attributes_schema();
        let second = node.global_attributes_schema();
        assert!(first.ptr_eq(&second));
        assert!(node.sub_schema(GLOBAL_ATTRIBUTES_SCHEMA_NAME).is_some());
    }
}
