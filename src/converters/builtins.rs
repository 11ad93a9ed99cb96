//! XSD built-in types
//!
//! Maps the built-in types of the XML Schema namespace onto a JSON Schema
//! `type` and, where one applies, a `format`.

use crate::jsonschema::{formats, JsonSchema, JsonSchemaType, SchemaRef};

// =============================================================================
// Built-in Type Definition
// =============================================================================

/// JSON Schema rendition of one built-in XSD type
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BuiltinType {
    /// Type name (local name without namespace)
    pub name: &'static str,
    /// JSON Schema `type` (None for `anyType`)
    pub schema_type: Option<JsonSchemaType>,
    /// JSON Schema `format`
    pub format: Option<&'static str>,
}

impl BuiltinType {
    const fn new(
        name: &'static str,
        schema_type: Option<JsonSchemaType>,
        format: Option<&'static str>,
    ) -> Self {
        Self {
            name,
            schema_type,
            format,
        }
    }

    /// A fresh node carrying this type's `type` and `format`
    pub fn to_schema(&self) -> SchemaRef {
        SchemaRef::new(JsonSchema {
            schema_type: self.schema_type,
            format: self.format.map(str::to_string),
            ..JsonSchema::default()
        })
    }

    /// True for `number` and `integer` renditions
    pub fn is_numeric(&self) -> bool {
        self.schema_type.map_or(false, |t| t.is_numeric())
    }
}

const STRING: Option<JsonSchemaType> = Some(JsonSchemaType::String);
const INTEGER: Option<JsonSchemaType> = Some(JsonSchemaType::Integer);
const NUMBER: Option<JsonSchemaType> = Some(JsonSchemaType::Number);

// =============================================================================
// Built-in Type Table
// =============================================================================

static BUILTIN_TYPES: &[BuiltinType] = &[
    // String types
    BuiltinType::new("string", STRING, None),
    BuiltinType::new("normalizedString", STRING, None),
    BuiltinType::new("token", STRING, None),
    BuiltinType::new("language", STRING, None),
    BuiltinType::new("Name", STRING, None),
    BuiltinType::new("NCName", STRING, None),
    BuiltinType::new("QName", STRING, None),
    BuiltinType::new("NOTATION", STRING, None),
    BuiltinType::new("ID", STRING, None),
    BuiltinType::new("IDREF", STRING, None),
    BuiltinType::new("IDREFS", STRING, None),
    BuiltinType::new("ENTITY", STRING, None),
    BuiltinType::new("ENTITIES", STRING, None),
    BuiltinType::new("NMTOKEN", STRING, None),
    BuiltinType::new("NMTOKENS", STRING, None),
    BuiltinType::new("hexBinary", STRING, None),
    BuiltinType::new("base64Binary", STRING, Some(formats::BYTE)),
    BuiltinType::new("anyURI", STRING, Some(formats::URI)),
    BuiltinType::new("anySimpleType", STRING, None),
    // Date and time types
    BuiltinType::new("date", STRING, Some(formats::DATE)),
    BuiltinType::new("dateTime", STRING, Some(formats::DATE_TIME)),
    BuiltinType::new("time", STRING, None),
    BuiltinType::new("duration", STRING, None),
    BuiltinType::new("gYear", STRING, None),
    BuiltinType::new("gYearMonth", STRING, None),
    BuiltinType::new("gMonth", STRING, None),
    BuiltinType::new("gMonthDay", STRING, None),
    BuiltinType::new("gDay", STRING, None),
    // Integer types
    BuiltinType::new("int", INTEGER, Some(formats::INT32)),
    BuiltinType::new("integer", INTEGER, None),
    BuiltinType::new("long", INTEGER, None),
    BuiltinType::new("short", INTEGER, None),
    BuiltinType::new("byte", INTEGER, None),
    BuiltinType::new("nonNegativeInteger", INTEGER, None),
    BuiltinType::new("positiveInteger", INTEGER, None),
    BuiltinType::new("nonPositiveInteger", INTEGER, None),
    BuiltinType::new("negativeInteger", INTEGER, None),
    BuiltinType::new("unsignedLong", INTEGER, None),
    BuiltinType::new("unsignedInt", INTEGER, None),
    BuiltinType::new("unsignedShort", INTEGER, None),
    BuiltinType::new("unsignedByte", INTEGER, None),
    // Other numeric types
    BuiltinType::new("decimal", NUMBER, None),
    BuiltinType::new("float", NUMBER, Some(formats::FLOAT)),
    BuiltinType::new("double", NUMBER, Some(formats::DOUBLE)),
    // Everything else
    BuiltinType::new("boolean", Some(JsonSchemaType::Boolean), None),
    BuiltinType::new("anyType", None, None),
];

/// Get a built-in type by local name
pub fn get_builtin_type(name: &str) -> Option<&'static BuiltinType> {
    BUILTIN_TYPES.iter().find(|t| t.name == name)
}

/// True when `name` is the local name of a built-in type
pub fn is_builtin(name: &str) -> bool {
    get_builtin_type(name).is_some()
}

/// A fresh node for a built-in type
pub fn builtin_schema(name: &str) -> Option<SchemaRef> {
    get_builtin_type(name).map(BuiltinType::to_schema)
}

// =============================================================================
// Tests
// =============================================================================
