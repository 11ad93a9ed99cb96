//! JSON Schema draft-04 document model
//!
//! Nodes are mutable and shared: a named type lives in `definitions`, in the
//! namespace manager's type table and on the parsing state stack at the
//! same time, so every node sits behind a [`SchemaRef`] handle.
//!
//! Two vendor extensions ride along with the draft-04 keywords: `x-totvs`
//! (per-product field documentation) and `info` (message documentation).

pub mod formats;
mod schema;
mod serialize;
mod xtotvs;

pub use schema::{Additional, Dependency, Items, JsonSchema, SchemaOptions, SchemaRef};
pub use xtotvs::{
    MessageDocumentation, MessageInfo, ProductInformation, XTotvsMessage, XTotvsRecord,
};

use serde::Serialize;
use std::fmt;

/// `$schema` URI written on every root document
pub const DRAFT_04_SCHEMA: &str = "http://json-schema.org/draft-04/schema#";

/// Name of the subschema collecting schema-level attributes
pub const GLOBAL_ATTRIBUTES_SCHEMA_NAME: &str = "globalAttributes";

/// The seven draft-04 primitive types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum JsonSchemaType {
    /// object
    Object,
    /// array
    Array,
    /// string
    String,
    /// number
    Number,
    /// integer
    Integer,
    /// boolean
    Boolean,
    /// null
    Null,
}

impl JsonSchemaType {
    /// Keyword value as written in a schema
    pub fn as_str(&self) -> &'static str {
        match self {
            JsonSchemaType::Object => "object",
            JsonSchemaType::Array => "array",
            JsonSchemaType::String => "string",
            JsonSchemaType::Number => "number",
            JsonSchemaType::Integer => "integer",
            JsonSchemaType::Boolean => "boolean",
            JsonSchemaType::Null => "null",
        }
    }

    /// True for `number` and `integer`
    pub fn is_numeric(&self) -> bool {
        matches!(self, JsonSchemaType::Number | JsonSchemaType::Integer)
    }
}

impl fmt::Display for JsonSchemaType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
