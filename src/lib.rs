//! # xsd2jsonschema
//!
//! Converts XML Schema (XSD) files into JSON Schema draft-04 documents,
//! carrying the TOTVS message documentation found in `xs:appinfo` blocks as
//! the `x-totvs` and `info` vendor extensions.
//!
//! ## Features
//!
//! - One JSON document per XSD file, named types under `definitions` and
//!   global elements under a subschema per target namespace segment
//! - Forward type references resolved within a file and across its includes
//! - `ListOf` wrapper elements and types expressed as arrays
//! - `totalDigits`/`fractionDigits` turned into exact numeric bounds
//! - Optional OpenAPI 3 shaping of the output
//! - Protection against oversized sources and runaway nesting
//!
//! ## Example
//!
//! ```rust,no_run
//! use xsd2jsonschema::{ConversionOptions, Xsd2JsonSchema};
//!
//! let options = ConversionOptions::new()
//!     .with_xsd_base_dir("schemas")
//!     .with_output_dir("json");
//! let mut x2j = Xsd2JsonSchema::new(options);
//! let failures = x2j.process_all_schemas(&["Financing_1_000.xsd"]);
//! assert!(failures.is_empty());
//! x2j.write_files()?;
//! # Ok::<(), xsd2jsonschema::Error>(())
//! ```
//!
//! The pieces can also be driven one document at a time:
//!
//! ```rust
//! use xsd2jsonschema::converters::BaseConverter;
//! use xsd2jsonschema::documents::XsdDocument;
//! use xsd2jsonschema::jsonschema::{SchemaOptions, SchemaRef};
//! use xsd2jsonschema::traversal::DepthFirstTraversal;
//!
//! let xsd = XsdDocument::from_string(
//!     "Order_1_000.xsd",
//!     r#"<xs:schema xmlns:xs="http://www.w3.org/2001/XMLSchema">
//!            <xs:simpleType name="Code">
//!                <xs:restriction base="xs:string"><xs:maxLength value="5"/></xs:restriction>
//!            </xs:simpleType>
//!        </xs:schema>"#,
//! )?;
//! let json_schema = SchemaRef::create(
//!     SchemaOptions::new().with_base_filename(xsd.base_filename.clone()),
//! )?;
//! DepthFirstTraversal::new().traverse(&mut BaseConverter::new(), &json_schema, &xsd)?;
//! let json = json_schema.to_json()?;
//! assert_eq!(json["definitions"]["Code"]["maxLength"], 5);
//! # Ok::<(), xsd2jsonschema::Error>(())
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

// Foundation
pub mod error;
pub mod limits;

// Names and namespaces
pub mod names;
pub mod namespaces;

// Source documents
pub mod documents;
pub mod loaders;
pub mod xpath;

// Output model
pub mod jsonschema;

// Conversion
pub mod converters;
pub mod traversal;

// Batch processing and output shaping
pub mod openapi;
pub mod xsd2jsonschema;

// Re-exports for convenience
pub use error::{Error, Result};
pub use jsonschema::{JsonSchema, JsonSchemaType, SchemaRef};
pub use traversal::{DepthFirstTraversal, Visitor};
pub use xsd2jsonschema::{
    ConversionOptions, OutputFormat, Xsd2JsonSchema, DEFAULT_BASE_ID, DEFAULT_EXCLUDED,
};

/// Version of the xsd2jsonschema library
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// XSD namespace
pub const XSD_NAMESPACE: &str = namespaces::XSD_NAMESPACE;
