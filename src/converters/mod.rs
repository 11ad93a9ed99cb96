//! XSD to JSON Schema converters
//!
//! This module provides the visitors driven by
//! [`DepthFirstTraversal`](crate::traversal::DepthFirstTraversal):
//!
//! - [`BaseConverter`]: builds a JSON Schema document, one handler per
//!   recognised construct (see [`XsdTag`])
//! - [`XmlUsageVisitor`]: counts how often each tag is used
//!
//! Handlers share a [`ParsingState`] stack and a [`NamespaceManager`]; a
//! converter is created fresh for every top-level file.

mod base;
pub mod builtins;
mod namespace_manager;
mod parsing_state;
mod totvs;
mod usage;

pub use base::{BaseConverter, MaxOccurs};
pub use namespace_manager::{definition_pointer, element_pointer, Namespace, NamespaceManager};
pub use parsing_state::{ParsingState, StateFrame};
pub use usage::{XmlUsageVisitor, SUMMED_KEY};

use std::fmt;

/// Every construct the base converter has a handler for
///
/// Dispatch is by local name, so `xs:element` and `xsd:element` are the
/// same tag. Vendor tags are capitalised, which keeps `Length` and `Field`
/// apart from the XSD `length` facet and `field` identity selector.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum XsdTag {
    // Structure
    /// `schema`
    Schema,
    /// `complexType`
    ComplexType,
    /// `simpleType`
    SimpleType,
    /// `sequence`
    Sequence,
    /// `choice`
    Choice,
    /// `all`
    All,
    /// `element`
    Element,
    /// `attribute`
    Attribute,
    /// `complexContent`
    ComplexContent,
    /// `simpleContent`
    SimpleContent,
    /// `restriction`
    Restriction,
    /// `extension`
    Extension,
    /// `any`
    Any,
    /// `anyAttribute`
    AnyAttribute,
    /// `include`
    Include,
    /// `import`
    Import,
    /// `notation`
    Notation,
    /// `unique`
    Unique,
    /// `key`
    Key,
    /// `keyref`
    KeyRef,

    // Facets
    /// `enumeration`
    Enumeration,
    /// `pattern`
    Pattern,
    /// `length`
    Length,
    /// `minLength`
    MinLength,
    /// `maxLength`
    MaxLength,
    /// `minInclusive`
    MinInclusive,
    /// `maxInclusive`
    MaxInclusive,
    /// `minExclusive`
    MinExclusive,
    /// `maxExclusive`
    MaxExclusive,
    /// `totalDigits`
    TotalDigits,
    /// `fractionDigits`
    FractionDigits,
    /// `whiteSpace`
    WhiteSpace,

    // Annotations
    /// `annotation`
    Annotation,
    /// `documentation`
    Documentation,
    /// `appinfo`
    AppInfo,

    // Vendor documentation
    /// `MessageDocumentation`
    MessageDocumentation,
    /// `Name`
    Name,
    /// `Description`
    Description,
    /// `Note`
    Note,
    /// `Segment`
    Segment,
    /// `ProductInformation`
    ProductInformation,
    /// `Contact`
    Contact,
    /// `Adapter`
    Adapter,
    /// `Send`
    Send,
    /// `Receive`
    Receive,
    /// `FieldDocumentation`
    FieldDocumentation,
    /// `Field`
    Field,
    /// `Required`
    Required,
    /// `Type`
    Type,
    /// `Length` (vendor)
    FieldLength,
}

impl XsdTag {
    /// Map a local name to its tag; `None` for constructs without a handler
    pub fn from_local_name(name: &str) -> Option<Self> {
        use XsdTag::*;
        let tag = match name {
            "schema" => Schema,
            "complexType" => ComplexType,
            "simpleType" => SimpleType,
            "sequence" => Sequence,
            "choice" => Choice,
            "all" => All,
            "element" => Element,
            "attribute" => Attribute,
            "complexContent" => ComplexContent,
            "simpleContent" => SimpleContent,
            "restriction" => Restriction,
            "extension" => Extension,
            "any" => Any,
            "anyAttribute" => AnyAttribute,
            "include" => Include,
            "import" => Import,
            "notation" => Notation,
            "unique" => Unique,
            "key" => Key,
            "keyref" => KeyRef,
            "enumeration" => Enumeration,
            "pattern" => Pattern,
            "length" => Length,
            "minLength" => MinLength,
            "maxLength" => MaxLength,
            "minInclusive" => MinInclusive,
            "maxInclusive" => MaxInclusive,
            "minExclusive" => MinExclusive,
            "maxExclusive" => MaxExclusive,
            "totalDigits" => TotalDigits,
            "fractionDigits" => FractionDigits,
            "whiteSpace" => WhiteSpace,
            "annotation" => Annotation,
            "documentation" => Documentation,
            "appinfo" => AppInfo,
            "MessageDocumentation" => MessageDocumentation,
            "Name" => Name,
            "Description" => Description,
            "Note" => Note,
            "Segment" => Segment,
            "ProductInformation" => ProductInformation,
            "Contact" => Contact,
            "Adapter" => Adapter,
            "Send" => Send,
            "Receive" => Receive,
            "FieldDocumentation" => FieldDocumentation,
            "Field" => Field,
            "Required" => Required,
            "Type" => Type,
            "Length" => FieldLength,
            _ => return None,
        };
        Some(tag)
    }

    /// True for the TOTVS documentation tags
    pub fn is_vendor(&self) -> bool {
        use XsdTag::*;
        matches!(
            self,
            MessageDocumentation
                | Name
                | Description
                | Note
                | Segment
                | ProductInformation
                | Contact
                | Adapter
                | Send
                | Receive
                | FieldDocumentation
                | Field
                | Required
                | Type
                | FieldLength
        )
    }
}

impl fmt::Display for XsdTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}", self)
    }
}
