//! TOTVS vendor metadata carried on schema nodes
//!
//! `x-totvs` records document one field for one product; `info` documents
//! the whole message. Both are read from `xs:appinfo` blocks.

use serde::Serialize;

/// Affirmative token of the `Required` field ("sim" is Portuguese for yes)
const AFFIRMATIVE: &str = "sim";

fn is_false(value: &bool) -> bool {
    !*value
}

/// Field documentation for one product (`<FieldDocumentation product="...">`)
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct XTotvsRecord {
    product: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    field: Option<String>,
    required: bool,
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    field_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    length: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    description: Option<String>,
}

impl XTotvsRecord {
    /// A record for the given product with nothing documented yet
    pub fn new(product: impl Into<String>) -> Self {
        Self {
            product: product.into(),
            ..Self::default()
        }
    }

    /// Product key
    pub fn product(&self) -> &str {
        &self.product
    }

    /// Name of the field in the product's data model
    pub fn field(&self) -> Option<&str> {
        self.field.as_deref()
    }

    /// Set the field name
    pub fn set_field(&mut self, field: impl Into<String>) {
        self.field = Some(field.into());
    }

    /// Whether the product requires the field
    pub fn required(&self) -> bool {
        self.required
    }

    /// Normalize a `Required` token: only "sim" (any case) is true
    ///
    /// The token is taken as given; element text arrives already trimmed.
    pub fn set_required(&mut self, token: &str) {
        self.required = token.to_lowercase() == AFFIRMATIVE;
    }

    /// Type of the field in the product's data model
    pub fn field_type(&self) -> Option<&str> {
        self.field_type.as_deref()
    }

    /// Set the product field type
    pub fn set_field_type(&mut self, field_type: impl Into<String>) {
        self.field_type = Some(field_type.into());
    }

    /// Field length
    pub fn length(&self) -> Option<u32> {
        self.length
    }

    /// Set the field length
    pub fn set_length(&mut self, length: Option<u32>) {
        self.length = length;
    }

    /// Free text description
    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    /// Set the description
    pub fn set_description(&mut self, description: impl Into<String>) {
        self.description = Some(description.into());
    }
}

/// `info.x-totvs.messageDocumentation`
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct MessageDocumentation {
    /// Message name
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Message description
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Business segment
    #[serde(skip_serializing_if = "Option::is_none")]
    pub segment: Option<String>,
}

/// One entry of `info.x-totvs.productInformation`
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ProductInformation {
    /// Product key
    pub product: String,
    /// Contact for the product's adapter
    #[serde(skip_serializing_if = "Option::is_none")]
    pub contact: Option<String>,
    /// Product specific notes
    #[serde(skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
    /// Adapter name
    #[serde(skip_serializing_if = "Option::is_none")]
    pub adapter: Option<String>,
}

/// `info.x-totvs`
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct XTotvsMessage {
    /// Message level documentation (first block wins)
    #[serde(rename = "messageDocumentation", skip_serializing_if = "Option::is_none")]
    pub message_documentation: Option<MessageDocumentation>,
    /// Products exchanging the message, in document order
    #[serde(rename = "productInformation", skip_serializing_if = "Vec::is_empty")]
    pub product_information: Vec<ProductInformation>,
}

/// Root level `info` object
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct MessageInfo {
    /// Message title, from the file name
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    /// Message version, from the `_X_YYY` file name suffix
    #[serde(skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
    /// Vendor documentation
    #[serde(rename = "x-totvs")]
    pub x_totvs: XTotvsMessage,
    /// Set when a second MessageDocumentation block was found
    #[serde(rename = "_warningConversorAuto", skip_serializing_if = "is_false")]
    pub warning_conversor_auto: bool,
}

impl MessageInfo {
    /// The message documentation block, created on first use
    pub fn message_documentation_mut(&mut self) -> &mut MessageDocumentation {
        self.x_totvs
            .message_documentation
            .get_or_insert_with(MessageDocumentation::default)
    }

    /// The most recently opened product entry
    pub fn last_product_mut(&mut self) -> Option<&mut ProductInformation> {
        self.x_totvs.product_information.last_mut()
    }
}
