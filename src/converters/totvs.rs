//! Handlers for the TOTVS documentation tags found in `xs:appinfo`
//!
//! `MessageDocumentation` blocks at schema level fill the root `info`
//! object; `FieldDocumentation` blocks inside an element's annotation add
//! an `x-totvs` record to that element's node.

use super::base::BaseConverter;
use super::XsdTag;
use crate::documents::{Element, XsdDocument};
use crate::error::Result;
use crate::jsonschema::{ProductInformation, SchemaRef, XTotvsRecord};
use crate::names;

/// Element text, `None` when empty
fn text_of(node: &Element) -> Option<String> {
    let text = node.text();
    (!text.is_empty()).then_some(text)
}

impl BaseConverter {
    fn parent_name(&self) -> Option<&str> {
        self.parsing_state.parent().map(|f| f.name.as_str())
    }

    /// `MessageDocumentation`: title and version from the file name
    ///
    /// Only the first block of a document is converted; later ones set
    /// `_warningConversorAuto` and are pruned.
    pub(super) fn message_documentation(
        &mut self,
        json_schema: &SchemaRef,
        xsd: &XsdDocument,
    ) -> Result<bool> {
        let mut root = json_schema.borrow_mut();
        let info = root.info_mut();
        if info.x_totvs.message_documentation.is_some() {
            tracing::warn!(document = %xsd.uri, "duplicate MessageDocumentation block skipped");
            info.warning_conversor_auto = true;
            return Ok(false);
        }
        let (title, version) = names::parse_message_name(&xsd.base_filename);
        info.title = Some(title);
        info.version = version;
        info.message_documentation_mut();
        Ok(true)
    }

    /// `Name` and `Segment` of a MessageDocumentation block
    pub(super) fn message_field(
        &mut self,
        node: &Element,
        tag: XsdTag,
        json_schema: &SchemaRef,
    ) -> Result<bool> {
        if self.parent_name() != Some("MessageDocumentation") {
            tracing::debug!(%tag, path = %self.parsing_state.path(), "vendor tag outside MessageDocumentation ignored");
            return Ok(false);
        }
        let mut root = json_schema.borrow_mut();
        let documentation = root.info_mut().message_documentation_mut();
        match tag {
            XsdTag::Name => documentation.name = text_of(node),
            _ => documentation.segment = text_of(node),
        }
        Ok(false)
    }

    /// `Description` (or `Note`), routed by the enclosing vendor tag
    pub(super) fn description(&mut self, node: &Element, json_schema: &SchemaRef) -> Result<bool> {
        let Some(text) = text_of(node) else {
            return Ok(false);
        };
        match self.parent_name() {
            Some("MessageDocumentation") => {
                json_schema
                    .borrow_mut()
                    .info_mut()
                    .message_documentation_mut()
                    .description = Some(text);
            }
            Some("ProductInformation") => {
                if let Some(product) = json_schema.borrow_mut().info_mut().last_product_mut() {
                    product.note = Some(text);
                }
            }
            Some("FieldDocumentation") => {
                self.with_last_record(|record| record.set_description(text));
            }
            _ => {
                tracing::debug!(path = %self.parsing_state.path(), "description outside vendor documentation ignored");
            }
        }
        Ok(false)
    }

    /// `ProductInformation product="..."`: a new product entry
    pub(super) fn product_information(
        &mut self,
        node: &Element,
        json_schema: &SchemaRef,
    ) -> Result<bool> {
        json_schema
            .borrow_mut()
            .info_mut()
            .x_totvs
            .product_information
            .push(ProductInformation {
                product: node.attribute("product").unwrap_or_default().to_string(),
                ..ProductInformation::default()
            });
        Ok(true)
    }

    /// `Contact` and `Adapter` of the latest product entry
    pub(super) fn product_field(
        &mut self,
        node: &Element,
        tag: XsdTag,
        json_schema: &SchemaRef,
    ) -> Result<bool> {
        let Some(text) = text_of(node) else {
            return Ok(false);
        };
        let mut root = json_schema.borrow_mut();
        match root.info_mut().last_product_mut() {
            Some(product) if tag == XsdTag::Contact => product.contact = Some(text),
            Some(product) => product.adapter = Some(text),
            None => {
                tracing::debug!(%tag, "product field without ProductInformation ignored");
            }
        }
        Ok(false)
    }

    /// `FieldDocumentation product="..."`: a new `x-totvs` record
    pub(super) fn field_documentation(&mut self, node: &Element) -> Result<bool> {
        let Some(property) = self.parsing_state.property_schema() else {
            tracing::warn!(path = %self.parsing_state.path(), "FieldDocumentation outside of an element ignored");
            return Ok(false);
        };
        let product = node.attribute("product").unwrap_or_default();
        property.borrow_mut().xtotvs.push(XTotvsRecord::new(product));
        Ok(true)
    }

    /// `Field`, `Required`, `Type` and `Length` of the latest record
    pub(super) fn field_item(&mut self, node: &Element, tag: XsdTag) -> Result<bool> {
        if self.parent_name() != Some("FieldDocumentation") {
            tracing::debug!(%tag, path = %self.parsing_state.path(), "vendor tag outside FieldDocumentation ignored");
            return Ok(false);
        }
        let text = node.text();
        match tag {
            XsdTag::Field => self.with_last_record(|record| record.set_field(text)),
            XsdTag::Required => self.with_last_record(|record| record.set_required(&text)),
            XsdTag::Type => self.with_last_record(|record| record.set_field_type(text)),
            _ => {
                let length = if text.is_empty() {
                    None
                } else {
                    match text.parse() {
                        Ok(length) => Some(length),
                        Err(_) => {
                            tracing::warn!(value = %text, "non-numeric field Length ignored");
                            None
                        }
                    }
                };
                self.with_last_record(|record| record.set_length(length));
            }
        }
        Ok(false)
    }

    fn with_last_record(&self, update: impl FnOnce(&mut XTotvsRecord)) {
        let Some(property) = self.parsing_state.property_schema() else {
            return;
        };
        let mut node = property.borrow_mut();
        if let Some(record) = node.xtotvs.last_mut() {
            update(record);
        }
    }
}
