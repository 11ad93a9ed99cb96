//! OpenAPI 3 shaping of a converted document
//!
//! The converted message becomes a set of component schemas: every named
//! definition, plus a `<Name>s` paging envelope whose items are the
//! message's business content. `<Name>` is the `info.title` of the
//! document, or its file name up to the first `_`.

use serde_json::{json, Map, Value};

/// Version written in the `openapi` field
pub const OPENAPI_VERSION: &str = "3.0.1";

const DEFINITIONS_PREFIX: &str = "#/definitions/";
const COMPONENTS_PREFIX: &str = "#/components/schemas/";
const BUSINESS_CONTENT: &str = "businesscontent";
const BUSINESS_CONTENT_TYPE: &str = "businesscontenttype";

/// Message name used for the envelope and the renamed business content type
pub fn message_name(document: &Value, filename: &str) -> String {
    document
        .pointer("/info/title")
        .and_then(Value::as_str)
        .map(str::to_string)
        .unwrap_or_else(|| {
            let end = filename.find('_').unwrap_or(filename.len());
            filename[..end].trim_end_matches(".json").to_string()
        })
}

/// Wrap a serialized JSON Schema document in an OpenAPI document
pub fn format_schema(document: &Value, filename: &str) -> Value {
    let name = message_name(document, filename);
    let info_name = format!("{}Info", name);
    let mut schemas = Map::new();

    let mut envelope = json!({
        "type": "object",
        "properties": {
            "items": { "type": "array", "items": {} },
            "hasNext": { "type": "boolean" }
        }
    });

    if let Some(definitions) = document.get("definitions").and_then(Value::as_object) {
        for (type_name, definition) in definitions {
            let key = if type_name.to_lowercase() == BUSINESS_CONTENT_TYPE {
                info_name.clone()
            } else {
                type_name.clone()
            };
            schemas.insert(key, shape(definition, &info_name));
        }
    }

    if let Some(elements) = document.get("properties").and_then(Value::as_object) {
        for (element_name, property) in elements {
            let resolved = property
                .get("$ref")
                .and_then(Value::as_str)
                .and_then(|pointer| pointer.strip_prefix('#'))
                .and_then(|pointer| document.pointer(pointer))
                .unwrap_or(property);
            let element = shape(resolved, &info_name);
            if element_name.to_lowercase() == BUSINESS_CONTENT {
                envelope["properties"]["items"]["items"] = element;
            } else if !schemas.contains_key(element_name) {
                schemas.insert(element_name.clone(), element);
            }
        }
    }

    let mut components = Map::new();
    components.insert(format!("{}s", name), envelope);
    components.extend(schemas);

    json!({
        "openapi": OPENAPI_VERSION,
        "servers": [],
        "info": document.get("info").cloned().unwrap_or_else(|| json!({})),
        "paths": {},
        "components": { "schemas": Value::Object(components) }
    })
}

/// A copy with `ListOf` wrappers flattened and local references rewritten
fn shape(schema: &Value, info_name: &str) -> Value {
    let mut copy = schema.clone();
    flatten_list_of(&mut copy);
    rewrite_refs(&mut copy, info_name);
    copy
}

/// Replace `ListOf` object wrappers by their single child
fn flatten_list_of(value: &mut Value) {
    match value {
        Value::Object(map) => {
            if let Some(Value::Object(properties)) = map.get_mut("properties") {
                for (name, property) in properties.iter_mut() {
                    if !name.starts_with(crate::names::LIST_OF_PREFIX) {
                        continue;
                    }
                    let Value::Object(wrapper) = property else {
                        continue;
                    };
                    let child = match wrapper.get("properties") {
                        Some(Value::Object(children)) => children.values().next().cloned(),
                        _ => None,
                    };
                    if let Some(Value::Object(child)) = child {
                        wrapper.remove("properties");
                        wrapper.remove("required");
                        for (key, field) in child {
                            wrapper.insert(key, field);
                        }
                    }
                }
            }
            for child in map.values_mut() {
                flatten_list_of(child);
            }
        }
        Value::Array(items) => items.iter_mut().for_each(flatten_list_of),
        _ => {}
    }
}

/// Point `#/definitions/X` at `#/components/schemas/X`
fn rewrite_refs(value: &mut Value, info_name: &str) {
    match value {
        Value::Object(map) => {
            if let Some(Value::String(pointer)) = map.get_mut("$ref") {
                if let Some(type_name) = pointer.strip_prefix(DEFINITIONS_PREFIX) {
                    let target = if type_name.to_lowercase() == BUSINESS_CONTENT_TYPE {
                        info_name
                    } else {
                        type_name
                    };
                    *pointer = format!("{}{}", COMPONENTS_PREFIX, target);
                }
            }
            for child in map.values_mut() {
                rewrite_refs(child, info_name);
            }
        }
        Value::Array(items) => items.iter_mut().for_each(|item| rewrite_refs(item, info_name)),
        _ => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn document() -> Value {
        json!({
            "id": "http://www.xsd2jsonschema.org/Financing_1_000.json",
            "type": "object",
            "info": { "title": "Financing", "version": "1.000" },
            "properties": {
                "BusinessContent": { "$ref": "#/example/BusinessContent", "type": "object" }
            },
            "definitions": {
                "BusinessContentType": {
                    "type": "object",
                    "properties": {
                        "Code": { "type": "string" },
                        "ListOfParcels": {
                            "type": "object",
                            "properties": {
                                "Parcel": { "type": "array", "items": { "$ref": "#/definitions/ParcelType", "type": "object" } }
                            },
                            "required": ["Parcel"]
                        }
                    }
                },
                "ParcelType": { "type": "object", "properties": { "Value": { "type": "number" } } }
            },
            "example": {
                "BusinessContent": { "$ref": "#/definitions/BusinessContentType", "type": "object" }
            }
        })
    }

    #[test]
    fn test_message_name() {
        assert_eq!(message_name(&document(), "x.json"), "Financing");
        assert_eq!(message_name(&json!({}), "Order_2_000.json"), "Order");
        assert_eq!(message_name(&json!({}), "Order.json"), "Order");
    }

    #[test]
    fn test_format_schema() {
        let openapi = format_schema(&document(), "Financing_1_000.json");
        assert_eq!(openapi["openapi"], "3.0.1");
        assert_eq!(openapi["info"]["version"], "1.000");
        assert_eq!(openapi["paths"], json!({}));

        let schemas = &openapi["components"]["schemas"];
        assert_eq!(
            schemas["Financings"]["properties"]["items"]["items"],
            json!({ "$ref": "#/components/schemas/FinancingInfo", "type": "object" })
        );
        assert_eq!(
            schemas["FinancingInfo"]["properties"]["ListOfParcels"],
            json!({
                "type": "array",
                "items": { "$ref": "#/components/schemas/ParcelType", "type": "object" }
            })
        );
        assert!(schemas.get("BusinessContentType").is_none());
        assert!(schemas["ParcelType"].is_object());
    }
}
