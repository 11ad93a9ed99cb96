//! JSON output of schema nodes
//!
//! Keywords are written in a fixed order and empty/default values are
//! left out, so the output of two conversions of the same XSD is byte-for-byte
//! identical apart from the generated title.

use super::schema::{Additional, Dependency, Items, JsonSchema, SchemaRef};
use super::JsonSchemaType;
use crate::error::{Error, Result};
use indexmap::IndexMap;
use rust_decimal::Decimal;
use serde_json::{Map, Number, Value};

impl SchemaRef {
    /// Serialize this node and everything below it
    pub fn to_json(&self) -> Result<Value> {
        self.borrow().to_json()
    }
}

impl JsonSchema {
    /// Serialize this node and everything below it
    pub fn to_json(&self) -> Result<Value> {
        let mut out = Map::new();

        put_str(&mut out, "$ref", &self.dollar_ref);
        put_str(&mut out, "id", &self.id);
        put_str(&mut out, "$schema", &self.schema);
        put_str(&mut out, "title", &self.title);
        put_str(&mut out, "description", &self.description);
        if let Some(schema_type) = self.output_type() {
            out.insert("type".into(), Value::String(schema_type.as_str().into()));
        }

        let scale = self
            .multiple_of
            .filter(|step| !step.fract().is_zero())
            .map(|step| step.normalize().scale());
        if let Some(step) = self.multiple_of {
            out.insert("multipleOf".into(), decimal(step, None)?);
        }
        if let Some(minimum) = self.minimum {
            out.insert("minimum".into(), decimal(minimum, scale)?);
        }
        if self.exclusive_minimum {
            out.insert("exclusiveMinimum".into(), Value::Bool(true));
        }
        if let Some(maximum) = self.maximum {
            out.insert("maximum".into(), decimal(maximum, scale)?);
        }
        if self.exclusive_maximum {
            out.insert("exclusiveMaximum".into(), Value::Bool(true));
        }

        if self.min_length > 0 {
            out.insert("minLength".into(), self.min_length.into());
        }
        if let Some(max_length) = self.max_length {
            out.insert("maxLength".into(), max_length.into());
        }
        put_str(&mut out, "pattern", &self.pattern);

        if !self.enum_values.is_empty() {
            out.insert("enum".into(), Value::Array(self.enum_values.clone()));
        }
        put_list(&mut out, "allOf", &self.all_of)?;
        put_list(&mut out, "anyOf", &self.any_of)?;
        put_list(&mut out, "oneOf", &self.one_of)?;
        if let Some(not) = &self.not {
            out.insert("not".into(), not.to_json()?);
        }
        if let Some(default) = &self.default {
            out.insert("default".into(), default.clone());
        }
        put_str(&mut out, "format", &self.format);
        if !self.dependencies.is_empty() {
            let mut dependencies = Map::new();
            for (name, dependency) in &self.dependencies {
                let value = match dependency {
                    Dependency::Property(names) => {
                        Value::Array(names.iter().cloned().map(Value::String).collect())
                    }
                    Dependency::Schema(node) => node.to_json()?,
                };
                dependencies.insert(name.clone(), value);
            }
            out.insert("dependencies".into(), Value::Object(dependencies));
        }

        if let Some(additional) = &self.additional_items {
            out.insert("additionalItems".into(), additional_json(additional)?);
        }
        if let Some(max_items) = self.max_items {
            out.insert("maxItems".into(), max_items.into());
        }
        if self.min_items > 0 {
            out.insert("minItems".into(), self.min_items.into());
        }
        if self.unique_items {
            out.insert("uniqueItems".into(), Value::Bool(true));
        }
        match &self.items {
            Some(Items::Single(node)) if !node.borrow().is_blank() => {
                out.insert("items".into(), node.to_json()?);
            }
            Some(Items::Tuple(nodes)) if !nodes.is_empty() => {
                out.insert("items".into(), list_json(nodes)?);
            }
            _ => {}
        }

        if let Some(max_properties) = self.max_properties {
            out.insert("maxProperties".into(), max_properties.into());
        }
        if self.min_properties > 0 {
            out.insert("minProperties".into(), self.min_properties.into());
        }
        if let Some(additional) = &self.additional_properties {
            out.insert("additionalProperties".into(), additional_json(additional)?);
        }
        put_map(&mut out, "properties", &self.properties)?;

        if !self.xtotvs.is_empty() {
            out.insert("x-totvs".into(), serde_json::to_value(&self.xtotvs)?);
        }
        if let Some(info) = &self.info {
            out.insert("info".into(), serde_json::to_value(info)?);
        }
        put_map(&mut out, "patternProperties", &self.pattern_properties)?;
        if !self.required.is_empty() {
            out.insert(
                "required".into(),
                Value::Array(self.required.iter().cloned().map(Value::String).collect()),
            );
        }
        put_map(&mut out, "definitions", &self.definitions)?;

        for (name, node) in &self.sub_schemas {
            out.insert(name.clone(), node.to_json()?);
        }

        Ok(Value::Object(out))
    }

    /// `type` as written: objects with neither properties nor `$ref` degrade to string
    fn output_type(&self) -> Option<JsonSchemaType> {
        match self.schema_type {
            Some(JsonSchemaType::Object)
                if self.properties.is_empty() && self.dollar_ref.is_none() =>
            {
                Some(JsonSchemaType::String)
            }
            other => other,
        }
    }
}

fn put_str(out: &mut Map<String, Value>, key: &str, value: &Option<String>) {
    if let Some(value) = value {
        out.insert(key.to_string(), Value::String(value.clone()));
    }
}

fn put_list(out: &mut Map<String, Value>, key: &str, nodes: &[SchemaRef]) -> Result<()> {
    if !nodes.is_empty() {
        out.insert(key.to_string(), list_json(nodes)?);
    }
    Ok(())
}

fn put_map(
    out: &mut Map<String, Value>,
    key: &str,
    nodes: &IndexMap<String, SchemaRef>,
) -> Result<()> {
    if nodes.is_empty() {
        return Ok(());
    }
    let mut map = Map::new();
    for (name, node) in nodes {
        map.insert(name.clone(), node.to_json()?);
    }
    out.insert(key.to_string(), Value::Object(map));
    Ok(())
}

fn list_json(nodes: &[SchemaRef]) -> Result<Value> {
    nodes
        .iter()
        .map(SchemaRef::to_json)
        .collect::<Result<Vec<_>>>()
        .map(Value::Array)
}

fn additional_json(additional: &Additional) -> Result<Value> {
    match additional {
        Additional::Allowed(allowed) => Ok(Value::Bool(*allowed)),
        Additional::Schema(node) => node.to_json(),
    }
}

/// A decimal as a JSON number, optionally rounded to `scale` places
fn decimal(value: Decimal, scale: Option<u32>) -> Result<Value> {
    let value = match scale {
        Some(dp) => value.round_dp(dp),
        None => value,
    };
    let text = value.normalize().to_string();
    text.parse::<Number>()
        .map(Value::Number)
        .map_err(|_| Error::value(format!("'{}' is not a JSON number", text)))
}
