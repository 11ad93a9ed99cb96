//! End-to-end conversion of the XSD fixtures
//!
//! Drives the public API the way a caller would: load a message with its
//! includes, convert it, inspect the JSON and write it to disk.

use pretty_assertions::assert_eq;
use serde_json::{json, Value};
use std::path::PathBuf;
use tempfile::TempDir;
use xsd2jsonschema::{ConversionOptions, Error, OutputFormat, Xsd2JsonSchema};

const BASE_ID: &str = "http://www.xsd2jsonschema.org/unittests/";

fn fixtures_dir() -> PathBuf {
    let mut path = PathBuf::from(env!("CARGO_MANIFEST_DIR"));
    path.push("tests");
    path.push("fixtures");
    path
}

fn options() -> ConversionOptions {
    ConversionOptions::new()
        .with_xsd_base_dir(fixtures_dir())
        .with_base_id(BASE_ID)
}

/// Convert fixtures with a fresh converter
fn convert(names: &[&str]) -> (Xsd2JsonSchema, Vec<(String, Error)>) {
    let mut x2j = Xsd2JsonSchema::new(options());
    let failures = x2j.process_all_schemas(names);
    (x2j, failures)
}

fn document(x2j: &Xsd2JsonSchema, filename: &str) -> Value {
    x2j.json_schemas()
        .values()
        .find(|schema| schema.borrow().filename() == Some(filename))
        .unwrap_or_else(|| panic!("{} was not converted", filename))
        .to_json()
        .unwrap()
}

// ============================================================================
// Document layout
// ============================================================================

#[test]
fn test_financing_root() {
    let (x2j, failures) = convert(&["Financing_1_000.xsd"]);
    assert!(failures.is_empty(), "{:?}", failures);
    let financing = document(&x2j, "Financing_1_000.json");

    assert_eq!(financing["id"], "http://www.xsd2jsonschema.org/unittests/Financing_1_000.json");
    assert_eq!(financing["$schema"], "http://json-schema.org/draft-04/schema#");
    assert!(financing["title"]
        .as_str()
        .unwrap()
        .starts_with("This JSON Schema file was generated from Financing_1_000.xsd on "));
    assert_eq!(financing["type"], "object");

    let keys: Vec<&str> = financing.as_object().unwrap().keys().map(String::as_str).collect();
    assert_eq!(
        keys,
        vec!["id", "$schema", "title", "type", "anyOf", "properties", "info", "definitions", "mensagem"]
    );
}

#[test]
fn test_global_element_layout() {
    let (x2j, _) = convert(&["Financing_1_000.xsd"]);
    let financing = document(&x2j, "Financing_1_000.json");

    assert_eq!(financing["anyOf"], json!([{ "required": ["BusinessContent"] }]));
    assert_eq!(
        financing["properties"]["BusinessContent"],
        json!({ "$ref": "#/mensagem/BusinessContent", "type": "object" })
    );
    assert_eq!(
        financing["mensagem"]["BusinessContent"],
        json!({ "$ref": "#/definitions/BusinessContentType", "type": "object" })
    );
}

#[test]
fn test_business_content_type() {
    let (x2j, _) = convert(&["Financing_1_000.xsd"]);
    let financing = document(&x2j, "Financing_1_000.json");
    let business = &financing["definitions"]["BusinessContentType"];

    assert_eq!(business["type"], "object");
    assert_eq!(
        business["required"],
        json!(["CompanyId", "ContractNumber", "Status", "IssueDate", "version"])
    );

    let properties = &business["properties"];
    assert_eq!(
        properties["CompanyId"],
        json!({
            "description": "Código da empresa",
            "type": "string",
            "x-totvs": [{
                "product": "RM",
                "field": "CODCOLIGADA",
                "required": true,
                "type": "Int",
                "length": 4
            }]
        })
    );
    assert_eq!(
        properties["ContractNumber"],
        json!({
            "$ref": "http://www.xsd2jsonschema.org/unittests/commons_1_000.json#/definitions/CodeType",
            "type": "string"
        })
    );
    assert_eq!(
        properties["Value"],
        json!({
            "type": "number",
            "multipleOf": 0.01,
            "minimum": -99999999.99,
            "maximum": 99999999.99
        })
    );
    assert_eq!(
        properties["Status"],
        json!({ "$ref": "#/definitions/StatusType", "type": "object" })
    );
    assert_eq!(
        properties["ListOfParcels"],
        json!({
            "type": "array",
            "items": { "$ref": "#/definitions/ParcelType", "type": "object" }
        })
    );
    assert_eq!(properties["IssueDate"], json!({ "type": "string", "format": "date" }));
    assert_eq!(properties["version"], json!({ "type": "string" }));
}

#[test]
fn test_named_simple_type_with_enumeration() {
    let (x2j, _) = convert(&["Financing_1_000.xsd"]);
    let financing = document(&x2j, "Financing_1_000.json");
    assert_eq!(
        financing["definitions"]["StatusType"],
        json!({
            "description": "1 - Aberto / 2 - Baixado",
            "type": "integer",
            "enum": [1, 2],
            "format": "int32"
        })
    );
}

#[test]
fn test_info() {
    let (x2j, _) = convert(&["Financing_1_000.xsd"]);
    let financing = document(&x2j, "Financing_1_000.json");
    assert_eq!(
        financing["info"],
        json!({
            "title": "Financing",
            "version": "1.000",
            "x-totvs": {
                "messageDocumentation": {
                    "name": "Financing",
                    "description": "Geração dos lançamentos",
                    "segment": "Incorporação"
                },
                "productInformation": [{
                    "product": "RM",
                    "contact": "Guilherme",
                    "note": "GDP Inovação",
                    "adapter": "Financing"
                }]
            }
        })
    );
}

#[test]
fn test_include_is_its_own_document() {
    let (x2j, _) = convert(&["Financing_1_000.xsd"]);
    assert_eq!(x2j.json_schemas().len(), 2);
    let commons = document(&x2j, "commons_1_000.json");
    assert_eq!(commons["id"], "http://www.xsd2jsonschema.org/unittests/commons_1_000.json");
    assert_eq!(
        commons["definitions"]["CodeType"],
        json!({ "type": "string", "maxLength": 20 })
    );
}

// ============================================================================
// Failures
// ============================================================================

#[test]
fn test_unhandled_construct_fails_only_that_file() {
    let (x2j, failures) = convert(&["Grouped_1_000.xsd", "Financing_1_000.xsd"]);
    assert_eq!(failures.len(), 1);
    assert_eq!(failures[0].0, "Grouped_1_000.xsd");
    match &failures[0].1 {
        Error::UnhandledConstruct { tag, path } => {
            assert_eq!(tag, "xs:group");
            assert_eq!(path, "schema/group[Audit]");
        }
        other => panic!("unexpected error {:?}", other),
    }
    assert!(x2j
        .json_schemas()
        .values()
        .all(|schema| schema.borrow().filename() != Some("Grouped_1_000.json")));
    assert_eq!(x2j.json_schemas().len(), 2);
}

#[test]
fn test_missing_file() {
    let (_, failures) = convert(&["Missing_1_000.xsd"]);
    assert!(matches!(failures[0].1, Error::Resource(_)));
}

// ============================================================================
// Output
// ============================================================================

#[test]
fn test_written_files_are_stable() {
    let out = TempDir::new().unwrap();
    let mut x2j = Xsd2JsonSchema::new(options().with_output_dir(out.path()));
    assert!(x2j.process_all_schemas(&["Financing_1_000.xsd"]).is_empty());
    x2j.write_files().unwrap();

    let text = std::fs::read_to_string(out.path().join("Financing_1_000.json")).unwrap();
    let written: Value = serde_json::from_str(&text).unwrap();
    assert_eq!(written, document(&x2j, "Financing_1_000.json"));
    assert!(text.contains("\n  \"definitions\": {\n    \"BusinessContentType\": {"));
}

#[test]
fn test_openapi_document() {
    let out = TempDir::new().unwrap();
    let mut x2j = Xsd2JsonSchema::new(
        options()
            .with_output_dir(out.path())
            .with_output_format(OutputFormat::OpenApi),
    );
    assert!(x2j.process_all_schemas(&["Financing_1_000.xsd"]).is_empty());
    x2j.write_files().unwrap();

    let text = std::fs::read_to_string(out.path().join("Financing_1_000.json")).unwrap();
    let openapi: Value = serde_json::from_str(&text).unwrap();
    let schemas = &openapi["components"]["schemas"];
    assert_eq!(openapi["info"]["title"], "Financing");
    assert_eq!(
        schemas["Financings"]["properties"]["items"]["items"]["$ref"],
        "#/components/schemas/FinancingInfo"
    );
    assert_eq!(
        schemas["FinancingInfo"]["properties"]["Status"]["$ref"],
        "#/components/schemas/StatusType"
    );
    assert!(schemas["ParcelType"].is_object());
}
