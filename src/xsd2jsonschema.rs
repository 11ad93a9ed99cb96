//! Batch conversion of XSD files
//!
//! [`Xsd2JsonSchema`] loads top-level XSD files together with the files they
//! include, converts each top-level file with a fresh [`BaseConverter`]
//! (includes first, so their types are known) and writes one JSON document
//! per converted file.

use crate::converters::BaseConverter;
use crate::documents::XsdDocument;
use crate::error::{Error, Result};
use crate::jsonschema::{SchemaOptions, SchemaRef};
use crate::limits::Limits;
use crate::loaders::{resolve_location, Loader};
use crate::openapi;
use crate::traversal::{DepthFirstTraversal, Visitor};
use indexmap::IndexMap;
use regex::Regex;
use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};

/// Default URI prefix of generated document ids
pub const DEFAULT_BASE_ID: &str = "http://www.xsd2jsonschema.org/defaultBaseId";

/// Include skipped unless configured otherwise (the TOTVS message envelope)
pub const DEFAULT_EXCLUDED: &str = "totvsmsg.xsd";

/// Shape of the written documents
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    /// Plain JSON Schema draft-04
    #[default]
    JsonSchema,
    /// Wrapped in an OpenAPI 3 document, see [`openapi::format_schema`]
    OpenApi,
}

/// Configuration for [`Xsd2JsonSchema`]
#[derive(Debug, Clone)]
pub struct ConversionOptions {
    xsd_base_dir: PathBuf,
    output_dir: PathBuf,
    base_id: String,
    mask: Option<Regex>,
    output_format: OutputFormat,
    with_includes: bool,
    excluded: Vec<String>,
    limits: Limits,
}

impl Default for ConversionOptions {
    fn default() -> Self {
        Self {
            xsd_base_dir: PathBuf::from("."),
            output_dir: PathBuf::from("."),
            base_id: DEFAULT_BASE_ID.to_string(),
            mask: None,
            output_format: OutputFormat::default(),
            with_includes: true,
            excluded: vec![DEFAULT_EXCLUDED.to_string()],
            limits: Limits::default(),
        }
    }
}

impl ConversionOptions {
    /// Create a new configuration with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Directory XSD file names are resolved against
    pub fn xsd_base_dir(&self) -> &Path {
        &self.xsd_base_dir
    }

    /// Directory the JSON documents are written to
    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }

    /// URI prefix of generated document ids
    pub fn base_id(&self) -> &str {
        &self.base_id
    }

    /// Pattern removed from output file names
    pub fn mask(&self) -> Option<&Regex> {
        self.mask.as_ref()
    }

    /// Shape of the written documents
    pub fn output_format(&self) -> OutputFormat {
        self.output_format
    }

    /// Whether included files are loaded and converted
    pub fn with_includes(&self) -> bool {
        self.with_includes
    }

    /// Include file names that are never loaded
    pub fn excluded(&self) -> &[String] {
        &self.excluded
    }

    /// Resource limits
    pub fn limits(&self) -> &Limits {
        &self.limits
    }

    /// Set the XSD directory
    pub fn with_xsd_base_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.xsd_base_dir = dir.into();
        self
    }

    /// Set the output directory
    pub fn with_output_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.output_dir = dir.into();
        self
    }

    /// Set the id prefix
    pub fn with_base_id(mut self, base_id: impl Into<String>) -> Self {
        self.base_id = base_id.into();
        self
    }

    /// Set the file name mask
    pub fn with_mask(mut self, mask: Regex) -> Self {
        self.mask = Some(mask);
        self
    }

    /// Set the output format
    pub fn with_output_format(mut self, format: OutputFormat) -> Self {
        self.output_format = format;
        self
    }

    /// Enable or disable include processing
    pub fn with_includes_enabled(mut self, enabled: bool) -> Self {
        self.with_includes = enabled;
        self
    }

    /// Replace the excluded include names
    pub fn with_excluded<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.excluded = names.into_iter().map(Into::into).collect();
        self
    }

    /// Set the limits
    pub fn with_limits(mut self, limits: Limits) -> Self {
        self.limits = limits;
        self
    }

    fn is_excluded(&self, location: &str) -> bool {
        self.excluded.iter().any(|name| location.contains(name.as_str()))
    }
}

/// Loads, converts and writes XSD files
#[derive(Debug)]
pub struct Xsd2JsonSchema {
    options: ConversionOptions,
    loader: Loader,
    xml_schemas: IndexMap<String, XsdDocument>,
    json_schemas: IndexMap<String, SchemaRef>,
}

impl Default for Xsd2JsonSchema {
    fn default() -> Self {
        Self::new(ConversionOptions::default())
    }
}

fn key(path: &Path) -> String {
    path.to_string_lossy().into_owned()
}

impl Xsd2JsonSchema {
    /// Create a converter with the given options
    pub fn new(options: ConversionOptions) -> Self {
        let loader = Loader::new().with_limits(options.limits.clone());
        Self {
            options,
            loader,
            xml_schemas: IndexMap::new(),
            json_schemas: IndexMap::new(),
        }
    }

    /// The options in use
    pub fn options(&self) -> &ConversionOptions {
        &self.options
    }

    /// Loaded XSD documents keyed by path
    pub fn xml_schemas(&self) -> &IndexMap<String, XsdDocument> {
        &self.xml_schemas
    }

    /// Converted documents keyed by the path of their XSD
    pub fn json_schemas(&self) -> &IndexMap<String, SchemaRef> {
        &self.json_schemas
    }

    /// Load one XSD file and, when includes are enabled, everything it includes
    ///
    /// Files already loaded are not read again, which also ends include
    /// cycles.
    pub fn load_schema(&mut self, path: &Path) -> Result<()> {
        self.load_at_depth(path, 0)
    }

    fn load_at_depth(&mut self, path: &Path, depth: usize) -> Result<()> {
        if self.xml_schemas.contains_key(&key(path)) {
            return Ok(());
        }
        self.options.limits.check_include_depth(depth)?;
        let xsd = self.loader.load_schema(path)?;
        let includes = xsd.include_uris();
        self.xml_schemas.insert(key(path), xsd);

        if self.options.with_includes {
            for location in includes {
                if self.options.is_excluded(&location) {
                    tracing::debug!(%location, "excluded include skipped");
                    continue;
                }
                self.load_at_depth(&resolve_location(path, &location), depth + 1)?;
            }
        }
        Ok(())
    }

    /// Load files named relative to the XSD directory
    pub fn load_all_schemas<P: AsRef<Path>>(&mut self, names: &[P]) -> Result<()> {
        for name in names {
            let path = self.options.xsd_base_dir.join(name);
            self.load_schema(&path)?;
        }
        Ok(())
    }

    /// Convert files named relative to the XSD directory
    ///
    /// Every file gets its own converter. A failing file produces no
    /// output, neither for itself nor for its includes, and the remaining
    /// files are still converted. Returns the failures by file name.
    pub fn process_all_schemas<P: AsRef<Path>>(&mut self, names: &[P]) -> Vec<(String, Error)> {
        let mut failures = Vec::new();
        for name in names {
            let file_name = name.as_ref().display().to_string();
            match self.process_one(name.as_ref()) {
                Ok(converted) => {
                    tracing::info!(file = %file_name, documents = converted.len(), "converted");
                    self.json_schemas.extend(converted);
                }
                Err(err) => {
                    tracing::warn!(file = %file_name, error = %err, "conversion failed");
                    failures.push((file_name, err));
                }
            }
        }
        failures
    }

    fn process_one(&mut self, name: &Path) -> Result<IndexMap<String, SchemaRef>> {
        let path = self.options.xsd_base_dir.join(name);
        self.load_schema(&path)?;
        let mut converter = BaseConverter::new();
        let mut converted = IndexMap::new();
        self.process_schema(&path, &mut converter, &mut converted, &mut HashSet::new(), 0)?;
        Ok(converted)
    }

    /// Drive any visitor over the named files and their includes
    ///
    /// The visitor is shared by every file; documents built along the way
    /// are discarded.
    pub fn process_all_with<P, V>(&mut self, names: &[P], visitor: &mut V) -> Result<()>
    where
        P: AsRef<Path>,
        V: Visitor + ?Sized,
    {
        for name in names {
            let path = self.options.xsd_base_dir.join(name);
            self.load_schema(&path)?;
            let mut visited = IndexMap::new();
            self.process_schema(&path, visitor, &mut visited, &mut HashSet::new(), 0)?;
        }
        Ok(())
    }

    fn process_schema<V: Visitor + ?Sized>(
        &self,
        path: &Path,
        visitor: &mut V,
        converted: &mut IndexMap<String, SchemaRef>,
        visiting: &mut HashSet<String>,
        depth: usize,
    ) -> Result<()> {
        // In progress or done: an include cycle ends here
        if !visiting.insert(key(path)) {
            return Ok(());
        }
        let xsd = self
            .xml_schemas
            .get(&key(path))
            .ok_or_else(|| Error::Resource(format!("'{}' was not loaded", path.display())))?;

        if self.options.with_includes {
            for location in xsd.include_uris() {
                if self.options.is_excluded(&location) {
                    continue;
                }
                let include = resolve_location(path, &location);
                if !visiting.contains(&key(&include)) {
                    self.options.limits.check_include_depth(depth + 1)?;
                    self.process_schema(&include, visitor, converted, visiting, depth + 1)?;
                }
            }
        }

        tracing::debug!(file = %path.display(), "converting");
        let mut options = SchemaOptions::new()
            .with_base_filename(xsd.base_filename.clone())
            .with_base_id(self.options.base_id.clone());
        if let Some(namespace) = xsd.target_namespace() {
            options = options.with_target_namespace(namespace);
        }
        let json_schema = SchemaRef::create(options)?;
        converted.insert(key(path), json_schema.clone());
        DepthFirstTraversal::new()
            .with_limits(self.options.limits.clone())
            .traverse(visitor, &json_schema, xsd)
    }

    /// Output file name of a document, mask applied
    pub fn output_filename(&self, json_schema: &SchemaRef) -> Result<String> {
        let filename = json_schema
            .borrow()
            .filename()
            .map(str::to_string)
            .ok_or_else(|| Error::contract("only root documents can be written"))?;
        Ok(match &self.options.mask {
            Some(mask) => mask.replace(&filename, "").into_owned(),
            None => filename,
        })
    }

    /// Write one document into `directory`
    pub fn write_file(&self, json_schema: &SchemaRef, directory: &Path) -> Result<PathBuf> {
        let filename = self.output_filename(json_schema)?;
        let mut value = json_schema.to_json()?;
        if self.options.output_format == OutputFormat::OpenApi {
            value = openapi::format_schema(&value, &filename);
        }
        let path = directory.join(&filename);
        fs::write(&path, serde_json::to_string_pretty(&value)?)?;
        tracing::debug!(path = %path.display(), "written");
        Ok(path)
    }

    /// Write every converted document into the output directory
    pub fn write_files(&self) -> Result<Vec<PathBuf>> {
        fs::create_dir_all(&self.options.output_dir)?;
        self.json_schemas
            .values()
            .map(|json_schema| self.write_file(json_schema, &self.options.output_dir))
            .collect()
    }
}
