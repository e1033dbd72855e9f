//! Schema document files.
//!
//! Documents are stored as YAML or JSON, picked by file extension: `.json`
//! is JSON, anything else is YAML.
//!
//! # Example YAML
//!
//! ```yaml
//! program: CmdLine
//! description: Application to test command line parser
//! mandatory_params: 1
//! enums:
//!   colours:
//!     - { code: 0, name: black }
//!     - { code: 1, name: red }
//! parameters:
//!   - { type: string, capacity: 20, help: "[str]string parameter" }
//! switches:
//!   - { short: -f, help: boolean flag }
//!   - { short: -c, long: -colour, type: enum, values: colours, help: "[val]named option" }
//!   - { short: -d, long: -dec, type: decimal, mandatory: true, help: "[num]decimal value" }
//! ```

use std::fs::File;
use std::io::{BufReader, BufWriter};
use std::path::Path;

use shell_args_core::{SchemaDocument, ValueStore};
use tracing::debug;

use crate::error::Result;

/// On-disk encoding of a schema document.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentFormat {
    Json,
    Yaml,
}

impl DocumentFormat {
    pub fn from_path(path: &Path) -> Self {
        match path.extension().and_then(|ext| ext.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("json") => Self::Json,
            _ => Self::Yaml,
        }
    }
}

/// Loads a schema document from `path`.
///
/// # Errors
///
/// Returns [`CliError::Io`](crate::error::CliError::Io) if the file cannot be
/// read, or a JSON/YAML error if parsing fails.
pub fn load_document(path: &Path) -> Result<SchemaDocument> {
    let reader = BufReader::new(File::open(path)?);
    let format = DocumentFormat::from_path(path);
    let doc = match format {
        DocumentFormat::Json => serde_json::from_reader(reader)?,
        DocumentFormat::Yaml => serde_yaml::from_reader(reader)?,
    };
    debug!(path = %path.display(), ?format, "loaded schema document");
    Ok(doc)
}

/// Loads a schema document and creates its value store.
///
/// Enum tables and declared defaults are resolved here, so a document that
/// names a missing table fails as [`CliError::Document`](crate::error::CliError::Document).
pub fn load_schema(path: &Path) -> Result<(SchemaDocument, ValueStore)> {
    let doc = load_document(path)?;
    let store = doc.new_store()?;
    Ok((doc, store))
}

/// Saves `doc` to `path` in the format its extension selects.
pub fn save_document(doc: &SchemaDocument, path: &Path) -> Result<()> {
    let writer = BufWriter::new(File::create(path)?);
    match DocumentFormat::from_path(path) {
        DocumentFormat::Json => serde_json::to_writer_pretty(writer, doc)?,
        DocumentFormat::Yaml => serde_yaml::to_writer(writer, doc)?,
    }
    Ok(())
}
