//! Serializable schema documents.
//!
//! Parameter and switch tables borrow their destinations, so they cannot be
//! stored or shipped around. A [`SchemaDocument`] is the owned, serde-ready
//! description of the same tables. Binding it against a [`ValueStore`]
//! produces live tables whose destinations are the store's slots.
//!
//! # Examples
//!
//! ```
//! use shell_args_core::*;
//!
//! let doc = SchemaDocument::from_json(r#"{
//!     "program": "greet",
//!     "mandatory_params": 1,
//!     "parameters": [{ "type": "string", "help": "[name]who to greet" }],
//!     "switches": [{ "short": "-n", "long": "-count", "type": "decimal", "default": "1" }]
//! }"#).unwrap();
//!
//! let mut store = doc.new_store().unwrap();
//! let mut bound = doc.bind(&mut store).unwrap();
//! let tokenizer = ShellTokenizer::new(["greet", "world"]);
//! doc.parser()
//!     .parse(
//!         &tokenizer,
//!         &mut bound.parameters,
//!         &mut bound.switches,
//!         &mut CapturedOutput::default(),
//!     )
//!     .unwrap();
//! drop(bound);
//!
//! assert_eq!(store.parameters[0], Value::Text("world".to_string()));
//! assert_eq!(store.switches[0], Value::UInt(1));
//! ```

use std::collections::BTreeMap;
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

use crate::convert::{ConversionError, convert};
use crate::help::HelpText;
use crate::parse::Parser;
use crate::schema::ParseOptions;
use crate::{
    Destination, DestinationKind, EnumMapping, MAX_SWITCH_ENTRIES, ParameterSpec, SwitchSpec, Value,
    ValueType,
};

/// Capacity given to string entries that do not declare one.
pub const DEFAULT_STRING_CAPACITY: usize = 256;

/// Errors raised while loading or binding a schema document.
#[derive(Debug, Error)]
pub enum DocumentError {
    /// An enum entry names a table missing from `enums`.
    #[error("{entry} {index}: unknown enum table '{name}'")]
    UnknownEnumTable {
        entry: &'static str,
        index: usize,
        name: String,
    },
    /// An enum entry does not name a table at all.
    #[error("{entry} {index}: enum type requires a 'values' table")]
    MissingEnumTable { entry: &'static str, index: usize },
    /// A declared default does not convert under the entry's type.
    #[error("{entry} {index}: invalid default: {source}")]
    InvalidDefault {
        entry: &'static str,
        index: usize,
        #[source]
        source: ConversionError,
    },
    /// The store was created for a different document.
    #[error("value store does not match document layout")]
    StoreMismatch,
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Value type names used in documents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ValueKind {
    #[default]
    Flag,
    String,
    Decimal,
    Hex,
    Integer,
    Enum,
}

/// Parse options as written in a document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocumentOptions {
    #[serde(default = "default_true")]
    pub help: bool,
    #[serde(default)]
    pub force_page_break: bool,
    #[serde(default = "default_switch_capacity")]
    pub switch_capacity: usize,
}

impl Default for DocumentOptions {
    fn default() -> Self {
        Self {
            help: true,
            force_page_break: false,
            switch_capacity: MAX_SWITCH_ENTRIES,
        }
    }
}

impl From<&DocumentOptions> for ParseOptions {
    fn from(options: &DocumentOptions) -> Self {
        Self {
            help: options.help,
            force_page_break: options.force_page_break,
            switch_capacity: options.switch_capacity,
        }
    }
}

fn default_true() -> bool {
    true
}

fn default_switch_capacity() -> usize {
    MAX_SWITCH_ENTRIES
}

/// A positional parameter entry.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ParameterDoc {
    #[serde(rename = "type", default)]
    pub kind: ValueKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub capacity: Option<usize>,
    /// Name of the enum table in [`SchemaDocument::enums`].
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub values: Option<String>,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub help: String,
    /// Initial slot value, converted like user input.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default: Option<String>,
}

/// A switch entry.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct SwitchDoc {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub short: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub long: Option<String>,
    #[serde(rename = "type", default)]
    pub kind: ValueKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub capacity: Option<usize>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub values: Option<String>,
    #[serde(default, skip_serializing_if = "is_false")]
    pub mandatory: bool,
    #[serde(default, skip_serializing_if = "is_false")]
    pub value_optional: bool,
    /// Number written when a flag is present.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub flag_value: Option<u64>,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub help: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default: Option<String>,
}

fn is_false(value: &bool) -> bool {
    !value
}

/// Owned description of a program's parameters and switches.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SchemaDocument {
    pub program: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default)]
    pub mandatory_params: usize,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub enums: BTreeMap<String, EnumMapping>,
    #[serde(default)]
    pub parameters: Vec<ParameterDoc>,
    #[serde(default)]
    pub switches: Vec<SwitchDoc>,
    #[serde(default)]
    pub options: DocumentOptions,
}

/// Owned slots the bound tables write into.
///
/// Slot `i` of `parameters` belongs to parameter `i`, likewise for
/// switches.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValueStore {
    pub parameters: Vec<Value>,
    pub switches: Vec<Value>,
}

impl ValueStore {
    /// Renders the slots as JSON keyed by display name.
    ///
    /// Parameters are keyed by their `[name]` or `param<N>`, switches by
    /// their primary spelling. Enum codes are reported by name when the
    /// mapping has one.
    pub fn report(&self, doc: &SchemaDocument) -> serde_json::Value {
        let mut parameters = serde_json::Map::new();
        for (index, (entry, value)) in doc.parameters.iter().zip(&self.parameters).enumerate() {
            let name = HelpText::parse(&entry.help)
                .name
                .map(str::to_string)
                .unwrap_or_else(|| format!("param{}", index + 1));
            parameters.insert(name, doc.report_value(entry.values.as_deref(), value));
        }

        let mut switches = serde_json::Map::new();
        for (entry, value) in doc.switches.iter().zip(&self.switches) {
            let name = entry
                .short
                .as_deref()
                .or(entry.long.as_deref())
                .unwrap_or("?")
                .to_string();
            switches.insert(name, doc.report_value(entry.values.as_deref(), value));
        }

        serde_json::json!({
            "program": doc.program,
            "parameters": parameters,
            "switches": switches,
        })
    }
}

/// Live tables bound to a [`ValueStore`].
#[derive(Debug)]
pub struct BoundSchema<'a> {
    pub parameters: Vec<ParameterSpec<'a>>,
    pub switches: Vec<SwitchSpec<'a>>,
}

impl SchemaDocument {
    pub fn new(program: &str) -> Self {
        Self {
            program: program.to_string(),
            description: None,
            mandatory_params: 0,
            enums: BTreeMap::new(),
            parameters: Vec::new(),
            switches: Vec::new(),
            options: DocumentOptions::default(),
        }
    }

    pub fn from_json(json: &str) -> Result<Self, DocumentError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn to_json(&self) -> Result<String, DocumentError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Loads a document from a JSON file.
    pub fn load_json(path: &Path) -> Result<Self, DocumentError> {
        let file = File::open(path)?;
        let doc = serde_json::from_reader(BufReader::new(file))?;
        debug!(path = %path.display(), "loaded schema document");
        Ok(doc)
    }

    /// Parser configured with this document's program, description,
    /// mandatory count and options.
    pub fn parser(&self) -> Parser {
        let parser = Parser::new(&self.program)
            .mandatory_params(self.mandatory_params)
            .options(ParseOptions::from(&self.options));
        match &self.description {
            Some(description) => parser.description(description),
            None => parser,
        }
    }

    /// Creates a store with every slot at its declared default.
    ///
    /// Slots without a default start empty for their destination kind.
    pub fn new_store(&self) -> Result<ValueStore, DocumentError> {
        let mut parameters = Vec::with_capacity(self.parameters.len());
        for (index, entry) in self.parameters.iter().enumerate() {
            let value_type = self.parameter_type(index, entry)?;
            let kind = ParameterSpec::new(value_type.clone()).expected_destination();
            let default = entry.default.as_deref();
            parameters.push(initial_value("parameter", index, &value_type, kind, default)?);
        }

        let mut switches = Vec::with_capacity(self.switches.len());
        for (index, entry) in self.switches.iter().enumerate() {
            let value_type = self.switch_type(index, entry)?;
            let kind = self.switch_spec(entry, value_type.clone()).expected_destination();
            let default = entry.default.as_deref();
            switches.push(initial_value("switch", index, &value_type, kind, default)?);
        }

        Ok(ValueStore {
            parameters,
            switches,
        })
    }

    /// Binds live tables to `store`'s slots.
    ///
    /// # Errors
    ///
    /// Returns [`DocumentError::StoreMismatch`] if `store` has a different
    /// number of slots than the document has entries.
    pub fn bind<'a>(&self, store: &'a mut ValueStore) -> Result<BoundSchema<'a>, DocumentError> {
        if store.parameters.len() != self.parameters.len()
            || store.switches.len() != self.switches.len()
        {
            return Err(DocumentError::StoreMismatch);
        }

        let mut parameters = Vec::with_capacity(self.parameters.len());
        let slots = self.parameters.iter().zip(&mut store.parameters);
        for (index, (entry, slot)) in slots.enumerate() {
            parameters.push(
                ParameterSpec::new(self.parameter_type(index, entry)?)
                    .with_help(&entry.help)
                    .bind(Destination::from(slot)),
            );
        }

        let mut switches = Vec::with_capacity(self.switches.len());
        let slots = self.switches.iter().zip(&mut store.switches);
        for (index, (entry, slot)) in slots.enumerate() {
            let value_type = self.switch_type(index, entry)?;
            switches.push(self.switch_spec(entry, value_type).bind(Destination::from(slot)));
        }

        Ok(BoundSchema {
            parameters,
            switches,
        })
    }

    fn switch_spec<'a>(&self, entry: &SwitchDoc, value_type: ValueType) -> SwitchSpec<'a> {
        let mut spec = SwitchSpec::new(entry.short.as_deref(), entry.long.as_deref(), value_type)
            .with_help(&entry.help);
        spec.flag_value = entry.flag_value;
        if entry.mandatory {
            spec = spec.mandatory();
        }
        if entry.value_optional {
            spec = spec.value_optional();
        }
        spec
    }

    fn parameter_type(
        &self,
        index: usize,
        entry: &ParameterDoc,
    ) -> Result<ValueType, DocumentError> {
        let values = entry.values.as_deref();
        self.value_type("parameter", index, entry.kind, entry.capacity, values)
    }

    fn switch_type(&self, index: usize, entry: &SwitchDoc) -> Result<ValueType, DocumentError> {
        let values = entry.values.as_deref();
        self.value_type("switch", index, entry.kind, entry.capacity, values)
    }

    fn value_type(
        &self,
        entry: &'static str,
        index: usize,
        kind: ValueKind,
        capacity: Option<usize>,
        values: Option<&str>,
    ) -> Result<ValueType, DocumentError> {
        Ok(match kind {
            ValueKind::Flag => ValueType::None,
            ValueKind::String => ValueType::String {
                capacity: capacity.unwrap_or(DEFAULT_STRING_CAPACITY),
            },
            ValueKind::Decimal => ValueType::Decimal,
            ValueKind::Hex => ValueType::Hexadecimal,
            ValueKind::Integer => ValueType::Integer,
            ValueKind::Enum => {
                let name = values.ok_or(DocumentError::MissingEnumTable { entry, index })?;
                let mapping = self.enums.get(name).ok_or_else(|| {
                    DocumentError::UnknownEnumTable {
                        entry,
                        index,
                        name: name.to_string(),
                    }
                })?;
                ValueType::Enum(mapping.clone())
            }
        })
    }

    fn report_value(&self, table: Option<&str>, value: &Value) -> serde_json::Value {
        if let Value::EnumCode(code) = value {
            let name = table
                .and_then(|table| self.enums.get(table))
                .and_then(|mapping| mapping.entries().iter().find(|entry| entry.code == *code));
            if let Some(entry) = name {
                return serde_json::Value::String(entry.name.clone());
            }
        }
        serde_json::to_value(value).unwrap_or(serde_json::Value::Null)
    }
}

fn initial_value(
    entry: &'static str,
    index: usize,
    value_type: &ValueType,
    kind: Option<DestinationKind>,
    default: Option<&str>,
) -> Result<Value, DocumentError> {
    match default {
        Some(raw) => convert(raw, value_type)
            .map_err(|source| DocumentError::InvalidDefault { entry, index, source }),
        None => Ok(kind.map_or(Value::Bool(false), Value::empty)),
    }
}
