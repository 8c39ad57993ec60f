//! Configuration source.
//!
//! A [`ConfigurationSource`] is a hierarchical key/value tree built by
//! layering JSON or TOML documents. Each entity family binds one named
//! section of it into an ordered list of import models.

use std::path::Path;

use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::{Map, Value};
use tracing::debug;

use crate::error::{ImportError, ImportOutcome};

/// Layered configuration tree.
#[derive(Debug, Clone, PartialEq)]
pub struct ConfigurationSource {
    root: Map<String, Value>,
}

impl Default for ConfigurationSource {
    fn default() -> Self {
        Self::new()
    }
}

impl ConfigurationSource {
    /// Creates an empty source.
    #[must_use]
    pub fn new() -> Self {
        Self { root: Map::new() }
    }

    /// Creates a source from a JSON value.
    ///
    /// ## Errors
    ///
    /// Returns `ImportError::Configuration` if the value is not an object.
    pub fn from_value(value: Value) -> ImportOutcome<Self> {
        match value {
            Value::Object(root) => Ok(Self { root }),
            other => Err(ImportError::configuration(format!(
                "configuration root must be an object, found {}",
                kind(&other)
            ))),
        }
    }

    /// Parses a JSON document.
    ///
    /// ## Errors
    ///
    /// Returns `ImportError::Configuration` if the document is invalid.
    pub fn from_json_str(text: &str) -> ImportOutcome<Self> {
        let value = serde_json::from_str(text)
            .map_err(|e| ImportError::configuration(format!("invalid JSON: {e}")))?;
        Self::from_value(value)
    }

    /// Parses a TOML document.
    ///
    /// ## Errors
    ///
    /// Returns `ImportError::Configuration` if the document is invalid.
    pub fn from_toml_str(text: &str) -> ImportOutcome<Self> {
        let value = toml::from_str::<Value>(text)
            .map_err(|e| ImportError::configuration(format!("invalid TOML: {e}")))?;
        Self::from_value(value)
    }

    /// Reads a file, choosing the format by extension (`.toml` or JSON).
    ///
    /// ## Errors
    ///
    /// Returns `ImportError::Io` if the file cannot be read and
    /// `ImportError::Configuration` if it cannot be parsed.
    pub fn load(path: impl AsRef<Path>) -> ImportOutcome<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| ImportError::Io {
            path: path.to_path_buf(),
            source,
        })?;

        debug!(path = %path.display(), "loading configuration file");

        let is_toml = path
            .extension()
            .is_some_and(|ext| ext.eq_ignore_ascii_case("toml"));
        if is_toml {
            Self::from_toml_str(&text)
        } else {
            Self::from_json_str(&text)
        }
    }

    /// Reads and layers several files; later files override earlier ones.
    ///
    /// ## Errors
    ///
    /// Fails on the first file that cannot be read or parsed.
    pub fn load_all<P: AsRef<Path>>(paths: impl IntoIterator<Item = P>) -> ImportOutcome<Self> {
        let mut source = Self::new();
        for path in paths {
            source.layer(Self::load(path)?);
        }
        Ok(source)
    }

    /// Overlays another source on top of this one.
    ///
    /// Objects merge key by key; any other value replaces the existing one.
    pub fn layer(&mut self, overlay: Self) {
        merge_objects(&mut self.root, overlay.root);
    }

    /// Sets a section to the serialized form of `value`.
    ///
    /// ## Errors
    ///
    /// Returns `ImportError::Configuration` if `value` cannot be serialized.
    pub fn with_section(mut self, name: &str, value: impl Serialize) -> ImportOutcome<Self> {
        let value = serde_json::to_value(value)
            .map_err(|e| ImportError::configuration(format!("section {name}: {e}")))?;
        self.root.insert(name.to_string(), value);
        Ok(self)
    }

    /// Looks up a top-level section, exact name first, then ignoring case.
    #[must_use]
    pub fn section(&self, name: &str) -> Option<&Value> {
        self.root.get(name).or_else(|| {
            self.root
                .iter()
                .find(|(key, _)| key.eq_ignore_ascii_case(name))
                .map(|(_, value)| value)
        })
    }

    /// Binds a section to an ordered list of models.
    ///
    /// An absent or null section yields an empty list. Unknown keys are
    /// ignored by the models' `Deserialize` impls.
    ///
    /// ## Errors
    ///
    /// Returns `ImportError::Configuration` if the section is not a list of
    /// the expected shape.
    pub fn bind<M: DeserializeOwned>(&self, name: &str) -> ImportOutcome<Vec<M>> {
        match self.section(name) {
            None | Some(Value::Null) => Ok(Vec::new()),
            Some(value) => serde_json::from_value(value.clone())
                .map_err(|e| ImportError::configuration(format!("section {name}: {e}"))),
        }
    }
}

fn merge_objects(target: &mut Map<String, Value>, overlay: Map<String, Value>) {
    for (key, value) in overlay {
        match value {
            Value::Object(incoming) if matches!(target.get(&key), Some(Value::Object(_))) => {
                if let Some(Value::Object(existing)) = target.get_mut(&key) {
                    merge_objects(existing, incoming);
                }
            }
            value => {
                target.insert(key, value);
            }
        }
    }
}

const fn kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

/// Default section name of a family: its type name in plural.
#[must_use]
pub fn pluralize(name: &str) -> String {
    let lower = name.to_ascii_lowercase();

    if let Some(stem) = name.strip_suffix('y')
        && !stem.is_empty()
        && !stem.ends_with(['a', 'e', 'i', 'o', 'u'])
    {
        return format!("{stem}ies");
    }

    if ["s", "x", "z", "ch", "sh"].iter().any(|suffix| lower.ends_with(suffix)) {
        return format!("{name}es");
    }

    format!("{name}s")
}
