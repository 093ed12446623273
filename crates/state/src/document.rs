//! Named JSON settings documents

use extup_errors::{Error, StateError};
use serde_json::{Map, Value};
use std::path::PathBuf;
use tokio::io::AsyncWriteExt;

/// Store of named key-value documents under a single directory
///
/// Document `name` maps to `<root>/<name>.json`. A missing file loads as
/// an empty document; `save` persists with write + fsync + rename so a
/// crash never leaves a torn document behind.
#[derive(Debug, Clone)]
pub struct SettingsStore {
    root: PathBuf,
}

impl SettingsStore {
    #[must_use]
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Directory the documents live in
    #[must_use]
    pub fn root(&self) -> &std::path::Path {
        &self.root
    }

    fn document_path(&self, name: &str) -> PathBuf {
        self.root.join(format!("{name}.json"))
    }

    /// Load a document by name; a missing file yields an empty document
    ///
    /// # Errors
    ///
    /// Returns `StateError::ReadFailed` on I/O failure and
    /// `StateError::ParseFailed` if the file is not a JSON object.
    pub async fn load(&self, name: &str) -> Result<SettingsDoc, Error> {
        let path = self.document_path(name);
        let content = match tokio::fs::read_to_string(&path).await {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Ok(SettingsDoc::empty(name));
            }
            Err(e) => {
                return Err(StateError::ReadFailed {
                    document: name.to_string(),
                    message: e.to_string(),
                }
                .into());
            }
        };

        let value: Value =
            serde_json::from_str(&content).map_err(|e| StateError::ParseFailed {
                document: name.to_string(),
                message: e.to_string(),
            })?;

        match value {
            Value::Object(map) => Ok(SettingsDoc {
                name: name.to_string(),
                map,
            }),
            other => Err(StateError::ParseFailed {
                document: name.to_string(),
                message: format!("expected a JSON object, found {other}"),
            }
            .into()),
        }
    }

    /// Persist a document, flushing before returning
    ///
    /// # Errors
    ///
    /// Returns `StateError::WriteFailed` on any I/O failure.
    pub async fn save(&self, doc: &SettingsDoc) -> Result<(), Error> {
        let write = async {
            tokio::fs::create_dir_all(&self.root).await?;

            let path = self.document_path(&doc.name);
            let tmp = self.root.join(format!(".{}.json.tmp", doc.name));
            let content = serde_json::to_string_pretty(&Value::Object(doc.map.clone()))
                .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidData, e))?;

            let mut file = tokio::fs::File::create(&tmp).await?;
            file.write_all(content.as_bytes()).await?;
            file.write_all(b"\n").await?;
            file.sync_all().await?;
            drop(file);

            tokio::fs::rename(&tmp, &path).await
        };

        write.await.map_err(|e: std::io::Error| {
            StateError::WriteFailed {
                document: doc.name.clone(),
                message: e.to_string(),
            }
            .into()
        })
    }
}

/// An in-memory settings document
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SettingsDoc {
    name: String,
    map: Map<String, Value>,
}

impl SettingsDoc {
    /// Create an empty document with the given name
    #[must_use]
    pub fn empty(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            map: Map::new(),
        }
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }

    #[must_use]
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.map.get(key)
    }

    pub fn set(&mut self, key: impl Into<String>, value: impl Into<Value>) {
        self.map.insert(key.into(), value.into());
    }

    pub fn remove(&mut self, key: &str) -> Option<Value> {
        self.map.remove(key)
    }

    #[must_use]
    pub fn contains_key(&self, key: &str) -> bool {
        self.map.contains_key(key)
    }

    /// String value for `key`, if present and a string
    #[must_use]
    pub fn get_str(&self, key: &str) -> Option<&str> {
        self.map.get(key).and_then(Value::as_str)
    }

    /// String-list value for `key`; missing key or non-string entries
    /// yield an empty / filtered list
    #[must_use]
    pub fn get_string_list(&self, key: &str) -> Vec<String> {
        self.map
            .get(key)
            .and_then(Value::as_array)
            .map(|items| {
                items
                    .iter()
                    .filter_map(Value::as_str)
                    .map(ToString::to_string)
                    .collect()
            })
            .unwrap_or_default()
    }

    pub fn set_string_list(&mut self, key: impl Into<String>, values: Vec<String>) {
        self.map.insert(
            key.into(),
            Value::Array(values.into_iter().map(Value::String).collect()),
        );
    }
}
