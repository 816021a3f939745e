//! Key-value persistence capability
//!
//! Models the bounded per-value property store the chunked snapshot format
//! exists to work around. The store is always passed in explicitly; nothing
//! in the crate reaches for an ambient singleton.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use crate::error::Result;

/// A string-keyed, string-valued property store with a bounded per-value
/// size. [`ChunkedStore`](crate::chunk::ChunkedStore) splits oversized
/// payloads across many keys of such a store.
pub trait PropertyStore {
    fn get_property(&self, key: &str) -> Result<Option<String>>;

    fn set_property(&mut self, key: &str, value: &str) -> Result<()>;

    /// Write a batch of properties. The default implementation writes them
    /// one by one; backends with a cheaper batch primitive should override.
    fn set_properties(&mut self, values: &HashMap<String, String>) -> Result<()> {
        for (key, value) in values {
            self.set_property(key, value)?;
        }
        Ok(())
    }
}

impl<S: PropertyStore + ?Sized> PropertyStore for &mut S {
    fn get_property(&self, key: &str) -> Result<Option<String>> {
        (**self).get_property(key)
    }

    fn set_property(&mut self, key: &str, value: &str) -> Result<()> {
        (**self).set_property(key, value)
    }

    fn set_properties(&mut self, values: &HashMap<String, String>) -> Result<()> {
        (**self).set_properties(values)
    }
}

/// In-memory property store.
#[derive(Debug, Default, Clone)]
pub struct MemoryPropertyStore {
    values: HashMap<String, String>,
}

impl MemoryPropertyStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

impl PropertyStore for MemoryPropertyStore {
    fn get_property(&self, key: &str) -> Result<Option<String>> {
        Ok(self.values.get(key).cloned())
    }

    fn set_property(&mut self, key: &str, value: &str) -> Result<()> {
        self.values.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn set_properties(&mut self, values: &HashMap<String, String>) -> Result<()> {
        self.values
            .extend(values.iter().map(|(k, v)| (k.clone(), v.clone())));
        Ok(())
    }
}

/// Property store persisted to a JSON file, so saved folder ids and tree
/// snapshots survive across sessions. Every mutation rewrites the file.
#[derive(Debug)]
pub struct JsonFileStore {
    path: PathBuf,
    values: HashMap<String, String>,
}

impl JsonFileStore {
    /// Open a store backed by `path`. A missing file is an empty store; a
    /// present but unparseable file is an error.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        let values = match std::fs::File::open(&path) {
            Ok(file) => serde_json::from_reader(file)?,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => HashMap::new(),
            Err(err) => return Err(err.into()),
        };
        Ok(JsonFileStore { path, values })
    }

    fn flush(&self) -> Result<()> {
        let file = std::fs::File::create(&self.path)?;
        serde_json::to_writer_pretty(file, &self.values)?;
        Ok(())
    }
}

impl PropertyStore for JsonFileStore {
    fn get_property(&self, key: &str) -> Result<Option<String>> {
        Ok(self.values.get(key).cloned())
    }

    fn set_property(&mut self, key: &str, value: &str) -> Result<()> {
        self.values.insert(key.to_string(), value.to_string());
        self.flush()
    }

    fn set_properties(&mut self, values: &HashMap<String, String>) -> Result<()> {
        self.values
            .extend(values.iter().map(|(k, v)| (k.clone(), v.clone())));
        self.flush()
    }
}
