//! Chunked records over a bounded property store
//!
//! Property stores cap the size of a single value, but a mirrored folder tree
//! serializes to an arbitrarily large JSON text. [`ChunkedStore`] splits that
//! text into slices of at most `max_chunk` characters stored under
//! `key-0 .. key-(n-1)`, with a `key-num` sentinel holding the slice count.
//! Reassembly concatenates the slices in order and deserializes, reproducing
//! the payload exactly.
//!
//! Write protocol: all slices are written first, `key-num` strictly last. An
//! interrupted `put` therefore leaves either no count key or the previous
//! generation's count, never a count describing half-written slices. A `get`
//! stops strictly at the current count, so orphan slices left behind when a
//! record shrinks are ignored rather than deleted.

use std::collections::HashMap;

use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::error::{Error, Result};
use crate::store::PropertyStore;

/// Default slice size in characters, chosen to stay under the per-value
/// ceiling of typical document property stores (9 KiB values).
pub const MAX_CHUNK: usize = 9000;

/// Splits oversized serialized payloads across numbered sub-keys of a
/// [`PropertyStore`] and reassembles them on read.
///
/// A logical key has at most one writer at a time; the `&mut self` receiver
/// on [`put`](ChunkedStore::put) makes that discipline explicit.
#[derive(Debug)]
pub struct ChunkedStore<S> {
    store: S,
    max_chunk: usize,
}

impl<S: PropertyStore> ChunkedStore<S> {
    pub fn new(store: S) -> Self {
        Self::with_max_chunk(store, MAX_CHUNK)
    }

    /// A store with a custom slice size. `max_chunk` must be at least 1;
    /// smaller values are clamped.
    pub fn with_max_chunk(store: S, max_chunk: usize) -> Self {
        ChunkedStore {
            store,
            max_chunk: max_chunk.max(1),
        }
    }

    pub fn into_inner(self) -> S {
        self.store
    }

    /// Serialize `value` and write it under `key`, split into slices of at
    /// most `max_chunk` characters. A payload of exactly `k * max_chunk`
    /// characters produces `k` slices; an empty payload produces zero.
    pub fn put<T: Serialize>(&mut self, key: &str, value: &T) -> Result<()> {
        let text = serde_json::to_string(value)?;
        let slices = split_chunks(&text, self.max_chunk);

        let mut batch = HashMap::with_capacity(slices.len());
        for (i, slice) in slices.iter().enumerate() {
            batch.insert(format!("{key}-{i}"), (*slice).to_string());
        }
        self.store.set_properties(&batch)?;
        // The count key goes last: a put that dies mid-way is detectable as
        // "count absent or of a previous generation", never as a mismatched
        // reassembly.
        self.store
            .set_property(&format!("{key}-num"), &slices.len().to_string())?;
        log::debug!("{} stored in {} part(s)", key, slices.len());
        Ok(())
    }

    /// Read the record under `key`. Returns `Ok(None)` when no record is
    /// present; a present but unreadable record is `Corrupt`.
    pub fn get<T: DeserializeOwned>(&self, key: &str) -> Result<Option<T>> {
        let count = match self.store.get_property(&format!("{key}-num"))? {
            Some(raw) => raw
                .parse::<usize>()
                .map_err(|_| Error::Corrupt(format!("{key}-num is not a slice count: {raw:?}")))?,
            None => return Ok(None),
        };
        // A zero-slice record carries no payload and is treated as absent.
        if count == 0 {
            return Ok(None);
        }

        let mut text = String::new();
        for i in 0..count {
            let slice = self
                .store
                .get_property(&format!("{key}-{i}"))?
                .ok_or_else(|| Error::Corrupt(format!("{key}-{i} is missing")))?;
            text.push_str(&slice);
        }
        log::debug!("{} retrieved from {} part(s)", key, count);
        serde_json::from_str(&text)
            .map(Some)
            .map_err(|err| Error::Corrupt(format!("{key} does not deserialize: {err}")))
    }
}

/// Split `text` into slices of at most `max_chunk` characters (not bytes, so
/// a slice never ends inside a multi-byte code point).
fn split_chunks(text: &str, max_chunk: usize) -> Vec<&str> {
    let mut slices = Vec::new();
    let mut rest = text;
    while !rest.is_empty() {
        let end = rest
            .char_indices()
            .nth(max_chunk)
            .map_or(rest.len(), |(idx, _)| idx);
        let (head, tail) = rest.split_at(end);
        slices.push(head);
        rest = tail;
    }
    slices
}
