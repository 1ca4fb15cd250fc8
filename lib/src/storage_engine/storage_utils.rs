// lib/src/storage_engine/storage_utils.rs

use bincode::config::{self, Configuration};
use bincode::serde::{decode_from_slice, encode_to_vec};
use log::{debug, warn};
use models::errors::{HealthError, HealthResult};
use serde::de::DeserializeOwned;
use serde::Serialize;
use sled::Tree;

fn bincode_config() -> Configuration {
    config::standard()
}

pub fn encode<T: Serialize>(value: &T) -> HealthResult<Vec<u8>> {
    Ok(encode_to_vec(value, bincode_config())?)
}

pub fn decode<T: DeserializeOwned>(bytes: &[u8]) -> HealthResult<T> {
    let (value, _): (T, usize) = decode_from_slice(bytes, bincode_config())?;
    Ok(value)
}

pub fn get_record<T: DeserializeOwned>(tree: &Tree, id: &str) -> HealthResult<Option<T>> {
    match tree.get(id.as_bytes())? {
        Some(bytes) => Ok(Some(decode(&bytes)?)),
        None => Ok(None),
    }
}

pub fn put_record<T: Serialize>(tree: &Tree, id: &str, value: &T) -> HealthResult<()> {
    tree.insert(id.as_bytes(), encode(value)?)?;
    Ok(())
}

/// Decodes every record in the tree, in key order.
pub fn scan_records<T: DeserializeOwned>(tree: &Tree) -> HealthResult<Vec<T>> {
    let mut records = Vec::with_capacity(tree.len());
    for item in tree.iter() {
        let (_key, value) = item?;
        records.push(decode(&value)?);
    }
    Ok(records)
}

/// Read-modify-write of a single record. The write only lands if the stored
/// bytes are unchanged since the read; otherwise the merge is replayed on the
/// fresh value.
pub fn update_record<T, F>(tree: &Tree, entity: &'static str, id: &str, mut apply: F) -> HealthResult<T>
where
    T: Serialize + DeserializeOwned,
    F: FnMut(&mut T),
{
    loop {
        let current = tree
            .get(id.as_bytes())?
            .ok_or_else(|| HealthError::not_found(entity, id))?;
        let mut record: T = decode(&current)?;
        apply(&mut record);
        let encoded = encode(&record)?;
        match tree.compare_and_swap(id.as_bytes(), Some(&current), Some(encoded))? {
            Ok(()) => return Ok(record),
            Err(_) => debug!("Concurrent write to {} {}, retrying update", entity, id),
        }
    }
}

/// Claims `key` in a unique index tree for `id`. Fails if another record holds it.
pub fn claim_unique(index: &Tree, key: &str, id: &str, what: &str) -> HealthResult<()> {
    match index.compare_and_swap(key.as_bytes(), None::<&[u8]>, Some(id.as_bytes()))? {
        Ok(()) => Ok(()),
        Err(_) => Err(HealthError::AlreadyExists(format!("{} '{}' is already taken", what, key))),
    }
}

/// Releases `key` if `id` still holds it.
pub fn release_unique(index: &Tree, key: &str, id: &str) -> HealthResult<()> {
    if index.compare_and_swap(key.as_bytes(), Some(id.as_bytes()), None::<&[u8]>)?.is_err() {
        warn!("Unique key '{}' is no longer held by {}", key, id);
    }
    Ok(())
}

/// Claims `key` for `id`, then runs `write`. A failed write gives the key back
/// so it does not stay reserved without a record behind it.
pub fn with_unique_claim<F>(index: &Tree, key: &str, id: &str, what: &str, write: F) -> HealthResult<()>
where
    F: FnOnce() -> HealthResult<()>,
{
    claim_unique(index, key, id, what)?;
    if let Err(e) = write() {
        release_unique(index, key, id)?;
        return Err(e);
    }
    Ok(())
}

/// Stores `value` under `id` in `tree`, guarded by a unique `key` in `index`.
pub fn insert_unique<T: Serialize>(
    index: &Tree,
    what: &str,
    tree: &Tree,
    key: &str,
    id: &str,
    value: &T,
) -> HealthResult<()> {
    with_unique_claim(index, key, id, what, || put_record(tree, id, value))
}

pub fn read_counter(bytes: &[u8]) -> u64 {
    <[u8; 8]>::try_from(bytes).map(u64::from_be_bytes).unwrap_or(0)
}

/// Atomically increments a big-endian u64 counter row and returns the new value.
pub fn next_in_sequence(tree: &Tree, key: &[u8]) -> HealthResult<u64> {
    let updated = tree.update_and_fetch(key, |old| {
        let current = old.map(read_counter).unwrap_or(0);
        Some((current + 1).to_be_bytes().to_vec())
    })?;
    Ok(updated.as_deref().map(read_counter).unwrap_or(0))
}
