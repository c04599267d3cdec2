//! ScopeRegistry: the set of declared scopes with write-through persistence.

use crate::domain::scope::Scope;
use crate::storage::{BlobStore, StoreError};
use serde_json::{Map, Value as JsonValue};
use tracing::{debug, warn};

/// Holds every declared scope and the blob store backing them.
///
/// Each mutating operation persists the whole affected scope before it
/// returns: `add_one`, `edit_one`, `remove_one` and `remove_all` once per
/// call, `add_many` once per batch. Validation failures and missing
/// records are reported as `false`; only persistence problems are errors.
pub struct ScopeRegistry {
    store: BlobStore,
    scopes: Vec<Scope>,
}

impl ScopeRegistry {
    /// Builds a registry over `store`, loading the persisted value set of
    /// every scope. A missing or malformed blob leaves the scope empty.
    pub fn open(store: BlobStore, scopes: Vec<Scope>) -> Result<Self, StoreError> {
        let mut registry = Self { store, scopes };
        for index in 0..registry.scopes.len() {
            registry.load(index)?;
        }
        Ok(registry)
    }

    fn load(&mut self, index: usize) -> Result<(), StoreError> {
        let scope = &mut self.scopes[index];
        let Some(bytes) = self.store.read(&scope.name)? else {
            return Ok(());
        };

        match serde_json::from_slice::<Scope>(&bytes) {
            Ok(persisted) => scope.values = persisted.values,
            Err(error) => {
                warn!(scope = %scope.name, %error, "ignoring malformed persisted scope")
            }
        }
        Ok(())
    }

    /// Serializes the full scope (metadata + values) under its registry name.
    fn persist(&self, scope: &Scope) -> Result<(), StoreError> {
        let bytes = serde_json::to_vec(scope)?;
        self.store.write(&scope.name, &bytes)
    }

    pub fn scope_names(&self) -> Vec<&str> {
        self.scopes.iter().map(|scope| scope.name.as_str()).collect()
    }

    /// Case-insensitive lookup; the router matches scope segments without
    /// case sensitivity, record keys stay case-sensitive.
    pub fn resolve(&self, name: &str) -> Option<&Scope> {
        self.scopes.iter().find(|scope| scope.name.eq_ignore_ascii_case(name))
    }

    fn resolve_index(&self, name: &str) -> Option<usize> {
        self.scopes.iter().position(|scope| scope.name.eq_ignore_ascii_case(name))
    }

    /// Inserts one record. Returns `Ok(false)` without mutating when the
    /// scope is unknown or the projected record is rejected. An existing
    /// key is overwritten silently.
    pub fn add_one(&mut self, name: &str, fields: &JsonValue) -> Result<bool, StoreError> {
        let Some(index) = self.resolve_index(name) else {
            return Ok(false);
        };
        let Some((key, record)) = self.scopes[index].project(fields) else {
            return Ok(false);
        };

        self.scopes[index].values.insert(key, record);
        self.persist(&self.scopes[index])?;
        Ok(true)
    }

    /// Inserts a batch with the same per-item semantics as [`add_one`],
    /// persisting once after the whole batch.
    ///
    /// [`add_one`]: ScopeRegistry::add_one
    pub fn add_many(
        &mut self,
        name: &str,
        fields_list: &[JsonValue],
    ) -> Result<Vec<bool>, StoreError> {
        let Some(index) = self.resolve_index(name) else {
            return Ok(vec![false; fields_list.len()]);
        };

        let mut outcomes = Vec::with_capacity(fields_list.len());
        for (position, fields) in fields_list.iter().enumerate() {
            let accepted = match self.scopes[index].project(fields) {
                Some((key, record)) => {
                    self.scopes[index].values.insert(key, record);
                    true
                }
                None => false,
            };
            outcomes.push(accepted);
            debug!(
                scope = name,
                done = position + 1,
                total = fields_list.len(),
                accepted,
                "batch insert progress"
            );
        }

        self.persist(&self.scopes[index])?;
        Ok(outcomes)
    }

    /// Partial update: overlays only the declared columns present in
    /// `fields` onto the existing record. The primary-key column is never
    /// copied into the record (its value lives in the key). Returns
    /// `Ok(false)` when there is no record at `key`.
    pub fn edit_one(
        &mut self,
        name: &str,
        key: &str,
        fields: &JsonValue,
    ) -> Result<bool, StoreError> {
        let Some(index) = self.resolve_index(name) else {
            return Ok(false);
        };

        let empty = Map::new();
        let fields = fields.as_object().unwrap_or(&empty);
        let scope = &self.scopes[index];
        if !scope.values.contains_key(key) {
            return Ok(false);
        }

        let updates: Vec<(String, JsonValue)> = scope
            .columns
            .iter()
            .filter(|column| scope.primary_key.as_deref() != Some(column.as_str()))
            .filter_map(|column| {
                fields
                    .get(column.as_str())
                    .map(|value| (column.clone(), value.clone()))
            })
            .collect();

        if let Some(JsonValue::Object(record)) = self.scopes[index].values.get_mut(key) {
            for (column, value) in updates {
                record.insert(column, value);
            }
        }

        self.persist(&self.scopes[index])?;
        Ok(true)
    }

    /// Deletes the record at `key`; the order of the remaining records is
    /// preserved. Returns `Ok(false)` when there is nothing to delete.
    pub fn remove_one(&mut self, name: &str, key: &str) -> Result<bool, StoreError> {
        let Some(index) = self.resolve_index(name) else {
            return Ok(false);
        };
        if self.scopes[index].values.shift_remove(key).is_none() {
            return Ok(false);
        }

        self.persist(&self.scopes[index])?;
        Ok(true)
    }

    /// Clears every record of the scope, unconditionally.
    pub fn remove_all(&mut self, name: &str) -> Result<(), StoreError> {
        let Some(index) = self.resolve_index(name) else {
            return Ok(());
        };
        self.scopes[index].values.clear();
        self.persist(&self.scopes[index])
    }

    pub fn get_one(&self, name: &str, key: &str) -> Option<&JsonValue> {
        self.resolve(name)?.values.get(key)
    }

    /// The full key-to-record mapping, insertion order preserved.
    pub fn get_all(&self, name: &str) -> Option<&Map<String, JsonValue>> {
        self.resolve(name).map(|scope| &scope.values)
    }
}
