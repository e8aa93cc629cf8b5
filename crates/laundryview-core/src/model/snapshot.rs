// ── Room snapshot ──
//
// The immutable result of one successful refresh: appliance records in
// upstream order, indexed by identity key.

use chrono::{DateTime, Utc};
use indexmap::IndexMap;
use serde::Serialize;

use super::appliance::ApplianceRecord;
use crate::error::MalformedRecord;

#[derive(Debug, Clone, Serialize)]
pub struct Snapshot {
    records: IndexMap<String, ApplianceRecord>,
    fetched_at: DateTime<Utc>,
}

impl Snapshot {
    /// Build a snapshot from mapped records.
    ///
    /// Identity keys must be unique within a room. On a duplicate, returns
    /// the position of the second occurrence alongside the error.
    pub fn from_records(
        records: Vec<ApplianceRecord>,
    ) -> Result<Self, (usize, MalformedRecord)> {
        let mut by_key = IndexMap::with_capacity(records.len());
        for (index, record) in records.into_iter().enumerate() {
            let key = record.identity_key.clone();
            if by_key.contains_key(&key) {
                return Err((index, MalformedRecord::DuplicateIdentity { key }));
            }
            by_key.insert(key, record);
        }
        Ok(Self {
            records: by_key,
            fetched_at: Utc::now(),
        })
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Records in upstream order.
    pub fn iter(&self) -> impl Iterator<Item = &ApplianceRecord> {
        self.records.values()
    }

    /// Identity keys in upstream order.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.records.keys().map(String::as_str)
    }

    pub fn get(&self, identity_key: &str) -> Option<&ApplianceRecord> {
        self.records.get(identity_key)
    }

    /// Record at an upstream list position.
    pub fn get_index(&self, index: usize) -> Option<&ApplianceRecord> {
        self.records.get_index(index).map(|(_, r)| r)
    }

    /// Upstream list position of an identity key.
    pub fn position(&self, identity_key: &str) -> Option<usize> {
        self.records.get_index_of(identity_key)
    }

    pub fn contains(&self, identity_key: &str) -> bool {
        self.records.contains_key(identity_key)
    }

    pub fn fetched_at(&self) -> DateTime<Utc> {
        self.fetched_at
    }
}
