//! Test double that records every lookup call

use std::collections::HashSet;
use std::sync::Mutex;

use anyhow::{Result, bail};
use async_trait::async_trait;
use serde_json::Value;

use super::{DataLookup, MemoryLookup};
use crate::import::types::{Entity, MacGrants, Rights, TypeSchema};

/// Wraps a [`MemoryLookup`] and logs calls as `operation(args)` strings
#[derive(Debug, Default)]
pub(crate) struct RecordingLookup {
    pub inner: MemoryLookup,
    calls: Mutex<Vec<String>>,
    failing_adds: HashSet<String>,
}

impl RecordingLookup {
    pub fn new(inner: MemoryLookup) -> Self {
        RecordingLookup {
            inner,
            calls: Mutex::default(),
            failing_adds: HashSet::new(),
        }
    }

    pub fn with_types<I: IntoIterator<Item = TypeSchema>>(types: I) -> Self {
        Self::new(MemoryLookup::with_types(types))
    }

    /// Make `add` fail for entities carrying this alias
    pub fn fail_add_for(mut self, alias: &str) -> Self {
        self.failing_adds.insert(alias.to_string());
        self
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    pub fn calls_to(&self, operation: &str) -> Vec<String> {
        let prefix = format!("{}(", operation);
        self.calls()
            .into_iter()
            .filter(|c| c.starts_with(&prefix))
            .collect()
    }

    fn record(&self, call: String) {
        self.calls.lock().unwrap().push(call);
    }
}

#[async_trait]
impl DataLookup for RecordingLookup {
    async fn type_by_name(&self, type_name: &str) -> Result<Option<TypeSchema>> {
        self.record(format!("typeByName({})", type_name));
        // Give other row pipelines a chance to interleave
        tokio::task::yield_now().await;
        self.inner.type_by_name(type_name).await
    }

    async fn entity_by_id(&self, id: &str) -> Result<Value> {
        self.record(format!("entityById({})", id));
        self.inner.entity_by_id(id).await
    }

    async fn entity_by_alias(&self, alias: &str) -> Result<Value> {
        self.record(format!("entityByAlias({})", alias));
        self.inner.entity_by_alias(alias).await
    }

    async fn add(&self, type_name: &str, entity: Entity) -> Result<()> {
        self.record(format!(
            "add({}, {})",
            type_name,
            entity.alias.as_deref().unwrap_or("-")
        ));
        if let Some(alias) = &entity.alias {
            if self.failing_adds.contains(alias) {
                bail!("store rejected '{}'", alias);
            }
        }
        self.inner.add(type_name, entity).await
    }

    async fn store_mac_by_alias(&self, alias: &str, role_name: &str, rights: Rights) -> Result<()> {
        self.record(format!("storeMacByAlias({}, {}, {:?})", alias, role_name, rights));
        self.inner.store_mac_by_alias(alias, role_name, rights).await
    }

    async fn store_mac_by_type(
        &self,
        type_name: &str,
        role_name: &str,
        rights: Rights,
    ) -> Result<()> {
        self.record(format!(
            "storeMacByType({}, {}, {:?})",
            type_name, role_name, rights
        ));
        self.inner.store_mac_by_type(type_name, role_name, rights).await
    }

    fn retrieve_mac(&self, alias: Option<&str>, type_name: &str) -> MacGrants {
        self.record(format!(
            "retrieveMac({}, {})",
            alias.unwrap_or("-"),
            type_name
        ));
        self.inner.retrieve_mac(alias, type_name)
    }
}
