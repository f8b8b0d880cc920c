//! In-memory lookup backed by a schema catalog file

use std::collections::{BTreeMap, HashMap};
use std::path::Path;
use std::sync::{Mutex, PoisonError};

use anyhow::{Context, Result, anyhow, bail};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use uuid::Uuid;

use super::DataLookup;
use crate::import::types::{Entity, MacGrants, Rights, TypeSchema};

/// Type schemas as stored in a catalog file
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SchemaCatalog {
    #[serde(default)]
    pub types: Vec<TypeSchema>,
}

impl SchemaCatalog {
    /// Load a catalog from TOML, or JSON when the extension is `.json`
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read schema catalog: {}", path.display()))?;

        let is_json = path
            .extension()
            .is_some_and(|ext| ext.eq_ignore_ascii_case("json"));

        if is_json {
            serde_json::from_str(&content)
                .with_context(|| format!("Invalid JSON schema catalog: {}", path.display()))
        } else {
            toml::from_str(&content)
                .with_context(|| format!("Invalid TOML schema catalog: {}", path.display()))
        }
    }
}

/// An entity as held by the store
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StoredEntity {
    pub id: String,
    #[serde(flatten)]
    pub entity: Entity,
}

/// Everything the store holds, for export
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct StoreSnapshot {
    pub entities: Vec<StoredEntity>,
    pub mac_by_alias: BTreeMap<String, MacGrants>,
    pub mac_by_type: BTreeMap<String, MacGrants>,
}

#[derive(Debug, Default)]
struct StoreState {
    entities: Vec<StoredEntity>,
    by_id: HashMap<String, usize>,
    by_alias: HashMap<String, usize>,
    mac_by_alias: BTreeMap<String, MacGrants>,
    mac_by_type: BTreeMap<String, MacGrants>,
}

/// Lookup that keeps schemas, entities and grants in memory
///
/// Entities get a generated UUID on `add`. Aliases are unique across the
/// whole store since `entity_by_alias` takes no type.
#[derive(Debug, Default)]
pub struct MemoryLookup {
    types: HashMap<String, TypeSchema>,
    state: Mutex<StoreState>,
}

impl MemoryLookup {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_types<I: IntoIterator<Item = TypeSchema>>(types: I) -> Self {
        MemoryLookup {
            types: types.into_iter().map(|t| (t.name.clone(), t)).collect(),
            state: Mutex::default(),
        }
    }

    pub fn from_catalog(catalog: SchemaCatalog) -> Self {
        Self::with_types(catalog.types)
    }

    pub fn from_schema_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        Ok(Self::from_catalog(SchemaCatalog::load(path)?))
    }

    /// Insert an entity directly, bypassing the import; returns its id
    pub fn seed(&self, entity: Entity) -> Result<String> {
        let mut state = self.state.lock().unwrap_or_else(PoisonError::into_inner);
        insert_entity(&mut state, entity)
    }

    pub fn entity_count(&self) -> usize {
        self.state
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .entities
            .len()
    }

    /// Stored entities of one type, in insertion order
    pub fn entities_of_type(&self, type_name: &str) -> Vec<StoredEntity> {
        let state = self.state.lock().unwrap_or_else(PoisonError::into_inner);
        state
            .entities
            .iter()
            .filter(|e| e.entity.type_name == type_name)
            .cloned()
            .collect()
    }

    pub fn snapshot(&self) -> StoreSnapshot {
        let state = self.state.lock().unwrap_or_else(PoisonError::into_inner);
        StoreSnapshot {
            entities: state.entities.clone(),
            mac_by_alias: state.mac_by_alias.clone(),
            mac_by_type: state.mac_by_type.clone(),
        }
    }
}

fn insert_entity(state: &mut StoreState, entity: Entity) -> Result<String> {
    if let Some(alias) = &entity.alias {
        if state.by_alias.contains_key(alias) {
            bail!("Alias '{}' is already in use", alias);
        }
    }

    let id = Uuid::new_v4().to_string();
    let index = state.entities.len();
    if let Some(alias) = &entity.alias {
        state.by_alias.insert(alias.clone(), index);
    }
    state.by_id.insert(id.clone(), index);
    state.entities.push(StoredEntity {
        id: id.clone(),
        entity,
    });
    Ok(id)
}

fn stored_to_json(stored: &StoredEntity) -> Result<Value> {
    serde_json::to_value(stored).context("Failed to serialize stored entity")
}

#[async_trait]
impl DataLookup for MemoryLookup {
    async fn type_by_name(&self, type_name: &str) -> Result<Option<TypeSchema>> {
        Ok(self.types.get(type_name).cloned())
    }

    async fn entity_by_id(&self, id: &str) -> Result<Value> {
        let state = self.state.lock().unwrap_or_else(PoisonError::into_inner);
        let index = state
            .by_id
            .get(id)
            .ok_or_else(|| anyhow!("No entity with id '{}'", id))?;
        stored_to_json(&state.entities[*index])
    }

    async fn entity_by_alias(&self, alias: &str) -> Result<Value> {
        let state = self.state.lock().unwrap_or_else(PoisonError::into_inner);
        let index = state
            .by_alias
            .get(alias)
            .ok_or_else(|| anyhow!("No entity with alias '{}'", alias))?;
        stored_to_json(&state.entities[*index])
    }

    async fn add(&self, type_name: &str, mut entity: Entity) -> Result<()> {
        entity.type_name = type_name.to_string();
        let mut state = self.state.lock().unwrap_or_else(PoisonError::into_inner);
        let id = insert_entity(&mut state, entity)?;
        log::debug!("Stored {} entity {}", type_name, id);
        Ok(())
    }

    async fn store_mac_by_alias(&self, alias: &str, role_name: &str, rights: Rights) -> Result<()> {
        let mut state = self.state.lock().unwrap_or_else(PoisonError::into_inner);
        state
            .mac_by_alias
            .entry(alias.to_string())
            .or_default()
            .insert(role_name.to_string(), rights);
        Ok(())
    }

    async fn store_mac_by_type(
        &self,
        type_name: &str,
        role_name: &str,
        rights: Rights,
    ) -> Result<()> {
        let mut state = self.state.lock().unwrap_or_else(PoisonError::into_inner);
        state
            .mac_by_type
            .entry(type_name.to_string())
            .or_default()
            .insert(role_name.to_string(), rights);
        Ok(())
    }

    /// The alias's grants when it has any, otherwise the type's
    fn retrieve_mac(&self, alias: Option<&str>, type_name: &str) -> MacGrants {
        let state = self.state.lock().unwrap_or_else(PoisonError::into_inner);
        alias
            .and_then(|alias| state.mac_by_alias.get(alias))
            .filter(|grants| !grants.is_empty())
            .or_else(|| state.mac_by_type.get(type_name))
            .cloned()
            .unwrap_or_default()
    }
}
