// src/common/persistence.rs
//
// Camada chave-valor local. Cada "partição" é um documento JSON inteiro;
// a store grava tudo o que persiste sob uma única partição.

use std::{
    collections::{BTreeMap, HashMap},
    fs,
    io::ErrorKind,
    path::PathBuf,
    sync::{Arc, Mutex, PoisonError},
};

use serde::{Deserialize, Serialize};

use crate::{
    common::error::AppError,
    models::{
        filters::FilterPreferences,
        inventory::{ItemId, TagId},
    },
};

/// Nome da partição que guarda as preferências e o override de tags.
pub const INVENTORY_PARTITION: &str = "inventory-storage";

pub trait KeyValueStore: Send + Sync {
    fn read(&self, partition: &str) -> Result<Option<String>, AppError>;
    fn write(&self, partition: &str, contents: &str) -> Result<(), AppError>;
}

// ---
// Implementação em arquivo: um `<partição>.json` por partição
// ---
#[derive(Debug, Clone)]
pub struct FileStore {
    dir: PathBuf,
}

impl FileStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    fn path_for(&self, partition: &str) -> Result<PathBuf, AppError> {
        let valid = !partition.is_empty()
            && partition
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_');
        if !valid {
            return Err(AppError::Storage(format!("Nome de partição inválido: '{partition}'")));
        }
        Ok(self.dir.join(format!("{partition}.json")))
    }
}

impl KeyValueStore for FileStore {
    fn read(&self, partition: &str) -> Result<Option<String>, AppError> {
        let path = self.path_for(partition)?;
        match fs::read_to_string(&path) {
            Ok(contents) => Ok(Some(contents)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn write(&self, partition: &str, contents: &str) -> Result<(), AppError> {
        let path = self.path_for(partition)?;
        fs::create_dir_all(&self.dir)?;

        // Escreve num temporário e renomeia: nunca deixa o JSON pela metade
        let tmp = path.with_extension("json.tmp");
        fs::write(&tmp, contents)?;
        fs::rename(&tmp, &path)?;
        Ok(())
    }
}

// ---
// Implementação em memória (testes e ambientes sem disco)
// ---
#[derive(Debug, Default, Clone)]
pub struct MemoryStore {
    partitions: Arc<Mutex<HashMap<String, String>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStore for MemoryStore {
    fn read(&self, partition: &str) -> Result<Option<String>, AppError> {
        let partitions = self.partitions.lock().unwrap_or_else(PoisonError::into_inner);
        Ok(partitions.get(partition).cloned())
    }

    fn write(&self, partition: &str, contents: &str) -> Result<(), AppError> {
        let mut partitions = self.partitions.lock().unwrap_or_else(PoisonError::into_inner);
        partitions.insert(partition.to_string(), contents.to_string());
        Ok(())
    }
}

// ---
// O que sobrevive a reinícios
// ---
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct PersistedState {
    #[serde(default)]
    pub filter_preferences: FilterPreferences,
    // Override local item -> tags (substitui as tags do servidor)
    #[serde(default)]
    pub item_tags: BTreeMap<ItemId, Vec<TagId>>,
}

#[derive(Clone)]
pub struct PreferenceStore {
    storage: Arc<dyn KeyValueStore>,
    partition: String,
}

impl PreferenceStore {
    pub fn new(storage: Arc<dyn KeyValueStore>) -> Self {
        Self::with_partition(storage, INVENTORY_PARTITION)
    }

    pub fn with_partition(storage: Arc<dyn KeyValueStore>, partition: &str) -> Self {
        Self { storage, partition: partition.to_string() }
    }

    pub fn in_memory() -> Self {
        Self::new(Arc::new(MemoryStore::new()))
    }

    pub fn load(&self) -> Result<PersistedState, AppError> {
        match self.storage.read(&self.partition)? {
            Some(contents) => Ok(serde_json::from_str(&contents)?),
            None => Ok(PersistedState::default()),
        }
    }

    pub fn save(&self, state: &PersistedState) -> Result<(), AppError> {
        let contents = serde_json::to_string(state)?;
        self.storage.write(&self.partition, &contents)
    }
}
