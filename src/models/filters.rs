// src/models/filters.rs

use serde::{Deserialize, Serialize};

use crate::models::inventory::{ContainerId, ItemStatus, PlaceId, RoomId, TagId};

// --- Seletor principal (chips do topo da lista) ---
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "kind", content = "status", rename_all = "snake_case")]
pub enum PrimaryFilter {
    #[default]
    All,
    Favorites,
    Consumables,
    Status(ItemStatus),
}

// --- Filtros avançados (multi-seleção) ---
// Um valor por categoria; alternar = entra se ausente, sai se presente.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AdvancedFilter {
    Room(RoomId),
    Place(PlaceId),
    Container(ContainerId),
    Tag(TagId),
    Status(ItemStatus),
}

/// Listas de multi-seleção. Lista vazia = sem restrição.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct AdvancedFilters {
    #[serde(default)]
    pub room_ids: Vec<RoomId>,
    #[serde(default)]
    pub place_ids: Vec<PlaceId>,
    #[serde(default)]
    pub container_ids: Vec<ContainerId>,
    #[serde(default)]
    pub tag_ids: Vec<TagId>,
    #[serde(default)]
    pub statuses: Vec<ItemStatus>,
}

fn toggle_in<T: PartialEq>(list: &mut Vec<T>, value: T) {
    if let Some(pos) = list.iter().position(|v| *v == value) {
        list.remove(pos);
    } else {
        list.push(value);
    }
}

impl AdvancedFilters {
    pub fn toggle(&mut self, filter: AdvancedFilter) {
        match filter {
            AdvancedFilter::Room(id) => toggle_in(&mut self.room_ids, id),
            AdvancedFilter::Place(id) => toggle_in(&mut self.place_ids, id),
            AdvancedFilter::Container(id) => toggle_in(&mut self.container_ids, id),
            AdvancedFilter::Tag(id) => toggle_in(&mut self.tag_ids, id),
            AdvancedFilter::Status(status) => toggle_in(&mut self.statuses, status),
        }
    }

    pub fn contains(&self, filter: AdvancedFilter) -> bool {
        match filter {
            AdvancedFilter::Room(id) => self.room_ids.contains(&id),
            AdvancedFilter::Place(id) => self.place_ids.contains(&id),
            AdvancedFilter::Container(id) => self.container_ids.contains(&id),
            AdvancedFilter::Tag(id) => self.tag_ids.contains(&id),
            AdvancedFilter::Status(status) => self.statuses.contains(&status),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.room_ids.is_empty()
            && self.place_ids.is_empty()
            && self.container_ids.is_empty()
            && self.tag_ids.is_empty()
            && self.statuses.is_empty()
    }

    /// Quantidade de filtros selecionados (badge do botão de filtros).
    pub fn active_count(&self) -> usize {
        self.room_ids.len()
            + self.place_ids.len()
            + self.container_ids.len()
            + self.tag_ids.len()
            + self.statuses.len()
    }
}

// --- Consulta completa usada por `filter_items` ---
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FilterOptions {
    pub search_query: String,
    pub status: Option<ItemStatus>,
    pub favorites_only: bool,
    pub consumables_only: bool,
    pub advanced: AdvancedFilters,
}

impl FilterOptions {
    pub fn new(search_query: &str, primary: PrimaryFilter, advanced: &AdvancedFilters) -> Self {
        let mut options = FilterOptions {
            search_query: search_query.to_string(),
            advanced: advanced.clone(),
            ..Default::default()
        };
        match primary {
            PrimaryFilter::All => {}
            PrimaryFilter::Favorites => options.favorites_only = true,
            PrimaryFilter::Consumables => options.consumables_only = true,
            PrimaryFilter::Status(status) => options.status = Some(status),
        }
        options
    }
}

// Preferências que sobrevivem a reinícios do app (a busca não entra aqui)
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct FilterPreferences {
    #[serde(default)]
    pub primary: PrimaryFilter,
    #[serde(default)]
    pub advanced: AdvancedFilters,
}
