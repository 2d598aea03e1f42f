// src/services/store_state.rs
//
// Estado normalizado da store. Uma única coleção de itens por id; tudo o que
// as telas veem (favoritos, lista filtrada, alertas ativos, alertas disparados)
// é derivado daqui na leitura.

use std::collections::{BTreeMap, BTreeSet, HashMap};

use serde::Serialize;

use crate::{
    common::persistence::PersistedState,
    models::{
        alerts::Alert,
        filters::{AdvancedFilters, FilterOptions, FilterPreferences, PrimaryFilter},
        inventory::{Container, Item, ItemId, ItemView, Place, Room, Tag, TagId},
        projects::Project,
    },
    services::{favorites::FavoriteLedger, filtering},
};

pub const LOCATION_SEPARATOR: &str = " > ";

// Escopos de carregamento/erro (um par loading/error por área)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Scope {
    Items,
    Alerts,
    Favorites,
    Locations,
    Projects,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ScopeStatus {
    pub loading: bool,
    pub error: Option<String>,
}

#[derive(Debug, Default)]
pub struct StoreState {
    pub items: BTreeMap<ItemId, Item>,

    pub rooms: Vec<Room>,
    pub places: Vec<Place>,
    pub containers: Vec<Container>,
    pub tags: Vec<Tag>,
    pub reference_loaded: bool,

    pub alerts: Vec<Alert>,
    pub favorites: FavoriteLedger,
    pub projects: Vec<Project>,

    // Override local item -> tags; quando presente, substitui as do servidor
    pub tag_overrides: BTreeMap<ItemId, Vec<TagId>>,

    pub search_query: String,
    pub applied_query: String,
    // Incrementa a cada tecla; só a última tarefa de debounce aplica a busca
    pub search_seq: u64,
    pub primary_filter: PrimaryFilter,
    pub advanced_filters: AdvancedFilters,
    pub filtered_ids: Vec<ItemId>,
    pub filter_generation: u64,

    pub selection_mode: bool,
    pub selected: BTreeSet<ItemId>,

    pub activity: HashMap<Scope, ScopeStatus>,
}

impl StoreState {
    pub fn restore(persisted: PersistedState) -> Self {
        Self {
            primary_filter: persisted.filter_preferences.primary,
            advanced_filters: persisted.filter_preferences.advanced,
            tag_overrides: persisted.item_tags,
            ..Default::default()
        }
    }

    pub fn persisted(&self) -> PersistedState {
        PersistedState {
            filter_preferences: FilterPreferences {
                primary: self.primary_filter,
                advanced: self.advanced_filters.clone(),
            },
            item_tags: self.tag_overrides.clone(),
        }
    }

    // ---
    // Escopos
    // ---
    pub fn begin(&mut self, scope: Scope) {
        let status = self.activity.entry(scope).or_default();
        status.loading = true;
        status.error = None;
    }

    pub fn finish(&mut self, scope: Scope, error: Option<String>) {
        let status = self.activity.entry(scope).or_default();
        status.loading = false;
        if error.is_some() {
            status.error = error;
        }
    }

    pub fn scope(&self, scope: Scope) -> ScopeStatus {
        self.activity.get(&scope).cloned().unwrap_or_default()
    }

    // ---
    // Derivações
    // ---
    /// "Cômodo > Lugar > Recipiente", só com os nós que existem.
    pub fn location_for(&self, item: &Item) -> Option<String> {
        let room = item
            .room_id
            .and_then(|id| self.rooms.iter().find(|r| r.id == id))
            .map(|r| r.name.as_str());
        let place = item
            .place_id
            .and_then(|id| self.places.iter().find(|p| p.id == id))
            .map(|p| p.name.as_str());
        let container = item
            .container_id
            .and_then(|id| self.containers.iter().find(|c| c.id == id))
            .map(|c| c.name.as_str());

        let parts: Vec<&str> = [room, place, container].into_iter().flatten().collect();
        if parts.is_empty() {
            None
        } else {
            Some(parts.join(LOCATION_SEPARATOR))
        }
    }

    pub fn resolved_tags(&self, item: &Item) -> Vec<Tag> {
        match self.tag_overrides.get(&item.id) {
            // Override substitui por completo, nunca mescla
            Some(tag_ids) => tag_ids
                .iter()
                .filter_map(|id| {
                    self.tags
                        .iter()
                        .find(|t| t.id == *id)
                        .or_else(|| item.tags.iter().find(|t| t.id == *id))
                        .cloned()
                })
                .collect(),
            None => item.tags.clone(),
        }
    }

    pub fn active_alerts_for(&self, item_id: ItemId) -> Vec<Alert> {
        self.alerts
            .iter()
            .filter(|a| a.item_id == item_id && a.is_active)
            .cloned()
            .collect()
    }

    pub fn view(&self, item: &Item) -> ItemView {
        ItemView {
            item: item.clone(),
            location: self.location_for(item),
            resolved_tags: self.resolved_tags(item),
            is_favorite: self.favorites.is_favorite(item.id),
            active_alerts: self.active_alerts_for(item.id),
        }
    }

    pub fn views(&self) -> Vec<ItemView> {
        self.items.values().map(|item| self.view(item)).collect()
    }

    pub fn filter_options(&self) -> FilterOptions {
        FilterOptions::new(&self.applied_query, self.primary_filter, &self.advanced_filters)
    }

    /// Recalcula a lista visível. É o único lugar que muda `filtered_ids`.
    pub fn apply_filters(&mut self) {
        let options = self.filter_options();
        self.filtered_ids = self
            .items
            .values()
            .map(|item| self.view(item))
            .filter(|view| filtering::matches(view, &options))
            .map(|view| view.item.id)
            .collect();
        self.filter_generation += 1;
    }

    /// Lista visível com o estado atual de cada item (inclusive favoritos).
    /// Itens removidos desde o último filtro simplesmente somem.
    pub fn filtered_views(&self) -> Vec<ItemView> {
        self.filtered_ids
            .iter()
            .filter_map(|id| self.items.get(id))
            .map(|item| self.view(item))
            .collect()
    }

    pub fn favorite_views(&self) -> Vec<ItemView> {
        self.items
            .values()
            .filter(|item| self.favorites.is_favorite(item.id))
            .map(|item| self.view(item))
            .collect()
    }

    /// Remove overrides de itens que não existem mais. Devolve quantos saíram.
    pub fn prune_orphan_overrides(&mut self) -> usize {
        let before = self.tag_overrides.len();
        let items = &self.items;
        self.tag_overrides.retain(|id, _| items.contains_key(id));
        before - self.tag_overrides.len()
    }
}
