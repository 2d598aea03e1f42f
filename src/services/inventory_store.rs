// src/services/inventory_store.rs

use std::{
    collections::HashMap,
    sync::{Arc, Mutex, MutexGuard, PoisonError},
    time::Duration,
};

use tokio::{runtime::Handle, task::JoinHandle};
use validator::{Validate, ValidationErrors};

use crate::{
    api::InventoryApi,
    common::{error::AppError, persistence::PreferenceStore},
    config::DEFAULT_SEARCH_DEBOUNCE_MS,
    models::{
        filters::{AdvancedFilter, AdvancedFilters, PrimaryFilter},
        forms::{ItemForm, ItemPatch},
        inventory::{Container, Item, ItemId, ItemStatus, ItemView, Place, PlaceId, Room, RoomId, Tag, TagId},
    },
    services::{
        filtering,
        store_state::{Scope, ScopeStatus, StoreState},
    },
};

#[derive(Debug, Clone)]
pub struct StoreSettings {
    pub search_debounce: Duration,
}

impl Default for StoreSettings {
    fn default() -> Self {
        Self { search_debounce: Duration::from_millis(DEFAULT_SEARCH_DEBOUNCE_MS) }
    }
}

/// Valores presentes na coleção atual, para os chips de filtro.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FilterChips {
    pub rooms: Vec<Room>,
    pub places: Vec<Place>,
    pub containers: Vec<Container>,
    pub tags: Vec<Tag>,
    pub statuses: Vec<ItemStatus>,
}

pub(crate) struct StoreInner {
    pub(crate) api: Arc<dyn InventoryApi>,
    prefs: PreferenceStore,
    settings: StoreSettings,
    state: Mutex<StoreState>,
    persist_lock: Mutex<()>,
    search_task: Mutex<Option<JoinHandle<()>>>,
    // Runtime de quem criou a store; o debounce agenda nele
    runtime: Option<Handle>,
    pub(crate) favorite_queues: Mutex<HashMap<ItemId, Arc<tokio::sync::Mutex<()>>>>,
}

// A store única compartilhada por todas as telas. Clonar é barato (Arc).
//
// Nenhum lock síncrono atravessa um `.await`: cada ação aplica a mudança
// local, solta o estado, espera o backend e depois confirma ou compensa.
#[derive(Clone)]
pub struct InventoryStore {
    pub(crate) inner: Arc<StoreInner>,
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

impl InventoryStore {
    /// Cria a store e restaura preferências e override de tags persistidos.
    pub fn new(api: Arc<dyn InventoryApi>, prefs: PreferenceStore, settings: StoreSettings) -> Self {
        let persisted = match prefs.load() {
            Ok(persisted) => persisted,
            Err(e) => {
                tracing::warn!("Não foi possível restaurar o estado local, usando padrões: {}", e);
                Default::default()
            }
        };

        let state = StoreState::restore(persisted);
        Self {
            inner: Arc::new(StoreInner {
                api,
                prefs,
                settings,
                state: Mutex::new(state),
                persist_lock: Mutex::new(()),
                search_task: Mutex::new(None),
                runtime: Handle::try_current().ok(),
                favorite_queues: Mutex::new(HashMap::new()),
            }),
        }
    }

    pub(crate) fn with_state<R>(&self, f: impl FnOnce(&mut StoreState) -> R) -> R {
        let mut state = lock(&self.inner.state);
        f(&mut state)
    }

    pub(crate) fn api(&self) -> &dyn InventoryApi {
        self.inner.api.as_ref()
    }

    /// Grava preferências e override de tags. Falha de disco só vira log.
    pub(crate) fn persist(&self) {
        let _guard = lock(&self.inner.persist_lock);
        let snapshot = self.with_state(|s| s.persisted());
        if let Err(e) = self.inner.prefs.save(&snapshot) {
            tracing::warn!("Falha ao persistir o estado local: {}", e);
        }
    }

    /// Encerra o escopo com erro, registra e devolve o erro para quem precisa dele.
    pub(crate) fn fail(&self, scope: Scope, err: AppError) -> AppError {
        tracing::error!("{:?}: {}", scope, err);
        let message = err.user_message();
        self.with_state(|s| s.finish(scope, Some(message)));
        err
    }

    /// Abre o escopo antes da chamada; falha de validação já fica registrada nele.
    pub(crate) fn begin_scoped(&self, scope: Scope, validation: Result<(), ValidationErrors>) -> Result<(), AppError> {
        self.with_state(|s| s.begin(scope));
        validation.map_err(|e| self.fail(scope, e.into()))
    }

    // ---
    // Leituras
    // ---
    pub fn items(&self) -> Vec<ItemView> {
        self.with_state(|s| s.views())
    }

    pub fn item(&self, id: ItemId) -> Option<ItemView> {
        self.with_state(|s| s.items.get(&id).map(|item| s.view(item)))
    }

    pub fn favorite_items(&self) -> Vec<ItemView> {
        self.with_state(|s| s.favorite_views())
    }

    pub fn filtered_items(&self) -> Vec<ItemView> {
        self.with_state(|s| s.filtered_views())
    }

    pub fn rooms(&self) -> Vec<Room> {
        self.with_state(|s| s.rooms.clone())
    }

    pub fn places(&self) -> Vec<Place> {
        self.with_state(|s| s.places.clone())
    }

    pub fn containers(&self) -> Vec<Container> {
        self.with_state(|s| s.containers.clone())
    }

    pub fn tags(&self) -> Vec<Tag> {
        self.with_state(|s| s.tags.clone())
    }

    pub fn tag_override(&self, id: ItemId) -> Option<Vec<TagId>> {
        self.with_state(|s| s.tag_overrides.get(&id).cloned())
    }

    pub fn status(&self, scope: Scope) -> ScopeStatus {
        self.with_state(|s| s.scope(scope))
    }

    pub fn error(&self, scope: Scope) -> Option<String> {
        self.status(scope).error
    }

    pub fn is_loading(&self, scope: Scope) -> bool {
        self.status(scope).loading
    }

    pub fn clear_error(&self, scope: Scope) {
        self.with_state(|s| {
            if let Some(status) = s.activity.get_mut(&scope) {
                status.error = None;
            }
        });
    }

    pub fn filter_chips(&self) -> FilterChips {
        self.with_state(|s| {
            let views = s.views();
            FilterChips {
                rooms: filtering::present_rooms(&views, &s.rooms),
                places: filtering::present_places(&views, &s.places),
                containers: filtering::present_containers(&views, &s.containers),
                tags: filtering::present_tags(&views),
                statuses: filtering::present_statuses(&views),
            }
        })
    }

    // ---
    // Itens
    // ---

    /// Busca todos os itens (e os favoritos), substitui a coleção local e refiltra.
    /// Erros ficam no escopo `Items`; os dados antigos continuam visíveis.
    pub async fn load_items(&self) {
        self.with_state(|s| s.begin(Scope::Items));

        if !self.with_state(|s| s.reference_loaded) {
            // Sem locais a string de localização sai vazia, mas a lista ainda carrega
            if let Err(e) = self.fetch_reference_data().await {
                tracing::warn!("Dados de locais indisponíveis ao carregar itens: {}", e);
            }
        }

        let api = self.api();
        let (items, favorites) = tokio::join!(api.get_items(), api.get_favorites());

        let items = match items {
            Ok(items) => items,
            Err(e) => {
                self.fail(Scope::Items, e);
                return;
            }
        };

        match favorites {
            Ok(favorites) => self.with_state(|s| {
                s.favorites.replace_confirmed(favorites.iter().map(|f| f.item_id));
                s.finish(Scope::Favorites, None);
            }),
            Err(e) => {
                // Mantém o último conjunto confirmado
                self.fail(Scope::Favorites, e);
            }
        }

        let count = items.len();
        let pruned = self.with_state(|s| {
            s.items = items.into_iter().map(|item| (item.id, item)).collect();
            let items = &s.items;
            s.selected.retain(|id| items.contains_key(id));
            let pruned = s.prune_orphan_overrides();
            s.apply_filters();
            s.finish(Scope::Items, None);
            pruned
        });

        if pruned > 0 {
            tracing::debug!("{} overrides de tags órfãos removidos", pruned);
            self.persist();
        }
        tracing::info!("📦 {} itens carregados", count);
    }

    /// Cria um item. Exige ao menos um cômodo e um lugar cadastrados.
    /// Devolve o erro para o formulário poder continuar aberto.
    pub async fn add_item(&self, form: ItemForm) -> Result<Item, AppError> {
        self.begin_scoped(Scope::Items, form.validate())?;

        if !self.with_state(|s| s.reference_loaded) {
            if let Err(e) = self.fetch_reference_data().await {
                return Err(self.fail(Scope::Items, e));
            }
        }

        let location = self.with_state(|s| default_location(s, form.room_id, form.place_id));
        let (room_id, place_id) = match location {
            Ok(ids) => ids,
            Err(e) => return Err(self.fail(Scope::Items, e)),
        };

        let created = match self.api().create_item(&form.to_request(room_id, place_id)).await {
            Ok(item) => item,
            Err(e) => return Err(self.fail(Scope::Items, e)),
        };
        tracing::info!("✅ Item {} criado ({})", created.id, created.name);

        if !form.tag_ids.is_empty() {
            // A tela já mostra as tags, com ou sem suporte do servidor
            self.with_state(|s| s.tag_overrides.insert(created.id, form.tag_ids.clone()));
            self.persist();
            self.mirror_tags(created.id, &form.tag_ids).await;
        }

        // Recarrega para pegar os campos calculados pelo servidor
        self.load_items().await;
        Ok(created)
    }

    /// Aplica tudo localmente na hora; só o subconjunto aceito vai ao backend.
    /// Em falha, recarrega do servidor para descartar a mudança otimista.
    pub async fn update_item(&self, id: ItemId, patch: ItemPatch) -> Result<(), AppError> {
        self.begin_scoped(Scope::Items, patch.validate())?;

        let (remote, local) = patch.split();
        // Override anterior, para desfazer junto com o resto em caso de falha
        let applied = self.with_state(|s| {
            let item = s.items.get_mut(&id)?;
            patch.apply_to(item);
            let previous = s.tag_overrides.get(&id).cloned();
            if let Some(tag_ids) = &local.tag_ids {
                s.tag_overrides.insert(id, tag_ids.clone());
            }
            s.apply_filters();
            Some(previous)
        });
        let Some(previous_override) = applied else {
            return Err(self.fail(Scope::Items, AppError::ItemNotFound(id)));
        };
        if local.tag_ids.is_some() {
            self.persist();
        }
        tracing::debug!("Item {} atualizado localmente", id);

        if !remote.is_empty() {
            if let Err(e) = self.api().update_item(id, &remote).await {
                if local.tag_ids.is_some() {
                    self.with_state(|s| match previous_override {
                        Some(tag_ids) => s.tag_overrides.insert(id, tag_ids),
                        None => s.tag_overrides.remove(&id),
                    });
                    self.persist();
                }
                self.load_items().await;
                return Err(self.fail(Scope::Items, e));
            }
        }

        if let Some(tag_ids) = &local.tag_ids {
            self.mirror_tags(id, tag_ids).await;
        }

        self.with_state(|s| s.finish(Scope::Items, None));
        Ok(())
    }

    pub async fn delete_item(&self, id: ItemId) {
        self.delete_items(&[id]).await;
    }

    /// Remove da tela na hora; se o backend recusar, recarrega a lista inteira.
    pub async fn delete_items(&self, ids: &[ItemId]) {
        if ids.is_empty() {
            return;
        }

        self.with_state(|s| {
            s.begin(Scope::Items);
            for id in ids {
                s.items.remove(id);
                s.selected.remove(id);
            }
            s.apply_filters();
        });

        let mut failure = None;
        for id in ids {
            if let Err(e) = self.api().delete_item(*id).await {
                failure = Some(e);
                break;
            }
        }

        match failure {
            Some(e) => {
                self.load_items().await;
                self.fail(Scope::Items, e);
            }
            None => {
                self.with_state(|s| {
                    for id in ids {
                        s.tag_overrides.remove(id);
                    }
                    s.finish(Scope::Items, None);
                });
                self.persist();
                tracing::info!("🗑️ {} item(ns) removido(s)", ids.len());
            }
        }
    }

    /// Espelha o override no backend. Melhor-esforço: falha vira só log,
    /// o override local continua sendo a verdade.
    pub(crate) async fn mirror_tags(&self, id: ItemId, tag_ids: &[TagId]) {
        if let Err(e) = self.api().update_item_tags(id, tag_ids).await {
            tracing::warn!(
                "Tags do item {} divergem do servidor (locais: {:?}); espelhamento falhou: {}",
                id,
                tag_ids,
                e
            );
        }
    }

    // ---
    // Busca e filtros
    // ---

    /// Atualiza o texto na hora; a busca aplicada só muda depois do debounce.
    /// Cada chamada cancela a anterior que ainda não disparou.
    ///
    /// O debounce roda no runtime tokio em que a store foi criada (ou no atual).
    /// Sem nenhum runtime, a busca é aplicada na hora.
    pub fn set_search_query(&self, text: &str) {
        let text = text.to_string();
        let seq = self.with_state(|s| {
            s.search_query = text.clone();
            s.search_seq += 1;
            s.search_seq
        });

        let runtime = match self.inner.runtime.clone().or_else(|| Handle::try_current().ok()) {
            Some(runtime) => runtime,
            None => {
                tracing::warn!("Sem runtime tokio para o debounce; aplicando a busca direto");
                if let Some(pending) = lock(&self.inner.search_task).take() {
                    pending.abort();
                }
                self.apply_search(seq, text);
                return;
            }
        };

        let store = Arc::downgrade(&self.inner);
        let delay = self.inner.settings.search_debounce;
        let handle = runtime.spawn(async move {
            tokio::time::sleep(delay).await;
            if let Some(inner) = store.upgrade() {
                InventoryStore { inner }.apply_search(seq, text);
            }
        });

        if let Some(previous) = lock(&self.inner.search_task).replace(handle) {
            previous.abort();
        }
    }

    fn apply_search(&self, seq: u64, text: String) {
        self.with_state(|s| {
            // Uma tecla mais nova pode ter chegado enquanto esta tarefa acordava
            if s.search_seq == seq {
                s.applied_query = text;
                s.apply_filters();
            }
        });
    }

    pub fn search_query(&self) -> String {
        self.with_state(|s| s.search_query.clone())
    }

    pub fn applied_search_query(&self) -> String {
        self.with_state(|s| s.applied_query.clone())
    }

    pub fn set_primary_filter(&self, primary: PrimaryFilter) {
        self.with_state(|s| {
            s.primary_filter = primary;
            s.apply_filters();
        });
        self.persist();
    }

    pub fn primary_filter(&self) -> PrimaryFilter {
        self.with_state(|s| s.primary_filter)
    }

    pub fn toggle_advanced_filter(&self, filter: AdvancedFilter) {
        self.with_state(|s| {
            s.advanced_filters.toggle(filter);
            s.apply_filters();
        });
        self.persist();
    }

    pub fn advanced_filters(&self) -> AdvancedFilters {
        self.with_state(|s| s.advanced_filters.clone())
    }

    /// Zera busca, seletor principal e multi-seleções.
    pub fn clear_filters(&self) {
        if let Some(pending) = lock(&self.inner.search_task).take() {
            pending.abort();
        }
        self.with_state(|s| {
            s.search_seq += 1;
            s.search_query.clear();
            s.applied_query.clear();
            s.primary_filter = PrimaryFilter::All;
            s.advanced_filters = AdvancedFilters::default();
            s.apply_filters();
        });
        self.persist();
    }

    pub fn apply_filters(&self) {
        self.with_state(|s| s.apply_filters());
    }

    /// Quantas vezes a lista visível foi recalculada.
    pub fn filter_generation(&self) -> u64 {
        self.with_state(|s| s.filter_generation)
    }
}

/// Cômodo/lugar a usar na criação: os do formulário, ou os primeiros
/// cadastrados (preferindo um lugar do cômodo escolhido).
fn default_location(
    state: &StoreState,
    room_id: Option<RoomId>,
    place_id: Option<PlaceId>,
) -> Result<(RoomId, PlaceId), AppError> {
    if state.rooms.is_empty() || state.places.is_empty() {
        return Err(AppError::Precondition(
            "Nenhum cômodo ou lugar cadastrado. Crie um cômodo e um lugar antes de adicionar itens.".into(),
        ));
    }

    let room_id = match room_id {
        Some(id) => id,
        None => state.rooms[0].id,
    };
    let place_id = match place_id {
        Some(id) => id,
        None => state
            .places
            .iter()
            .find(|p| p.room_id == room_id)
            .unwrap_or(&state.places[0])
            .id,
    };
    Ok((room_id, place_id))
}
