// tests/common/mod.rs
//
// Backend em memória para os testes da store: guarda os dados, conta as
// chamadas, injeta falhas e pode segurar requisições de favorito em voo.

#![allow(dead_code)]

use std::{
    collections::{HashMap, HashSet, VecDeque},
    sync::{Arc, Mutex},
    time::Duration,
};

use async_trait::async_trait;
use inventory_client::{
    api::InventoryApi,
    common::persistence::PreferenceStore,
    models::{
        alerts::{Alert, AlertId},
        forms::{
            AlertPatch, ContainerForm, CreateItemRequest, NewAlert, PlaceForm, ProjectItemForm,
            RoomForm, TagForm, UpdateItemRequest,
        },
        inventory::{
            Container, ContainerId, Favorite, Item, ItemId, ItemStatus, Place, PlaceId, Room, RoomId, Tag, TagId,
        },
        projects::{Project, ProjectId, ProjectItem},
    },
    services::{InventoryStore, StoreSettings},
    AppError,
};
use tokio::sync::Semaphore;

#[derive(Default)]
pub struct MockData {
    pub items: Vec<Item>,
    pub alerts: Vec<Alert>,
    pub favorites: Vec<ItemId>,
    pub rooms: Vec<Room>,
    pub places: Vec<Place>,
    pub containers: Vec<Container>,
    pub tags: Vec<Tag>,
    pub projects: Vec<Project>,
    pub item_tags: HashMap<ItemId, Vec<TagId>>,
    pub next_id: i64,
}

#[derive(Default)]
pub struct MockApi {
    pub data: Mutex<MockData>,
    calls: Mutex<HashMap<&'static str, usize>>,
    failing: Mutex<HashSet<&'static str>>,
    // Resultado de cada chamada de favorito, em ordem (vazio = sucesso)
    favorite_outcomes: Mutex<VecDeque<bool>>,
    // Quando presente, cada chamada de favorito espera uma permissão
    favorite_gate: Mutex<Option<Arc<Semaphore>>>,
    // Demais operações seguradas até receberem permissão
    gates: Mutex<HashMap<&'static str, Arc<Semaphore>>>,
    pub last_update: Mutex<Option<UpdateItemRequest>>,
    pub last_create: Mutex<Option<CreateItemRequest>>,
}

pub fn item(id: ItemId, name: &str, quantity: u32) -> Item {
    Item {
        id,
        name: name.to_string(),
        quantity,
        status: ItemStatus::Available,
        consumable: false,
        price: None,
        sell_price: None,
        room_id: None,
        place_id: None,
        container_id: None,
        link: None,
        image_uri: None,
        tags: vec![],
        created_at: None,
        updated_at: None,
    }
}

pub fn tag(id: TagId, name: &str) -> Tag {
    Tag { id, name: name.to_string(), color: None }
}

pub fn alert(id: AlertId, item_id: ItemId, threshold: u32, is_active: bool) -> Alert {
    Alert { id, item_id, threshold, is_active, created_at: None }
}

impl MockApi {
    pub fn new() -> Arc<Self> {
        let api = Self::default();
        api.data.lock().unwrap().next_id = 1000;
        Arc::new(api)
    }

    /// Um cômodo, um lugar, um recipiente e duas tags.
    pub fn with_locations() -> Arc<Self> {
        let api = Self::new();
        {
            let mut data = api.data.lock().unwrap();
            data.rooms = vec![Room { id: 1, name: "Cozinha".into() }, Room { id: 2, name: "Garagem".into() }];
            data.places = vec![
                Place { id: 10, name: "Armário".into(), room_id: 1 },
                Place { id: 20, name: "Prateleira".into(), room_id: 2 },
            ];
            data.containers = vec![Container { id: 100, name: "Caixa azul".into(), place_id: 20, room_id: Some(2) }];
            data.tags = vec![tag(5, "Ferramentas"), tag(6, "Limpeza"), tag(7, "Alimentos")];
        }
        api
    }

    pub fn set_items(&self, items: Vec<Item>) {
        self.data.lock().unwrap().items = items;
    }

    pub fn set_alerts(&self, alerts: Vec<Alert>) {
        self.data.lock().unwrap().alerts = alerts;
    }

    pub fn set_favorites(&self, favorites: Vec<ItemId>) {
        self.data.lock().unwrap().favorites = favorites;
    }

    pub fn fail(&self, operation: &'static str) {
        self.failing.lock().unwrap().insert(operation);
    }

    pub fn recover(&self, operation: &'static str) {
        self.failing.lock().unwrap().remove(operation);
    }

    pub fn script_favorites(&self, outcomes: &[bool]) {
        self.favorite_outcomes.lock().unwrap().extend(outcomes.iter().copied());
    }

    pub fn gate_favorites(&self) -> Arc<Semaphore> {
        let gate = Arc::new(Semaphore::new(0));
        *self.favorite_gate.lock().unwrap() = Some(gate.clone());
        gate
    }

    pub fn gate(&self, operation: &'static str) -> Arc<Semaphore> {
        let gate = Arc::new(Semaphore::new(0));
        self.gates.lock().unwrap().insert(operation, gate.clone());
        gate
    }

    async fn wait_gate(&self, operation: &'static str) {
        let gate = self.gates.lock().unwrap().get(operation).cloned();
        if let Some(gate) = gate {
            gate.acquire().await.unwrap().forget();
        }
    }

    pub fn calls(&self, operation: &str) -> usize {
        self.calls.lock().unwrap().get(operation).copied().unwrap_or(0)
    }

    fn enter(&self, operation: &'static str) -> Result<(), AppError> {
        *self.calls.lock().unwrap().entry(operation).or_default() += 1;
        if self.failing.lock().unwrap().contains(operation) {
            return Err(AppError::http(500, Some(format!("{operation} falhou"))));
        }
        Ok(())
    }

    async fn favorite_call(&self, operation: &'static str) -> Result<(), AppError> {
        self.enter(operation)?;
        let gate = self.favorite_gate.lock().unwrap().clone();
        if let Some(gate) = gate {
            gate.acquire().await.unwrap().forget();
        }
        let ok = self.favorite_outcomes.lock().unwrap().pop_front().unwrap_or(true);
        if ok {
            Ok(())
        } else {
            Err(AppError::http(503, Some("Favoritos indisponíveis".into())))
        }
    }

    fn next_id(&self) -> i64 {
        let mut data = self.data.lock().unwrap();
        data.next_id += 1;
        data.next_id
    }
}

/// Store com armazenamento em memória e debounce padrão.
pub fn store_for(api: &Arc<MockApi>) -> InventoryStore {
    store_with_prefs(api, PreferenceStore::in_memory())
}

pub fn store_with_prefs(api: &Arc<MockApi>, prefs: PreferenceStore) -> InventoryStore {
    InventoryStore::new(
        api.clone(),
        prefs,
        StoreSettings { search_debounce: Duration::from_millis(300) },
    )
}

#[async_trait]
impl InventoryApi for MockApi {
    async fn get_items(&self) -> Result<Vec<Item>, AppError> {
        self.enter("get_items")?;
        Ok(self.data.lock().unwrap().items.clone())
    }

    async fn create_item(&self, request: &CreateItemRequest) -> Result<Item, AppError> {
        self.enter("create_item")?;
        *self.last_create.lock().unwrap() = Some(request.clone());
        let mut created = item(self.next_id(), &request.name, request.quantity);
        created.status = request.status;
        created.consumable = request.consumable;
        created.price = request.price;
        created.room_id = Some(request.room_id);
        created.place_id = Some(request.place_id);
        created.container_id = request.container_id;
        created.link = request.link.clone();
        self.data.lock().unwrap().items.push(created.clone());
        Ok(created)
    }

    async fn update_item(&self, id: ItemId, request: &UpdateItemRequest) -> Result<Item, AppError> {
        self.enter("update_item")?;
        *self.last_update.lock().unwrap() = Some(request.clone());
        let mut data = self.data.lock().unwrap();
        let item = data
            .items
            .iter_mut()
            .find(|i| i.id == id)
            .ok_or_else(|| AppError::http(404, Some("Item não encontrado".into())))?;
        if let Some(name) = &request.name {
            item.name = name.clone();
        }
        if let Some(quantity) = request.quantity {
            item.quantity = quantity;
        }
        if let Some(status) = request.status {
            item.status = status;
        }
        Ok(item.clone())
    }

    async fn delete_item(&self, id: ItemId) -> Result<(), AppError> {
        self.enter("delete_item")?;
        self.data.lock().unwrap().items.retain(|i| i.id != id);
        Ok(())
    }

    async fn update_item_tags(&self, id: ItemId, tag_ids: &[TagId]) -> Result<(), AppError> {
        self.enter("update_item_tags")?;
        self.data.lock().unwrap().item_tags.insert(id, tag_ids.to_vec());
        Ok(())
    }

    async fn get_alerts(&self) -> Result<Vec<Alert>, AppError> {
        self.enter("get_alerts")?;
        Ok(self.data.lock().unwrap().alerts.clone())
    }

    async fn create_alert(&self, new: &NewAlert) -> Result<Alert, AppError> {
        self.enter("create_alert")?;
        self.wait_gate("create_alert").await;
        let created = alert(self.next_id(), new.item_id, new.threshold, new.is_active);
        self.data.lock().unwrap().alerts.push(created.clone());
        Ok(created)
    }

    async fn update_alert(&self, id: AlertId, patch: &AlertPatch) -> Result<Alert, AppError> {
        self.enter("update_alert")?;
        let mut data = self.data.lock().unwrap();
        let alert = data
            .alerts
            .iter_mut()
            .find(|a| a.id == id)
            .ok_or_else(|| AppError::http(404, None))?;
        if let Some(threshold) = patch.threshold {
            alert.threshold = threshold;
        }
        if let Some(is_active) = patch.is_active {
            alert.is_active = is_active;
        }
        Ok(alert.clone())
    }

    async fn delete_alert(&self, id: AlertId) -> Result<(), AppError> {
        self.enter("delete_alert")?;
        self.data.lock().unwrap().alerts.retain(|a| a.id != id);
        Ok(())
    }

    async fn get_favorites(&self) -> Result<Vec<Favorite>, AppError> {
        self.enter("get_favorites")?;
        Ok(self
            .data
            .lock()
            .unwrap()
            .favorites
            .iter()
            .map(|item_id| Favorite { id: None, item_id: *item_id, user_id: None })
            .collect())
    }

    async fn add_favorite(&self, item_id: ItemId) -> Result<(), AppError> {
        self.favorite_call("add_favorite").await?;
        self.data.lock().unwrap().favorites.push(item_id);
        Ok(())
    }

    async fn remove_favorite(&self, item_id: ItemId) -> Result<(), AppError> {
        self.favorite_call("remove_favorite").await?;
        self.data.lock().unwrap().favorites.retain(|id| *id != item_id);
        Ok(())
    }

    async fn get_rooms(&self) -> Result<Vec<Room>, AppError> {
        self.enter("get_rooms")?;
        Ok(self.data.lock().unwrap().rooms.clone())
    }

    async fn create_room(&self, form: &RoomForm) -> Result<Room, AppError> {
        self.enter("create_room")?;
        self.wait_gate("create_room").await;
        let room = Room { id: self.next_id(), name: form.name.clone() };
        self.data.lock().unwrap().rooms.push(room.clone());
        Ok(room)
    }

    async fn update_room(&self, id: RoomId, form: &RoomForm) -> Result<Room, AppError> {
        self.enter("update_room")?;
        let mut data = self.data.lock().unwrap();
        let room = data.rooms.iter_mut().find(|r| r.id == id).ok_or_else(|| AppError::http(404, None))?;
        room.name = form.name.clone();
        Ok(room.clone())
    }

    async fn get_places(&self) -> Result<Vec<Place>, AppError> {
        self.enter("get_places")?;
        Ok(self.data.lock().unwrap().places.clone())
    }

    async fn create_place(&self, form: &PlaceForm) -> Result<Place, AppError> {
        self.enter("create_place")?;
        let place = Place { id: self.next_id(), name: form.name.clone(), room_id: form.room_id };
        self.data.lock().unwrap().places.push(place.clone());
        Ok(place)
    }

    async fn update_place(&self, id: PlaceId, form: &PlaceForm) -> Result<Place, AppError> {
        self.enter("update_place")?;
        let mut data = self.data.lock().unwrap();
        let place = data.places.iter_mut().find(|p| p.id == id).ok_or_else(|| AppError::http(404, None))?;
        place.name = form.name.clone();
        place.room_id = form.room_id;
        Ok(place.clone())
    }

    async fn get_containers(&self) -> Result<Vec<Container>, AppError> {
        self.enter("get_containers")?;
        Ok(self.data.lock().unwrap().containers.clone())
    }

    async fn create_container(&self, form: &ContainerForm) -> Result<Container, AppError> {
        self.enter("create_container")?;
        let container = Container {
            id: self.next_id(),
            name: form.name.clone(),
            place_id: form.place_id,
            room_id: form.room_id,
        };
        self.data.lock().unwrap().containers.push(container.clone());
        Ok(container)
    }

    async fn update_container(&self, id: ContainerId, form: &ContainerForm) -> Result<Container, AppError> {
        self.enter("update_container")?;
        let mut data = self.data.lock().unwrap();
        let container = data
            .containers
            .iter_mut()
            .find(|c| c.id == id)
            .ok_or_else(|| AppError::http(404, None))?;
        container.name = form.name.clone();
        container.place_id = form.place_id;
        Ok(container.clone())
    }

    async fn get_tags(&self) -> Result<Vec<Tag>, AppError> {
        self.enter("get_tags")?;
        Ok(self.data.lock().unwrap().tags.clone())
    }

    async fn create_tag(&self, form: &TagForm) -> Result<Tag, AppError> {
        self.enter("create_tag")?;
        let created = Tag { id: self.next_id(), name: form.name.clone(), color: form.color.clone() };
        self.data.lock().unwrap().tags.push(created.clone());
        Ok(created)
    }

    async fn update_tag(&self, id: TagId, form: &TagForm) -> Result<Tag, AppError> {
        self.enter("update_tag")?;
        let mut data = self.data.lock().unwrap();
        let found = data.tags.iter_mut().find(|t| t.id == id).ok_or_else(|| AppError::http(404, None))?;
        found.name = form.name.clone();
        found.color = form.color.clone();
        Ok(found.clone())
    }

    async fn get_projects(&self) -> Result<Vec<Project>, AppError> {
        self.enter("get_projects")?;
        Ok(self.data.lock().unwrap().projects.clone())
    }

    async fn add_project_item(&self, project_id: ProjectId, form: &ProjectItemForm) -> Result<(), AppError> {
        self.enter("add_project_item")?;
        self.wait_gate("add_project_item").await;
        let mut data = self.data.lock().unwrap();
        let project = data
            .projects
            .iter_mut()
            .find(|p| p.id == project_id)
            .ok_or_else(|| AppError::http(404, Some("Projeto não encontrado".into())))?;
        project.items.push(ProjectItem { item_id: form.item_id, quantity: form.quantity });
        Ok(())
    }

    async fn update_project_item(&self, project_id: ProjectId, form: &ProjectItemForm) -> Result<(), AppError> {
        self.enter("update_project_item")?;
        let mut data = self.data.lock().unwrap();
        let project = data
            .projects
            .iter_mut()
            .find(|p| p.id == project_id)
            .ok_or_else(|| AppError::http(404, None))?;
        for entry in project.items.iter_mut().filter(|i| i.item_id == form.item_id) {
            entry.quantity = form.quantity;
        }
        Ok(())
    }

    async fn remove_project_item(&self, project_id: ProjectId, item_id: ItemId) -> Result<(), AppError> {
        self.enter("remove_project_item")?;
        let mut data = self.data.lock().unwrap();
        if let Some(project) = data.projects.iter_mut().find(|p| p.id == project_id) {
            project.items.retain(|i| i.item_id != item_id);
        }
        Ok(())
    }
}
