// src/api/backend.rs

use async_trait::async_trait;

use crate::{
    common::error::AppError,
    models::{
        alerts::{Alert, AlertId},
        forms::{
            AlertPatch, ContainerForm, CreateItemRequest, NewAlert, PlaceForm, ProjectItemForm,
            RoomForm, TagForm, UpdateItemRequest,
        },
        inventory::{Container, ContainerId, Favorite, Item, ItemId, Place, PlaceId, Room, RoomId, Tag, TagId},
        projects::{Project, ProjectId},
    },
};

// O contrato REST consumido pela store. O backend é um colaborador opaco:
// a store só conhece estas operações e o `AppError` que elas devolvem.
#[async_trait]
pub trait InventoryApi: Send + Sync {
    // --- Itens ---
    async fn get_items(&self) -> Result<Vec<Item>, AppError>;
    async fn create_item(&self, request: &CreateItemRequest) -> Result<Item, AppError>;
    async fn update_item(&self, id: ItemId, request: &UpdateItemRequest) -> Result<Item, AppError>;
    async fn delete_item(&self, id: ItemId) -> Result<(), AppError>;

    /// Associação item -> tags. O servidor pode não suportar; quem chama
    /// trata falhas aqui como melhor-esforço.
    async fn update_item_tags(&self, id: ItemId, tag_ids: &[TagId]) -> Result<(), AppError>;

    // --- Alertas ---
    async fn get_alerts(&self) -> Result<Vec<Alert>, AppError>;
    async fn create_alert(&self, alert: &NewAlert) -> Result<Alert, AppError>;
    async fn update_alert(&self, id: AlertId, patch: &AlertPatch) -> Result<Alert, AppError>;
    async fn delete_alert(&self, id: AlertId) -> Result<(), AppError>;

    // --- Favoritos ---
    async fn get_favorites(&self) -> Result<Vec<Favorite>, AppError>;
    async fn add_favorite(&self, item_id: ItemId) -> Result<(), AppError>;
    async fn remove_favorite(&self, item_id: ItemId) -> Result<(), AppError>;

    // --- Locais e tags ---
    async fn get_rooms(&self) -> Result<Vec<Room>, AppError>;
    async fn create_room(&self, form: &RoomForm) -> Result<Room, AppError>;
    async fn update_room(&self, id: RoomId, form: &RoomForm) -> Result<Room, AppError>;

    async fn get_places(&self) -> Result<Vec<Place>, AppError>;
    async fn create_place(&self, form: &PlaceForm) -> Result<Place, AppError>;
    async fn update_place(&self, id: PlaceId, form: &PlaceForm) -> Result<Place, AppError>;

    async fn get_containers(&self) -> Result<Vec<Container>, AppError>;
    async fn create_container(&self, form: &ContainerForm) -> Result<Container, AppError>;
    async fn update_container(&self, id: ContainerId, form: &ContainerForm) -> Result<Container, AppError>;

    async fn get_tags(&self) -> Result<Vec<Tag>, AppError>;
    async fn create_tag(&self, form: &TagForm) -> Result<Tag, AppError>;
    async fn update_tag(&self, id: TagId, form: &TagForm) -> Result<Tag, AppError>;

    // --- Projetos ---
    async fn get_projects(&self) -> Result<Vec<Project>, AppError>;
    async fn add_project_item(&self, project_id: ProjectId, form: &ProjectItemForm) -> Result<(), AppError>;
    async fn update_project_item(&self, project_id: ProjectId, form: &ProjectItemForm) -> Result<(), AppError>;
    async fn remove_project_item(&self, project_id: ProjectId, item_id: ItemId) -> Result<(), AppError>;
}
