// src/services/catalog.rs
//
// Dados de referência (cômodos, lugares, recipientes, tags) e projetos.

use validator::Validate;

use crate::{
    common::error::AppError,
    models::{
        forms::{ContainerForm, PlaceForm, ProjectItemForm, RoomForm, TagForm},
        inventory::{Container, ContainerId, ItemId, Place, PlaceId, Room, RoomId, Tag, TagId},
        projects::{Project, ProjectId},
    },
    services::{inventory_store::InventoryStore, store_state::Scope},
};

impl InventoryStore {
    /// Busca as quatro coleções em paralelo e só grava se todas vierem.
    pub(crate) async fn fetch_reference_data(&self) -> Result<(), AppError> {
        let api = self.api();
        let (rooms, places, containers, tags) = tokio::try_join!(
            api.get_rooms(),
            api.get_places(),
            api.get_containers(),
            api.get_tags()
        )?;

        self.with_state(|s| {
            s.rooms = rooms;
            s.places = places;
            s.containers = containers;
            s.tags = tags;
            s.reference_loaded = true;
            // Localização e tags resolvidas mudaram
            s.apply_filters();
        });
        Ok(())
    }

    pub async fn load_inventory_data(&self) {
        self.with_state(|s| s.begin(Scope::Locations));
        match self.fetch_reference_data().await {
            Ok(()) => self.with_state(|s| s.finish(Scope::Locations, None)),
            Err(e) => {
                self.fail(Scope::Locations, e);
            }
        }
    }

    async fn finish_location_mutation<T>(&self, result: Result<T, AppError>) -> Result<T, AppError> {
        match result {
            Ok(value) => {
                self.load_inventory_data().await;
                Ok(value)
            }
            Err(e) => Err(self.fail(Scope::Locations, e)),
        }
    }

    // ---
    // Cômodos, lugares, recipientes, tags
    // ---
    pub async fn create_room(&self, form: RoomForm) -> Result<Room, AppError> {
        self.begin_scoped(Scope::Locations, form.validate())?;
        let result = self.api().create_room(&form).await;
        self.finish_location_mutation(result).await
    }

    pub async fn update_room(&self, id: RoomId, form: RoomForm) -> Result<Room, AppError> {
        self.begin_scoped(Scope::Locations, form.validate())?;
        let result = self.api().update_room(id, &form).await;
        self.finish_location_mutation(result).await
    }

    pub async fn create_place(&self, form: PlaceForm) -> Result<Place, AppError> {
        self.begin_scoped(Scope::Locations, form.validate())?;
        let result = self.api().create_place(&form).await;
        self.finish_location_mutation(result).await
    }

    pub async fn update_place(&self, id: PlaceId, form: PlaceForm) -> Result<Place, AppError> {
        self.begin_scoped(Scope::Locations, form.validate())?;
        let result = self.api().update_place(id, &form).await;
        self.finish_location_mutation(result).await
    }

    pub async fn create_container(&self, form: ContainerForm) -> Result<Container, AppError> {
        self.begin_scoped(Scope::Locations, form.validate())?;
        let result = self.api().create_container(&form).await;
        self.finish_location_mutation(result).await
    }

    pub async fn update_container(&self, id: ContainerId, form: ContainerForm) -> Result<Container, AppError> {
        self.begin_scoped(Scope::Locations, form.validate())?;
        let result = self.api().update_container(id, &form).await;
        self.finish_location_mutation(result).await
    }

    pub async fn create_tag(&self, form: TagForm) -> Result<Tag, AppError> {
        self.begin_scoped(Scope::Locations, form.validate())?;
        let result = self.api().create_tag(&form).await;
        self.finish_location_mutation(result).await
    }

    pub async fn update_tag(&self, id: TagId, form: TagForm) -> Result<Tag, AppError> {
        self.begin_scoped(Scope::Locations, form.validate())?;
        let result = self.api().update_tag(id, &form).await;
        self.finish_location_mutation(result).await
    }

    // ---
    // Projetos
    // ---
    pub async fn load_projects(&self) {
        self.with_state(|s| s.begin(Scope::Projects));
        match self.api().get_projects().await {
            Ok(projects) => self.with_state(|s| {
                s.projects = projects;
                s.finish(Scope::Projects, None);
            }),
            Err(e) => {
                self.fail(Scope::Projects, e);
            }
        }
    }

    async fn finish_project_mutation(&self, result: Result<(), AppError>) -> Result<(), AppError> {
        self.load_projects().await;
        result.map_err(|e| self.fail(Scope::Projects, e))
    }

    pub async fn add_item_to_project(&self, project_id: ProjectId, form: ProjectItemForm) -> Result<(), AppError> {
        self.begin_scoped(Scope::Projects, form.validate())?;
        let result = self.api().add_project_item(project_id, &form).await;
        self.finish_project_mutation(result).await
    }

    pub async fn update_project_item(&self, project_id: ProjectId, form: ProjectItemForm) -> Result<(), AppError> {
        self.begin_scoped(Scope::Projects, form.validate())?;
        let result = self.api().update_project_item(project_id, &form).await;
        self.finish_project_mutation(result).await
    }

    pub async fn remove_item_from_project(&self, project_id: ProjectId, item_id: ItemId) -> Result<(), AppError> {
        self.begin_scoped(Scope::Projects, Ok(()))?;
        let result = self.api().remove_project_item(project_id, item_id).await;
        self.finish_project_mutation(result).await
    }

    pub fn projects(&self) -> Vec<Project> {
        self.with_state(|s| s.projects.clone())
    }

    /// Projetos que usam o item (tela de detalhe).
    pub fn projects_for_item(&self, item_id: ItemId) -> Vec<Project> {
        self.with_state(|s| s.projects.iter().filter(|p| p.contains(item_id)).cloned().collect())
    }
}
