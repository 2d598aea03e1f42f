// src/api/rest_client.rs

use std::{sync::Arc, time::Duration};

use async_trait::async_trait;
use reqwest::{Method, RequestBuilder, Response};
use serde::de::DeserializeOwned;
use serde_json::json;

use crate::{
    api::{auth::TokenSource, backend::InventoryApi},
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

// O cliente REST do backend. Cada chamada lê o token na hora do envio.
#[derive(Clone)]
pub struct RestClient {
    http: reqwest::Client,
    base_url: String,
    tokens: Arc<dyn TokenSource>,
}

impl RestClient {
    pub fn new(base_url: &str, timeout: Duration, tokens: Arc<dyn TokenSource>) -> Result<Self, AppError> {
        let http = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self::with_http_client(http, base_url, tokens))
    }

    pub fn with_http_client(http: reqwest::Client, base_url: &str, tokens: Arc<dyn TokenSource>) -> Self {
        Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
            tokens,
        }
    }

    fn request(&self, method: Method, path: &str) -> RequestBuilder {
        let builder = self.http.request(method, format!("{}{}", self.base_url, path));
        match self.tokens.bearer_token() {
            Some(token) => builder.bearer_auth(token),
            None => builder,
        }
    }

    // Converte respostas não-2xx no erro tipado, com a mensagem do backend
    async fn check(response: Response) -> Result<Response, AppError> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let body = response.text().await.unwrap_or_default();
        let backend_message = serde_json::from_str::<serde_json::Value>(&body)
            .ok()
            .and_then(|v| {
                ["message", "error"]
                    .iter()
                    .find_map(|key| v.get(*key).and_then(|m| m.as_str()).map(str::to_string))
            });

        tracing::debug!("Backend respondeu {}: {}", status, body);
        Err(AppError::http(status.as_u16(), backend_message))
    }

    async fn fetch<T: DeserializeOwned>(&self, builder: RequestBuilder) -> Result<T, AppError> {
        let response = Self::check(builder.send().await?).await?;
        Ok(response.json::<T>().await?)
    }

    async fn execute(&self, builder: RequestBuilder) -> Result<(), AppError> {
        Self::check(builder.send().await?).await?;
        Ok(())
    }
}

#[async_trait]
impl InventoryApi for RestClient {
    // ---
    // Itens
    // ---
    async fn get_items(&self) -> Result<Vec<Item>, AppError> {
        self.fetch(self.request(Method::GET, "/items")).await
    }

    async fn create_item(&self, request: &CreateItemRequest) -> Result<Item, AppError> {
        self.fetch(self.request(Method::POST, "/items").json(request)).await
    }

    async fn update_item(&self, id: ItemId, request: &UpdateItemRequest) -> Result<Item, AppError> {
        self.fetch(self.request(Method::PUT, &format!("/items/{id}")).json(request))
            .await
    }

    async fn delete_item(&self, id: ItemId) -> Result<(), AppError> {
        self.execute(self.request(Method::DELETE, &format!("/items/{id}")))
            .await
    }

    async fn update_item_tags(&self, id: ItemId, tag_ids: &[TagId]) -> Result<(), AppError> {
        self.execute(
            self.request(Method::PUT, &format!("/items/{id}/tags"))
                .json(&json!({ "tagIds": tag_ids })),
        )
        .await
    }

    // ---
    // Alertas
    // ---
    async fn get_alerts(&self) -> Result<Vec<Alert>, AppError> {
        self.fetch(self.request(Method::GET, "/alerts")).await
    }

    async fn create_alert(&self, alert: &NewAlert) -> Result<Alert, AppError> {
        self.fetch(self.request(Method::POST, "/alerts").json(alert)).await
    }

    async fn update_alert(&self, id: AlertId, patch: &AlertPatch) -> Result<Alert, AppError> {
        self.fetch(self.request(Method::PUT, &format!("/alerts/{id}")).json(patch))
            .await
    }

    async fn delete_alert(&self, id: AlertId) -> Result<(), AppError> {
        self.execute(self.request(Method::DELETE, &format!("/alerts/{id}")))
            .await
    }

    // ---
    // Favoritos
    // ---
    async fn get_favorites(&self) -> Result<Vec<Favorite>, AppError> {
        self.fetch(self.request(Method::GET, "/favorites")).await
    }

    async fn add_favorite(&self, item_id: ItemId) -> Result<(), AppError> {
        self.execute(
            self.request(Method::POST, "/favorites")
                .json(&json!({ "itemId": item_id })),
        )
        .await
    }

    async fn remove_favorite(&self, item_id: ItemId) -> Result<(), AppError> {
        self.execute(self.request(Method::DELETE, &format!("/favorites/{item_id}")))
            .await
    }

    // ---
    // Locais e tags
    // ---
    async fn get_rooms(&self) -> Result<Vec<Room>, AppError> {
        self.fetch(self.request(Method::GET, "/rooms")).await
    }

    async fn create_room(&self, form: &RoomForm) -> Result<Room, AppError> {
        self.fetch(self.request(Method::POST, "/rooms").json(form)).await
    }

    async fn update_room(&self, id: RoomId, form: &RoomForm) -> Result<Room, AppError> {
        self.fetch(self.request(Method::PUT, &format!("/rooms/{id}")).json(form))
            .await
    }

    async fn get_places(&self) -> Result<Vec<Place>, AppError> {
        self.fetch(self.request(Method::GET, "/places")).await
    }

    async fn create_place(&self, form: &PlaceForm) -> Result<Place, AppError> {
        self.fetch(self.request(Method::POST, "/places").json(form)).await
    }

    async fn update_place(&self, id: PlaceId, form: &PlaceForm) -> Result<Place, AppError> {
        self.fetch(self.request(Method::PUT, &format!("/places/{id}")).json(form))
            .await
    }

    async fn get_containers(&self) -> Result<Vec<Container>, AppError> {
        self.fetch(self.request(Method::GET, "/containers")).await
    }

    async fn create_container(&self, form: &ContainerForm) -> Result<Container, AppError> {
        self.fetch(self.request(Method::POST, "/containers").json(form)).await
    }

    async fn update_container(&self, id: ContainerId, form: &ContainerForm) -> Result<Container, AppError> {
        self.fetch(self.request(Method::PUT, &format!("/containers/{id}")).json(form))
            .await
    }

    async fn get_tags(&self) -> Result<Vec<Tag>, AppError> {
        self.fetch(self.request(Method::GET, "/tags")).await
    }

    async fn create_tag(&self, form: &TagForm) -> Result<Tag, AppError> {
        self.fetch(self.request(Method::POST, "/tags").json(form)).await
    }

    async fn update_tag(&self, id: TagId, form: &TagForm) -> Result<Tag, AppError> {
        self.fetch(self.request(Method::PUT, &format!("/tags/{id}")).json(form))
            .await
    }

    // ---
    // Projetos
    // ---
    async fn get_projects(&self) -> Result<Vec<Project>, AppError> {
        self.fetch(self.request(Method::GET, "/projects")).await
    }

    async fn add_project_item(&self, project_id: ProjectId, form: &ProjectItemForm) -> Result<(), AppError> {
        self.execute(
            self.request(Method::POST, &format!("/projects/{project_id}/items"))
                .json(form),
        )
        .await
    }

    async fn update_project_item(&self, project_id: ProjectId, form: &ProjectItemForm) -> Result<(), AppError> {
        self.execute(
            self.request(
                Method::PUT,
                &format!("/projects/{project_id}/items/{}", form.item_id),
            )
            .json(&json!({ "quantity": form.quantity })),
        )
        .await
    }

    async fn remove_project_item(&self, project_id: ProjectId, item_id: ItemId) -> Result<(), AppError> {
        self.execute(self.request(
            Method::DELETE,
            &format!("/projects/{project_id}/items/{item_id}"),
        ))
        .await
    }
}
