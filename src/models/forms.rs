// src/models/forms.rs
//
// Payloads dos formulários e os corpos de requisição que vão para o backend.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use validator::{Validate, ValidationError};

use crate::models::inventory::{ContainerId, Item, ItemId, ItemStatus, PlaceId, RoomId, TagId};

// ---
// Validação Customizada
// ---
fn validate_not_negative(val: &Decimal) -> Result<(), ValidationError> {
    if val.is_sign_negative() && !val.is_zero() {
        let mut err = ValidationError::new("range");
        err.add_param("min".into(), &0.0);
        err.message = Some("O valor não pode ser negativo.".into());
        return Err(err);
    }
    Ok(())
}

// ---
// Formulário: novo item
// ---
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct ItemForm {
    #[validate(length(min = 1, message = "O nome é obrigatório."))]
    pub name: String,

    pub quantity: u32,

    #[serde(default)]
    pub status: Option<ItemStatus>,

    #[serde(default)]
    pub consumable: bool,

    #[validate(custom(function = "validate_not_negative"))]
    pub price: Option<Decimal>,

    #[validate(custom(function = "validate_not_negative"))]
    pub sell_price: Option<Decimal>,

    pub room_id: Option<RoomId>,
    pub place_id: Option<PlaceId>,
    pub container_id: Option<ContainerId>,

    #[validate(url(message = "O link informado é inválido."))]
    pub link: Option<String>,

    pub image_uri: Option<String>,

    #[serde(default)]
    pub tag_ids: Vec<TagId>,
}

/// Corpo do POST /items. Cômodo e lugar já resolvidos (o backend exige os dois).
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct CreateItemRequest {
    pub name: String,
    pub quantity: u32,
    pub status: ItemStatus,
    pub consumable: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub price: Option<Decimal>,
    pub room_id: RoomId,
    pub place_id: PlaceId,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub container_id: Option<ContainerId>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub link: Option<String>,
}

impl ItemForm {
    pub fn to_request(&self, room_id: RoomId, place_id: PlaceId) -> CreateItemRequest {
        CreateItemRequest {
            name: self.name.trim().to_string(),
            quantity: self.quantity,
            status: self.status.unwrap_or(ItemStatus::Available),
            consumable: self.consumable,
            price: self.price,
            room_id,
            place_id,
            container_id: self.container_id,
            link: self.link.clone(),
        }
    }
}

// ---
// Formulário: edição parcial de item
// ---
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct ItemPatch {
    #[validate(length(min = 1, message = "O nome é obrigatório."))]
    pub name: Option<String>,
    pub quantity: Option<u32>,
    pub status: Option<ItemStatus>,
    pub consumable: Option<bool>,
    #[validate(custom(function = "validate_not_negative"))]
    pub price: Option<Decimal>,
    pub room_id: Option<RoomId>,
    pub place_id: Option<PlaceId>,
    pub container_id: Option<ContainerId>,
    #[validate(url(message = "O link informado é inválido."))]
    pub link: Option<String>,

    // Campos que o backend não aceita na edição
    #[validate(custom(function = "validate_not_negative"))]
    pub sell_price: Option<Decimal>,
    pub image_uri: Option<String>,
    pub tag_ids: Option<Vec<TagId>>,
}

/// Corpo do PUT /items/{id}: só o que o backend aceita.
#[derive(Debug, Clone, Default, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct UpdateItemRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub quantity: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<ItemStatus>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub consumable: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub price: Option<Decimal>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub room_id: Option<RoomId>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub place_id: Option<PlaceId>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub container_id: Option<ContainerId>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub link: Option<String>,
}

impl UpdateItemRequest {
    pub fn is_empty(&self) -> bool {
        *self == UpdateItemRequest::default()
    }
}

/// Parte da edição que só existe no cliente.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LocalItemPatch {
    pub sell_price: Option<Decimal>,
    pub image_uri: Option<String>,
    pub tag_ids: Option<Vec<TagId>>,
}

impl ItemPatch {
    /// Separa o que vai para o backend do que fica só no cliente.
    pub fn split(&self) -> (UpdateItemRequest, LocalItemPatch) {
        let remote = UpdateItemRequest {
            name: self.name.as_ref().map(|n| n.trim().to_string()),
            quantity: self.quantity,
            status: self.status,
            consumable: self.consumable,
            price: self.price,
            room_id: self.room_id,
            place_id: self.place_id,
            container_id: self.container_id,
            link: self.link.clone(),
        };
        let local = LocalItemPatch {
            sell_price: self.sell_price,
            image_uri: self.image_uri.clone(),
            tag_ids: self.tag_ids.clone(),
        };
        (remote, local)
    }

    /// Aplica todos os campos (menos tags, que vivem no override) ao item local.
    pub fn apply_to(&self, item: &mut Item) {
        if let Some(name) = &self.name {
            item.name = name.trim().to_string();
        }
        if let Some(quantity) = self.quantity {
            item.quantity = quantity;
        }
        if let Some(status) = self.status {
            item.status = status;
        }
        if let Some(consumable) = self.consumable {
            item.consumable = consumable;
        }
        if self.price.is_some() {
            item.price = self.price;
        }
        if self.room_id.is_some() {
            item.room_id = self.room_id;
        }
        if self.place_id.is_some() {
            item.place_id = self.place_id;
        }
        if self.container_id.is_some() {
            item.container_id = self.container_id;
        }
        if self.link.is_some() {
            item.link = self.link.clone();
        }
        if self.sell_price.is_some() {
            item.sell_price = self.sell_price;
        }
        if self.image_uri.is_some() {
            item.image_uri = self.image_uri.clone();
        }
    }
}

// ---
// Alertas
// ---
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct NewAlert {
    pub item_id: ItemId,
    #[validate(range(min = 1, message = "O limite deve ser maior que zero."))]
    pub threshold: u32,
    #[serde(default = "default_true")]
    pub is_active: bool,
}

fn default_true() -> bool {
    true
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct AlertPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    #[validate(range(min = 1, message = "O limite deve ser maior que zero."))]
    pub threshold: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_active: Option<bool>,
}

// ---
// Locais e tags
// ---
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct RoomForm {
    #[validate(length(min = 1, message = "O nome é obrigatório."))]
    pub name: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct PlaceForm {
    #[validate(length(min = 1, message = "O nome é obrigatório."))]
    pub name: String,
    pub room_id: RoomId,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct ContainerForm {
    #[validate(length(min = 1, message = "O nome é obrigatório."))]
    pub name: String,
    pub place_id: PlaceId,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub room_id: Option<RoomId>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct TagForm {
    #[validate(length(min = 1, message = "O nome é obrigatório."))]
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
}

// ---
// Projetos
// ---
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct ProjectItemForm {
    pub item_id: ItemId,
    #[validate(range(min = 1, message = "A quantidade mínima é 1."))]
    pub quantity: u32,
}
