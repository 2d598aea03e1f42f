// src/models/inventory.rs

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::models::alerts::Alert;

pub type ItemId = i64;
pub type RoomId = i64;
pub type PlaceId = i64;
pub type ContainerId = i64;
pub type TagId = i64;

// --- 1. Status do Item ---
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(rename_all = "snake_case")] // JSON: "available", "running_low", ...
pub enum ItemStatus {
    Available,
    RunningLow,
    OutOfStock,
    Expired,
}

impl ItemStatus {
    pub const ALL: [ItemStatus; 4] = [
        ItemStatus::Available,
        ItemStatus::RunningLow,
        ItemStatus::OutOfStock,
        ItemStatus::Expired,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ItemStatus::Available => "available",
            ItemStatus::RunningLow => "running_low",
            ItemStatus::OutOfStock => "out_of_stock",
            ItemStatus::Expired => "expired",
        }
    }
}

impl fmt::Display for ItemStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ItemStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ItemStatus::ALL
            .into_iter()
            .find(|status| status.as_str() == s)
            .ok_or_else(|| format!("Status desconhecido: {s}"))
    }
}

// --- 2. Locais (Cômodo -> Lugar -> Recipiente) ---
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Room {
    pub id: RoomId,
    pub name: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Place {
    pub id: PlaceId,
    pub name: String,
    pub room_id: RoomId,
}

// O roomId é redundante (o lugar já aponta para o cômodo), mas o backend envia.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Container {
    pub id: ContainerId,
    pub name: String,
    pub place_id: PlaceId,
    #[serde(default)]
    pub room_id: Option<RoomId>,
}

// --- 3. Tags ---
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Tag {
    pub id: TagId,
    pub name: String,
    #[serde(default)]
    pub color: Option<String>,
}

// --- 4. Item (como o backend envia) ---
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Item {
    pub id: ItemId,
    pub name: String,
    pub quantity: u32,
    pub status: ItemStatus,
    #[serde(default)]
    pub consumable: bool,
    #[serde(default)]
    pub price: Option<Decimal>,
    #[serde(default)]
    pub sell_price: Option<Decimal>,
    #[serde(default)]
    pub room_id: Option<RoomId>,
    #[serde(default)]
    pub place_id: Option<PlaceId>,
    #[serde(default)]
    pub container_id: Option<ContainerId>,
    #[serde(default)]
    pub link: Option<String>,
    #[serde(default)]
    pub image_uri: Option<String>,
    // Tags reportadas pelo servidor (podem ser substituídas pelo override local).
    // Só entram; para fora sai sempre a lista resolvida do `ItemView`.
    #[serde(default, skip_serializing)]
    pub tags: Vec<Tag>,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
}

// --- 5. Visão derivada do Item ---
// Montada na leitura a partir do estado normalizado; nunca é armazenada.
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ItemView {
    #[serde(flatten)]
    pub item: Item,
    pub location: Option<String>,
    #[serde(rename = "tags")]
    pub resolved_tags: Vec<Tag>,
    pub is_favorite: bool,
    pub active_alerts: Vec<Alert>,
}

impl ItemView {
    pub fn id(&self) -> ItemId {
        self.item.id
    }

    pub fn has_tag(&self, tag_id: TagId) -> bool {
        self.resolved_tags.iter().any(|t| t.id == tag_id)
    }
}

// --- 6. Favoritos ---
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Favorite {
    #[serde(default)]
    pub id: Option<i64>,
    pub item_id: ItemId,
    #[serde(default)]
    pub user_id: Option<i64>,
}
