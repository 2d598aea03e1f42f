// src/models/projects.rs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::models::inventory::ItemId;

pub type ProjectId = i64;

// Associação Projeto <-> Item, com a quantidade reservada para o projeto
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ProjectItem {
    pub item_id: ItemId,
    #[serde(default = "default_project_quantity")]
    pub quantity: u32,
}

fn default_project_quantity() -> u32 {
    1
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Project {
    pub id: ProjectId,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub items: Vec<ProjectItem>,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

impl Project {
    pub fn contains(&self, item_id: ItemId) -> bool {
        self.items.iter().any(|i| i.item_id == item_id)
    }
}
