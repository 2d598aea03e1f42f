// src/api/auth.rs

use std::sync::Arc;

use crate::common::persistence::KeyValueStore;

/// Partição do armazenamento seguro onde o app de login grava o token.
pub const SECURE_PARTITION: &str = "secure-store";
pub const TOKEN_KEY: &str = "authToken";

// De onde vem o bearer token de cada requisição
pub trait TokenSource: Send + Sync {
    fn bearer_token(&self) -> Option<String>;
}

/// Token fixo (ex.: vindo de INVENTORY_API_TOKEN).
#[derive(Debug, Clone, Default)]
pub struct StaticToken(pub Option<String>);

impl TokenSource for StaticToken {
    fn bearer_token(&self) -> Option<String> {
        self.0.clone()
    }
}

/// Lê o token do armazenamento local a cada requisição, então um novo
/// login é percebido sem recriar o cliente.
#[derive(Clone)]
pub struct StoredToken {
    storage: Arc<dyn KeyValueStore>,
}

impl StoredToken {
    pub fn new(storage: Arc<dyn KeyValueStore>) -> Self {
        Self { storage }
    }
}

impl TokenSource for StoredToken {
    fn bearer_token(&self) -> Option<String> {
        let contents = match self.storage.read(SECURE_PARTITION) {
            Ok(Some(contents)) => contents,
            Ok(None) => return None,
            Err(e) => {
                tracing::warn!("Falha ao ler o token do armazenamento seguro: {}", e);
                return None;
            }
        };

        let document: serde_json::Value = match serde_json::from_str(&contents) {
            Ok(value) => value,
            Err(e) => {
                tracing::warn!("Armazenamento seguro corrompido: {}", e);
                return None;
            }
        };

        document
            .get(TOKEN_KEY)
            .and_then(|t| t.as_str())
            .filter(|t| !t.is_empty())
            .map(str::to_string)
    }
}
