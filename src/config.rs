// src/config.rs

use std::{env, path::PathBuf, sync::Arc, time::Duration};

use crate::{
    api::{RestClient, StaticToken, StoredToken, TokenSource},
    common::{
        error::AppError,
        persistence::{FileStore, KeyValueStore, PreferenceStore},
    },
    services::inventory_store::{InventoryStore, StoreSettings},
};

pub const DEFAULT_STORAGE_DIR: &str = ".inventory";
pub const DEFAULT_SEARCH_DEBOUNCE_MS: u64 = 300;
pub const DEFAULT_HTTP_TIMEOUT_SECS: u64 = 15;

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub api_url: String,
    pub api_token: Option<String>,
    pub storage_dir: PathBuf,
    pub search_debounce: Duration,
    pub http_timeout: Duration,
}

fn parse_number(key: &str, raw: Option<String>, default: u64) -> Result<u64, AppError> {
    match raw {
        None => Ok(default),
        Some(value) => value
            .trim()
            .parse()
            .map_err(|_| AppError::Config(format!("{key} deve ser um número inteiro, recebido '{value}'"))),
    }
}

impl AppConfig {
    // Carrega o .env (se existir) e lê as variáveis do processo
    pub fn from_env() -> Result<Self, AppError> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, AppError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let api_url = lookup("INVENTORY_API_URL")
            .filter(|v| !v.trim().is_empty())
            .ok_or_else(|| AppError::Config("INVENTORY_API_URL deve ser definida".into()))?;

        let api_token = lookup("INVENTORY_API_TOKEN").filter(|v| !v.trim().is_empty());

        let storage_dir = lookup("INVENTORY_STORAGE_DIR")
            .filter(|v| !v.trim().is_empty())
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_STORAGE_DIR));

        let debounce_ms = parse_number(
            "INVENTORY_SEARCH_DEBOUNCE_MS",
            lookup("INVENTORY_SEARCH_DEBOUNCE_MS"),
            DEFAULT_SEARCH_DEBOUNCE_MS,
        )?;
        let timeout_secs = parse_number(
            "INVENTORY_HTTP_TIMEOUT_SECS",
            lookup("INVENTORY_HTTP_TIMEOUT_SECS"),
            DEFAULT_HTTP_TIMEOUT_SECS,
        )?;

        Ok(Self {
            api_url: api_url.trim().to_string(),
            api_token,
            storage_dir,
            search_debounce: Duration::from_millis(debounce_ms),
            http_timeout: Duration::from_secs(timeout_secs),
        })
    }
}

// O estado da aplicação: a store única compartilhada por todas as telas
#[derive(Clone)]
pub struct AppState {
    pub config: AppConfig,
    pub store: InventoryStore,
}

impl AppState {
    pub fn new(config: AppConfig) -> Result<Self, AppError> {
        let storage: Arc<dyn KeyValueStore> = Arc::new(FileStore::new(&config.storage_dir));

        // Token fixo da configuração tem prioridade sobre o do armazenamento seguro
        let tokens: Arc<dyn TokenSource> = match &config.api_token {
            Some(token) => Arc::new(StaticToken(Some(token.clone()))),
            None => Arc::new(StoredToken::new(storage.clone())),
        };

        let client = RestClient::new(&config.api_url, config.http_timeout, tokens)?;

        // --- Monta o gráfico de dependências ---
        let store = InventoryStore::new(
            Arc::new(client),
            PreferenceStore::new(storage),
            StoreSettings { search_debounce: config.search_debounce },
        );

        tracing::info!("✅ Store de inventário pronta para {}", config.api_url);

        Ok(Self { config, store })
    }
}
