//src/main.rs

use inventory_client::{
    config::{AppConfig, AppState},
    services::Scope,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Inicializa o logger (nível via RUST_LOG)
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_target(false)
        .compact()
        .init();

    // Se a configuração falhar, a aplicação não deve iniciar.
    let config = AppConfig::from_env()?;
    let app_state = AppState::new(config)?;
    let store = &app_state.store;

    // Sincronização completa: locais primeiro (a string de localização depende deles)
    store.load_inventory_data().await;
    store.load_items().await;
    tokio::join!(store.load_alerts(), store.load_projects());

    for scope in [Scope::Locations, Scope::Items, Scope::Favorites, Scope::Alerts, Scope::Projects] {
        if let Some(error) = store.error(scope) {
            tracing::error!("🔥 Falha ao sincronizar {:?}: {}", scope, error);
        }
    }

    tracing::info!(
        "📊 {} itens, {} favoritos, {} projetos",
        store.items().len(),
        store.favorite_items().len(),
        store.projects().len()
    );

    for triggered in store.triggered_alerts() {
        tracing::warn!(
            "⚠️ {} com {} unidade(s) (limite {}, criticidade {:.2})",
            triggered.item_name,
            triggered.quantity,
            triggered.alert.threshold,
            triggered.criticality
        );
    }

    Ok(())
}
