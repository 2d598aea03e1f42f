// src/services/alerts.rs

use validator::Validate;

use crate::{
    common::error::AppError,
    models::{
        alerts::{Alert, AlertId, TriggeredAlert},
        forms::{AlertPatch, NewAlert},
    },
    services::{filtering, inventory_store::InventoryStore, store_state::Scope},
};

impl InventoryStore {
    /// Busca os alertas. Os alertas ativos de cada item e a lista de disparados
    /// derivam disso na leitura; a lista visível é refiltrada porque o formato
    /// dos itens mudou.
    pub async fn load_alerts(&self) {
        self.with_state(|s| s.begin(Scope::Alerts));
        match self.api().get_alerts().await {
            Ok(alerts) => {
                let triggered = self.with_state(|s| {
                    s.alerts = alerts;
                    s.apply_filters();
                    s.finish(Scope::Alerts, None);
                    filtering::get_triggered_alerts(&s.views()).len()
                });
                tracing::info!("🔔 Alertas carregados, {} disparado(s)", triggered);
            }
            Err(e) => {
                self.fail(Scope::Alerts, e);
            }
        }
    }

    // Sem caminho otimista: muta e recarrega tudo, com sucesso ou não.
    pub async fn create_alert(&self, alert: NewAlert) -> Result<Alert, AppError> {
        self.begin_scoped(Scope::Alerts, alert.validate())?;
        let result = self.api().create_alert(&alert).await;
        self.finish_alert_mutation(result).await
    }

    pub async fn update_alert(&self, id: AlertId, patch: AlertPatch) -> Result<Alert, AppError> {
        self.begin_scoped(Scope::Alerts, patch.validate())?;
        let result = self.api().update_alert(id, &patch).await;
        self.finish_alert_mutation(result).await
    }

    pub async fn delete_alert(&self, id: AlertId) -> Result<(), AppError> {
        self.begin_scoped(Scope::Alerts, Ok(()))?;
        let result = self.api().delete_alert(id).await;
        self.finish_alert_mutation(result).await
    }

    async fn finish_alert_mutation<T>(&self, result: Result<T, AppError>) -> Result<T, AppError> {
        self.load_alerts().await;
        result.map_err(|e| self.fail(Scope::Alerts, e))
    }

    pub fn alerts(&self) -> Vec<Alert> {
        self.with_state(|s| s.alerts.clone())
    }

    /// Alertas disparados, do mais crítico para o menos. Sempre calculado
    /// sobre a quantidade atual.
    pub fn triggered_alerts(&self) -> Vec<TriggeredAlert> {
        self.with_state(|s| filtering::get_triggered_alerts(&s.views()))
    }
}
