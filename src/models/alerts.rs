// src/models/alerts.rs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::models::inventory::ItemId;

pub type AlertId = i64;

// --- Alerta de limite de quantidade ---
// Pertence a um único item. "Disparado" é derivado, nunca armazenado.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Alert {
    pub id: AlertId,
    pub item_id: ItemId,
    pub threshold: u32,
    pub is_active: bool,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

impl Alert {
    /// `isActive && quantity <= threshold`, sempre sobre a quantidade atual.
    pub fn is_triggered_by(&self, quantity: u32) -> bool {
        self.is_active && quantity <= self.threshold
    }
}

/// Razão quantidade / limite. Quanto menor, mais crítico.
/// Limite zero só dispara com quantidade zero, que é o caso mais crítico.
pub fn criticality(quantity: u32, threshold: u32) -> f64 {
    if threshold == 0 {
        return if quantity == 0 { 0.0 } else { f64::INFINITY };
    }
    f64::from(quantity) / f64::from(threshold)
}

// --- Alerta disparado (projeção para a tela de alertas) ---
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct TriggeredAlert {
    pub alert: Alert,
    pub item_id: ItemId,
    pub item_name: String,
    pub quantity: u32,
    pub criticality: f64,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn alert(threshold: u32, is_active: bool) -> Alert {
        Alert { id: 1, item_id: 1, threshold, is_active, created_at: None }
    }

    #[test]
    fn active_alert_triggers_at_or_below_threshold() {
        assert!(alert(5, true).is_triggered_by(2));
        assert!(alert(5, true).is_triggered_by(5));
        assert!(!alert(5, true).is_triggered_by(10));
    }

    #[test]
    fn inactive_alert_never_triggers() {
        assert!(!alert(5, false).is_triggered_by(0));
    }

    #[test]
    fn criticality_is_quantity_over_threshold() {
        assert!((criticality(2, 5) - 0.4).abs() < f64::EPSILON);
        assert_eq!(criticality(0, 0), 0.0);
        assert!(criticality(3, 0).is_infinite());
    }
}
