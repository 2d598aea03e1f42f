// src/services/selection.rs
//
// Modo de seleção (ações em lote sobre a lista visível).

use crate::{models::inventory::ItemId, services::inventory_store::InventoryStore};

impl InventoryStore {
    pub fn toggle_selection_mode(&self) {
        self.with_state(|s| {
            s.selection_mode = !s.selection_mode;
            if !s.selection_mode {
                s.selected.clear();
            }
        });
    }

    /// Marca/desmarca um item. Entra no modo de seleção se ainda não estiver.
    pub fn handle_item_selection(&self, item_id: ItemId) {
        self.with_state(|s| {
            s.selection_mode = true;
            if !s.selected.remove(&item_id) {
                s.selected.insert(item_id);
            }
        });
    }

    /// Alterna entre "todos os visíveis" e "nenhum", comparando o tamanho
    /// da seleção com o total de candidatos.
    pub fn handle_select_all(&self) {
        self.with_state(|s| {
            if s.selected.len() == s.filtered_ids.len() {
                s.selected.clear();
            } else {
                s.selected = s.filtered_ids.iter().copied().collect();
            }
        });
    }

    pub fn exit_selection_mode(&self) {
        self.with_state(|s| {
            s.selection_mode = false;
            s.selected.clear();
        });
    }

    pub fn is_selection_mode(&self) -> bool {
        self.with_state(|s| s.selection_mode)
    }

    pub fn selected_items(&self) -> Vec<ItemId> {
        self.with_state(|s| s.selected.iter().copied().collect())
    }

    /// Remove os selecionados e sai do modo de seleção.
    pub async fn delete_selected(&self) {
        let ids = self.selected_items();
        self.delete_items(&ids).await;
        self.exit_selection_mode();
    }
}
