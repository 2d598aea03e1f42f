// src/services/favorites.rs
//
// Favoritos com atualização otimista. Cada toggle vira uma intenção com id
// próprio: o valor exibido é o da intenção pendente mais nova do item, senão
// o confirmado pelo servidor. Sucesso confirma a intenção; falha descarta só
// ela, então duas intenções sobrepostas nunca desfazem uma à outra.

use std::{collections::BTreeSet, sync::Arc};

use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::{
    models::inventory::ItemId,
    services::{inventory_store::InventoryStore, store_state::Scope},
};

#[derive(Debug, Clone, PartialEq)]
pub struct FavoriteIntent {
    pub request_id: Uuid,
    pub item_id: ItemId,
    pub favorite: bool,
    pub issued_at: DateTime<Utc>,
}

#[derive(Debug, Default)]
pub struct FavoriteLedger {
    confirmed: BTreeSet<ItemId>,
    pending: Vec<FavoriteIntent>,
}

impl FavoriteLedger {
    pub fn is_favorite(&self, item_id: ItemId) -> bool {
        self.pending
            .iter()
            .rev()
            .find(|intent| intent.item_id == item_id)
            .map(|intent| intent.favorite)
            .unwrap_or_else(|| self.confirmed.contains(&item_id))
    }

    pub fn replace_confirmed(&mut self, item_ids: impl IntoIterator<Item = ItemId>) {
        self.confirmed = item_ids.into_iter().collect();
    }

    /// Registra a intenção de inverter o valor exibido agora.
    pub fn begin_toggle(&mut self, item_id: ItemId) -> FavoriteIntent {
        let intent = FavoriteIntent {
            request_id: Uuid::new_v4(),
            item_id,
            favorite: !self.is_favorite(item_id),
            issued_at: Utc::now(),
        };
        self.pending.push(intent.clone());
        intent
    }

    pub fn confirm(&mut self, request_id: Uuid) {
        if let Some(intent) = self.take(request_id) {
            if intent.favorite {
                self.confirmed.insert(intent.item_id);
            } else {
                self.confirmed.remove(&intent.item_id);
            }
        }
    }

    pub fn compensate(&mut self, request_id: Uuid) {
        self.take(request_id);
    }

    pub fn pending_for(&self, item_id: ItemId) -> usize {
        self.pending.iter().filter(|i| i.item_id == item_id).count()
    }

    fn take(&mut self, request_id: Uuid) -> Option<FavoriteIntent> {
        let pos = self.pending.iter().position(|i| i.request_id == request_id)?;
        Some(self.pending.remove(pos))
    }
}

impl InventoryStore {
    /// Inverte o favorito na hora (itens, favoritos e lista filtrada derivam
    /// do mesmo lugar) e confirma no backend em seguida. Em falha, só esta
    /// intenção é desfeita.
    pub async fn toggle_favorite(&self, item_id: ItemId) {
        let intent = self.with_state(|s| {
            if !s.items.contains_key(&item_id) {
                return None;
            }
            s.begin(Scope::Favorites);
            let overlapping = s.favorites.pending_for(item_id);
            let intent = s.favorites.begin_toggle(item_id);
            if overlapping > 0 {
                tracing::debug!(
                    "Toggle {} do item {} enfileirado atrás de {} pendente(s)",
                    intent.request_id,
                    item_id,
                    overlapping
                );
            }
            Some(intent)
        });
        let Some(intent) = intent else {
            tracing::warn!("Toggle de favorito ignorado: item {} não está carregado", item_id);
            return;
        };

        // Chamadas do mesmo item saem em ordem, uma por vez
        let queue = {
            let mut queues = self
                .inner
                .favorite_queues
                .lock()
                .unwrap_or_else(std::sync::PoisonError::into_inner);
            Arc::clone(queues.entry(item_id).or_default())
        };
        let turn = queue.lock().await;

        let result = if intent.favorite {
            self.api().add_favorite(item_id).await
        } else {
            self.api().remove_favorite(item_id).await
        };

        drop(turn);
        self.release_queue(item_id, queue);

        match result {
            Ok(()) => self.with_state(|s| {
                s.favorites.confirm(intent.request_id);
                s.finish(Scope::Favorites, None);
            }),
            Err(e) => {
                self.with_state(|s| s.favorites.compensate(intent.request_id));
                tracing::debug!("Toggle {} revertido", intent.request_id);
                self.fail(Scope::Favorites, e);
            }
        }
    }

    // A fila sai do mapa quando ninguém mais espera por ela (mapa + esta cópia)
    fn release_queue(&self, item_id: ItemId, queue: Arc<tokio::sync::Mutex<()>>) {
        let mut queues = self
            .inner
            .favorite_queues
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner);
        if Arc::strong_count(&queue) == 2 {
            queues.remove(&item_id);
        }
    }

    /// Quantos itens têm chamadas de favorito em andamento.
    pub fn favorite_requests_in_flight(&self) -> usize {
        self.inner
            .favorite_queues
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
            .len()
    }

    /// Recarrega só o conjunto confirmado; intenções pendentes continuam por cima.
    pub async fn load_favorites(&self) {
        self.with_state(|s| s.begin(Scope::Favorites));
        match self.api().get_favorites().await {
            Ok(favorites) => self.with_state(|s| {
                s.favorites.replace_confirmed(favorites.iter().map(|f| f.item_id));
                s.finish(Scope::Favorites, None);
            }),
            Err(e) => {
                self.fail(Scope::Favorites, e);
            }
        }
    }

    pub fn is_favorite(&self, item_id: ItemId) -> bool {
        self.with_state(|s| s.favorites.is_favorite(item_id))
    }
}
