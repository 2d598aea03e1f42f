// src/services/filtering.rs
//
// Funções puras consumidas pela store: filtro da lista, derivação de alertas
// disparados e extração dos valores presentes (chips de filtro).

use std::collections::BTreeSet;

use crate::models::{
    alerts::{criticality, TriggeredAlert},
    filters::FilterOptions,
    inventory::{Container, ItemStatus, ItemView, Place, Room, Tag},
};

// ---
// Status -> rótulo/cor
// ---
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StatusStyle {
    pub label: &'static str,
    pub color: &'static str,
}

pub const UNKNOWN_STATUS: StatusStyle = StatusStyle { label: "Desconhecido", color: "#9E9E9E" };

const STATUS_STYLES: [(ItemStatus, StatusStyle); 4] = [
    (ItemStatus::Available, StatusStyle { label: "Disponível", color: "#4CAF50" }),
    (ItemStatus::RunningLow, StatusStyle { label: "Acabando", color: "#FF9800" }),
    (ItemStatus::OutOfStock, StatusStyle { label: "Esgotado", color: "#F44336" }),
    (ItemStatus::Expired, StatusStyle { label: "Vencido", color: "#9C27B0" }),
];

/// Busca pelo nome do status como vem do backend; status desconhecido cai no fallback.
pub fn status_style(status: &str) -> StatusStyle {
    STATUS_STYLES
        .iter()
        .find(|(s, _)| s.as_str() == status)
        .map(|(_, style)| *style)
        .unwrap_or(UNKNOWN_STATUS)
}

impl ItemStatus {
    pub fn style(&self) -> StatusStyle {
        status_style(self.as_str())
    }
}

// ---
// Filtro
// ---
fn matches_text(item: &ItemView, needle: &str) -> bool {
    item.item.name.to_lowercase().contains(needle)
        || item
            .location
            .as_ref()
            .is_some_and(|l| l.to_lowercase().contains(needle))
        || item
            .resolved_tags
            .iter()
            .any(|t| t.name.to_lowercase().contains(needle))
}

// Lista vazia = sem restrição
fn in_list<T: PartialEq>(list: &[T], value: Option<&T>) -> bool {
    list.is_empty() || value.is_some_and(|v| list.contains(v))
}

/// Todos os predicados em AND; dentro de uma categoria de multi-seleção, OR.
pub fn matches(item: &ItemView, options: &FilterOptions) -> bool {
    let needle = options.search_query.trim().to_lowercase();
    if !needle.is_empty() && !matches_text(item, &needle) {
        return false;
    }

    if options.status.is_some_and(|s| s != item.item.status) {
        return false;
    }
    if options.favorites_only && !item.is_favorite {
        return false;
    }
    if options.consumables_only && !item.item.consumable {
        return false;
    }

    let advanced = &options.advanced;
    in_list(&advanced.room_ids, item.item.room_id.as_ref())
        && in_list(&advanced.place_ids, item.item.place_id.as_ref())
        && in_list(&advanced.container_ids, item.item.container_id.as_ref())
        && in_list(&advanced.statuses, Some(&item.item.status))
        && (advanced.tag_ids.is_empty() || advanced.tag_ids.iter().any(|t| item.has_tag(*t)))
}

pub fn filter_items(items: &[ItemView], options: &FilterOptions) -> Vec<ItemView> {
    items
        .iter()
        .filter(|item| matches(item, options))
        .cloned()
        .collect()
}

// ---
// Alertas
// ---
/// Um registro por alerta ativo cujo item está no limite ou abaixo dele,
/// já ordenado por prioridade.
pub fn get_triggered_alerts(items: &[ItemView]) -> Vec<TriggeredAlert> {
    let mut triggered: Vec<TriggeredAlert> = items
        .iter()
        .flat_map(|view| {
            view.active_alerts
                .iter()
                .filter(|alert| alert.is_triggered_by(view.item.quantity))
                .map(|alert| TriggeredAlert {
                    alert: alert.clone(),
                    item_id: view.item.id,
                    item_name: view.item.name.clone(),
                    quantity: view.item.quantity,
                    criticality: criticality(view.item.quantity, alert.threshold),
                })
        })
        .collect();

    sort_alerts_by_priority(&mut triggered);
    triggered
}

/// Ordem crescente de quantidade/limite: o mais perto do fim vem primeiro.
pub fn sort_alerts_by_priority(alerts: &mut [TriggeredAlert]) {
    alerts.sort_by(|a, b| a.criticality.total_cmp(&b.criticality));
}

// ---
// Valores presentes na coleção (alimentam os chips)
// ---
pub fn present_rooms(items: &[ItemView], rooms: &[Room]) -> Vec<Room> {
    let ids: BTreeSet<_> = items.iter().filter_map(|i| i.item.room_id).collect();
    rooms.iter().filter(|r| ids.contains(&r.id)).cloned().collect()
}

pub fn present_places(items: &[ItemView], places: &[Place]) -> Vec<Place> {
    let ids: BTreeSet<_> = items.iter().filter_map(|i| i.item.place_id).collect();
    places.iter().filter(|p| ids.contains(&p.id)).cloned().collect()
}

pub fn present_containers(items: &[ItemView], containers: &[Container]) -> Vec<Container> {
    let ids: BTreeSet<_> = items.iter().filter_map(|i| i.item.container_id).collect();
    containers.iter().filter(|c| ids.contains(&c.id)).cloned().collect()
}

pub fn present_tags(items: &[ItemView]) -> Vec<Tag> {
    let mut seen = BTreeSet::new();
    items
        .iter()
        .flat_map(|i| i.resolved_tags.iter())
        .filter(|t| seen.insert(t.id))
        .cloned()
        .collect()
}

pub fn present_statuses(items: &[ItemView]) -> Vec<ItemStatus> {
    items
        .iter()
        .map(|i| i.item.status)
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{
        alerts::Alert,
        filters::AdvancedFilters,
        inventory::Item,
    };

    fn view(id: i64, name: &str, room: Option<i64>, tags: &[(i64, &str)]) -> ItemView {
        ItemView {
            item: Item {
                id,
                name: name.to_string(),
                quantity: 10,
                status: ItemStatus::Available,
                consumable: false,
                price: None,
                sell_price: None,
                room_id: room,
                place_id: None,
                container_id: None,
                link: None,
                image_uri: None,
                tags: vec![],
                created_at: None,
                updated_at: None,
            },
            location: None,
            resolved_tags: tags
                .iter()
                .map(|(id, name)| Tag { id: *id, name: name.to_string(), color: None })
                .collect(),
            is_favorite: false,
            active_alerts: vec![],
        }
    }

    fn with_alert(mut v: ItemView, quantity: u32, threshold: u32, is_active: bool) -> ItemView {
        v.item.quantity = quantity;
        let alert = Alert { id: v.item.id * 100, item_id: v.item.id, threshold, is_active, created_at: None };
        if is_active {
            v.active_alerts.push(alert);
        }
        v
    }

    fn ids(items: &[ItemView]) -> Vec<i64> {
        items.iter().map(|i| i.id()).collect()
    }

    #[test]
    fn unconstrained_filter_is_identity() {
        let items = vec![
            view(1, "Martelo", Some(1), &[]),
            view(2, "Parafuso", None, &[(5, "Ferragens")]),
        ];
        assert_eq!(filter_items(&items, &FilterOptions::default()), items);
    }

    #[test]
    fn multi_select_is_or_within_and_across_categories() {
        let items = vec![
            view(1, "A", Some(1), &[(5, "x")]),
            view(2, "B", Some(2), &[(6, "y")]),
            view(3, "C", Some(3), &[(5, "x")]),
            view(4, "D", Some(2), &[(5, "x"), (6, "y")]),
            view(5, "E", None, &[(5, "x")]),
        ];
        let options = FilterOptions {
            advanced: AdvancedFilters { room_ids: vec![1, 2], tag_ids: vec![5], ..Default::default() },
            ..Default::default()
        };

        assert_eq!(ids(&filter_items(&items, &options)), vec![1, 4]);
    }

    #[test]
    fn search_matches_name_location_and_tags_case_insensitively() {
        let mut in_kitchen = view(1, "Panela", None, &[]);
        in_kitchen.location = Some("Cozinha > Armário".into());
        let items = vec![
            in_kitchen,
            view(2, "Cabo HDMI", None, &[(1, "Eletrônicos")]),
            view(3, "Vassoura", None, &[]),
        ];

        let by = |q: &str| FilterOptions { search_query: q.into(), ..Default::default() };
        assert_eq!(ids(&filter_items(&items, &by("COZINHA"))), vec![1]);
        assert_eq!(ids(&filter_items(&items, &by("eletr"))), vec![2]);
        assert_eq!(ids(&filter_items(&items, &by("hdmi"))), vec![2]);
        assert_eq!(ids(&filter_items(&items, &by("   "))).len(), 3);
    }

    #[test]
    fn primary_flags_combine_with_and() {
        let mut fav = view(1, "A", None, &[]);
        fav.is_favorite = true;
        let mut fav_consumable = view(2, "B", None, &[]);
        fav_consumable.is_favorite = true;
        fav_consumable.item.consumable = true;
        let mut expired = view(3, "C", None, &[]);
        expired.item.status = ItemStatus::Expired;
        let items = vec![fav, fav_consumable, expired];

        let favorites = FilterOptions { favorites_only: true, ..Default::default() };
        assert_eq!(ids(&filter_items(&items, &favorites)), vec![1, 2]);

        let both = FilterOptions { favorites_only: true, consumables_only: true, ..Default::default() };
        assert_eq!(ids(&filter_items(&items, &both)), vec![2]);

        let status = FilterOptions { status: Some(ItemStatus::Expired), ..Default::default() };
        assert_eq!(ids(&filter_items(&items, &status)), vec![3]);
    }

    #[test]
    fn triggered_alerts_follow_quantity_and_activity() {
        let items = vec![
            with_alert(view(1, "Leite", None, &[]), 2, 5, true),
            with_alert(view(2, "Arroz", None, &[]), 10, 5, true),
            with_alert(view(3, "Sal", None, &[]), 0, 5, false),
        ];

        let triggered = get_triggered_alerts(&items);
        assert_eq!(triggered.len(), 1);
        assert_eq!(triggered[0].item_id, 1);
        assert!((triggered[0].criticality - 0.4).abs() < f64::EPSILON);
    }

    #[test]
    fn triggered_alerts_are_sorted_by_criticality() {
        let items = vec![
            with_alert(view(1, "A", None, &[]), 4, 5, true),
            with_alert(view(2, "B", None, &[]), 0, 3, true),
            with_alert(view(3, "C", None, &[]), 2, 10, true),
            with_alert(view(4, "D", None, &[]), 5, 5, true),
        ];

        let triggered = get_triggered_alerts(&items);
        let order: Vec<i64> = triggered.iter().map(|t| t.item_id).collect();
        assert_eq!(order, vec![2, 3, 1, 4]);
        assert!(triggered.windows(2).all(|w| w[0].criticality <= w[1].criticality));
    }

    #[test]
    fn unknown_status_falls_back() {
        assert_eq!(status_style("running_low").label, "Acabando");
        assert_eq!(status_style("lost"), UNKNOWN_STATUS);
        assert_eq!(ItemStatus::OutOfStock.style().color, "#F44336");
    }

    #[test]
    fn extractors_report_only_values_present() {
        let rooms = vec![
            Room { id: 1, name: "Sala".into() },
            Room { id: 2, name: "Garagem".into() },
        ];
        let items = vec![
            view(1, "A", Some(2), &[(5, "x")]),
            view(2, "B", Some(2), &[(5, "x"), (6, "y")]),
        ];

        assert_eq!(present_rooms(&items, &rooms), vec![rooms[1].clone()]);
        let tag_ids: Vec<i64> = present_tags(&items).iter().map(|t| t.id).collect();
        assert_eq!(tag_ids, vec![5, 6]);
        assert_eq!(present_statuses(&items), vec![ItemStatus::Available]);
    }
}
