//! Pairs freshly inserted clients with their opening deals.

use std::collections::HashSet;

use uuid::Uuid;

use super::normalizer::ClientImportItem;
use crate::types::{NewClient, NewDeal};

/// Build one opening deal per client of an inserted chunk.
///
/// `items[i]` and `clients[i]` describe the same row. Clients carry ids
/// assigned before the insert, so the pairing uses those ids: a client whose
/// id is absent from `inserted_ids` gets a deal without a client. If the store
/// reported none of the submitted ids (it assigned its own), ids are paired
/// by position instead, and positions past the end of `inserted_ids` get no client.
pub fn link_deals(items: &[ClientImportItem], clients: &[NewClient], inserted_ids: &[Uuid]) -> Vec<NewDeal> {
    let reported: HashSet<Uuid> = inserted_ids.iter().copied().collect();
    let store_assigned = !clients.iter().any(|c| reported.contains(&c.id));

    items
        .iter()
        .zip(clients)
        .enumerate()
        .map(|(position, (item, client))| {
            let client_id = if store_assigned {
                inserted_ids.get(position).copied()
            } else {
                reported.contains(&client.id).then_some(client.id)
            };
            NewDeal::opening(client.name.clone(), client_id, Some(item.country.clone()))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::DealStage;

    fn chunk(n: usize) -> (Vec<ClientImportItem>, Vec<NewClient>) {
        let items: Vec<ClientImportItem> = (0..n)
            .map(|i| ClientImportItem {
                name: format!("client {i}"),
                email: None,
                phone: None,
                company: None,
                country: if i % 2 == 0 { "Россия".into() } else { "Армения".into() },
            })
            .collect();
        let clients = items.iter().map(ClientImportItem::to_new_client).collect();
        (items, clients)
    }

    #[test]
    fn deals_follow_returned_ids_in_order() {
        let (items, clients) = chunk(5);
        let ids: Vec<Uuid> = clients.iter().map(|c| c.id).collect();

        let deals = link_deals(&items, &clients, &ids);

        assert_eq!(deals.len(), 5);
        for (i, deal) in deals.iter().enumerate() {
            assert_eq!(deal.client_id, Some(ids[i]));
            assert_eq!(deal.title, clients[i].name);
            assert_eq!(deal.country.as_deref(), Some(items[i].country.as_str()));
            assert_eq!(deal.stage, DealStage::New);
        }
    }

    #[test]
    fn reordered_ids_still_pair_each_deal_with_its_client() {
        let (items, clients) = chunk(4);
        let mut ids: Vec<Uuid> = clients.iter().map(|c| c.id).collect();
        ids.reverse();

        let deals = link_deals(&items, &clients, &ids);

        for (deal, client) in deals.iter().zip(&clients) {
            assert_eq!(deal.client_id, Some(client.id));
        }
    }

    #[test]
    fn missing_id_yields_deal_without_client() {
        let (items, clients) = chunk(3);
        let ids = vec![clients[0].id, clients[2].id];

        let deals = link_deals(&items, &clients, &ids);

        assert_eq!(deals.len(), 3);
        assert_eq!(deals[0].client_id, Some(clients[0].id));
        assert_eq!(deals[1].client_id, None);
        assert_eq!(deals[2].client_id, Some(clients[2].id));
    }

    #[test]
    fn store_assigned_ids_pair_by_position() {
        let (items, clients) = chunk(3);
        let ids = vec![Uuid::new_v4(), Uuid::new_v4()];

        let deals = link_deals(&items, &clients, &ids);

        assert_eq!(deals[0].client_id, Some(ids[0]));
        assert_eq!(deals[1].client_id, Some(ids[1]));
        assert_eq!(deals[2].client_id, None);
    }
}
