use futures_util::future::join_all;
use rand::seq::SliceRandom;
use tracing::{info, warn};

use super::policy::cards_or_empty;
use crate::api::{name_filter, CatalogClient, BULK_PAGE_SIZE, SEARCH_PAGE_SIZE};
use crate::config::{Featured, FeaturedStrategy};
use crate::models::CatalogCard;

pub async fn select(catalog: &CatalogClient, settings: &Featured) -> Vec<CatalogCard> {
    let cards = match settings.strategy {
        FeaturedStrategy::Roster => from_roster(catalog, &settings.roster, settings.count).await,
        FeaturedStrategy::Sample => from_sample(catalog, settings.count).await,
    };

    if cards.is_empty() {
        warn!(strategy = ?settings.strategy, "no featured cards available");
    } else {
        info!(strategy = ?settings.strategy, count = cards.len(), "selected featured cards");
    }
    cards
}

/// One lookup per roster name, all in flight at once. The first match of
/// each successful lookup is kept, in roster order.
async fn from_roster(catalog: &CatalogClient, roster: &[String], count: usize) -> Vec<CatalogCard> {
    let lookups = roster.iter().map(|name| async move {
        let result = catalog.search(Some(&name_filter(name)), SEARCH_PAGE_SIZE).await;
        cards_or_empty(name, result).into_iter().next()
    });

    join_all(lookups)
        .await
        .into_iter()
        .flatten()
        .take(count)
        .collect()
}

async fn from_sample(catalog: &CatalogClient, count: usize) -> Vec<CatalogCard> {
    let result = catalog.search(None, BULK_PAGE_SIZE).await;
    pick_random(cards_or_empty("bulk sample", result), count)
}

fn pick_random(mut cards: Vec<CatalogCard>, count: usize) -> Vec<CatalogCard> {
    cards.shuffle(&mut rand::thread_rng());
    cards.truncate(count);
    cards
}
