use chromiumoxide::Page;
use log::{info, warn};

use crate::browser::navigator::{fuzzy_search_url, navigate};
use crate::browser::waiter::{Condition, Locator, poll_until_stable, wait_for};
use crate::config::AppConfig;
use crate::domain::PlayerRecord;
use crate::errors::ScrapeError;
use crate::extract::CardParser;
use crate::extract::cards::CARD_SELECTOR;

/// Run a fuzzy name search and read up to `max_results` player cards
pub async fn search_players(
    page: &Page,
    config: &AppConfig,
    term: &str,
    max_results: usize,
) -> Result<Vec<PlayerRecord>, ScrapeError> {
    let waits = &config.waits;
    info!("Starting search for: {}...", term);

    navigate(page, &fuzzy_search_url(config.sources.ratings_base_url, term)).await?;

    let cards = Locator::css(CARD_SELECTOR);
    if let Err(e) = wait_for(
        page,
        &cards,
        Condition::Present,
        waits.cards_timeout(),
        waits.poll_interval(),
    )
    .await
    {
        warn!("No search result cards appeared: {}", e);
        return Ok(Vec::new());
    }

    // Cards render in batches; wait until the count stops moving
    poll_until_stable(waits.settle_bound(), waits.poll_interval(), || {
        let cards = &cards;
        async move { Some(cards.count(page).await) }
    })
    .await;

    let html = page
        .content()
        .await
        .map_err(|e| ScrapeError::browser("reading page content", e))?;

    let parser = CardParser::new().map_err(|e| ScrapeError::ParseFailure(format!("{:#}", e)))?;
    let players = parser.parse(&html, max_results);
    info!("Successfully found {} players", players.len());
    Ok(players)
}
