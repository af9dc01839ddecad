use chromiumoxide::Page;
use log::{debug, info, warn};

use crate::browser::input::fill_input;
use crate::browser::navigator::{form_search_url, navigate};
use crate::browser::waiter::{Condition, Locator, wait_for, wait_for_stable};
use crate::config::AppConfig;
use crate::errors::ScrapeError;
use crate::table::{TableOutcome, TableParser};

const NAME_INPUT_ID: &str = "display-name-2";
const SEARCH_BUTTON_XPATH: &str = "//button[contains(@class, 'btn-primary') and normalize-space(.)='Search']";
const TABLE_XPATH: &str = "//table[contains(@class, 'table-bordered')]";
const FIRST_ROW_XPATH: &str = "//table[contains(@class, 'table-bordered')]//tbody/tr[1]";
const FIRST_CELL_XPATH: &str = "//table[contains(@class, 'table-bordered')]//tbody/tr[1]/td[1]";

const HTML_PREVIEW_CHARS: usize = 1000;

/// Submit the member search form and parse the results table
pub async fn search_table(page: &Page, config: &AppConfig, term: &str) -> Result<TableOutcome, ScrapeError> {
    let waits = &config.waits;
    info!("Starting form search for: {}...", term);

    navigate(page, &form_search_url(config.sources.form_base_url)).await?;

    let input = wait_for(
        page,
        &Locator::id(NAME_INPUT_ID),
        Condition::Present,
        waits.input_timeout(),
        waits.poll_interval(),
    )
    .await?;
    fill_input(page, &input, term).await?;
    info!("Entered search term: {}", term);

    let button = wait_for(
        page,
        &Locator::xpath(SEARCH_BUTTON_XPATH),
        Condition::Clickable,
        waits.button_timeout(),
        waits.poll_interval(),
    )
    .await?;
    button
        .click()
        .await
        .map_err(|e| ScrapeError::browser("clicking Search", e))?;
    info!("Clicked the Search button");

    // The record fails here if no result row ever shows up
    wait_for(
        page,
        &Locator::xpath(FIRST_ROW_XPATH),
        Condition::Present,
        waits.results_timeout(),
        waits.poll_interval(),
    )
    .await?;
    info!("Results table content loaded");

    match wait_for(
        page,
        &Locator::xpath(FIRST_CELL_XPATH),
        Condition::NonEmptyText,
        waits.cell_text_timeout(),
        waits.poll_interval(),
    )
    .await
    {
        Ok(_) => info!("Data cells loaded"),
        Err(e) => warn!("Data cells may not have loaded ({}), continuing anyway", e),
    }

    let table_locator = Locator::xpath(TABLE_XPATH);
    wait_for_stable(page, &table_locator, waits.settle_bound(), waits.poll_interval()).await;

    let html = read_table_html(page, &table_locator).await?;
    debug!("HTML table content: {}", preview(&html));

    let parser = TableParser::new().map_err(|e| ScrapeError::ParseFailure(format!("{:#}", e)))?;
    Ok(parser.parse(&html))
}

async fn read_table_html(page: &Page, locator: &Locator) -> Result<String, ScrapeError> {
    let table = locator
        .find(page)
        .await
        .ok_or_else(|| ScrapeError::ParseFailure("results table vanished".to_string()))?;

    table
        .outer_html()
        .await
        .map_err(|e| ScrapeError::browser("reading table HTML", e))?
        .ok_or_else(|| ScrapeError::ParseFailure("results table has no HTML".to_string()))
}

fn preview(html: &str) -> String {
    if html.chars().count() > HTML_PREVIEW_CHARS {
        let head: String = html.chars().take(HTML_PREVIEW_CHARS).collect();
        format!("{}...", head)
    } else {
        html.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_preview_truncates_long_html() {
        let long = "x".repeat(1500);
        let short = preview(&long);
        assert_eq!(short.len(), HTML_PREVIEW_CHARS + 3);
        assert!(short.ends_with("..."));

        assert_eq!(preview("<table></table>"), "<table></table>");
    }
}
