use chromiumoxide::Page;
use log::info;

use crate::errors::ScrapeError;

pub fn form_search_url(base: &str) -> String {
    format!("{}/civicrm/player-search", base.trim_end_matches('/'))
}

pub fn fuzzy_search_url(base: &str, term: &str) -> String {
    format!("{}/?fuzzy={}", base.trim_end_matches('/'), urlencoding::encode(term.trim()))
}

pub fn profile_url(base: &str, member_id: &str) -> String {
    format!("{}/player/{}", base.trim_end_matches('/'), member_id.trim())
}

pub fn membership_url(base: &str, member_id: &str) -> String {
    format!("{}/msa/MbrDtlMain.php?{}", base.trim_end_matches('/'), member_id.trim())
}

/// Load `url` in the working page. No retries.
pub async fn navigate(page: &Page, url: &str) -> Result<(), ScrapeError> {
    page.goto(url)
        .await
        .map_err(|e| ScrapeError::NavigationFailed {
            url: url.to_string(),
            reason: e.to_string(),
        })?;

    info!("Navigated to {}", url);
    Ok(())
}
