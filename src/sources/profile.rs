use chromiumoxide::Page;
use log::{info, warn};

use crate::browser::navigator::{membership_url, navigate, profile_url};
use crate::browser::waiter::{Condition, Locator, wait_for};
use crate::config::AppConfig;
use crate::domain::ProfileInfo;
use crate::errors::ScrapeError;
use crate::extract::profile::{EXPIRATION_XPATH, RATING_XPATH, node_text};

/// Read a member's rating and membership expiration.
///
/// A field whose node never shows up is left empty; navigation errors fail
/// the whole lookup.
pub async fn lookup(page: &Page, config: &AppConfig, member_id: &str) -> Result<ProfileInfo, ScrapeError> {
    navigate(page, &profile_url(config.sources.ratings_base_url, member_id)).await?;
    let rating = read_node(page, config, RATING_XPATH, "rating").await?;

    navigate(page, &membership_url(config.sources.msa_base_url, member_id)).await?;
    let expiration = read_node(page, config, EXPIRATION_XPATH, "expiration date").await?;

    let profile = ProfileInfo::new(member_id, rating, expiration);
    info!(
        "Member {}: rating {}, expires {}",
        member_id,
        profile.rating,
        profile.expiration_date.as_deref().unwrap_or("unknown")
    );
    Ok(profile)
}

async fn read_node(
    page: &Page,
    config: &AppConfig,
    xpath: &str,
    field: &str,
) -> Result<Option<String>, ScrapeError> {
    let waits = &config.waits;
    let found = wait_for(
        page,
        &Locator::xpath(xpath),
        Condition::Present,
        waits.profile_timeout(),
        waits.poll_interval(),
    )
    .await;
    let Some(element) = optional_field(field, found)? else {
        return Ok(None);
    };

    match element.inner_text().await {
        Ok(text) => Ok(node_text(text)),
        Err(e) => {
            warn!("Could not read {} text: {}", field, e);
            Ok(None)
        }
    }
}

/// A field that never appeared is absent; any other failure propagates
fn optional_field<T>(field: &str, found: Result<T, ScrapeError>) -> Result<Option<T>, ScrapeError> {
    match found {
        Ok(value) => Ok(Some(value)),
        Err(e) if e.is_timeout() => {
            warn!("Could not retrieve {}: {}", field, e);
            Ok(None)
        }
        Err(e) => Err(e),
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;

    #[test]
    fn test_missing_field_becomes_none() {
        let timed_out: Result<u32, ScrapeError> = Err(ScrapeError::WaitTimeout {
            what: "expiration node".into(),
            after: Duration::from_secs(10),
        });
        assert!(optional_field("expiration date", timed_out).unwrap().is_none());
        assert_eq!(optional_field("rating", Ok(1850)).unwrap(), Some(1850));
    }

    #[test]
    fn test_other_failures_propagate() {
        let failed: Result<u32, ScrapeError> = Err(ScrapeError::NavigationFailed {
            url: "https://www.uschess.org/msa/MbrDtlMain.php?1".into(),
            reason: "net::ERR_NAME_NOT_RESOLVED".into(),
        });
        let err = optional_field("expiration date", failed).unwrap_err();
        assert!(matches!(err, ScrapeError::NavigationFailed { .. }));

        let broken: Result<u32, ScrapeError> = Err(ScrapeError::browser("finding node", "session closed"));
        assert!(matches!(optional_field("rating", broken), Err(ScrapeError::Browser(_))));
    }
}
