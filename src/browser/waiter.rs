use std::future::Future;
use std::time::Duration;

use chromiumoxide::Page;
use chromiumoxide::element::Element;
use log::debug;
use tokio::time::{Instant, sleep, timeout_at};

use crate::errors::ScrapeError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Strategy {
    Id,
    Css,
    XPath,
}

/// Where to find an element on the page
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Locator {
    pub strategy: Strategy,
    pub selector: String,
}

impl Locator {
    pub fn id(id: &str) -> Self {
        Self { strategy: Strategy::Id, selector: id.to_string() }
    }

    pub fn css(selector: &str) -> Self {
        Self { strategy: Strategy::Css, selector: selector.to_string() }
    }

    pub fn xpath(selector: &str) -> Self {
        Self { strategy: Strategy::XPath, selector: selector.to_string() }
    }

    fn css_selector(&self) -> String {
        match self.strategy {
            Strategy::Id => format!("[id=\"{}\"]", self.selector),
            _ => self.selector.clone(),
        }
    }

    /// Look the element up once; `None` if it isn't on the page (yet)
    pub async fn find(&self, page: &Page) -> Option<Element> {
        let found = match self.strategy {
            Strategy::XPath => page.find_xpath(self.selector.as_str()).await,
            Strategy::Id | Strategy::Css => page.find_element(self.css_selector()).await,
        };
        found.ok()
    }

    pub async fn count(&self, page: &Page) -> usize {
        let found = match self.strategy {
            Strategy::XPath => page.find_xpaths(self.selector.as_str()).await,
            Strategy::Id | Strategy::Css => page.find_elements(self.css_selector()).await,
        };
        found.map(|elements| elements.len()).unwrap_or(0)
    }
}

impl std::fmt::Display for Locator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:?} {}", self.strategy, self.selector)
    }
}

/// What must hold for a located element before the wait ends
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Condition {
    Present,
    Clickable,
    NonEmptyText,
}

const CLICKABLE_JS: &str = "function() { \
    const r = this.getBoundingClientRect(); \
    return !this.disabled && r.width > 0 && r.height > 0; \
}";

impl Condition {
    async fn holds(&self, element: &Element) -> bool {
        match self {
            Condition::Present => true,
            Condition::Clickable => element
                .call_js_fn(CLICKABLE_JS, false)
                .await
                .ok()
                .and_then(|ret| ret.result.value)
                .and_then(|value| value.as_bool())
                .unwrap_or(false),
            Condition::NonEmptyText => element
                .inner_text()
                .await
                .ok()
                .flatten()
                .is_some_and(|text| !text.trim().is_empty()),
        }
    }
}

/// Poll `probe` every `interval` until it yields a value or `timeout` elapses
pub async fn poll_until<T, F, Fut>(
    what: &str,
    timeout: Duration,
    interval: Duration,
    mut probe: F,
) -> Result<T, ScrapeError>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Option<T>>,
{
    let deadline = Instant::now() + timeout;

    loop {
        if let Some(value) = bounded(deadline, probe()).await {
            return Ok(value);
        }

        let now = Instant::now();
        if now >= deadline {
            return Err(ScrapeError::WaitTimeout {
                what: what.to_string(),
                after: timeout,
            });
        }
        sleep(interval.min(deadline - now)).await;
    }
}

/// Run one probe, giving up on it once `deadline` has passed
async fn bounded<T, Fut>(deadline: Instant, probe: Fut) -> Option<T>
where
    Fut: Future<Output = Option<T>>,
{
    timeout_at(deadline, probe).await.ok().flatten()
}

/// Block until the located element satisfies `condition`
pub async fn wait_for(
    page: &Page,
    locator: &Locator,
    condition: Condition,
    timeout: Duration,
    interval: Duration,
) -> Result<Element, ScrapeError> {
    let what = format!("{:?} of {}", condition, locator);
    debug!("Waiting up to {:?} for {}", timeout, what);

    poll_until(&what, timeout, interval, || async move {
        let element = locator.find(page).await?;
        condition.holds(&element).await.then_some(element)
    })
    .await
}

/// Poll a content fingerprint until two consecutive reads agree.
///
/// Returns `false` if `bound` elapsed first. Missing fingerprints never count
/// as stable.
pub async fn poll_until_stable<T, F, Fut>(bound: Duration, interval: Duration, mut fingerprint: F) -> bool
where
    T: PartialEq,
    F: FnMut() -> Fut,
    Fut: Future<Output = Option<T>>,
{
    let deadline = Instant::now() + bound;
    let mut previous: Option<T> = None;

    loop {
        let current = bounded(deadline, fingerprint()).await;
        if current.is_some() && current == previous {
            return true;
        }
        previous = current;

        let now = Instant::now();
        if now >= deadline {
            return false;
        }
        sleep(interval.min(deadline - now)).await;
    }
}

/// Wait for client-side rendering under `locator` to settle
pub async fn wait_for_stable(page: &Page, locator: &Locator, bound: Duration, interval: Duration) -> bool {
    let settled = poll_until_stable(bound, interval, || async move {
        let element = locator.find(page).await?;
        element.outer_html().await.ok().flatten()
    })
    .await;

    if settled {
        debug!("Content under {} settled", locator);
    } else {
        debug!("Content under {} still changing after {:?}", locator, bound);
    }
    settled
}
