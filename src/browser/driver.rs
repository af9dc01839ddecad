use std::fmt;
use std::future::Future;
use std::panic::AssertUnwindSafe;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result, anyhow};
use chromiumoxide::fetcher::{BrowserFetcher, BrowserFetcherOptions};
use chromiumoxide::{Browser, BrowserConfig, Page};
use futures_util::{FutureExt, Stream, StreamExt};
use log::{debug, info, warn};
use tokio::task::JoinHandle;

use crate::config::settings::BrowserSettings;
use crate::errors::ScrapeError;

/// One way of getting a browser binary to drive
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DriverStrategy {
    /// Download a pinned Chromium build into a cache directory
    Managed { download_dir: PathBuf },
    /// Use a browser already installed at this path
    LocalPath(PathBuf),
    /// Let chromiumoxide look for an installed browser itself
    Discover,
}

impl fmt::Display for DriverStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DriverStrategy::Managed { .. } => write!(f, "managed download"),
            DriverStrategy::LocalPath(path) => write!(f, "local browser at {}", path.display()),
            DriverStrategy::Discover => write!(f, "automatic discovery"),
        }
    }
}

impl DriverStrategy {
    async fn launch(&self, settings: &BrowserSettings) -> Result<BrowserSession> {
        let executable = match self {
            DriverStrategy::Managed { download_dir } => Some(fetch_managed(download_dir).await?),
            DriverStrategy::LocalPath(path) => {
                if !path.exists() {
                    anyhow::bail!("not installed");
                }
                Some(path.clone())
            }
            DriverStrategy::Discover => None,
        };

        let config = build_config(settings, executable)?;
        BrowserSession::launch(config).await
    }
}

/// Strategies in the order they are tried
pub fn strategies(settings: &BrowserSettings) -> Vec<DriverStrategy> {
    let mut list = vec![DriverStrategy::Managed {
        download_dir: settings.download_dir.clone(),
    }];
    list.extend(settings.local_paths.iter().cloned().map(DriverStrategy::LocalPath));
    list.push(DriverStrategy::Discover);
    list
}

/// Start a browser, trying each strategy until one works
pub async fn acquire(settings: &BrowserSettings) -> Result<BrowserSession, ScrapeError> {
    first_success(strategies(settings), |strategy| async move {
        strategy.launch(settings).await
    })
    .await
    .map_err(|attempts| ScrapeError::DriverUnavailable { attempts })
}

/// Run `attempt` over `candidates` in order and return the first success.
///
/// Every failure is logged and kept; the error lists all of them.
pub async fn first_success<C, T, F, Fut>(candidates: Vec<C>, mut attempt: F) -> Result<T, Vec<String>>
where
    C: fmt::Display,
    F: FnMut(C) -> Fut,
    Fut: Future<Output = Result<T>>,
{
    let mut failures = Vec::new();

    for candidate in candidates {
        let label = candidate.to_string();
        info!("Attempting to start browser via {}...", label);

        match attempt(candidate).await {
            Ok(value) => {
                info!("Browser started via {}", label);
                return Ok(value);
            }
            Err(e) => {
                warn!("Browser via {} failed: {:#}", label, e);
                failures.push(format!("{}: {:#}", label, e));
            }
        }
    }

    Err(failures)
}

async fn fetch_managed(download_dir: &Path) -> Result<PathBuf> {
    tokio::fs::create_dir_all(download_dir)
        .await
        .with_context(|| format!("Failed to create {}", download_dir.display()))?;

    let options = BrowserFetcherOptions::builder()
        .with_path(download_dir)
        .build()
        .map_err(|e| anyhow!("Invalid fetcher options: {}", e))?;

    let revision = BrowserFetcher::new(options)
        .fetch()
        .await
        .map_err(|e| anyhow!("Chromium download failed: {}", e))?;

    debug!("Managed Chromium at {}", revision.executable_path.display());
    Ok(revision.executable_path)
}

fn build_config(settings: &BrowserSettings, executable: Option<PathBuf>) -> Result<BrowserConfig> {
    let (width, height) = settings.window_size;
    let mut builder = BrowserConfig::builder()
        .no_sandbox()
        .window_size(width, height)
        .launch_timeout(Duration::from_secs(settings.launch_timeout_secs))
        .arg("--disable-dev-shm-usage")
        .arg("--disable-gpu")
        .arg("--disable-extensions")
        .arg(format!("--user-agent={}", settings.user_agent));

    if !settings.headless {
        builder = builder.with_head();
    }
    if let Some(path) = executable {
        builder = builder.chrome_executable(path);
    }

    builder.build().map_err(|e| anyhow!("Invalid browser config: {}", e))
}

/// Acquire a session, run `work` against it, and close it on every exit path.
///
/// A panic inside `work` is re-raised after the browser has been closed.
pub async fn with_session<T, E, F, Fut>(settings: &BrowserSettings, work: F) -> Result<T, E>
where
    F: FnOnce(Arc<BrowserSession>) -> Fut,
    Fut: Future<Output = Result<T, E>>,
    E: From<ScrapeError>,
{
    let session = acquire(settings).await?;
    scoped(session, work, BrowserSession::close).await
}

/// Lend `resource` to `work`, then hand it to `finish` even if `work` panicked
async fn scoped<R, T, F, Fut, G, GFut>(resource: R, work: F, finish: G) -> T
where
    F: FnOnce(Arc<R>) -> Fut,
    Fut: Future<Output = T>,
    G: FnOnce(R) -> GFut,
    GFut: Future<Output = ()>,
{
    let shared = Arc::new(resource);
    let outcome = AssertUnwindSafe(work(Arc::clone(&shared))).catch_unwind().await;

    match Arc::try_unwrap(shared) {
        Ok(resource) => finish(resource).await,
        Err(_) => warn!("Resource still shared after use, leaving it to drop"),
    }

    match outcome {
        Ok(value) => value,
        Err(panic) => std::panic::resume_unwind(panic),
    }
}

/// A running browser with a single working page.
///
/// Call [`BrowserSession::close`] when done; dropping an unclosed session
/// stops the event handler and kills the browser process in the background.
pub struct BrowserSession {
    browser: Option<Browser>,
    page: Page,
    handler_task: JoinHandle<()>,
}

impl BrowserSession {
    async fn launch(config: BrowserConfig) -> Result<Self> {
        let (browser, handler) = Browser::launch(config)
            .await
            .context("Failed to launch browser")?;

        let handler_task = tokio::spawn(drain_events(handler));

        let page = match browser.new_page("about:blank").await {
            Ok(page) => page,
            Err(e) => {
                handler_task.abort();
                return Err(anyhow!("Failed to open a page: {}", e));
            }
        };

        Ok(Self {
            browser: Some(browser),
            page,
            handler_task,
        })
    }

    pub fn page(&self) -> &Page {
        &self.page
    }

    pub async fn close(mut self) {
        if let Some(mut browser) = self.browser.take() {
            if let Err(e) = browser.close().await {
                warn!("Error closing browser: {}", e);
            }
            if let Err(e) = browser.wait().await {
                debug!("Browser process did not exit cleanly: {}", e);
            }
        }
        self.handler_task.abort();
        info!("Browser closed.");
    }
}

impl Drop for BrowserSession {
    fn drop(&mut self) {
        self.handler_task.abort();

        let Some(mut browser) = self.browser.take() else {
            return;
        };
        warn!("Browser session dropped without close, killing the browser");
        match tokio::runtime::Handle::try_current() {
            Ok(runtime) => {
                runtime.spawn(async move {
                    if let Some(Err(e)) = browser.kill().await {
                        debug!("Failed to kill browser: {}", e);
                    }
                });
            }
            // No runtime left to kill from; chromiumoxide's own drop takes over
            Err(_) => drop(browser),
        }
    }
}

/// Poll the CDP handler until the connection ends.
///
/// Messages that fail to decode are skipped; only the end of the stream
/// stops the loop.
async fn drain_events<S, E>(mut events: S)
where
    S: Stream<Item = std::result::Result<(), E>> + Unpin,
    E: fmt::Display,
{
    while let Some(event) = events.next().await {
        if let Err(e) = event {
            debug!("Skipping CDP message: {}", e);
        }
    }
    debug!("CDP event stream ended");
}
