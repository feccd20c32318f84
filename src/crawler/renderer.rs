//! Rendered (tier 2) fetch through a headless browser
//!
//! Rendering launches a full Chrome process, so it runs on tokio's blocking
//! pool rather than on the async workers that carry static fetches. Each call
//! owns one browser session from launch to teardown; nothing is reused across
//! domains. [`ChromeRenderer::shutdown`] cancels live sessions so their
//! browsers are closed before the process exits.

use crate::config::RendererConfig;
use crate::RenderError;
use chromiumoxide::{Browser, BrowserConfig};
use futures::StreamExt;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;

/// Produces fully rendered markup for a URL after page scripts have run
///
/// Implementations are called from a blocking worker thread and may block.
pub trait Renderer: Send + Sync {
    fn render(&self, url: &str) -> Result<String, RenderError>;
}

/// Runs `renderer` on the blocking pool and waits for its markup
pub async fn render_on_worker(
    renderer: Arc<dyn Renderer>,
    url: &str,
) -> Result<String, RenderError> {
    let url = url.to_string();
    tokio::task::spawn_blocking(move || renderer.render(&url))
        .await
        .map_err(|e| RenderError::Worker(e.to_string()))?
}

/// Counts a browser session as live until dropped
struct SessionGuard(Arc<AtomicUsize>);

impl SessionGuard {
    fn enter(live: &Arc<AtomicUsize>) -> Self {
        live.fetch_add(1, Ordering::SeqCst);
        Self(live.clone())
    }
}

impl Drop for SessionGuard {
    fn drop(&mut self) {
        self.0.fetch_sub(1, Ordering::SeqCst);
    }
}

/// Renderer backed by a headless Chrome launched per call
pub struct ChromeRenderer {
    config: RendererConfig,
    shutdown: watch::Sender<bool>,
    live: Arc<AtomicUsize>,
}

impl ChromeRenderer {
    pub fn new(config: RendererConfig) -> Self {
        let (shutdown, _) = watch::channel(false);
        Self {
            config,
            shutdown,
            live: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// Number of browser sessions currently launching, loading, or tearing down
    pub fn active_sessions(&self) -> usize {
        self.live.load(Ordering::SeqCst)
    }

    /// Cancels every live render and refuses new ones
    ///
    /// Waits up to `grace` for cancelled sessions to close or kill their
    /// browsers. Returns false if some session was still live at the deadline.
    pub async fn shutdown(&self, grace: Duration) -> bool {
        self.shutdown.send_replace(true);

        let deadline = tokio::time::Instant::now() + grace;
        while self.active_sessions() > 0 {
            if tokio::time::Instant::now() >= deadline {
                tracing::warn!(
                    "{} browser sessions still open after {:?}",
                    self.active_sessions(),
                    grace
                );
                return false;
            }
            tokio::time::sleep(Duration::from_millis(50)).await;
        }

        true
    }

    fn is_shut_down(&self) -> bool {
        *self.shutdown.borrow()
    }

    fn browser_config(&self) -> Result<BrowserConfig, RenderError> {
        let mut builder = BrowserConfig::builder()
            .request_timeout(Duration::from_secs(self.config.timeout_secs))
            .arg("--disable-gpu")
            .arg("--disable-dev-shm-usage");

        if let Some(path) = &self.config.chrome_path {
            builder = builder.chrome_executable(path);
        }

        if self.config.no_sandbox {
            builder = builder.no_sandbox();
        }

        builder.build().map_err(RenderError::Launch)
    }

    /// Launches a browser, renders `url`, and tears the browser down
    ///
    /// Teardown happens on every path, including navigation failures and
    /// timeouts. A browser that will not close is killed.
    async fn render_session(&self, url: &str) -> Result<String, RenderError> {
        let _session = SessionGuard::enter(&self.live);
        let mut shutdown = self.shutdown.subscribe();

        let (mut browser, mut handler) = Browser::launch(self.browser_config()?)
            .await
            .map_err(|e| RenderError::Launch(e.to_string()))?;

        let handler_task = tokio::spawn(async move {
            while let Some(event) = handler.next().await {
                if event.is_err() {
                    break;
                }
            }
        });

        let limit = Duration::from_secs(self.config.timeout_secs);
        let result = tokio::select! {
            loaded = tokio::time::timeout(limit, self.load_page(&browser, url)) => match loaded {
                Ok(result) => result,
                Err(_) => Err(RenderError::Timeout {
                    url: url.to_string(),
                    seconds: self.config.timeout_secs,
                }),
            },
            _ = shutdown.wait_for(|stop| *stop) => {
                tracing::debug!("Render of {} cancelled, closing browser", url);
                Err(RenderError::Cancelled {
                    url: url.to_string(),
                })
            }
        };

        match tokio::time::timeout(Duration::from_secs(5), browser.close()).await {
            Ok(Ok(_)) => {}
            Ok(Err(e)) => {
                tracing::debug!("Browser close failed for {}: {}, killing", url, e);
                let _ = browser.kill().await;
            }
            Err(_) => {
                tracing::debug!("Browser close timed out for {}, killing", url);
                let _ = browser.kill().await;
            }
        }
        let _ = browser.wait().await;
        handler_task.abort();

        result
    }

    async fn load_page(&self, browser: &Browser, url: &str) -> Result<String, RenderError> {
        let navigation_error = |e: chromiumoxide::error::CdpError| RenderError::Navigation {
            url: url.to_string(),
            message: e.to_string(),
        };

        let page = browser.new_page(url).await.map_err(navigation_error)?;
        page.wait_for_navigation().await.map_err(navigation_error)?;

        // Give client-side scripts time to inject their content
        tokio::time::sleep(Duration::from_millis(self.config.settle_ms)).await;

        let content = page.content().await.map_err(|e| RenderError::Content {
            url: url.to_string(),
            message: e.to_string(),
        })?;

        let _ = page.close().await;
        Ok(content)
    }
}

impl Renderer for ChromeRenderer {
    fn render(&self, url: &str) -> Result<String, RenderError> {
        if self.is_shut_down() {
            return Err(RenderError::Cancelled {
                url: url.to_string(),
            });
        }

        // A private runtime keeps the browser's CDP traffic off the main workers
        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .map_err(|e| RenderError::Worker(e.to_string()))?;

        tracing::debug!("Launching headless browser for {}", url);
        runtime.block_on(self.render_session(url))
    }
}
