//! One-shot headless-Chrome session management.
//!
//! Every extraction operation owns exactly one [`BrowserSession`]: launch,
//! navigate, extract, drop. There is no warm pool or tab reuse between
//! calls — the target sites are stateful enough (league selection mutates
//! the page in place) that a fresh session per operation is the only
//! arrangement that stays predictable.
//!
//! Chrome DevTools calls are blocking; async callers must wrap the whole
//! session in `tokio::task::spawn_blocking`.

use std::sync::Arc;
use std::time::Duration;

use headless_chrome::{Browser, LaunchOptions, Tab};
use tracing::{debug, warn};

use crate::extraction::ScrapeError;

/// Hard ceiling on a single navigation. Anything slower is treated as a
/// site outage, not something worth waiting out.
pub const NAV_TIMEOUT: Duration = Duration::from_secs(60);

/// Overlay elements stripped from every page after load. Best-effort
/// cleanup of consent dialogs and ad banners that sit over the tables we
/// read; an unknown new overlay degrades extraction, it does not break it.
const OVERLAY_SELECTORS: &[&str] = &[
    ".fc-consent-root",
    ".fc-dialog-overlay",
    "div[id^=\"cmp-\"]",
    ".cookie-banner",
    "#dvBanner",
];

/// Options for opening a page.
#[derive(Debug, Clone, Default)]
pub struct PageOptions {
    /// Value to set on the league `<select>` after load. The archive site
    /// re-renders client-side on change with no load event to await, so a
    /// fixed settle delay follows.
    pub select_league: Option<String>,
    /// How long to sleep after changing the selection control
    pub settle: Duration,
    /// Selector to wait for (visible) after navigation; timeout tolerated
    pub wait_for: Option<(String, Duration)>,
}

/// A live page inside a dedicated headless-Chrome process.
///
/// Dropping the session closes the browser.
pub struct BrowserSession {
    // Held only to keep the Chrome process alive for the tab's lifetime
    _browser: Browser,
    tab: Arc<Tab>,
}

impl BrowserSession {
    /// Launch Chrome, open `url` and run the standard post-load sequence:
    /// wait for DOM content, strip known overlays, optionally switch the
    /// league selector and settle.
    pub fn open(url: &str, opts: &PageOptions) -> Result<Self, ScrapeError> {
        let launch = LaunchOptions::default_builder()
            .headless(true)
            .sandbox(false)
            .window_size(Some((1280, 800)))
            .build()
            .map_err(|e| ScrapeError::Navigation(format!("launch options: {}", e)))?;

        let browser = Browser::new(launch)
            .map_err(|e| ScrapeError::Navigation(format!("chrome launch: {}", e)))?;
        let tab = browser
            .new_tab()
            .map_err(|e| ScrapeError::Navigation(format!("new tab: {}", e)))?;
        tab.set_default_timeout(NAV_TIMEOUT);

        debug!("navigating to {}", url);
        tab.navigate_to(url)
            .and_then(|t| t.wait_until_navigated())
            .map_err(|e| ScrapeError::Navigation(format!("{}: {}", url, e)))?;

        let session = BrowserSession {
            _browser: browser,
            tab,
        };
        session.dismiss_overlays();

        if let Some(value) = &opts.select_league {
            session.select_league(value);
            std::thread::sleep(opts.settle);
            // The re-render can bring the consent dialog back
            session.dismiss_overlays();
        }

        if let Some((selector, timeout)) = &opts.wait_for {
            session.wait_for(selector, *timeout);
        }

        Ok(session)
    }

    /// Remove the known consent/ad overlays from the DOM. Best-effort:
    /// a failed script is logged and ignored.
    pub fn dismiss_overlays(&self) {
        let script = format!(
            r#"(() => {{
                const selectors = [{}];
                selectors.forEach(sel => {{
                    document.querySelectorAll(sel).forEach(el => el.remove());
                }});
            }})()"#,
            OVERLAY_SELECTORS
                .iter()
                .map(|s| format!("'{}'", s.replace('"', "\\\"")))
                .collect::<Vec<_>>()
                .join(", ")
        );
        if let Err(e) = self.tab.evaluate(&script, false) {
            debug!("overlay cleanup script failed: {}", e);
        }
    }

    /// Set the league `<select>` value and fire a `change` event so the
    /// page's own handler re-renders the tables.
    fn select_league(&self, value: &str) {
        let script = format!(
            r#"(() => {{
                const el = document.querySelector('#cboLeague');
                if (!el) return;
                el.value = '{}';
                el.dispatchEvent(new Event('change', {{ bubbles: true }}));
            }})()"#,
            value.replace('\'', "\\'")
        );
        if let Err(e) = self.tab.evaluate(&script, false) {
            warn!("league select failed for value {}: {}", value, e);
        }
    }

    /// Wait for `selector` to appear, tolerating a timeout: the stats
    /// tables sometimes render late or not at all, and a missing table is
    /// an empty result downstream, not a hard failure here.
    pub fn wait_for(&self, selector: &str, timeout: Duration) {
        if let Err(e) = self
            .tab
            .wait_for_element_with_custom_timeout(selector, timeout)
        {
            debug!("wait for {} gave up: {}", selector, e);
        }
    }

    /// Run a script in page context, ignoring its result. Used for the
    /// programmatic tab clicks on the stats pages.
    pub fn evaluate(&self, script: &str) {
        if let Err(e) = self.tab.evaluate(script, false) {
            debug!("page script failed: {}", e);
        }
    }

    /// Serialized DOM of the current page state.
    pub fn html(&self) -> Result<String, ScrapeError> {
        self.tab
            .get_content()
            .map_err(|e| ScrapeError::Navigation(format!("page content: {}", e)))
    }
}
