//! League-wide team statistics via the tabbed stats UI.
//!
//! The stats table is not addressable by URL: it renders only after
//! clicking through "İstatistik" → "Takım İstatistikleri" in the page's
//! own tab strip. The clicks run as injected JS matching visible link
//! text, then we wait (bounded) for the table and parse whatever showed
//! up.

use std::time::Duration;

use scraper::Html;
use tracing::info;

use crate::browser::BrowserSession;
use crate::config::Config;
use crate::extraction::{Extraction, ScrapeError};
use crate::models::TeamLeagueStat;

use super::{league_select_options, tables};

/// Client-side tab switch has no load event; fixed delay between clicks.
const TAB_SETTLE: Duration = Duration::from_secs(2);

/// The stats table renders lazily; proceed regardless on timeout and let
/// the parser report what is actually there.
const STATS_TABLE_WAIT: Duration = Duration::from_secs(15);

/// Clicks the top-level tab whose text mentions the stats section.
const CLICK_STATS_TAB: &str = r#"(() => {
    const tabs = document.querySelectorAll('#tab-list a');
    for (const tab of tabs) {
        if (tab.innerText.includes('İstatistik')) { tab.click(); break; }
    }
})()"#;

/// Clicks the sub-menu entry for per-team statistics.
const CLICK_TEAM_STATS_LINK: &str = r#"(() => {
    const links = document.querySelectorAll('.sub-menu a');
    for (const link of links) {
        if (link.innerText.includes('Takım İstatistikleri')) { link.click(); break; }
    }
})()"#;

/// Fetch per-team league statistics as flat micro-format lines.
pub fn get_league_team_stats(cfg: &Config, league_value: &str) -> Extraction<Vec<TeamLeagueStat>> {
    Extraction::from_result(
        fetch_league_team_stats(cfg, league_value),
        "get_league_team_stats",
    )
}

fn fetch_league_team_stats(
    cfg: &Config,
    league_value: &str,
) -> Result<Vec<TeamLeagueStat>, ScrapeError> {
    let opts = league_select_options(cfg, league_value);
    let session = BrowserSession::open(&cfg.base_url, &opts)?;

    session.evaluate(CLICK_STATS_TAB);
    std::thread::sleep(TAB_SETTLE);
    session.evaluate(CLICK_TEAM_STATS_LINK);
    session.wait_for("#tblTeamStats", STATS_TABLE_WAIT);

    let doc = Html::parse_document(&session.html()?);
    let stats = tables::parse_team_stats(&doc)?;
    info!(
        "league {}: {} team stat lines",
        league_value,
        stats.len()
    );
    Ok(stats)
}
