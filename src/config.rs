use clap::{Parser, Subcommand};

/// Headless-browser extraction of football fixtures, standings, match
/// deep stats and iddaa odds. Each subcommand runs one self-contained
/// browser session and prints the extracted records as JSON on stdout.
#[derive(Parser, Debug, Clone)]
#[command(name = "matchscout", version, about)]
pub struct Config {
    /// Archive site entry point (league selector + tables)
    #[arg(
        long,
        env = "MACKOLIK_BASE_URL",
        default_value = "https://arsiv.mackolik.com/Puan-Durumu/s=70381/Turkiye-Super-Lig"
    )]
    pub base_url: String,

    /// Odds site base URL (program board lives under /program/futbol)
    #[arg(long, env = "IDDAA_BASE_URL", default_value = "https://www.iddaa.com")]
    pub odds_base_url: String,

    /// Weekly Spor Toto list URL
    #[arg(
        long,
        env = "TOTO_URL",
        default_value = "https://www.iddaa.com/spor-toto"
    )]
    pub toto_url: String,

    /// Seconds to wait for the client-side re-render after switching the
    /// league selector (the page fires no load event for it)
    #[arg(long, env = "SETTLE_SECS", default_value = "3")]
    pub settle_secs: u64,

    /// API key forwarded to the downstream analysis layer. Carried as
    /// explicit configuration; never stored as process-global state.
    #[arg(long, env = "GEMINI_API_KEY")]
    pub gemini_api_key: Option<String>,

    #[command(subcommand)]
    pub op: Operation,
}

#[derive(Subcommand, Debug, Clone)]
pub enum Operation {
    /// List the leagues available in the archive site's selector
    Leagues,

    /// Fetch fixtures and standings for one league
    Fixtures {
        /// League selector value (from `leagues`); "1-1" is the default league
        #[arg(long, default_value = "1-1")]
        league: String,
    },

    /// Decode a match-detail page into insight fragments
    DeepStats {
        /// Match-detail URL (from a fixture's detail_url)
        #[arg(long)]
        url: String,

        /// Skip the comparison panel and its form-pattern scan
        #[arg(long)]
        no_comparison: bool,
    },

    /// Fetch per-team league statistics (flat micro-format lines)
    TeamStats {
        #[arg(long, default_value = "1-1")]
        league: String,
    },

    /// Resolve 1/X/2 and under/over 2.5 odds for a match label
    Odds {
        /// Free-text match label, e.g. "Galatasaray - Fenerbahçe"
        #[arg(long)]
        label: String,

        /// Display league name, resolved to the board's numeric id
        #[arg(long, conflicts_with = "league_id")]
        league: Option<String>,

        /// Explicit odds-board league id
        #[arg(long)]
        league_id: Option<u32>,
    },

    /// Fetch the weekly 15-match Spor Toto list
    Toto,
}

impl Config {
    pub fn validate(&self) -> anyhow::Result<()> {
        if self.base_url.is_empty() || self.odds_base_url.is_empty() {
            anyhow::bail!("base URLs must not be empty");
        }
        if self.settle_secs == 0 {
            anyhow::bail!(
                "settle_secs must be positive; the league switch needs time to re-render"
            );
        }
        if let Operation::Odds {
            league, league_id, ..
        } = &self.op
        {
            if league.is_none() && league_id.is_none() {
                anyhow::bail!("odds lookup needs --league or --league-id");
            }
        }
        Ok(())
    }
}
