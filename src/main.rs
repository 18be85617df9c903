use anyhow::Result;
use clap::Parser;
use serde::Serialize;
use tracing::{debug, info};

mod browser;
mod config;
mod extraction;
mod iddaa;
mod mackolik;
mod matching;
mod models;

use config::{Config, Operation};
use mackolik::DeepStatsOptions;
use models::FixtureBundle;

#[tokio::main]
async fn main() -> Result<()> {
    // Initialise tracing / logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let config = Config::parse();
    config.validate()?;
    debug!(
        "analysis API key configured: {}",
        config.gemini_api_key.is_some()
    );

    match config.op.clone() {
        Operation::Leagues => {
            // Blocking CDP work off the runtime thread
            let cfg = config.clone();
            let leagues =
                tokio::task::spawn_blocking(move || mackolik::get_leagues(&cfg)).await?;
            print_json(&leagues.into_data())?;
        }
        Operation::Fixtures { league } => {
            let cfg = config.clone();
            let bundle = tokio::task::spawn_blocking(move || {
                mackolik::get_fixture_and_standings(&cfg, &league)
            })
            .await?;
            match bundle.data() {
                Some(bundle) => print_json(bundle)?,
                None => {
                    if let Some(err) = bundle.error() {
                        debug!("fixtures unavailable: {}", err);
                    }
                    print_json(&FixtureBundle::empty())?;
                }
            }
        }
        Operation::DeepStats { url, no_comparison } => {
            let opts = DeepStatsOptions {
                include_comparison: !no_comparison,
            };
            let stats = tokio::task::spawn_blocking(move || {
                mackolik::get_match_deep_stats(&url, &opts)
            })
            .await?;
            print_json(&stats.into_data())?;
        }
        Operation::TeamStats { league } => {
            let cfg = config.clone();
            let stats = tokio::task::spawn_blocking(move || {
                mackolik::league_stats::get_league_team_stats(&cfg, &league)
            })
            .await?;
            print_json(&stats.into_data())?;
        }
        Operation::Odds {
            label,
            league,
            league_id,
        } => {
            let id = match league_id.or_else(|| league.as_deref().and_then(matching::league_id_for))
            {
                Some(id) => id,
                None => {
                    anyhow::bail!(
                        "league {:?} is not on the odds board; pass --league-id explicitly",
                        league
                    );
                }
            };
            info!("odds lookup '{}' on board league {}", label, id);
            let quote = iddaa::resolve_odds(&config, &label, id).await;
            print_json(&quote.into_data())?;
        }
        Operation::Toto => {
            let rows = iddaa::get_toto_week_list(&config).await;
            print_json(&rows.into_data())?;
        }
    }

    Ok(())
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
