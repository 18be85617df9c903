//! Positional decoding of the archive site's HTML tables.
//!
//! The tables carry no schema: which cell means what is fixed by the
//! site's layout, and that layout is the external contract this module
//! targets. Every positional assumption lives in exactly one named
//! accessor below so a site redesign needs one localized edit, and each
//! accessor is pinned by a fixture test on a captured fragment.
//!
//! A row that fails any accessor is skipped with a debug log; malformed
//! rows are routine on these pages, never fatal.

use scraper::{ElementRef, Html, Selector};
use tracing::debug;

use crate::extraction::ScrapeError;
use crate::models::{Fixture, StandingEntry, TeamLeagueStat};

/// Parse a CSS selector literal. The literals in this crate are fixed
/// strings validated by the fixture tests, so a parse failure is a bug.
pub(crate) fn sel(css: &str) -> Selector {
    Selector::parse(css).expect("static selector")
}

/// All text of an element, whitespace-collapsed.
pub(crate) fn clean_text(el: ElementRef<'_>) -> String {
    el.text()
        .flat_map(|t| t.split_whitespace())
        .collect::<Vec<_>>()
        .join(" ")
}

fn cells(row: ElementRef<'_>) -> Vec<ElementRef<'_>> {
    row.select(&sel("td")).collect()
}

// ── Fixture table (#tblFixture) ────────────────────────────────────────────
//
// Layout contract: a match row has more than 5 cells; date and time sit in
// the first two; home/away team cells are right/left aligned around a
// center cell whose anchor links to the match-detail page.

fn fixture_date(cells: &[ElementRef<'_>]) -> Option<String> {
    cells.first().map(|c| clean_text(*c))
}

fn fixture_time(cells: &[ElementRef<'_>]) -> Option<String> {
    cells.get(1).map(|c| clean_text(*c))
}

fn fixture_home(row: ElementRef<'_>) -> Option<String> {
    row.select(&sel(r#"td[align="right"]"#))
        .next()
        .map(clean_text)
}

fn fixture_away(row: ElementRef<'_>) -> Option<String> {
    row.select(&sel(r#"td[align="left"]"#))
        .next()
        .map(clean_text)
}

/// Detail link from the center cell. Rows without the anchor (date
/// separators, postponed matches) yield `None` and produce no fixture.
fn fixture_detail_url(row: ElementRef<'_>) -> Option<String> {
    let center = row.select(&sel(r#"td[align="center"]"#)).next()?;
    let href = center
        .select(&sel("a"))
        .next()
        .and_then(|a| a.value().attr("href"))?;
    Some(absolutize(href))
}

/// The archive site emits protocol-relative detail hrefs.
fn absolutize(href: &str) -> String {
    if let Some(rest) = href.strip_prefix("//") {
        format!("https://{}", rest)
    } else {
        href.to_string()
    }
}

/// Decode the fixture table into records, skipping everything that does
/// not look like a match row.
pub fn parse_fixtures(doc: &Html) -> Result<Vec<Fixture>, ScrapeError> {
    let table = doc
        .select(&sel("table#tblFixture"))
        .next()
        .ok_or(ScrapeError::Structure("#tblFixture"))?;

    let mut fixtures = Vec::new();
    for row in table.select(&sel("tr")) {
        let cols = cells(row);
        if cols.len() <= 5 {
            continue; // date separator or filler row
        }
        let parsed = (|| {
            Some(Fixture {
                date: fixture_date(&cols)?,
                time: fixture_time(&cols)?,
                home: fixture_home(row)?,
                away: fixture_away(row)?,
                detail_url: fixture_detail_url(row)?,
            })
        })();
        match parsed {
            Some(fixture) => fixtures.push(fixture),
            None => debug!("skipping malformed fixture row ({} cells)", cols.len()),
        }
    }
    Ok(fixtures)
}

// ── Standings table (#tblStanding) ─────────────────────────────────────────
//
// Layout contract: data rows carry class `puan_row`; the team name is in
// column 1 and the points total in column 9. Row order IS the rank.

fn standing_team(cells: &[ElementRef<'_>]) -> Option<String> {
    cells.get(1).map(|c| clean_text(*c))
}

fn standing_points(cells: &[ElementRef<'_>]) -> Option<String> {
    cells.get(9).map(|c| clean_text(*c))
}

pub fn parse_standings(doc: &Html) -> Result<Vec<StandingEntry>, ScrapeError> {
    let table = doc
        .select(&sel("table#tblStanding"))
        .next()
        .ok_or(ScrapeError::Structure("#tblStanding"))?;

    let mut standings = Vec::new();
    for row in table.select(&sel("tr.puan_row")) {
        let cols = cells(row);
        let parsed = (|| {
            Some(StandingEntry {
                team: standing_team(&cols)?,
                points_label: standing_points(&cols)?,
            })
        })();
        match parsed {
            Some(entry) => standings.push(entry),
            None => debug!("skipping malformed standing row ({} cells)", cols.len()),
        }
    }
    Ok(standings)
}

// ── Team statistics table (#tblTeamStats) ──────────────────────────────────
//
// Layout contract: data rows alternate classes alt1/alt2; team name in
// column 0, goals per match in column 2, shots per match in column 3,
// possession percentage in column 5, corners per match in column 10.

fn team_stat_name(cells: &[ElementRef<'_>]) -> Option<String> {
    cells.first().map(|c| clean_text(*c))
}

fn team_stat_goals(cells: &[ElementRef<'_>]) -> Option<String> {
    cells.get(2).map(|c| clean_text(*c))
}

fn team_stat_shots(cells: &[ElementRef<'_>]) -> Option<String> {
    cells.get(3).map(|c| clean_text(*c))
}

fn team_stat_possession(cells: &[ElementRef<'_>]) -> Option<String> {
    cells.get(5).map(|c| clean_text(*c))
}

fn team_stat_corners(cells: &[ElementRef<'_>]) -> Option<String> {
    cells.get(10).map(|c| clean_text(*c))
}

/// Decode the team statistics table into flat micro-format lines.
pub fn parse_team_stats(doc: &Html) -> Result<Vec<TeamLeagueStat>, ScrapeError> {
    let table = doc
        .select(&sel("table#tblTeamStats"))
        .next()
        .ok_or(ScrapeError::Structure("#tblTeamStats"))?;

    let mut stats = Vec::new();
    for row in table.select(&sel("tr.alt1, tr.alt2")) {
        let cols = cells(row);
        let parsed = (|| {
            let team = team_stat_name(&cols)?;
            let goals = team_stat_goals(&cols)?;
            let shots = team_stat_shots(&cols)?;
            let possession = format!("%{}", team_stat_possession(&cols)?);
            let corners = team_stat_corners(&cols)?;
            Some(TeamLeagueStat::encode(
                &team,
                &[
                    ("Gol/M", goals.as_str()),
                    ("Şut/M", shots.as_str()),
                    ("TSO", possession.as_str()),
                    ("Korner", corners.as_str()),
                ],
            ))
        })();
        match parsed {
            Some(line) => stats.push(line),
            None => debug!("skipping malformed team-stat row ({} cells)", cols.len()),
        }
    }
    Ok(stats)
}
