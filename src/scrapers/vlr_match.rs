use super::vlr_team_stats::extract_team_stats;
use super::{element_text, selector, PageFetcher};
use crate::config::{ScoreComparison, ScrapeSettings};
use crate::error::{Result, ScrapeError};
use crate::models::{DateWindow, MatchRow, TeamRef};
use crate::utils::dates::parse_match_date;
use chrono::NaiveDate;
use scraper::Html;

const DATE_SELECTOR: &str = "div.moment-tz-convert";
const TEAM_SELECTOR: &str = r#"a[class^="match-header-link wf-link-hover mod-"]"#;
// Any class token starting with the prefix: winner, colon and loser spans
const SCORE_SELECTOR: &str =
    r#"span[class^="match-header-vs-score"], span[class*=" match-header-vs-score"]"#;

/// What the match page itself tells us, before team stats are fetched
#[derive(Debug, Clone, PartialEq)]
struct MatchPage {
    date: NaiveDate,
    team_a: TeamRef,
    team_b: TeamRef,
    score_a: String,
    score_b: String,
}

/// Scrape one match page into a dataset row. Each team's stats are taken over
/// the `lookback_days` leading up to the match.
pub async fn extract_info_match<F>(
    fetcher: &F,
    settings: &ScrapeSettings,
    match_url: &str,
) -> Result<MatchRow>
where
    F: PageFetcher + ?Sized,
{
    let html = fetcher.fetch(match_url).await?;
    let page = parse_match_page(&html, match_url)?;
    let won = team_a_won(&page.score_a, &page.score_b, settings.score_comparison)?;

    let window = DateWindow::lookback(page.date, settings.lookback_days);
    let (team_a_stats, team_b_stats) = tokio::try_join!(
        extract_team_stats(fetcher, &settings.base_url, &page.team_a, window),
        extract_team_stats(fetcher, &settings.base_url, &page.team_b, window),
    )?;

    Ok(MatchRow::new(
        team_a_stats,
        team_b_stats,
        won,
        page.date,
        match_url.to_string(),
    ))
}

fn parse_match_page(html: &str, url: &str) -> Result<MatchPage> {
    let document = Html::parse_document(html);

    let date_selector = selector(DATE_SELECTOR)?;
    let timestamp = document
        .select(&date_selector)
        .next()
        .ok_or_else(|| ScrapeError::MissingElement {
            what: "match timestamp",
            url: url.to_string(),
        })?
        .value()
        .attr("data-utc-ts")
        .ok_or(ScrapeError::MissingAttribute {
            attr: "data-utc-ts",
            what: "match timestamp",
        })?;
    let date = parse_match_date(timestamp)?;

    let team_selector = selector(TEAM_SELECTOR)?;
    let team_links: Vec<&str> = document
        .select(&team_selector)
        .filter_map(|a| a.value().attr("href"))
        .collect();
    let [team_a, team_b, ..] = team_links.as_slice() else {
        return Err(ScrapeError::TooFewElements {
            what: "team links",
            expected: 2,
            found: team_links.len(),
        });
    };

    let score_selector = selector(SCORE_SELECTOR)?;
    let scores: Vec<String> = document
        .select(&score_selector)
        .map(|el| element_text(&el))
        .collect();
    let [score_a, _, score_b, ..] = scores.as_slice() else {
        return Err(ScrapeError::TooFewElements {
            what: "score elements",
            expected: 3,
            found: scores.len(),
        });
    };

    Ok(MatchPage {
        date,
        team_a: TeamRef::parse(team_a)?,
        team_b: TeamRef::parse(team_b)?,
        score_a: score_a.clone(),
        score_b: score_b.clone(),
    })
}

/// Whether team A's score is strictly greater than team B's
pub fn team_a_won(score_a: &str, score_b: &str, comparison: ScoreComparison) -> Result<bool> {
    let lexicographic = score_a > score_b;
    let numeric = match (score_a.trim().parse::<i64>(), score_b.trim().parse::<i64>()) {
        (Ok(a), Ok(b)) => Some(a > b),
        _ => None,
    };

    if numeric.is_some_and(|n| n != lexicographic) {
        tracing::warn!(
            "Scores {:?} and {:?} order differently as text and as numbers",
            score_a,
            score_b
        );
    }

    match comparison {
        ScoreComparison::Lexicographic => Ok(lexicographic),
        ScoreComparison::Numeric => numeric.ok_or_else(|| {
            ScrapeError::InvalidScore(format!("{score_a}:{score_b}"))
        }),
    }
}
