use super::{element_text, selector, PageFetcher};
use crate::error::Result;
use crate::models::{DateWindow, TeamRef, TeamStats};
use crate::utils::dates::format_date;
use scraper::Html;

/// Highlighted first cell of each map row in the stats table: win %, atk win %, def win %
const HIGHLIGHT_SELECTOR: &str = r#"div[class="mod-first mod-highlight"]"#;

/// Build the stats page URL for a team link such as `/team/1184/fut-esports/`
pub fn compose_team_stats_url(
    base_url: &str,
    team_href: &str,
    date_start: &str,
    date_end: &str,
) -> Result<String> {
    let team = TeamRef::parse(team_href)?;
    Ok(stats_url(base_url, &team, date_start, date_end))
}

fn stats_url(base_url: &str, team: &TeamRef, date_start: &str, date_end: &str) -> String {
    format!(
        "{}/team/stats/{}/{}/?event_id=all&date_start={}&date_end={}",
        base_url.trim_end_matches('/'),
        team.id,
        team.name,
        date_start,
        date_end
    )
}

/// Fetch a team's stats page for `window` and average its three win-rate columns.
/// A team with no maps in the window gets `TeamStats::ZERO`.
pub async fn extract_team_stats<F>(
    fetcher: &F,
    base_url: &str,
    team: &TeamRef,
    window: DateWindow,
) -> Result<TeamStats>
where
    F: PageFetcher + ?Sized,
{
    let url = stats_url(
        base_url,
        team,
        &format_date(window.start),
        &format_date(window.end),
    );
    let html = fetcher.fetch(&url).await?;
    let values = parse_highlighted_values(&html)?;

    match column_means(&values) {
        Some(stats) => Ok(stats),
        None => {
            tracing::debug!("No stats for {} between {} and {}", team.name, window.start, window.end);
            Ok(TeamStats::ZERO)
        }
    }
}

/// Numeric cells of the stats table in document order, `%` signs removed
fn parse_highlighted_values(html: &str) -> Result<Vec<f64>> {
    let document = Html::parse_document(html);
    let cell_selector = selector(HIGHLIGHT_SELECTOR)?;

    Ok(document
        .select(&cell_selector)
        .filter_map(|el| parse_percentage(&element_text(&el)))
        .collect())
}

fn parse_percentage(text: &str) -> Option<f64> {
    let digits = text.strip_suffix('%').unwrap_or(text);
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    digits.parse().ok()
}

/// Average of each column when `values` is read as rows of three.
/// `None` if any column has no values.
fn column_means(values: &[f64]) -> Option<TeamStats> {
    let mean = |offset: usize| {
        let column: Vec<f64> = values.iter().skip(offset).step_by(3).copied().collect();
        if column.is_empty() {
            None
        } else {
            Some(column.iter().sum::<f64>() / column.len() as f64)
        }
    };

    Some(TeamStats {
        general_win: mean(0)?,
        atk_win: mean(1)?,
        def_win: mean(2)?,
    })
}
