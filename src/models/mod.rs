use crate::error::{Result, ScrapeError};
use chrono::{Duration, NaiveDate};
use serde::{Deserialize, Serialize};

/// A team link from a match page, e.g. `/team/1184/fut-esports/`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TeamRef {
    pub href: String,
    pub id: String,
    pub name: String,
}

impl TeamRef {
    /// Parse `/team/{id}/{name}/...`. Absolute links are reduced to their path first.
    pub fn parse(href: &str) -> Result<Self> {
        let path = match href.find("://") {
            Some(scheme_end) => {
                let rest = &href[scheme_end + 3..];
                rest.find('/').map(|i| &rest[i..]).unwrap_or("")
            }
            None => href,
        };

        let parts: Vec<&str> = path.trim_matches('/').split('/').collect();
        match parts.as_slice() {
            ["team", id, name, ..] if !id.is_empty() && !name.is_empty() => Ok(Self {
                href: href.to_string(),
                id: id.to_string(),
                name: name.to_string(),
            }),
            _ => Err(ScrapeError::InvalidTeamPath(href.to_string())),
        }
    }
}

/// Inclusive date range a team's form is measured over
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateWindow {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl DateWindow {
    /// The `days` days leading up to (and including) `end`
    pub fn lookback(end: NaiveDate, days: i64) -> Self {
        Self {
            start: end - Duration::days(days),
            end,
        }
    }
}

/// Rolling averages from a team's stats page, all percentages in [0, 100]
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TeamStats {
    pub general_win: f64,
    pub atk_win: f64,
    pub def_win: f64,
}

impl TeamStats {
    /// Stand-in for a team with no recorded maps in the window
    pub const ZERO: TeamStats = TeamStats {
        general_win: 0.0,
        atk_win: 0.0,
        def_win: 0.0,
    };

    /// No attack or defense activity, i.e. the zero fallback
    pub fn has_no_side_data(&self) -> bool {
        self.atk_win == 0.0 && self.def_win == 0.0
    }
}

/// A row type with a fixed CSV column order
pub trait CsvRecord: Serialize {
    const HEADER: &'static [&'static str];
}

/// One scraped match, as written to `data_set_unfiltered.csv`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchRow {
    pub team_a_general_win: f64,
    pub team_a_atk_win: f64,
    pub team_a_def_win: f64,
    pub team_b_general_win: f64,
    pub team_b_atk_win: f64,
    pub team_b_def_win: f64,
    pub team_a_won: u8,
    pub date_match: NaiveDate,
    pub url_match: String,
}

impl CsvRecord for MatchRow {
    const HEADER: &'static [&'static str] = &[
        "team_a_general_win",
        "team_a_atk_win",
        "team_a_def_win",
        "team_b_general_win",
        "team_b_atk_win",
        "team_b_def_win",
        "team_a_won",
        "date_match",
        "url_match",
    ];
}

impl MatchRow {
    pub fn new(
        team_a: TeamStats,
        team_b: TeamStats,
        team_a_won: bool,
        date_match: NaiveDate,
        url_match: String,
    ) -> Self {
        Self {
            team_a_general_win: team_a.general_win,
            team_a_atk_win: team_a.atk_win,
            team_a_def_win: team_a.def_win,
            team_b_general_win: team_b.general_win,
            team_b_atk_win: team_b.atk_win,
            team_b_def_win: team_b.def_win,
            team_a_won: team_a_won as u8,
            date_match,
            url_match,
        }
    }

    pub fn team_a(&self) -> TeamStats {
        TeamStats {
            general_win: self.team_a_general_win,
            atk_win: self.team_a_atk_win,
            def_win: self.team_a_def_win,
        }
    }

    pub fn team_b(&self) -> TeamStats {
        TeamStats {
            general_win: self.team_b_general_win,
            atk_win: self.team_b_atk_win,
            def_win: self.team_b_def_win,
        }
    }
}

/// Cleaned training example: side win rates for both teams plus the label
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeatureRow {
    pub team_a_atk_win: f64,
    pub team_a_def_win: f64,
    pub team_b_atk_win: f64,
    pub team_b_def_win: f64,
    pub team_a_won: u8,
}

impl CsvRecord for FeatureRow {
    const HEADER: &'static [&'static str] = &[
        "team_a_atk_win",
        "team_a_def_win",
        "team_b_atk_win",
        "team_b_def_win",
        "team_a_won",
    ];
}

impl FeatureRow {
    pub fn features(&self) -> [f64; 4] {
        [
            self.team_a_atk_win,
            self.team_a_def_win,
            self.team_b_atk_win,
            self.team_b_def_win,
        ]
    }
}

impl From<&MatchRow> for FeatureRow {
    fn from(row: &MatchRow) -> Self {
        Self {
            team_a_atk_win: row.team_a_atk_win,
            team_a_def_win: row.team_a_def_win,
            team_b_atk_win: row.team_b_atk_win,
            team_b_def_win: row.team_b_def_win,
            team_a_won: row.team_a_won,
        }
    }
}

/// A match that could not be scraped under the skip policy
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MatchFailure {
    pub url: String,
    pub error: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_team_ref() {
        let team = TeamRef::parse("/team/1184/fut-esports/").unwrap();
        assert_eq!(team.id, "1184");
        assert_eq!(team.name, "fut-esports");

        let team = TeamRef::parse("https://www.vlr.gg/team/2593/fnatic").unwrap();
        assert_eq!(team.id, "2593");
        assert_eq!(team.name, "fnatic");
    }

    #[test]
    fn test_parse_team_ref_rejects_other_paths() {
        assert!(TeamRef::parse("/player/9/tenz/").is_err());
        assert!(TeamRef::parse("/team/1184/").is_err());
        assert!(TeamRef::parse("").is_err());
    }

    #[test]
    fn test_lookback_window() {
        let end = NaiveDate::from_ymd_opt(2024, 6, 18).unwrap();
        let window = DateWindow::lookback(end, 90);
        assert_eq!(window.start, NaiveDate::from_ymd_opt(2024, 3, 20).unwrap());
        assert_eq!(window.end, end);
    }
}
