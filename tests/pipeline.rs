use async_trait::async_trait;
use std::collections::HashMap;
use std::path::Path;
use vlr_dataset::config::{ErrorPolicy, Partition, ScrapeSettings, SplitSettings, TrainSettings};
use vlr_dataset::error::{Result, ScrapeError};
use vlr_dataset::models::MatchRow;
use vlr_dataset::pipeline::{run_clean, run_scrape, run_train};
use vlr_dataset::scrapers::PageFetcher;
use vlr_dataset::utils::data::read_rows;

const BASE: &str = "https://www.vlr.gg";

/// A tiny fake of vlr.gg: event pages, match pages and team stats pages
#[derive(Default)]
struct FakeSite {
    pages: HashMap<String, String>,
}

impl FakeSite {
    fn page(&mut self, url: &str, html: String) {
        self.pages.insert(url.to_string(), html);
    }

    fn event(&mut self, id: u32, matches: &[&str]) -> String {
        let url = format!("{BASE}/event/matches/{id}");
        let cards: String = matches
            .iter()
            .map(|m| format!(r#"<a href="{m}" class="wf-module-item match-item mod-color">m</a>"#))
            .collect();
        self.page(&url, format!("<html><body>{cards}</body></html>"));
        url
    }

    fn game(&mut self, path: &str, date: &str, teams: (&str, &str), score: (u32, u32)) {
        self.page(
            &format!("{BASE}{path}"),
            format!(
                r#"<div class="moment-tz-convert" data-utc-ts="{date} 17:00:00"></div>
                   <a class="match-header-link wf-link-hover mod-1" href="/team/{}/">A</a>
                   <a class="match-header-link wf-link-hover mod-2" href="/team/{}/">B</a>
                   <span class="match-header-vs-score-winner">{}</span>
                   <span class="match-header-vs-score-colon">:</span>
                   <span class="match-header-vs-score-loser">{}</span>"#,
                teams.0, teams.1, score.0, score.1
            ),
        );
    }

    fn stats(&mut self, team: &str, start: &str, end: &str, cells: &[&str]) {
        let html: String = cells
            .iter()
            .map(|c| format!(r#"<div class="mod-first mod-highlight">{c}</div>"#))
            .collect();
        self.page(
            &format!("{BASE}/team/stats/{team}/?event_id=all&date_start={start}&date_end={end}"),
            html,
        );
    }
}

#[async_trait]
impl PageFetcher for FakeSite {
    async fn fetch(&self, url: &str) -> Result<String> {
        self.pages.get(url).cloned().ok_or_else(|| ScrapeError::Status {
            url: url.to_string(),
            status: 404,
        })
    }
}

fn partition(root: &Path, tournaments: &[String]) -> Partition {
    std::fs::create_dir(root.join("emea")).unwrap();
    std::fs::write(root.join("emea/tournaments.txt"), tournaments.join("\n")).unwrap();
    Partition::resolve(root, "emea").unwrap()
}

/// Two events with 3 and 2 matches, one match listed in both
fn site() -> (FakeSite, Vec<String>) {
    let mut site = FakeSite::default();
    let first = site.event(1, &["/101/fnc-vs-th", "/102/navi-vs-koi", "/103/bbl-vs-fut"]);
    let second = site.event(2, &["/104/fnc-vs-navi", "/101/fnc-vs-th"]);

    site.game("/101/fnc-vs-th", "2024-06-18", ("2593/fnatic", "1001/heretics"), (2, 1));
    site.game("/102/navi-vs-koi", "2024-06-18", ("4915/navi", "7035/koi"), (0, 2));
    site.game("/103/bbl-vs-fut", "2024-06-18", ("397/bbl", "1184/fut"), (1, 2));
    site.game("/104/fnc-vs-navi", "2024-06-18", ("2593/fnatic", "4915/navi"), (2, 0));

    let (start, end) = ("2024-03-20", "2024-06-18");
    site.stats("2593/fnatic", start, end, &["60%", "55%", "65%", "70%", "65%", "75%"]);
    site.stats("1001/heretics", start, end, &["50%", "45%", "55%"]);
    site.stats("4915/navi", start, end, &["40%", "35%", "45%"]);
    site.stats("7035/koi", start, end, &[]);
    site.stats("397/bbl", start, end, &["52%", "50%", "54%"]);
    site.stats("1184/fut", start, end, &["48%", "46%", "50%"]);

    (site, vec![first, second])
}

#[tokio::test]
async fn test_duplicate_links_are_kept() {
    let tmp = tempfile::tempdir().unwrap();
    let (site, tournaments) = site();
    let partition = partition(tmp.path(), &tournaments);

    // A stale link file from a previous run is replaced
    std::fs::write(partition.links_file(), "https://www.vlr.gg/999/old\n").unwrap();

    let report = run_scrape(&site, &ScrapeSettings::default(), &partition)
        .await
        .unwrap();

    let links = std::fs::read_to_string(partition.links_file()).unwrap();
    assert_eq!(links.lines().count(), 5);
    assert_eq!(links.lines().filter(|l| *l == "https://www.vlr.gg/101/fnc-vs-th").count(), 2);
    assert_eq!(report.links, 5);
    assert_eq!(report.rows.len(), 5);
    assert!(report.failures.is_empty());
}

#[tokio::test]
async fn test_rows_follow_link_order() {
    let tmp = tempfile::tempdir().unwrap();
    let (site, tournaments) = site();
    let partition = partition(tmp.path(), &tournaments);
    let settings = ScrapeSettings {
        concurrency: 3,
        ..ScrapeSettings::default()
    };

    run_scrape(&site, &settings, &partition).await.unwrap();

    let rows: Vec<MatchRow> = read_rows(&partition.unfiltered_csv()).unwrap();
    let urls: Vec<&str> = rows.iter().map(|r| r.url_match.as_str()).collect();
    assert_eq!(
        urls,
        vec![
            "https://www.vlr.gg/101/fnc-vs-th",
            "https://www.vlr.gg/102/navi-vs-koi",
            "https://www.vlr.gg/103/bbl-vs-fut",
            "https://www.vlr.gg/104/fnc-vs-navi",
            "https://www.vlr.gg/101/fnc-vs-th",
        ]
    );
    let labels: Vec<u8> = rows.iter().map(|r| r.team_a_won).collect();
    assert_eq!(labels, vec![1, 0, 0, 1, 1]);
    assert_eq!(rows[0].team_a_general_win, 65.0);
    assert_eq!(rows[0].team_a_atk_win, 60.0);
    assert_eq!(rows[0].team_a_def_win, 70.0);
    assert_eq!(rows[1].team_b_atk_win, 0.0);
}

#[tokio::test]
async fn test_abort_policy_stops_on_first_failure() {
    let tmp = tempfile::tempdir().unwrap();
    let (mut site, tournaments) = site();
    site.pages.remove("https://www.vlr.gg/103/bbl-vs-fut");
    let partition = partition(tmp.path(), &tournaments);

    let err = run_scrape(&site, &ScrapeSettings::default(), &partition)
        .await
        .unwrap_err();
    assert!(matches!(err, ScrapeError::MatchFailed { ref url, .. } if url.ends_with("/103/bbl-vs-fut")));
    assert!(!partition.unfiltered_csv().exists());
}

#[tokio::test]
async fn test_skip_policy_records_failures() {
    let tmp = tempfile::tempdir().unwrap();
    let (mut site, tournaments) = site();
    site.pages.remove("https://www.vlr.gg/103/bbl-vs-fut");
    let partition = partition(tmp.path(), &tournaments);
    let settings = ScrapeSettings {
        error_policy: ErrorPolicy::Skip,
        ..ScrapeSettings::default()
    };

    let report = run_scrape(&site, &settings, &partition).await.unwrap();
    assert_eq!(report.rows.len(), 4);
    assert_eq!(report.failures.len(), 1);

    let failures = std::fs::read_to_string(partition.failures_file()).unwrap();
    assert!(failures.contains("/103/bbl-vs-fut"));
}

#[tokio::test]
async fn test_scrape_clean_train() {
    let tmp = tempfile::tempdir().unwrap();
    let (site, tournaments) = site();
    let partition = partition(tmp.path(), &tournaments);

    run_scrape(&site, &ScrapeSettings::default(), &partition)
        .await
        .unwrap();

    // The koi match has no side data for team B and is dropped
    let report = run_clean(&partition, &SplitSettings::default()).unwrap();
    assert_eq!(report.unfiltered, 5);
    assert_eq!(report.filtered, 4);
    assert_eq!(report.training + report.evaluation, 4);
    assert_eq!(report.evaluation, 1);

    let trained = run_train(&partition, &TrainSettings::default()).unwrap();
    assert_eq!(trained.training.samples, 3);
    assert_eq!(trained.evaluation.samples, 1);
}
