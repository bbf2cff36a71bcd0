use super::{selector, PageFetcher};
use crate::error::Result;
use scraper::Html;

/// Class prefix of the match cards on an event's matches page
const MATCH_ITEM_SELECTOR: &str = r#"a[class^="wf-module-item match-item"]"#;

/// Fetch a tournament page and return the match links on it, in page order
pub async fn extract_match_links<F>(fetcher: &F, tournament_url: &str) -> Result<Vec<String>>
where
    F: PageFetcher + ?Sized,
{
    let html = fetcher.fetch(tournament_url).await?;
    let links = parse_match_links(&html)?;

    tracing::debug!("Found {} match links on {}", links.len(), tournament_url);
    Ok(links)
}

fn parse_match_links(html: &str) -> Result<Vec<String>> {
    let document = Html::parse_document(html);
    let match_selector = selector(MATCH_ITEM_SELECTOR)?;

    Ok(document
        .select(&match_selector)
        .filter_map(|a| a.value().attr("href"))
        .map(str::to_string)
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    const EVENT_PAGE: &str = r#"
        <html><body>
          <div class="wf-card">
            <a href="/353410/fnatic-vs-heretics" class="wf-module-item match-item mod-color mod-bg-after-striped_purple">FNC vs TH</a>
            <a href="/353411/navi-vs-koi" class="wf-module-item match-item mod-color">NAVI vs KOI</a>
            <a href="/event/2004" class="wf-module-item mod-first">Not a match</a>
            <a class="wf-module-item match-item">No href</a>
            <a href="/353412/bbl-vs-fut" class="match-item wf-module-item">Wrong order</a>
          </div>
        </body></html>
    "#;

    #[test]
    fn test_parse_match_links() {
        let links = parse_match_links(EVENT_PAGE).unwrap();
        assert_eq!(
            links,
            vec!["/353410/fnatic-vs-heretics", "/353411/navi-vs-koi"]
        );
    }

    #[test]
    fn test_parse_match_links_empty_page() {
        let links = parse_match_links("<html><body></body></html>").unwrap();
        assert!(links.is_empty());
    }
}
