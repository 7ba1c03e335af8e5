use anyhow::Result;
use console::{style, Emoji};

use super::build_engine;
use super::tui::print_warning;
use crate::config::Config;
use crate::search::{SearchResponse, SearchResult, SearchStatus};

static SEARCH: Emoji<'_, '_> = Emoji("🔍 ", "");
static BOOK: Emoji<'_, '_> = Emoji("📖 ", "");

const PREVIEW_CHARS: usize = 300;

pub async fn run_search(
    config: &Config,
    query: &str,
    top_k: Option<usize>,
    document: Option<&str>,
    json: bool,
) -> Result<()> {
    let mut engine = build_engine(config)?;

    if !engine.load_cache() {
        let path = engine.cache().path().display();
        if engine.cache().exists() {
            anyhow::bail!(
                "Index at {} is out of date or unreadable (settings may have changed). \
                 Run `shelfsearch index` to rebuild it.",
                path
            );
        }
        anyhow::bail!("No index found at {}. Run `shelfsearch index` first.", path);
    }

    let top_k = top_k.unwrap_or(config.search.top_k);
    let response = match document {
        Some(id) => engine.search_within(query, id, top_k).await?,
        None => engine.search(query, top_k).await?,
    };

    if json {
        let output = serde_json::json!({
            "query": query,
            "status": response.status.to_string(),
            "results": response.results,
        });
        println!("{}", serde_json::to_string_pretty(&output)?);
    } else {
        print_response(query, &response);
    }

    Ok(())
}

pub(crate) fn print_response(query: &str, response: &SearchResponse) {
    if response.status != SearchStatus::Ok {
        print_warning(&response.status.to_string());
        return;
    }
    if response.is_empty() {
        println!("No results found for: {}", style(query).italic());
        return;
    }

    println!(
        "\n{}Found {} results for: {}\n",
        SEARCH,
        style(response.results.len()).cyan(),
        style(query).yellow().bold()
    );
    print_results(&response.results);
}

pub(crate) fn print_results(results: &[SearchResult]) {
    for (i, result) in results.iter().enumerate() {
        let page = result
            .page_number
            .map(|p| format!("(page {})", p))
            .unwrap_or_else(|| "(page unknown)".to_string());

        println!(
            "{}{}. {} {}",
            BOOK,
            style(i + 1).dim(),
            style(&result.document_id).green(),
            style(page).dim()
        );
        println!(
            "   Similarity: {}",
            style(format!("{:.1}%", result.similarity * 100.0)).cyan()
        );
        println!("   {}", style(preview(&result.text)).dim());
        println!();
    }
}

fn preview(text: &str) -> String {
    let mut chars = text.chars();
    let head: String = chars.by_ref().take(PREVIEW_CHARS).collect();
    if chars.next().is_some() {
        format!("{}...", head)
    } else {
        head
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_preview_short_text_unchanged() {
        assert_eq!(preview("a short chunk"), "a short chunk");
    }

    #[test]
    fn test_preview_truncates_on_char_boundary() {
        let text = "é".repeat(PREVIEW_CHARS + 10);
        let p = preview(&text);
        assert!(p.ends_with("..."));
        assert_eq!(p.chars().count(), PREVIEW_CHARS + 3);
    }
}
