use anyhow::Result;
use inquire::{CustomType, InquireError, Select, Text};
use std::fmt;

use super::index::{index_with_progress, print_stats};
use super::search::print_response;
use super::build_engine;
use super::tui::{print_banner, print_error, print_success, print_warning, shelfsearch_theme};
use crate::config::Config;
use crate::search::SearchEngine;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum MenuItem {
    SearchAll,
    SearchDocument,
    Reindex,
    Statistics,
    Exit,
}

impl MenuItem {
    const ALL: [MenuItem; 5] = [
        MenuItem::SearchAll,
        MenuItem::SearchDocument,
        MenuItem::Reindex,
        MenuItem::Statistics,
        MenuItem::Exit,
    ];
}

impl fmt::Display for MenuItem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            MenuItem::SearchAll => "Search all documents",
            MenuItem::SearchDocument => "Search within a document",
            MenuItem::Reindex => "Re-index documents",
            MenuItem::Statistics => "Show statistics",
            MenuItem::Exit => "Exit",
        };
        f.write_str(label)
    }
}

/// Cancelled prompts (Esc, Ctrl-C) become `None`.
fn answered<T>(result: std::result::Result<T, InquireError>) -> Result<Option<T>> {
    match result {
        Ok(value) => Ok(Some(value)),
        Err(InquireError::OperationCanceled | InquireError::OperationInterrupted) => Ok(None),
        Err(e) => Err(e.into()),
    }
}

pub async fn run_interactive(config: &Config) -> Result<()> {
    inquire::set_global_render_config(shelfsearch_theme());
    print_banner(&config.source.dir, &config.embedder.model);

    let mut engine = build_engine(config)?;
    if let Err(e) = index_with_progress(&mut engine, config, false).await {
        print_error(&format!("Indexing failed: {:#}", e));
    }

    loop {
        println!();
        let menu = Select::new("What would you like to do?", MenuItem::ALL.to_vec());
        let choice = answered(menu.prompt())?;

        match choice {
            None | Some(MenuItem::Exit) => break,
            Some(MenuItem::SearchAll) => {
                if let Err(e) = search(&engine, config, None).await {
                    print_error(&format!("{:#}", e));
                }
            }
            Some(MenuItem::SearchDocument) => {
                let documents = engine.documents();
                if documents.is_empty() {
                    print_warning("No documents are indexed yet.");
                    continue;
                }
                let picker = Select::new("Document:", documents);
                let Some(document) = answered(picker.prompt())? else {
                    continue;
                };
                if let Err(e) = search(&engine, config, Some(&document)).await {
                    print_error(&format!("{:#}", e));
                }
            }
            Some(MenuItem::Reindex) => {
                if let Err(e) = index_with_progress(&mut engine, config, true).await {
                    print_error(&format!("Indexing failed: {:#}", e));
                }
            }
            Some(MenuItem::Statistics) => print_stats(&engine.statistics()),
        }
    }

    print_success("Goodbye!");
    Ok(())
}

async fn search(engine: &SearchEngine, config: &Config, document: Option<&str>) -> Result<()> {
    let Some(query) = answered(Text::new("Query:").prompt())? else {
        return Ok(());
    };
    let query = query.trim();
    if query.is_empty() {
        return Ok(());
    }

    let Some(top_k) = answered(
        CustomType::<usize>::new("Number of results:")
            .with_default(config.search.top_k)
            .with_error_message("Please enter a whole number")
            .prompt(),
    )?
    else {
        return Ok(());
    };

    let response = match document {
        Some(id) => engine.search_within(query, id, top_k).await?,
        None => engine.search(query, top_k).await?,
    };
    print_response(query, &response);

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_menu_ends_with_exit() {
        assert_eq!(MenuItem::ALL.last(), Some(&MenuItem::Exit));
        assert_eq!(MenuItem::SearchAll.to_string(), "Search all documents");
    }

    #[test]
    fn test_cancelled_prompt_is_none() {
        let cancelled: std::result::Result<String, InquireError> =
            Err(InquireError::OperationCanceled);
        assert!(answered(cancelled).unwrap().is_none());

        let ok: std::result::Result<String, InquireError> = Ok("q".to_string());
        assert_eq!(answered(ok).unwrap().as_deref(), Some("q"));
    }
}
