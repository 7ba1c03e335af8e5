use anyhow::Result;
use console::{style, Emoji};
use indicatif::{ProgressBar, ProgressStyle};
use std::time::Duration;

use super::build_engine;
use crate::config::Config;
use crate::search::{IndexOutcome, IndexStats, SearchEngine};

static INDEXING: Emoji<'_, '_> = Emoji("📚 ", "");
static SUCCESS: Emoji<'_, '_> = Emoji("✅ ", "");
static WARN: Emoji<'_, '_> = Emoji("⚠️  ", "");
static INFO: Emoji<'_, '_> = Emoji("ℹ️  ", "");

pub async fn run_index(config: &Config, force: bool) -> Result<()> {
    let mut engine = build_engine(config)?;
    index_with_progress(&mut engine, config, force).await?;
    print_stats(&engine.statistics());
    Ok(())
}

/// Run `index_all` behind a spinner and print what happened.
pub(crate) async fn index_with_progress(
    engine: &mut SearchEngine,
    config: &Config,
    force: bool,
) -> Result<()> {
    let pb = ProgressBar::new_spinner();
    pb.set_style(ProgressStyle::default_spinner().template("{spinner:.green} {msg}")?);
    pb.set_message(format!(
        "{}Indexing {}...",
        INDEXING,
        config.source.dir.display()
    ));
    pb.enable_steady_tick(Duration::from_millis(100));

    let outcome = engine.index_all(force).await;
    pb.finish_and_clear();

    match outcome? {
        IndexOutcome::Loaded { chunks } => {
            println!(
                "\n{}Loaded {} chunks from {}",
                SUCCESS,
                style(chunks).cyan(),
                style(engine.cache().path().display()).dim()
            );
        }
        IndexOutcome::Built(report) => {
            if report.chunks_created == 0 {
                println!(
                    "\n{}No text found under {}",
                    WARN,
                    style(config.source.dir.display()).yellow()
                );
            } else {
                println!("\n{}Indexing complete!\n", SUCCESS);
                println!(
                    "  Documents indexed: {}",
                    style(report.documents_indexed).green()
                );
                println!("  Chunks created:    {}", style(report.chunks_created).cyan());
            }

            if !report.skipped.is_empty() {
                println!("\n{}Skipped ({}):", WARN, report.skipped.len());
                for skipped in &report.skipped {
                    println!(
                        "  - {}: {}",
                        style(&skipped.document_id).yellow(),
                        style(&skipped.reason).dim()
                    );
                }
            }
        }
    }

    Ok(())
}

pub async fn run_stats(config: &Config, json: bool) -> Result<()> {
    let mut engine = build_engine(config)?;

    if !engine.load_cache() {
        if json {
            println!("{}", serde_json::to_string_pretty(&IndexStats::default())?);
        } else {
            println!(
                "{}No index found at {}",
                INFO,
                engine.cache().path().display()
            );
            println!("Run `shelfsearch index` to build it.");
        }
        return Ok(());
    }

    let stats = engine.statistics();
    if json {
        println!("{}", serde_json::to_string_pretty(&stats)?);
    } else {
        print_stats(&stats);
    }

    Ok(())
}

pub(crate) fn print_stats(stats: &IndexStats) {
    println!("\n{}Index Statistics:", INFO);
    println!(
        "  Documents:       {}",
        style(stats.total_source_documents).green()
    );
    println!("  Total chunks:    {}", style(stats.total_chunks).cyan());
    if let Some(dimensions) = stats.dimensions {
        println!("  Dimensions:      {}", dimensions);
    }
    println!(
        "  Cache size:      {} KB",
        style(stats.cache_size_bytes / 1024).yellow()
    );
    if let Some(indexed_at) = stats.indexed_at {
        println!(
            "  Indexed at:      {}",
            style(indexed_at.format("%Y-%m-%d %H:%M:%S")).dim()
        );
    }

    if !stats.chunks_per_document.is_empty() {
        println!();
        for count in &stats.chunks_per_document {
            println!(
                "  {:<30} {}",
                count.document_id,
                style(format!("{} chunks", count.chunks)).dim()
            );
        }
    }
}

pub async fn run_clear(config: &Config) -> Result<()> {
    let mut engine = build_engine(config)?;

    if !engine.cache().exists() {
        println!("{}No index found.", INFO);
        return Ok(());
    }

    engine.clear()?;
    println!("{}Index cleared.", SUCCESS);

    Ok(())
}
