// SPDX-FileCopyrightText: 2026 Zenia Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! One-shot subcommands: ask, remember, import, clear, count, repair.

use colored::Colorize;

use zenia_config::ZeniaConfig;
use zenia_config::model::DatasetKind;
use zenia_core::ZeniaError;
use zenia_memory::{ImportSummary, MemoryContext};

/// Print the remembered answer, or the fallback reply.
pub async fn ask(ctx: &MemoryContext, config: &ZeniaConfig, query: &str, top_k: Option<usize>) {
    let answer = match top_k {
        Some(k) => ctx.manager.retrieve(query, k).await,
        None => ctx.manager.retrieve_default(query).await,
    };
    println!("{}", answer.unwrap_or_else(|| config.agent.fallback_reply.clone()));
}

pub async fn remember(ctx: &MemoryContext, question: &str, answer: &str) -> Result<(), ZeniaError> {
    let record = ctx.manager.try_record(question, answer).await?;
    let mode = if record.embedding.is_some() { "semantic" } else { "lexical only" };
    println!("{} {} ({mode})", "remembered".green(), record.id);
    Ok(())
}

pub async fn import(
    ctx: &MemoryContext,
    kind: DatasetKind,
    location: &str,
) -> Result<(), ZeniaError> {
    let summary = ctx.importer().import(kind, location).await;
    print_summary(&summary);
    Ok(())
}

/// Import every `[[datasets.sources]]` entry.
pub async fn import_configured(ctx: &MemoryContext, config: &ZeniaConfig) -> Result<(), ZeniaError> {
    if config.datasets.sources.is_empty() {
        println!("{}", "no dataset sources configured".yellow());
        return Ok(());
    }
    for summary in ctx.importer().import_all(&config.datasets.sources).await {
        print_summary(&summary);
    }
    Ok(())
}

fn print_summary(summary: &ImportSummary) {
    let line = format!("{}: {} pairs", summary.dataset.as_str(), summary.pairs);
    if summary.pairs == 0 {
        println!("{}", line.yellow());
    } else {
        println!("{line}");
    }
}

/// Delete every memory. The caller has already checked `--yes`.
pub async fn clear(ctx: &MemoryContext) -> Result<(), ZeniaError> {
    let before = ctx.manager.count().await?;
    ctx.manager.clear().await?;
    println!("cleared {before} memories");
    Ok(())
}

pub async fn count(ctx: &MemoryContext) -> Result<(), ZeniaError> {
    println!("{}", ctx.manager.count().await?);
    Ok(())
}

/// Report the startup embedding repair.
pub async fn repair(ctx: &MemoryContext) {
    if !ctx.provider.is_ready() {
        println!("{}", "embedding provider unavailable, nothing repaired".yellow());
        return;
    }
    let summary = ctx.repair;
    println!(
        "scanned {} records: {} repaired, {} failed",
        summary.scanned, summary.repaired, summary.failed
    );
}
