// SPDX-FileCopyrightText: 2026 Zenia Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! `zenia shell` command implementation.
//!
//! Interactive conversation with readline history. Each line is answered
//! from memory; slash commands teach, count and clear memories.

use colored::Colorize;
use rustyline::DefaultEditor;
use rustyline::error::ReadlineError;
use tracing::debug;

use zenia_config::ZeniaConfig;
use zenia_core::ZeniaError;
use zenia_memory::{MemoryContext, MemoryManager};

/// What the REPL should do after a line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ShellAction {
    /// Print this text and keep going.
    Reply(String),
    /// Print nothing and keep going.
    Nothing,
    /// Leave the loop.
    Quit,
}

/// Runs the `zenia shell` interactive REPL.
pub async fn run_shell(ctx: &MemoryContext, config: &ZeniaConfig) -> Result<(), ZeniaError> {
    let mut rl = DefaultEditor::new()
        .map_err(|e| ZeniaError::Internal(format!("failed to initialize readline: {e}")))?;

    println!("{}", config.agent.greeting.bold().green());
    if !ctx.provider.is_ready() {
        println!("{}", "(semantic search unavailable, matching by words)".dimmed());
    }
    println!(
        "Type {} to teach me, {} to exit.\n",
        "/learn <question> => <answer>".yellow(),
        "/quit".yellow()
    );

    let prompt = format!("{}> ", config.agent.name.green());
    loop {
        match rl.readline(&prompt) {
            Ok(line) => {
                if !line.trim().is_empty() {
                    let _ = rl.add_history_entry(&line);
                }
                match handle_line(&ctx.manager, config, &line).await {
                    ShellAction::Reply(text) => println!("{text}\n"),
                    ShellAction::Nothing => {}
                    ShellAction::Quit => break,
                }
            }
            Err(ReadlineError::Interrupted) | Err(ReadlineError::Eof) => break,
            Err(e) => {
                eprintln!("{}: {e}", "error".red());
                break;
            }
        }
    }

    Ok(())
}

/// Answer one line of input.
pub async fn handle_line(manager: &MemoryManager, config: &ZeniaConfig, line: &str) -> ShellAction {
    let trimmed = line.trim();
    if trimmed.is_empty() {
        return ShellAction::Nothing;
    }

    let Some(command) = trimmed.strip_prefix('/') else {
        debug!(query = trimmed, "answering");
        let reply = manager
            .retrieve_default(trimmed)
            .await
            .unwrap_or_else(|| config.agent.fallback_reply.clone());
        return ShellAction::Reply(reply);
    };

    let (name, rest) = command
        .split_once(char::is_whitespace)
        .map(|(name, rest)| (name, rest.trim()))
        .unwrap_or((command, ""));

    match name {
        "quit" | "exit" => ShellAction::Quit,
        "learn" => match rest.split_once("=>") {
            Some((question, answer)) if !question.trim().is_empty() && !answer.trim().is_empty() => {
                match manager.try_record(question.trim(), answer.trim()).await {
                    Ok(_) => ShellAction::Reply("Memorizado.".green().to_string()),
                    Err(e) => ShellAction::Reply(format!("{}: {e}", "error".red())),
                }
            }
            _ => ShellAction::Reply(format!("usage: {}", "/learn <question> => <answer>".yellow())),
        },
        "count" => match manager.count().await {
            Ok(n) => ShellAction::Reply(format!("{n} memories")),
            Err(e) => ShellAction::Reply(format!("{}: {e}", "error".red())),
        },
        "clear" => match manager.clear().await {
            Ok(()) => ShellAction::Reply("Memory cleared.".to_string()),
            Err(e) => ShellAction::Reply(format!("{}: {e}", "error".red())),
        },
        other => ShellAction::Reply(format!(
            "unknown command /{other}; try /learn, /count, /clear or /quit"
        )),
    }
}
