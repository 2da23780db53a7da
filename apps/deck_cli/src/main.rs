use std::{
    io::{self, IsTerminal},
    path::PathBuf,
};

mod config;
mod controller;
mod ui;

use anyhow::{Context, Result};
use clap::Parser;
use controller::{
    events::{UiCommand, HELP_TEXT},
    orchestration::{build_fetcher, dispatch_command, CommandOutcome},
};
use deck_core::BrowsingController;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing_subscriber::EnvFilter;
use ui::{animation, ViewOptions};

#[derive(Parser, Debug)]
#[command(about = "Page through a batch of random user profiles")]
struct Args {
    /// Settings file; defaults to ./profile_deck.toml when present.
    #[arg(long)]
    config: Option<PathBuf>,
    #[arg(long)]
    endpoint: Option<String>,
    #[arg(long)]
    batch_size: Option<u32>,
    #[arg(long)]
    reveal_passwords: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum SessionExit {
    Reload,
    Quit,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(io::stderr)
        .init();
    let args = Args::parse();

    let mut settings = config::load_settings(args.config.as_deref())?;
    settings.apply_overrides(args.endpoint, args.batch_size);
    let fetch_config = settings.fetch_config();
    let view = ViewOptions {
        reveal_passwords: args.reveal_passwords,
    };
    let animate = io::stdout().is_terminal();

    let mut input = BufReader::new(tokio::io::stdin()).lines();
    println!("{HELP_TEXT}");

    loop {
        let mut session = BrowsingController::new(build_fetcher(&fetch_config));
        let mut events = session.subscribe_events();
        println!("{}", ui::render(&session, &view));

        session.initialize().await;
        show(&session, &view, animation::latest_cue(&mut events), animate).await?;

        let exit = loop {
            let Some(line) = input.next_line().await.context("failed to read stdin")? else {
                break SessionExit::Quit;
            };
            let Some(command) = UiCommand::parse(&line) else {
                println!("unknown command '{}'; {HELP_TEXT}", line.trim());
                continue;
            };

            match dispatch_command(&mut session, command) {
                CommandOutcome::Navigated => {
                    let cue = animation::latest_cue(&mut events);
                    show(&session, &view, cue, animate).await?;
                }
                CommandOutcome::Unchanged => println!("(no more profiles that way)"),
                CommandOutcome::ShowHelp => println!("{HELP_TEXT}"),
                CommandOutcome::Reload => break SessionExit::Reload,
                CommandOutcome::Quit => break SessionExit::Quit,
            }
        };

        if exit == SessionExit::Quit {
            break;
        }
        tracing::info!("starting a fresh browsing session");
    }

    Ok(())
}

async fn show(
    session: &BrowsingController,
    view: &ViewOptions,
    cue: Option<animation::CardCue>,
    animate: bool,
) -> Result<()> {
    if let (Some(cue), true) = (cue, animate) {
        animation::play(&cue, &mut io::stdout())
            .await
            .context("failed to draw card animation")?;
    }
    println!("{}", ui::render(session, view));
    Ok(())
}
