//! Command orchestration from viewer input to the browsing controller.

use std::sync::Arc;

use deck_core::{
    BrowsingController, DataFetcher, FetchConfig, HttpProfileFetcher, UnavailableFetcher,
};

use crate::controller::events::UiCommand;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommandOutcome {
    Navigated,
    Unchanged,
    ShowHelp,
    Reload,
    Quit,
}

/// A broken fetcher setup still yields a session; it just ends in the error state.
pub fn build_fetcher(config: &FetchConfig) -> Arc<dyn DataFetcher> {
    match HttpProfileFetcher::new(config) {
        Ok(fetcher) => {
            tracing::info!(url = %fetcher.request_url(), "profile fetcher ready");
            Arc::new(fetcher)
        }
        Err(err) => {
            tracing::error!(error = %err, "profile fetcher setup failed");
            Arc::new(UnavailableFetcher::new(err.to_string()))
        }
    }
}

pub fn dispatch_command(controller: &mut BrowsingController, command: UiCommand) -> CommandOutcome {
    let outcome = match command {
        UiCommand::Next => moved(controller.next()),
        UiCommand::Previous => moved(controller.previous()),
        UiCommand::Help => CommandOutcome::ShowHelp,
        UiCommand::Reload => CommandOutcome::Reload,
        UiCommand::Quit => CommandOutcome::Quit,
    };
    tracing::debug!(command = command.name(), ?outcome, "handled ui command");
    outcome
}

fn moved(navigated: bool) -> CommandOutcome {
    if navigated {
        CommandOutcome::Navigated
    } else {
        CommandOutcome::Unchanged
    }
}
