//! Browsing session: fetch lifecycle, position over the fetched batch, and the
//! signals the presentation layer replays animations from.

use std::sync::Arc;

use shared::{
    domain::Profile,
    error::{FETCH_FAILED_MESSAGE, NO_DATA_MESSAGE},
};
use tokio::sync::broadcast;
use tracing::{debug, info, warn};

use crate::fetcher::{DataFetcher, FetchResult};

const EVENT_CHANNEL_CAPACITY: usize = 64;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Forward,
    Backward,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionOutcome {
    Ready,
    Empty,
    Failed,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BrowsingEvent {
    SessionReady {
        outcome: SessionOutcome,
        total: usize,
    },
    Transition {
        direction: Direction,
        position: usize,
        total: usize,
    },
}

/// What the presentation layer should draw, in priority order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RenderState<'a> {
    Loading,
    Error(&'a str),
    Content(&'a Profile),
}

impl RenderState<'_> {
    pub fn label(&self) -> &'static str {
        match self {
            Self::Loading => "loading",
            Self::Error(_) => "error",
            Self::Content(_) => "content",
        }
    }
}

#[derive(Debug)]
struct BrowsingState {
    result: FetchResult,
    position: usize,
}

pub struct BrowsingController {
    fetcher: Arc<dyn DataFetcher>,
    state: BrowsingState,
    initialized: bool,
    events: broadcast::Sender<BrowsingEvent>,
}

impl BrowsingController {
    pub fn new(fetcher: Arc<dyn DataFetcher>) -> Self {
        let (events, _) = broadcast::channel(EVENT_CHANNEL_CAPACITY);
        Self {
            fetcher,
            state: BrowsingState {
                result: FetchResult::Loading,
                position: 0,
            },
            initialized: false,
            events,
        }
    }

    pub fn subscribe_events(&self) -> broadcast::Receiver<BrowsingEvent> {
        self.events.subscribe()
    }

    /// Runs the session's only fetch. Later calls on the same session are
    /// ignored; start a new controller to fetch again.
    pub async fn initialize(&mut self) -> &FetchResult {
        if self.initialized {
            warn!("browsing session already initialized; ignoring repeated initialize");
            return &self.state.result;
        }
        self.initialized = true;
        self.state.result = FetchResult::Loading;
        self.state.position = 0;

        let fetched = self.fetcher.fetch().await;
        self.state.result = if fetched.is_terminal() {
            fetched
        } else {
            warn!("fetcher resolved without a terminal result");
            FetchResult::Failed(FETCH_FAILED_MESSAGE.to_string())
        };
        self.state.position = 0;

        let outcome = match &self.state.result {
            FetchResult::Ready(_) => SessionOutcome::Ready,
            FetchResult::Empty => SessionOutcome::Empty,
            FetchResult::Loading | FetchResult::Failed(_) => SessionOutcome::Failed,
        };
        let total = self.total();
        info!(?outcome, total, "browsing session ready");
        let _ = self
            .events
            .send(BrowsingEvent::SessionReady { outcome, total });

        &self.state.result
    }

    pub fn result(&self) -> &FetchResult {
        &self.state.result
    }

    /// Index of the displayed profile; only meaningful once the batch is ready.
    pub fn position(&self) -> usize {
        self.state.position
    }

    pub fn total(&self) -> usize {
        match &self.state.result {
            FetchResult::Ready(profiles) => profiles.len(),
            _ => 0,
        }
    }

    pub fn current_profile(&self) -> Option<&Profile> {
        match &self.state.result {
            FetchResult::Ready(profiles) => profiles.get(self.state.position),
            _ => None,
        }
    }

    pub fn can_go_next(&self) -> bool {
        match &self.state.result {
            FetchResult::Ready(profiles) => self.state.position + 1 < profiles.len(),
            _ => false,
        }
    }

    pub fn can_go_previous(&self) -> bool {
        matches!(self.state.result, FetchResult::Ready(_)) && self.state.position > 0
    }

    /// Advances one profile. Returns false, leaving the state untouched, when
    /// there is nothing to advance to.
    pub fn next(&mut self) -> bool {
        if !self.can_go_next() {
            return false;
        }
        self.state.position += 1;
        self.emit_transition(Direction::Forward);
        true
    }

    pub fn previous(&mut self) -> bool {
        if !self.can_go_previous() {
            return false;
        }
        self.state.position -= 1;
        self.emit_transition(Direction::Backward);
        true
    }

    pub fn render_state(&self) -> RenderState<'_> {
        match &self.state.result {
            FetchResult::Loading => RenderState::Loading,
            FetchResult::Failed(message) => RenderState::Error(message),
            FetchResult::Empty => RenderState::Error(NO_DATA_MESSAGE),
            FetchResult::Ready(profiles) => profiles
                .get(self.state.position)
                .map_or(RenderState::Error(NO_DATA_MESSAGE), RenderState::Content),
        }
    }

    fn emit_transition(&self, direction: Direction) {
        let position = self.state.position;
        let total = self.total();
        debug!(?direction, position, total, "profile transition");
        let _ = self.events.send(BrowsingEvent::Transition {
            direction,
            position,
            total,
        });
    }
}

#[cfg(test)]
#[path = "tests/controller_tests.rs"]
mod tests;
