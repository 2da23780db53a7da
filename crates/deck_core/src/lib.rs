pub mod controller;
pub mod fetcher;

pub use controller::{BrowsingController, BrowsingEvent, Direction, RenderState, SessionOutcome};
pub use fetcher::{
    DataFetcher, FetchConfig, FetchResult, FetcherSetupError, HttpProfileFetcher,
    UnavailableFetcher,
};
