//! Controller layer: viewer commands and their orchestration onto the browsing session.

pub mod events;
pub mod orchestration;
