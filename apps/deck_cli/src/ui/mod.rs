//! Terminal presentation: text rendering of the render state and the
//! card entry cues replayed from controller events.

pub mod animation;
pub mod render;

pub use render::{render, ViewOptions};
