//! Shared data model for the vanish chat engine.
//!
//! Everything a render surface needs to draw a timeline or raise an intent
//! lives here, so surfaces can depend on this crate without pulling in the
//! engine's runtime.

pub mod api;
pub mod events;
pub mod models;
