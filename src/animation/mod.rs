//! Animation module for the formation blend
//!
//! Holds the shared progress scalar that drives the morph between the
//! dispersed cloud and the assembled tree, plus the easing curves used to
//! shape it.

mod progress;
mod easing;

pub use progress::{FormationProgress, PROGRESS_RATE};
pub use easing::{chase_factor, ease_out_cubic, smoothstep};
