//! Gameplay state.
//!
//! - `GameEngine` - active round: transport clock plus round state
//! - `RoundState` - the per-tick transition (scheduler, matcher, progress)

pub mod game;

pub use game::{GameEngine, GameplaySnapshot, RoundState, TickInput};
