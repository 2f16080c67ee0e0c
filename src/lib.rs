//! Judgment engine for a four-lane arrow rhythm game.
//!
//! A round reads the transport position once per tick, admits and expires
//! notes, matches the directions pressed that tick, and updates score, streak
//! and health. A layered render cache turns each tick into a frame, redrawing
//! the score, health and illustration boxes only when they changed.

pub mod input;
pub mod logic;
pub mod models;
pub mod render;
pub mod state;
pub mod system;
