//! Stateful animations stepped once per frame.

pub mod sparks;
pub mod starfield;
