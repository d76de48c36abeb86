//! Platform abstraction layer
//!
//! Turns raw browser input into game actions. The browser wiring itself
//! lives in the wasm entry point; everything here is plain data so it can be
//! tested natively.

pub mod input;

pub use input::{InputAction, action_for_key, action_for_touch};
