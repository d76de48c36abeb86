//! Canvas 2D rendering module
//!
//! Reads the simulation snapshot and cosmetic state; never mutates either.

pub mod canvas;

pub use canvas::CanvasRenderer;
