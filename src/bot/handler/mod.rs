//! Event handler logic, one module per interaction surface.

pub mod game;
