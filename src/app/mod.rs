//! Application wiring for an interactive session.
//!
//! - `controller`: the event loop joining engine, timer, alarm and screen

pub mod controller;

pub use controller::{Controller, Flow};
