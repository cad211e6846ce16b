//! Emergency Dispatch Simulation Library
//!
//! A seeded emergency-response dispatch engine that can run headless or be
//! driven by an external front end.

pub mod simulation;
