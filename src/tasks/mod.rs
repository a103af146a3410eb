//! Background Tasks Module
//!
//! Long-running maintenance tasks spawned alongside the server.

pub mod sweeper;

pub use sweeper::spawn_sweeper;
