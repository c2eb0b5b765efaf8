//! Background Tasks Module
//!
//! Contains background tasks that run periodically during server operation.
//!
//! # Tasks
//! - Cache Monitor: Reports cache statistics at configured intervals
//!
//! Expired entries are never swept in the background; they are dropped
//! when read.

mod monitor;

pub use monitor::spawn_monitor_task;
