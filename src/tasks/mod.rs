//! Background Tasks Module
//!
//! Contains background tasks that run alongside a shared cache.
//!
//! # Tasks
//! - Expiry sweep: removes expired entries at a fixed interval

mod sweep;

pub use sweep::spawn_sweep_task;
