//! Background Tasks Module
//!
//! Contains background tasks that run periodically during server operation.
//!
//! # Tasks
//! - Expiry sweep: purges expired values from the in-memory backend

mod sweeper;

pub use sweeper::spawn_expiry_sweeper;
