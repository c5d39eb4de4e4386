//! Core types and identifiers for the separation simulator
//!
//! This module contains fundamental types, identifiers, and configuration structures
//! used throughout the simulation system.
//!
//! # Overview
//!
//! - **Identifiers**: string identifiers for packages, boxes and stations, plus run ids
//! - **Enums**: output/input formats, duration units, comparison direction
//! - **Configuration**: simulation configuration with validation and CLI support
//!
//! # Usage Example
//!
//! ```rust
//! use box_separation_simulator::types::*;
//!
//! let station = StationId::new("Packing");
//! let box_id = BoxId::new("42");
//!
//! let config = SimulationConfig {
//!     time_per_item: 10.0,
//!     workers_per_station: 2.0,
//!     ..Default::default()
//! };
//! assert!(config.validate().is_ok());
//! assert_eq!(config.worker_slots_for(&station), 2);
//! # let _ = box_id;
//! ```

pub mod config;
pub mod enums;
pub mod identifiers;

// Re-export all public types for convenience
pub use config::*;
pub use enums::*;
pub use identifiers::*;
