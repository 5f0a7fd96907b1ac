//! Signato - signature digitization CLI
//!
//! This crate acquires a photo of a handwritten signature (from a file, a
//! file drop or a camera frame), sends it to a digitization service and
//! keeps the returned transparent ink image ready for export.
//!
//! # Architecture
//!
//! The crate follows hexagonal (ports & adapters) architecture:
//!
//! - **Domain**: Core business logic, value objects, session state machines, and errors
//! - **Application**: Use cases and port interfaces (traits)
//! - **Infrastructure**: Adapter implementations (HTTP digitizer, V4L2 camera, temp-dir display, XDG config)
//! - **CLI**: Command-line interface, argument parsing, logging and signal handling

pub mod application;
pub mod cli;
pub mod domain;
pub mod infrastructure;
