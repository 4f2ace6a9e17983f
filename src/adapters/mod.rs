//! Infrastructure adapters. Implement ports.
//!
//! Analysis service (HTTP), filesystem, terminal UI. Map errors to DomainError.

pub mod http;
pub mod persistence;
pub mod ui;
