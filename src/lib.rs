//! resume-analyzer: terminal client for an ATS resume analysis service, with Hexagonal Architecture.

pub mod adapters;
pub mod domain;
pub mod ports;
pub mod shared;
pub mod usecases;
