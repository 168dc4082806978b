//! Common types and utilities for the tsr reflection compiler.
//!
//! This crate provides foundational types used across all tsr crates:
//! - Diagnostics (`Diagnostic`, `DiagnosticCategory`, message table)
//! - Reflection limits
//! - Identifier sanitizing shared by the package builder and the renderer

// Diagnostics reported by the reflection pass
pub mod diagnostics;
pub use diagnostics::{Diagnostic, DiagnosticCategory, DiagnosticMessage};

// Centralized limits
pub mod limits;

// Identifier helpers
pub mod ident;
pub use ident::safe_identifier;
