//! Core use-case services.
//!
//! # Responsibility
//! - Orchestrate model rules and repository calls into calendar operations.
//! - Keep CLI callers decoupled from storage details.

pub mod calendar_service;
pub mod reconcile;
pub mod reminder;
