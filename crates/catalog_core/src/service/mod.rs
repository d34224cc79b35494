//! Catalog use-case services.
//!
//! # Responsibility
//! - Validate inbound payloads before they reach storage.
//! - Orchestrate repository calls into create/get/update/delete/list flows.
//! - Keep callers (HTTP handlers, CLI) decoupled from the chosen backend.

pub mod actor_service;
pub mod error;
pub mod movie_service;
