//! Modules layer - Infrastructure components for external integrations
//!
//! Contains adapters for infrastructure the features depend on, such as media storage.

pub mod storage;
