//! Civic complaints service and client.
//!
//! The server half (`core`, `features`, `modules`) exposes complaint listing
//! and multipart submission over HTTP. The `client` half holds the data layer
//! used by front ends: the API client, list state with filters and sorting,
//! the authoring form and its audio recorder.

pub mod client;
pub mod core;
pub mod features;
pub mod modules;
pub mod shared;
