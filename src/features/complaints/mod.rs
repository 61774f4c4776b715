//! Civic complaints feature.
//!
//! Citizens file complaints with text fields, an optional location, image
//! attachments and an audio note reference. Images are written to the local
//! upload directory and referenced by absolute URL.
//!
//! ## Endpoints
//!
//! | Method | Endpoint | Auth | Description |
//! |--------|----------|------|-------------|
//! | GET | `/complaints` | No | List every complaint |
//! | POST | `/complaints` | No | File a complaint (multipart, `images` parts) |
//! | GET | `/uploads/{name}` | No | Serve an uploaded image |

pub mod dtos;
pub mod handlers;
pub mod models;
pub mod repositories;
pub mod routes;
pub mod services;

pub use repositories::{ComplaintRepository, PgComplaintRepository};
pub use routes::{routes, upload_routes};
pub use services::ComplaintService;
