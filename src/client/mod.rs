//! Client data layer for the complaints API.
//!
//! `api` talks HTTP, `state` holds the list state and its reducer, `form`
//! and `audio` back the authoring screen, and `view` renders text screens.

pub mod api;
pub mod audio;
pub mod error;
pub mod form;
pub mod state;
pub mod view;

pub use api::ComplaintsApiClient;
pub use audio::{AudioError, AudioRecorder, RecordingState};
pub use error::ClientError;
pub use form::{ComplaintForm, FormError, ImageAttachment, Submission};
pub use state::{Action, Filters, ListState, Page, SortKey, Task};
