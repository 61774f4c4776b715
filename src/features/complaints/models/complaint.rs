use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::types::Json;
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::features::complaints::models::Location;

/// Department a complaint is routed to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
pub enum Department {
    Electrical,
    Water,
    Municipal,
    Garbage,
}

impl Department {
    pub const ALL: [Department; 4] = [
        Department::Electrical,
        Department::Water,
        Department::Municipal,
        Department::Garbage,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Department::Electrical => "Electrical",
            Department::Water => "Water",
            Department::Municipal => "Municipal",
            Department::Garbage => "Garbage",
        }
    }
}

impl std::fmt::Display for Department {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Department {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Department::ALL
            .into_iter()
            .find(|d| d.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| {
                format!(
                    "Unknown department '{}'. Expected one of: Electrical, Water, Municipal, Garbage",
                    s
                )
            })
    }
}

/// Database model for complaint
#[derive(Debug, Clone, FromRow)]
pub struct ComplaintRecord {
    pub id: Uuid,
    pub title: String,
    pub description: String,
    pub location: Option<Json<Location>>,
    pub concerned_department: String,
    pub images: Vec<String>,
    pub audio_note: Option<String>,
    pub approved: bool,
    pub status: String,
    pub upvotes: i32,
    pub downvotes: i32,
    pub date_of_publishing: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Data for creating a new complaint
#[derive(Debug, Clone)]
pub struct NewComplaint {
    pub title: String,
    pub description: String,
    pub location: Option<Location>,
    pub concerned_department: Department,
    pub images: Vec<String>,
    pub audio_note: Option<String>,
    pub approved: bool,
    pub status: String,
    pub upvotes: i32,
    pub downvotes: i32,
    pub date_of_publishing: Option<String>,
}
