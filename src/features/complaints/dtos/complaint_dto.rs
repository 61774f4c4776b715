use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::core::error::AppError;
use crate::features::complaints::models::{ComplaintRecord, Department, Location, NewComplaint};
use crate::shared::constants::DEFAULT_STATUS;

/// Complaint as returned by the API
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct ComplaintDto {
    pub id: Uuid,
    pub title: String,
    pub description: String,
    pub location: Option<Location>,
    pub concerned_department: Department,
    /// Public URLs of the uploaded images, in upload order
    pub images: Vec<String>,
    pub audio_note: Option<String>,
    pub approved: bool,
    pub status: String,
    pub upvotes: i32,
    pub downvotes: i32,
    pub date_of_publishing: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl TryFrom<ComplaintRecord> for ComplaintDto {
    type Error = AppError;

    fn try_from(r: ComplaintRecord) -> Result<Self, Self::Error> {
        let concerned_department = r.concerned_department.parse::<Department>().map_err(|e| {
            AppError::Internal(format!("Complaint {} has invalid department: {}", r.id, e))
        })?;

        Ok(Self {
            id: r.id,
            title: r.title,
            description: r.description,
            location: r.location.map(|l| l.0),
            concerned_department,
            images: r.images,
            audio_note: r.audio_note,
            approved: r.approved,
            status: r.status,
            upvotes: r.upvotes,
            downvotes: r.downvotes,
            date_of_publishing: r.date_of_publishing,
            created_at: r.created_at,
        })
    }
}

/// Typed complaint submission, parsed from multipart text fields
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate, ToSchema)]
pub struct CreateComplaintDto {
    #[validate(length(min = 1, message = "title must not be empty"))]
    pub title: String,

    #[validate(length(min = 1, message = "description must not be empty"))]
    pub description: String,

    pub concerned_department: Department,

    #[validate(nested)]
    pub location: Option<Location>,

    pub audio_note: Option<String>,

    pub approved: Option<bool>,

    #[validate(length(min = 1, message = "status must not be empty"))]
    pub status: Option<String>,

    #[validate(range(min = 0, message = "upvotes must not be negative"))]
    pub upvotes: Option<i32>,

    #[validate(range(min = 0, message = "downvotes must not be negative"))]
    pub downvotes: Option<i32>,

    pub date_of_publishing: Option<String>,
}

impl CreateComplaintDto {
    /// Apply defaults and attach the resolved image URLs
    pub fn into_new_complaint(self, images: Vec<String>) -> NewComplaint {
        NewComplaint {
            title: self.title,
            description: self.description,
            location: self.location.map(Location::with_geohash),
            concerned_department: self.concerned_department,
            images,
            audio_note: self.audio_note.filter(|a| !a.trim().is_empty()),
            approved: self.approved.unwrap_or(false),
            status: self.status.unwrap_or_else(|| DEFAULT_STATUS.to_string()),
            upvotes: self.upvotes.unwrap_or(0),
            downvotes: self.downvotes.unwrap_or(0),
            date_of_publishing: self.date_of_publishing,
        }
    }

    /// Text fields in multipart order, as sent by the client.
    ///
    /// `location` is JSON-encoded; absent optional fields are skipped.
    pub fn to_form_fields(&self) -> Result<Vec<(&'static str, String)>, serde_json::Error> {
        let mut fields = vec![
            ("title", self.title.clone()),
            ("description", self.description.clone()),
        ];
        if let Some(location) = &self.location {
            fields.push(("location", serde_json::to_string(location)?));
        }
        fields.push((
            "concerned_department",
            self.concerned_department.to_string(),
        ));
        if let Some(audio_note) = &self.audio_note {
            fields.push(("audio_note", audio_note.clone()));
        }
        if let Some(approved) = self.approved {
            fields.push(("approved", approved.to_string()));
        }
        if let Some(status) = &self.status {
            fields.push(("status", status.clone()));
        }
        if let Some(upvotes) = self.upvotes {
            fields.push(("upvotes", upvotes.to_string()));
        }
        if let Some(downvotes) = self.downvotes {
            fields.push(("downvotes", downvotes.to_string()));
        }
        if let Some(date) = &self.date_of_publishing {
            fields.push(("date_of_publishing", date.clone()));
        }
        Ok(fields)
    }
}

/// Collects multipart text fields before they are turned into a [`CreateComplaintDto`]
#[derive(Debug, Default)]
pub struct ComplaintFormFields {
    title: Option<String>,
    description: Option<String>,
    concerned_department: Option<String>,
    location: Option<String>,
    audio_note: Option<String>,
    approved: Option<String>,
    status: Option<String>,
    upvotes: Option<String>,
    downvotes: Option<String>,
    date_of_publishing: Option<String>,
}

impl ComplaintFormFields {
    /// Record a text field. Returns `false` for names the complaint schema does not know.
    pub fn insert(&mut self, name: &str, value: String) -> bool {
        let slot = match name {
            "title" => &mut self.title,
            "description" => &mut self.description,
            "concerned_department" => &mut self.concerned_department,
            "location" => &mut self.location,
            "audio_note" => &mut self.audio_note,
            "approved" => &mut self.approved,
            "status" => &mut self.status,
            "upvotes" => &mut self.upvotes,
            "downvotes" => &mut self.downvotes,
            "date_of_publishing" => &mut self.date_of_publishing,
            _ => return false,
        };
        *slot = Some(value);
        true
    }

    /// Parse and validate the collected fields
    pub fn into_dto(self) -> Result<CreateComplaintDto, AppError> {
        let title = required(self.title, "title")?;
        let description = required(self.description, "description")?;
        let concerned_department = required(self.concerned_department, "concerned_department")?
            .parse::<Department>()
            .map_err(AppError::Validation)?;

        let location = optional(self.location)
            .map(|raw| {
                serde_json::from_str::<Location>(&raw)
                    .map_err(|e| AppError::Validation(format!("Invalid location: {}", e)))
            })
            .transpose()?;

        let approved = optional(self.approved)
            .map(|raw| {
                raw.parse::<bool>().map_err(|_| {
                    AppError::Validation(format!("approved must be true or false, got '{}'", raw))
                })
            })
            .transpose()?;

        let dto = CreateComplaintDto {
            title,
            description,
            concerned_department,
            location,
            audio_note: optional(self.audio_note),
            approved,
            status: optional(self.status),
            upvotes: parse_count(self.upvotes, "upvotes")?,
            downvotes: parse_count(self.downvotes, "downvotes")?,
            date_of_publishing: optional(self.date_of_publishing),
        };

        dto.validate()
            .map_err(|e| AppError::Validation(e.to_string()))?;

        Ok(dto)
    }
}

/// Trimmed value, with blank treated as absent
fn optional(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty() && v != "null" && v != "undefined")
}

fn required(value: Option<String>, name: &str) -> Result<String, AppError> {
    optional(value).ok_or_else(|| AppError::Validation(format!("{} is required", name)))
}

fn parse_count(value: Option<String>, name: &str) -> Result<Option<i32>, AppError> {
    optional(value)
        .map(|raw| {
            raw.parse::<i32>().map_err(|_| {
                AppError::Validation(format!("{} must be an integer, got '{}'", name, raw))
            })
        })
        .transpose()
}

/// A file part received under the `images` field
#[derive(Debug, Clone)]
pub struct UploadedFile {
    pub original_name: String,
    pub content_type: Option<String>,
    pub data: Vec<u8>,
}

/// Complaint submission form for OpenAPI documentation
/// Note: This struct is for Swagger UI documentation only.
/// The actual handler uses axum's Multipart extractor directly.
#[derive(Debug, ToSchema)]
#[allow(dead_code)]
pub struct CreateComplaintForm {
    #[schema(example = "Broken streetlight")]
    pub title: String,
    #[schema(example = "The streetlight at the corner has been out for a week")]
    pub description: String,
    /// One of Electrical, Water, Municipal, Garbage
    #[schema(example = "Electrical")]
    pub concerned_department: String,
    /// JSON-encoded location, e.g. {"latitude":12.97,"longitude":77.59,"geohash":"tdr1v9q7x"}
    pub location: Option<String>,
    pub audio_note: Option<String>,
    pub approved: Option<bool>,
    #[schema(example = "Pending")]
    pub status: Option<String>,
    pub upvotes: Option<i32>,
    pub downvotes: Option<i32>,
    #[schema(example = "2025-03-14T09:26:53.589Z")]
    pub date_of_publishing: Option<String>,
    /// Image file; repeat the `images` part to attach several
    #[schema(format = Binary, content_media_type = "application/octet-stream")]
    pub images: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn base_fields() -> ComplaintFormFields {
        let mut fields = ComplaintFormFields::default();
        fields.insert("title", "Overflowing bin".into());
        fields.insert("description", "Bin near the market overflows daily".into());
        fields.insert("concerned_department", "Garbage".into());
        fields
    }

    #[test]
    fn test_defaults_applied_when_absent() {
        let dto = base_fields().into_dto().unwrap();
        let complaint = dto.into_new_complaint(vec![]);

        assert_eq!(complaint.status, "Pending");
        assert!(!complaint.approved);
        assert_eq!(complaint.upvotes, 0);
        assert_eq!(complaint.downvotes, 0);
        assert_eq!(complaint.audio_note, None);
        assert_eq!(complaint.location, None);
    }

    #[test]
    fn test_missing_required_field_is_rejected() {
        for missing in ["title", "description", "concerned_department"] {
            let mut fields = base_fields();
            fields.insert(missing, "   ".into());
            let err = fields.into_dto().unwrap_err();
            assert!(
                err.to_string().contains(&format!("{} is required", missing)),
                "unexpected error: {}",
                err
            );
        }
    }

    #[test]
    fn test_unknown_department_is_rejected() {
        let mut fields = base_fields();
        fields.insert("concerned_department", "Fire".into());
        assert!(matches!(fields.into_dto(), Err(AppError::Validation(_))));
    }

    #[test]
    fn test_location_parsed_and_geohash_completed() {
        let mut fields = base_fields();
        fields.insert("location", r#"{"latitude":42.6,"longitude":-5.6}"#.into());
        let complaint = fields.into_dto().unwrap().into_new_complaint(vec![]);
        let location = complaint.location.unwrap();
        assert!(location.geohash.starts_with("ezs42"));
    }

    #[test]
    fn test_malformed_location_is_rejected() {
        let mut fields = base_fields();
        fields.insert("location", r#"{"lat": "north"}"#.into());
        assert!(matches!(fields.into_dto(), Err(AppError::Validation(_))));

        let mut fields = base_fields();
        fields.insert("location", r#"{"latitude":120.0,"longitude":0.0}"#.into());
        assert!(matches!(fields.into_dto(), Err(AppError::Validation(_))));
    }

    #[test]
    fn test_negative_votes_are_rejected() {
        let mut fields = base_fields();
        fields.insert("upvotes", "-1".into());
        assert!(matches!(fields.into_dto(), Err(AppError::Validation(_))));
    }

    #[test]
    fn test_long_text_is_accepted() {
        let mut fields = base_fields();
        fields.insert("title", "t".repeat(1_000));
        fields.insert("description", "d".repeat(20_000));
        fields.insert("status", "Awaiting inspection by the ward engineer".repeat(3));

        let dto = fields.into_dto().unwrap();
        assert_eq!(dto.title.len(), 1_000);
        assert_eq!(dto.description.len(), 20_000);
    }

    #[test]
    fn test_client_supplied_values_are_kept() {
        let mut fields = base_fields();
        fields.insert("status", "Resolved".into());
        fields.insert("upvotes", "4".into());
        fields.insert("audio_note", "blob:http://localhost/abc".into());
        fields.insert("date_of_publishing", "2025-03-14T09:26:53.589Z".into());
        assert!(!fields.insert("tasklist", "[]".into()));

        let complaint = fields.into_dto().unwrap().into_new_complaint(vec!["u".into()]);
        assert_eq!(complaint.status, "Resolved");
        assert_eq!(complaint.upvotes, 4);
        assert_eq!(complaint.audio_note.as_deref(), Some("blob:http://localhost/abc"));
        assert_eq!(complaint.images, vec!["u".to_string()]);
    }

    #[test]
    fn test_form_fields_round_into_dto() {
        let dto = CreateComplaintDto {
            title: "Leak".into(),
            description: "Water main leaking".into(),
            concerned_department: Department::Water,
            location: Some(Location::from_coordinates(12.97, 77.59)),
            audio_note: None,
            approved: None,
            status: Some("Pending".into()),
            upvotes: Some(0),
            downvotes: Some(0),
            date_of_publishing: Some("2025-03-14T09:26:53Z".into()),
        };

        let mut fields = ComplaintFormFields::default();
        for (name, value) in dto.to_form_fields().unwrap() {
            assert!(fields.insert(name, value));
        }
        assert_eq!(fields.into_dto().unwrap(), dto);
    }
}
