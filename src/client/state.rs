use std::cmp::Ordering;
use std::collections::HashMap;

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use uuid::Uuid;

use crate::client::form::ComplaintForm;
use crate::features::complaints::dtos::ComplaintDto;
use crate::features::complaints::models::Department;

/// Ordering applied to the visible list
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SortKey {
    #[default]
    DateDesc,
    DateAsc,
    UpvotesDesc,
    Status,
}

impl SortKey {
    pub fn as_str(&self) -> &'static str {
        match self {
            SortKey::DateDesc => "date_desc",
            SortKey::DateAsc => "date_asc",
            SortKey::UpvotesDesc => "upvotes_desc",
            SortKey::Status => "status",
        }
    }
}

impl std::fmt::Display for SortKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for SortKey {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "date_desc" => Ok(SortKey::DateDesc),
            "date_asc" => Ok(SortKey::DateAsc),
            "upvotes_desc" => Ok(SortKey::UpvotesDesc),
            "status" => Ok(SortKey::Status),
            _ => Err(format!(
                "Unknown sort '{}'. Expected one of: date_desc, date_asc, upvotes_desc, status",
                s
            )),
        }
    }
}

/// One checkable item of a complaint's tasklist
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Task {
    pub text: String,
    pub checked: bool,
}

impl Task {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            checked: false,
        }
    }
}

/// Active list filters; `None` means no constraint
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Filters {
    pub approved: Option<bool>,
    pub status: Option<String>,
    pub tasklist_assigned: Option<bool>,
    pub department: Option<Department>,
}

impl Filters {
    /// `tasklist_assigned` is client-local, so the caller supplies it
    pub fn matches(&self, complaint: &ComplaintDto, tasklist_assigned: bool) -> bool {
        self.approved.map_or(true, |a| complaint.approved == a)
            && self
                .tasklist_assigned
                .map_or(true, |t| tasklist_assigned == t)
            && self
                .status
                .as_deref()
                .map_or(true, |s| complaint.status == s)
            && self
                .department
                .map_or(true, |d| complaint.concerned_department == d)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum Page {
    #[default]
    Home,
    Register,
    Detail(Uuid),
}

/// Everything that can happen to the list screen
#[derive(Debug, Clone)]
pub enum Action {
    /// Complaints fetched from the server replace the local list
    Loaded(Vec<ComplaintDto>),
    /// A complaint accepted by the server; resets the form and returns home
    Submitted(ComplaintDto),
    /// Selecting the active value again clears the filter
    ToggleApproved(bool),
    ToggleStatus(String),
    ToggleTasklistAssigned(bool),
    SetDepartment(Option<Department>),
    SetSort(SortKey),
    UpdateForm(ComplaintForm),
    OpenRegister,
    OpenDetail(Uuid),
    Back,
    /// Local only; never sent to the server
    Upvote(Uuid),
    Downvote(Uuid),
    /// Attach a local tasklist to a complaint, replacing any earlier one
    AssignTasklist(Uuid, Vec<String>),
    /// Flip one task's check mark; local only
    ToggleTask(Uuid, usize),
}

/// Immutable list state; every change goes through [`ListState::reduce`]
#[derive(Debug, Clone, Default)]
pub struct ListState {
    complaints: Vec<ComplaintDto>,
    filters: Filters,
    sort: SortKey,
    page: Page,
    form: ComplaintForm,
    /// Keyed by complaint id; a key present means a tasklist is assigned
    tasklists: HashMap<Uuid, Vec<Task>>,
}

impl ListState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn complaints(&self) -> &[ComplaintDto] {
        &self.complaints
    }

    pub fn filters(&self) -> &Filters {
        &self.filters
    }

    pub fn sort(&self) -> SortKey {
        self.sort
    }

    pub fn page(&self) -> &Page {
        &self.page
    }

    pub fn form(&self) -> &ComplaintForm {
        &self.form
    }

    /// Tasks of a complaint, `None` when no tasklist is assigned
    pub fn tasklist(&self, id: Uuid) -> Option<&[Task]> {
        self.tasklists.get(&id).map(Vec::as_slice)
    }

    pub fn tasklist_assigned(&self, id: Uuid) -> bool {
        self.tasklists.contains_key(&id)
    }

    /// Complaint shown on the detail page, if any
    pub fn selected(&self) -> Option<&ComplaintDto> {
        match &self.page {
            Page::Detail(id) => self.complaints.iter().find(|c| c.id == *id),
            _ => None,
        }
    }

    pub fn reduce(self, action: Action) -> Self {
        match action {
            Action::Loaded(complaints) => {
                let mut tasklists = self.tasklists;
                tasklists.retain(|id, _| complaints.iter().any(|c| c.id == *id));
                Self {
                    complaints,
                    tasklists,
                    ..self
                }
            }
            Action::Submitted(complaint) => {
                let mut complaints = self.complaints;
                complaints.push(complaint);
                Self {
                    complaints,
                    form: ComplaintForm::default(),
                    page: Page::Home,
                    ..self
                }
            }
            Action::ToggleApproved(value) => {
                let approved = if self.filters.approved == Some(value) {
                    None
                } else {
                    Some(value)
                };
                Self {
                    filters: Filters {
                        approved,
                        ..self.filters
                    },
                    ..self
                }
            }
            Action::ToggleStatus(value) => {
                let status = if self.filters.status.as_deref() == Some(value.as_str()) {
                    None
                } else {
                    Some(value)
                };
                Self {
                    filters: Filters {
                        status,
                        ..self.filters
                    },
                    ..self
                }
            }
            Action::ToggleTasklistAssigned(value) => {
                let tasklist_assigned = if self.filters.tasklist_assigned == Some(value) {
                    None
                } else {
                    Some(value)
                };
                Self {
                    filters: Filters {
                        tasklist_assigned,
                        ..self.filters
                    },
                    ..self
                }
            }
            Action::SetDepartment(department) => Self {
                filters: Filters {
                    department,
                    ..self.filters
                },
                ..self
            },
            Action::SetSort(sort) => Self { sort, ..self },
            Action::UpdateForm(form) => Self { form, ..self },
            Action::OpenRegister => Self {
                page: Page::Register,
                ..self
            },
            Action::OpenDetail(id) => Self {
                page: Page::Detail(id),
                ..self
            },
            Action::Back => Self {
                page: Page::Home,
                ..self
            },
            Action::Upvote(id) => self.vote(id, |c| c.upvotes = c.upvotes.saturating_add(1)),
            Action::Downvote(id) => {
                self.vote(id, |c| c.downvotes = c.downvotes.saturating_add(1))
            }
            Action::AssignTasklist(id, tasks) => {
                if !self.complaints.iter().any(|c| c.id == id) {
                    tracing::debug!("Tasklist for unknown complaint {}", id);
                    return self;
                }
                let mut tasklists = self.tasklists;
                tasklists.insert(id, tasks.into_iter().map(Task::new).collect());
                Self { tasklists, ..self }
            }
            Action::ToggleTask(id, index) => {
                let mut tasklists = self.tasklists;
                match tasklists.get_mut(&id).and_then(|tasks| tasks.get_mut(index)) {
                    Some(task) => task.checked = !task.checked,
                    None => tracing::debug!("No task {} on complaint {}", index, id),
                }
                Self { tasklists, ..self }
            }
        }
    }

    fn vote(self, id: Uuid, apply: impl Fn(&mut ComplaintDto)) -> Self {
        let mut complaints = self.complaints;
        match complaints.iter_mut().find(|c| c.id == id) {
            Some(complaint) => apply(complaint),
            None => tracing::debug!("Vote for unknown complaint {}", id),
        }
        Self { complaints, ..self }
    }

    /// Filtered then sorted view of the list
    pub fn visible(&self) -> Vec<&ComplaintDto> {
        let mut visible: Vec<&ComplaintDto> = self
            .complaints
            .iter()
            .filter(|c| self.filters.matches(c, self.tasklist_assigned(c.id)))
            .collect();

        match self.sort {
            SortKey::DateDesc => visible.sort_by(|a, b| compare_dates(a, b, true)),
            SortKey::DateAsc => visible.sort_by(|a, b| compare_dates(a, b, false)),
            SortKey::UpvotesDesc => visible.sort_by(|a, b| b.upvotes.cmp(&a.upvotes)),
            SortKey::Status => visible.sort_by(|a, b| a.status.cmp(&b.status)),
        }

        visible
    }
}

/// Publish date of a complaint, if it parses as RFC 3339, ISO 8601 without
/// an offset (taken as UTC) or `YYYY-MM-DD`
pub fn publish_date(complaint: &ComplaintDto) -> Option<DateTime<Utc>> {
    let raw = complaint.date_of_publishing.as_deref()?.trim();
    if let Ok(date) = DateTime::parse_from_rfc3339(raw) {
        return Some(date.with_timezone(&Utc));
    }
    if let Ok(date) = NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f") {
        return Some(date.and_utc());
    }
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|d| d.and_utc())
}

/// Missing or unparseable dates sort last in either direction
fn compare_dates(a: &ComplaintDto, b: &ComplaintDto, descending: bool) -> Ordering {
    match (publish_date(a), publish_date(b)) {
        (Some(a), Some(b)) if descending => b.cmp(&a),
        (Some(a), Some(b)) => a.cmp(&b),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}
