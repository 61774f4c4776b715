//! Plain-text screens for the complaints client.

use crate::client::form::ComplaintForm;
use crate::client::state::{publish_date, Task};
use crate::features::complaints::dtos::ComplaintDto;
use crate::shared::constants::STATUS_RESOLVED;

pub const EMPTY_LIST_MESSAGE: &str = "No complaints match your filters.";

fn location_line(complaint: &ComplaintDto) -> String {
    match &complaint.location {
        Some(l) => format!("Location: {:.5}, {:.5}", l.latitude, l.longitude),
        None => "Location: not provided".to_string(),
    }
}

fn published_line(complaint: &ComplaintDto) -> String {
    match (publish_date(complaint), complaint.date_of_publishing.as_deref()) {
        (Some(date), _) => format!("Published: {}", date.format("%Y-%m-%d %H:%M")),
        (None, Some(raw)) => format!("Published: {}", raw),
        (None, None) => "Published: unknown".to_string(),
    }
}

fn status_line(complaint: &ComplaintDto) -> String {
    let marker = if complaint.status == STATUS_RESOLVED {
        "[x]"
    } else {
        "[ ]"
    };
    let approval = if complaint.approved {
        "approved"
    } else {
        "awaiting approval"
    };
    format!("{} {} ({})", marker, complaint.status, approval)
}

/// Summary card used in the list
pub fn render_card(complaint: &ComplaintDto) -> String {
    [
        format!("{}  [{}]", complaint.title, complaint.id),
        format!("  {}", complaint.description),
        format!("  {}", location_line(complaint)),
        format!("  Department: {}", complaint.concerned_department),
        format!("  {}", status_line(complaint)),
        format!("  {}", published_line(complaint)),
        format!(
            "  Upvotes: {} | Downvotes: {}",
            complaint.upvotes, complaint.downvotes
        ),
    ]
    .join("\n")
}

pub fn render_list(complaints: &[&ComplaintDto]) -> String {
    if complaints.is_empty() {
        return EMPTY_LIST_MESSAGE.to_string();
    }
    complaints
        .iter()
        .map(|c| render_card(c))
        .collect::<Vec<_>>()
        .join("\n\n")
}

/// Full complaint with map link, media, audio note and the tasklist when one is assigned
pub fn render_detail(complaint: &ComplaintDto, tasklist: Option<&[Task]>) -> String {
    let mut lines = vec![render_card(complaint)];

    if let Some(location) = &complaint.location {
        lines.push(format!("  Map: {}", location.map_url()));
        if !location.geohash.is_empty() {
            lines.push(format!("  Geohash: {}", location.geohash));
        }
    }

    if complaint.images.is_empty() {
        lines.push("  Images: none".to_string());
    } else {
        lines.push(format!("  Images ({}):", complaint.images.len()));
        lines.extend(complaint.images.iter().map(|url| format!("    {}", url)));
    }

    match &complaint.audio_note {
        Some(note) => lines.push(format!("  Audio note: {}", note)),
        None => lines.push("  Audio note: none".to_string()),
    }

    if let Some(tasks) = tasklist {
        lines.push("  Tasklist:".to_string());
        lines.extend(tasks.iter().enumerate().map(|(i, task)| {
            let mark = if task.checked { "[x]" } else { "[ ]" };
            format!("    {}. {} {}", i + 1, mark, task.text)
        }));
    }

    lines.join("\n")
}

/// Draft shown on the register screen before submitting
pub fn render_form(form: &ComplaintForm) -> String {
    let department = form
        .department
        .map(|d| d.to_string())
        .unwrap_or_else(|| "(choose one)".to_string());
    let location = form
        .location
        .as_ref()
        .map(|l| format!("{:.5}, {:.5} ({})", l.latitude, l.longitude, l.geohash))
        .unwrap_or_else(|| "not captured".to_string());

    let mut lines = vec![
        "New complaint".to_string(),
        format!("  Title: {}", form.title),
        format!("  Description: {}", form.description),
        format!("  Department: {}", department),
        format!("  Location: {}", location),
        format!("  Images: {}", form.images.len()),
    ];
    if let Some(note) = &form.audio_note {
        lines.push(format!("  Audio note: {}", note));
    }
    lines.join("\n")
}
