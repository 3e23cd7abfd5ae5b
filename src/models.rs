//! Frontend Models
//!
//! Data structures matching the checklist API payloads.

use serde::{Deserialize, Serialize};

pub type ChoreId = u32;

/// Chore data structure (matches backend)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Chore {
    pub id: ChoreId,
    pub section: String,
    #[serde(default)]
    pub section_id: u32,
    pub description: String,
    #[serde(default)]
    pub order: i32,
    #[serde(default)]
    pub completed: bool,
    #[serde(default)]
    pub completed_by: Option<String>,
    /// ISO-8601 timestamp as sent by the server
    #[serde(default)]
    pub completed_at: Option<String>,
    #[serde(default)]
    pub comment: Option<String>,
}

impl Chore {
    /// "HH:MM" part of `completed_at`, if it looks like an ISO timestamp
    pub fn completed_time(&self) -> Option<&str> {
        let stamp = self.completed_at.as_deref()?;
        let (_, time) = stamp.split_once('T')?;
        time.get(..5)
    }
}

/// Checklist entry from `GET /api/checklists`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Checklist {
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
}

impl Checklist {
    /// Text shown in the dropdown
    pub fn label(&self) -> &str {
        match self.description.as_deref() {
            Some(d) if !d.trim().is_empty() => d,
            _ => &self.name,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct SubmitResponse {
    #[serde(default)]
    pub pdf_url: Option<String>,
}

// ========================
// Request Bodies
// ========================

/// Body for both chore toggles and section completion
#[derive(Debug, Serialize)]
pub struct CompletionArgs<'a> {
    pub staff_name: &'a str,
    pub completed: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub comment: Option<&'a str>,
}

#[derive(Debug, Serialize)]
pub struct SubmitArgs<'a> {
    pub checklist_id: &'a str,
    pub staff_name: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub signature_data: Option<&'a str>,
}

#[derive(Debug, Serialize)]
pub struct ResetArgs<'a> {
    pub staff_name: &'a str,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_chore_decodes_with_nulls() {
        let json = r#"{
            "id": 7, "section": "Bar", "section_id": 2, "description": "Wipe taps",
            "order": 3, "completed": true, "completed_by": "Josh",
            "completed_at": "2024-05-01T17:42:10.120Z", "comment": null
        }"#;
        let chore: Chore = serde_json::from_str(json).unwrap();
        assert_eq!(chore.id, 7);
        assert_eq!(chore.completed_by.as_deref(), Some("Josh"));
        assert_eq!(chore.comment, None);
        assert_eq!(chore.completed_time(), Some("17:42"));
    }

    #[test]
    fn test_chore_missing_optional_fields() {
        let json = r#"{"id": 1, "section": "Kitchen", "description": "Mop"}"#;
        let chore: Chore = serde_json::from_str(json).unwrap();
        assert!(!chore.completed);
        assert_eq!(chore.order, 0);
        assert_eq!(chore.completed_time(), None);
    }

    #[test]
    fn test_checklist_label_falls_back_to_name() {
        let with = Checklist { name: "opening".into(), description: Some("Opening Checklist".into()) };
        let blank = Checklist { name: "closing".into(), description: Some("  ".into()) };
        let without = Checklist { name: "weekly".into(), description: None };
        assert_eq!(with.label(), "Opening Checklist");
        assert_eq!(blank.label(), "closing");
        assert_eq!(without.label(), "weekly");
    }

    #[test]
    fn test_completion_args_skip_empty_comment() {
        let body = serde_json::to_string(&CompletionArgs { staff_name: "Nora", completed: true, comment: None }).unwrap();
        assert_eq!(body, r#"{"staff_name":"Nora","completed":true}"#);
        let body = serde_json::to_string(&CompletionArgs { staff_name: "Nora", completed: false, comment: Some("low stock") }).unwrap();
        assert_eq!(body, r#"{"staff_name":"Nora","completed":false,"comment":"low stock"}"#);
    }
}
