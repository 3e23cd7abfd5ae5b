//! Checklist Commands
//!
//! Listing, loading, submitting and resetting checklists.

use super::{decode_text, path_segment, ApiClient};
use crate::error::ApiError;
use crate::models::{Checklist, Chore, ResetArgs, SubmitArgs, SubmitResponse};

// ========================
// Commands
// ========================

impl ApiClient {
    pub async fn list_checklists(&self) -> Result<Vec<Checklist>, ApiError> {
        self.get_json("/api/checklists").await
    }

    pub async fn list_staff(&self) -> Result<Vec<String>, ApiError> {
        self.get_json("/api/staff").await
    }

    /// Chores of one checklist; a non-array payload is a decode error
    pub async fn load_chores(&self, checklist: &str) -> Result<Vec<Chore>, ApiError> {
        let path = format!("/api/checklists/{}/chores", path_segment(checklist));
        self.get_json(&path).await
    }

    pub async fn submit_checklist(&self, args: &SubmitArgs<'_>) -> Result<SubmitResponse, ApiError> {
        let path = "/api/submit_checklist";
        let text = self.post(path, args).await?;
        decode_text(path, &text)
    }

    pub async fn reset_checklist(&self, checklist: &str, staff_name: &str) -> Result<(), ApiError> {
        let path = format!("/api/reset_checklist/{}", path_segment(checklist));
        self.post(&path, &ResetArgs { staff_name }).await?;
        Ok(())
    }
}
