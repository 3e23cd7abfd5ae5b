//! Chore Commands
//!
//! Toggle and section-complete calls, and the queue transport built on them.

use futures::future::LocalBoxFuture;
use futures::FutureExt;

use super::ApiClient;
use crate::error::ApiError;
use crate::models::{ChoreId, CompletionArgs};
use crate::queue::Transport;
use crate::sync::{PendingUpdate, UpdateTarget};

// ========================
// Commands
// ========================

impl ApiClient {
    pub async fn toggle_chore(&self, id: ChoreId, args: &CompletionArgs<'_>) -> Result<(), ApiError> {
        self.post(&format!("/api/chores/{}/toggle", id), args).await?;
        Ok(())
    }

    pub async fn complete_section(&self, section_id: u32, args: &CompletionArgs<'_>) -> Result<(), ApiError> {
        self.post(&format!("/api/sections/{}/complete", section_id), args).await?;
        Ok(())
    }
}

// ========================
// Queue Transport
// ========================

/// Sends queued updates over HTTP
#[derive(Debug, Clone)]
pub struct HttpTransport {
    api: ApiClient,
}

impl HttpTransport {
    pub fn new(api: ApiClient) -> Self {
        Self { api }
    }
}

impl Transport for HttpTransport {
    fn send(&self, update: &PendingUpdate) -> LocalBoxFuture<'static, Result<(), ApiError>> {
        let api = self.api.clone();
        let update = update.clone();
        async move {
            let args = CompletionArgs {
                staff_name: &update.staff_name,
                completed: update.completed,
                comment: update.comment.as_deref(),
            };
            match &update.target {
                UpdateTarget::Chore(id) => api.toggle_chore(*id, &args).await,
                UpdateTarget::Section { section_id, .. } => api.complete_section(*section_id, &args).await,
            }
        }
        .boxed_local()
    }
}
