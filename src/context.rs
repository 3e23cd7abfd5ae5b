//! Application Context
//!
//! Shared handles provided via Leptos Context API.

use leptos::prelude::*;

use crate::controller::Controller;
use crate::store::AppStore;

/// App-wide handles provided via context
#[derive(Clone, Copy)]
pub struct AppContext {
    pub store: AppStore,
    /// Routes every user action to the sync core
    pub controller: Controller,
}

impl AppContext {
    pub fn new(store: AppStore, controller: Controller) -> Self {
        Self { store, controller }
    }
}

pub fn use_app_context() -> AppContext {
    expect_context::<AppContext>()
}
