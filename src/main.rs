//! Shift Checklist Frontend Entry Point

mod app;
mod chores;
mod commands;
mod components;
mod config;
mod context;
mod controller;
mod error;
mod live;
mod logger;
mod models;
mod progress;
mod queue;
mod sections;
mod signature;
mod store;
mod sync;

use app::App;
use leptos::prelude::*;

fn main() {
    console_error_panic_hook::set_once();
    mount_to_body(App);
}
