//! UI Components
//!
//! Leptos components for the checklist page.

mod chore_row;
mod progress_bar;
mod section_card;
mod selectors;
mod submit_panel;
mod toasts;

pub use chore_row::ChoreRow;
pub use progress_bar::ProgressBar;
pub use section_card::SectionList;
pub use selectors::Selectors;
pub use submit_panel::SubmitPanel;
pub use toasts::{Confetti, Toasts};
