pub mod app;
pub mod backend;
pub mod chat;
pub mod clipboard;
pub mod demo_form;
pub mod event_source;
pub mod keymap;
pub mod notification;
pub mod panic_handler;
pub mod sample_report;
pub mod settings;
pub mod snippets;
pub mod system_command;
pub mod ui;
pub mod viewer;

#[cfg(any(test, feature = "test-utils"))]
pub mod test_utils;

// Re-export main app components
pub use app::{App, AppAction, ReportAction, Section, run_app_with_event_source};
