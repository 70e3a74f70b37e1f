//! rolodex - a terminal viewer for CRM account contacts
//!
//! This library provides the contact list state controller, the backend API
//! client, and the TUI shell around them.

// Core modules
pub mod app;
pub mod backend;
pub mod cli;
pub mod config;
pub mod controller;
pub mod styles;
pub mod tui;
pub mod view;
pub mod widgets;

// Re-exports for convenience
pub use backend::{ContactFetcher, ContactRecord, FetchError, HttpContactFetcher};
pub use config::Config;
pub use controller::{ContactListController, ContactListView, ContactRow, FetchRequest, Notifier};
