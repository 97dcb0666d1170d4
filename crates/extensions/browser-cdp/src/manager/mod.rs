//! Browser instance manager.
//!
//! Attaches to a Chrome already listening on the debugging port, or launches
//! one with a persistent profile so the host application's login survives
//! between runs.

mod manager_core;
mod manager_pages;
mod manager_types;

pub use manager_core::BrowserManager;
pub use manager_pages::select_page;
pub use manager_types::BrowserError;

#[cfg(test)]
#[path = "manager_tests.rs"]
mod tests;
