mod app;
mod dashboard;

pub use app::{App, FocusPanel, Issue, IssueKind, View};
