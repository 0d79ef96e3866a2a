//! Report rendering for testlens.
//!
//! Produces self-contained HTML pages for item-analysis and student
//! performance reports.

pub mod html;

pub use html::{
    generate_html, generate_performance_html, write_html_report, write_performance_html,
};
