//! Sync report output.
//!
//! - **Comparison CSV**: one row per compared asset with the reviewer's
//!   decision, for sign-off outside the tool
//! - **History log**: completed syncs persisted as JSON between runs

mod export;
mod history;

pub use export::{
    DEFAULT_EXPORT_FILE, EXPORT_HEADERS, decision_label, write_comparison_csv,
    write_comparison_file,
};
pub use history::{load_history, save_history};
