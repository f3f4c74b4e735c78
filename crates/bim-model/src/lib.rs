//! Data model for synchronizing airport BIM asset sheets (PIM) with the
//! external maintenance system (Maximo).
//!
//! The types here are shared by ingestion, the reconciliation engine, the
//! export formatter and the CLI. They carry no I/O of their own.

pub mod asset;
pub mod comparison;
pub mod error;
pub mod history;
pub mod ids;
pub mod options;
pub mod sheet;
pub mod value;

pub use asset::{AGRUPACION_FIELD, AssetRecord, KEY_FIELD};
pub use comparison::{ChangeSummary, ComparisonItem, ComparisonStatus};
pub use error::{ModelError, Result};
pub use history::{SyncBase, SyncHistoryEntry};
pub use ids::AssetKey;
pub use options::{CompareOptions, EqualityPolicy};
pub use sheet::{
    BASE_PROPERTY_COLUMNS, CLASSIFICATION_COLUMNS, SheetColumn, columns_for_agrupacion,
};
pub use value::FieldValue;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn change_summary_counts() {
        let summary = ChangeSummary {
            new: 2,
            modified: 1,
            deleted: 0,
        };
        assert_eq!(summary.total(), 3);
        assert!(summary.has_changes());
        assert!(!ChangeSummary::default().has_changes());
    }
}
