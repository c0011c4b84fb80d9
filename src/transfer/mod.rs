//! File import and export of admin data

pub mod students_csv;
pub mod techniques;

pub use students_csv::{export_students_csv, students_to_csv};
pub use techniques::{
    export_techniques, import_stats, import_techniques, read_techniques_file, validate_techniques,
    ExportSummary, ImportProgress, ImportReport, ImportStats, TechniqueImport,
};
