#![doc = include_str!("../README.md")]
#![doc(issue_tracker_base_url = "https://github.com/factordynamics/form13f/issues/")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

pub mod export;
pub mod pivot;
pub mod records;

pub use export::{ExportError, ExportFormat, Exporter};
pub use pivot::{HoldingsPivot, PivotMetric, PivotRow};
pub use records::{HoldingRecord, to_ascii_table};
