#![doc = include_str!("../README.md")]
#![doc(issue_tracker_base_url = "https://github.com/factordynamics/form13f/issues/")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

pub mod api;
pub mod error;
pub mod memory;
pub mod model;
pub mod paging;
pub mod source;

pub use api::{ClientConfig, Forms13fClient, RetryConfig};
pub use error::{DataError, Result};
pub use memory::InMemorySource;
pub use model::{Amendment, FilingHeader, FundSummary, HoldingLine, NEW_HOLDINGS, RESTATEMENT};
pub use paging::{collect_pages, paginate};
pub use source::{DEFAULT_PAGE_SIZE, FilingSource, PageRequest};

/// Version information.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
