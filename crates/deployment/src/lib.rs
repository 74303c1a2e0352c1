//! Classifies the contracts of a deployment transaction log.
//!
//! A contract that received a `CALL` transaction is a Diamond, every other
//! contract is a Facet.
pub mod report;
pub mod summary;
pub mod transaction;

pub use report::{write_report, ReportError, ReportStyle};
pub use summary::{summarize_file, ContractKind, ContractName, ContractSummary, DeploymentSummary};
pub use transaction::{load_transaction_log, Field, LoadError, Transaction, TransactionLog};
