//! Folds a transaction log into one summary per contract name.

use std::{fmt::Display, path::Path};

use indexmap::IndexMap;
use log::{debug, info};
use serde::Serialize;

use crate::transaction::{load_transaction_log, Field, LoadError, Transaction, TransactionLog};

/// Key of a summary: the rendered `contractName`, so an absent name is `undefined`
/// and a `null` name is `null`.
pub type ContractName = String;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub enum ContractKind {
    /// Received at least one `CALL` transaction.
    Diamond,
    Facet,
}

impl Display for ContractKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ContractKind::Diamond => write!(f, "Diamond"),
            ContractKind::Facet => write!(f, "Facet"),
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ContractSummary {
    /// Address from the first transaction seen for the contract.
    pub address: Field,
    /// Only ever goes from false to true.
    pub is_diamond: bool,
}

impl ContractSummary {
    pub fn kind(&self) -> ContractKind {
        if self.is_diamond {
            ContractKind::Diamond
        } else {
            ContractKind::Facet
        }
    }
}

/// Per-contract summaries in the order the contracts first appear in the log.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct DeploymentSummary {
    contracts: IndexMap<ContractName, ContractSummary>,
}

impl DeploymentSummary {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_transactions<'a, I>(transactions: I) -> Self
    where
        I: IntoIterator<Item = &'a Transaction>,
    {
        let mut summary = Self::new();
        for tx in transactions {
            summary.record(tx);
        }
        summary
    }

    /// Applies one transaction. The first transaction for a name fixes its address.
    pub fn record(&mut self, tx: &Transaction) {
        let contract = self
            .contracts
            .entry(tx.contract_name.render())
            .or_insert_with_key(|name| {
                debug!(
                    "New contract {name} at {}",
                    tx.contract_address.render()
                );
                ContractSummary {
                    address: tx.contract_address.clone(),
                    is_diamond: false,
                }
            });
        if tx.is_call() {
            contract.is_diamond = true;
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &ContractSummary)> {
        self.contracts
            .iter()
            .map(|(name, summary)| (name.as_str(), summary))
    }

    pub fn get(&self, name: &str) -> Option<&ContractSummary> {
        self.contracts.get(name)
    }

    pub fn len(&self) -> usize {
        self.contracts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.contracts.is_empty()
    }

    pub fn diamonds(&self) -> impl Iterator<Item = &str> {
        self.names_of_kind(ContractKind::Diamond)
    }

    pub fn facets(&self) -> impl Iterator<Item = &str> {
        self.names_of_kind(ContractKind::Facet)
    }

    fn names_of_kind(&self, kind: ContractKind) -> impl Iterator<Item = &str> {
        self.iter()
            .filter(move |(_, summary)| summary.kind() == kind)
            .map(|(name, _)| name)
    }
}

impl From<&TransactionLog> for DeploymentSummary {
    fn from(log: &TransactionLog) -> Self {
        Self::from_transactions(&log.transactions)
    }
}

/// Loads a transaction log and summarises it.
pub fn summarize_file<P: AsRef<Path>>(path: P) -> Result<DeploymentSummary, LoadError> {
    let log = load_transaction_log(path)?;
    let summary = DeploymentSummary::from(&log);
    info!(
        "{} contracts: {} diamonds, {} facets",
        summary.len(),
        summary.diamonds().count(),
        summary.facets().count()
    );
    Ok(summary)
}

#[cfg(test)]
mod test {
    use serde_json::Value;

    use super::*;

    fn tx(name: &str, address: &str, transaction_type: &str) -> Transaction {
        Transaction {
            contract_name: name.into(),
            contract_address: address.into(),
            transaction_type: transaction_type.into(),
        }
    }

    #[test]
    fn test_single_create_is_facet() {
        let summary = DeploymentSummary::from_transactions(&[tx("A", "0x1", "CREATE")]);
        assert_eq!(summary.len(), 1);
        let a = summary.get("A").unwrap();
        assert_eq!(a.address.as_str(), Some("0x1"));
        assert_eq!(a.kind(), ContractKind::Facet);
    }

    #[test]
    fn test_call_after_create_is_diamond_with_first_address() {
        let summary = DeploymentSummary::from_transactions(&[
            tx("A", "0x1", "CREATE"),
            tx("A", "0x2", "CALL"),
        ]);
        assert_eq!(summary.len(), 1);
        let a = summary.get("A").unwrap();
        assert_eq!(a.kind(), ContractKind::Diamond);
        assert_eq!(a.address.as_str(), Some("0x1"));
    }

    #[test]
    fn test_diamond_never_reverts() {
        let summary = DeploymentSummary::from_transactions(&[
            tx("A", "0x1", "CALL"),
            tx("A", "0x1", "CREATE"),
            tx("A", "0x1", "CREATE2"),
        ]);
        assert!(summary.get("A").unwrap().is_diamond);
    }

    #[test]
    fn test_first_seen_order() {
        let summary = DeploymentSummary::from_transactions(&[
            tx("Zeta", "0x1", "CREATE"),
            tx("Alpha", "0x2", "CREATE"),
            tx("Zeta", "0x1", "CALL"),
            tx("Mid", "0x3", "CREATE"),
        ]);
        let names: Vec<_> = summary.iter().map(|(name, _)| name).collect();
        assert_eq!(names, vec!["Zeta", "Alpha", "Mid"]);
        assert_eq!(summary.diamonds().collect::<Vec<_>>(), vec!["Zeta"]);
        assert_eq!(
            summary.facets().collect::<Vec<_>>(),
            vec!["Alpha", "Mid"]
        );
    }

    #[test]
    fn test_absent_and_null_names_are_separate() {
        let absent = Transaction {
            contract_address: "0x9".into(),
            transaction_type: "CALL".into(),
            ..Default::default()
        };
        let null = Transaction {
            contract_name: Field::Present(Value::Null),
            contract_address: Field::Present(Value::Null),
            transaction_type: "CREATE".into(),
        };
        let summary = DeploymentSummary::from_transactions(&[absent.clone(), null, absent]);
        assert_eq!(summary.len(), 2);
        let undefined = summary.get("undefined").unwrap();
        assert_eq!(undefined.kind(), ContractKind::Diamond);
        assert_eq!(undefined.address.as_str(), Some("0x9"));
        let null = summary.get("null").unwrap();
        assert_eq!(null.kind(), ContractKind::Facet);
        assert_eq!(null.address, Field::Present(Value::Null));
    }

    #[test]
    fn test_null_name_shares_key_with_string_null() {
        let null = Transaction {
            contract_name: Field::Present(Value::Null),
            contract_address: "0x1".into(),
            transaction_type: "CREATE".into(),
        };
        let summary = DeploymentSummary::from_transactions(&[null, tx("null", "0x2", "CALL")]);
        assert_eq!(summary.len(), 1);
        let contract = summary.get("null").unwrap();
        assert!(contract.is_diamond);
        assert_eq!(contract.address.as_str(), Some("0x1"));
    }

    #[test]
    fn test_empty_log() {
        let summary = DeploymentSummary::from(&TransactionLog::default());
        assert!(summary.is_empty());
        assert_eq!(summary.diamonds().count(), 0);
    }

    #[test]
    fn test_summarize_file() -> anyhow::Result<()> {
        let file = tempfile::NamedTempFile::new()?;
        std::fs::write(
            file.path(),
            r#"{"transactions":[
                {"contractName":"DiamondCutFacet","contractAddress":"0xa","transactionType":"CREATE"},
                {"contractName":"Diamond","contractAddress":"0xb","transactionType":"CREATE"},
                {"contractName":"Diamond","contractAddress":"0xb","transactionType":"CALL"}
            ]}"#,
        )?;
        let summary = summarize_file(file.path())?;
        assert_eq!(summary.facets().collect::<Vec<_>>(), vec!["DiamondCutFacet"]);
        assert_eq!(summary.diamonds().collect::<Vec<_>>(), vec!["Diamond"]);
        Ok(())
    }
}
