//! Renders a deployment summary for people or for other programs.

use std::{
    fmt::Display,
    io::{self, Write},
};

use serde::Serialize;
use serde_json::Value;
use thiserror::Error;

use crate::summary::{ContractKind, DeploymentSummary};

#[derive(Debug, Error)]
pub enum ReportError {
    #[error("IO error {0}")]
    Io(#[from] io::Error),
    #[error("serde_json error {0}")]
    SerdeJson(#[from] serde_json::Error),
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ReportStyle {
    /// Two lines per contract, each contract preceded by a blank line.
    #[default]
    Pretty,
    /// A single JSON array.
    Json,
}

/// One contract in the JSON report. An absent address is written as `null`.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ContractEntry<'a> {
    contract_name: &'a str,
    contract_address: Option<&'a Value>,
    kind: ContractKind,
}

impl Display for DeploymentSummary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for (name, contract) in self.iter() {
            writeln!(f)?;
            writeln!(f, "Contract Name: {} ({})", name, contract.kind())?;
            writeln!(f, "Contract Address: {}", contract.address.render())?;
        }
        Ok(())
    }
}

pub fn write_report<W: Write>(
    summary: &DeploymentSummary,
    style: ReportStyle,
    writer: &mut W,
) -> Result<(), ReportError> {
    match style {
        ReportStyle::Pretty => write!(writer, "{summary}")?,
        ReportStyle::Json => {
            let entries: Vec<ContractEntry> = summary
                .iter()
                .map(|(name, contract)| ContractEntry {
                    contract_name: name,
                    contract_address: contract.address.value(),
                    kind: contract.kind(),
                })
                .collect();
            serde_json::to_writer(&mut *writer, &entries)?;
            writeln!(writer)?;
        }
    }
    writer.flush()?;
    Ok(())
}
