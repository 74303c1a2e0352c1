//! For records of a deployment transaction log, such as a forge broadcast file
//! (`broadcast/<script>/<chain>/run-latest.json`).

use std::{
    fmt, fs, io,
    path::{Path, PathBuf},
};

use log::info;
use serde::{
    de::{self, value::MapAccessDeserializer, MapAccess, Unexpected, Visitor},
    Deserialize, Deserializer,
};
use serde_json::{Number, Value};
use thiserror::Error;

/// Value of `transactionType` that marks a call into an existing contract.
pub const CALL: &str = "CALL";

#[derive(Debug, Error)]
pub enum LoadError {
    #[error("File {} could not be read {source}", .path.display())]
    FileRead { source: io::Error, path: PathBuf },
    #[error("Transaction log could not be parsed {source}")]
    Parse {
        source: serde_json::Error,
        path: Option<PathBuf>,
    },
}

impl LoadError {
    /// The underlying message, without the file context.
    pub fn reason(&self) -> String {
        match self {
            LoadError::FileRead { source, .. } => source.to_string(),
            LoadError::Parse { source, .. } => source.to_string(),
        }
    }

    fn with_path(self, file: &Path) -> Self {
        match self {
            LoadError::Parse { source, .. } => LoadError::Parse {
                source,
                path: Some(file.to_path_buf()),
            },
            other => other,
        }
    }
}

/// A record field exactly as written. An absent key and `null` are different.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub enum Field {
    #[default]
    Absent,
    Present(Value),
}

impl Field {
    pub fn value(&self) -> Option<&Value> {
        match self {
            Field::Absent => None,
            Field::Present(value) => Some(value),
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        self.value().and_then(Value::as_str)
    }

    /// Text of the field when interpolated into the report.
    ///
    /// Absent is `undefined`, `null` is `null`, strings are verbatim and
    /// other values follow JavaScript string conversion.
    pub fn render(&self) -> String {
        match self {
            Field::Absent => "undefined".to_string(),
            Field::Present(value) => render_value(value),
        }
    }
}

impl From<&str> for Field {
    fn from(s: &str) -> Self {
        Field::Present(Value::String(s.to_string()))
    }
}

fn render_value(value: &Value) -> String {
    match value {
        Value::Null => "null".to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Number(n) => render_number(n),
        Value::String(s) => s.clone(),
        // Array elements that are null become empty strings.
        Value::Array(items) => items
            .iter()
            .map(|item| match item {
                Value::Null => String::new(),
                item => render_value(item),
            })
            .collect::<Vec<_>>()
            .join(","),
        Value::Object(_) => "[object Object]".to_string(),
    }
}

fn render_number(n: &Number) -> String {
    if let Some(i) = n.as_i64() {
        return i.to_string();
    }
    if let Some(u) = n.as_u64() {
        return u.to_string();
    }
    match n.as_f64() {
        Some(f) if f == 0.0 => "0".to_string(),
        Some(f) if f.fract() == 0.0 && f.abs() < 1e21 => format!("{f:.0}"),
        Some(f) => f.to_string(),
        None => n.to_string(),
    }
}

/// A single entry of the `transactions` list.
///
/// Fields are not type checked and other keys are ignored. An entry that is
/// not an object has every field absent; a `null` entry is an error.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Transaction {
    pub contract_name: Field,
    pub contract_address: Field,
    pub transaction_type: Field,
}

impl Transaction {
    pub fn is_call(&self) -> bool {
        self.transaction_type.as_str() == Some(CALL)
    }
}

impl<'de> Deserialize<'de> for Transaction {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        match Value::deserialize(deserializer)? {
            Value::Object(mut record) => {
                let mut field = |key: &str| record.remove(key).map_or(Field::Absent, Field::Present);
                Ok(Transaction {
                    contract_name: field("contractName"),
                    contract_address: field("contractAddress"),
                    transaction_type: field("transactionType"),
                })
            }
            Value::Null => Err(de::Error::invalid_type(
                Unexpected::Unit,
                &"a transaction record",
            )),
            _ => Ok(Transaction::default()),
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct TransactionLog {
    pub transactions: Vec<Transaction>,
}

#[derive(Deserialize)]
struct RawTransactionLog {
    transactions: Vec<Transaction>,
}

struct TransactionLogVisitor;

impl<'de> Visitor<'de> for TransactionLogVisitor {
    type Value = TransactionLog;

    fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str("an object with a `transactions` list")
    }

    fn visit_map<A: MapAccess<'de>>(self, map: A) -> Result<Self::Value, A::Error> {
        let raw = RawTransactionLog::deserialize(MapAccessDeserializer::new(map))?;
        Ok(TransactionLog {
            transactions: raw.transactions,
        })
    }
}

/// Only a JSON object is accepted. A derived impl would also read fields from an array.
impl<'de> Deserialize<'de> for TransactionLog {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_map(TransactionLogVisitor)
    }
}

impl TransactionLog {
    pub fn from_json_str(data: &str) -> Result<Self, LoadError> {
        serde_json::from_str(data).map_err(|source| LoadError::Parse { source, path: None })
    }
}

/// Reads the whole file then parses it. Nothing is returned unless both succeed.
pub fn load_transaction_log<P: AsRef<Path>>(path: P) -> Result<TransactionLog, LoadError> {
    let path = path.as_ref();
    let data = fs::read_to_string(path).map_err(|source| LoadError::FileRead {
        source,
        path: path.to_path_buf(),
    })?;
    let log = TransactionLog::from_json_str(&data).map_err(|e| e.with_path(path))?;
    info!(
        "Loaded {} transactions from {}",
        log.transactions.len(),
        path.display()
    );
    Ok(log)
}
