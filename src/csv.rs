use serde::{Deserialize, Serialize};
use std::io;
use std::path::Path;
use thiserror::Error;

use crate::{Account, AccountId, Amount, AmountError, Pin, RawAmount, TransferOrder};

/// Errors that can occur when reading or writing csv files
#[derive(Debug, Error)]
pub enum CsvError {
    #[error("failed to open {path}: {source}")]
    Open { path: String, source: csv::Error },

    #[error("line {line}: failed to parse row: {source}")]
    Parse { line: usize, source: csv::Error },

    #[error("line {line}: invalid balance for {name}: {source}")]
    InvalidBalance {
        line: usize,
        name: AccountId,
        source: AmountError,
    },

    #[error("failed to write csv: {0}")]
    Write(#[from] csv::Error),

    #[error("failed to flush csv: {0}")]
    Flush(#[from] io::Error),
}

#[derive(Debug, Deserialize)]
struct AccountRow {
    name: String,
    pin: String,
    balance: String,
}

#[derive(Debug, Deserialize)]
struct TransferRow {
    sender: String,
    sender_pin: String,
    recipient: String,
    amount: String,
}

#[derive(Debug, Serialize)]
struct BalanceRow<'a> {
    name: &'a str,
    balance: String,
}

fn open(path: &Path) -> Result<csv::Reader<std::fs::File>, CsvError> {
    csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_path(path)
        .map_err(|source| CsvError::Open {
            path: path.display().to_string(),
            source,
        })
}

/// Read seed accounts (`name,pin,balance`) from a csv file
pub fn read_accounts(path: impl AsRef<Path>) -> Result<Vec<Account>, CsvError> {
    let reader = open(path.as_ref())?;

    reader
        .into_deserialize::<AccountRow>()
        .enumerate()
        .map(|(idx, result)| {
            let line = idx + 2; // 1-indexed, skip header
            let row = result.map_err(|source| CsvError::Parse { line, source })?;
            let balance = row
                .balance
                .parse::<Amount>()
                .map_err(|source| CsvError::InvalidBalance {
                    line,
                    name: row.name.clone(),
                    source,
                })?;
            Ok(Account::new(row.name, Pin::new(row.pin), balance))
        })
        .collect()
}

/// Read transfer orders (`sender,sender_pin,recipient,amount`) from a csv file.
///
/// Rows are not validated beyond their shape; the engine rejects bad orders.
pub fn read_transfers(
    path: impl AsRef<Path>,
) -> Result<impl Iterator<Item = Result<TransferOrder, CsvError>>, CsvError> {
    let reader = open(path.as_ref())?;

    Ok(reader
        .into_deserialize::<TransferRow>()
        .enumerate()
        .map(|(idx, result)| {
            let line = idx + 2;
            let row = result.map_err(|source| CsvError::Parse { line, source })?;
            Ok(TransferOrder {
                sender: row.sender,
                sender_pin: row.sender_pin,
                recipient: row.recipient,
                amount: RawAmount::Text(row.amount),
            })
        }))
}

/// Write account balances (`name,balance`) in csv format. PINs are never written.
pub fn write_accounts<'a>(
    writer: impl io::Write,
    accounts: impl IntoIterator<Item = &'a Account>,
) -> Result<(), CsvError> {
    let mut writer = csv::Writer::from_writer(writer);

    for account in accounts {
        writer.serialize(BalanceRow {
            name: account.id(),
            balance: account.balance().to_string(),
        })?;
    }

    writer.flush()?;
    Ok(())
}
