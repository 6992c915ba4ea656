//! Request and response bodies of the JSON API.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::engine::{AccountSummary, TransferReceipt};
use crate::{Account, AccountId, Amount, RawAmount, TransferOrder};

/// `POST /api/authenticate`
#[derive(Debug, Default, Deserialize)]
pub struct AuthenticateRequest {
    pub name: Option<String>,
    pub pin_number: Option<String>,
}

/// `POST /api/bank-transfer`
#[derive(Debug, Default, Deserialize)]
pub struct TransferRequest {
    pub sender_name: Option<String>,
    pub sender_pin: Option<String>,
    pub recipient_name: Option<String>,
    pub amount: Option<RawAmount>,
}

impl From<TransferRequest> for TransferOrder {
    /// Absent fields become empty, which the engine reports as missing.
    fn from(req: TransferRequest) -> Self {
        TransferOrder {
            sender: req.sender_name.unwrap_or_default(),
            sender_pin: req.sender_pin.unwrap_or_default(),
            recipient: req.recipient_name.unwrap_or_default(),
            amount: req.amount.unwrap_or_else(|| RawAmount::Text(String::new())),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct AuthenticateResponse {
    pub message: &'static str,
    pub name: AccountId,
    pub bank_balance: Amount,
}

impl From<AccountSummary> for AuthenticateResponse {
    fn from(summary: AccountSummary) -> Self {
        Self {
            message: "Authentication successful",
            name: summary.id,
            bank_balance: summary.balance,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct TransferResponse {
    pub message: &'static str,
    pub sender: AccountId,
    pub recipient: AccountId,
    pub amount_transferred: Amount,
    pub sender_new_balance: Amount,
    pub recipient_new_balance: Amount,
}

impl From<TransferReceipt> for TransferResponse {
    fn from(receipt: TransferReceipt) -> Self {
        Self {
            message: "Transfer successful",
            sender: receipt.sender,
            recipient: receipt.recipient,
            amount_transferred: receipt.amount,
            sender_new_balance: receipt.sender_balance,
            recipient_new_balance: receipt.recipient_balance,
        }
    }
}

/// One entry of `GET /api/users`.
#[derive(Debug, Serialize)]
pub struct UserEntry {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pin_number: Option<String>,
    pub bank_balance: Amount,
}

/// Users keyed by name. PINs are only copied out when `expose_pins` is set.
pub fn user_listing(accounts: &[Account], expose_pins: bool) -> BTreeMap<AccountId, UserEntry> {
    accounts
        .iter()
        .map(|account| {
            let entry = UserEntry {
                pin_number: expose_pins.then(|| account.pin().expose().to_string()),
                bank_balance: account.balance(),
            };
            (account.id().to_string(), entry)
        })
        .collect()
}
