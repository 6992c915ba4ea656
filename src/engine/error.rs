//! Error types for authentication and transfers.

use std::fmt;

use thiserror::Error;

use crate::model::AccountId;
use crate::{Amount, AmountError};

/// Request fields checked for presence, named as they appear on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    Name,
    PinNumber,
    SenderName,
    SenderPin,
    RecipientName,
    Amount,
}

impl Field {
    pub fn as_str(self) -> &'static str {
        match self {
            Field::Name => "name",
            Field::PinNumber => "pin_number",
            Field::SenderName => "sender_name",
            Field::SenderPin => "sender_pin",
            Field::RecipientName => "recipient_name",
            Field::Amount => "amount",
        }
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned by [`Engine::authenticate`](super::Engine::authenticate)
/// and [`Engine::transfer`](super::Engine::transfer).
///
/// Every variant is a rejected client input; the store is never mutated when
/// one is returned.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum BankError {
    #[error("{0} is required")]
    MissingField(Field),

    #[error("{0}")]
    InvalidAmount(#[from] AmountError),

    #[error("user {0} not found")]
    NotFound(AccountId),

    #[error("sender {0} not found")]
    SenderNotFound(AccountId),

    #[error("recipient {0} not found")]
    RecipientNotFound(AccountId),

    #[error("invalid PIN for {0}")]
    InvalidCredential(AccountId),

    #[error("insufficient funds for {0}: available {1}, requested {2}")]
    InsufficientFunds(AccountId, Amount, Amount),
}
