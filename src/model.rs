//! Core domain types for the bank.

use std::fmt;

use crate::{Amount, RawAmount};

/// Account identifier (the user's name).
pub type AccountId = String;

/// A secret PIN.
///
/// Never printed by `Debug` and not serializable; compare through
/// [`Account::verify_pin`].
#[derive(Clone, PartialEq, Eq)]
pub struct Pin(String);

impl Pin {
    pub fn new(pin: impl Into<String>) -> Self {
        Pin(pin.into())
    }

    /// Raw secret, only for the legacy listing that still exposes PINs.
    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for Pin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Pin(****)")
    }
}

/// A named balance-holding account.
#[derive(Debug, Clone)]
pub struct Account {
    id: AccountId,
    pin: Pin,
    balance: Amount,
}

impl Account {
    pub fn new(id: impl Into<AccountId>, pin: Pin, balance: Amount) -> Self {
        Self {
            id: id.into(),
            pin,
            balance,
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn pin(&self) -> &Pin {
        &self.pin
    }

    pub fn balance(&self) -> Amount {
        self.balance
    }

    /// Exact, plaintext comparison.
    pub fn verify_pin(&self, pin: &str) -> bool {
        self.pin.0 == pin
    }

    pub(crate) fn credit(&mut self, amount: Amount) {
        self.balance += amount;
    }

    pub(crate) fn debit(&mut self, amount: Amount) {
        self.balance -= amount;
    }
}

/// A request to move funds, as received from a caller.
///
/// Fields are unvalidated; [`Engine::transfer`](crate::Engine::transfer)
/// checks them in a fixed order.
#[derive(Clone)]
pub struct TransferOrder {
    pub sender: AccountId,
    pub sender_pin: String,
    pub recipient: AccountId,
    pub amount: RawAmount,
}

impl TransferOrder {
    pub fn new(
        sender: impl Into<AccountId>,
        sender_pin: impl Into<String>,
        recipient: impl Into<AccountId>,
        amount: impl Into<RawAmount>,
    ) -> Self {
        Self {
            sender: sender.into(),
            sender_pin: sender_pin.into(),
            recipient: recipient.into(),
            amount: amount.into(),
        }
    }
}

impl fmt::Debug for TransferOrder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TransferOrder")
            .field("sender", &self.sender)
            .field("sender_pin", &"****")
            .field("recipient", &self.recipient)
            .field("amount", &self.amount)
            .finish()
    }
}
