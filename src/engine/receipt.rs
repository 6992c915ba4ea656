use crate::Amount;
use crate::model::AccountId;

/// Result of a successful authentication.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AccountSummary {
    pub id: AccountId,
    pub balance: Amount,
}

/// Result of a committed transfer, with balances after the move.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransferReceipt {
    pub sender: AccountId,
    pub recipient: AccountId,
    pub amount: Amount,
    pub sender_balance: Amount,
    pub recipient_balance: Amount,
}
