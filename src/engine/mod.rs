//! Transfer engine.
//!
//! The engine owns the account store and is the only writer of balances.
//! It authenticates callers by PIN and moves funds between accounts.
//! Also supports async stream of transfer orders.

use parking_lot::RwLock;
use tokio_stream::{Stream, StreamExt};
use tracing::info;

use crate::model::{Account, TransferOrder};
use crate::store::AccountStore;
use crate::{Amount, AmountError};

mod error;
pub use error::{BankError, Field};

mod receipt;
pub use receipt::{AccountSummary, TransferReceipt};

/// The transfer engine.
///
/// Every transfer runs its validation and both balance updates under one
/// write lock, so concurrent transfers never observe a stale balance and
/// readers never see a half-applied transfer.
pub struct Engine {
    store: RwLock<AccountStore>,
}

/// Public API.
impl Engine {
    pub fn new(store: AccountStore) -> Self {
        Self {
            store: RwLock::new(store),
        }
    }

    /// Engine over the default seed accounts.
    pub fn seeded() -> Self {
        Self::new(AccountStore::seeded())
    }

    /// Run the engine with the given transfer stream.
    pub async fn run(&self, mut stream: impl Stream<Item = TransferOrder> + Unpin) {
        while let Some(order) = stream.next().await {
            // a rejected order must not stop the engine; it is already logged
            let _ = self.transfer(&order);
        }
    }

    /// Snapshot of all accounts, ordered by identifier.
    pub fn accounts(&self) -> Vec<Account> {
        self.store.read().list_all().cloned().collect()
    }

    /// Current balance of one account.
    pub fn balance(&self, id: &str) -> Option<Amount> {
        self.store.read().lookup(id).map(Account::balance)
    }

    /// Sum of all balances, or `None` if it does not fit an [`Amount`].
    pub fn total(&self) -> Option<Amount> {
        self.store.read().total()
    }

    /// Check a name and PIN against the store.
    pub fn authenticate(&self, name: &str, pin: &str) -> Result<AccountSummary, BankError> {
        let result = self.check_credentials(name, pin);
        match &result {
            Ok(summary) => info!(user = name, balance = %summary.balance, "authentication succeeded"),
            Err(e) => info!(user = name, reason = %e, "authentication rejected"),
        }
        result
    }

    /// Validate and apply a transfer. Nothing is mutated unless every check passes.
    pub fn transfer(&self, order: &TransferOrder) -> Result<TransferReceipt, BankError> {
        let result = self.apply_transfer(order);
        Self::log_transfer(order, &result);
        result
    }
}

/// Private API.
impl Engine {
    /// Small helper to log `transfer` results.
    fn log_transfer(order: &TransferOrder, result: &Result<TransferReceipt, BankError>) {
        match result {
            Ok(receipt) => {
                info!(
                    sender = %receipt.sender,
                    recipient = %receipt.recipient,
                    amount = %receipt.amount,
                    "transfer applied"
                );
            }
            Err(e) => {
                info!(
                    sender = %order.sender,
                    recipient = %order.recipient,
                    reason = %e,
                    "transfer skipped"
                );
            }
        }
    }

    /// Validation order:
    /// - name and PIN present
    /// - account exists
    /// - PIN matches
    fn check_credentials(&self, name: &str, pin: &str) -> Result<AccountSummary, BankError> {
        if name.is_empty() {
            return Err(BankError::MissingField(Field::Name));
        }
        if pin.is_empty() {
            return Err(BankError::MissingField(Field::PinNumber));
        }

        let store = self.store.read();
        let account = store
            .lookup(name)
            .ok_or_else(|| BankError::NotFound(name.to_string()))?;

        if !account.verify_pin(pin) {
            return Err(BankError::InvalidCredential(name.to_string()));
        }

        Ok(AccountSummary {
            id: account.id().to_string(),
            balance: account.balance(),
        })
    }

    /// Validation order (first failure wins):
    /// - all fields present
    /// - amount parses and is positive
    /// - sender exists and PIN matches
    /// - recipient exists
    /// - sender can cover the amount
    ///
    /// Then debit sender and credit recipient while still holding the lock.
    fn apply_transfer(&self, order: &TransferOrder) -> Result<TransferReceipt, BankError> {
        let missing = [
            (order.sender.is_empty(), Field::SenderName),
            (order.sender_pin.is_empty(), Field::SenderPin),
            (order.recipient.is_empty(), Field::RecipientName),
            (order.amount.is_empty(), Field::Amount),
        ]
        .into_iter()
        .find_map(|(is_missing, field)| is_missing.then_some(field));
        if let Some(field) = missing {
            return Err(BankError::MissingField(field));
        }

        let amount = order.amount.to_positive_amount()?;

        let mut store = self.store.write();

        let sender = store
            .lookup(&order.sender)
            .ok_or_else(|| BankError::SenderNotFound(order.sender.clone()))?;
        if !sender.verify_pin(&order.sender_pin) {
            return Err(BankError::InvalidCredential(order.sender.clone()));
        }
        let sender_balance = sender.balance();

        let recipient = store
            .lookup(&order.recipient)
            .ok_or_else(|| BankError::RecipientNotFound(order.recipient.clone()))?;

        if sender_balance < amount {
            return Err(BankError::InsufficientFunds(
                order.sender.clone(),
                sender_balance,
                amount,
            ));
        }

        // Self-transfers debit before crediting the same balance
        let recipient_before = if order.recipient == order.sender {
            sender_balance - amount
        } else {
            recipient.balance()
        };
        let recipient_balance = recipient_before
            .checked_add(amount)
            .ok_or(AmountError::OutOfRange)?;
        let sender_balance = sender_balance - amount;

        store.debit(&order.sender, amount);
        store.credit(&order.recipient, amount);

        Ok(TransferReceipt {
            sender: order.sender.clone(),
            recipient: order.recipient.clone(),
            amount,
            sender_balance,
            recipient_balance,
        })
    }
}

impl Default for Engine {
    fn default() -> Self {
        Self::seeded()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Pin;
    use crate::{AccountId, RawAmount};

    // test utils

    fn order(sender: &str, pin: &str, recipient: &str, amount: &str) -> TransferOrder {
        TransferOrder::new(sender, pin, recipient, amount)
    }

    fn balances(engine: &Engine) -> Vec<(AccountId, Amount)> {
        engine
            .accounts()
            .iter()
            .map(|a| (a.id().to_string(), a.balance()))
            .collect()
    }

    fn units(value: i64) -> Amount {
        Amount::from_units(value)
    }

    #[test]
    fn seeded_engine() {
        let engine = Engine::seeded();
        assert_eq!(engine.accounts().len(), 3);
        assert_eq!(engine.total(), Some(units(30_000)));
    }

    // Authenticate

    #[test]
    fn authenticate_succeeds_with_correct_pin() {
        let engine = Engine::seeded();
        let summary = engine.authenticate("alice", "1234").unwrap();
        assert_eq!(summary.id, "alice");
        assert_eq!(summary.balance, units(10_000));
    }

    #[test]
    fn authenticate_wrong_pin_fails() {
        let engine = Engine::seeded();
        assert_eq!(
            engine.authenticate("alice", "0000"),
            Err(BankError::InvalidCredential("alice".to_string()))
        );
    }

    #[test]
    fn authenticate_unknown_user_fails() {
        let engine = Engine::seeded();
        assert_eq!(
            engine.authenticate("dave", "1234"),
            Err(BankError::NotFound("dave".to_string()))
        );
    }

    #[test]
    fn authenticate_missing_fields_fail_first() {
        let engine = Engine::seeded();
        assert_eq!(
            engine.authenticate("", "1234"),
            Err(BankError::MissingField(Field::Name))
        );
        // missing pin wins over unknown user
        assert_eq!(
            engine.authenticate("dave", ""),
            Err(BankError::MissingField(Field::PinNumber))
        );
    }

    // Transfer

    #[test]
    fn transfer_moves_funds() {
        let engine = Engine::seeded();
        let receipt = engine.transfer(&order("alice", "1234", "bob", "100")).unwrap();

        assert_eq!(receipt.sender, "alice");
        assert_eq!(receipt.recipient, "bob");
        assert_eq!(receipt.amount, units(100));
        assert_eq!(receipt.sender_balance, units(9_900));
        assert_eq!(receipt.recipient_balance, units(5_100));
        assert_eq!(engine.balance("alice"), Some(units(9_900)));
        assert_eq!(engine.balance("bob"), Some(units(5_100)));
    }

    #[test]
    fn transfer_accepts_numeric_and_fractional_amounts() {
        let engine = Engine::seeded();
        let order = TransferOrder::new("charlie", "9012", "alice", RawAmount::Number(2500.5));
        let receipt = engine.transfer(&order).unwrap();
        assert_eq!(receipt.sender_balance, Amount::from_scaled(124_995_000));
        assert_eq!(receipt.recipient_balance, Amount::from_scaled(125_005_000));
    }

    #[test]
    fn transfer_exact_balance_succeeds() {
        let engine = Engine::seeded();
        engine.transfer(&order("bob", "5678", "alice", "5000")).unwrap();
        assert_eq!(engine.balance("bob"), Some(Amount::ZERO));
    }

    #[test]
    fn transfer_insufficient_funds_fails() {
        let engine = Engine::seeded();
        let before = balances(&engine);

        let result = engine.transfer(&order("alice", "1234", "bob", "999999"));
        assert!(matches!(
            result,
            Err(BankError::InsufficientFunds(ref id, available, requested))
                if id == "alice" && available == units(10_000) && requested == units(999_999)
        ));

        // Balances unchanged
        assert_eq!(balances(&engine), before);
    }

    #[test]
    fn transfer_to_unknown_recipient_fails() {
        let engine = Engine::seeded();
        assert_eq!(
            engine.transfer(&order("alice", "1234", "dave", "10")),
            Err(BankError::RecipientNotFound("dave".to_string()))
        );
        assert_eq!(engine.balance("alice"), Some(units(10_000)));
    }

    #[test]
    fn transfer_from_unknown_sender_fails() {
        let engine = Engine::seeded();
        assert_eq!(
            engine.transfer(&order("dave", "1234", "bob", "10")),
            Err(BankError::SenderNotFound("dave".to_string()))
        );
    }

    #[test]
    fn transfer_wrong_pin_fails() {
        let engine = Engine::seeded();
        assert_eq!(
            engine.transfer(&order("alice", "0000", "bob", "10")),
            Err(BankError::InvalidCredential("alice".to_string()))
        );
        assert_eq!(engine.balance("bob"), Some(units(5_000)));
    }

    #[test]
    fn transfer_negative_amount_fails() {
        let engine = Engine::seeded();
        assert_eq!(
            engine.transfer(&order("alice", "1234", "bob", "-5")),
            Err(BankError::InvalidAmount(AmountError::NotPositive))
        );
    }

    #[test]
    fn transfer_non_numeric_amount_fails() {
        let engine = Engine::seeded();
        assert_eq!(
            engine.transfer(&order("alice", "1234", "bob", "lots")),
            Err(BankError::InvalidAmount(AmountError::NotANumber))
        );
    }

    #[test]
    fn transfer_blank_amount_is_invalid() {
        let engine = Engine::seeded();
        assert_eq!(
            engine.transfer(&order("alice", "1234", "bob", "   ")),
            Err(BankError::InvalidAmount(AmountError::NotANumber))
        );
        assert_eq!(engine.balance("alice"), Some(units(10_000)));
    }

    #[test]
    fn transfer_missing_field_fails() {
        let engine = Engine::seeded();
        assert_eq!(
            engine.transfer(&order("alice", "", "bob", "10")),
            Err(BankError::MissingField(Field::SenderPin))
        );
        assert_eq!(
            engine.transfer(&order("alice", "1234", "bob", "")),
            Err(BankError::MissingField(Field::Amount))
        );
    }

    #[test]
    fn validation_order_is_stable() {
        let engine = Engine::seeded();
        // missing field beats bad amount
        assert_eq!(
            engine.transfer(&order("", "1234", "bob", "abc")),
            Err(BankError::MissingField(Field::SenderName))
        );
        // bad amount beats unknown sender
        assert_eq!(
            engine.transfer(&order("dave", "1234", "bob", "abc")),
            Err(BankError::InvalidAmount(AmountError::NotANumber))
        );
        // wrong pin beats unknown recipient
        assert_eq!(
            engine.transfer(&order("alice", "0000", "dave", "10")),
            Err(BankError::InvalidCredential("alice".to_string()))
        );
        // unknown recipient beats insufficient funds
        assert_eq!(
            engine.transfer(&order("alice", "1234", "dave", "999999")),
            Err(BankError::RecipientNotFound("dave".to_string()))
        );
    }

    #[test]
    fn self_transfer_is_a_noop() {
        let engine = Engine::seeded();
        let receipt = engine.transfer(&order("alice", "1234", "alice", "100")).unwrap();
        assert_eq!(receipt.sender_balance, units(10_000));
        assert_eq!(receipt.recipient_balance, units(10_000));
        assert_eq!(engine.balance("alice"), Some(units(10_000)));
    }

    #[test]
    fn self_transfer_still_requires_funds() {
        let engine = Engine::seeded();
        assert!(matches!(
            engine.transfer(&order("bob", "5678", "bob", "5001")),
            Err(BankError::InsufficientFunds(..))
        ));
    }

    #[test]
    fn transfer_overflowing_recipient_fails() {
        let store = AccountStore::with_accounts([
            Account::new("rich", Pin::new("1"), Amount::from_scaled(i64::MAX - 10)),
            Account::new("poor", Pin::new("2"), Amount::from_units(1)),
        ])
        .unwrap();
        let engine = Engine::new(store);
        assert_eq!(
            engine.transfer(&order("poor", "2", "rich", "1")),
            Err(BankError::InvalidAmount(AmountError::OutOfRange))
        );
        assert_eq!(engine.balance("poor"), Some(units(1)));
    }

    #[test]
    fn total_that_overflows_is_none() {
        let store = AccountStore::with_accounts([
            Account::new("erin", Pin::new("1"), units(600_000_000_000_000)),
            Account::new("frank", Pin::new("2"), units(600_000_000_000_000)),
        ])
        .unwrap();
        let engine = Engine::new(store);
        assert_eq!(engine.total(), None);
    }

    #[test]
    fn total_is_conserved_across_transfers() {
        let engine = Engine::seeded();
        let orders = [
            order("alice", "1234", "bob", "100"),
            order("bob", "5678", "charlie", "5100"),
            order("charlie", "9012", "alice", "0.0001"),
            order("bob", "5678", "alice", "1"), // fails, bob is empty
            order("alice", "1234", "charlie", "-1"),
        ];
        for order in &orders {
            let _ = engine.transfer(order);
        }
        assert_eq!(engine.total(), Some(units(30_000)));
        assert!(engine.accounts().iter().all(|a| !a.balance().is_negative()));
    }

    // Concurrency

    #[test]
    fn concurrent_transfers_never_overdraw() {
        let engine = Engine::seeded();

        std::thread::scope(|scope| {
            for _ in 0..4 {
                scope.spawn(|| {
                    for _ in 0..500 {
                        let _ = engine.transfer(&order("alice", "1234", "bob", "37"));
                        let _ = engine.transfer(&order("bob", "5678", "alice", "53"));
                        let _ = engine.transfer(&order("bob", "5678", "charlie", "11"));
                    }
                });
            }
        });

        assert_eq!(engine.total(), Some(units(30_000)));
        assert!(engine.accounts().iter().all(|a| !a.balance().is_negative()));
    }

    //  Async run()

    #[tokio::test]
    async fn run_processes_all_orders() {
        let engine = Engine::seeded();
        let orders = vec![
            order("alice", "1234", "bob", "100"),
            order("charlie", "9012", "bob", "400"),
        ];

        engine.run(tokio_stream::iter(orders)).await;

        assert_eq!(engine.balance("alice"), Some(units(9_900)));
        assert_eq!(engine.balance("bob"), Some(units(5_500)));
        assert_eq!(engine.balance("charlie"), Some(units(14_600)));
    }

    #[tokio::test]
    async fn run_skips_rejected_orders_and_continues() {
        let engine = Engine::seeded();
        let orders = vec![
            order("alice", "1234", "bob", "100"),
            order("alice", "1234", "bob", "999999"), // insufficient funds
            order("alice", "1234", "bob", "50"),     // should still process
        ];

        engine.run(tokio_stream::iter(orders)).await;

        assert_eq!(engine.balance("alice"), Some(units(9_850)));
        assert_eq!(engine.balance("bob"), Some(units(5_150)));
    }
}
