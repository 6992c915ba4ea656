pub mod amount;
pub mod api;
pub mod config;
pub mod csv;
pub mod engine;
pub mod model;
pub mod store;

pub use amount::{Amount, AmountError, RawAmount};
pub use engine::{BankError, Engine};
pub use model::{Account, AccountId, Pin, TransferOrder};
pub use store::AccountStore;
