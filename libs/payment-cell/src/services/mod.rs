pub mod transaction;
pub mod withdrawal;

pub use transaction::TransactionService;
pub use withdrawal::WithdrawalService;
