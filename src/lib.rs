pub mod config;
pub mod datasource;
pub mod decode;
pub mod domain;
pub mod engine;
pub mod error;
pub mod orchestration;
pub mod pda;

pub use config::Config;
pub use datasource::{
    AccountSource, FetchError, MockLedger, SolanaRpcSource, TokenBalanceSource,
};
pub use decode::{AccountDecode, AccountKind, DecodeError};
pub use domain::{
    Deal, DealTranches, Decimal, Fraction, GlobalMarketState, Pubkey, RepaymentSchedule,
};
pub use engine::DealStatus;
pub use error::{AppError, DataInconsistency};
pub use orchestration::Aggregator;
