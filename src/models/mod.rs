pub mod balance;
pub mod common;
pub mod penalty;
pub mod team;
pub mod transaction;
pub mod user;

pub use balance::*;
pub use common::*;
pub use penalty::*;
pub use team::*;
pub use transaction::*;
pub use user::*;
