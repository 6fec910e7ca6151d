pub mod balance;
pub mod financial_service;
pub mod penalty_service;
pub mod team_service;
pub mod user_service;

pub use balance::*;
pub use financial_service::*;
pub use penalty_service::*;
pub use team_service::*;
pub use user_service::*;
