pub mod dashboard;
pub mod penalty;
pub mod team;
pub mod transaction;
pub mod user;

pub use dashboard::dashboard_config;
pub use penalty::penalty_config;
pub use team::team_config;
pub use transaction::transaction_config;
pub use user::user_config;
