pub mod penalties;
pub mod teams;
pub mod transactions;
pub mod users;

pub use penalties as penalty_entity;
pub use teams as team_entity;
pub use transactions as transaction_entity;
pub use users as user_entity;
