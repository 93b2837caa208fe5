pub mod query;
pub mod solve;
