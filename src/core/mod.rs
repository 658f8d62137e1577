pub mod backup;
pub mod coordinator;
pub mod counter;
pub mod ledger;
pub mod log;
