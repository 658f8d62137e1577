pub mod backup;
pub mod config;
pub mod init;
pub mod log;
pub mod scan;
pub mod sheet;
pub mod stations;
