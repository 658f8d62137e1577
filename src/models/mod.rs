pub mod alert;
pub mod scan_event;
pub mod station;
