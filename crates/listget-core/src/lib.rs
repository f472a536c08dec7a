pub mod config;
pub mod logging;

pub mod batch;
pub mod fetch;
pub mod record;
pub mod scheduler;
pub mod storage;
