pub mod database;
pub mod http;
pub mod log;
pub mod storage;
pub mod string;
