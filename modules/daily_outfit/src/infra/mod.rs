pub mod generator;
pub mod http;
pub mod images;
pub mod storage;
pub mod weather;
