pub mod config;
pub mod detection;
pub mod page;
pub mod pipeline;
pub mod routes;
pub mod storage;
pub mod upload;
pub mod validation;
pub mod visualization;
