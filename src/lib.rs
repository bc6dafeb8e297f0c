// AppForge mock backend library

pub mod api;
pub mod config;
pub mod domain;
pub mod errors;
pub mod fixtures;
pub mod observability;
pub mod services;
pub mod store;

pub use config::Config;
pub use errors::{AppError, Result, StoreError};
pub use services::{RecordService, ServiceContext, Services};
