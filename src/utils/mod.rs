pub mod error;
pub mod logger;
pub mod urls;
pub mod validation;
