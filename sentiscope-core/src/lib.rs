pub mod config;
pub mod error;
pub mod error_utils;
pub mod sample;
pub mod types;

pub use config::*;
pub use error::*;
pub use error_utils::*;
pub use sample::*;
pub use types::*;
