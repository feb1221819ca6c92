mod error;
pub mod utils;

pub use error::IndexError;

pub type Result<T> = std::result::Result<T, IndexError>;
