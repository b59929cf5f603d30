pub mod arithmetic;
pub mod error;
pub mod statements;
pub mod types;

pub use error::*;
pub use statements::*;
pub use types::*;
