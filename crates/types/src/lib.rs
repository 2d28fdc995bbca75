pub mod ack;
pub mod codec;
pub mod coins;
pub mod error;
pub mod fee;
pub mod packet;
pub mod version;

pub use ack::*;
pub use error::*;
pub use fee::*;
pub use packet::*;
pub use version::*;

/// The only fee version this middleware negotiates
pub const FEE_VERSION: &str = "ics29-1";

/// Name of the module account that holds escrowed fees
pub const MODULE_NAME: &str = "feeibc";
