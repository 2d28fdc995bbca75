pub mod app;
pub mod contract;
pub mod distributor;
pub mod error;
pub mod escrow;
pub mod keepers;
pub mod lock;
pub mod middleware;
pub mod msg;
pub mod negotiator;
pub mod registry;
pub mod state;
#[cfg(any(test, feature = "testing"))]
pub mod testing;

pub use crate::app::{AppResult, ChannelOpen, IbcModule, PacketData, PacketDataUnmarshaler, UpgradableModule};
pub use crate::error::FeeError;
pub use crate::keepers::{AccountKeeper, BankError, BankKeeper, ChannelKeeper, FeeDeps};
pub use crate::middleware::FeeMiddleware;
pub use crate::negotiator::{NegotiatedVersion, parse_version, unwrap_app_version};
