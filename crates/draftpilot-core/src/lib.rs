pub mod autopilot;
pub mod badges;
pub mod config;
pub mod credentials;
pub mod error;
pub mod gateway;
pub mod lobby;
pub mod monitor;
pub mod profile;
pub mod registry;
pub mod selector;
pub mod session;
pub mod settings;
pub mod snapshot;
pub mod social;
pub mod summoner;

#[cfg(test)]
mod testing;

pub use autopilot::{Autopilot, AutopilotStatus};
pub use error::{DraftError, Result};
pub use gateway::{Gateway, HttpGateway};
