//! Itinerary data model, in-memory store and configuration for `tourplan`.

pub mod app_config;
pub mod config;
pub mod feedback;
pub mod store;
pub mod types;

use thiserror::Error;

pub use app_config::{AppConfig, Environment};
pub use config::{load_app_config, load_app_config_from_env};
pub use feedback::{feedback_label, DEFAULT_ADDED_LABEL, DUPLICATE_LABEL};
pub use store::{AddOutcome, ItineraryStore, MAX_DAYS};
pub use types::{
    CityRef, ItemPatch, ItemType, ItineraryItem, PlaceRef, StateRef, DEFAULT_DAY,
};

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing required environment variable: {0}")]
    MissingEnvVar(String),

    #[error("invalid value for {var}: {reason}")]
    InvalidEnvVar { var: String, reason: String },
}
