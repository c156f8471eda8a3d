//! Configuration glue around the GENA subscription controller
//!
//! Loads listener and speaker options from a JSON file, discovers the local
//! address used to build the callback URL handed to
//! [`SubscriptionController::subscribe`](sonos_gena::SubscriptionController::subscribe),
//! and renders the small options script served to the browser UI.

mod error;
pub mod network;
pub mod options;
pub mod script;

pub use error::{ConfigError, Result};
pub use network::{callback_url, local_ipv4};
pub use options::{default_config_path, Options};
pub use script::{options_script, SCRIPT_CONTENT_TYPE};
