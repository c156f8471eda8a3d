//! Options for the event listener and the speakers it subscribes to
//!
//! Options start from built-in defaults and are overlaid with a JSON file
//! using the same camelCase keys as the original configuration format:
//!
//! ```json
//! {
//!   "port": 8080,
//!   "speakerPort": 1400,
//!   "ip": "192.168.1.50",
//!   "callbackPath": "/notify",
//!   "lastFmApiKey": "0123456789abcdef"
//! }
//! ```

use crate::error::{ConfigError, Result};
use crate::network::{callback_url, local_ipv4};
use serde::{Deserialize, Serialize};
use sonos_gena::{Logger, SubscriptionController, TracingLogger};
use std::net::Ipv4Addr;
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Port the local NOTIFY listener is expected on
pub const DEFAULT_PORT: u16 = 8080;

/// Path the local NOTIFY listener is expected on
pub const DEFAULT_CALLBACK_PATH: &str = "/notify";

/// File name looked up under the per-user configuration directory
pub const CONFIG_FILE_NAME: &str = "config.json";

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Options {
    /// Port of the local NOTIFY listener
    pub port: u16,
    /// Port speakers serve UPnP on
    pub speaker_port: u16,
    /// Local address advertised in the callback URL
    pub ip: Option<Ipv4Addr>,
    pub callback_path: String,
    /// Full callback URL; `None` when no local address is known
    pub callback_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_fm_api_key: Option<String>,
}

/// Keys that may appear in the options file. Unknown keys are ignored.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct OptionsFile {
    port: Option<u16>,
    speaker_port: Option<u16>,
    ip: Option<Ipv4Addr>,
    callback_path: Option<String>,
    callback_url: Option<String>,
    last_fm_api_key: Option<String>,
}

impl Options {
    /// Built-in defaults advertising `ip` as the local address
    pub fn with_ip(ip: Option<Ipv4Addr>) -> Self {
        let mut options = Self {
            port: DEFAULT_PORT,
            speaker_port: sonos_gena::DEVICE_PORT,
            ip,
            callback_path: DEFAULT_CALLBACK_PATH.to_string(),
            callback_url: None,
            last_fm_api_key: None,
        };
        options.callback_url = options.computed_callback_url();
        options
    }

    /// Defaults overlaid with the options file at `path`, or at
    /// [`default_config_path`] when `path` is `None`
    ///
    /// A missing file leaves the defaults untouched.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let defaults = Self::default();
        match path.map(Path::to_path_buf).or_else(default_config_path) {
            Some(path) => defaults.overlay_file(&path),
            None => Ok(defaults),
        }
    }

    /// Overlay the options file at `path` onto `self`
    pub fn overlay_file(self, path: &Path) -> Result<Self> {
        if !path.exists() {
            tracing::debug!(path = %path.display(), "no options file, using defaults");
            return Ok(self);
        }

        let contents = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let file: OptionsFile = serde_json::from_str(&contents).map_err(|source| ConfigError::Json {
            path: path.to_path_buf(),
            source,
        })?;

        tracing::debug!(path = %path.display(), "loaded options file");
        Ok(self.merge(file))
    }

    /// Parse options from a JSON string on top of `self`
    pub fn overlay_json(self, json: &str) -> std::result::Result<Self, serde_json::Error> {
        Ok(self.merge(serde_json::from_str(json)?))
    }

    fn merge(mut self, file: OptionsFile) -> Self {
        if let Some(port) = file.port {
            self.port = port;
        }
        if let Some(speaker_port) = file.speaker_port {
            self.speaker_port = speaker_port;
        }
        if file.ip.is_some() {
            self.ip = file.ip;
        }
        if let Some(callback_path) = file.callback_path {
            self.callback_path = callback_path;
        }
        if file.last_fm_api_key.is_some() {
            self.last_fm_api_key = file.last_fm_api_key;
        }
        // An explicit URL wins; otherwise follow the merged ip/port/path
        self.callback_url = file.callback_url.or_else(|| self.computed_callback_url());
        self
    }

    fn computed_callback_url(&self) -> Option<String> {
        self.ip
            .map(|ip| callback_url(ip, self.port, &self.callback_path))
    }

    /// Controller for the speaker at `speaker_ip`, using these options' speaker port
    /// and logging through `tracing`
    pub fn controller(&self, speaker_ip: &str) -> SubscriptionController {
        let logger: Arc<dyn Logger> = Arc::new(TracingLogger);
        SubscriptionController::with_parts(speaker_ip, Some(logger), None).with_port(self.speaker_port)
    }
}

impl Default for Options {
    /// Built-in defaults with the detected local address
    fn default() -> Self {
        Self::with_ip(local_ipv4())
    }
}

/// `<config dir>/sonos-gena/config.json`, if the platform has a config directory
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("sonos-gena").join(CONFIG_FILE_NAME))
}
