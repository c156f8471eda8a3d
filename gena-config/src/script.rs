//! Browser-side options snippet

use crate::error::Result;
use crate::options::Options;
use serde::Serialize;

/// Content type to serve [`options_script`] with
pub const SCRIPT_CONTENT_TYPE: &str = "application/javascript";

/// The subset of options exposed to the browser
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct ClientOptions<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    last_fm_api_key: Option<&'a str>,
}

/// Render `var options = {...};` for inclusion in a web page
///
/// Only the Last.fm API key is exposed; it is left out when unset.
pub fn options_script(options: &Options) -> Result<String> {
    let client = ClientOptions {
        last_fm_api_key: options.last_fm_api_key.as_deref(),
    };
    Ok(format!("var options = {};", serde_json::to_string(&client)?))
}
