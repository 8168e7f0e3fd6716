use serde::Deserialize;
use ts_rs::TS;

#[derive(Debug, Deserialize, TS)]
pub struct SetExtensionEnabledRequest {
    pub enabled: bool,
}
