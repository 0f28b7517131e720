use serde::{Deserialize, Serialize};

/// Per-token prices charged by one upstream provider.
///
/// Prices stay decimal strings so nothing is lost to float rounding.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct ProviderPricing {
    pub prompt: String,
    pub completion: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
}

/// An upstream provider able to serve a model.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Provider {
    pub provider_id: String,
    pub model_name: String,
    pub pricing: ProviderPricing,
}
