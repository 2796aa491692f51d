use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NetworkStatus {
    pub active_vendors: u32,
    pub internal_approved: u32,
    pub external_watchlist: u32,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RiskAlert {
    pub level: String,
    pub region: String,
    pub description: String,
    pub affected_vendors: u32,
}

/// Static snapshot shown on the landing view. Passed through unmodified.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardStats {
    pub network_status: NetworkStatus,
    #[serde(default)]
    pub risk_alerts: Vec<RiskAlert>,
}
