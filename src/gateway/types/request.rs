//! Request and response DTOs

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::core_types::{AccountId, MinorUnits};

/// Open account request
#[derive(Debug, Deserialize, ToSchema)]
pub struct OpenAccountRequest {
    /// Owner identifier, checked by the KYC oracle
    #[serde(default)]
    #[schema(example = "alice")]
    pub owner: String,
    /// Initial balance in minor units (default 0)
    #[serde(default)]
    #[schema(example = 1000)]
    pub initial: Option<MinorUnits>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct OpenAccountData {
    #[schema(example = 1)]
    pub id: AccountId,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct BalanceData {
    #[schema(example = 750)]
    pub balance: MinorUnits,
}

/// Transfer request
#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct TransferRequest {
    #[schema(example = 1)]
    pub from_id: AccountId,
    #[schema(example = 2)]
    pub to_id: AccountId,
    /// Amount in minor units, must be positive
    #[schema(example = 250)]
    pub amount: MinorUnits,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct TransferData {
    pub ok: bool,
}
