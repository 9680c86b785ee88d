use serde::Deserialize;

#[derive(Debug, Deserialize, utoipa::ToSchema)]
pub struct WalletCreateBody {
    pub name: Option<String>,
    pub payment_address: Option<String>,
    pub network: Option<String>,
}
