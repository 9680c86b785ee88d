use uuid::Uuid;

use crate::ledger::{MAX_ADDRESS_LEN, is_valid_payment_address};
use crate::model::{
    ModelManager,
    entity::{Wallet, WalletCreate},
};
use crate::services::{ServiceError, ServiceResult};

pub const DEFAULT_NETWORK: &str = "preview";

#[tracing::instrument(skip(mm))]
pub async fn register_wallet(
    mm: &ModelManager,
    user_id: Uuid,
    name: Option<String>,
    payment_address: String,
    network: Option<String>,
) -> ServiceResult<Wallet> {
    let payment_address = payment_address.trim().to_string();
    if !is_valid_payment_address(&payment_address) {
        return Err(ServiceError::validation(format!(
            "payment_address must be a Shelley address (addr1.../addr_test1..., at most {MAX_ADDRESS_LEN} characters)"
        )));
    }

    let name = name
        .map(|n| n.trim().to_string())
        .filter(|n| !n.is_empty())
        .unwrap_or_else(|| String::from("Wallet"));
    let network = network
        .map(|n| n.trim().to_lowercase())
        .filter(|n| !n.is_empty())
        .unwrap_or_else(|| String::from(DEFAULT_NETWORK));

    let mut conn = mm.acquire().await?;
    let created = Wallet::create(
        &mut conn,
        WalletCreate {
            user_id,
            name,
            payment_address,
            network,
        },
    )
    .await;

    match created {
        Ok(wallet) => Ok(wallet),
        Err(e) if e.is_unique_violation() => {
            Err(ServiceError::validation("wallet address already registered"))
        }
        Err(e) => Err(e.into()),
    }
}

#[tracing::instrument(skip(mm))]
pub async fn list_wallets(mm: &ModelManager, user_id: Uuid) -> ServiceResult<Vec<Wallet>> {
    let mut conn = mm.acquire().await?;
    Ok(Wallet::all_by_user(&mut conn, user_id).await?)
}
