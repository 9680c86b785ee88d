use async_trait::async_trait;
use uuid::Uuid;

use crate::model::{DatabaseResult, ModelManager, entity::Wallet};

/// Source of a student's payment address.
#[async_trait]
pub trait WalletDirectory: Send + Sync + std::fmt::Debug {
    async fn payment_address(&self, student_id: Uuid) -> DatabaseResult<Option<String>>;
}

/// Reads the oldest wallet registered by the student.
#[derive(Debug, Clone)]
pub struct PgWalletDirectory {
    mm: ModelManager,
}

impl PgWalletDirectory {
    pub fn new(mm: ModelManager) -> Self {
        Self { mm }
    }
}

#[async_trait]
impl WalletDirectory for PgWalletDirectory {
    async fn payment_address(&self, student_id: Uuid) -> DatabaseResult<Option<String>> {
        let mut conn = self.mm.acquire().await?;
        Wallet::first_payment_address(&mut conn, student_id).await
    }
}

const BECH32_CHARSET: &str = "qpzry9x8gf2tvdw0s3jn54khce6mua7l";
pub const MAX_ADDRESS_LEN: usize = 120;

/// Shape check for a Shelley address: `addr1` or `addr_test1` prefix followed by
/// lower-case bech32 characters. The checksum is not verified.
pub fn is_valid_payment_address(address: &str) -> bool {
    if address.len() > MAX_ADDRESS_LEN {
        return false;
    }

    let data = match address
        .strip_prefix("addr_test1")
        .or_else(|| address.strip_prefix("addr1"))
    {
        Some(d) => d,
        None => return false,
    };

    !data.is_empty() && data.chars().all(|c| BECH32_CHARSET.contains(c))
}
