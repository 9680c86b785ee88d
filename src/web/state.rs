use std::sync::Arc;

use crate::{
    Config,
    ledger::{TokenMinter, WalletDirectory},
    model::ModelManager,
};

#[derive(Debug, Clone)]
pub struct AppState {
    mm: ModelManager,
    config: &'static Config,
    minter: Arc<dyn TokenMinter>,
    wallets: Arc<dyn WalletDirectory>,
}

impl AppState {
    pub fn new(
        mm: ModelManager,
        config: &'static Config,
        minter: Arc<dyn TokenMinter>,
        wallets: Arc<dyn WalletDirectory>,
    ) -> Self {
        Self {
            mm,
            config,
            minter,
            wallets,
        }
    }

    pub fn pool(&self) -> &ModelManager {
        &self.mm
    }

    pub fn config(&self) -> &'static Config {
        self.config
    }

    pub fn minter(&self) -> &dyn TokenMinter {
        self.minter.as_ref()
    }

    pub fn wallets(&self) -> &dyn WalletDirectory {
        self.wallets.as_ref()
    }
}
