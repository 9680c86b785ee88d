//! Collaborators outside the course engine: where a student's payment address comes
//! from and who mints certificate tokens.

mod error;
pub use error::{MintError, MintResult};

mod minter;
pub use minter::{
    CertificationData, MintedToken, RemoteMinter, SimulatedMinter, TokenMinter, build_minter,
};

mod wallets;
pub use wallets::{MAX_ADDRESS_LEN, PgWalletDirectory, WalletDirectory, is_valid_payment_address};
