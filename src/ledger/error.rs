use thiserror::Error;

pub type MintResult<T> = std::result::Result<T, MintError>;

#[derive(Debug, Error)]
pub enum MintError {
    #[error("minter http error: {0}")]
    Http(#[from] reqwest::Error),
    #[error("minter rejected the request with status {status}: {body}")]
    Rejected { status: u16, body: String },
    #[error("remote minter selected but no endpoint configured")]
    MissingEndpoint,
}
