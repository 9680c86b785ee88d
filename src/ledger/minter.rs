use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use uuid::Uuid;

use crate::config::{Minter, MinterMode};
use crate::ledger::{MintError, MintResult};
use crate::model::entity::CertificateTokenCreate;

/// Payload describing a certificate, returned to the student and sent to the minter.
#[derive(Debug, Clone, Serialize, Deserialize, utoipa::ToSchema)]
pub struct CertificationData {
    pub title: String,
    pub description: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub recipient_name: String,
    /// Stable key of the student. Names are for display and may repeat.
    pub recipient_id: Uuid,
    pub recipient_address: Option<String>,
    pub issuer_name: String,
    pub course_id: Uuid,
    pub course_title: String,
    pub completion_date: Option<DateTime<Utc>>,
    pub level: String,
    pub duration_hours: i32,
    pub verified_skills: Vec<String>,
    pub issue_date: NaiveDate,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, utoipa::ToSchema)]
pub struct MintedToken {
    pub fingerprint: String,
    pub policy_id: String,
    pub asset_name: String,
    pub explorer_url: String,
}

impl From<MintedToken> for CertificateTokenCreate {
    fn from(token: MintedToken) -> Self {
        Self {
            fingerprint: token.fingerprint,
            policy_id: token.policy_id,
            asset_name: token.asset_name,
            explorer_url: token.explorer_url,
        }
    }
}

#[async_trait]
pub trait TokenMinter: Send + Sync + std::fmt::Debug {
    async fn mint(&self, data: &CertificationData) -> MintResult<MintedToken>;
}

/// Produces a deterministic reference per course, student and second instead of
/// touching a ledger.
#[derive(Debug, Clone)]
pub struct SimulatedMinter {
    network: String,
}

impl SimulatedMinter {
    pub fn new<S: Into<String>>(network: S) -> Self {
        Self {
            network: network.into(),
        }
    }

    pub fn token_for(&self, data: &CertificationData, unix_ts: i64) -> MintedToken {
        let unique_id = format!("{}_{}_{}", data.course_id, data.recipient_id, unix_ts);
        let fingerprint_hash = hex::encode(Sha256::digest(unique_id.as_bytes()));
        let policy_hash = hex::encode(Sha256::digest(data.course_title.as_bytes()));

        MintedToken {
            fingerprint: format!("asset1sim{}", &fingerprint_hash[..32]),
            policy_id: format!("policy_sim_{}", &policy_hash[..16]),
            asset_name: format!("CERT_{}_{}", data.course_id, unix_ts),
            explorer_url: format!(
                "https://{}.cardanoscan.io/search?filter=simulated",
                self.network
            ),
        }
    }
}

#[async_trait]
impl TokenMinter for SimulatedMinter {
    async fn mint(&self, data: &CertificationData) -> MintResult<MintedToken> {
        Ok(self.token_for(data, Utc::now().timestamp()))
    }
}

/// Delegates minting to an HTTP service that answers with a [`MintedToken`] body.
#[derive(Debug, Clone)]
pub struct RemoteMinter {
    client: reqwest::Client,
    endpoint: String,
}

impl RemoteMinter {
    pub fn new<S: Into<String>>(endpoint: S) -> Self {
        Self {
            client: reqwest::Client::new(),
            endpoint: endpoint.into(),
        }
    }
}

#[async_trait]
impl TokenMinter for RemoteMinter {
    async fn mint(&self, data: &CertificationData) -> MintResult<MintedToken> {
        tracing::debug!("minting certificate token at {}", self.endpoint);

        let response = self.client.post(&self.endpoint).json(data).send().await?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let body = response.text().await.unwrap_or_default();
            return Err(MintError::Rejected { status, body });
        }

        let token: MintedToken = response.json().await?;
        Ok(token)
    }
}

pub fn build_minter(config: &Minter) -> MintResult<Arc<dyn TokenMinter>> {
    match config.mode() {
        MinterMode::Simulated => Ok(Arc::new(SimulatedMinter::new(config.network()))),
        MinterMode::Remote => {
            let endpoint = config.endpoint().ok_or(MintError::MissingEndpoint)?;
            Ok(Arc::new(RemoteMinter::new(endpoint)))
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;

    fn data() -> CertificationData {
        CertificationData {
            title: String::from("Certification: Rust"),
            description: String::new(),
            kind: String::from("Video Course Completion"),
            recipient_name: String::from("Ada"),
            recipient_id: Uuid::from_u128(7),
            recipient_address: Some(String::from("addr_test1qq")),
            issuer_name: String::from("Ferris"),
            course_id: Uuid::nil(),
            course_title: String::from("Rust"),
            completion_date: None,
            level: String::from("beginner"),
            duration_hours: 2,
            verified_skills: Vec::new(),
            issue_date: NaiveDate::from_ymd_opt(2025, 6, 1).unwrap(),
        }
    }

    #[test]
    fn simulated_token_shape() {
        let minter = SimulatedMinter::new("preprod");
        let token = minter.token_for(&data(), 1_700_000_000);

        assert!(token.fingerprint.starts_with("asset1sim"));
        assert_eq!(token.fingerprint.len(), "asset1sim".len() + 32);
        assert!(token.policy_id.starts_with("policy_sim_"));
        assert_eq!(token.policy_id.len(), "policy_sim_".len() + 16);
        assert_eq!(
            token.asset_name,
            format!("CERT_{}_1700000000", Uuid::nil())
        );
        assert_eq!(
            token.explorer_url,
            "https://preprod.cardanoscan.io/search?filter=simulated"
        );
    }

    #[test]
    fn simulated_token_is_deterministic_per_second() {
        let minter = SimulatedMinter::new("preprod");
        let a = minter.token_for(&data(), 42);
        let b = minter.token_for(&data(), 42);
        let c = minter.token_for(&data(), 43);

        assert_eq!(a, b);
        assert_ne!(a.fingerprint, c.fingerprint);
        assert_eq!(a.policy_id, c.policy_id);
    }

    #[test]
    fn namesakes_get_distinct_tokens() {
        let minter = SimulatedMinter::new("preprod");
        let first = data();
        let second = CertificationData {
            recipient_id: Uuid::from_u128(8),
            ..data()
        };

        let a = minter.token_for(&first, 42);
        let b = minter.token_for(&second, 42);

        assert_eq!(first.recipient_name, second.recipient_name);
        assert_ne!(a.fingerprint, b.fingerprint);
    }

    #[test]
    fn certification_data_uses_type_key() {
        let json = serde_json::to_value(data()).unwrap();
        assert_eq!(json["type"], "Video Course Completion");
        assert!(json.get("kind").is_none());
    }

    #[test]
    fn remote_mode_requires_endpoint() {
        let config: crate::Config = crate::Config::from_slice(
            br#"
[host]
bindto = "127.0.0.1:0"

[app]
jwt = "k"
database_uri = "postgres://localhost/x"

[minter]
mode = "remote"
"#,
        )
        .unwrap();

        assert!(matches!(
            build_minter(config.minter()),
            Err(MintError::MissingEndpoint)
        ));
    }
}
