use chrono::Utc;
use serde::Serialize;
use thiserror::Error;
use uuid::Uuid;

use crate::ledger::{CertificationData, MintError, MintedToken, TokenMinter, WalletDirectory};
use crate::model::{
    CrudRepository, ModelManager, ResourceTyped,
    entity::{
        Certificate, CertificateSummaryRow, CertificateToken, Course, Enrollment, UserEntity,
    },
};
use crate::services::{IneligibleReason, ServiceError, ServiceResult, eligibility::evaluate_for};

#[derive(Debug, Serialize, utoipa::ToSchema)]
pub struct IssuedCertification {
    pub success: bool,
    pub certificate_issued: bool,
    pub token_issued: bool,
    pub certificate_id: Uuid,
    pub certification_data: CertificationData,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub token: Option<MintedToken>,
    /// Set when a payment address exists but minting or storing the token failed. The
    /// certificate is kept in that case and the cause goes to the log.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub token_error: Option<String>,
}

/// Issues the certificate for an eligible enrollment and, when the student has a
/// payment address, mints a token for it.
///
/// Eligibility is evaluated again under the enrollment lock. The certificate commits
/// before minting starts, so a failed mint leaves a certificate without token and is
/// reported through `token_error`.
#[tracing::instrument(skip(mm, wallets, minter))]
pub async fn issue_certification(
    mm: &ModelManager,
    wallets: &dyn WalletDirectory,
    minter: &dyn TokenMinter,
    student_id: Uuid,
    course_id: Uuid,
) -> ServiceResult<IssuedCertification> {
    let recipient_address = wallets.payment_address(student_id).await?;

    let mut tx = mm.begin().await?;

    let course = Course::find_by_id(&mut tx, course_id)
        .await?
        .ok_or(ServiceError::not_found(Course::get_resource_type()))?;
    let student = UserEntity::find_by_id(&mut tx, student_id)
        .await?
        .ok_or(ServiceError::not_found(UserEntity::get_resource_type()))?;

    let enrollment = Enrollment::lock_by_student_course(&mut tx, student_id, course_id).await?;
    let verdict = evaluate_for(&mut tx, &course, enrollment.as_ref()).await?;

    let (enrollment, skills) = match (enrollment, verdict.eligible) {
        (Some(e), true) => (e, verdict.verified_skills.unwrap_or_default()),
        _ => {
            let reason = verdict.reason.unwrap_or(IneligibleReason::CourseNotCompleted);
            return Err(ServiceError::ineligible(reason));
        }
    };

    let certificate = match Certificate::create(&mut tx, enrollment.id(), &skills).await {
        Ok(c) => c,
        Err(e) if e.is_unique_violation() => {
            return Err(ServiceError::ineligible(IneligibleReason::AlreadyCertified));
        }
        Err(e) => return Err(e.into()),
    };

    tx.commit().await?;
    tracing::info!(certificate = %certificate.id(), "certificate issued");

    let certification_data = CertificationData {
        title: format!("Certification: {}", course.title()),
        description: format!("Certifies the successful completion of the course {}", course.title()),
        kind: String::from("Video Course Completion"),
        recipient_name: student.display_name().to_string(),
        recipient_id: student.id(),
        recipient_address,
        issuer_name: course.instructor().to_string(),
        course_id: course.id(),
        course_title: course.title().to_string(),
        completion_date: enrollment.completed_at(),
        level: course.level().to_string(),
        duration_hours: course.duration_hours(),
        verified_skills: skills,
        issue_date: Utc::now().date_naive(),
    };

    let mut issued = IssuedCertification {
        success: true,
        certificate_issued: true,
        token_issued: false,
        certificate_id: certificate.id(),
        certification_data,
        token: None,
        token_error: None,
    };

    if issued.certification_data.recipient_address.is_none() {
        return Ok(issued);
    }

    match mint_and_link(mm, minter, &issued.certification_data, certificate.id()).await {
        Ok(token) => {
            issued.token_issued = true;
            issued.token = Some(token);
        }
        Err(e) => {
            tracing::warn!(
                certificate = %certificate.id(),
                "certificate kept without token: {e}"
            );
            issued.token_error = Some(e.client_reason().to_string());
        }
    }

    Ok(issued)
}

/// Why a certificate ended up without a token.
#[derive(Debug, Error)]
enum TokenFailure {
    #[error("minting failed: {0}")]
    Mint(#[from] MintError),
    #[error("storing the token failed: {0}")]
    Store(#[from] ServiceError),
}

impl TokenFailure {
    fn client_reason(&self) -> &'static str {
        match self {
            Self::Mint(_) => "token minting failed",
            Self::Store(_) => "token could not be recorded",
        }
    }
}

async fn mint_and_link(
    mm: &ModelManager,
    minter: &dyn TokenMinter,
    data: &CertificationData,
    certificate_id: Uuid,
) -> Result<MintedToken, TokenFailure> {
    let token = minter.mint(data).await?;

    let mut tx = mm.begin().await.map_err(ServiceError::from)?;
    let stored = CertificateToken::create(&mut tx, token.clone().into())
        .await
        .map_err(ServiceError::from)?;
    Certificate::attach_token(&mut tx, certificate_id, stored.id())
        .await
        .map_err(ServiceError::from)?;
    tx.commit().await.map_err(ServiceError::from)?;

    Ok(token)
}

#[derive(Debug, Serialize, utoipa::ToSchema)]
pub struct CertificateSummary {
    pub certificate_id: Uuid,
    pub course_id: Uuid,
    pub course_title: String,
    pub instructor: String,
    pub student_name: String,
    pub completion_date: Option<chrono::DateTime<Utc>>,
    pub issued_at: chrono::DateTime<Utc>,
    pub skills_verified: Vec<String>,
    pub has_token: bool,
    pub token_fingerprint: Option<String>,
    pub explorer_url: Option<String>,
}

impl From<CertificateSummaryRow> for CertificateSummary {
    fn from(row: CertificateSummaryRow) -> Self {
        Self {
            certificate_id: row.certificate_id,
            course_id: row.course_id,
            course_title: row.course_title,
            instructor: row.instructor,
            student_name: row.student_name,
            completion_date: row.completion_date,
            issued_at: row.issued_at,
            skills_verified: row.skills_verified,
            has_token: row.token_fingerprint.is_some(),
            token_fingerprint: row.token_fingerprint,
            explorer_url: row.explorer_url,
        }
    }
}

#[tracing::instrument(skip(mm))]
pub async fn my_certificates(mm: &ModelManager, student_id: Uuid) -> ServiceResult<Vec<CertificateSummary>> {
    let mut conn = mm.acquire().await?;
    let rows = CertificateSummaryRow::all_by_student(&mut conn, student_id).await?;
    Ok(rows.into_iter().map(CertificateSummary::from).collect())
}

#[tracing::instrument(skip(mm))]
pub async fn verify_certificate(mm: &ModelManager, fingerprint: &str) -> ServiceResult<CertificateSummary> {
    let fingerprint = fingerprint.trim();
    if fingerprint.is_empty() {
        return Err(ServiceError::validation("fingerprint is required"));
    }

    let mut conn = mm.acquire().await?;
    CertificateSummaryRow::find_by_fingerprint(&mut conn, fingerprint)
        .await?
        .map(CertificateSummary::from)
        .ok_or(ServiceError::not_found(Certificate::get_resource_type()))
}
