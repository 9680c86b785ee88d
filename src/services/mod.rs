//! Course engine operations. Each public function is one unit of work: writes open
//! their own transaction, reads borrow a pooled connection.

mod error;
pub use error::{ErrorKind, IneligibleReason, Precondition, ServiceError, ServiceResult};

pub mod catalog;
pub mod certification;
pub mod course_progress;
pub mod eligibility;
pub mod quiz_scoring;
pub mod skills;
pub mod video_tracking;
pub mod wallets;
