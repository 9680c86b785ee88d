mod user;
pub use user::{UserEntity, UserEntityCreate};

mod wallet;
pub use wallet::{Wallet, WalletCreate};

mod course;
pub use course::{CatalogRow, Course, CourseCreate};

mod module;
pub use module::{CourseModule, CourseModuleCreate, ModuleProgressRow};

mod quiz;
pub use quiz::{Quiz, QuizCreate, QuizPassRow};

mod question;
pub use question::{Question, QuestionCreate, QuestionType};

mod quiz_option;
pub use quiz_option::{QuizOption, QuizOptionCreate};

mod enrollment;
pub use enrollment::{Enrollment, EnrollmentStatus};

mod video_view;
pub use video_view::{VideoView, ViewState};

mod quiz_attempt;
pub use quiz_attempt::{AttemptReportRow, QuizAttempt, QuizAttemptCreate};

mod certificate;
pub use certificate::{Certificate, CertificateSummaryRow};

mod certificate_token;
pub use certificate_token::{CertificateToken, CertificateTokenCreate};
