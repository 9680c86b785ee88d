use serde::{Deserialize, Serialize};

use crate::model::entity::Enrollment;
use crate::services::catalog::DEFAULT_PAGE_LIMIT;

#[derive(Debug, Clone, Deserialize, utoipa::IntoParams)]
#[into_params(parameter_in = Query)]
pub struct PaginationQuery {
    limit: Option<i64>,
    offset: Option<i64>,
}

impl PaginationQuery {
    pub fn limit(&self) -> i64 {
        self.limit.unwrap_or(DEFAULT_PAGE_LIMIT)
    }

    pub fn offset(&self) -> i64 {
        self.offset.unwrap_or(0)
    }
}

#[derive(Debug, Serialize, utoipa::ToSchema)]
pub struct EnrollResponse {
    pub enrollment: Enrollment,
    pub created: bool,
}
