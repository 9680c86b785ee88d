mod context;
pub use context::{AuthenticatedUser, RequestContext};

mod error;
pub use error::{WebError, WebResult};

mod extract;
pub use extract::Json;

pub mod dto;
pub mod middlewares;
pub mod response;

mod state;
pub use state::AppState;

pub mod routes;

pub mod doc;
