pub mod rate_limit;
pub mod request_id;

pub use rate_limit::{rate_limit_middleware, HttpRateLimiter};
pub use request_id::{request_id_middleware, RequestId};
