pub mod cors;
pub mod rate_limiter;

pub use cors::create_cors;
pub use rate_limiter::RateLimitMiddleware;
