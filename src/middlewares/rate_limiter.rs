use crate::config::RateLimitConfig;
use crate::error::AppError;
use actix_web::http::Method;
use actix_web::{
    dev::{forward_ready, Service, ServiceRequest, ServiceResponse, Transform},
    Error,
};
use futures_util::future::LocalBoxFuture;
use std::collections::HashMap;
use std::future::{ready, Ready};
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

// Paths that never count against a client's quota
const EXEMPT_PREFIXES: &[&str] = &["/swagger-ui", "/api-docs"];

struct WindowSlot {
    window_start: Instant,
    count: u32,
}

/// Fixed-window request counter keyed by client address.
struct LimiterState {
    window: Duration,
    max_requests: u32,
    slots: HashMap<String, WindowSlot>,
}

impl LimiterState {
    fn new(window: Duration, max_requests: u32) -> Self {
        Self {
            window,
            max_requests,
            slots: HashMap::new(),
        }
    }

    fn check(&mut self, key: &str, now: Instant) -> bool {
        // Keep the map from growing without bound under churny client IPs
        if self.slots.len() > 1024 {
            let window = self.window;
            self.slots
                .retain(|_, slot| now.duration_since(slot.window_start) < window);
        }

        let slot = self
            .slots
            .entry(key.to_string())
            .or_insert_with(|| WindowSlot {
                window_start: now,
                count: 0,
            });

        if now.duration_since(slot.window_start) >= self.window {
            slot.window_start = now;
            slot.count = 0;
        }

        if slot.count >= self.max_requests {
            return false;
        }
        slot.count += 1;
        true
    }
}

// Clone shares the same counter state, so one instance can be handed to
// every server worker
#[derive(Clone)]
pub struct RateLimitMiddleware {
    state: Arc<Mutex<LimiterState>>,
}

impl RateLimitMiddleware {
    pub fn new(config: &RateLimitConfig) -> Self {
        Self {
            state: Arc::new(Mutex::new(LimiterState::new(
                Duration::from_secs(config.window_secs),
                config.max_requests,
            ))),
        }
    }
}

impl<S, B> Transform<S, ServiceRequest> for RateLimitMiddleware
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error>,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type InitError = ();
    type Transform = RateLimitMiddlewareService<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(RateLimitMiddlewareService {
            service,
            state: self.state.clone(),
        }))
    }
}

pub struct RateLimitMiddlewareService<S> {
    service: S,
    state: Arc<Mutex<LimiterState>>,
}

impl<S, B> Service<ServiceRequest> for RateLimitMiddlewareService<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error>,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    forward_ready!(service);

    fn call(&self, req: ServiceRequest) -> Self::Future {
        // Let CORS preflight requests through
        if req.method() == Method::OPTIONS {
            return Box::pin(self.service.call(req));
        }

        let path = req.path();
        if EXEMPT_PREFIXES.iter().any(|prefix| path.starts_with(prefix)) {
            return Box::pin(self.service.call(req));
        }

        let key = req
            .connection_info()
            .realip_remote_addr()
            .unwrap_or("unknown")
            .to_string();

        let allowed = {
            let mut state = self.state.lock().unwrap_or_else(|e| e.into_inner());
            state.check(&key, Instant::now())
        };

        if !allowed {
            log::warn!("Rate limit exceeded for {key}");
            return Box::pin(async move { Err(AppError::RateLimitExceeded.into()) });
        }

        Box::pin(self.service.call(req))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_limits_within_window() {
        let mut state = LimiterState::new(Duration::from_secs(60), 3);
        let now = Instant::now();

        assert!(state.check("10.0.0.1", now));
        assert!(state.check("10.0.0.1", now));
        assert!(state.check("10.0.0.1", now));
        assert!(!state.check("10.0.0.1", now));
    }

    #[test]
    fn test_clients_counted_independently() {
        let mut state = LimiterState::new(Duration::from_secs(60), 1);
        let now = Instant::now();

        assert!(state.check("10.0.0.1", now));
        assert!(!state.check("10.0.0.1", now));
        assert!(state.check("10.0.0.2", now));
    }

    #[test]
    fn test_window_resets() {
        let mut state = LimiterState::new(Duration::from_secs(60), 1);
        let start = Instant::now();

        assert!(state.check("10.0.0.1", start));
        assert!(!state.check("10.0.0.1", start));
        assert!(state.check("10.0.0.1", start + Duration::from_secs(61)));
    }
}
