// Health Probe Port

use async_trait::async_trait;

/// Readiness probe against a service endpoint
///
/// Implementations:
/// - HttpHealthProbe: bounded-timeout HTTP GET
#[async_trait]
pub trait HealthProbe: Send + Sync {
    /// True if the endpoint answered at all. Any response counts;
    /// only a transport failure means the service is down.
    async fn is_healthy(&self, endpoint: &str) -> bool;
}

// ============================================================================
// Mock Implementations for Testing
// ============================================================================

pub mod mocks {
    use super::*;
    use std::sync::{Arc, Mutex};

    /// Mock HealthProbe with a toggleable answer
    pub struct MockHealthProbe {
        healthy: Arc<Mutex<bool>>,
        call_count: Arc<Mutex<usize>>,
    }

    impl MockHealthProbe {
        pub fn new(healthy: bool) -> Self {
            Self {
                healthy: Arc::new(Mutex::new(healthy)),
                call_count: Arc::new(Mutex::new(0)),
            }
        }

        pub fn set_healthy(&self, healthy: bool) {
            *self.healthy.lock().unwrap() = healthy;
        }

        pub fn call_count(&self) -> usize {
            *self.call_count.lock().unwrap()
        }
    }

    #[async_trait]
    impl HealthProbe for MockHealthProbe {
        async fn is_healthy(&self, _endpoint: &str) -> bool {
            *self.call_count.lock().unwrap() += 1;
            *self.healthy.lock().unwrap()
        }
    }
}
