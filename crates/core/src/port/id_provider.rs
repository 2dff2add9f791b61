// ID Provider Port (for deterministic testing)

/// ID provider interface (allows deterministic IDs in tests)
pub trait IdProvider: Send + Sync {
    /// Generate a new candidate job ID
    fn generate_id(&self) -> String;
}

/// Time-ordered UUID v7 provider (production)
pub struct UuidProvider;

impl IdProvider for UuidProvider {
    fn generate_id(&self) -> String {
        uuid::Uuid::now_v7().to_string()
    }
}

// ============================================================================
// Mock Implementations for Testing
// ============================================================================

pub mod mocks {
    use super::*;
    use std::collections::VecDeque;
    use std::sync::atomic::{AtomicU64, Ordering};
    use std::sync::Mutex;

    /// Yields the scripted ids in order, then counter-based fallbacks.
    ///
    /// Scripting the same id twice exercises the allocator's collision
    /// retry path.
    pub struct ScriptedIdProvider {
        script: Mutex<VecDeque<String>>,
        fallback: AtomicU64,
    }

    impl ScriptedIdProvider {
        pub fn new<I, S>(ids: I) -> Self
        where
            I: IntoIterator<Item = S>,
            S: Into<String>,
        {
            Self {
                script: Mutex::new(ids.into_iter().map(Into::into).collect()),
                fallback: AtomicU64::new(1),
            }
        }
    }

    impl IdProvider for ScriptedIdProvider {
        fn generate_id(&self) -> String {
            if let Some(id) = self.script.lock().unwrap().pop_front() {
                return id;
            }
            let n = self.fallback.fetch_add(1, Ordering::SeqCst);
            format!("fallback-{}", n)
        }
    }
}
