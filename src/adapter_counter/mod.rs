use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

/// Process-wide monotonic identifier source, shared by releases and assets.
///
/// Clones hand out from the same sequence, the first identifier is `1`.
#[derive(Clone, Debug, Default)]
pub struct Counter(Arc<AtomicU64>);

impl crate::domain::prelude::IdGenerator for Counter {
    fn next_id(&self) -> u64 {
        self.0.fetch_add(1, Ordering::Relaxed) + 1
    }
}
