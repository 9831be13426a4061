use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{Duration, SystemTime};

/// 2025-01-01T00:00:00Z.
const EPOCH: Duration = Duration::from_millis(1_735_689_600_000);

const NODE_BITS: u32 = 10;
const SEQUENCE_BITS: u32 = 12;
const SEQUENCE_MASK: u64 = (1 << SEQUENCE_BITS) - 1;
const NODE_MASK: u64 = (1 << NODE_BITS) - 1;

/// A lock-free generator of collision-resistant 64-bit identifiers.
///
/// Identifiers are laid out as a 42-bit timestamp in milliseconds, a 10-bit node number,
/// and a 12-bit sequence number, so they sort by creation time.
/// The generator never blocks: once the sequence of the current millisecond is exhausted,
/// or if the system clock goes backwards, it carries on from the last timestamp issued.
#[derive(Debug)]
pub struct IdGenerator {
    node: u64,
    state: AtomicU64,
}

impl Default for IdGenerator {
    fn default() -> Self {
        Self::new(0)
    }
}

impl IdGenerator {
    /// A generator for the given node, of which only the 10 lowest bits are kept.
    pub fn new(node: u16) -> Self {
        IdGenerator {
            node: u64::from(node) & NODE_MASK,
            state: AtomicU64::new(0),
        }
    }

    /// Generates the next identifier.
    pub fn next<T: From<u64>>(&self) -> T {
        let now = SystemTime::now()
            .duration_since(SystemTime::UNIX_EPOCH)
            .unwrap_or_default()
            .saturating_sub(EPOCH)
            .as_millis() as u64;

        let advance = |current: u64| (now << SEQUENCE_BITS).max(current + 1);

        let state = match self
            .state
            .fetch_update(Ordering::AcqRel, Ordering::Acquire, |s| Some(advance(s)))
        {
            Ok(previous) | Err(previous) => advance(previous),
        };

        let timestamp = state >> SEQUENCE_BITS;
        let sequence = state & SEQUENCE_MASK;
        T::from(timestamp << (NODE_BITS + SEQUENCE_BITS) | self.node << SEQUENCE_BITS | sequence)
    }
}
