//! Transposition table for caching search results.
//!
//! Entries are keyed by Zobrist hash and stored lock-free: each slot holds
//! the packed entry and `hash ^ packed` in two atomics, so a torn read from
//! a concurrent writer fails verification and reads as a miss. The table can
//! therefore be shared (`Arc`) between the engine facade and a background
//! search thread without locking.

use std::mem;
use std::sync::atomic::{AtomicU64, Ordering};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::board::Move;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum BoundType {
    Exact,      // Score is the exact value
    LowerBound, // Score is at least this value (failed high - score >= beta)
    UpperBound, // Score is at most this value (failed low - score <= alpha)
}

impl BoundType {
    // Never zero, so a packed entry is never all zero bits
    fn to_bits(self) -> u64 {
        match self {
            BoundType::Exact => 1,
            BoundType::LowerBound => 2,
            BoundType::UpperBound => 3,
        }
    }

    fn from_bits(v: u64) -> Self {
        match v & 0x3 {
            2 => BoundType::LowerBound,
            3 => BoundType::UpperBound,
            _ => BoundType::Exact,
        }
    }
}

/// Unpacked entry
#[derive(Clone, Copy, Debug)]
pub struct TTEntry {
    depth: u8,
    score: i32,
    bound_type: BoundType,
    best_move: Option<Move>,
    generation: u8,
}

impl TTEntry {
    #[must_use]
    pub fn depth(&self) -> u32 {
        u32::from(self.depth)
    }

    /// Stored score. Mate scores are relative to the node that stored them.
    #[must_use]
    pub fn score(&self) -> i32 {
        self.score
    }

    #[must_use]
    pub fn bound_type(&self) -> BoundType {
        self.bound_type
    }

    #[must_use]
    pub fn best_move(&self) -> Option<Move> {
        self.best_move
    }

    #[must_use]
    pub fn generation(&self) -> u8 {
        self.generation
    }
}

/// Packed entry format (64 bits):
/// - bits 0-15:  move (u16, 0 = no move)
/// - bits 16-47: score (i32 as u32)
/// - bits 48-55: depth (u8)
/// - bits 56-63: bound (2 bits, never 0) + generation (6 bits)
fn pack_entry(
    depth: u8,
    score: i32,
    bound_type: BoundType,
    best_move: Option<Move>,
    generation: u8,
) -> u64 {
    let mv = u64::from(best_move.map_or(0, Move::as_u16));
    let bound_gen = bound_type.to_bits() | (u64::from(generation & 0x3F) << 2);

    mv | (u64::from(score as u32) << 16) | (u64::from(depth) << 48) | (bound_gen << 56)
}

fn unpack_entry(data: u64) -> TTEntry {
    let mv_bits = (data & 0xFFFF) as u16;
    let score = ((data >> 16) & 0xFFFF_FFFF) as u32 as i32;
    let depth = ((data >> 48) & 0xFF) as u8;
    let bound_gen = data >> 56;

    TTEntry {
        depth,
        score,
        bound_type: BoundType::from_bits(bound_gen),
        best_move: (mv_bits != 0).then(|| Move::from_u16(mv_bits)),
        generation: ((bound_gen >> 2) & 0x3F) as u8,
    }
}

#[repr(C)]
struct TTSlot {
    /// hash ^ packed
    key_xor: AtomicU64,
    data: AtomicU64,
}

impl TTSlot {
    fn new() -> Self {
        TTSlot {
            key_xor: AtomicU64::new(0),
            data: AtomicU64::new(0),
        }
    }

    fn store(&self, hash: u64, packed: u64) {
        self.data.store(packed, Ordering::Relaxed);
        self.key_xor.store(hash ^ packed, Ordering::Relaxed);
    }

    fn probe(&self, hash: u64) -> Option<TTEntry> {
        let key_xor = self.key_xor.load(Ordering::Relaxed);
        let data = self.data.load(Ordering::Relaxed);

        if data != 0 && key_xor ^ data == hash {
            Some(unpack_entry(data))
        } else {
            None
        }
    }

    fn is_empty(&self) -> bool {
        self.data.load(Ordering::Relaxed) == 0
    }

    fn clear(&self) {
        self.key_xor.store(0, Ordering::Relaxed);
        self.data.store(0, Ordering::Relaxed);
    }

    /// (depth, generation) of whatever the slot holds
    fn priority_parts(&self) -> (u8, u8) {
        let data = self.data.load(Ordering::Relaxed);
        (((data >> 48) & 0xFF) as u8, ((data >> 58) & 0x3F) as u8)
    }
}

const BUCKET_SIZE: usize = 4;

#[repr(C)]
struct TTBucket {
    slots: [TTSlot; BUCKET_SIZE],
}

impl TTBucket {
    fn new() -> Self {
        TTBucket {
            slots: [TTSlot::new(), TTSlot::new(), TTSlot::new(), TTSlot::new()],
        }
    }
}

pub struct TranspositionTable {
    buckets: Vec<TTBucket>,
    mask: usize,
}

impl TranspositionTable {
    /// Create a table of roughly `size_mb` megabytes (rounded down to a
    /// power-of-two bucket count, at least 1024 buckets).
    #[must_use]
    pub fn new(size_mb: usize) -> Self {
        let bucket_bytes = mem::size_of::<TTBucket>();
        let requested = size_mb.saturating_mul(1024 * 1024) / bucket_bytes;
        let num_buckets = if requested < 1024 {
            1024
        } else {
            1usize << (usize::BITS - 1 - requested.leading_zeros())
        };

        let buckets = (0..num_buckets).map(|_| TTBucket::new()).collect();
        TranspositionTable {
            buckets,
            mask: num_buckets - 1,
        }
    }

    #[inline]
    fn index(&self, hash: u64) -> usize {
        (hash as usize) & self.mask
    }

    /// Number of entry slots
    #[must_use]
    pub fn capacity(&self) -> usize {
        self.buckets.len() * BUCKET_SIZE
    }

    /// Entry whose stored key matches `hash` exactly, if any
    #[must_use]
    pub fn probe(&self, hash: u64) -> Option<TTEntry> {
        self.buckets[self.index(hash)]
            .slots
            .iter()
            .find_map(|slot| slot.probe(hash))
    }

    /// Store an entry. A slot already holding this hash or an empty slot is
    /// used first; otherwise the slot with the shallowest, oldest entry is
    /// replaced.
    pub fn store(
        &self,
        hash: u64,
        depth: u32,
        score: i32,
        bound_type: BoundType,
        best_move: Option<Move>,
        generation: u16,
    ) {
        let depth = depth.min(255) as u8;
        let generation = (generation & 0x3F) as u8;
        let packed = pack_entry(depth, score, bound_type, best_move, generation);
        let bucket = &self.buckets[self.index(hash)];

        for slot in &bucket.slots {
            if slot.is_empty() || slot.probe(hash).is_some() {
                slot.store(hash, packed);
                return;
            }
        }

        let victim = bucket
            .slots
            .iter()
            .min_by_key(|slot| {
                let (slot_depth, slot_gen) = slot.priority_parts();
                let age = generation.wrapping_sub(slot_gen) & 0x3F;
                i32::from(slot_depth) * 2 - i32::from(age)
            })
            .unwrap_or(&bucket.slots[0]);
        victim.store(hash, packed);
    }

    /// Table fullness in per mille, sampled over the first 1000 buckets
    #[must_use]
    pub fn hashfull_per_mille(&self) -> u32 {
        let sample = self.buckets.len().min(1000);
        let occupied = self
            .buckets
            .iter()
            .take(sample)
            .flat_map(|bucket| bucket.slots.iter())
            .filter(|slot| !slot.is_empty())
            .count();
        ((occupied * 1000) / (sample * BUCKET_SIZE)) as u32
    }

    /// Remove every entry
    pub fn clear(&self) {
        for bucket in &self.buckets {
            for slot in &bucket.slots {
                slot.clear();
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::Square;

    #[test]
    fn pack_unpack_preserves_fields() {
        let mv = Move::quiet(Square::E1, Square::E8);
        let cases = [
            (10u8, 500, BoundType::Exact, Some(mv), 5u8),
            (255u8, -999_000, BoundType::LowerBound, None, 63u8),
            (0u8, 0, BoundType::UpperBound, Some(Move::from_u16(0xFFFF)), 0u8),
        ];

        for (depth, score, bound, mv, gen) in cases {
            let entry = unpack_entry(pack_entry(depth, score, bound, mv, gen));
            assert_eq!(entry.depth, depth);
            assert_eq!(entry.score, score);
            assert_eq!(entry.bound_type, bound);
            assert_eq!(entry.best_move, mv);
            assert_eq!(entry.generation, gen);
        }
    }

    #[test]
    fn zero_entry_is_not_empty() {
        let tt = TranspositionTable::new(1);
        tt.store(42, 0, 0, BoundType::Exact, None, 0);
        let entry = tt.probe(42).expect("stored entry");
        assert_eq!(entry.score(), 0);
        assert_eq!(entry.depth(), 0);
    }

    #[test]
    fn store_and_probe() {
        let tt = TranspositionTable::new(1);
        let hash = 0x1234_5678_9ABC_DEF0;

        tt.store(hash, 10, 500, BoundType::Exact, None, 1);

        let entry = tt.probe(hash).expect("should find entry");
        assert_eq!(entry.depth(), 10);
        assert_eq!(entry.score(), 500);
        assert_eq!(entry.bound_type(), BoundType::Exact);
    }

    #[test]
    fn no_false_positives() {
        let tt = TranspositionTable::new(1);
        tt.store(0x1234_5678_9ABC_DEF0, 10, 500, BoundType::Exact, None, 1);
        assert!(tt.probe(0xFEDC_BA98_7654_3210).is_none());
    }

    #[test]
    fn same_hash_overwrites() {
        let tt = TranspositionTable::new(1);
        tt.store(7, 3, 10, BoundType::UpperBound, None, 1);
        tt.store(7, 5, -20, BoundType::LowerBound, None, 1);
        let entry = tt.probe(7).expect("entry");
        assert_eq!(entry.depth(), 5);
        assert_eq!(entry.score(), -20);
        assert_eq!(entry.bound_type(), BoundType::LowerBound);
    }

    #[test]
    fn full_bucket_evicts_shallowest() {
        let tt = TranspositionTable::new(1);
        let stride = (tt.mask + 1) as u64;
        // five keys mapping to bucket 3
        let keys: Vec<u64> = (1..=5).map(|i| 3 + i * stride).collect();
        for (i, &key) in keys.iter().take(4).enumerate() {
            tt.store(key, 10 + i as u32, 0, BoundType::Exact, None, 1);
        }
        tt.store(keys[4], 20, 0, BoundType::Exact, None, 1);
        assert!(tt.probe(keys[0]).is_none(), "depth 10 entry should go");
        assert!(tt.probe(keys[4]).is_some());
        assert!(tt.probe(keys[3]).is_some());
    }

    #[test]
    fn clear_and_hashfull() {
        let tt = TranspositionTable::new(1);
        assert_eq!(tt.hashfull_per_mille(), 0);
        for i in 0..4000u64 {
            tt.store(i, 1, 0, BoundType::Exact, None, 0);
        }
        assert!(tt.hashfull_per_mille() > 0);
        tt.clear();
        assert_eq!(tt.hashfull_per_mille(), 0);
        assert!(tt.probe(1).is_none());
    }
}
