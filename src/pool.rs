//! Fixed-capacity beam pool with an intrusive freelist.
//!
//! The pool owns every beam slot by value in parallel arrays; nothing is
//! heap-allocated per beam. Free slots form a singly-linked list threaded
//! through the slots themselves, giving O(1) allocate and release with no
//! shuffling of live beams. Slot indices therefore stay stable for as long
//! as a beam is live, which the splat pass relies on.
//!
//! # Slot states
//!
//! | State | Meaning |
//! |-------|---------|
//! | `Free { next }` | On the freelist; `next` links to the following free slot |
//! | `Spawned` | Live; position/scale/speed/direction/color are valid |
//!
//! A slot is always in exactly one of the two states; the freelist link
//! and the live flag can never disagree.
//!
//! # Example
//!
//! ```
//! use vbpe::BeamPool;
//!
//! let mut pool = BeamPool::new(4);
//! let idx = pool.allocate().unwrap();
//! assert!(pool.is_live(idx));
//! pool.release(idx);
//! assert!(!pool.is_live(idx));
//! ```

use crate::color::Rgba;
use crate::direction::Direction;
use glam::Vec3;

/// Position given to released slots.
///
/// Far outside any valid volume, so a stale read during the same frame
/// cannot produce a visible voxel.
pub const PARKED: Vec3 = Vec3::splat(f32::MAX);

/// Lifecycle state of one pool slot.
///
/// When free, the slot carries its own freelist linkage; when spawned,
/// there is no linkage to carry. The enum makes the two cases mutually
/// exclusive by construction.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SlotState {
    /// On the freelist; `next` is the following free slot, if any.
    Free {
        /// Index of the next free slot, `None` at the list tail.
        next: Option<usize>,
    },
    /// Live and fully initialized.
    Spawned,
}

/// Fixed-capacity pool of beam particles.
///
/// Laid out struct-of-arrays: one contiguous array per field, indexed by
/// slot. Capacity is fixed at construction; `allocate` returns `None`
/// when the pool is exhausted, which callers treat as "skip this spawn".
#[derive(Clone, Debug)]
pub struct BeamPool {
    positions: Vec<Vec3>,
    scales: Vec<Vec3>,
    directions: Vec<Direction>,
    speeds: Vec<f32>,
    colors: Vec<Rgba>,
    slots: Vec<SlotState>,
    head: Option<usize>,
    tail: Option<usize>,
    live: usize,
}

impl BeamPool {
    /// Create a pool with `capacity` slots, all free.
    ///
    /// The freelist initially runs 0, 1, .., capacity-1.
    pub fn new(capacity: usize) -> Self {
        assert!(capacity > 0, "Pool capacity must be at least 1");
        let slots = (0..capacity)
            .map(|i| SlotState::Free {
                next: if i + 1 < capacity { Some(i + 1) } else { None },
            })
            .collect();
        Self {
            positions: vec![PARKED; capacity],
            scales: vec![Vec3::ONE; capacity],
            directions: vec![Direction::XPos; capacity],
            speeds: vec![0.0; capacity],
            colors: vec![Rgba::WHITE; capacity],
            slots,
            head: Some(0),
            tail: Some(capacity - 1),
            live: 0,
        }
    }

    /// Number of slots in the pool.
    #[inline]
    pub fn capacity(&self) -> usize {
        self.slots.len()
    }

    /// Number of currently live beams.
    #[inline]
    pub fn live_count(&self) -> usize {
        self.live
    }

    /// Whether slot `idx` currently holds a live beam.
    #[inline]
    pub fn is_live(&self, idx: usize) -> bool {
        matches!(self.slots[idx], SlotState::Spawned)
    }

    /// Pop a slot off the freelist and mark it spawned.
    ///
    /// Returns `None` when the pool is exhausted. The caller must
    /// initialize every beam field before the slot is simulated or
    /// rendered; an allocated-but-uninitialized slot is a contract
    /// violation.
    pub fn allocate(&mut self) -> Option<usize> {
        let idx = self.head?;
        let SlotState::Free { next } = self.slots[idx] else {
            unreachable!("freelist head points at a spawned slot");
        };
        self.head = next;
        // When the last free slot is taken the tail must follow, or a
        // later release would link through a stale index.
        if self.head.is_none() {
            self.tail = None;
        }
        self.slots[idx] = SlotState::Spawned;
        self.live += 1;
        Some(idx)
    }

    /// Return a live slot to the freelist.
    ///
    /// The slot's position is parked so a stale render read this frame
    /// draws nothing. Releasing a slot that is not live is a programmer
    /// error.
    pub fn release(&mut self, idx: usize) {
        assert!(
            self.is_live(idx),
            "release of slot {idx} which is not live"
        );
        self.positions[idx] = PARKED;
        self.slots[idx] = SlotState::Free { next: None };
        match self.tail {
            Some(tail) => {
                let SlotState::Free { next } = &mut self.slots[tail] else {
                    unreachable!("freelist tail points at a spawned slot");
                };
                *next = Some(idx);
            }
            // List was empty; the released slot becomes both ends.
            None => self.head = Some(idx),
        }
        self.tail = Some(idx);
        self.live -= 1;
    }

    /// Indices of all live slots, in ascending order.
    pub fn live_indices(&self) -> impl Iterator<Item = usize> + '_ {
        self.slots
            .iter()
            .enumerate()
            .filter(|(_, s)| matches!(s, SlotState::Spawned))
            .map(|(i, _)| i)
    }

    // ========== Per-slot field access ==========

    /// World-space center of beam `idx`.
    #[inline]
    pub fn position(&self, idx: usize) -> Vec3 {
        self.positions[idx]
    }

    /// Mutable access to beam `idx`'s position.
    #[inline]
    pub fn position_mut(&mut self, idx: usize) -> &mut Vec3 {
        debug_assert!(self.is_live(idx));
        &mut self.positions[idx]
    }

    /// Per-axis half-extent of beam `idx` (movement axis holds the length).
    #[inline]
    pub fn scale(&self, idx: usize) -> Vec3 {
        self.scales[idx]
    }

    /// Mutable access to beam `idx`'s half-extent.
    #[inline]
    pub fn scale_mut(&mut self, idx: usize) -> &mut Vec3 {
        debug_assert!(self.is_live(idx));
        &mut self.scales[idx]
    }

    /// Travel direction of beam `idx`.
    #[inline]
    pub fn direction(&self, idx: usize) -> Direction {
        self.directions[idx]
    }

    /// Set the travel direction of beam `idx`.
    #[inline]
    pub fn set_direction(&mut self, idx: usize, dir: Direction) {
        debug_assert!(self.is_live(idx));
        self.directions[idx] = dir;
    }

    /// Speed of beam `idx` along its movement axis.
    #[inline]
    pub fn speed(&self, idx: usize) -> f32 {
        self.speeds[idx]
    }

    /// Set the speed of beam `idx`.
    #[inline]
    pub fn set_speed(&mut self, idx: usize, speed: f32) {
        debug_assert!(self.is_live(idx));
        self.speeds[idx] = speed;
    }

    /// Color of beam `idx`.
    #[inline]
    pub fn color(&self, idx: usize) -> Rgba {
        self.colors[idx]
    }

    /// Set the color of beam `idx`.
    #[inline]
    pub fn set_color(&mut self, idx: usize, color: Rgba) {
        debug_assert!(self.is_live(idx));
        self.colors[idx] = color;
    }

    /// Walk the freelist from head and collect the visited indices.
    ///
    /// Test support: lets integrity checks compare the reachable set
    /// against the slot states. Walks at most `capacity` links, so a
    /// corrupted (cyclic) list is reported as a too-long chain rather
    /// than hanging.
    #[cfg(test)]
    fn free_chain(&self) -> Vec<usize> {
        let mut chain = Vec::new();
        let mut cursor = self.head;
        while let Some(idx) = cursor {
            chain.push(idx);
            if chain.len() > self.capacity() {
                break;
            }
            cursor = match self.slots[idx] {
                SlotState::Free { next } => next,
                SlotState::Spawned => None,
            };
        }
        chain
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rng::XorShift32;

    /// The freelist must visit exactly the free slots, each once, and the
    /// live set must be its complement.
    fn assert_integrity(pool: &BeamPool) {
        let chain = pool.free_chain();
        let mut seen = vec![false; pool.capacity()];
        for &idx in &chain {
            assert!(!seen[idx], "freelist visits slot {idx} twice");
            assert!(!pool.is_live(idx), "freelist contains live slot {idx}");
            seen[idx] = true;
        }
        for idx in 0..pool.capacity() {
            assert_eq!(
                pool.is_live(idx),
                !seen[idx],
                "slot {idx} state disagrees with freelist reachability"
            );
        }
        assert_eq!(pool.live_count(), pool.capacity() - chain.len());
    }

    #[test]
    fn test_new_pool_all_free() {
        let pool = BeamPool::new(8);
        assert_eq!(pool.capacity(), 8);
        assert_eq!(pool.live_count(), 0);
        assert_eq!(pool.free_chain(), (0..8).collect::<Vec<_>>());
        assert_integrity(&pool);
    }

    #[test]
    fn test_exhaustion_and_reuse() {
        let mut pool = BeamPool::new(3);
        let a = pool.allocate().unwrap();
        let b = pool.allocate().unwrap();
        let c = pool.allocate().unwrap();
        assert_eq!(pool.allocate(), None);
        assert_eq!(pool.live_count(), 3);

        pool.release(b);
        let d = pool.allocate().unwrap();
        assert_eq!(d, b);
        assert_eq!(pool.allocate(), None);
        assert_integrity(&pool);

        let _ = (a, c);
    }

    #[test]
    fn test_single_slot_pool() {
        let mut pool = BeamPool::new(1);
        let idx = pool.allocate().unwrap();
        assert_eq!(pool.allocate(), None);
        pool.release(idx);
        assert_integrity(&pool);
        assert_eq!(pool.allocate(), Some(idx));
    }

    #[test]
    fn test_drain_then_refill_keeps_tail_synced() {
        let mut pool = BeamPool::new(2);
        let a = pool.allocate().unwrap();
        let b = pool.allocate().unwrap();
        // List is now empty; both head and tail must be cleared, or the
        // first release would link through a stale tail index.
        pool.release(a);
        pool.release(b);
        assert_eq!(pool.free_chain(), vec![a, b]);
        assert_integrity(&pool);
        assert_eq!(pool.allocate(), Some(a));
        assert_eq!(pool.allocate(), Some(b));
        assert_eq!(pool.allocate(), None);
    }

    #[test]
    fn test_release_parks_position() {
        let mut pool = BeamPool::new(2);
        let idx = pool.allocate().unwrap();
        *pool.position_mut(idx) = Vec3::new(1.0, 2.0, 3.0);
        pool.release(idx);
        assert_eq!(pool.position(idx), PARKED);
    }

    #[test]
    #[should_panic(expected = "not live")]
    fn test_double_release_panics() {
        let mut pool = BeamPool::new(2);
        let idx = pool.allocate().unwrap();
        pool.release(idx);
        pool.release(idx);
    }

    #[test]
    fn test_live_indices_matches_states() {
        let mut pool = BeamPool::new(5);
        let a = pool.allocate().unwrap();
        let b = pool.allocate().unwrap();
        let c = pool.allocate().unwrap();
        pool.release(b);
        let live: Vec<usize> = pool.live_indices().collect();
        assert_eq!(live, vec![a, c]);
    }

    #[test]
    fn test_randomized_interleaving_integrity() {
        let mut pool = BeamPool::new(16);
        let mut rng = XorShift32::new(777);
        let mut live: Vec<usize> = Vec::new();
        for _ in 0..2000 {
            if rng.next_u32() % 2 == 0 {
                if let Some(idx) = pool.allocate() {
                    live.push(idx);
                }
            } else if !live.is_empty() {
                let pick = rng.next_index(live.len() as u32) as usize;
                let idx = live.swap_remove(pick);
                pool.release(idx);
            }
            assert_integrity(&pool);
        }
    }
}
