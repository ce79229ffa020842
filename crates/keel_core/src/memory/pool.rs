//! # Pool Allocator
//!
//! Fixed-capacity slot allocator backing every component capability.

/// A pool allocator for one component type.
///
/// Every slot is created up front; allocation pops a free index and
/// freeing pushes it back. Slot generations make a handle to a recycled
/// slot resolve to `None` instead of aliasing the new occupant.
///
/// # Thread Safety
///
/// This pool is NOT thread-safe. It is only touched from the frame thread.
///
/// # Example
///
/// ```rust,ignore
/// let mut pool: PoolAllocator<SceneComponent> = PoolAllocator::new(256);
///
/// // Allocate - O(1), no heap allocation
/// let handle = pool.allocate(SceneComponent::default())?;
///
/// // Free - O(1), the slot goes back on the free list
/// pool.free(handle);
/// ```
#[derive(Debug)]
pub struct PoolAllocator<T> {
    /// The storage array.
    storage: Box<[Slot<T>]>,
    /// Free list - indices of available slots.
    free_list: Vec<u32>,
    /// Number of allocated objects.
    allocated_count: usize,
}

#[derive(Debug)]
struct Slot<T> {
    generation: u32,
    value: Option<T>,
}

/// Handle to an allocated object in a pool.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PoolHandle {
    /// Index into the pool.
    index: u32,
    /// Generation of the slot when the handle was issued.
    generation: u32,
}

impl PoolHandle {
    /// Slot index inside the pool.
    #[inline]
    #[must_use]
    pub const fn index(self) -> u32 {
        self.index
    }

    /// Slot generation the handle was issued for.
    #[inline]
    #[must_use]
    pub const fn generation(self) -> u32 {
        self.generation
    }
}

impl<T> PoolAllocator<T> {
    /// Creates a new pool with the specified capacity.
    ///
    /// All memory is pre-allocated upfront.
    ///
    /// # Panics
    ///
    /// Panics if capacity is zero or exceeds `u32::MAX`. Configured
    /// capacities are validated before they reach this point.
    #[must_use]
    pub fn new(capacity: usize) -> Self {
        assert!(capacity > 0, "Capacity must be greater than zero");
        let Ok(top) = u32::try_from(capacity) else {
            panic!("Capacity cannot exceed u32::MAX");
        };

        let storage: Vec<Slot<T>> = (0..capacity)
            .map(|_| Slot {
                generation: 0,
                value: None,
            })
            .collect();

        // Lowest index is handed out first.
        let free_list: Vec<u32> = (0..top).rev().collect();

        Self {
            storage: storage.into_boxed_slice(),
            free_list,
            allocated_count: 0,
        }
    }

    /// Returns the total capacity.
    #[inline]
    #[must_use]
    pub fn capacity(&self) -> usize {
        self.storage.len()
    }

    /// Returns the number of currently allocated objects.
    #[inline]
    #[must_use]
    pub const fn allocated_count(&self) -> usize {
        self.allocated_count
    }

    /// Returns the number of free slots.
    #[inline]
    #[must_use]
    pub fn free_count(&self) -> usize {
        self.free_list.len()
    }

    /// Allocates a slot and stores the object.
    ///
    /// Returns `None` when the pool is full; the value is dropped.
    pub fn allocate(&mut self, value: T) -> Option<PoolHandle> {
        let index = self.free_list.pop()?;
        let slot = &mut self.storage[index as usize];

        slot.value = Some(value);
        self.allocated_count += 1;

        Some(PoolHandle {
            index,
            generation: slot.generation,
        })
    }

    /// Frees an allocated object and returns it.
    ///
    /// Returns `None` if the handle is out of range, already freed, or stale.
    pub fn free(&mut self, handle: PoolHandle) -> Option<T> {
        let slot = self.storage.get_mut(handle.index as usize)?;
        if slot.generation != handle.generation {
            return None;
        }

        let value = slot.value.take()?;
        slot.generation = slot.generation.wrapping_add(1);
        self.free_list.push(handle.index);
        self.allocated_count -= 1;

        Some(value)
    }

    /// Gets a reference to an allocated object.
    #[inline]
    #[must_use]
    pub fn get(&self, handle: PoolHandle) -> Option<&T> {
        let slot = self.storage.get(handle.index as usize)?;
        if slot.generation != handle.generation {
            return None;
        }
        slot.value.as_ref()
    }

    /// Gets a mutable reference to an allocated object.
    #[inline]
    pub fn get_mut(&mut self, handle: PoolHandle) -> Option<&mut T> {
        let slot = self.storage.get_mut(handle.index as usize)?;
        if slot.generation != handle.generation {
            return None;
        }
        slot.value.as_mut()
    }

    /// Iterates over all allocated objects.
    pub fn iter(&self) -> impl Iterator<Item = (PoolHandle, &T)> {
        self.storage.iter().zip(0u32..).filter_map(|(slot, index)| {
            slot.value.as_ref().map(|v| {
                (
                    PoolHandle {
                        index,
                        generation: slot.generation,
                    },
                    v,
                )
            })
        })
    }
}
