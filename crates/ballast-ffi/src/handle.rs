//! Slot+generation table mapping opaque `u64` handles to owned values.
//!
//! A destroyed handle keeps its slot index but carries an old generation,
//! so lookups through it return `None` instead of touching a reused slot.
//! Generations start at 1; the all-zero handle never resolves.

/// Upper 32 bits = slot index, lower 32 bits = generation.
fn encode(slot: u32, generation: u32) -> u64 {
    ((slot as u64) << 32) | (generation as u64)
}

fn decode(handle: u64) -> (u32, u32) {
    ((handle >> 32) as u32, handle as u32)
}

struct Slot<T> {
    generation: u32,
    data: Option<T>,
}

/// Handle table with slot reuse through a free list.
pub(crate) struct HandleTable<T> {
    slots: Vec<Slot<T>>,
    free_list: Vec<u32>,
}

impl<T> HandleTable<T> {
    /// An empty table.
    pub const fn new() -> Self {
        Self {
            slots: Vec::new(),
            free_list: Vec::new(),
        }
    }

    /// Store `value` and return its handle.
    pub fn insert(&mut self, value: T) -> u64 {
        if let Some(idx) = self.free_list.pop() {
            let slot = &mut self.slots[idx as usize];
            slot.data = Some(value);
            return encode(idx, slot.generation);
        }
        let idx = self.slots.len() as u32;
        self.slots.push(Slot {
            generation: 1,
            data: Some(value),
        });
        encode(idx, 1)
    }

    fn slot(&self, handle: u64) -> Option<&Slot<T>> {
        let (idx, generation) = decode(handle);
        self.slots
            .get(idx as usize)
            .filter(|s| s.generation == generation)
    }

    /// The value behind `handle`, or `None` if stale or never issued.
    pub fn get(&self, handle: u64) -> Option<&T> {
        self.slot(handle)?.data.as_ref()
    }

    fn slot_mut(&mut self, handle: u64) -> Option<&mut Slot<T>> {
        let (idx, generation) = decode(handle);
        self.slots
            .get_mut(idx as usize)
            .filter(|s| s.generation == generation)
    }

    /// Mutable access to the value behind `handle`.
    pub fn get_mut(&mut self, handle: u64) -> Option<&mut T> {
        self.slot_mut(handle)?.data.as_mut()
    }

    /// Take the value out and invalidate `handle`.
    ///
    /// A slot whose generation wraps to 0 is retired instead of reused.
    /// Removing a stale handle returns `None`.
    pub fn remove(&mut self, handle: u64) -> Option<T> {
        let slot = self.slot_mut(handle)?;
        let value = slot.data.take()?;
        slot.generation = slot.generation.wrapping_add(1);
        if slot.generation != 0 {
            self.free_list.push(decode(handle).0);
        }
        Some(value)
    }
}
