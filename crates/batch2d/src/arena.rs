use crate::{InstanceRecord, PrimitiveInstance, RendererConfig, SpriteInstance, TextVertex};

/// Location of a record: a ring slot and an index inside that slot's region.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct InstanceHandle {
    slot: usize,
    index: u32,
}

impl InstanceHandle {
    pub(crate) fn new(slot: usize, index: u32) -> Self {
        Self { slot, index }
    }

    pub fn slot(&self) -> usize {
        self.slot
    }

    pub fn index(&self) -> u32 {
        self.index
    }
}

/// CPU staging storage for one category: `slot_count` regions of `capacity` records,
/// laid out exactly like the GPU ring buffer they are uploaded into.
#[derive(Debug)]
pub struct InstanceArena<T> {
    records: Vec<T>,
    capacity: u32,
    slot_count: usize,
}

impl<T: InstanceRecord> InstanceArena<T> {
    pub fn new(capacity: u32, slot_count: usize) -> Self {
        Self {
            records: vec![T::zeroed(); capacity as usize * slot_count],
            capacity,
            slot_count,
        }
    }

    fn region(&self, slot: usize, index: u32, len: usize) -> std::ops::Range<usize> {
        assert!(
            slot < self.slot_count,
            "{} arena has {} slots, got slot {}",
            T::CATEGORY.label(),
            self.slot_count,
            slot
        );
        let fits = (index as usize)
            .checked_add(len)
            .is_some_and(|end| end <= self.capacity as usize);
        assert!(
            fits,
            "{} arena write out of bounds: {} + {} records, capacity {}",
            T::CATEGORY.label(),
            index,
            len,
            self.capacity
        );
        let start = slot * self.capacity as usize + index as usize;
        start..start + len
    }

    pub fn write(&mut self, handle: InstanceHandle, record: T) {
        let range = self.region(handle.slot, handle.index, 1);
        self.records[range.start] = record;
    }

    /// Writes consecutive records starting at `handle`.
    pub fn write_run(&mut self, handle: InstanceHandle, records: &[T]) {
        let range = self.region(handle.slot, handle.index, records.len());
        self.records[range].copy_from_slice(records);
    }

    pub fn get(&self, handle: InstanceHandle) -> &T {
        let range = self.region(handle.slot, handle.index, 1);
        &self.records[range.start]
    }

    /// The first `len` records of `slot`, ready for upload.
    pub fn slot_records(&self, slot: usize, len: u32) -> &[T] {
        let range = self.region(slot, 0, len as usize);
        &self.records[range]
    }

    pub fn capacity(&self) -> u32 {
        self.capacity
    }

    pub fn slot_count(&self) -> usize {
        self.slot_count
    }
}

/// One arena per category.
#[derive(Debug)]
pub struct FrameArenas {
    pub sprites: InstanceArena<SpriteInstance>,
    pub primitives: InstanceArena<PrimitiveInstance>,
    pub text: InstanceArena<TextVertex>,
}

impl FrameArenas {
    pub fn new(config: &RendererConfig) -> Self {
        use crate::Category;

        let slots = config.frames_in_flight;
        Self {
            sprites: InstanceArena::new(config.capacities[Category::Sprite], slots),
            primitives: InstanceArena::new(config.capacities[Category::ShapePrimitive], slots),
            text: InstanceArena::new(config.capacities[Category::Text], slots),
        }
    }
}
