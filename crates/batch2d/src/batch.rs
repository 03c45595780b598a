use crate::{Category, CategoryMap, RendererConfig};

/// Contiguous run of records inside one category's frame region.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct BatchRange {
    pub start: u32,
    pub count: u32,
}

impl BatchRange {
    pub const fn end(&self) -> u32 {
        self.start + self.count
    }
}

/// One draw call worth of same-category records.
///
/// Sprite and primitive batches count instances drawn over a shared unit quad;
/// text batches count fully expanded vertices.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DrawBatch {
    Sprites(BatchRange),
    Primitives(BatchRange),
    TextVertices(BatchRange),
}

impl DrawBatch {
    pub const fn new(category: Category, start: u32, count: u32) -> Self {
        let range = BatchRange { start, count };
        match category {
            Category::Sprite => DrawBatch::Sprites(range),
            Category::ShapePrimitive => DrawBatch::Primitives(range),
            Category::Text => DrawBatch::TextVertices(range),
        }
    }

    pub const fn category(&self) -> Category {
        match self {
            DrawBatch::Sprites(_) => Category::Sprite,
            DrawBatch::Primitives(_) => Category::ShapePrimitive,
            DrawBatch::TextVertices(_) => Category::Text,
        }
    }

    pub const fn range(&self) -> BatchRange {
        match *self {
            DrawBatch::Sprites(range)
            | DrawBatch::Primitives(range)
            | DrawBatch::TextVertices(range) => range,
        }
    }

    fn range_mut(&mut self) -> &mut BatchRange {
        match self {
            DrawBatch::Sprites(range)
            | DrawBatch::Primitives(range)
            | DrawBatch::TextVertices(range) => range,
        }
    }
}

/// Turns a stream of `(category, count)` appends into the shortest ordered batch list.
///
/// Consecutive appends of one category extend the open batch. Switching category opens
/// a new batch whose start is rounded up so that its byte offset is a multiple of the
/// binding alignment. Appends that would overflow a category's capacity, or open more
/// batches than allowed, panic.
#[derive(Debug)]
pub struct BatchCoalescer {
    next_start: CategoryMap<u32>,
    current: Option<Category>,
    batches: Vec<DrawBatch>,
    capacities: CategoryMap<u32>,
    alignment: CategoryMap<u32>,
    max_batches: usize,
}

impl BatchCoalescer {
    pub fn new(config: &RendererConfig) -> Self {
        Self {
            next_start: CategoryMap::splat(0),
            current: None,
            batches: Vec::with_capacity(config.max_batches),
            capacities: config.capacities,
            alignment: CategoryMap::from_fn(|c| c.alignment_count(config.alignment_bytes)),
            max_batches: config.max_batches,
        }
    }

    /// Forget everything recorded for the previous frame.
    pub fn reset(&mut self) {
        self.next_start = CategoryMap::splat(0);
        self.current = None;
        self.batches.clear();
    }

    /// Reserves `increment` records of `category` and returns the index of the first one.
    pub fn append(&mut self, category: Category, increment: u32) -> u32 {
        assert!(increment > 0, "empty {} append", category.label());

        let start = self.next_start[category];

        // Fast path: extend the open batch
        if self.current == Some(category) {
            self.check_capacity(category, start, increment);
            if let Some(batch) = self.batches.last_mut() {
                batch.range_mut().count += increment;
                self.next_start[category] = start + increment;
                return start;
            }
        }

        let alignment = self.alignment[category];
        let misalignment = start % alignment;
        let start = if misalignment != 0 {
            start + alignment - misalignment
        } else {
            start
        };

        self.check_capacity(category, start, increment);
        assert!(
            self.batches.len() < self.max_batches,
            "batch limit exceeded: {} batches per frame",
            self.max_batches
        );

        self.batches.push(DrawBatch::new(category, start, increment));
        self.current = Some(category);
        self.next_start[category] = start + increment;
        start
    }

    fn check_capacity(&self, category: Category, start: u32, increment: u32) {
        let capacity = self.capacities[category];
        let fits = start
            .checked_add(increment)
            .is_some_and(|end| end <= capacity);
        assert!(
            fits,
            "{} capacity exceeded: {} + {} records, capacity {}",
            category.label(),
            start,
            increment,
            capacity
        );
    }

    /// Batches in emission order.
    pub fn batches(&self) -> &[DrawBatch] {
        &self.batches
    }

    /// One past the last index used by `category` this frame, alignment gaps included.
    pub fn next_start(&self, category: Category) -> u32 {
        self.next_start[category]
    }

    pub fn current_category(&self) -> Option<Category> {
        self.current
    }

    pub fn capacity(&self, category: Category) -> u32 {
        self.capacities[category]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn coalescer() -> BatchCoalescer {
        BatchCoalescer::new(&RendererConfig::default())
    }

    #[test]
    fn test_same_category_extends_one_batch() {
        let mut c = coalescer();
        assert_eq!(c.append(Category::ShapePrimitive, 1), 0);
        assert_eq!(c.append(Category::ShapePrimitive, 1), 1);
        assert_eq!(c.batches(), &[DrawBatch::new(Category::ShapePrimitive, 0, 2)]);
    }

    #[test]
    fn test_interleaved_categories_keep_order() {
        let mut c = coalescer();
        assert_eq!(c.append(Category::Sprite, 1), 0);
        assert_eq!(c.append(Category::ShapePrimitive, 1), 0);
        assert_eq!(c.append(Category::Sprite, 1), 2);
        assert_eq!(
            c.batches(),
            &[
                DrawBatch::new(Category::Sprite, 0, 1),
                DrawBatch::new(Category::ShapePrimitive, 0, 1),
                DrawBatch::new(Category::Sprite, 2, 1),
            ]
        );
    }

    #[test]
    fn test_text_rounds_to_eight_vertices() {
        let mut c = coalescer();
        c.append(Category::Text, 6);
        c.append(Category::Sprite, 1);
        assert_eq!(c.append(Category::Text, 12), 8);
        assert_eq!(c.next_start(Category::Text), 20);
    }

    #[test]
    fn test_fast_path_does_not_realign() {
        let mut c = coalescer();
        c.append(Category::Sprite, 1);
        // Index 1 is odd but continues the open batch.
        assert_eq!(c.append(Category::Sprite, 1), 1);
        assert_eq!(c.append(Category::Sprite, 1), 2);
        assert_eq!(c.batches().len(), 1);
    }

    #[test]
    fn test_random_streams_hold_invariants() {
        let mut state = 0x2545_f491_4f6c_dd1du64;
        let mut next = move || {
            state = state.wrapping_mul(6364136223846793005).wrapping_add(1);
            (state >> 33) as u32
        };

        for _ in 0..50 {
            let mut c = coalescer();
            let mut requested = CategoryMap::splat(0u32);
            let mut first_seen = CategoryMap::splat(false);

            for _ in 0..200 {
                let category = Category::ALL[(next() % 3) as usize];
                let count = if category == Category::Text {
                    6 * (1 + next() % 4)
                } else {
                    1
                };
                requested[category] += count;
                c.append(category, count);
            }

            for pair in c.batches().windows(2) {
                assert_ne!(pair[0].category(), pair[1].category());
            }

            let mut totals = CategoryMap::splat(0u32);
            for batch in c.batches() {
                let category = batch.category();
                let range = batch.range();
                assert!(range.count > 0);
                assert!(range.end() <= c.capacity(category));
                if first_seen[category] {
                    assert_eq!(range.start % category.alignment_count(256), 0);
                }
                first_seen[category] = true;
                totals[category] += range.count;
            }
            assert_eq!(totals, requested);
        }
    }

    #[test]
    fn test_batches_never_overlap_within_category() {
        let mut c = coalescer();
        for i in 0..40 {
            let category = Category::ALL[i % 3];
            c.append(category, if category == Category::Text { 6 } else { 3 });
        }
        for category in Category::ALL {
            let ranges: Vec<_> = c
                .batches()
                .iter()
                .filter(|b| b.category() == category)
                .map(DrawBatch::range)
                .collect();
            for pair in ranges.windows(2) {
                assert!(pair[0].end() <= pair[1].start);
            }
        }
    }

    #[test]
    fn test_reset_clears_frame() {
        let mut c = coalescer();
        c.append(Category::Sprite, 3);
        c.append(Category::Text, 6);
        c.reset();

        assert!(c.batches().is_empty());
        assert_eq!(c.current_category(), None);
        for category in Category::ALL {
            assert_eq!(c.next_start(category), 0);
        }
        assert_eq!(c.append(Category::Text, 6), 0);
    }

    #[test]
    fn test_fill_to_exact_capacity() {
        let mut config = RendererConfig::default();
        config.capacities[Category::Sprite] = 4;
        let mut c = BatchCoalescer::new(&config);
        c.append(Category::Sprite, 2);
        c.append(Category::Sprite, 2);
        assert_eq!(c.next_start(Category::Sprite), 4);
    }

    #[test]
    #[should_panic(expected = "sprite capacity exceeded")]
    fn test_capacity_overflow_is_fatal() {
        let mut config = RendererConfig::default();
        config.capacities[Category::Sprite] = 4;
        let mut c = BatchCoalescer::new(&config);
        c.append(Category::Sprite, 3);
        c.append(Category::Sprite, 2);
    }

    #[test]
    #[should_panic(expected = "sprite capacity exceeded")]
    fn test_alignment_padding_counts_against_capacity() {
        let mut config = RendererConfig::default();
        config.capacities[Category::Sprite] = 4;
        let mut c = BatchCoalescer::new(&config);
        c.append(Category::Sprite, 3);
        c.append(Category::Text, 6);
        // Rounded start is 4, leaving no room.
        c.append(Category::Sprite, 1);
    }

    #[test]
    #[should_panic(expected = "batch limit exceeded")]
    fn test_batch_limit_is_fatal() {
        let mut config = RendererConfig::default();
        config.max_batches = 3;
        let mut c = BatchCoalescer::new(&config);
        c.append(Category::Sprite, 1);
        c.append(Category::ShapePrimitive, 1);
        c.append(Category::Sprite, 1);
        c.append(Category::ShapePrimitive, 1);
    }
}
