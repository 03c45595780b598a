use std::ops::{Index, IndexMut};

use crate::{PrimitiveInstance, SpriteInstance, TextVertex};

/// Draw-call kind. Decides the record layout and which pipeline a batch binds.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Category {
    Sprite,
    ShapePrimitive,
    Text,
}

impl Category {
    pub const COUNT: usize = 3;
    pub const ALL: [Category; Self::COUNT] =
        [Category::Sprite, Category::ShapePrimitive, Category::Text];

    pub const fn index(self) -> usize {
        match self {
            Category::Sprite => 0,
            Category::ShapePrimitive => 1,
            Category::Text => 2,
        }
    }

    /// Size in bytes of one record of this category.
    pub const fn stride(self) -> usize {
        match self {
            Category::Sprite => std::mem::size_of::<SpriteInstance>(),
            Category::ShapePrimitive => std::mem::size_of::<PrimitiveInstance>(),
            Category::Text => std::mem::size_of::<TextVertex>(),
        }
    }

    /// Number of records spanning `alignment_bytes`. A batch that opens after a
    /// category switch starts on a multiple of this.
    pub const fn alignment_count(self, alignment_bytes: u32) -> u32 {
        let count = alignment_bytes / self.stride() as u32;
        if count == 0 {
            1
        } else {
            count
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            Category::Sprite => "sprite",
            Category::ShapePrimitive => "primitive",
            Category::Text => "text",
        }
    }
}

/// One value per [`Category`], indexable by category.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct CategoryMap<T>([T; Category::COUNT]);

impl<T> CategoryMap<T> {
    pub const fn new(sprite: T, primitive: T, text: T) -> Self {
        Self([sprite, primitive, text])
    }

    pub fn from_fn(mut f: impl FnMut(Category) -> T) -> Self {
        Self(Category::ALL.map(&mut f))
    }

    pub fn iter(&self) -> impl Iterator<Item = (Category, &T)> {
        Category::ALL.into_iter().zip(self.0.iter())
    }
}

impl<T: Copy> CategoryMap<T> {
    pub const fn splat(value: T) -> Self {
        Self([value; Category::COUNT])
    }
}

impl<T> Index<Category> for CategoryMap<T> {
    type Output = T;

    fn index(&self, category: Category) -> &T {
        &self.0[category.index()]
    }
}

impl<T> IndexMut<Category> for CategoryMap<T> {
    fn index_mut(&mut self, category: Category) -> &mut T {
        &mut self.0[category.index()]
    }
}
