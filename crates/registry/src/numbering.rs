//! List numbering allocation.
//!
//! Levels live in one arena and point at their parent by index. The allocator
//! keeps a stack of the active level indices: entering a list with an empty
//! stack starts a new shape, entering a nested list reuses the shape's level for
//! that depth or adds one. Both emitters drive the same allocator, the tree one
//! to name list styles and the flat one to number paragraphs.
use pressmark_types::Schema;
use std::fmt;

/// Identifier of a numbering definition.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum NumberingId {
    /// Tree schema list style name (`LC1`, `LC2`, ...).
    Style(String),
    /// Flat schema `w:numId`/`w:abstractNumId`.
    Numeric(u32),
}

impl fmt::Display for NumberingId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NumberingId::Style(name) => f.write_str(name),
            NumberingId::Numeric(id) => write!(f, "{id}"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListLevel {
    /// Index of the owning shape.
    pub shape: usize,
    /// Zero-based nesting depth.
    pub depth: usize,
    /// Arena index of the enclosing level.
    pub parent: Option<usize>,
    pub ordered: bool,
    /// Run properties inherited from the template, used for the level's label.
    pub font: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListShape {
    pub id: NumberingId,
    /// Arena indices of the levels, indexed by depth.
    pub levels: Vec<usize>,
    /// Number of list items rendered under this shape.
    pub items: usize,
}

#[derive(Debug)]
pub struct ListAllocator {
    schema: Schema,
    base: u32,
    shapes: Vec<ListShape>,
    levels: Vec<ListLevel>,
    stack: Vec<usize>,
}

impl ListAllocator {
    /// `base` is the first flat-schema numbering id; tree-schema ids start at `LC1`.
    pub fn new(schema: Schema, base: u32) -> Self {
        Self {
            schema,
            base,
            shapes: Vec::new(),
            levels: Vec::new(),
            stack: Vec::new(),
        }
    }

    /// Enters a list and returns its zero-based depth.
    pub fn enter_list(&mut self, ordered: bool) -> usize {
        let depth = self.stack.len();
        let parent = self.stack.last().copied();
        let shape = match parent {
            Some(parent) => self.levels[parent].shape,
            None => self.allocate_shape(),
        };

        let existing = self.shapes[shape].levels.get(depth).copied();
        let level = match existing {
            Some(existing) => existing,
            None => {
                let index = self.levels.len();
                self.levels.push(ListLevel {
                    shape,
                    depth,
                    parent,
                    ordered,
                    font: String::new(),
                });
                self.shapes[shape].levels.push(index);
                index
            }
        };
        self.stack.push(level);
        depth
    }

    /// Leaves the innermost list and returns its depth.
    pub fn leave_list(&mut self) -> Option<usize> {
        let level = self.stack.pop()?;
        Some(self.levels[level].depth)
    }

    /// The shape and depth of the innermost active list.
    pub fn current_level(&self) -> Option<(&ListShape, usize)> {
        let level = &self.levels[*self.stack.last()?];
        Some((&self.shapes[level.shape], level.depth))
    }

    /// Number of active lists.
    pub fn depth(&self) -> usize {
        self.stack.len()
    }

    /// Counts one item under the current shape.
    pub fn mark_item(&mut self) {
        if let Some(&level) = self.stack.last() {
            let shape = self.levels[level].shape;
            self.shapes[shape].items += 1;
        }
    }

    /// Sets the label font of the current level unless it already has one.
    pub fn inherit_font(&mut self, font: &str) {
        if let Some(&level) = self.stack.last()
            && self.levels[level].font.is_empty()
        {
            self.levels[level].font = font.to_string();
        }
    }

    pub fn shape(&self, index: usize) -> Option<&ListShape> {
        self.shapes.get(index)
    }

    /// Index of the shape owning the innermost active list.
    pub fn current_shape(&self) -> Option<usize> {
        self.stack.last().map(|&level| self.levels[level].shape)
    }

    /// Shapes that numbered at least one item, in allocation order.
    pub fn used_shapes(&self) -> impl Iterator<Item = &ListShape> {
        self.shapes.iter().filter(|shape| shape.items > 0)
    }

    /// Levels of a shape, outermost first.
    pub fn levels_of<'a>(&'a self, shape: &'a ListShape) -> impl Iterator<Item = &'a ListLevel> {
        shape.levels.iter().map(|&index| &self.levels[index])
    }

    pub fn len(&self) -> usize {
        self.shapes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.shapes.is_empty()
    }

    fn allocate_shape(&mut self) -> usize {
        let index = self.shapes.len();
        let id = match self.schema {
            Schema::Odt => NumberingId::Style(format!("LC{}", index + 1)),
            Schema::Docx => NumberingId::Numeric(self.base + index as u32),
        };
        log::debug!("allocating list shape {}", id);
        self.shapes.push(ListShape {
            id,
            levels: Vec::new(),
            items: 0,
        });
        index
    }
}
