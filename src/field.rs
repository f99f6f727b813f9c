use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;
use tracing::{debug, warn};

/// The two kinds of thing living in the field
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, strum_macros::Display)]
pub enum ItemKind {
    /// safe item, collecting it scores a point
    Clam,
    /// hazard item, touching it ends the run
    Crab,
}

impl ItemKind {
    pub fn glyph(&self) -> &'static str {
        match self {
            ItemKind::Clam => "🐚",
            ItemKind::Crab => "🦀",
        }
    }
}

/// Position of a slot inside the field grid
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Cell {
    pub col: u16,
    pub row: u16,
}

impl Cell {
    pub fn new(col: u16, row: u16) -> Self {
        Self { col, row }
    }
}

/// Most items of one kind a field will hold; larger counts are clamped
pub const MAX_ITEMS_PER_KIND: usize = 500;
/// Widest field, in slots
pub const MAX_COLUMNS: u16 = 64;

/// Grid of slots holding clams and crabs.
///
/// Rows are derived from the item counts so that every item always gets a
/// distinct slot, plus one spare row so the grid never looks packed. Counts
/// and width are clamped to [`MAX_ITEMS_PER_KIND`] and [`MAX_COLUMNS`], which
/// keeps every slot addressable by a `u16` cell.
#[derive(Debug)]
pub struct Field {
    columns: u16,
    rows: u16,
    clam_count: usize,
    crab_count: usize,
    slots: Vec<Option<ItemKind>>,
    rng: StdRng,
}

impl Field {
    pub fn new(clam_count: usize, crab_count: usize, columns: u16) -> Self {
        Self::with_rng(clam_count, crab_count, columns, StdRng::from_entropy())
    }

    /// Same as [`Field::new`] but every `init` is reproducible
    pub fn with_seed(clam_count: usize, crab_count: usize, columns: u16, seed: u64) -> Self {
        Self::with_rng(
            clam_count,
            crab_count,
            columns,
            StdRng::seed_from_u64(seed),
        )
    }

    fn with_rng(clam_count: usize, crab_count: usize, columns: u16, rng: StdRng) -> Self {
        let columns = columns.clamp(1, MAX_COLUMNS);
        let clamped_clams = clam_count.min(MAX_ITEMS_PER_KIND);
        let clamped_crabs = crab_count.min(MAX_ITEMS_PER_KIND);
        if clamped_clams != clam_count || clamped_crabs != crab_count {
            warn!(
                clams = clam_count,
                crabs = crab_count,
                max = MAX_ITEMS_PER_KIND,
                "item counts clamped to field capacity"
            );
        }
        let (clam_count, crab_count) = (clamped_clams, clamped_crabs);
        let rows = rows_for(clam_count + crab_count, columns);
        Self {
            columns,
            rows,
            clam_count,
            crab_count,
            slots: vec![None; columns as usize * rows as usize],
            rng,
        }
    }

    /// Clears the grid and scatters all items over distinct random slots
    pub fn init(&mut self) {
        self.clear();

        let mut order: Vec<usize> = (0..self.slots.len()).collect();
        order.shuffle(&mut self.rng);

        for (n, &idx) in order
            .iter()
            .take(self.clam_count + self.crab_count)
            .enumerate()
        {
            self.slots[idx] = Some(if n < self.clam_count {
                ItemKind::Clam
            } else {
                ItemKind::Crab
            });
        }

        debug!(
            clams = self.clam_count,
            crabs = self.crab_count,
            columns = self.columns,
            rows = self.rows,
            "field initialized"
        );
    }

    pub fn clear(&mut self) {
        self.slots.iter_mut().for_each(|slot| *slot = None);
    }

    /// Resolves a click on `cell`. Clams are collected (removed from the
    /// grid), crabs stay where they are.
    pub fn click(&mut self, cell: Cell) -> Option<ItemKind> {
        let idx = self.index(cell)?;
        let kind = self.slots[idx]?;
        if kind == ItemKind::Clam {
            self.slots[idx] = None;
        }
        Some(kind)
    }

    pub fn item_at(&self, cell: Cell) -> Option<ItemKind> {
        self.index(cell).and_then(|idx| self.slots[idx])
    }

    pub fn remaining(&self, kind: ItemKind) -> usize {
        self.slots.iter().filter(|slot| **slot == Some(kind)).count()
    }

    /// Occupied slots in row-major order
    pub fn items(&self) -> impl Iterator<Item = (Cell, ItemKind)> + '_ {
        let columns = self.columns as usize;
        self.slots.iter().enumerate().filter_map(move |(idx, slot)| {
            slot.map(|kind| {
                (
                    Cell::new((idx % columns) as u16, (idx / columns) as u16),
                    kind,
                )
            })
        })
    }

    /// Clams placed by every `init`, after clamping
    pub fn clam_count(&self) -> usize {
        self.clam_count
    }

    pub fn crab_count(&self) -> usize {
        self.crab_count
    }

    pub fn columns(&self) -> u16 {
        self.columns
    }

    pub fn rows(&self) -> u16 {
        self.rows
    }

    fn index(&self, cell: Cell) -> Option<usize> {
        if cell.col < self.columns && cell.row < self.rows {
            Some(cell.row as usize * self.columns as usize + cell.col as usize)
        } else {
            None
        }
    }
}

fn rows_for(items: usize, columns: u16) -> u16 {
    items
        .div_ceil(columns as usize)
        .checked_add(1)
        .and_then(|rows| u16::try_from(rows).ok())
        .unwrap_or(u16::MAX)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_field_is_empty() {
        let field = Field::with_seed(5, 5, 4, 7);
        assert_eq!(field.items().count(), 0);
        assert_eq!(field.remaining(ItemKind::Clam), 0);
    }

    #[test]
    fn test_rows_grow_to_fit_items() {
        let field = Field::with_seed(20, 20, 10, 1);
        assert_eq!(field.columns(), 10);
        assert_eq!(field.rows(), 5);

        let field = Field::with_seed(3, 0, 10, 1);
        assert_eq!(field.rows(), 2);
    }

    #[test]
    fn test_zero_columns_is_clamped() {
        let field = Field::with_seed(2, 2, 0, 1);
        assert_eq!(field.columns(), 1);
        assert_eq!(field.rows(), 5);
    }

    #[test]
    fn test_huge_counts_are_clamped_and_all_placed() {
        let mut field = Field::with_seed(65_536, usize::MAX, 1, 1);
        field.init();

        assert_eq!(field.clam_count(), MAX_ITEMS_PER_KIND);
        assert_eq!(field.crab_count(), MAX_ITEMS_PER_KIND);
        assert_eq!(field.remaining(ItemKind::Clam), MAX_ITEMS_PER_KIND);
        assert_eq!(field.remaining(ItemKind::Crab), MAX_ITEMS_PER_KIND);
        assert_eq!(field.rows() as usize, 2 * MAX_ITEMS_PER_KIND + 1);
    }

    #[test]
    fn test_largest_field_fits_cell_coordinates() {
        let mut field = Field::with_seed(MAX_ITEMS_PER_KIND, MAX_ITEMS_PER_KIND, u16::MAX, 2);
        field.init();

        assert_eq!(field.columns(), MAX_COLUMNS);
        assert!((field.columns() as usize) * (field.rows() as usize) <= u16::MAX as usize);
        assert_eq!(field.items().count(), 2 * MAX_ITEMS_PER_KIND);
        let last = Cell::new(field.columns() - 1, field.rows() - 1);
        assert_eq!(field.click(Cell::new(last.col, last.row + 1)), None);
    }

    #[test]
    fn test_rows_for_saturates() {
        assert_eq!(rows_for(usize::MAX, 1), u16::MAX);
        assert_eq!(rows_for(0, 4), 1);
    }

    #[test]
    fn test_init_places_configured_counts() {
        let mut field = Field::with_seed(7, 4, 5, 42);
        field.init();

        assert_eq!(field.remaining(ItemKind::Clam), 7);
        assert_eq!(field.remaining(ItemKind::Crab), 4);
        assert_eq!(field.items().count(), 11);
    }

    #[test]
    fn test_init_twice_does_not_accumulate() {
        let mut field = Field::with_seed(3, 3, 4, 9);
        field.init();
        field.init();

        assert_eq!(field.remaining(ItemKind::Clam), 3);
        assert_eq!(field.remaining(ItemKind::Crab), 3);
    }

    #[test]
    fn test_same_seed_same_layout() {
        let mut a = Field::with_seed(6, 6, 6, 1234);
        let mut b = Field::with_seed(6, 6, 6, 1234);
        a.init();
        b.init();

        let a_items: Vec<_> = a.items().collect();
        let b_items: Vec<_> = b.items().collect();
        assert_eq!(a_items, b_items);
    }

    #[test]
    fn test_click_collects_clam() {
        let mut field = Field::with_seed(2, 2, 4, 3);
        field.init();

        let (cell, _) = field
            .items()
            .find(|(_, kind)| *kind == ItemKind::Clam)
            .unwrap();

        assert_eq!(field.click(cell), Some(ItemKind::Clam));
        assert_eq!(field.item_at(cell), None);
        assert_eq!(field.remaining(ItemKind::Clam), 1);
        assert_eq!(field.click(cell), None);
    }

    #[test]
    fn test_click_leaves_crab_in_place() {
        let mut field = Field::with_seed(2, 2, 4, 3);
        field.init();

        let (cell, _) = field
            .items()
            .find(|(_, kind)| *kind == ItemKind::Crab)
            .unwrap();

        assert_eq!(field.click(cell), Some(ItemKind::Crab));
        assert_eq!(field.item_at(cell), Some(ItemKind::Crab));
    }

    #[test]
    fn test_click_out_of_range() {
        let mut field = Field::with_seed(1, 1, 2, 3);
        field.init();

        assert_eq!(field.click(Cell::new(2, 0)), None);
        assert_eq!(field.click(Cell::new(0, field.rows())), None);
    }

    #[test]
    fn test_clear() {
        let mut field = Field::with_seed(4, 4, 4, 5);
        field.init();
        field.clear();
        assert_eq!(field.items().count(), 0);
    }

    #[test]
    fn test_item_kind_display() {
        assert_eq!(ItemKind::Clam.to_string(), "Clam");
        assert_eq!(ItemKind::Crab.to_string(), "Crab");
    }
}
