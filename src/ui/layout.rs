use ratatui::layout::{Constraint, Direction, Layout, Rect};

use crate::field::Cell;

/// Terminal columns taken by one field slot
pub const SLOT_WIDTH: u16 = 6;
/// Terminal rows taken by one field slot
pub const SLOT_HEIGHT: u16 = 2;

const BUTTON_WIDTH: u16 = 7;
const READOUT_WIDTH: u16 = 11;
const BAR_HEIGHT: u16 = 3;
const BAR_GAP: u16 = 2;
const POPUP_WIDTH: u16 = 30;
const POPUP_HEIGHT: u16 = 5;

/// Where everything goes for a given terminal size.
///
/// Drawing and mouse hit testing both go through [`compute`] so a click
/// always lands on what the player sees.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScreenLayout {
    pub header: Rect,
    pub button: Rect,
    pub timer: Rect,
    pub score: Rect,
    pub field: Rect,
    /// Whether every slot is fully on screen. When not, slots are neither
    /// drawn nor clickable and `field_area` shows a resize notice instead.
    pub field_fits: bool,
    /// Space reserved for the field, the field itself is centered inside
    pub field_area: Rect,
    pub popup: Rect,
    pub footer: Rect,
}

/// What a mouse click at a terminal position refers to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Hit {
    Button,
    Slot(Cell),
    Popup,
    Nothing,
}

pub fn compute(area: Rect, columns: u16, rows: u16) -> ScreenLayout {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1),          // header
            Constraint::Length(BAR_HEIGHT), // button, timer, score
            Constraint::Length(1),          // padding
            Constraint::Min(0),             // field
            Constraint::Length(1),          // footer
        ])
        .split(area);

    let bar = chunks[1];
    let bar_width = BUTTON_WIDTH + READOUT_WIDTH * 2 + BAR_GAP * 2;
    let bar_x = bar.x + bar.width.saturating_sub(bar_width) / 2;
    let button = Rect::new(bar_x, bar.y, BUTTON_WIDTH, bar.height).intersection(bar);
    let timer = Rect::new(
        bar_x + BUTTON_WIDTH + BAR_GAP,
        bar.y,
        READOUT_WIDTH,
        bar.height,
    )
    .intersection(bar);
    let score = Rect::new(
        bar_x + BUTTON_WIDTH + BAR_GAP + READOUT_WIDTH + BAR_GAP,
        bar.y,
        READOUT_WIDTH,
        bar.height,
    )
    .intersection(bar);

    let field_area = chunks[3];
    let (needed_width, needed_height) = field_size(columns, rows);
    let field_fits =
        needed_width <= u32::from(field_area.width) && needed_height <= u32::from(field_area.height);
    let field = centered(
        field_area,
        columns.saturating_mul(SLOT_WIDTH),
        rows.saturating_mul(SLOT_HEIGHT),
    );
    let popup = centered(field_area, POPUP_WIDTH, POPUP_HEIGHT);

    ScreenLayout {
        header: chunks[0],
        button,
        timer,
        score,
        field,
        field_fits,
        field_area,
        popup,
        footer: chunks[4],
    }
}

/// Terminal cells the whole field needs, as `(width, height)`
pub fn field_size(columns: u16, rows: u16) -> (u32, u32) {
    (
        u32::from(columns) * u32::from(SLOT_WIDTH),
        u32::from(rows) * u32::from(SLOT_HEIGHT),
    )
}

impl ScreenLayout {
    /// Terminal rect of a field slot, clipped to the visible field
    pub fn slot_rect(&self, cell: Cell) -> Rect {
        Rect::new(
            self.field.x.saturating_add(cell.col.saturating_mul(SLOT_WIDTH)),
            self.field.y.saturating_add(cell.row.saturating_mul(SLOT_HEIGHT)),
            SLOT_WIDTH,
            SLOT_HEIGHT,
        )
        .intersection(self.field)
    }

    /// Resolves a click. The popup, when shown, sits on top of the field.
    pub fn hit(
        &self,
        x: u16,
        y: u16,
        button_visible: bool,
        popup_visible: bool,
        columns: u16,
        rows: u16,
    ) -> Hit {
        if popup_visible && contains(self.popup, x, y) {
            return Hit::Popup;
        }
        if button_visible && contains(self.button, x, y) {
            return Hit::Button;
        }
        if self.field_fits && contains(self.field, x, y) {
            let cell = Cell::new(
                (x - self.field.x) / SLOT_WIDTH,
                (y - self.field.y) / SLOT_HEIGHT,
            );
            if cell.col < columns && cell.row < rows {
                return Hit::Slot(cell);
            }
        }
        Hit::Nothing
    }
}

fn contains(rect: Rect, x: u16, y: u16) -> bool {
    x >= rect.x && x < rect.x + rect.width && y >= rect.y && y < rect.y + rect.height
}

fn centered(outer: Rect, width: u16, height: u16) -> Rect {
    let width = width.min(outer.width);
    let height = height.min(outer.height);
    Rect::new(
        outer.x + (outer.width - width) / 2,
        outer.y + (outer.height - height) / 2,
        width,
        height,
    )
}
