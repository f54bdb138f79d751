//! Grid collaborators consumed by the engines.
//!
//! The engines never hold a grid. They read cells through `GridAccess`,
//! which hands out index handles bounded by the grid (no wraparound), and
//! report live-set transitions through `ChangeSink`.

use crate::schema::DisplayMode;

use super::{ActiveSet, CellLocation, CellVariant, Color, GridSize, ModePalette};

/// Cell lookup and mutation on a bounded grid.
pub trait GridAccess {
    type Handle: Copy;

    /// Cell at (x, y), or `None` outside `[0, columns) x [0, rows)`.
    fn cell_at(&self, x: i32, y: i32) -> Option<Self::Handle>;

    /// Stage a colour for a cell.
    fn set_color(&mut self, handle: Self::Handle, color: Color);

    /// Commit the staged colour.
    fn write(&mut self, handle: Self::Handle);
}

/// Receives one call per cell entering or leaving the live set.
pub trait ChangeSink {
    fn notify_activated(&mut self, loc: CellLocation);
    fn notify_deactivated(&mut self, loc: CellLocation);
}

impl ChangeSink for () {
    fn notify_activated(&mut self, _loc: CellLocation) {}
    fn notify_deactivated(&mut self, _loc: CellLocation) {}
}

/// Records transitions in call order.
#[derive(Debug, Clone, Default)]
pub struct TransitionLog {
    pub activated: Vec<CellLocation>,
    pub deactivated: Vec<CellLocation>,
}

impl TransitionLog {
    pub fn clear(&mut self) {
        self.activated.clear();
        self.deactivated.clear();
    }
}

impl ChangeSink for TransitionLog {
    fn notify_activated(&mut self, loc: CellLocation) {
        self.activated.push(loc);
    }

    fn notify_deactivated(&mut self, loc: CellLocation) {
        self.deactivated.push(loc);
    }
}

/// Index of a cell in a `CellGrid`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CellHandle(usize);

#[derive(Debug, Clone, Copy)]
struct Cell {
    variant: CellVariant,
    staged: Option<Color>,
}

/// In-memory grid used by the CLI and tests.
#[derive(Debug, Clone)]
pub struct CellGrid {
    size: GridSize,
    mode: DisplayMode,
    palette: ModePalette,
    cells: Vec<Cell>,
    writes: u64,
}

impl CellGrid {
    pub fn new(size: GridSize, mode: DisplayMode) -> Self {
        let blank = Cell {
            variant: CellVariant::for_mode(mode),
            staged: None,
        };
        Self {
            size,
            mode,
            palette: ModePalette::default(),
            cells: vec![blank; size.cell_count()],
            writes: 0,
        }
    }

    pub fn with_palette(mut self, palette: ModePalette) -> Self {
        self.palette = palette;
        self
    }

    pub fn size(&self) -> GridSize {
        self.size
    }

    pub fn mode(&self) -> DisplayMode {
        self.mode
    }

    /// Switch modes, blanking every cell.
    pub fn set_mode(&mut self, mode: DisplayMode) {
        self.mode = mode;
        self.erase_all();
    }

    /// Blank every cell for the current mode.
    pub fn erase_all(&mut self) {
        let variant = CellVariant::for_mode(self.mode);
        for cell in &mut self.cells {
            cell.variant = variant;
            cell.staged = None;
        }
    }

    pub fn variant(&self, loc: CellLocation) -> Option<CellVariant> {
        self.handle(loc).map(|h| self.cells[h.0].variant)
    }

    pub fn is_active(&self, loc: CellLocation) -> bool {
        self.variant(loc).is_some_and(|v| v.is_active())
    }

    /// Resolved display colour of a cell.
    pub fn color_at(&self, loc: CellLocation) -> Option<Color> {
        self.variant(loc).map(|v| v.resolve_color(&self.palette))
    }

    /// Number of committed colour writes.
    pub fn writes(&self) -> u64 {
        self.writes
    }

    /// All active locations.
    pub fn active_cells(&self) -> ActiveSet {
        self.size
            .locations()
            .filter(|&loc| self.is_active(loc))
            .collect()
    }

    /// Show a pattern of `pattern_side` x `pattern_side` centered on the grid.
    ///
    /// Cells falling off the grid are dropped.
    pub fn show_pattern(&mut self, pattern: &ActiveSet, pattern_side: i32) {
        self.erase_all();
        let ox = (self.size.columns() - pattern_side) / 2;
        let oy = (self.size.rows() - pattern_side) / 2;
        for loc in pattern.iter() {
            self.set_active(loc.offset(ox, oy), true);
        }
    }

    /// ASCII rendering, one line per row.
    pub fn render_ascii(&self) -> String {
        let mut out = String::with_capacity(self.cells.len() + self.size.rows() as usize);
        for y in 0..self.size.rows() {
            for x in 0..self.size.columns() {
                let ch = match self.variant(CellLocation::new(x, y)) {
                    Some(CellVariant::Growth { color: Some(_) }) => '*',
                    Some(v) if v.is_active() => '#',
                    _ => '.',
                };
                out.push(ch);
            }
            out.push('\n');
        }
        out
    }

    fn handle(&self, loc: CellLocation) -> Option<CellHandle> {
        self.cell_at(loc.x, loc.y)
    }

    fn set_active(&mut self, loc: CellLocation, active: bool) {
        let Some(handle) = self.handle(loc) else {
            return;
        };
        let cell = &mut self.cells[handle.0];
        cell.variant = match cell.variant {
            CellVariant::Automaton { .. } => CellVariant::Automaton { active },
            CellVariant::Pattern { .. } => CellVariant::Pattern { active },
            growth @ CellVariant::Growth { .. } => growth,
        };
    }
}

impl GridAccess for CellGrid {
    type Handle = CellHandle;

    fn cell_at(&self, x: i32, y: i32) -> Option<CellHandle> {
        let loc = CellLocation::new(x, y);
        self.size
            .contains(loc)
            .then(|| CellHandle(self.size.index(loc)))
    }

    fn set_color(&mut self, handle: CellHandle, color: Color) {
        self.cells[handle.0].staged = Some(color);
    }

    fn write(&mut self, handle: CellHandle) {
        let cell = &mut self.cells[handle.0];
        if let Some(color) = cell.staged.take() {
            cell.variant = CellVariant::Growth { color: Some(color) };
            self.writes += 1;
        }
    }
}

impl ChangeSink for CellGrid {
    fn notify_activated(&mut self, loc: CellLocation) {
        self.set_active(loc, true);
    }

    fn notify_deactivated(&mut self, loc: CellLocation) {
        self.set_active(loc, false);
    }
}
