//! Grid cell geometry.
//!
//! Everything the compositor and the selection controller agree on lives
//! here: integer cell sizes, row-major indexing, aspect-preserving fits,
//! the pointer hit-test and its inverse (the highlight rectangle), and the
//! power-off hot-zone. All functions are pure so they can be tested without
//! media or a window.

use serde::{Deserialize, Serialize};

use crate::error::VideoWallError;

/// Shape and resolution of the grid canvas.
///
/// Cells are `canvas_width / columns` by `canvas_height / rows` pixels
/// (integer division); any remainder is left as a strip along the right and
/// bottom edges.
///
/// # Example
///
/// ```
/// use videowall::GridLayout;
///
/// let layout = GridLayout::new(3, 2, 1920, 1080);
/// assert_eq!(layout.cell_width(), 640);
/// assert_eq!(layout.cell_height(), 540);
/// assert_eq!(layout.capacity(), 6);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GridLayout {
    /// Number of cells per row.
    pub columns: u32,
    /// Number of rows.
    pub rows: u32,
    /// Canvas width in pixels.
    pub canvas_width: u32,
    /// Canvas height in pixels.
    pub canvas_height: u32,
}

impl Default for GridLayout {
    fn default() -> Self {
        Self::new(3, 2, 1920, 1080)
    }
}

/// An axis-aligned pixel rectangle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rect {
    /// Left edge.
    pub x: u32,
    /// Top edge.
    pub y: u32,
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
}

impl Rect {
    /// Centre point, rounded down.
    pub fn center(&self) -> (u32, u32) {
        (self.x + self.width / 2, self.y + self.height / 2)
    }

    /// Returns `true` if `(x, y)` lies inside the rectangle.
    pub fn contains(&self, x: i32, y: i32) -> bool {
        let (x, y) = (i64::from(x), i64::from(y));
        let left = i64::from(self.x);
        let top = i64::from(self.y);
        x >= left
            && y >= top
            && x < left + i64::from(self.width)
            && y < top + i64::from(self.height)
    }
}

/// Per-edge inset of the highlight rectangle inside its cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Insets {
    /// Distance from the cell's left edge.
    pub left: u32,
    /// Distance from the cell's top edge.
    pub top: u32,
    /// Distance from the cell's right edge.
    pub right: u32,
    /// Distance from the cell's bottom edge.
    pub bottom: u32,
}

impl Default for Insets {
    fn default() -> Self {
        Self {
            left: 30,
            top: 20,
            right: 30,
            bottom: 50,
        }
    }
}

/// The power-off hot-zone in the bottom-right corner of the canvas.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct HotZone {
    /// Zone width in pixels.
    pub width: u32,
    /// Zone height in pixels.
    pub height: u32,
    /// Gap between the zone and the right/bottom canvas edges.
    pub margin: u32,
}

impl Default for HotZone {
    fn default() -> Self {
        Self {
            width: 100,
            height: 100,
            margin: 20,
        }
    }
}

impl HotZone {
    /// Resolve the zone against a canvas of the given size.
    pub fn rect(&self, canvas_width: u32, canvas_height: u32) -> Rect {
        let width = self.width.min(canvas_width);
        let height = self.height.min(canvas_height);
        Rect {
            x: canvas_width.saturating_sub(self.margin + width),
            y: canvas_height.saturating_sub(self.margin + height),
            width,
            height,
        }
    }

    /// Returns `true` if the pointer at `(x, y)` is inside the zone.
    pub fn contains(&self, canvas_width: u32, canvas_height: u32, x: i32, y: i32) -> bool {
        self.rect(canvas_width, canvas_height).contains(x, y)
    }
}

impl GridLayout {
    /// Create a layout. Use [`validate`](GridLayout::validate) before
    /// handing untrusted values to the compositor.
    pub fn new(columns: u32, rows: u32, canvas_width: u32, canvas_height: u32) -> Self {
        Self {
            columns,
            rows,
            canvas_width,
            canvas_height,
        }
    }

    /// Check that the layout has at least one cell and that every cell is
    /// at least one pixel in each direction.
    ///
    /// # Errors
    ///
    /// Returns [`VideoWallError::InvalidLayout`] describing the problem.
    pub fn validate(&self) -> Result<(), VideoWallError> {
        if self.columns == 0 || self.rows == 0 {
            return Err(VideoWallError::InvalidLayout(format!(
                "grid must have at least one column and one row (got {}x{})",
                self.columns, self.rows
            )));
        }
        if self.canvas_width < self.columns || self.canvas_height < self.rows {
            return Err(VideoWallError::InvalidLayout(format!(
                "canvas {}x{} is too small for a {}x{} grid",
                self.canvas_width, self.canvas_height, self.columns, self.rows
            )));
        }
        Ok(())
    }

    /// Check that cells are large enough to be selected: the highlight
    /// rectangle must be non-empty, and its centre, shifted by the pointer
    /// `offset`, must hit-test back to the same cell.
    ///
    /// All cells are congruent, so checking the first one covers the grid.
    ///
    /// # Errors
    ///
    /// Returns [`VideoWallError::InvalidLayout`] if the layout itself is
    /// invalid or its cells are too small for the highlight.
    pub fn validate_selection(
        &self,
        insets: Insets,
        offset: (i32, i32),
    ) -> Result<(), VideoWallError> {
        self.validate()?;
        let highlight = self.highlight_rect(0, insets);
        let (center_x, center_y) = highlight.center();
        let inside = |center: u32, offset: i32, size: u32| {
            (0..i64::from(size)).contains(&(i64::from(center) - i64::from(offset)))
        };
        if highlight.width == 0
            || highlight.height == 0
            || !inside(center_x, offset.0, self.cell_width())
            || !inside(center_y, offset.1, self.cell_height())
        {
            return Err(VideoWallError::InvalidLayout(format!(
                "{}x{} cells are too small for a highlight inset by {:?} with pointer offset {:?}",
                self.cell_width(),
                self.cell_height(),
                insets,
                offset
            )));
        }
        Ok(())
    }

    /// Same grid shape on a canvas of a different size.
    ///
    /// The controller derives its geometry from the artifact's actual pixel
    /// dimensions rather than from the compositor's configuration.
    pub fn with_canvas(self, canvas_width: u32, canvas_height: u32) -> Self {
        Self {
            canvas_width,
            canvas_height,
            ..self
        }
    }

    /// Total number of cells.
    pub fn capacity(&self) -> usize {
        self.columns as usize * self.rows as usize
    }

    /// Width of one cell.
    pub fn cell_width(&self) -> u32 {
        self.canvas_width / self.columns.max(1)
    }

    /// Height of one cell.
    pub fn cell_height(&self) -> u32 {
        self.canvas_height / self.rows.max(1)
    }

    /// `(column, row)` of a row-major cell index.
    pub fn position(&self, index: usize) -> (u32, u32) {
        let columns = self.columns.max(1) as usize;
        ((index % columns) as u32, (index / columns) as u32)
    }

    /// Row-major index of `(column, row)`.
    pub fn index(&self, column: u32, row: u32) -> usize {
        row as usize * self.columns as usize + column as usize
    }

    /// Pixel bounds of a cell.
    pub fn cell_rect(&self, index: usize) -> Rect {
        let (column, row) = self.position(index);
        Rect {
            x: column * self.cell_width(),
            y: row * self.cell_height(),
            width: self.cell_width(),
            height: self.cell_height(),
        }
    }

    /// Cell under the pointer.
    ///
    /// `offset` is subtracted from the pointer before dividing by the cell
    /// size; the resulting column and row are clamped into the grid, so
    /// every pointer position maps to a valid cell.
    pub fn cell_at(&self, x: i32, y: i32, offset: (i32, i32)) -> usize {
        let column = clamped_division(x, offset.0, self.cell_width(), self.columns);
        let row = clamped_division(y, offset.1, self.cell_height(), self.rows);
        self.index(column, row)
    }

    /// Bounds of the highlight rectangle drawn around a selected cell.
    pub fn highlight_rect(&self, index: usize, insets: Insets) -> Rect {
        let cell = self.cell_rect(index);
        Rect {
            x: cell.x + insets.left.min(cell.width),
            y: cell.y + insets.top.min(cell.height),
            width: cell.width.saturating_sub(insets.left + insets.right),
            height: cell.height.saturating_sub(insets.top + insets.bottom),
        }
    }

    /// Top-left corner at which a `width` x `height` image is placed so it
    /// is centred horizontally in the cell and vertically in the space left
    /// above a `caption_band` strip at the cell's bottom.
    pub fn place_in_cell(&self, index: usize, width: u32, height: u32, caption_band: u32) -> (u32, u32) {
        let cell = self.cell_rect(index);
        let x = cell.x + cell.width.saturating_sub(width) / 2;
        let y = cell.y + cell.height.saturating_sub(height + caption_band) / 2;
        (x, y)
    }
}

fn clamped_division(coordinate: i32, offset: i32, cell_size: u32, count: u32) -> u32 {
    let cell_size = i64::from(cell_size.max(1));
    let cell = (i64::from(coordinate) - i64::from(offset)).div_euclid(cell_size);
    cell.clamp(0, i64::from(count.max(1)) - 1) as u32
}

/// Scale `source` dimensions to fit inside `target`, preserving aspect
/// ratio.
///
/// Uses `scale = min(target_width / width, target_height / height)` and
/// rounds each scaled side. The result never exceeds the target box and is
/// never smaller than one pixel; a degenerate source or target yields
/// `(0, 0)`.
///
/// # Example
///
/// ```
/// use videowall::fit_dimensions;
///
/// assert_eq!(fit_dimensions(1920, 1080, 590, 470), (590, 332));
/// assert_eq!(fit_dimensions(1080, 1920, 590, 470), (264, 470));
/// ```
pub fn fit_dimensions(
    width: u32,
    height: u32,
    target_width: u32,
    target_height: u32,
) -> (u32, u32) {
    if width == 0 || height == 0 || target_width == 0 || target_height == 0 {
        return (0, 0);
    }
    let scale = (target_width as f64 / width as f64).min(target_height as f64 / height as f64);
    let new_width = ((width as f64) * scale).round() as u32;
    let new_height = ((height as f64) * scale).round() as u32;
    (
        new_width.clamp(1, target_width),
        new_height.clamp(1, target_height),
    )
}
