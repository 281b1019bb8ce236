//! Logical input commands and the selection state they drive.
//!
//! Raw keyboard and mouse codes are resolved to an [`InputCommand`] once, at
//! the display boundary. Everything downstream works with these commands and
//! with a single owned [`SelectionState`], so the controller has no state
//! hidden in input callbacks.

/// A navigation direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    /// One row up.
    Up,
    /// One row down.
    Down,
    /// One cell left, within the row.
    Left,
    /// One cell right, within the row.
    Right,
}

/// A platform-independent user input.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum InputCommand {
    /// Move the selection up.
    Up,
    /// Move the selection down.
    Down,
    /// Move the selection left.
    Left,
    /// Move the selection right.
    Right,
    /// Play the selected video.
    Commit,
    /// Leave the kiosk.
    Quit,
    /// Pointer moved to canvas coordinates.
    PointerMove(i32, i32),
    /// Primary button pressed at canvas coordinates.
    PointerCommit(i32, i32),
}

impl InputCommand {
    /// The direction of a navigation command.
    pub fn direction(self) -> Option<Direction> {
        match self {
            InputCommand::Up => Some(Direction::Up),
            InputCommand::Down => Some(Direction::Down),
            InputCommand::Left => Some(Direction::Left),
            InputCommand::Right => Some(Direction::Right),
            _ => None,
        }
    }
}

/// The highlighted cell and whether playback has been requested.
///
/// `selected_index` stays within `[0, capacity)` across every mutation.
///
/// # Example
///
/// ```
/// use videowall::{Direction, SelectionState};
///
/// let mut state = SelectionState::new(6);
/// state.move_in(Direction::Right, 3);
/// state.move_in(Direction::Right, 3);
/// state.move_in(Direction::Right, 3);
/// assert_eq!(state.selected_index(), 2);
/// state.move_in(Direction::Down, 3);
/// assert_eq!(state.selected_index(), 5);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectionState {
    selected_index: usize,
    armed_to_play: bool,
    capacity: usize,
}

impl SelectionState {
    /// Start at cell 0 of a grid with `capacity` cells (at least one).
    pub fn new(capacity: usize) -> Self {
        Self {
            selected_index: 0,
            armed_to_play: false,
            capacity: capacity.max(1),
        }
    }

    /// The highlighted cell.
    pub fn selected_index(&self) -> usize {
        self.selected_index
    }

    /// Whether a commit is pending.
    pub fn armed_to_play(&self) -> bool {
        self.armed_to_play
    }

    /// Number of cells.
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Move one step in `direction` on a grid `columns` wide.
    ///
    /// Left and right stop at the row's edges; up and down stop at the
    /// first and last rows. Moves that would leave the grid are no-ops.
    pub fn move_in(&mut self, direction: Direction, columns: u32) {
        let columns = columns.max(1) as usize;
        let index = self.selected_index;
        let column = index % columns;
        let target = match direction {
            Direction::Left if column > 0 => Some(index - 1),
            Direction::Right if column + 1 < columns => Some(index + 1),
            Direction::Up => index.checked_sub(columns),
            Direction::Down => Some(index + columns),
            _ => None,
        };
        if let Some(target) = target.filter(|&target| target < self.capacity) {
            self.selected_index = target;
        }
    }

    /// Highlight `index`, clamped to the last cell.
    pub fn select(&mut self, index: usize) {
        self.selected_index = index.min(self.capacity - 1);
    }

    /// Request playback of the highlighted cell.
    pub fn arm(&mut self) {
        self.armed_to_play = true;
    }

    /// Consume a pending playback request.
    pub fn take_armed(&mut self) -> bool {
        std::mem::take(&mut self.armed_to_play)
    }
}
