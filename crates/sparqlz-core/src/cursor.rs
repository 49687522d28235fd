//! Cursor position and navigation state machines
//!
//! A position is either before the first row, on a concrete row, or after the
//! last row. The two navigation strategies differ in what they allow:
//!
//! - [`RandomAccessCursor`] implements `next`/`previous`/`first`/`last`/
//!   `set_pos` against a row count that may be unknown.
//! - [`ForwardCursor`] only records forward advancement performed by a
//!   streaming fetch and rejects every other movement.
//!
//! Every failing operation leaves the position untouched, except for the
//! sentinel transitions `next()` and `previous()` make when they run off
//! either end.

/// Position of a cursor over result rows
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Position {
    #[default]
    BeforeFirst,
    At(usize),
    AfterLast,
}

impl Position {
    /// True only when positioned on a concrete row
    pub fn is_valid(&self) -> bool {
        matches!(self, Position::At(_))
    }

    /// The row index, if positioned on a row
    pub fn index(&self) -> Option<usize> {
        match self {
            Position::At(idx) => Some(*idx),
            _ => None,
        }
    }
}

impl std::fmt::Display for Position {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Position::BeforeFirst => f.write_str("before first row"),
            Position::At(idx) => write!(f, "row {}", idx),
            Position::AfterLast => f.write_str("after last row"),
        }
    }
}

/// Navigation over rows that can be addressed by index.
///
/// `size` is `None` when the row count is not known yet.
#[derive(Debug, Clone, Copy, Default)]
pub struct RandomAccessCursor {
    position: Position,
}

impl RandomAccessCursor {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn position(&self) -> Position {
        self.position
    }

    /// Advance one row. Running past the end moves to `AfterLast`.
    pub fn next(&mut self, size: Option<usize>) -> bool {
        let Some(size) = size else {
            return false;
        };

        match self.position {
            Position::BeforeFirst => {
                if size == 0 {
                    self.position = Position::AfterLast;
                    return false;
                }
                self.first(Some(size))
            }
            Position::AfterLast => false,
            Position::At(idx) => {
                if idx + 1 < size {
                    self.set_pos(idx + 1, Some(size))
                } else {
                    self.position = Position::AfterLast;
                    false
                }
            }
        }
    }

    /// Step back one row. Running past the start moves to `BeforeFirst`.
    pub fn previous(&mut self, size: Option<usize>) -> bool {
        match self.position {
            Position::BeforeFirst => false,
            Position::AfterLast => {
                if size == Some(0) {
                    self.position = Position::BeforeFirst;
                    return false;
                }
                self.last(size)
            }
            Position::At(0) => {
                self.position = Position::BeforeFirst;
                false
            }
            Position::At(idx) => self.set_pos(idx - 1, size),
        }
    }

    pub fn first(&mut self, size: Option<usize>) -> bool {
        if self.position == Position::At(0) {
            return true;
        }
        self.set_pos(0, size)
    }

    /// Move to the last row. Fails when the row count is unknown.
    pub fn last(&mut self, size: Option<usize>) -> bool {
        match size {
            Some(size) if size > 0 => self.set_pos(size - 1, Some(size)),
            _ => false,
        }
    }

    /// Move to `pos` if it is in range (any index is accepted while the size
    /// is unknown).
    pub fn set_pos(&mut self, pos: usize, size: Option<usize>) -> bool {
        if size.is_some_and(|size| pos >= size) {
            return false;
        }
        self.position = Position::At(pos);
        true
    }
}

/// Position tracking for forward-only results.
///
/// The owning result performs the fetch itself and reports the outcome with
/// [`ForwardCursor::update_pos`]; no other movement is accepted.
#[derive(Debug, Clone, Copy, Default)]
pub struct ForwardCursor {
    position: Position,
}

impl ForwardCursor {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn position(&self) -> Position {
        self.position
    }

    /// The position the next successful fetch lands on, or `None` once the
    /// end has been reached.
    pub fn next_position(&self) -> Option<Position> {
        match self.position {
            Position::BeforeFirst => Some(Position::At(0)),
            Position::At(idx) => Some(Position::At(idx + 1)),
            Position::AfterLast => None,
        }
    }

    /// Record the position reached by a fetch. Performs no validation.
    pub fn update_pos(&mut self, position: Position) {
        self.position = position;
    }

    /// `first()` is only meaningful before iteration has started, where it
    /// is equivalent to one `next()`.
    pub fn first_is_next(&self) -> bool {
        self.position == Position::BeforeFirst
    }
}
