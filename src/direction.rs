use strum::VariantArray;

/// One of the four cardinal directions between adjacent cells.
///
/// Declaration order is significant: the index of a direction is its
/// discriminant, offsets are looked up by index in the propagator's counter
/// tensor, and [`opposite`](Direction::opposite) is the involution `3 - index`.
#[derive(Copy, Clone, Debug, VariantArray, Eq, PartialEq, Hash, Ord, PartialOrd)]
pub enum Direction {
    /// Towards smaller `y`.
    Up,
    /// Towards smaller `x`.
    Left,
    /// Towards larger `x`.
    Right,
    /// Towards larger `y`.
    Down,
}

impl Direction {
    /// The dense index of this direction, in `0..4`.
    #[inline]
    pub fn index(&self) -> usize {
        *self as usize
    }

    /// Horizontal offset of a step in this direction.
    #[inline]
    pub fn dx(&self) -> isize {
        match self {
            Self::Up | Self::Down => 0,
            Self::Left => -1,
            Self::Right => 1,
        }
    }

    /// Vertical offset of a step in this direction.
    #[inline]
    pub fn dy(&self) -> isize {
        match self {
            Self::Up => -1,
            Self::Down => 1,
            Self::Left | Self::Right => 0,
        }
    }

    /// Invert the direction specified by `self`.
    pub fn opposite(&self) -> Self {
        match self {
            Self::Up => Self::Down,
            Self::Left => Self::Right,
            Self::Right => Self::Left,
            Self::Down => Self::Up,
        }
    }

    /// Step from `(y, x)` in this direction without bounds checking.
    ///
    /// Underflow wraps to a huge coordinate, which callers reject or reduce
    /// modulo their own dimensions.
    pub fn attempt_from(&self, y: usize, x: usize) -> (usize, usize) {
        (
            y.wrapping_add_signed(self.dy()),
            x.wrapping_add_signed(self.dx()),
        )
    }
}
