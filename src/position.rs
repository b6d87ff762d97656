//! Gomoku position representation and win detection.
//!
//! This module provides the board model used by the protocol layer and the
//! solver:
//! - Board state as a flat row-major grid of [`Cell`]s
//! - Stone placement and removal with turn tracking
//! - Bounding box of all stones played so far
//! - Five-in-a-row detection for a hypothetical move
//! - Static evaluation and a symmetry-invariant hash
//!
//! Stones are labelled relative to the brain: [`Cell::Mine`] are our stones and
//! [`Cell::Theirs`] the opponent's, whoever started the game.

use std::fmt;

use crate::constants::{MIN_BOARD_SIZE, WINDOW};
use crate::patterns::{encode_window, window_score};

/// State of a single intersection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[repr(u8)]
pub enum Cell {
    #[default]
    Empty = 0,
    Mine = 1,
    Theirs = 2,
}

impl Cell {
    fn owned_by(mine: bool) -> Self {
        if mine { Cell::Mine } else { Cell::Theirs }
    }
}

/// A move on the board as zero-based (column, row) coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Move {
    pub x: usize,
    pub y: usize,
}

impl Move {
    pub const fn new(x: usize, y: usize) -> Self {
        Self { x, y }
    }
}

impl fmt::Display for Move {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{},{}", self.x, self.y)
    }
}

/// Smallest rectangle containing every stone played so far (inclusive).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Bounds {
    pub min_x: usize,
    pub min_y: usize,
    pub max_x: usize,
    pub max_y: usize,
}

impl Bounds {
    fn at(x: usize, y: usize) -> Self {
        Self {
            min_x: x,
            min_y: y,
            max_x: x,
            max_y: y,
        }
    }

    fn grow(&mut self, x: usize, y: usize) {
        self.min_x = self.min_x.min(x);
        self.min_y = self.min_y.min(y);
        self.max_x = self.max_x.max(x);
        self.max_y = self.max_y.max(y);
    }

    /// True if (x, y) lies within `margin` cells of the rectangle.
    #[inline]
    pub fn is_near(&self, x: usize, y: usize, margin: usize) -> bool {
        x + margin >= self.min_x
            && x <= self.max_x + margin
            && y + margin >= self.min_y
            && y <= self.max_y + margin
    }
}

/// One of the eight symmetries of a rectangle.
///
/// A symmetry reads the transformed board at (x', y') from the source board:
/// the coordinates are first swapped if `transpose` is set, then mirrored on
/// each axis whose flip flag is set. Transposing swaps width and height.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Symmetry {
    pub transpose: bool,
    pub flip_x: bool,
    pub flip_y: bool,
}

impl Symmetry {
    pub const IDENTITY: Symmetry = Symmetry::new(false, false, false);
    pub const HORIZONTAL: Symmetry = Symmetry::new(false, true, false);
    pub const VERTICAL: Symmetry = Symmetry::new(false, false, true);
    pub const DIAGONAL: Symmetry = Symmetry::new(true, false, false);
    pub const ANTI_DIAGONAL: Symmetry = Symmetry::new(true, true, true);

    /// All eight symmetries, identity first.
    pub const ALL: [Symmetry; 8] = [
        Symmetry::new(false, false, false),
        Symmetry::new(false, true, false),
        Symmetry::new(false, false, true),
        Symmetry::new(false, true, true),
        Symmetry::new(true, false, false),
        Symmetry::new(true, true, false),
        Symmetry::new(true, false, true),
        Symmetry::new(true, true, true),
    ];

    pub const fn new(transpose: bool, flip_x: bool, flip_y: bool) -> Self {
        Self {
            transpose,
            flip_x,
            flip_y,
        }
    }

    /// Dimensions of a `width` x `height` board after the transform.
    #[inline]
    pub fn dimensions(&self, width: usize, height: usize) -> (usize, usize) {
        if self.transpose { (height, width) } else { (width, height) }
    }

    /// Source coordinates on the original board for target cell (x, y).
    #[inline]
    pub fn source(&self, x: usize, y: usize, width: usize, height: usize) -> (usize, usize) {
        let (a, b) = if self.transpose { (y, x) } else { (x, y) };
        let sx = if self.flip_x { width - 1 - a } else { a };
        let sy = if self.flip_y { height - 1 - b } else { b };
        (sx, sy)
    }
}

/// The four line directions checked for alignments: E, S, SE, SW.
const DIRECTIONS: [(isize, isize); 4] = [(1, 0), (0, 1), (1, 1), (-1, 1)];

const HASH_OFFSET: u64 = 0xcbf2_9ce4_8422_2325;
const HASH_PRIME: u64 = 0x0000_0100_0000_01b3;

/// A gomoku position (board state).
///
/// Copies are explicit (`clone`) and own their grid; the solver clones a
/// position for every hypothetical continuation it explores.
#[derive(Clone, Debug)]
pub struct Position {
    width: usize,
    height: usize,
    /// Row-major grid, `width * height` cells
    cells: Vec<Cell>,
    /// Number of stones on the board
    moves: usize,
    /// True when the brain is the player to move
    my_turn: bool,
    /// Rectangle covering every stone ever played (never shrinks)
    bounds: Option<Bounds>,
    /// Only a run of exactly five wins when set
    exact_five: bool,
}

impl Position {
    /// Create an empty `width` x `height` board with the brain to move.
    pub fn new(width: usize, height: usize) -> Self {
        debug_assert!(width > 0 && height > 0);
        Self {
            width,
            height,
            cells: vec![Cell::Empty; width * height],
            moves: 0,
            my_turn: true,
            bounds: None,
            exact_five: false,
        }
    }

    /// True if the board is large enough to hold a line of five.
    pub fn is_playable_size(width: usize, height: usize) -> bool {
        width >= MIN_BOARD_SIZE && height >= MIN_BOARD_SIZE
    }

    #[inline]
    fn idx(&self, x: usize, y: usize) -> usize {
        y * self.width + x
    }

    #[inline]
    pub fn in_bounds(&self, x: usize, y: usize) -> bool {
        x < self.width && y < self.height
    }

    /// Cell contents, or `None` outside the board.
    #[inline]
    pub fn get(&self, x: usize, y: usize) -> Option<Cell> {
        if self.in_bounds(x, y) {
            Some(self.cells[self.idx(x, y)])
        } else {
            None
        }
    }

    /// True iff (x, y) is on the board and empty.
    #[inline]
    pub fn can_play(&self, x: usize, y: usize) -> bool {
        self.get(x, y) == Some(Cell::Empty)
    }

    /// Play for the side to move.
    ///
    /// The cell must be empty; callers check [`Position::can_play`] first.
    pub fn play(&mut self, x: usize, y: usize) {
        let mine = self.my_turn;
        self.play_as(x, y, mine);
    }

    /// Play a stone for a given side; the other side is to move afterwards.
    pub fn play_as(&mut self, x: usize, y: usize, mine: bool) {
        debug_assert!(self.can_play(x, y), "({x}, {y}) is not playable");
        let i = self.idx(x, y);
        self.cells[i] = Cell::owned_by(mine);
        self.moves += 1;
        self.my_turn = !mine;
        match &mut self.bounds {
            Some(b) => b.grow(x, y),
            None => self.bounds = Some(Bounds::at(x, y)),
        }
    }

    /// Remove a stone. The bounding box is left as it was.
    pub fn clear(&mut self, x: usize, y: usize) {
        debug_assert!(
            matches!(self.get(x, y), Some(Cell::Mine | Cell::Theirs)),
            "({x}, {y}) is not occupied"
        );
        let i = self.idx(x, y);
        self.cells[i] = Cell::Empty;
        self.moves -= 1;
        self.my_turn = !self.my_turn;
    }

    /// Would the side to move complete a line by playing (x, y)?
    #[inline]
    pub fn is_winning_move(&self, x: usize, y: usize) -> bool {
        self.is_winning_move_for(x, y, self.my_turn)
    }

    /// Would the given side complete a line by playing (x, y)?
    ///
    /// The board is not modified; (x, y) is treated as already holding the
    /// side's stone.
    pub fn is_winning_move_for(&self, x: usize, y: usize, mine: bool) -> bool {
        let owner = Cell::owned_by(mine);
        DIRECTIONS.iter().any(|&(dx, dy)| {
            let run = 1 + self.run_length(x, y, dx, dy, owner) + self.run_length(x, y, -dx, -dy, owner);
            if self.exact_five { run == WINDOW } else { run >= WINDOW }
        })
    }

    /// Count consecutive `owner` stones from (x, y) exclusive along (dx, dy).
    fn run_length(&self, x: usize, y: usize, dx: isize, dy: isize, owner: Cell) -> usize {
        let mut count = 0;
        let (mut cx, mut cy) = (x as isize, y as isize);
        loop {
            cx += dx;
            cy += dy;
            if cx < 0 || cy < 0 {
                break;
            }
            match self.get(cx as usize, cy as usize) {
                Some(c) if c == owner => count += 1,
                _ => break,
            }
        }
        count
    }

    /// Static evaluation from the brain's point of view.
    ///
    /// Sums the window table over every five-cell horizontal, vertical and
    /// diagonal window. Positive favours [`Cell::Mine`].
    pub fn heuristic(&self) -> i64 {
        let (w, h) = (self.width, self.height);
        let mut score = 0;
        for y in 0..h {
            for x in 0..w {
                let east = x + WINDOW <= w;
                let south = y + WINDOW <= h;
                if east {
                    score += self.window(x, y, 1, 0);
                }
                if south {
                    score += self.window(x, y, 0, 1);
                    if east {
                        score += self.window(x, y, 1, 1);
                    }
                    if x + 1 >= WINDOW {
                        score += self.window(x, y, -1, 1);
                    }
                }
            }
        }
        score
    }

    #[inline]
    fn window(&self, x: usize, y: usize, dx: isize, dy: isize) -> i64 {
        let cells = std::array::from_fn(|i| {
            let cx = (x as isize + dx * i as isize) as usize;
            let cy = (y as isize + dy * i as isize) as usize;
            self.cells[self.idx(cx, cy)] as u8
        });
        window_score(encode_window(cells))
    }

    /// Hash of the grid as read through one symmetry.
    fn oriented_hash(&self, sym: Symmetry) -> u64 {
        let (tw, th) = sym.dimensions(self.width, self.height);
        let mut hash = HASH_OFFSET;
        hash = (hash ^ tw as u64).wrapping_mul(HASH_PRIME);
        hash = (hash ^ th as u64).wrapping_mul(HASH_PRIME);
        for ty in 0..th {
            for tx in 0..tw {
                let (sx, sy) = sym.source(tx, ty, self.width, self.height);
                let cell = self.cells[self.idx(sx, sy)] as u64;
                hash = (hash ^ cell).wrapping_mul(HASH_PRIME);
            }
        }
        mix(hash)
    }

    /// Hash shared by a position and all its reflections and rotations.
    ///
    /// The smallest of the eight oriented hashes is taken, so the value only
    /// depends on the orbit of the grid under the board's symmetry group.
    pub fn hash(&self) -> u64 {
        Symmetry::ALL
            .iter()
            .map(|&sym| self.oriented_hash(sym))
            .min()
            .unwrap_or_default()
    }

    /// Copy of this position seen through a symmetry.
    pub fn transform(&self, sym: Symmetry) -> Position {
        let (tw, th) = sym.dimensions(self.width, self.height);
        let mut out = Position::new(tw, th);
        out.moves = self.moves;
        out.my_turn = self.my_turn;
        out.exact_five = self.exact_five;
        for ty in 0..th {
            for tx in 0..tw {
                let (sx, sy) = sym.source(tx, ty, self.width, self.height);
                let cell = self.cells[self.idx(sx, sy)];
                if cell != Cell::Empty {
                    let i = out.idx(tx, ty);
                    out.cells[i] = cell;
                    match &mut out.bounds {
                        Some(b) => b.grow(tx, ty),
                        None => out.bounds = Some(Bounds::at(tx, ty)),
                    }
                }
            }
        }
        out
    }

    /// Mirror top to bottom.
    pub fn vertical_flip(&self) -> Position {
        self.transform(Symmetry::VERTICAL)
    }

    /// Mirror left to right.
    pub fn horizontal_flip(&self) -> Position {
        self.transform(Symmetry::HORIZONTAL)
    }

    /// Mirror along the main diagonal (transpose).
    pub fn diagonal_flip(&self) -> Position {
        self.transform(Symmetry::DIAGONAL)
    }

    /// Mirror along the anti-diagonal.
    pub fn anti_diagonal_flip(&self) -> Position {
        self.transform(Symmetry::ANTI_DIAGONAL)
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn cell_count(&self) -> usize {
        self.cells.len()
    }

    pub fn move_count(&self) -> usize {
        self.moves
    }

    pub fn bounds(&self) -> Option<Bounds> {
        self.bounds
    }

    pub fn is_my_turn(&self) -> bool {
        self.my_turn
    }

    pub fn set_my_turn(&mut self, my_turn: bool) {
        self.my_turn = my_turn;
    }

    pub fn exact_five(&self) -> bool {
        self.exact_five
    }

    pub fn set_exact_five(&mut self, exact_five: bool) {
        self.exact_five = exact_five;
    }

    /// Center cell, where the first stone of a game goes.
    pub fn center(&self) -> Move {
        Move::new(self.width / 2, self.height / 2)
    }
}

/// Final avalanche step (splitmix64) so nearby grids spread across the key space.
#[inline]
fn mix(mut z: u64) -> u64 {
    z = (z ^ (z >> 30)).wrapping_mul(0xbf58_476d_1ce4_e5b9);
    z = (z ^ (z >> 27)).wrapping_mul(0x94d0_49bb_1331_11eb);
    z ^ (z >> 31)
}

/// Positions are equal only if literally identical, not merely symmetric.
impl PartialEq for Position {
    fn eq(&self, other: &Self) -> bool {
        self.width == other.width
            && self.height == other.height
            && self.moves == other.moves
            && self.my_turn == other.my_turn
            && self.cells == other.cells
    }
}

impl Eq for Position {}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for y in 0..self.height {
            for x in 0..self.width {
                let ch = match self.cells[self.idx(x, y)] {
                    Cell::Mine => 'X',
                    Cell::Theirs => 'O',
                    Cell::Empty => '.',
                };
                write!(f, "{ch}")?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}
