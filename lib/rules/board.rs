use crate::rules::{Color, Move, Piece, PieceId, Role, Square};
use derive_more::{Display, Error, From};
use serde::{Deserialize, Serialize};
use std::{fmt, str::FromStr};

#[cfg(test)]
use proptest::{prelude::*, sample::Selector};

type Grid = [[Option<Piece>; Square::SIZE as usize]; Square::SIZE as usize];

/// The reason why a [`Piece`] cannot be placed on the [`Board`].
#[derive(Debug, Display, Copy, Clone, Eq, PartialEq, Error)]
pub enum InvalidPlacement {
    #[display(fmt = "square `{_0}` is not a dark square")]
    LightSquare(#[error(not(source))] Square),

    #[display(fmt = "square `{_0}` is already occupied")]
    Occupied(#[error(not(source))] Square),

    #[display(fmt = "piece `{_0}` is already on the board")]
    DuplicateId(#[error(not(source))] PieceId),

    #[display(fmt = "piece `{_0}` does not stand where it claims to")]
    Misplaced(#[error(not(source))] PieceId),
}

/// The checkers board.
///
/// This is a plain value, every transformation returns a new [`Board`].
#[derive(Copy, Clone, Eq, PartialEq, Hash, Deserialize, Serialize)]
#[serde(try_from = "Layout", into = "Layout")]
pub struct Board {
    grid: Grid,
}

impl Default for Board {
    /// The starting position, red pawns on rows 0 to 2 and white pawns on rows 5 to 7.
    fn default() -> Self {
        let mut board = Board::empty();

        let squares = Square::iter().filter(|sq| sq.is_dark() && !(3..=4).contains(&sq.row()));
        for (id, sq) in (0..).map(PieceId).zip(squares) {
            let color = if sq.row() < 3 { Color::Red } else { Color::White };
            board.put(Piece::new(id, color, Role::Pawn, sq));
        }

        board
    }
}

impl Board {
    /// A board with no pieces.
    pub fn empty() -> Self {
        Board {
            grid: [[None; Square::SIZE as usize]; Square::SIZE as usize],
        }
    }

    /// The [`Piece`] on the given coordinates, if any.
    ///
    /// Coordinates off the board hold no piece.
    #[inline(always)]
    pub fn at(&self, row: i8, col: i8) -> Option<Piece> {
        Square::new(row, col).and_then(|sq| self.piece_on(sq))
    }

    /// The [`Piece`] on the given [`Square`], if any.
    #[inline(always)]
    pub fn piece_on(&self, sq: Square) -> Option<Piece> {
        self.grid[sq.row() as usize][sq.col() as usize]
    }

    /// An iterator over all pieces on the board, row by row.
    pub fn iter(&self) -> impl Iterator<Item = Piece> + '_ {
        self.grid.iter().flatten().flatten().copied()
    }

    /// An iterator over the pieces of a [`Color`].
    pub fn by_color(&self, c: Color) -> impl Iterator<Item = Piece> + '_ {
        self.iter().filter(move |p| p.color == c)
    }

    /// The piece with the given id, if it is still on the board.
    pub fn find(&self, id: PieceId) -> Option<Piece> {
        self.iter().find(|p| p.id == id)
    }

    /// This board with an additional [`Piece`].
    pub fn with(mut self, piece: Piece) -> Result<Self, InvalidPlacement> {
        if !piece.square.is_dark() {
            Err(InvalidPlacement::LightSquare(piece.square))
        } else if self.piece_on(piece.square).is_some() {
            Err(InvalidPlacement::Occupied(piece.square))
        } else if self.find(piece.id).is_some() {
            Err(InvalidPlacement::DuplicateId(piece.id))
        } else {
            self.put(piece);
            Ok(self)
        }
    }

    /// The board after a [`Move`] is played.
    ///
    /// # Panics
    ///
    /// Panics if the move was not generated for this board.
    pub fn play(&self, m: &Move) -> Board {
        let piece = self
            .piece_on(m.from)
            .filter(|p| p.id == m.piece)
            .expect("expected the moving piece on the origin square");

        let mut next = self.lift(m.from);

        for &id in &m.captured {
            let victim = self.find(id).expect("expected captured piece on the board");
            debug_assert_ne!(victim.color, piece.color);
            next.clear(victim.square);
        }

        debug_assert_eq!(next.piece_on(m.to), None);

        let piece = piece.relocate(m.to);
        next.put(if m.promotes { piece.crown() } else { piece });
        next
    }

    /// This board without whatever stands on the given [`Square`].
    #[inline(always)]
    pub(super) fn lift(mut self, sq: Square) -> Self {
        self.clear(sq);
        self
    }

    /// This board with the given [`Piece`] on its square, replacing whatever stood there.
    #[inline(always)]
    pub(super) fn place(mut self, piece: Piece) -> Self {
        self.put(piece);
        self
    }

    #[inline(always)]
    fn put(&mut self, piece: Piece) {
        let sq = piece.square;
        self.grid[sq.row() as usize][sq.col() as usize] = Some(piece);
    }

    #[inline(always)]
    fn clear(&mut self, sq: Square) {
        self.grid[sq.row() as usize][sq.col() as usize] = None;
    }
}

#[cfg(test)]
impl Arbitrary for Board {
    type Parameters = ();
    type Strategy = BoxedStrategy<Self>;

    /// Positions reachable from the start by random play.
    fn arbitrary_with(_: Self::Parameters) -> Self::Strategy {
        (0..160usize, any::<Selector>())
            .prop_map(|(plies, selector)| {
                let mut board = Board::default();
                for turn in Color::ALL.into_iter().cycle().take(plies) {
                    let moves = board.moves(turn);
                    match selector.try_select(moves.iter()) {
                        None => break,
                        Some(m) => board = board.play(m),
                    }
                }

                board
            })
            .boxed()
    }
}

impl fmt::Debug for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Board({self})")
    }
}

impl fmt::Display for Board {
    /// Writes rows top to bottom, separated by `/`.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (r, row) in self.grid.iter().enumerate() {
            if r > 0 {
                f.write_str("/")?;
            }

            for sq in row {
                write!(f, "{}", sq.map_or('.', |p| p.symbol()))?;
            }
        }

        Ok(())
    }
}

/// The reason why parsing [`Board`] failed.
#[derive(Debug, Display, Copy, Clone, Eq, PartialEq, Error, From)]
pub enum ParseBoardError {
    #[display(fmt = "expected 8 rows of 8 squares")]
    #[from(ignore)]
    WrongDimensions,

    #[display(fmt = "unknown symbol `{_0}`")]
    #[from(ignore)]
    UnknownSymbol(#[error(not(source))] char),

    #[display(fmt = "invalid board")]
    InvalidPlacement(InvalidPlacement),
}

impl FromStr for Board {
    type Err = ParseBoardError;

    /// Parses the notation written by [`Display`](fmt::Display).
    ///
    /// Pieces are numbered in the order they appear.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let rows = Vec::from_iter(s.trim().split('/'));
        if rows.len() != Square::SIZE as usize {
            return Err(ParseBoardError::WrongDimensions);
        }

        let mut board = Board::empty();
        let mut ids = (0..).map(PieceId);

        for (r, row) in (0..).zip(rows) {
            if row.chars().count() != Square::SIZE as usize {
                return Err(ParseBoardError::WrongDimensions);
            }

            for (c, symbol) in (0..).zip(row.chars()) {
                let (color, role) = match symbol {
                    '.' => continue,
                    'w' => (Color::White, Role::Pawn),
                    'W' => (Color::White, Role::King),
                    'r' => (Color::Red, Role::Pawn),
                    'R' => (Color::Red, Role::King),
                    _ => return Err(ParseBoardError::UnknownSymbol(symbol)),
                };

                let sq = Square::new(r, c).ok_or(ParseBoardError::WrongDimensions)?;
                let id = ids.next().ok_or(ParseBoardError::WrongDimensions)?;
                board = board.with(Piece::new(id, color, role, sq))?;
            }
        }

        Ok(board)
    }
}

#[derive(Deserialize, Serialize)]
#[serde(transparent)]
struct Layout(Grid);

impl TryFrom<Layout> for Board {
    type Error = InvalidPlacement;

    fn try_from(Layout(grid): Layout) -> Result<Self, Self::Error> {
        let mut board = Board::empty();

        for (sq, piece) in Square::iter().zip(grid.into_iter().flatten()) {
            if let Some(p) = piece {
                if p.square != sq {
                    return Err(InvalidPlacement::Misplaced(p.id));
                }

                board = board.with(p)?;
            }
        }

        Ok(board)
    }
}

impl From<Board> for Layout {
    fn from(board: Board) -> Self {
        Layout(board.grid)
    }
}
