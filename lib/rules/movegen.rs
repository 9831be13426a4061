use crate::rules::{Board, Captures, Color, Move, Piece, PieceId, Role, Square};
use arrayvec::ArrayVec;
use std::iter::successors;

const DIAGONALS: [(i8, i8); 4] = [(1, 1), (1, -1), (-1, 1), (-1, -1)];

/// The legal moves of one side, grouped by the piece that moves.
///
/// Pieces that cannot move are not listed.
#[derive(Debug, Default, Clone, Eq, PartialEq)]
pub struct MoveSet {
    entries: Vec<(Piece, Vec<Move>)>,
}

impl MoveSet {
    /// Whether the side has no legal moves at all.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// The total number of legal moves.
    pub fn len(&self) -> usize {
        self.entries.iter().map(|(_, moves)| moves.len()).sum()
    }

    /// Whether the legal moves are captures.
    ///
    /// Captures are mandatory, so either all legal moves are captures or none is.
    pub fn is_capture(&self) -> bool {
        self.iter().any(Move::is_capture)
    }

    /// An iterator over all legal moves.
    pub fn iter(&self) -> impl Iterator<Item = &Move> {
        self.entries.iter().flat_map(|(_, moves)| moves)
    }

    /// An iterator over the pieces that can move.
    pub fn pieces(&self) -> impl Iterator<Item = Piece> + '_ {
        self.entries.iter().map(|(p, _)| *p)
    }

    /// The legal moves of a specific piece.
    pub fn for_piece(&self, id: PieceId) -> &[Move] {
        match self.entries.iter().find(|(p, _)| p.id == id) {
            Some((_, moves)) => moves,
            None => &[],
        }
    }

    /// Whether the given [`Move`] is legal.
    pub fn contains(&self, m: &Move) -> bool {
        self.for_piece(m.piece).contains(m)
    }

    /// The legal moves between a pair of squares.
    ///
    /// More than one capture sequence may connect the same squares.
    pub fn find(&self, from: Square, to: Square) -> impl Iterator<Item = &Move> {
        self.iter().filter(move |m| m.from == from && m.to == to)
    }
}

impl Board {
    /// The legal moves of the given side.
    ///
    /// Captures are mandatory and only the sequences that capture the most pieces are legal.
    pub fn moves(&self, side: Color) -> MoveSet {
        let captures = Vec::from_iter(
            self.by_color(side)
                .map(|p| (p, self.captures(p)))
                .filter(|(_, moves)| !moves.is_empty()),
        );

        if captures.is_empty() {
            let entries = self
                .by_color(side)
                .map(|p| (p, Vec::from_iter(self.steps(p))))
                .filter(|(_, moves)| !moves.is_empty())
                .collect();

            return MoveSet { entries };
        }

        let longest = captures
            .iter()
            .flat_map(|(_, moves)| moves)
            .map(|m| m.captured.len())
            .max()
            .unwrap_or_default();

        let entries = captures
            .into_iter()
            .map(|(p, mut moves)| {
                moves.retain(|m| m.captured.len() == longest);
                (p, moves)
            })
            .filter(|(_, moves)| !moves.is_empty())
            .collect();

        MoveSet { entries }
    }

    /// Every complete capture sequence available to a piece.
    fn captures(&self, piece: Piece) -> Vec<Move> {
        let mut moves = Vec::new();
        self.sequences(piece, piece.square, Captures::new(), &mut moves);
        moves
    }

    /// Extends a capture sequence from where `piece` currently stands.
    ///
    /// Captured pieces stay on the board until the sequence completes and can't be jumped again.
    fn sequences(self, piece: Piece, origin: Square, captured: Captures, moves: &mut Vec<Move>) {
        let jumps = self.jumps(piece, &captured);

        if jumps.is_empty() {
            if captured.is_empty() {
                return;
            }

            let m = Move {
                piece: piece.id,
                from: origin,
                to: piece.square,
                promotes: piece.promotes_on(piece.square),
                captured,
            };

            if !moves.contains(&m) {
                moves.push(m);
            }

            return;
        }

        for (victim, landing) in jumps {
            let mut captured = captured.clone();
            captured.push(victim);

            let next = piece.relocate(landing);
            let board = self.lift(piece.square).place(next);
            board.sequences(next, origin, captured, moves);
        }
    }

    /// The single captures available to a piece, as pairs of victim and landing square.
    fn jumps(&self, piece: Piece, captured: &Captures) -> ArrayVec<(PieceId, Square), 28> {
        let mut jumps = ArrayVec::new();
        let reach = reach(piece.role);

        for (dr, dc) in DIAGONALS {
            let mut ray = ray(piece.square, dr, dc);

            let victim = match ray.by_ref().take(reach).find_map(|sq| self.piece_on(sq)) {
                Some(p) if p.color != piece.color && !captured.contains(&p.id) => p,
                _ => continue,
            };

            for landing in ray.take_while(|&sq| self.piece_on(sq).is_none()).take(reach) {
                jumps.push((victim.id, landing));
            }
        }

        jumps
    }

    /// The non-capturing moves available to a piece.
    fn steps(&self, piece: Piece) -> impl Iterator<Item = Move> + '_ {
        let forward = piece.color.forward();
        let directions = match piece.role {
            Role::Pawn => ArrayVec::from_iter([(forward, 1), (forward, -1)]),
            Role::King => ArrayVec::<_, 4>::from(DIAGONALS),
        };

        directions.into_iter().flat_map(move |(dr, dc)| {
            ray(piece.square, dr, dc)
                .take(reach(piece.role))
                .take_while(move |&sq| self.piece_on(sq).is_none())
                .map(move |to| Move {
                    piece: piece.id,
                    from: piece.square,
                    to,
                    captured: Captures::new(),
                    promotes: piece.promotes_on(to),
                })
        })
    }
}

/// How many squares a piece may travel along a diagonal.
fn reach(role: Role) -> usize {
    match role {
        Role::Pawn => 1,
        Role::King => Square::SIZE as usize - 1,
    }
}

/// The squares along a diagonal, starting next to `sq` and up to the edge of the board.
fn ray(sq: Square, dr: i8, dc: i8) -> impl Iterator<Item = Square> {
    successors(sq.offset(dr, dc), move |s| s.offset(dr, dc))
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_strategy::proptest;

    fn sq(row: i8, col: i8) -> Square {
        Square::new(row, col).unwrap()
    }

    fn board(s: &str) -> Board {
        s.split_whitespace().collect::<Vec<_>>().join("/").parse().unwrap()
    }

    #[test]
    fn only_front_row_pawns_can_move_from_the_starting_position() {
        let b = Board::default();
        let moves = b.moves(Color::White);

        assert!(!moves.is_capture());
        assert_eq!(moves.len(), 7);
        assert_eq!(
            Vec::from_iter(moves.pieces().map(|p| p.square)),
            vec![sq(5, 1), sq(5, 3), sq(5, 5), sq(5, 7)]
        );

        for m in moves.iter() {
            assert_eq!(m.to.row(), 4);
            assert_eq!((m.to.col() - m.from.col()).abs(), 1);
            assert!(!m.promotes);
        }

        assert_eq!(b.moves(Color::Red).len(), 7);
    }

    #[test]
    fn capture_is_mandatory() {
        let b = board(
            "......r.
             ........
             ..r.....
             ...w....
             ........
             ........
             ........
             .......w",
        );

        let moves = b.moves(Color::Red);
        let white = b.at(3, 3).unwrap();

        assert_eq!(moves.len(), 1);
        assert_eq!(
            Vec::from_iter(moves.iter().cloned()),
            vec![Move {
                piece: b.at(2, 2).unwrap().id,
                from: sq(2, 2),
                to: sq(4, 4),
                captured: Captures::from_iter([white.id]),
                promotes: false,
            }]
        );

        assert!(moves.for_piece(b.at(0, 6).unwrap().id).is_empty());
    }

    #[test]
    fn pawns_may_capture_backwards() {
        let b = board(
            "........
             ........
             ..w.....
             ...r....
             ........
             ........
             ........
             ........",
        );

        let moves = b.moves(Color::Red);
        assert!(moves.is_capture());
        assert_eq!(Vec::from_iter(moves.iter().map(|m| m.to)), vec![sq(1, 1)]);
    }

    #[test]
    fn majority_law_excludes_shorter_sequences() {
        let b = board(
            "........
             ........
             ....r...
             ........
             ..r.....
             .w...r..
             ......w.
             ........",
        );

        let moves = b.moves(Color::White);
        let long = b.at(5, 1).unwrap();
        let short = b.at(6, 6).unwrap();

        assert_eq!(moves.len(), 1);
        assert_eq!(Vec::from_iter(moves.pieces()), vec![long]);
        assert!(moves.for_piece(short.id).is_empty());

        let m = &moves.for_piece(long.id)[0];
        assert_eq!((m.from, m.to), (sq(5, 1), sq(1, 5)));
        assert_eq!(
            m.captured,
            Captures::from_iter([b.at(4, 2).unwrap().id, b.at(2, 4).unwrap().id])
        );
    }

    #[test]
    fn majority_law_keeps_every_sequence_of_maximum_length() {
        let b = board(
            "........
             ........
             ........
             ........
             ..r...r.
             .w...w..
             ........
             ........",
        );

        let moves = b.moves(Color::White);
        assert_eq!(moves.len(), 2);
        assert_eq!(moves.pieces().count(), 2);
        assert!(moves.iter().all(|m| m.captured.len() == 1));
    }

    #[test]
    fn pawn_crossing_far_row_mid_sequence_is_not_promoted() {
        let b = board(
            "........
             ...r.r..
             ..w.....
             ........
             ........
             ........
             ........
             ........",
        );

        let moves = b.moves(Color::White);
        assert_eq!(moves.len(), 1);

        let m = moves.iter().next().unwrap();
        assert_eq!((m.from, m.to), (sq(2, 2), sq(2, 6)));
        assert_eq!(m.captured.len(), 2);
        assert!(!m.promotes);
    }

    #[test]
    fn pawn_ending_sequence_on_far_row_is_promoted() {
        let b = board(
            "........
             .r......
             ..w.....
             ........
             ........
             ........
             ........
             ........",
        );

        let moves = b.moves(Color::White);
        assert_eq!(moves.len(), 1);

        let m = moves.iter().next().unwrap();
        assert_eq!(m.to, sq(0, 0));
        assert!(m.promotes);
    }

    #[test]
    fn pawn_reaching_far_row_is_promoted() {
        let b = board(
            "........
             .w......
             ........
             ........
             ........
             ........
             ........
             ........",
        );

        let moves = b.moves(Color::White);
        assert_eq!(moves.len(), 2);
        assert!(moves.iter().all(|m| m.promotes));
    }

    #[test]
    fn king_flies_over_empty_squares_to_capture() {
        let b = board(
            "........
             ........
             ..W.....
             ........
             ........
             .....r..
             ........
             ........",
        );

        let moves = b.moves(Color::White);
        let victim = b.at(5, 5).unwrap();

        assert_eq!(
            Vec::from_iter(moves.iter().map(|m| m.to)),
            vec![sq(6, 6), sq(7, 7)]
        );

        for m in moves.iter() {
            assert_eq!(m.captured, Captures::from_iter([victim.id]));
            assert!(!m.promotes);
        }
    }

    #[test]
    fn king_cannot_jump_two_adjacent_pieces() {
        let b = board(
            "W.......
             ........
             ..r.....
             ...r....
             ........
             ........
             ........
             ........",
        );

        let moves = b.moves(Color::White);
        assert!(!moves.is_capture());
        assert_eq!(Vec::from_iter(moves.iter().map(|m| m.to)), vec![sq(1, 1)]);
    }

    #[test]
    fn king_continues_capturing_from_any_landing_square() {
        let b = board(
            "W.......
             ........
             ..r.....
             ........
             ........
             .....r..
             ........
             ........",
        );

        let moves = b.moves(Color::White);
        assert_eq!(moves.len(), 2);

        for m in moves.iter() {
            assert_eq!(m.captured.len(), 2);
            assert_eq!(m.from, sq(0, 0));
        }

        assert_eq!(
            Vec::from_iter(moves.iter().map(|m| m.to)),
            vec![sq(6, 6), sq(7, 7)]
        );
    }

    #[test]
    fn captured_pieces_block_the_rest_of_the_sequence() {
        let b = board(
            "........
             ........
             ........
             ...r....
             ........
             .....W..
             ........
             ........",
        );

        let moves = b.moves(Color::White);
        assert_eq!(
            Vec::from_iter(moves.iter().map(|m| m.to)),
            vec![sq(2, 2), sq(1, 1), sq(0, 0)]
        );

        assert!(moves.iter().all(|m| m.captured.len() == 1));
    }

    #[test]
    fn allies_block_movement() {
        let b = board(
            "........
             ........
             ........
             ........
             w.w.....
             .w......
             ........
             ........",
        );

        let moves = b.moves(Color::White);
        assert!(moves.for_piece(b.at(5, 1).unwrap().id).is_empty());
        assert_eq!(moves.pieces().count(), 2);
    }

    #[proptest]
    fn side_without_pieces_has_no_moves(c: Color) {
        assert!(Board::empty().moves(c).is_empty());
    }

    #[proptest]
    fn simple_moves_are_excluded_if_any_capture_exists(b: Board, c: Color) {
        let moves = b.moves(c);
        if moves.is_capture() {
            assert!(moves.iter().all(Move::is_capture));
        }
    }

    #[proptest]
    fn all_captures_have_the_same_length(b: Board, c: Color) {
        let moves = b.moves(c);
        let mut lengths = moves.iter().map(|m| m.captured.len());
        if let Some(n) = lengths.next() {
            assert!(lengths.all(|l| l == n));
        }
    }

    #[proptest]
    fn moves_belong_to_pieces_of_the_side_to_move(b: Board, c: Color) {
        let moves = b.moves(c);
        for p in moves.pieces() {
            assert_eq!(p.color, c);
            assert_eq!(b.find(p.id), Some(p));
            assert!(moves.for_piece(p.id).iter().all(|m| m.piece == p.id && m.from == p.square));
        }
    }

    #[proptest]
    fn moves_land_on_empty_dark_squares(b: Board, c: Color) {
        for m in b.moves(c).iter() {
            assert!(m.to.is_dark());
            assert!(m.to == m.from || b.piece_on(m.to).is_none());
        }
    }

    #[proptest]
    fn captured_pieces_are_distinct_opponents(b: Board, c: Color) {
        for m in b.moves(c).iter() {
            let mut ids = m.captured.to_vec();
            ids.sort();
            ids.dedup();
            assert_eq!(ids.len(), m.captured.len());
            assert!(m.captured.iter().all(|&id| b.find(id).map(|p| p.color) == Some(!c)));
        }
    }

    #[proptest]
    fn move_set_contains_every_listed_move(b: Board, c: Color) {
        let moves = b.moves(c);
        for m in moves.iter() {
            assert!(moves.contains(m));
            assert!(moves.find(m.from, m.to).any(|n| n == m));
        }
    }
}
