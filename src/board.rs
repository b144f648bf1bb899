//! Board model and board simulator.
//!
//! A [`Board`] is a plain 8x8 value. It is `Copy`, so every search node and
//! every jump-chain step owns its own grid and ancestors are never touched.
//! [`Board::apply`] is the only way a move changes a board, and it returns a
//! new value instead of mutating in place.

use std::fmt;
use std::str::FromStr;

use crate::constants::{
    CODE_DARK_KING, CODE_DARK_MAN, CODE_EMPTY, CODE_LIGHT_KING, CODE_LIGHT_MAN, DARK_BACK_RANK,
    EMPTY_CHAR, LIGHT_BACK_RANK, N, OPENING_ROWS,
};
use crate::error::CoreError;
use crate::movegen::Move;

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Color {
    /// Starts on rows 5-7, moves toward row 0, plays first.
    Light,
    /// Starts on rows 0-2, moves toward row 7.
    Dark,
}

impl Color {
    pub fn opponent(self) -> Color {
        match self {
            Color::Light => Color::Dark,
            Color::Dark => Color::Light,
        }
    }

    /// Row delta of a forward step.
    pub fn forward(self) -> isize {
        match self {
            Color::Light => -1,
            Color::Dark => 1,
        }
    }

    /// Row on which men of this color are promoted.
    pub fn back_rank(self) -> usize {
        match self {
            Color::Light => LIGHT_BACK_RANK,
            Color::Dark => DARK_BACK_RANK,
        }
    }

    /// How many rows a piece on `row` has advanced from its own home edge.
    pub fn advancement(self, row: usize) -> usize {
        match self {
            Color::Light => N - 1 - row,
            Color::Dark => row,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Color::Light => "light",
            Color::Dark => "dark",
        }
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Color {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "light" | "white" | "w" => Ok(Color::Light),
            "dark" | "black" | "b" => Ok(Color::Dark),
            other => Err(format!("unknown side: {other}")),
        }
    }
}

/// Man -> King is the only transition.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Rank {
    Man,
    King,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct Piece {
    pub color: Color,
    pub rank: Rank,
}

impl Piece {
    pub const fn man(color: Color) -> Self {
        Piece {
            color,
            rank: Rank::Man,
        }
    }

    pub const fn king(color: Color) -> Self {
        Piece {
            color,
            rank: Rank::King,
        }
    }

    #[inline]
    pub fn is_king(self) -> bool {
        self.rank == Rank::King
    }

    /// The piece after landing on `row`: crowned if that is its back rank.
    #[inline]
    pub fn landed_on(self, row: usize) -> Piece {
        if row == self.color.back_rank() {
            Piece::king(self.color)
        } else {
            self
        }
    }

    fn to_char(self) -> char {
        match (self.color, self.rank) {
            (Color::Light, Rank::Man) => 'w',
            (Color::Light, Rank::King) => 'W',
            (Color::Dark, Rank::Man) => 'b',
            (Color::Dark, Rank::King) => 'B',
        }
    }

    fn from_char(c: char) -> Option<Option<Piece>> {
        match c {
            EMPTY_CHAR => Some(None),
            'w' => Some(Some(Piece::man(Color::Light))),
            'W' => Some(Some(Piece::king(Color::Light))),
            'b' => Some(Some(Piece::man(Color::Dark))),
            'B' => Some(Some(Piece::king(Color::Dark))),
            _ => None,
        }
    }

    fn to_code(self) -> u8 {
        match (self.color, self.rank) {
            (Color::Light, Rank::Man) => CODE_LIGHT_MAN,
            (Color::Dark, Rank::Man) => CODE_DARK_MAN,
            (Color::Light, Rank::King) => CODE_LIGHT_KING,
            (Color::Dark, Rank::King) => CODE_DARK_KING,
        }
    }

    fn from_code(code: u8) -> Option<Option<Piece>> {
        match code {
            CODE_EMPTY => Some(None),
            CODE_LIGHT_MAN => Some(Some(Piece::man(Color::Light))),
            CODE_DARK_MAN => Some(Some(Piece::man(Color::Dark))),
            CODE_LIGHT_KING => Some(Some(Piece::king(Color::Light))),
            CODE_DARK_KING => Some(Some(Piece::king(Color::Dark))),
            _ => None,
        }
    }
}

/// A square on the board. Always in bounds once constructed.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Square {
    row: u8,
    col: u8,
}

impl Square {
    /// Validate raw coordinates.
    pub fn new(row: isize, col: isize) -> Result<Square, CoreError> {
        if (0..N as isize).contains(&row) && (0..N as isize).contains(&col) {
            Ok(Square {
                row: row as u8,
                col: col as u8,
            })
        } else {
            Err(CoreError::InvalidPosition { row, col })
        }
    }

    #[inline]
    pub(crate) const fn at(row: usize, col: usize) -> Square {
        Square {
            row: row as u8,
            col: col as u8,
        }
    }

    #[inline]
    pub fn row(self) -> usize {
        self.row as usize
    }

    #[inline]
    pub fn col(self) -> usize {
        self.col as usize
    }

    /// The square `steps` away along `(dr, dc)`, if it is still on the board.
    #[inline]
    pub fn offset(self, (dr, dc): (isize, isize), steps: isize) -> Option<Square> {
        let r = self.row as isize + dr * steps;
        let c = self.col as isize + dc * steps;
        Square::new(r, c).ok()
    }

    /// Every square of the board, row by row.
    pub fn all() -> impl Iterator<Item = Square> {
        (0..N).flat_map(|row| (0..N).map(move |col| Square::at(row, col)))
    }
}

impl fmt::Display for Square {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{},{}", self.row, self.col)
    }
}

impl FromStr for Square {
    type Err = String;

    /// Accepts `row,col`, optionally wrapped in parentheses.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let inner = s.trim().trim_start_matches('(').trim_end_matches(')');
        let (r, c) = inner
            .split_once(',')
            .ok_or_else(|| format!("expected row,col but got '{s}'"))?;
        let row: isize = r.trim().parse().map_err(|_| format!("bad row in '{s}'"))?;
        let col: isize = c.trim().parse().map_err(|_| format!("bad column in '{s}'"))?;
        Square::new(row, col).map_err(|e| e.to_string())
    }
}

#[derive(Copy, Clone, PartialEq, Eq, Hash)]
pub struct Board {
    cells: [[Option<Piece>; N]; N],
}

impl Default for Board {
    fn default() -> Self {
        Self::new()
    }
}

impl Board {
    /// The standard opening layout.
    pub fn new() -> Self {
        let mut board = Self::empty();
        for sq in Square::all().filter(|sq| is_playable(*sq)) {
            if sq.row() < OPENING_ROWS {
                board.place(sq, Piece::man(Color::Dark));
            } else if sq.row() >= N - OPENING_ROWS {
                board.place(sq, Piece::man(Color::Light));
            }
        }
        board
    }

    pub fn empty() -> Self {
        Self {
            cells: [[None; N]; N],
        }
    }

    #[inline]
    pub fn get(&self, sq: Square) -> Option<Piece> {
        self.cells[sq.row()][sq.col()]
    }

    pub fn place(&mut self, sq: Square, piece: Piece) {
        self.cells[sq.row()][sq.col()] = Some(piece);
    }

    pub fn remove(&mut self, sq: Square) -> Option<Piece> {
        self.cells[sq.row()][sq.col()].take()
    }

    /// Builder form of [`Board::place`].
    pub fn with(mut self, sq: Square, piece: Piece) -> Self {
        self.place(sq, piece);
        self
    }

    /// All pieces of one color in row-major order.
    pub fn pieces(&self, color: Color) -> impl Iterator<Item = (Square, Piece)> + '_ {
        Square::all().filter_map(move |sq| match self.get(sq) {
            Some(p) if p.color == color => Some((sq, p)),
            _ => None,
        })
    }

    pub fn count(&self, color: Color) -> usize {
        self.pieces(color).count()
    }

    /// Simulate a move: relocate the piece, clear every captured square and
    /// crown it if it reached its back rank, at `to` or at any landing
    /// along the jump chain. `self` is left untouched.
    pub fn apply(&self, mv: &Move) -> Board {
        let mut next = *self;
        let piece = next.remove(mv.from);
        for &captured in &mv.captured {
            next.remove(captured);
        }
        if let Some(piece) = piece {
            let piece = crowned_along(piece, mv);
            next.place(mv.to, piece.landed_on(mv.to.row()));
        }
        next
    }

    /// Parse the client's integer grid (0 empty, 1/2 men, 3/4 kings).
    pub fn from_codes<R: AsRef<[u8]>>(rows: &[R]) -> Result<Board, CoreError> {
        if rows.len() != N {
            return Err(CoreError::malformed(format!(
                "expected {N} rows, got {}",
                rows.len()
            )));
        }
        let mut board = Board::empty();
        for (r, row) in rows.iter().enumerate() {
            let row = row.as_ref();
            if row.len() != N {
                return Err(CoreError::malformed(format!(
                    "row {r} has {} cells, expected {N}",
                    row.len()
                )));
            }
            for (c, &code) in row.iter().enumerate() {
                let cell = Piece::from_code(code).ok_or_else(|| {
                    CoreError::malformed(format!("invalid cell code {code} at {r},{c}"))
                })?;
                board.cells[r][c] = cell;
            }
        }
        Ok(board)
    }

    pub fn to_codes(&self) -> Vec<Vec<u8>> {
        self.cells
            .iter()
            .map(|row| {
                row.iter()
                    .map(|cell| cell.map_or(CODE_EMPTY, Piece::to_code))
                    .collect()
            })
            .collect()
    }
}

/// Replay the short jumps of a man to see whether it crowned mid-chain.
/// A man always lands directly behind the piece it jumps, so each landing
/// follows from the previous square and the captured one.
fn crowned_along(mut piece: Piece, mv: &Move) -> Piece {
    let mut at = mv.from;
    for &over in &mv.captured {
        if piece.is_king() {
            break;
        }
        let row = 2 * over.row() as isize - at.row() as isize;
        let col = 2 * over.col() as isize - at.col() as isize;
        let Ok(land) = Square::new(row, col) else {
            break;
        };
        piece = piece.landed_on(land.row());
        at = land;
    }
    piece
}

/// Dark squares of the standard layout (row + col odd).
#[inline]
pub fn is_playable(sq: Square) -> bool {
    (sq.row() + sq.col()) % 2 == 1
}

impl FromStr for Board {
    type Err = CoreError;

    /// Parse the text form: 8 lines of 8 cells from `. w W b B`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lines: Vec<&str> = s
            .lines()
            .map(str::trim)
            .filter(|l| !l.is_empty())
            .collect();
        if lines.len() != N {
            return Err(CoreError::malformed(format!(
                "expected {N} lines, got {}",
                lines.len()
            )));
        }
        let mut board = Board::empty();
        for (r, line) in lines.iter().enumerate() {
            let cells: Vec<char> = line.chars().filter(|c| !c.is_whitespace()).collect();
            if cells.len() != N {
                return Err(CoreError::malformed(format!(
                    "line {r} has {} cells, expected {N}",
                    cells.len()
                )));
            }
            for (c, ch) in cells.into_iter().enumerate() {
                board.cells[r][c] = Piece::from_char(ch).ok_or_else(|| {
                    CoreError::malformed(format!("invalid cell '{ch}' at {r},{c}"))
                })?;
            }
        }
        Ok(board)
    }
}

impl fmt::Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for row in &self.cells {
            for cell in row {
                let ch = cell.map_or(EMPTY_CHAR, Piece::to_char);
                write!(f, "{ch}")?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

impl fmt::Debug for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Board")?;
        fmt::Display::fmt(self, f)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sq(row: isize, col: isize) -> Square {
        Square::new(row, col).unwrap()
    }

    #[test]
    fn test_opening_layout() {
        let board = Board::new();
        assert_eq!(board.count(Color::Light), 12);
        assert_eq!(board.count(Color::Dark), 12);
        assert_eq!(board.get(sq(0, 1)), Some(Piece::man(Color::Dark)));
        assert_eq!(board.get(sq(7, 0)), Some(Piece::man(Color::Light)));
        assert_eq!(board.get(sq(0, 0)), None);
        assert_eq!(board.get(sq(3, 2)), None);
        for (s, _) in board.pieces(Color::Light).chain(board.pieces(Color::Dark)) {
            assert!(is_playable(s));
        }
    }

    #[test]
    fn test_square_bounds() {
        assert!(Square::new(7, 7).is_ok());
        assert_eq!(
            Square::new(8, 0),
            Err(CoreError::InvalidPosition { row: 8, col: 0 })
        );
        assert!(Square::new(0, -1).is_err());
        assert_eq!(sq(0, 0).offset((-1, 1), 1), None);
        assert_eq!(sq(2, 2).offset((1, 1), 3), Some(sq(5, 5)));
    }

    #[test]
    fn test_square_parse() {
        assert_eq!("4,1".parse::<Square>(), Ok(sq(4, 1)));
        assert_eq!("(0, 5)".parse::<Square>(), Ok(sq(0, 5)));
        assert!("9,1".parse::<Square>().is_err());
        assert!("41".parse::<Square>().is_err());
    }

    #[test]
    fn test_apply_moves_and_captures() {
        let board = Board::empty()
            .with(sq(4, 1), Piece::man(Color::Light))
            .with(sq(3, 2), Piece::man(Color::Dark));
        let mv = Move::capture(sq(4, 1), sq(2, 3), vec![sq(3, 2)]);
        let next = board.apply(&mv);
        assert_eq!(next.get(sq(4, 1)), None);
        assert_eq!(next.get(sq(3, 2)), None);
        assert_eq!(next.get(sq(2, 3)), Some(Piece::man(Color::Light)));
        // input untouched
        assert_eq!(board.get(sq(4, 1)), Some(Piece::man(Color::Light)));
        assert_eq!(board.get(sq(3, 2)), Some(Piece::man(Color::Dark)));
    }

    #[test]
    fn test_apply_promotes_on_back_rank() {
        let board = Board::empty().with(sq(1, 2), Piece::man(Color::Light));
        let next = board.apply(&Move::simple(sq(1, 2), sq(0, 1)));
        assert_eq!(next.get(sq(0, 1)), Some(Piece::king(Color::Light)));

        let board = Board::empty().with(sq(6, 1), Piece::man(Color::Dark));
        let next = board.apply(&Move::simple(sq(6, 1), sq(7, 0)));
        assert_eq!(next.get(sq(7, 0)), Some(Piece::king(Color::Dark)));
    }

    #[test]
    fn test_apply_keeps_crown_earned_mid_chain() {
        // Dark jumps 6,3 onto row 7, then 5,6 as a king back to 4,7.
        let board = Board::empty()
            .with(sq(5, 2), Piece::man(Color::Dark))
            .with(sq(6, 3), Piece::man(Color::Light))
            .with(sq(5, 6), Piece::man(Color::Light));
        let mv = Move::capture(sq(5, 2), sq(4, 7), vec![sq(6, 3), sq(5, 6)]);
        let next = board.apply(&mv);
        assert_eq!(next.get(sq(4, 7)), Some(Piece::king(Color::Dark)));
        assert_eq!(next.count(Color::Light), 0);
    }

    #[test]
    fn test_text_roundtrip() {
        let board = Board::new();
        let parsed: Board = board.to_string().parse().unwrap();
        assert_eq!(parsed, board);
    }

    #[test]
    fn test_text_rejects_bad_input() {
        assert!("........".parse::<Board>().is_err());
        let mut text = Board::new().to_string();
        text = text.replacen('w', "x", 1);
        let err = text.parse::<Board>().unwrap_err();
        assert_eq!(err.kind(), "malformed_board");
    }

    #[test]
    fn test_codes_roundtrip_and_validation() {
        let board = Board::new().with(sq(3, 4), Piece::king(Color::Dark));
        let codes = board.to_codes();
        assert_eq!(codes[3][4], CODE_DARK_KING);
        assert_eq!(Board::from_codes(&codes).unwrap(), board);

        let short = vec![vec![0u8; N]; N - 1];
        assert!(Board::from_codes(&short).is_err());

        let mut bad = codes.clone();
        bad[0][0] = 9;
        assert!(matches!(
            Board::from_codes(&bad),
            Err(CoreError::MalformedBoard { .. })
        ));
    }
}
