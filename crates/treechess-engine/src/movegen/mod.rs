//! Move generation.
//!
//! Pseudolegal moves come from per-kind rules dispatched with a `match` on
//! [`PieceKind`]. Legality is decided by applying each candidate to the
//! shared position, testing the mover's king, and undoing it again, so the
//! position is unchanged once generation returns.

mod attacks;
pub mod perft;

use crate::position::Status;
use crate::Position;
use treechess_core::{Color, Coord, Move, PieceId, PieceKind};

pub use attacks::{
    is_attacked, is_in_check, BISHOP_DIRECTIONS, KING_OFFSETS, KNIGHT_OFFSETS, QUEEN_DIRECTIONS,
    ROOK_DIRECTIONS,
};

/// Fixed-capacity, stack-allocated move buffer for a single piece.
///
/// Candidates are pushed in generation order and filtered in place. Side-wide
/// lists are collected into a `Vec`, since a loaded layout is not bounded by
/// what normal play can reach.
#[derive(Clone)]
pub struct MoveList {
    moves: [Move; Self::MAX_MOVES],
    len: usize,
}

impl MoveList {
    /// Capacity; one piece has at most 27 moves.
    pub const MAX_MOVES: usize = 32;

    #[inline]
    pub const fn new() -> Self {
        MoveList {
            moves: [Move::NULL; Self::MAX_MOVES],
            len: 0,
        }
    }

    #[inline]
    pub fn push(&mut self, m: Move) {
        debug_assert!(self.len < Self::MAX_MOVES);
        self.moves[self.len] = m;
        self.len += 1;
    }

    #[inline]
    pub const fn len(&self) -> usize {
        self.len
    }

    #[inline]
    pub const fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Returns a slice of the moves.
    #[inline]
    pub fn as_slice(&self) -> &[Move] {
        &self.moves[..self.len]
    }

    /// Retains only moves for which the predicate returns true, keeping order.
    pub fn retain<F>(&mut self, mut f: F)
    where
        F: FnMut(&Move) -> bool,
    {
        let mut write = 0;
        for read in 0..self.len {
            if f(&self.moves[read]) {
                self.moves[write] = self.moves[read];
                write += 1;
            }
        }
        self.len = write;
    }
}

impl Default for MoveList {
    fn default() -> Self {
        Self::new()
    }
}

impl std::ops::Index<usize> for MoveList {
    type Output = Move;

    #[inline]
    fn index(&self, index: usize) -> &Self::Output {
        &self.as_slice()[index]
    }
}

impl std::ops::Deref for MoveList {
    type Target = [Move];

    #[inline]
    fn deref(&self) -> &[Move] {
        self.as_slice()
    }
}

impl<'a> IntoIterator for &'a MoveList {
    type Item = &'a Move;
    type IntoIter = std::slice::Iter<'a, Move>;

    fn into_iter(self) -> Self::IntoIter {
        self.as_slice().iter()
    }
}

impl std::fmt::Debug for MoveList {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_list().entries(self.as_slice()).finish()
    }
}

/// Generates the pseudolegal moves of the piece `id` standing on `from`.
///
/// Moves may leave the mover's own king attacked, and castling moves are
/// not yet checked for passing through attacked squares.
pub fn pseudolegal_moves(position: &Position, id: PieceId, from: Coord) -> MoveList {
    let mut moves = MoveList::new();
    push_pseudolegal(position, id, from, &mut moves);
    moves
}

fn push_pseudolegal(position: &Position, id: PieceId, from: Coord, moves: &mut MoveList) {
    match position.piece(id).kind {
        PieceKind::Pawn => push_pawn_moves(position, id, from, moves),
        PieceKind::Knight => push_steps(position, id, from, &KNIGHT_OFFSETS, moves),
        PieceKind::Bishop => push_rays(position, id, from, &BISHOP_DIRECTIONS, moves),
        PieceKind::Rook => push_rays(position, id, from, &ROOK_DIRECTIONS, moves),
        PieceKind::Queen => push_rays(position, id, from, &QUEEN_DIRECTIONS, moves),
        PieceKind::King => {
            push_steps(position, id, from, &KING_OFFSETS, moves);
            push_castling_moves(position, id, from, moves);
        }
    }
}

/// Fixed-offset movers (knight, king).
fn push_steps(
    position: &Position,
    id: PieceId,
    from: Coord,
    offsets: &[(i8, i8)],
    moves: &mut MoveList,
) {
    for &(dr, df) in offsets {
        let to = from.offset(dr, df);
        if !to.is_on_board() {
            continue;
        }
        // SAFETY: bounds checked above.
        match unsafe { position.piece_at_unchecked(to) } {
            None => moves.push(Move::quiet(id, from, to)),
            Some(target) if target.color != id.color => {
                moves.push(Move::capture(id, target, from, to))
            }
            Some(_) => {}
        }
    }
}

/// Sliding movers walk each ray until the edge or the first piece.
fn push_rays(
    position: &Position,
    id: PieceId,
    from: Coord,
    directions: &[(i8, i8)],
    moves: &mut MoveList,
) {
    for &(dr, df) in directions {
        let mut to = from.offset(dr, df);
        while to.is_on_board() {
            // SAFETY: loop condition keeps `to` on the board.
            match unsafe { position.piece_at_unchecked(to) } {
                None => moves.push(Move::quiet(id, from, to)),
                Some(target) => {
                    if target.color != id.color {
                        moves.push(Move::capture(id, target, from, to));
                    }
                    break;
                }
            }
            to = to.offset(dr, df);
        }
    }
}

/// Pushes a pawn move, expanded into every promotion when it reaches the last rank.
#[inline]
fn push_pawn_move(m: Move, color: Color, moves: &mut MoveList) {
    if m.to.rank == color.promotion_rank() {
        for kind in PieceKind::PROMOTIONS {
            moves.push(m.with_promotion(kind));
        }
    } else {
        moves.push(m);
    }
}

fn push_pawn_moves(position: &Position, id: PieceId, from: Coord, moves: &mut MoveList) {
    let color = id.color;
    let dir = color.pawn_direction();

    let one = from.offset(dir, 0);
    if one.is_on_board() && position.piece_at(one).is_none() {
        push_pawn_move(Move::quiet(id, from, one), color, moves);

        let two = from.offset(2 * dir, 0);
        if from.rank == color.pawn_start_rank() && position.piece_at(two).is_none() {
            moves.push(Move::quiet(id, from, two));
        }
    }

    for df in [-1, 1] {
        let to = from.offset(dir, df);
        if let Some(target) = position.piece_at(to) {
            if target.color != color {
                push_pawn_move(Move::capture(id, target, from, to), color, moves);
            }
        }
    }

    for df in [-1, 1] {
        let beside = from.offset(0, df);
        if let Some(victim) = en_passant_victim(position, beside, color) {
            let to = from.offset(dir, df);
            if position.piece_at(to).is_none() {
                moves.push(Move::en_passant_capture(id, victim, from, to));
            }
        }
    }
}

/// Returns the enemy pawn on `beside` if it double-advanced on the previous ply.
fn en_passant_victim(position: &Position, beside: Coord, color: Color) -> Option<PieceId> {
    let id = position.piece_at(beside)?;
    if id.color == color {
        return None;
    }
    let pawn = position.piece(id);
    let enemy = id.color;
    let double_rank = enemy.pawn_start_rank() + 2 * enemy.pawn_direction();
    let previous_ply = position.ply().checked_sub(1)?;
    (pawn.kind == PieceKind::Pawn
        && pawn.move_count == 1
        && pawn.first_move_ply == Some(previous_ply)
        && pawn.home.rank == enemy.pawn_start_rank()
        && beside.rank == double_rank)
        .then_some(id)
}

/// Castling candidates: unmoved king on its home square, unmoved rook in the
/// corner, nothing in between. Attacked squares are left to the legality filter.
fn push_castling_moves(position: &Position, id: PieceId, from: Coord, moves: &mut MoveList) {
    let king = position.piece(id);
    let back = id.color.back_rank();
    if king.move_count != 0 || from != Coord::new(back, 4) {
        return;
    }

    for castle in [1i8, -1] {
        let (rook_file, between) = if castle > 0 { (7, 5..=6) } else { (0, 1..=3) };
        let Some(rook_id) = position.piece_at(Coord::new(back, rook_file)) else {
            continue;
        };
        let rook = position.piece(rook_id);
        if rook.color != id.color || rook.kind != PieceKind::Rook || rook.move_count != 0 {
            continue;
        }
        if between
            .into_iter()
            .all(|file| position.piece_at(Coord::new(back, file)).is_none())
        {
            moves.push(Move::castling(id, rook_id, from, castle));
        }
    }
}

/// Returns true if `m` does not leave the mover's king attacked.
///
/// Castling additionally requires the king's start and transit squares to be
/// safe before the move is made.
fn is_legal(position: &mut Position, m: Move) -> bool {
    let color = m.piece.color;
    if m.castle != 0
        && (is_attacked(position, m.from, color)
            || is_attacked(position, m.from.offset(0, m.castle), color))
    {
        return false;
    }
    position.with_move(m, |p| !is_in_check(p, color))
}

/// Legal moves of the piece `id` on `from`.
fn piece_legal_moves(position: &mut Position, id: PieceId, from: Coord) -> MoveList {
    let mut candidates = pseudolegal_moves(position, id, from);
    candidates.retain(|m| is_legal(position, *m));
    candidates
}

/// Returns the legal moves of the side to move's piece on `from`.
///
/// Empty if `from` is off the board, empty, or holds an opposing piece.
pub fn legal_moves_from(position: &mut Position, from: Coord) -> MoveList {
    match position.owned_at(from) {
        Some(id) => piece_legal_moves(position, id, from),
        None => MoveList::new(),
    }
}

/// Returns every legal move of `side`, in registry order.
///
/// When `side` is the side to move this also records the position's
/// [`Status`]: ongoing if any move exists, otherwise checkmate or stalemate
/// depending on whether the king is attacked.
pub fn legal_moves_for_side(position: &mut Position, side: Color) -> Vec<Move> {
    let mut moves = Vec::new();
    for index in 0..position.pieces(side).len() {
        let piece = &position.pieces(side)[index];
        if !piece.active {
            continue;
        }
        let (id, from) = (piece.id(), piece.location);
        moves.extend_from_slice(&piece_legal_moves(position, id, from));
    }

    if side == position.side_to_move() {
        let status = status_for(position, side, !moves.is_empty());
        position.set_status(status);
    }
    moves
}

/// Returns every legal move of the side to move.
#[inline]
pub fn generate_moves(position: &mut Position) -> Vec<Move> {
    let side = position.side_to_move();
    legal_moves_for_side(position, side)
}

/// Returns true as soon as one legal move is found for the side to move.
pub fn has_legal_move(position: &mut Position) -> bool {
    let side = position.side_to_move();
    for index in 0..position.pieces(side).len() {
        let piece = &position.pieces(side)[index];
        if !piece.active {
            continue;
        }
        let (id, from) = (piece.id(), piece.location);
        let candidates = pseudolegal_moves(position, id, from);
        for &m in &candidates {
            if is_legal(position, m) {
                return true;
            }
        }
    }
    false
}

/// Recomputes and records the status of the side to move.
pub fn refresh_status(position: &mut Position) -> Status {
    let side = position.side_to_move();
    let any = has_legal_move(position);
    let status = status_for(position, side, any);
    position.set_status(status);
    status
}

fn status_for(position: &Position, side: Color, has_moves: bool) -> Status {
    if has_moves {
        Status::Ongoing
    } else if is_in_check(position, side) {
        Status::Checkmate
    } else {
        Status::Stalemate
    }
}

/// Resolves long algebraic text (e.g. "e2e4", "e7e8q") to a legal move.
pub fn find_legal_move(position: &mut Position, text: &str) -> Option<Move> {
    let text = text.trim().to_ascii_lowercase();
    let from = Coord::from_algebraic(text.get(0..2)?)?;
    legal_moves_from(position, from)
        .as_slice()
        .iter()
        .copied()
        .find(|m| m.to_uci() == text)
}

#[cfg(test)]
mod tests {
    use super::*;
    use treechess_core::Description;

    fn at(s: &str) -> Coord {
        Coord::from_algebraic(s).unwrap()
    }

    fn uci(moves: &[Move]) -> Vec<String> {
        moves.iter().map(|m| m.to_uci()).collect()
    }

    fn play(position: &mut Position, text: &str) -> Move {
        let m = find_legal_move(position, text).unwrap();
        position.apply(m);
        m
    }

    #[test]
    fn movelist_push_and_iterate() {
        let mut list = MoveList::new();
        assert!(list.is_empty());

        let pos = Position::startpos();
        let pawn = pos.piece_at(at("e2")).unwrap();
        let m1 = Move::quiet(pawn, at("e2"), at("e3"));
        let m2 = Move::quiet(pawn, at("e2"), at("e4"));
        list.push(m1);
        list.push(m2);

        assert_eq!(list.len(), 2);
        assert_eq!(list[0], m1);
        assert_eq!(list[1], m2);

        list.retain(|m| m.to == at("e4"));
        assert_eq!(list.as_slice(), &[m2]);

        list.retain(|_| false);
        assert!(list.is_empty());
    }

    #[test]
    fn startpos_has_twenty_moves() {
        let mut pos = Position::startpos();
        let moves = generate_moves(&mut pos);
        assert_eq!(moves.len(), 20);
        assert_eq!(
            moves
                .as_slice()
                .iter()
                .filter(|m| pos.piece(m.piece).kind == PieceKind::Knight)
                .count(),
            4
        );
        assert_eq!(pos.status(), Status::Ongoing);
    }

    #[test]
    fn generation_follows_registry_order() {
        let mut pos = Position::startpos();
        let moves = uci(&generate_moves(&mut pos));
        assert_eq!(&moves[..4], &["a2a3", "a2a4", "b2b3", "b2b4"]);
        assert_eq!(&moves[16..], &["b1c3", "b1a3", "g1h3", "g1f3"]);
    }

    #[test]
    fn generation_leaves_position_unchanged() {
        let mut pos = Position::from_fen(
            "r3k2r/p1ppqpb1/bn2pnp1/3PN3/1p2P3/2N2Q1p/PPPBBPPP/R3K2R w KQkq - 0 1",
        )
        .unwrap();
        let first = uci(&generate_moves(&mut pos));
        let snapshot = pos.clone();
        let second = uci(&generate_moves(&mut pos));
        assert_eq!(first, second);
        assert_eq!(pos, snapshot);
    }

    #[test]
    fn legal_moves_from_only_picks_own_pieces() {
        let mut pos = Position::startpos();
        assert_eq!(legal_moves_from(&mut pos, at("e2")).len(), 2);
        assert!(legal_moves_from(&mut pos, at("e7")).is_empty());
        assert!(legal_moves_from(&mut pos, at("e4")).is_empty());
        assert!(legal_moves_from(&mut pos, Coord::new(-1, 4)).is_empty());
    }

    #[test]
    fn pinned_piece_cannot_move() {
        // The e2 knight shields its king from the e8 rook.
        let mut pos = Position::from_fen("k3r3/8/8/8/8/8/4N3/4K3 w").unwrap();
        assert!(legal_moves_from(&mut pos, at("e2")).is_empty());
        let knight = pos.piece_at(at("e2")).unwrap();
        assert_eq!(pseudolegal_moves(&pos, knight, at("e2")).len(), 6);
    }

    #[test]
    fn pawn_double_advance_needs_clear_path() {
        let mut pos = Position::from_fen("4k3/8/8/8/8/4n3/4P3/4K3 w").unwrap();
        assert!(legal_moves_from(&mut pos, at("e2")).is_empty());
        let mut pos = Position::from_fen("4k3/8/8/8/4n3/8/4P3/4K3 w").unwrap();
        assert_eq!(uci(&legal_moves_from(&mut pos, at("e2"))), ["e2e3"]);
    }

    #[test]
    fn promotion_expands_to_four_moves() {
        let mut pos = Position::from_fen("1n2k3/P7/8/8/8/8/8/4K3 w").unwrap();
        let moves = uci(&legal_moves_from(&mut pos, at("a7")));
        assert_eq!(
            moves,
            ["a7a8q", "a7a8r", "a7a8b", "a7a8n", "a7b8q", "a7b8r", "a7b8b", "a7b8n"]
        );
    }

    #[test]
    fn en_passant_after_double_advance() {
        let mut pos = Position::from_fen("4k3/8/8/8/1p6/8/P7/4K3 w").unwrap();
        play(&mut pos, "a2a4");
        let moves = legal_moves_from(&mut pos, at("b4"));
        let ep: Vec<&Move> = moves.as_slice().iter().filter(|m| m.en_passant).collect();
        assert_eq!(ep.len(), 1);
        assert_eq!(ep[0].to_uci(), "b4a3");
    }

    #[test]
    fn en_passant_expires_after_one_ply() {
        let mut pos = Position::from_fen("4k3/8/8/8/1p6/8/P7/4K3 w").unwrap();
        play(&mut pos, "a2a4");
        play(&mut pos, "e8d8");
        play(&mut pos, "e1d1");
        let moves = legal_moves_from(&mut pos, at("b4"));
        assert!(moves.as_slice().iter().all(|m| !m.en_passant));
    }

    #[test]
    fn no_en_passant_after_two_single_steps() {
        let mut pos = Position::from_fen("4k3/8/8/8/1p6/P7/8/4K3 w").unwrap();
        play(&mut pos, "a3a4");
        let moves = legal_moves_from(&mut pos, at("b4"));
        assert!(moves.as_slice().iter().all(|m| !m.en_passant));
    }

    #[test]
    fn castling_both_sides() {
        let mut pos = Position::from_fen("4k3/8/8/8/8/8/8/R3K2R w").unwrap();
        let moves = legal_moves_from(&mut pos, at("e1"));
        let castles: Vec<(String, i8)> = moves
            .as_slice()
            .iter()
            .filter(|m| m.is_castle())
            .map(|m| (m.to_uci(), m.castle))
            .collect();
        assert_eq!(
            castles,
            [("e1g1".to_string(), 1), ("e1c1".to_string(), -1)]
        );
    }

    #[test]
    fn no_castling_after_rook_moved() {
        let mut pos = Position::from_fen("4k3/8/8/8/8/8/8/R3K2R w").unwrap();
        play(&mut pos, "h1h2");
        play(&mut pos, "e8d8");
        play(&mut pos, "h2h1");
        play(&mut pos, "d8e8");
        let moves = legal_moves_from(&mut pos, at("e1"));
        let castles: Vec<i8> = moves
            .as_slice()
            .iter()
            .filter(|m| m.is_castle())
            .map(|m| m.castle)
            .collect();
        assert_eq!(castles, [-1]);
    }

    #[test]
    fn no_castling_through_or_out_of_check() {
        // f1 is attacked: no king-side castle; queen-side is fine.
        let mut pos = Position::from_fen("4k3/8/8/8/8/8/5r2/R3K2R w").unwrap();
        let castles: Vec<i8> = legal_moves_from(&mut pos, at("e1"))
            .as_slice()
            .iter()
            .filter(|m| m.is_castle())
            .map(|m| m.castle)
            .collect();
        assert!(!castles.contains(&1));

        // King in check: no castling at all.
        let mut pos = Position::from_fen("4r1k1/8/8/8/8/8/8/R3K2R w").unwrap();
        assert!(legal_moves_from(&mut pos, at("e1"))
            .as_slice()
            .iter()
            .all(|m| !m.is_castle()));
    }

    #[test]
    fn no_castling_into_check() {
        let mut pos = Position::from_fen("4k1r1/8/8/8/8/8/8/4K2R w").unwrap();
        assert!(legal_moves_from(&mut pos, at("e1"))
            .as_slice()
            .iter()
            .all(|m| !m.is_castle()));
    }

    #[test]
    fn checkmate_and_stalemate_are_distinct() {
        let mut mate = Position::from_fen("7k/6Q1/6K1/8/8/8/8/8 b").unwrap();
        assert!(generate_moves(&mut mate).is_empty());
        assert_eq!(mate.status(), Status::Checkmate);
        assert!(mate.is_terminal());

        let mut stale = Position::from_fen("7k/5Q2/6K1/8/8/8/8/8 b").unwrap();
        assert!(generate_moves(&mut stale).is_empty());
        assert_eq!(stale.status(), Status::Stalemate);
        assert!(stale.is_terminal());

        let mut open = Position::startpos();
        assert_eq!(refresh_status(&mut open), Status::Ongoing);
        assert!(!open.is_terminal());
    }

    const CROWDED: &str = "1QQQQQQk/Q6Q/Q6Q/3Q4/Q6Q/2Q4Q/4Q2Q/KQQ3Q1 w";

    #[test]
    fn crowded_layout_generates_every_move() {
        let mut pos = Position::from_fen(CROWDED).unwrap();
        let before = pos.clone();

        let moves = generate_moves(&mut pos);
        assert!(moves.len() > 256);
        assert!(moves.iter().all(|m| m.piece.color == Color::White));
        assert_eq!(pos, before);

        let per_piece: usize = pos
            .pieces(Color::White)
            .to_vec()
            .iter()
            .map(|p| legal_moves_from(&mut pos, p.location).len())
            .sum();
        assert_eq!(per_piece, moves.len());
    }

    #[test]
    fn other_side_generation_keeps_status() {
        let mut pos = Position::from_fen("7k/6Q1/6K1/8/8/8/8/8 b").unwrap();
        refresh_status(&mut pos);
        let white = legal_moves_for_side(&mut pos, Color::White);
        assert!(!white.is_empty());
        assert_eq!(pos.status(), Status::Checkmate);
    }

    #[test]
    fn has_legal_move_matches_generation() {
        for fen in [
            Description::STARTPOS,
            "7k/6Q1/6K1/8/8/8/8/8 b",
            "7k/5Q2/6K1/8/8/8/8/8 b",
            "8/2p5/3p4/KP5r/1R3p1k/8/4P1P1/8 w",
        ] {
            let mut pos = Position::from_fen(fen).unwrap();
            let expected = !generate_moves(&mut pos).is_empty();
            assert_eq!(has_legal_move(&mut pos), expected, "{}", fen);
        }
    }

    #[test]
    fn find_legal_move_parses_text() {
        let mut pos = Position::startpos();
        assert!(find_legal_move(&mut pos, "e2e4").is_some());
        assert!(find_legal_move(&mut pos, "E2E4").is_some());
        assert!(find_legal_move(&mut pos, "e2e5").is_none());
        assert!(find_legal_move(&mut pos, "e7e5").is_none());
        assert!(find_legal_move(&mut pos, "x").is_none());
    }
}
