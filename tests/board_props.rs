use battleship_client::{
    plan_ship_cells, Board, BoardError, Coord, Mark, Orientation, BOARD_SIZE,
};
use proptest::prelude::*;
use rand::{rngs::SmallRng, Rng, SeedableRng};

const N: i64 = BOARD_SIZE as i64;

fn mark_strategy() -> impl Strategy<Value = Mark> {
    prop::sample::select(Mark::ALL.to_vec())
}

fn random_board(seed: u64) -> Board {
    let mut rng = SmallRng::seed_from_u64(seed);
    let mut board = Board::new();
    let marks = rng.random_range(0..BOARD_SIZE as usize * 3);
    for _ in 0..marks {
        let col = rng.random_range(0..N);
        let row = rng.random_range(0..N);
        let mark = Mark::ALL[rng.random_range(0..Mark::ALL.len())];
        let _ = board.mark_raw(col, row, mark);
    }
    board
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn out_of_range_mark_is_noop(
        seed in any::<u64>(),
        col in -20i64..30,
        row in -20i64..30,
        mark in mark_strategy(),
    ) {
        prop_assume!(!(0..N).contains(&col) || !(0..N).contains(&row));
        let mut board = random_board(seed);
        let before = board;
        let err = board.mark_raw(col, row, mark).unwrap_err();
        prop_assert_eq!(err, BoardError::OutOfBounds { col, row });
        prop_assert_eq!(board, before);
    }

    #[test]
    fn terminal_marks_never_revert(
        seed in any::<u64>(),
        col in 0..N,
        row in 0..N,
        first in prop::sample::select(vec![Mark::Hit, Mark::Miss, Mark::Destroyed]),
        later in prop::sample::select(vec![Mark::Empty, Mark::Ship]),
    ) {
        let mut board = random_board(seed);
        let at = Coord::new(col, row).unwrap();
        let _ = board.mark_cell(at, first);
        let settled = board.mark_at(at);
        prop_assume!(settled.is_terminal());
        let before = board;
        prop_assert!(board.mark_cell(at, later).is_err());
        prop_assert_eq!(board, before);
        prop_assert_eq!(board.mark_at(at), settled);
    }

    #[test]
    fn every_cell_has_one_mark(seed in any::<u64>()) {
        let board = random_board(seed);
        let total: usize = Mark::ALL.iter().map(|&m| board.count(m)).sum();
        prop_assert_eq!(total, (N * N) as usize);
    }

    #[test]
    fn planned_cells_stay_on_board(
        col in 0..N,
        row in 0..N,
        vertical in any::<bool>(),
        len in 1usize..=BOARD_SIZE as usize,
    ) {
        let orientation = if vertical { Orientation::Vertical } else { Orientation::Horizontal };
        let anchor = Coord::new(col, row).unwrap();
        let cells = plan_ship_cells(anchor, orientation, len);
        let along = if vertical { row } else { col };
        let fits = ((N - along) as usize).min(len);
        prop_assert_eq!(cells.len(), fits);
        prop_assert_eq!(cells.first().copied(), Some(anchor));
        for (k, cell) in cells.iter().enumerate() {
            let (dc, dr) = if vertical { (0, k) } else { (k, 0) };
            prop_assert_eq!(cell.col(), col as usize + dc);
            prop_assert_eq!(cell.row(), row as usize + dr);
        }
    }
}

#[test]
fn hit_upgrades_to_destroyed() {
    let mut board = Board::new();
    let at = Coord::new(4, 4).unwrap();
    board.mark_cell(at, Mark::Ship).unwrap();
    board.mark_cell(at, Mark::Hit).unwrap();
    board.mark_cell(at, Mark::Destroyed).unwrap();
    assert_eq!(board.mark_at(at), Mark::Destroyed);
    assert!(board.mark_cell(at, Mark::Hit).is_err());
    assert_eq!(board.count(Mark::Ship), 0);
}
