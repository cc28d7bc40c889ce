use proptest::prelude::*;

use toruslife::grid::Grid;
use toruslife::pattern::Pattern;
use toruslife::rule_set::B3S23;
use toruslife::rule_set::RuleSet;

#[test]
fn glider_translates_diagonally_every_4_generations() {
    let mut grid = Grid::new(30, 30);
    Pattern::Glider.stamp(&mut grid, 10, 10).unwrap();

    let start = grid.live_cells();
    assert_eq!(start.len(), 5);

    let mut grid = grid;
    for _ in 0..4 {
        grid = grid.step(&B3S23);
    }

    let translated: Vec<_> = start.iter().map(|&(x, y)| (x + 1, y + 1)).collect();
    assert_eq!(grid.live_cells(), translated);
}

#[test]
fn glider_wraps_around_the_torus() {
    // 4 generations translate by (1, 1), so width * 4 generations bring the
    // glider back to its starting cells on a square torus
    let mut grid = Grid::new(12, 12);
    Pattern::Glider.stamp(&mut grid, 4, 4).unwrap();

    let start = grid.clone();

    let mut grid = grid;
    for _ in 0..48 {
        grid = grid.step(&B3S23);
    }

    assert_eq!(grid, start);
}

#[test]
fn stamped_glider_snapshot() {
    let mut grid = Grid::new(5, 5);
    Pattern::Glider.stamp(&mut grid, 1, 1).unwrap();

    insta::assert_snapshot!(grid.to_string(), @r"
    .....
    ..#..
    ...#.
    .###.
    .....
    ");
}

fn arb_grid(w: usize, h: usize) -> impl Strategy<Value = Grid> {
    prop::collection::vec(any::<bool>(), w * h).prop_map(move |cells| {
        let mut grid = Grid::new(w, h);

        for (i, alive) in cells.into_iter().enumerate() {
            grid.set(i % w, i / w, alive).unwrap();
        }

        grid
    })
}

fn arb_rule() -> impl Strategy<Value = RuleSet> {
    (0u16..0x200, 0u16..0x200).prop_map(|(b, s)| RuleSet::new(b, s))
}

proptest! {
    #[test]
    fn step_is_deterministic_and_pure(grid in arb_grid(8, 6), rule in arb_rule()) {
        let before = grid.clone();

        let a = grid.step(&rule);
        let b = grid.step(&rule);

        prop_assert_eq!(&a, &b);
        prop_assert_eq!(&grid, &before);
    }

    #[test]
    fn neighbor_counts_sum_to_8_per_live_cell(grid in arb_grid(8, 6)) {
        // On a torus every live cell contributes once to each of its 8
        // neighbors' counts
        let total: u32 = grid
            .enumerate()
            .map(|((x, y), _)| grid.count_live_neighbors(x, y) as u32)
            .sum();

        prop_assert_eq!(total, 8 * grid.live_cells().len() as u32);
    }

    #[test]
    fn rule_parse_roundtrips(b in 0u16..0x200, s in 0u16..0x200) {
        let fmt = |mask: u16| -> String {
            (0..9).filter(|n| mask & (1 << n) != 0).map(|n| n.to_string()).collect()
        };

        let text = format!("B{}/S{}", fmt(b), fmt(s));
        let parsed: RuleSet = text.parse().unwrap();

        prop_assert_eq!(parsed, RuleSet::new(b, s));
    }
}
