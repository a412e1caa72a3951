mod engine_properties {
    use golife::{ALIVE, CycleEngine, DEAD, Grid};

    fn grid_from_rows(rows: &[&str]) -> Grid {
        let height = rows.len();
        let width = rows.first().map_or(0, |r| r.len());
        let mut grid = Grid::new(width, height);
        for (y, row) in rows.iter().enumerate() {
            for (x, c) in row.chars().enumerate() {
                if c == '#' {
                    grid.set(x as isize, y as isize, ALIVE);
                }
            }
        }
        grid
    }

    #[test]
    fn blinker_oscillates_with_period_two() {
        let vertical = grid_from_rows(&[".#.", ".#.", ".#."]);
        let horizontal = grid_from_rows(&["...", "###", "..."]);

        let engine = CycleEngine::new(1).unwrap();
        let after_one = engine.step(&vertical).unwrap();
        assert_eq!(after_one, horizontal);

        let after_two = engine.step(&after_one).unwrap();
        assert_eq!(after_two, vertical);
    }

    #[test]
    fn block_is_a_still_life() {
        let block = grid_from_rows(&["....", ".##.", ".##.", "...."]);
        let engine = CycleEngine::new(2).unwrap();

        let mut current = block.clone();
        for _ in 0..5 {
            current = engine.step(&current).unwrap();
            assert_eq!(current, block);
        }
    }

    #[test]
    fn result_is_independent_of_band_count() {
        // r-pentomino: chaotic enough to exercise every rule for a while.
        let seed = grid_from_rows(&[
            "................",
            "......##........",
            ".....##.........",
            "......#.........",
            "................",
            "................",
            "................",
            "................",
        ]);

        let reference_engine = CycleEngine::new(1).unwrap();
        let mut reference = vec![seed.clone()];
        for _ in 0..12 {
            let next = reference_engine
                .step(reference.last().unwrap())
                .unwrap();
            reference.push(next);
        }

        for bands in [2, 8, 37] {
            let engine = CycleEngine::new(bands).unwrap();
            let mut current = seed.clone();
            for step in 1..reference.len() {
                current = engine.step(&current).unwrap();
                assert_eq!(current, reference[step], "bands={bands} step={step}");
            }
        }
    }

    #[test]
    fn more_bands_than_rows_still_agrees() {
        let seed = grid_from_rows(&[".#.", ".#.", ".#."]);
        let wide = CycleEngine::new(37).unwrap().step(&seed).unwrap();
        let narrow = CycleEngine::new(1).unwrap().step(&seed).unwrap();
        assert_eq!(wide, narrow);
    }

    #[test]
    fn border_cells_see_dead_neighbors_outside() {
        // A vertical pair in the top-left corner: each cell has one live
        // neighbor (plus the dead edge) and starves.
        let seed = grid_from_rows(&["#..", "#..", "..."]);
        let next = CycleEngine::new(1).unwrap().step(&seed).unwrap();
        assert_eq!(next.live_count(), 0);
        assert_eq!(next.get(-1, -1), DEAD);
    }
}
