#[cfg(test)]
mod tests {
    mod grid {
        use std::collections::hash_map::DefaultHasher;
        use std::hash::{Hash, Hasher};

        use crate::grid::{Grid2D, Grid3D};

        fn numbered(height: usize, width: usize) -> Grid2D<usize> {
            Grid2D::from_shape_fn(height, width, |(y, x)| y * width + x)
        }

        fn hash_of<T: Hash>(value: &T) -> u64 {
            let mut hasher = DefaultHasher::new();
            value.hash(&mut hasher);
            hasher.finish()
        }

        #[test]
        fn reflecting_twice_is_identity() {
            let grid = numbered(3, 4);
            assert_eq!(grid.reflected().reflected(), grid);
        }

        #[test]
        fn rotating_four_times_is_identity() {
            let grid = numbered(3, 4);
            assert_eq!(grid.rotated().rotated().rotated().rotated(), grid);
        }

        #[test]
        fn rotation_turns_counter_clockwise() {
            // [[1, 2],    [[2, 4],
            //  [3, 4]] ->  [1, 3]]
            let grid = Grid2D::from_shape_fn(2, 2, |(y, x)| 1 + y * 2 + x);
            let rotated = grid.rotated();
            assert_eq!(*rotated.get(0, 0), 2);
            assert_eq!(*rotated.get(0, 1), 4);
            assert_eq!(*rotated.get(1, 0), 1);
            assert_eq!(*rotated.get(1, 1), 3);
        }

        #[test]
        fn rotation_swaps_dimensions() {
            let grid = numbered(2, 5);
            let rotated = grid.rotated();
            assert_eq!((rotated.height(), rotated.width()), (5, 2));
        }

        #[test]
        fn full_size_sub_grid_is_identity() {
            let grid = numbered(3, 4);
            assert_eq!(grid.sub_grid(0, 0, 3, 4), grid);
        }

        #[test]
        fn sub_grid_samples_torically() {
            let grid = Grid2D::from_shape_fn(2, 2, |(y, x)| 1 + y * 2 + x);
            let wrapped = grid.sub_grid(1, 1, 2, 2);
            assert_eq!(*wrapped.get(0, 0), 4);
            assert_eq!(*wrapped.get(0, 1), 3);
            assert_eq!(*wrapped.get(1, 0), 2);
            assert_eq!(*wrapped.get(1, 1), 1);
        }

        #[test]
        fn equal_grids_hash_alike() {
            let a = numbered(4, 4);
            let b = numbered(4, 4);
            assert_eq!(a, b);
            assert_eq!(hash_of(&a), hash_of(&b));

            let c = Grid2D::from_shape_fn(4, 4, |(y, x)| y * 4 + x + 1);
            assert_ne!(a, c);
            assert_ne!(hash_of(&a), hash_of(&c));
        }

        #[test]
        fn grid3d_round_trips_values() {
            let mut grid = Grid3D::filled(2, 3, 4, 0);
            *grid.get_mut(1, 2, 3) = 42;
            assert_eq!(*grid.get(1, 2, 3), 42);
            assert_eq!(*grid.get(1, 2, 2), 0);
        }
    }

    mod direction {
        use strum::VariantArray;

        use crate::direction::Direction;

        #[test]
        fn opposite_is_an_involution() {
            for direction in Direction::VARIANTS {
                assert_eq!(direction.opposite().opposite(), *direction);
            }
        }

        #[test]
        fn opposite_mirrors_the_index() {
            for direction in Direction::VARIANTS {
                assert_eq!(direction.opposite().index(), 3 - direction.index());
            }
        }

        #[test]
        fn offsets_match_the_layout() {
            assert_eq!((Direction::Up.dx(), Direction::Up.dy()), (0, -1));
            assert_eq!((Direction::Left.dx(), Direction::Left.dy()), (-1, 0));
            assert_eq!((Direction::Right.dx(), Direction::Right.dy()), (1, 0));
            assert_eq!((Direction::Down.dx(), Direction::Down.dy()), (0, 1));
        }

        #[test]
        fn stepping_off_the_edge_underflows() {
            assert_eq!(Direction::Up.attempt_from(0, 3), (usize::MAX, 3));
            assert_eq!(Direction::Left.attempt_from(3, 0), (3, usize::MAX));
        }
    }

    mod wave {
        use rand::rngs::StdRng;
        use rand::SeedableRng;

        use crate::wave::Wave;

        const EPSILON: f64 = 1e-12;

        #[test]
        fn caches_track_eliminations() {
            let weights = [0.5, 0.25, 0.25];
            let mut rng = StdRng::seed_from_u64(0);
            let mut wave = Wave::new(2, 2, &weights, &mut rng);

            wave.forbid(0, 0);

            assert_eq!(wave.count(0), 2);
            assert!(!wave.get(0, 0));
            let sum = 0.5;
            let sum_plogw = 2.0 * 0.25 * 0.25f64.ln();
            assert!((wave.sum_weights(0) - sum).abs() < EPSILON);
            assert!((wave.sum_weight_log_weights(0) - sum_plogw).abs() < EPSILON);
            assert!((wave.entropy(0) - (sum.ln() - sum_plogw / sum)).abs() < EPSILON);

            // other cells untouched
            assert_eq!(wave.count(1), 3);
            assert!(wave.get(1, 0));
        }

        #[test]
        fn forbidding_twice_changes_nothing() {
            let weights = [0.5, 0.5];
            let mut rng = StdRng::seed_from_u64(0);
            let mut wave = Wave::new(1, 2, &weights, &mut rng);

            wave.forbid(0, 1);
            let (sum, count) = (wave.sum_weights(0), wave.count(0));
            wave.forbid(0, 1);
            assert_eq!(wave.sum_weights(0), sum);
            assert_eq!(wave.count(0), count);
        }

        #[test]
        fn emptying_a_cell_raises_the_impossible_flag() {
            let weights = [0.5, 0.5];
            let mut rng = StdRng::seed_from_u64(0);
            let mut wave = Wave::new(1, 1, &weights, &mut rng);

            wave.forbid(0, 0);
            assert!(!wave.is_impossible());
            wave.forbid(0, 1);
            assert!(wave.is_impossible());
        }

        #[test]
        fn observation_skips_collapsed_cells() {
            let weights = [0.5, 0.5];
            let mut rng = StdRng::seed_from_u64(0);
            let mut wave = Wave::new(1, 2, &weights, &mut rng);

            wave.forbid(0, 0);
            assert_eq!(wave.min_entropy_cell(), Some(1));
            wave.forbid(1, 1);
            assert_eq!(wave.min_entropy_cell(), None);
        }
    }

    mod overlapping {
        use itertools::Itertools;
        use strum::VariantArray;

        use crate::direction::Direction;
        use crate::grid::Grid2D;
        use crate::overlapping::{compatibility, extract_patterns, OverlappingOptions};

        fn options(pattern_size: usize, symmetry: u32, periodic_input: bool) -> OverlappingOptions {
            OverlappingOptions {
                periodic_input,
                periodic_output: true,
                out_height: 8,
                out_width: 8,
                symmetry,
                ground: false,
                pattern_size,
            }
        }

        fn checkerboard() -> Grid2D<u8> {
            Grid2D::from_shape_fn(2, 2, |(y, x)| ((y + x) % 2) as u8)
        }

        #[test]
        fn checkerboard_has_two_patterns_of_equal_weight() {
            let (patterns, weights) = extract_patterns(&checkerboard(), &options(2, 1, true));
            assert_eq!(patterns.len(), 2);
            assert_eq!(weights, vec![2.0, 2.0]);
            // numbered by first occurrence in the scan
            assert_eq!(*patterns[0].get(0, 0), 0);
            assert_eq!(*patterns[1].get(0, 0), 1);
        }

        #[test]
        fn symmetry_expansion_covers_the_full_orbit() {
            let window = Grid2D::from_shape_fn(2, 2, |(y, x)| 1 + y * 2 + x);
            let (patterns, weights) = extract_patterns(&window, &options(2, 8, false));
            assert_eq!(patterns.len(), 8);
            assert!(weights.iter().all(|&w| w == 1.0));
            assert_eq!(patterns.iter().unique().count(), 8);
        }

        #[test]
        fn checkerboard_patterns_only_tolerate_each_other() {
            let (patterns, _) = extract_patterns(&checkerboard(), &options(2, 1, true));
            let rules = compatibility(&patterns);
            for direction in Direction::VARIANTS {
                assert_eq!(rules[0][direction.index()], vec![1]);
                assert_eq!(rules[1][direction.index()], vec![0]);
            }
        }

        #[test]
        fn uniform_input_has_a_single_pattern() {
            let input = Grid2D::filled(4, 4, 7u8);
            let (patterns, weights) = extract_patterns(&input, &options(2, 1, false));
            assert_eq!(patterns.len(), 1);
            assert_eq!(weights, vec![9.0]);
        }
    }

    mod tiling {
        use std::collections::HashSet;
        use std::str::FromStr;

        use strum::VariantArray;

        use crate::direction::Direction;
        use crate::error::Error;
        use crate::grid::Grid2D;
        use crate::tiling::{Adjacency, Symmetry, Tile, TileSetBuilder, Tiling, TilingOptions};

        #[test]
        fn orientation_counts_per_symmetry_class() {
            let expected = [
                (Symmetry::X, 1),
                (Symmetry::T, 4),
                (Symmetry::I, 2),
                (Symmetry::L, 4),
                (Symmetry::Backslash, 2),
                (Symmetry::P, 8),
            ];
            for (symmetry, count) in expected {
                assert_eq!(symmetry.orientations(), count);
            }
        }

        #[test]
        fn symmetry_tokens_parse() {
            assert_eq!(Symmetry::from_str("X").unwrap(), Symmetry::X);
            assert_eq!(Symmetry::from_str("\\").unwrap(), Symmetry::Backslash);
            assert!(matches!(Symmetry::from_str("Q"), Err(Error::Symmetry(_))));
        }

        #[test]
        fn asymmetric_tile_has_eight_distinct_orientations() {
            let image = Grid2D::from_shape_fn(2, 2, |(y, x)| 1 + y * 2 + x);
            let tile = Tile::new(image, Symmetry::P, 1.0);
            assert_eq!(tile.variants.len(), 8);
            let distinct: HashSet<_> = tile.variants.iter().collect();
            assert_eq!(distinct.len(), 8);
        }

        #[test]
        fn orbit_sizes_match_the_symmetry_class() {
            let image = Grid2D::filled(2, 2, 0u8);
            assert_eq!(Tile::new(image.clone(), Symmetry::X, 1.0).variants.len(), 1);
            assert_eq!(Tile::new(image.clone(), Symmetry::I, 1.0).variants.len(), 2);
            assert_eq!(Tile::new(image, Symmetry::L, 1.0).variants.len(), 4);
        }

        #[test]
        fn neighbor_strings_resolve_names_and_orientations() {
            let mut builder = TileSetBuilder::new(1);
            builder
                .add_tile("tee", Grid2D::filled(1, 1, 0u8), Symmetry::T, 1.0)
                .add_tile("dot", Grid2D::filled(1, 1, 1u8), Symmetry::X, 1.0)
                .add_neighbor("tee 1", "dot");
            let set = builder.build(None).unwrap();
            assert_eq!(
                set.adjacencies(),
                &[Adjacency {
                    left: 0,
                    left_orientation: 1,
                    right: 1,
                    right_orientation: 0,
                }]
            );
        }

        #[test]
        fn bad_orientation_invalidates_the_builder() {
            let mut builder = TileSetBuilder::new(1);
            builder
                .add_tile("dot", Grid2D::filled(1, 1, 0u8), Symmetry::X, 1.0)
                .add_neighbor("dot x", "dot");
            assert!(matches!(
                builder.is_valid().map(|errors| &errors[0]),
                Some(Error::Orientation(_))
            ));
            assert!(builder.build(None).is_err());
        }

        #[test]
        fn oriented_tiles_take_their_images_as_given() {
            let variants = vec![Grid2D::filled(1, 1, 3u8), Grid2D::filled(1, 1, 4u8)];
            let mut builder = TileSetBuilder::new(1);
            builder.add_oriented_tile("bar", variants, Symmetry::I, 1.0);
            let set = builder.build(None).unwrap();
            assert_eq!(*set.tiles()[0].variants[1].get(0, 0), 4);
        }

        #[test]
        fn oriented_tiles_must_cover_the_whole_orbit() {
            let mut builder = TileSetBuilder::new(1);
            builder.add_oriented_tile("bar", vec![Grid2D::filled(1, 1, 3u8)], Symmetry::I, 1.0);
            assert!(matches!(
                builder.is_valid().map(|errors| &errors[0]),
                Some(Error::VariantCount { .. })
            ));
        }

        #[test]
        fn wrong_tile_size_invalidates_the_builder() {
            let mut builder = TileSetBuilder::new(2);
            builder.add_tile("dot", Grid2D::filled(1, 1, 0u8), Symmetry::X, 1.0);
            assert!(matches!(
                builder.is_valid().map(|errors| &errors[0]),
                Some(Error::Shape { .. })
            ));
        }

        fn three_tile_builder() -> TileSetBuilder<u8> {
            let mut builder = TileSetBuilder::new(1);
            builder
                .add_tile("a", Grid2D::filled(1, 1, 0u8), Symmetry::X, 1.0)
                .add_tile("b", Grid2D::filled(1, 1, 1u8), Symmetry::X, 1.0)
                .add_tile("c", Grid2D::filled(1, 1, 2u8), Symmetry::X, 1.0)
                .add_neighbor("a", "b")
                .add_neighbor("b", "c")
                .add_subset("pair", ["a".to_owned(), "b".to_owned()]);
            builder
        }

        #[test]
        fn subsets_filter_tiles_and_drop_dangling_adjacencies() {
            let set = three_tile_builder().build(Some("pair")).unwrap();
            assert_eq!(set.names(), &["a".to_owned(), "b".to_owned()]);
            assert_eq!(set.adjacencies().len(), 1);

            let unfiltered = three_tile_builder().build(None).unwrap();
            assert_eq!(unfiltered.tiles().len(), 3);
            assert_eq!(unfiltered.adjacencies().len(), 2);
        }

        #[test]
        fn unknown_subset_is_a_config_error() {
            let errors = three_tile_builder().build(Some("nope")).unwrap_err();
            assert!(matches!(errors[0], Error::Subset(_)));
        }

        #[test]
        fn absent_subset_declarations_mean_no_filtering() {
            let mut builder = TileSetBuilder::new(1);
            builder
                .add_tile("a", Grid2D::filled(1, 1, 0u8), Symmetry::X, 1.0)
                .add_tile("b", Grid2D::filled(1, 1, 1u8), Symmetry::X, 1.0)
                .add_neighbor("a", "b");
            let set = builder.build(Some("tiles")).unwrap();
            assert_eq!(set.tiles().len(), 2);
        }

        #[test]
        fn lifted_rules_close_under_direction_opposition() {
            let mut builder = TileSetBuilder::new(1);
            builder
                .add_tile("cross", Grid2D::filled(1, 1, 0u8), Symmetry::X, 1.0)
                .add_tile("bar", Grid2D::filled(1, 1, 1u8), Symmetry::I, 1.0)
                .add_neighbor("bar 1", "cross");
            let set = builder.build(None).unwrap();
            let tiling = Tiling::new(
                &set,
                TilingOptions {
                    periodic_output: true,
                    height: 3,
                    width: 3,
                },
                0,
            )
            .unwrap();

            assert_eq!(tiling.id_to_oriented(), &[(0, 0), (1, 0), (1, 1)]);
            let rules = tiling.solver().propagator().rules();
            for (pattern, by_direction) in rules.iter().enumerate() {
                for direction in Direction::VARIANTS {
                    for &other in &by_direction[direction.index()] {
                        assert!(
                            rules[other][direction.opposite().index()].contains(&pattern),
                            "{pattern} allows {other} towards {direction:?} but not conversely"
                        );
                    }
                }
            }
        }

        #[test]
        fn empty_tile_set_is_rejected() {
            let set = TileSetBuilder::<u8>::new(1).build(None).unwrap();
            let result = Tiling::new(
                &set,
                TilingOptions {
                    periodic_output: true,
                    height: 2,
                    width: 2,
                },
                0,
            );
            assert!(matches!(result, Err(Error::EmptyTileSet)));
        }
    }

    mod solving {
        use itertools::Itertools;
        use strum::VariantArray;

        use crate::direction::Direction;
        use crate::grid::Grid2D;
        use crate::overlapping::{compatibility, extract_patterns, Overlapping, OverlappingOptions};
        use crate::solver::Solver;

        fn checkerboard() -> Grid2D<u8> {
            Grid2D::from_shape_fn(2, 2, |(y, x)| ((y + x) % 2) as u8)
        }

        fn checkerboard_options(out: usize) -> OverlappingOptions {
            OverlappingOptions {
                periodic_input: true,
                periodic_output: true,
                out_height: out,
                out_width: out,
                symmetry: 1,
                ground: false,
                pattern_size: 2,
            }
        }

        #[test]
        fn support_counters_match_their_definition_after_propagation() {
            let side = 8;
            let (patterns, weights) = extract_patterns(&checkerboard(), &checkerboard_options(side));
            let rules = compatibility(&patterns);
            let mut solver = Solver::new(side, side, true, &weights, rules.clone(), 5);

            solver.forbid(3, 4, 0);
            solver.propagate().unwrap();

            let wave = solver.wave();
            let propagator = solver.propagator();
            for (y, x) in (0..side).cartesian_product(0..side) {
                for pattern in 0..patterns.len() {
                    if !wave.get(y * side + x, pattern) {
                        continue;
                    }
                    for direction in Direction::VARIANTS {
                        let towards_supporter = direction.opposite();
                        let ny = (y as isize + towards_supporter.dy()).rem_euclid(side as isize) as usize;
                        let nx = (x as isize + towards_supporter.dx()).rem_euclid(side as isize) as usize;
                        let expected = rules[pattern][towards_supporter.index()]
                            .iter()
                            .filter(|&&supporter| wave.get(ny * side + nx, supporter))
                            .count() as i32;
                        assert_eq!(
                            propagator.support(y, x, pattern)[direction.index()],
                            expected
                        );
                    }
                }
            }
        }

        #[test]
        fn scalar_caches_match_their_definition_after_propagation() {
            let side = 8;
            let (patterns, weights) = extract_patterns(&checkerboard(), &checkerboard_options(side));
            let rules = compatibility(&patterns);
            let mut solver = Solver::new(side, side, true, &weights, rules, 5);

            solver.forbid(3, 4, 0);
            solver.propagate().unwrap();

            let total: f64 = weights.iter().sum();
            let normalized = weights.iter().map(|w| w / total).collect_vec();
            let wave = solver.wave();
            for index in 0..side * side {
                let alive = (0..patterns.len())
                    .filter(|&pattern| wave.get(index, pattern))
                    .collect_vec();
                assert_eq!(wave.count(index), alive.len());
                let sum: f64 = alive.iter().map(|&pattern| normalized[pattern]).sum();
                let sum_plogw: f64 = alive
                    .iter()
                    .map(|&pattern| normalized[pattern] * normalized[pattern].ln())
                    .sum();
                assert!((wave.sum_weights(index) - sum).abs() < 1e-12);
                assert!((wave.sum_weight_log_weights(index) - sum_plogw).abs() < 1e-12);
                assert!((wave.entropy(index) - (sum.ln() - sum_plogw / sum)).abs() < 1e-12);
            }
        }

        #[test]
        fn ground_pattern_index_points_at_the_bottom_window() {
            let mut options = checkerboard_options(8);
            options.ground = true;
            let input = Grid2D::from_shape_fn(4, 4, |(y, _)| u8::from(y == 3));
            let instance = Overlapping::new(&input, options, 0);
            let patterns = instance.patterns();
            let bottom = input.sub_grid(3, 2, 2, 2);
            assert!(patterns.iter().contains(&bottom));
        }
    }

    mod end_to_end {
        use crate::error::Error;
        use crate::grid::Grid2D;
        use crate::overlapping::{Overlapping, OverlappingOptions};
        use crate::runner::{run_overlapping, run_tiling, MAX_ATTEMPTS};
        use crate::tiling::{Symmetry, TileSetBuilder, TilingOptions};

        fn checkerboard() -> Grid2D<u8> {
            Grid2D::from_shape_fn(2, 2, |(y, x)| ((y + x) % 2) as u8)
        }

        #[test]
        fn uniform_input_solves_to_a_uniform_output() {
            let input = Grid2D::filled(4, 4, 7u8);
            let options = OverlappingOptions {
                periodic_input: false,
                periodic_output: false,
                out_height: 8,
                out_width: 8,
                symmetry: 1,
                ground: false,
                pattern_size: 2,
            };
            let output = Overlapping::new(&input, options, 0).solve().unwrap();
            assert_eq!((output.height(), output.width()), (8, 8));
            assert!(output.iter().all(|&cell| cell == 7));
        }

        #[test]
        fn checkerboard_reproduces_a_checkerboard() {
            let options = OverlappingOptions {
                periodic_input: true,
                periodic_output: true,
                out_height: 16,
                out_width: 16,
                symmetry: 1,
                ground: false,
                pattern_size: 2,
            };
            let output = run_overlapping(&checkerboard(), options, 42).unwrap();
            for y in 0..16 {
                for x in 0..16 {
                    assert_ne!(output.get(y, x), output.get(y, (x + 1) % 16));
                    assert_ne!(output.get(y, x), output.get((y + 1) % 16, x));
                }
            }
        }

        #[test]
        fn identical_seeds_give_identical_outputs() {
            let options = OverlappingOptions {
                periodic_input: true,
                periodic_output: true,
                out_height: 16,
                out_width: 16,
                symmetry: 1,
                ground: false,
                pattern_size: 2,
            };
            let first = run_overlapping(&checkerboard(), options, 42).unwrap();
            let second = run_overlapping(&checkerboard(), options, 42).unwrap();
            assert_eq!(first, second);
        }

        #[test]
        fn ground_pins_the_bottom_row_and_nothing_else() {
            let input = Grid2D::from_shape_fn(4, 6, |(y, _)| u8::from(y == 3));
            let options = OverlappingOptions {
                periodic_input: true,
                periodic_output: true,
                out_height: 24,
                out_width: 48,
                symmetry: 1,
                ground: true,
                pattern_size: 3,
            };
            let output = run_overlapping(&input, options, 7).unwrap();
            for x in 0..48 {
                assert_eq!(*output.get(23, x), 1);
            }
            for y in 0..23 {
                for x in 0..48 {
                    assert_eq!(*output.get(y, x), 0);
                }
            }
        }

        #[test]
        fn two_tiles_alternate_on_an_even_torus() {
            let mut builder = TileSetBuilder::new(1);
            builder
                .add_tile("black", Grid2D::filled(1, 1, 0u8), Symmetry::X, 1.0)
                .add_tile("white", Grid2D::filled(1, 1, 1u8), Symmetry::X, 1.0)
                .add_neighbor("black", "white");
            let set = builder.build(None).unwrap();
            let options = TilingOptions {
                periodic_output: true,
                height: 4,
                width: 4,
            };
            let output = run_tiling(&set, options, 1).unwrap();
            assert_eq!((output.height(), output.width()), (4, 4));
            for y in 0..4 {
                for x in 0..4 {
                    assert_ne!(output.get(y, x), output.get(y, (x + 1) % 4));
                    assert_ne!(output.get(y, x), output.get((y + 1) % 4, x));
                }
            }
        }

        #[test]
        fn unsolvable_tiling_exhausts_its_retries() {
            // an odd torus cannot be covered: every edge must pair white
            // with black or gray, which would two-color a 3-cycle
            let mut builder = TileSetBuilder::new(1);
            builder
                .add_tile("black", Grid2D::filled(1, 1, 0u8), Symmetry::X, 1.0)
                .add_tile("white", Grid2D::filled(1, 1, 1u8), Symmetry::X, 1.0)
                .add_tile("gray", Grid2D::filled(1, 1, 2u8), Symmetry::X, 1.0)
                .add_neighbor("black", "white")
                .add_neighbor("gray", "white");
            let set = builder.build(None).unwrap();
            let options = TilingOptions {
                periodic_output: true,
                height: 3,
                width: 3,
            };
            let result = run_tiling(&set, options, 9);
            assert!(matches!(
                result,
                Err(Error::Exhausted {
                    attempts: MAX_ATTEMPTS
                })
            ));
        }

        #[test]
        fn tiled_output_scales_by_tile_size() {
            let mut builder = TileSetBuilder::new(2);
            builder
                .add_tile("black", Grid2D::filled(2, 2, 0u8), Symmetry::X, 1.0)
                .add_tile("white", Grid2D::filled(2, 2, 1u8), Symmetry::X, 1.0)
                .add_neighbor("black", "white");
            let set = builder.build(None).unwrap();
            let options = TilingOptions {
                periodic_output: true,
                height: 2,
                width: 2,
            };
            let output = run_tiling(&set, options, 3).unwrap();
            assert_eq!((output.height(), output.width()), (4, 4));
            // each tile paints a solid 2x2 block
            for y in 0..2 {
                for x in 0..2 {
                    assert_eq!(output.get(2 * y, 2 * x), output.get(2 * y + 1, 2 * x + 1));
                }
            }
        }
    }

    mod io {
        use crate::color::Color;
        use crate::error::Error;
        use crate::grid::Grid2D;
        use crate::io::{read_png, write_png};

        #[test]
        fn png_round_trip_preserves_colors() {
            let grid = Grid2D::from_shape_fn(2, 3, |(y, x)| {
                Color::new((y * 3 + x) as u8 * 40, 0, 255 - (x as u8) * 80)
            });
            let path = std::env::temp_dir().join("collapsar_round_trip.png");
            write_png(&path, &grid).unwrap();
            let read_back = read_png(&path).unwrap();
            let _ = std::fs::remove_file(&path);
            assert_eq!(read_back, grid);
        }

        #[test]
        fn missing_image_reports_its_path() {
            let path = std::env::temp_dir().join("collapsar_does_not_exist.png");
            assert!(matches!(
                read_png(&path),
                Err(Error::Resource { path: reported, .. }) if reported == path
            ));
        }
    }
}
