use std::collections::{HashMap, HashSet};
use std::fmt::{Display, Formatter};
use std::str::FromStr;

use itertools::Itertools;

use crate::direction::Direction;
use crate::error::Error;
use crate::grid::Grid2D;
use crate::propagator::CompatibilityTable;
use crate::solver::{Contradiction, Solver};

/// The symmetry class of a tile, named after the letter whose symmetries the
/// tile shares. The class determines how many distinct orientations the tile
/// has under rotation and reflection.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub enum Symmetry {
    /// Fully symmetric; 1 orientation.
    X,
    /// Symmetric across one axis; 4 orientations.
    T,
    /// Symmetric across both axes; 2 orientations.
    I,
    /// One diagonal symmetry; 4 orientations.
    L,
    /// Anti-diagonal symmetry; 2 orientations. Written `\` in tile sets.
    Backslash,
    /// No symmetry; all 8 orientations.
    P,
}

impl Symmetry {
    /// The number of distinct orientations of a tile in this class.
    pub fn orientations(&self) -> usize {
        match self {
            Self::X => 1,
            Self::I | Self::Backslash => 2,
            Self::T | Self::L => 4,
            Self::P => 8,
        }
    }

    /// For each orientation, the orientation reached by a 90°
    /// counter-clockwise rotation.
    fn rotation_map(&self) -> &'static [usize] {
        match self {
            Self::X => &[0],
            Self::I | Self::Backslash => &[1, 0],
            Self::T | Self::L => &[1, 2, 3, 0],
            Self::P => &[1, 2, 3, 0, 5, 6, 7, 4],
        }
    }

    /// For each orientation, the orientation reached by reflecting along the
    /// x axis.
    fn reflection_map(&self) -> &'static [usize] {
        match self {
            Self::X => &[0],
            Self::I => &[0, 1],
            Self::Backslash => &[1, 0],
            Self::T => &[0, 3, 2, 1],
            Self::L => &[1, 0, 3, 2],
            Self::P => &[4, 7, 6, 5, 0, 3, 2, 1],
        }
    }

    /// For each of the 8 dihedral actions and each orientation, the
    /// resulting orientation. Actions 0..4 are rotations by 0°, 90°, 180°,
    /// 270° counter-clockwise; actions 4..8 are the same preceded by an
    /// x-axis reflection.
    pub(crate) fn action_map(&self) -> Vec<Vec<usize>> {
        let rotation = self.rotation_map();
        let reflection = self.reflection_map();
        let mut actions: Vec<Vec<usize>> = Vec::with_capacity(8);
        actions.push((0..rotation.len()).collect_vec());
        for _ in 1..4 {
            let rotated = actions.last().unwrap().iter().map(|&o| rotation[o]).collect_vec();
            actions.push(rotated);
        }
        let mirrored = actions[0].iter().map(|&o| reflection[o]).collect_vec();
        actions.push(mirrored);
        for _ in 5..8 {
            let rotated = actions.last().unwrap().iter().map(|&o| rotation[o]).collect_vec();
            actions.push(rotated);
        }
        actions
    }
}

impl FromStr for Symmetry {
    type Err = Error;

    fn from_str(token: &str) -> Result<Self, Self::Err> {
        match token {
            "X" => Ok(Self::X),
            "T" => Ok(Self::T),
            "I" => Ok(Self::I),
            "L" => Ok(Self::L),
            "\\" => Ok(Self::Backslash),
            "P" => Ok(Self::P),
            _ => Err(Error::Symmetry(token.to_owned())),
        }
    }
}

impl Display for Symmetry {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            Self::X => "X",
            Self::T => "T",
            Self::I => "I",
            Self::L => "L",
            Self::Backslash => "\\",
            Self::P => "P",
        })
    }
}

/// A tile together with every orientation it can be placed in.
///
/// Orientation 0 is the canonical one; the rest are generated from it by
/// composing rotations and reflections as dictated by the symmetry class.
#[derive(Clone, Debug)]
pub struct Tile<T> {
    /// One image per orientation.
    pub variants: Vec<Grid2D<T>>,
    /// The symmetry class the variants were generated under.
    pub symmetry: Symmetry,
    /// Relative frequency of the tile as a whole, spread evenly over its
    /// orientations.
    pub weight: f64,
}

impl<T: Clone> Tile<T> {
    /// Generate the orientation orbit of `image` for `symmetry`.
    pub fn new(image: Grid2D<T>, symmetry: Symmetry, weight: f64) -> Self {
        let mut variants = vec![image];
        match symmetry {
            Symmetry::X => {}
            Symmetry::I | Symmetry::Backslash => {
                variants.push(variants[0].rotated());
            }
            Symmetry::T | Symmetry::L => {
                for _ in 0..3 {
                    variants.push(variants.last().unwrap().rotated());
                }
            }
            Symmetry::P => {
                for _ in 0..3 {
                    variants.push(variants.last().unwrap().rotated());
                }
                variants.push(variants.last().unwrap().reflected());
                for _ in 0..3 {
                    variants.push(variants.last().unwrap().rotated());
                }
            }
        }

        Self {
            variants,
            symmetry,
            weight,
        }
    }

    /// Use pre-rendered orientation images instead of generating them.
    ///
    /// Callers must supply exactly [`orientations`](Symmetry::orientations)
    /// images in orientation order.
    pub fn with_variants(variants: Vec<Grid2D<T>>, symmetry: Symmetry, weight: f64) -> Self {
        debug_assert_eq!(variants.len(), symmetry.orientations());
        Self {
            variants,
            symmetry,
            weight,
        }
    }
}

/// One adjacency rule: `right`, in `right_orientation`, may be placed
/// immediately to the right of `left`, in `left_orientation`. Rules for the
/// other three directions follow by applying the dihedral group to both
/// sides.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct Adjacency {
    /// Index of the left tile.
    pub left: usize,
    /// Orientation of the left tile.
    pub left_orientation: usize,
    /// Index of the right tile.
    pub right: usize,
    /// Orientation of the right tile.
    pub right_orientation: usize,
}

/// A validated collection of tiles and adjacency rules, ready to solve.
#[derive(Clone, Debug)]
pub struct TileSet<T> {
    size: usize,
    tiles: Vec<Tile<T>>,
    names: Vec<String>,
    adjacencies: Vec<Adjacency>,
}

impl<T> TileSet<T> {
    /// Side length of every tile image.
    pub fn size(&self) -> usize {
        self.size
    }

    /// The tiles, in registration order.
    pub fn tiles(&self) -> &[Tile<T>] {
        &self.tiles
    }

    /// Tile names, parallel to [`tiles`](TileSet::tiles).
    pub fn names(&self) -> &[String] {
        &self.names
    }

    /// The adjacency rules, resolved to tile indices.
    pub fn adjacencies(&self) -> &[Adjacency] {
        &self.adjacencies
    }
}

/// Builds a [`TileSet`] from named tiles, neighbor strings, and optional
/// named subsets.
///
/// The builder accumulates invalid reasons while building and reports them
/// all when [`build`](TileSetBuilder::build) is called; once invalid, later
/// calls do nothing.
#[derive(Debug)]
pub struct TileSetBuilder<T> {
    size: usize,
    names: Vec<String>,
    tiles: Vec<Tile<T>>,
    neighbors: Vec<(String, usize, String, usize)>,
    subsets: HashMap<String, HashSet<String>>,
    invalid: Vec<Error>,
}

impl<T: Clone> TileSetBuilder<T> {
    /// A builder for tiles of `size` x `size` cells.
    pub fn new(size: usize) -> Self {
        Self {
            size,
            names: Vec::new(),
            tiles: Vec::new(),
            neighbors: Vec::new(),
            subsets: HashMap::new(),
            invalid: Vec::new(),
        }
    }

    /// Register a tile from its canonical image; the orientation orbit is
    /// generated from the symmetry class.
    ///
    /// Records a shape error if the image is not `size` x `size`.
    pub fn add_tile(&mut self, name: &str, image: Grid2D<T>, symmetry: Symmetry, weight: f64) -> &mut Self {
        if !self.invalid.is_empty() {
            return self;
        }
        if image.height() != self.size || image.width() != self.size {
            self.invalid.push(Error::Shape {
                name: name.to_owned(),
                height: image.height(),
                width: image.width(),
                size: self.size,
            });
            return self;
        }

        self.names.push(name.to_owned());
        self.tiles.push(Tile::new(image, symmetry, weight));
        self
    }

    /// Register a tile from pre-rendered orientation images, one per
    /// orientation of the symmetry class, in orientation order.
    pub fn add_oriented_tile(
        &mut self,
        name: &str,
        variants: Vec<Grid2D<T>>,
        symmetry: Symmetry,
        weight: f64,
    ) -> &mut Self {
        if !self.invalid.is_empty() {
            return self;
        }
        if variants.len() != symmetry.orientations() {
            self.invalid.push(Error::VariantCount {
                name: name.to_owned(),
                got: variants.len(),
                expected: symmetry.orientations(),
                symmetry,
            });
            return self;
        }
        if let Some(image) = variants
            .iter()
            .find(|image| image.height() != self.size || image.width() != self.size)
        {
            self.invalid.push(Error::Shape {
                name: name.to_owned(),
                height: image.height(),
                width: image.width(),
                size: self.size,
            });
            return self;
        }

        self.names.push(name.to_owned());
        self.tiles.push(Tile::with_variants(variants, symmetry, weight));
        self
    }

    /// Register an adjacency from a pair of neighbor strings, each either
    /// `"name"` (orientation 0) or `"name <orientation>"`, split on the
    /// first space. The left tile sits to the left of the right tile.
    ///
    /// Names are resolved at build time; adjacencies naming tiles absent
    /// from the (possibly subset-filtered) set are dropped there.
    pub fn add_neighbor(&mut self, left: &str, right: &str) -> &mut Self {
        if !self.invalid.is_empty() {
            return self;
        }
        match (parse_neighbor(left), parse_neighbor(right)) {
            (Ok((ln, lo)), Ok((rn, ro))) => self.neighbors.push((ln, lo, rn, ro)),
            (Err(error), _) | (_, Err(error)) => self.invalid.push(error),
        }
        self
    }

    /// Declare a named subset of tiles that [`build`](TileSetBuilder::build)
    /// can restrict to.
    pub fn add_subset(
        &mut self,
        name: &str,
        tiles: impl IntoIterator<Item = impl Into<String>>,
    ) -> &mut Self {
        if !self.invalid.is_empty() {
            return self;
        }
        self.subsets
            .insert(name.to_owned(), tiles.into_iter().map(Into::into).collect());
        self
    }

    /// Check the validity of this builder.
    ///
    /// Returns `None` if the builder is valid, `Some(&Vec<Error>)` otherwise.
    pub fn is_valid(&self) -> Option<&Vec<Error>> {
        if self.invalid.is_empty() {
            None
        } else {
            Some(&self.invalid)
        }
    }

    /// Resolve names and produce the [`TileSet`], optionally restricted to a
    /// named subset.
    ///
    /// When no subsets were declared, `subset` filters nothing; when some
    /// were, an unknown name is a config error. Adjacencies whose tiles were
    /// filtered out, or whose orientation exceeds the tile's orbit, are
    /// dropped.
    pub fn build(mut self, subset: Option<&str>) -> Result<TileSet<T>, Vec<Error>> {
        let filter = match subset {
            Some(name) if !self.subsets.is_empty() => match self.subsets.remove(name) {
                Some(members) => Some(members),
                None => {
                    self.invalid.push(Error::Subset(name.to_owned()));
                    None
                }
            },
            _ => None,
        };
        if !self.invalid.is_empty() {
            return Err(self.invalid);
        }

        let keep = self
            .names
            .iter()
            .positions(|name| filter.as_ref().map_or(true, |members| members.contains(name)))
            .collect_vec();
        let ids: HashMap<&String, usize> = keep
            .iter()
            .enumerate()
            .map(|(new, &old)| (&self.names[old], new))
            .collect();

        let tiles = keep.iter().map(|&old| self.tiles[old].clone()).collect_vec();
        let adjacencies = self
            .neighbors
            .iter()
            .filter_map(|(left, left_orientation, right, right_orientation)| {
                let left = *ids.get(left)?;
                let right = *ids.get(right)?;
                (*left_orientation < tiles[left].symmetry.orientations()
                    && *right_orientation < tiles[right].symmetry.orientations())
                .then_some(Adjacency {
                    left,
                    left_orientation: *left_orientation,
                    right,
                    right_orientation: *right_orientation,
                })
            })
            .collect_vec();

        Ok(TileSet {
            size: self.size,
            names: keep.into_iter().map(|old| self.names[old].clone()).collect_vec(),
            tiles,
            adjacencies,
        })
    }
}

/// Split a neighbor string into a tile name and an orientation.
fn parse_neighbor(text: &str) -> Result<(String, usize), Error> {
    match text.split_once(' ') {
        None => Ok((text.to_owned(), 0)),
        Some((name, orientation)) => orientation
            .trim()
            .parse()
            .map(|o| (name.to_owned(), o))
            .map_err(|_| Error::Orientation(text.to_owned())),
    }
}

/// Options for a [`Tiling`] instance.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct TilingOptions {
    /// Make the output toric.
    pub periodic_output: bool,
    /// Output height in tiles (not pixels).
    pub height: usize,
    /// Output width in tiles (not pixels).
    pub width: usize,
}

/// The tiling-mode adapter: patterns are oriented tiles, and adjacency comes
/// from lifting the tile set's rules to all four directions through the
/// dihedral group.
pub struct Tiling<T: Clone> {
    size: usize,
    tiles: Vec<Tile<T>>,
    /// Pattern index to `(tile, orientation)`.
    id_to_oriented: Vec<(usize, usize)>,
    options: TilingOptions,
    solver: Solver,
}

impl<T: Clone> Tiling<T> {
    /// Expand `set` into oriented patterns and set up a solver over them.
    pub fn new(set: &TileSet<T>, options: TilingOptions, seed: u64) -> Result<Self, Error> {
        if set.tiles().is_empty() {
            return Err(Error::EmptyTileSet);
        }

        let (id_to_oriented, oriented_ids) = orient_ids(set.tiles());
        let rules = lift_adjacencies(
            set.tiles(),
            &oriented_ids,
            set.adjacencies(),
            id_to_oriented.len(),
        );
        // a tile's mass is split over its orbit so symmetry does not inflate
        // its frequency
        let weights = set
            .tiles()
            .iter()
            .flat_map(|tile| {
                std::iter::repeat(tile.weight / tile.variants.len() as f64)
                    .take(tile.variants.len())
            })
            .collect_vec();
        let solver = Solver::new(
            options.height,
            options.width,
            options.periodic_output,
            &weights,
            rules,
            seed,
        );

        Ok(Self {
            size: set.size(),
            tiles: set.tiles().to_vec(),
            id_to_oriented,
            options,
            solver,
        })
    }

    /// Run the solver, painting each solved cell's tile image into an output
    /// grid of `height * size` x `width * size` cells.
    pub fn solve(mut self) -> Result<Grid2D<T>, Contradiction> {
        let cells = self.solver.run()?;
        Ok(self.render(&cells))
    }

    fn render(&self, cells: &Grid2D<usize>) -> Grid2D<T> {
        let size = self.size;
        Grid2D::from_shape_fn(
            self.options.height * size,
            self.options.width * size,
            |(y, x)| {
                let (tile, orientation) = self.id_to_oriented[*cells.get(y / size, x / size)];
                self.tiles[tile].variants[orientation]
                    .get(y % size, x % size)
                    .clone()
            },
        )
    }

    #[cfg(test)]
    pub(crate) fn solver(&self) -> &Solver {
        &self.solver
    }

    #[cfg(test)]
    pub(crate) fn id_to_oriented(&self) -> &[(usize, usize)] {
        &self.id_to_oriented
    }
}

/// Flatten tiles into oriented patterns: a pattern id per `(tile,
/// orientation)` pair, in tile order, plus the inverse lookup.
fn orient_ids<T>(tiles: &[Tile<T>]) -> (Vec<(usize, usize)>, Vec<Vec<usize>>) {
    let mut id_to_oriented = Vec::new();
    let mut oriented_ids = Vec::with_capacity(tiles.len());
    for (tile, definition) in tiles.iter().enumerate() {
        oriented_ids.push(
            (0..definition.variants.len())
                .map(|orientation| {
                    id_to_oriented.push((tile, orientation));
                    id_to_oriented.len() - 1
                })
                .collect_vec(),
        );
    }
    (id_to_oriented, oriented_ids)
}

/// Lift each left/right adjacency to all four directions by applying every
/// dihedral action to both sides, then collect the dense relation into
/// per-pattern allow-lists.
fn lift_adjacencies<T>(
    tiles: &[Tile<T>],
    oriented_ids: &[Vec<usize>],
    adjacencies: &[Adjacency],
    num_patterns: usize,
) -> CompatibilityTable {
    let mut dense: Vec<[Vec<bool>; 4]> =
        vec![std::array::from_fn(|_| vec![false; num_patterns]); num_patterns];

    for adjacency in adjacencies {
        let left_actions = tiles[adjacency.left].symmetry.action_map();
        let right_actions = tiles[adjacency.right].symmetry.action_map();

        let mut add = |action: usize, direction: Direction| {
            let left = oriented_ids[adjacency.left][left_actions[action][adjacency.left_orientation]];
            let right =
                oriented_ids[adjacency.right][right_actions[action][adjacency.right_orientation]];
            dense[left][direction.index()][right] = true;
            dense[right][direction.opposite().index()][left] = true;
        };

        add(0, Direction::Right);
        add(1, Direction::Up);
        add(2, Direction::Left);
        add(3, Direction::Down);
        add(4, Direction::Left);
        add(5, Direction::Down);
        add(6, Direction::Right);
        add(7, Direction::Up);
    }

    dense
        .into_iter()
        .map(|by_direction| by_direction.map(|allowed| allowed.iter().positions(|&ok| ok).collect()))
        .collect()
}
