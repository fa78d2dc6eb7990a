//! Tile map and the waypoint path derived from it at construction time.

use rampart_core::{Position, Rect};

/// Side length of a single square tile, in pixels.
pub const TILE_LENGTH: f32 = 50.0;
/// Top-left corner of the tile grid on screen.
pub const MAP_ORIGIN: Position = Position::new(50.0, 50.0);
/// Number of tile columns in the standard map.
pub const MAP_COLUMNS: usize = 10;
/// Number of tile rows in the standard map.
pub const MAP_ROWS: usize = 8;

/// Standard map layout. Zero marks buildable grass; positive values are
/// 1-based path ordinals that materialize into the waypoint sequence.
const STANDARD_MAP: [[u8; MAP_COLUMNS]; MAP_ROWS] = [
    [0, 0, 0, 0, 0, 0, 0, 0, 0, 0],
    [1, 2, 3, 4, 5, 6, 7, 8, 9, 0],
    [0, 0, 0, 0, 0, 0, 0, 0, 10, 0],
    [19, 18, 17, 16, 15, 14, 13, 12, 11, 0],
    [20, 0, 0, 0, 0, 0, 0, 0, 0, 0],
    [21, 22, 23, 24, 25, 26, 27, 28, 29, 30],
    [0, 0, 0, 0, 0, 0, 0, 0, 0, 0],
    [0, 0, 0, 0, 0, 0, 0, 0, 0, 0],
];

/// Classification of a single map tile.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TileKind {
    /// Buildable ground.
    Grass,
    /// Part of the enemy route, carrying its 1-based path ordinal.
    Path(u8),
}

/// One tile of the map with its screen rectangle and session flags.
#[derive(Clone, Copy, Debug)]
pub(crate) struct Tile {
    pub(crate) kind: TileKind,
    pub(crate) rect: Rect,
    pub(crate) occupied: bool,
    pub(crate) selected: bool,
}

impl Tile {
    pub(crate) fn is_path(&self) -> bool {
        matches!(self.kind, TileKind::Path(_))
    }
}

/// Fixed tile grid materialized once at world construction.
#[derive(Clone, Debug)]
pub(crate) struct TileMap {
    tiles: Vec<Tile>,
}

impl TileMap {
    /// Builds the standard map with screen rectangles laid out row-major.
    pub(crate) fn standard() -> Self {
        let mut tiles = Vec::with_capacity(MAP_COLUMNS * MAP_ROWS);
        for (row_index, row) in STANDARD_MAP.iter().enumerate() {
            for (column_index, ordinal) in row.iter().enumerate() {
                let kind = if *ordinal == 0 {
                    TileKind::Grass
                } else {
                    TileKind::Path(*ordinal)
                };
                let rect = Rect::new(
                    MAP_ORIGIN.x + column_index as f32 * TILE_LENGTH,
                    MAP_ORIGIN.y + row_index as f32 * TILE_LENGTH,
                    TILE_LENGTH,
                    TILE_LENGTH,
                );
                tiles.push(Tile {
                    kind,
                    rect,
                    occupied: false,
                    selected: false,
                });
            }
        }
        Self { tiles }
    }

    pub(crate) fn tiles(&self) -> &[Tile] {
        &self.tiles
    }

    pub(crate) fn tile_mut(&mut self, index: usize) -> Option<&mut Tile> {
        self.tiles.get_mut(index)
    }

    /// Returns the index of the tile containing the point, if any.
    pub(crate) fn hit_test(&self, point: Position) -> Option<usize> {
        self.tiles.iter().position(|tile| tile.rect.contains(point))
    }

    /// Clears every session flag, freeing all tiles for construction.
    pub(crate) fn clear_session(&mut self) {
        for tile in &mut self.tiles {
            tile.occupied = false;
            tile.selected = false;
        }
    }

    /// Deselects every tile except the one at the provided index.
    pub(crate) fn deselect_except(&mut self, keep: Option<usize>) {
        for (index, tile) in self.tiles.iter_mut().enumerate() {
            if Some(index) != keep {
                tile.selected = false;
            }
        }
    }
}

/// Ordered waypoint sequence enemies follow, read-only after construction.
#[derive(Clone, Debug)]
pub(crate) struct PathNetwork {
    waypoints: Vec<Position>,
}

impl PathNetwork {
    /// Materializes the waypoint sequence from the map's path ordinals.
    pub(crate) fn from_map(map: &TileMap) -> Self {
        let mut ordered: Vec<(u8, Position)> = map
            .tiles()
            .iter()
            .filter_map(|tile| match tile.kind {
                TileKind::Path(ordinal) => Some((ordinal, tile.rect.center())),
                TileKind::Grass => None,
            })
            .collect();
        ordered.sort_by_key(|(ordinal, _)| *ordinal);
        Self {
            waypoints: ordered.into_iter().map(|(_, center)| center).collect(),
        }
    }

    pub(crate) fn waypoint(&self, index: usize) -> Option<Position> {
        self.waypoints.get(index).copied()
    }

    pub(crate) fn len(&self) -> usize {
        self.waypoints.len()
    }

    /// Position enemies spawn at: the first waypoint.
    pub(crate) fn spawn_position(&self) -> Option<Position> {
        self.waypoints.first().copied()
    }

    /// Position that triggers a leak: the final waypoint.
    pub(crate) fn final_waypoint(&self) -> Option<Position> {
        self.waypoints.last().copied()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn standard_map_produces_thirty_waypoints() {
        let map = TileMap::standard();
        let path = PathNetwork::from_map(&map);
        assert_eq!(path.len(), 30);
    }

    #[test]
    fn waypoints_are_ordered_by_ordinal() {
        let map = TileMap::standard();
        let path = PathNetwork::from_map(&map);

        let first = path.spawn_position().expect("spawn position");
        assert_eq!(first, Position::new(75.0, 125.0));

        let last = path.final_waypoint().expect("final waypoint");
        assert_eq!(last, Position::new(525.0, 325.0));
    }

    #[test]
    fn consecutive_waypoints_are_adjacent_tiles() {
        let map = TileMap::standard();
        let path = PathNetwork::from_map(&map);

        for index in 1..path.len() {
            let previous = path.waypoint(index - 1).expect("waypoint");
            let current = path.waypoint(index).expect("waypoint");
            let gap = previous.distance_to(current);
            assert!(
                (gap - TILE_LENGTH).abs() < f32::EPSILON,
                "waypoints {} and {} are {} pixels apart",
                index - 1,
                index,
                gap
            );
        }
    }

    #[test]
    fn hit_test_resolves_tile_under_point() {
        let map = TileMap::standard();
        let index = map.hit_test(Position::new(75.0, 75.0)).expect("tile hit");
        assert_eq!(index, 0);
        assert!(map.hit_test(Position::new(0.0, 0.0)).is_none());
    }

    #[test]
    fn clear_session_frees_all_tiles() {
        let mut map = TileMap::standard();
        if let Some(tile) = map.tile_mut(0) {
            tile.occupied = true;
            tile.selected = true;
        }
        map.clear_session();
        assert!(map.tiles().iter().all(|tile| !tile.occupied));
        assert!(map.tiles().iter().all(|tile| !tile.selected));
    }
}
