use bestfirst::{AdjacencyList, Node, SpatialGraph, Weight};

use movingai::{Coords2D, Map2D as _, MovingAiMap};

const DIAG_COST: Weight = std::f64::consts::SQRT_2;
const STRAIGHT_COST: Weight = 1.0;

/// 8-connected search graph over every tile of a map, blocked tiles included
/// (they simply have no edges). Tile (x, y) is `Node(x + width * y)`.
pub struct Grid {
    pub graph: SpatialGraph,
    width: usize,
}

impl Grid {
    pub fn node(&self, (x, y): Coords2D) -> Node {
        Node(x + self.width * y)
    }
}

fn neighbors(map: &MovingAiMap, tile: Coords2D) -> Vec<(Coords2D, Weight)> {
    let (x, y) = (tile.0 as isize, tile.1 as isize);
    let all: [((isize, isize), Weight); 8] = [
        ((x + 1, y), STRAIGHT_COST),
        ((x + 1, y + 1), DIAG_COST),
        ((x + 1, y - 1), DIAG_COST),
        ((x, y + 1), STRAIGHT_COST),
        ((x, y - 1), STRAIGHT_COST),
        ((x - 1, y), STRAIGHT_COST),
        ((x - 1, y - 1), DIAG_COST),
        ((x - 1, y + 1), DIAG_COST),
    ];
    all.into_iter()
        .filter(|&((x, y), _)| {
            x >= 0 && x < map.width() as isize && y >= 0 && y < map.height() as isize
        })
        .map(|((x, y), c)| ((x as usize, y as usize), c))
        .filter(|(n, _)| map.is_traversable_from(tile, *n))
        .collect()
}

pub fn build(map: &MovingAiMap) -> Grid {
    let (width, height) = (map.width(), map.height());
    let mut graph = AdjacencyList::with_capacity(width * height);
    for y in 0..height {
        for x in 0..width {
            graph.add_node((x, y));
        }
    }

    let node = |(x, y): Coords2D| Node(x + width * y);
    for coord in map.coords() {
        let n = node(coord);
        for (neighbour, cost) in neighbors(map, coord) {
            graph.add_edge(n, node(neighbour), cost);
        }
    }

    Grid {
        graph: graph.lock(),
        width,
    }
}
