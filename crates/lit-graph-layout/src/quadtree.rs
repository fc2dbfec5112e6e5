//! Barnes-Hut quadtree for O(n log n) charge approximation.
//!
//! The quadtree recursively subdivides space and computes center of mass
//! for each cell. Distant cells can be approximated as single points,
//! reducing the O(n²) pairwise repulsion to O(n log n). The same tree
//! answers neighborhood queries for collision detection.

/// A cell of the quadtree.
#[derive(Debug, Clone, Default)]
pub struct Cell {
    /// Center of mass X.
    pub center_x: f64,
    /// Center of mass Y.
    pub center_y: f64,
    /// Number of points in this cell.
    pub mass: f64,
    /// Cell width (for the Barnes-Hut theta criterion).
    pub width: f64,
    /// Minimum corner of the cell's square box.
    pub x0: f64,
    pub y0: f64,
    /// Child cells in nw, ne, sw, se order.
    pub children: [Option<usize>; 4],
    /// Point indices stored in a leaf; empty for internal cells.
    pub points: Vec<usize>,
}

impl Cell {
    pub fn is_leaf(&self) -> bool {
        self.children.iter().all(Option::is_none)
    }
}

/// A Barnes-Hut quadtree for 2D spatial partitioning.
#[derive(Debug)]
pub struct QuadTree {
    /// Flattened cells; index 0 is the root when non-empty.
    cells: Vec<Cell>,
}

impl QuadTree {
    /// Build a quadtree from point positions.
    ///
    /// # Arguments
    /// * `positions` - Slice of `(x, y)` positions
    /// * `max_depth` - Maximum tree depth; deeper cells become multi-point leaves
    pub fn build(positions: &[(f64, f64)], max_depth: usize) -> Self {
        if positions.is_empty() {
            return Self { cells: Vec::new() };
        }

        let mut min_x = f64::MAX;
        let mut min_y = f64::MAX;
        let mut max_x = f64::MIN;
        let mut max_y = f64::MIN;

        for &(x, y) in positions {
            min_x = min_x.min(x);
            min_y = min_y.min(y);
            max_x = max_x.max(x);
            max_y = max_y.max(y);
        }

        // Pad and square the bounds so every point lands strictly inside.
        let padding = ((max_x - min_x).max(max_y - min_y) * 0.1).max(1.0);
        min_x -= padding;
        min_y -= padding;
        max_x += padding;
        max_y += padding;

        let width = (max_x - min_x).max(max_y - min_y);
        let center_x = (min_x + max_x) / 2.0;
        let center_y = (min_y + max_y) / 2.0;

        let x0 = center_x - width / 2.0;
        let y0 = center_y - width / 2.0;

        let mut cells = Vec::with_capacity(positions.len() * 2);
        let mut builder = TreeBuilder {
            positions,
            cells: &mut cells,
            max_depth,
        };

        let indices: Vec<usize> = (0..positions.len()).collect();
        builder.build_cell(&indices, x0, y0, width, 0);

        Self { cells }
    }

    /// Root cell, if the tree holds any point.
    pub fn root(&self) -> Option<&Cell> {
        self.cells.first()
    }

    /// Cell at a flattened index.
    pub fn cell(&self, index: usize) -> &Cell {
        &self.cells[index]
    }

    /// All flattened cells.
    pub fn cells(&self) -> &[Cell] {
        &self.cells
    }

    /// Collect, in ascending order, the points of every leaf whose box
    /// intersects the square of half-side `reach` around `(x, y)`.
    ///
    /// Leaf points are not filtered individually; callers test exact
    /// distances themselves.
    pub fn points_near(&self, x: f64, y: f64, reach: f64, out: &mut Vec<usize>) {
        out.clear();
        if self.cells.is_empty() {
            return;
        }
        let mut stack = vec![0usize];
        while let Some(ci) = stack.pop() {
            let cell = &self.cells[ci];
            if cell.x0 > x + reach
                || cell.x0 + cell.width < x - reach
                || cell.y0 > y + reach
                || cell.y0 + cell.width < y - reach
            {
                continue;
            }
            if cell.is_leaf() {
                out.extend_from_slice(&cell.points);
            } else {
                stack.extend(cell.children.iter().flatten().copied());
            }
        }
        out.sort_unstable();
    }
}

struct TreeBuilder<'a> {
    positions: &'a [(f64, f64)],
    cells: &'a mut Vec<Cell>,
    max_depth: usize,
}

impl<'a> TreeBuilder<'a> {
    fn build_cell(&mut self, indices: &[usize], x: f64, y: f64, width: f64, depth: usize) -> Option<usize> {
        if indices.is_empty() {
            return None;
        }

        let cell_idx = self.cells.len();
        self.cells.push(Cell::default());

        let mass = indices.len() as f64;
        let (sum_x, sum_y) = indices.iter().fold((0.0, 0.0), |(sx, sy), &i| {
            (sx + self.positions[i].0, sy + self.positions[i].1)
        });
        let (com_x, com_y) = (sum_x / mass, sum_y / mass);

        if indices.len() == 1 || depth >= self.max_depth {
            self.cells[cell_idx] = Cell {
                center_x: com_x,
                center_y: com_y,
                mass,
                width,
                x0: x,
                y0: y,
                children: [None; 4],
                points: indices.to_vec(),
            };
            return Some(cell_idx);
        }

        let half_width = width / 2.0;
        let mid_x = x + half_width;
        let mid_y = y + half_width;

        let mut quadrants: [Vec<usize>; 4] = Default::default();
        for &i in indices {
            let (px, py) = self.positions[i];
            let slot = match (px < mid_x, py < mid_y) {
                (true, false) => 0,
                (false, false) => 1,
                (true, true) => 2,
                (false, true) => 3,
            };
            quadrants[slot].push(i);
        }

        let children = [
            self.build_cell(&quadrants[0], x, mid_y, half_width, depth + 1),
            self.build_cell(&quadrants[1], mid_x, mid_y, half_width, depth + 1),
            self.build_cell(&quadrants[2], x, y, half_width, depth + 1),
            self.build_cell(&quadrants[3], mid_x, y, half_width, depth + 1),
        ];

        self.cells[cell_idx] = Cell {
            center_x: com_x,
            center_y: com_y,
            mass,
            width,
            x0: x,
            y0: y,
            children,
            points: Vec::new(),
        };

        Some(cell_idx)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_tree() {
        let tree = QuadTree::build(&[], 10);
        assert!(tree.root().is_none());
    }

    #[test]
    fn test_single_point() {
        let tree = QuadTree::build(&[(0.0, 0.0)], 10);
        let root = tree.root().unwrap();
        assert_eq!(root.mass, 1.0);
        assert!(root.is_leaf());
        assert_eq!(root.points, vec![0]);
    }

    #[test]
    fn test_multiple_points_subdivide() {
        let positions = vec![(0.0, 0.0), (100.0, 0.0), (0.0, 100.0), (100.0, 100.0)];
        let tree = QuadTree::build(&positions, 10);
        let root = tree.root().unwrap();
        assert!(!root.is_leaf());
        assert_eq!(root.mass, 4.0);
        assert!((root.center_x - 50.0).abs() < 1e-9);
        assert_eq!(tree.cells().len(), 5);
    }

    #[test]
    fn test_points_near_prunes_distant_cells() {
        let positions = vec![(0.0, 0.0), (3.0, 0.0), (500.0, 500.0), (505.0, 498.0)];
        let tree = QuadTree::build(&positions, 10);
        let mut near = Vec::new();

        tree.points_near(0.0, 0.0, 10.0, &mut near);
        assert_eq!(near, vec![0, 1]);

        tree.points_near(502.0, 499.0, 10.0, &mut near);
        assert_eq!(near, vec![2, 3]);

        tree.points_near(250.0, 250.0, 1_000.0, &mut near);
        assert_eq!(near, vec![0, 1, 2, 3]);
    }

    #[test]
    fn test_points_near_on_empty_tree() {
        let mut near = vec![7];
        QuadTree::build(&[], 10).points_near(0.0, 0.0, 5.0, &mut near);
        assert!(near.is_empty());
    }

    #[test]
    fn test_coincident_points_share_leaf_at_max_depth() {
        let positions = vec![(5.0, 5.0), (5.0, 5.0), (5.0, 5.0)];
        let tree = QuadTree::build(&positions, 4);
        let leaf_points: usize = tree
            .cells()
            .iter()
            .filter(|c| c.is_leaf())
            .map(|c| c.points.len())
            .sum();
        assert_eq!(leaf_points, 3);
    }
}
