use hideout_core::Point;

/// Cost of an orthogonal step.
pub const STRAIGHT_COST: i32 = 10;
/// Cost of a diagonal step.
pub const DIAGONAL_COST: i32 = 14;

/// Manhattan (L1) distance between two points.
#[inline]
pub fn manhattan(a: Point, b: Point) -> i32 {
    (a.x - b.x).abs() + (a.y - b.y).abs()
}

/// Chebyshev (L∞) distance between two points.
#[inline]
pub fn chebyshev(a: Point, b: Point) -> i32 {
    (a.x - b.x).abs().max((a.y - b.y).abs())
}

/// Cost of stepping between two adjacent cells.
#[inline]
pub fn step_cost(from: Point, to: Point) -> i32 {
    if manhattan(from, to) == 1 {
        STRAIGHT_COST
    } else {
        DIAGONAL_COST
    }
}

/// Search heuristic: Manhattan distance in step-cost units.
///
/// A diagonal step costs 14 but is estimated at 20, so the estimate can
/// exceed the true remaining cost and A* may return a route that is not
/// the cheapest one.
#[inline]
pub fn estimate(from: Point, to: Point) -> i32 {
    STRAIGHT_COST * manhattan(from, to)
}
