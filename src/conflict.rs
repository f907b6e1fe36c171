use crate::position::Position;

/// True when no two closed intervals share a position. Endpoints may be
/// given in either order; touching intervals overlap.
pub fn are_disjoint(spans: &[(Position, Position)]) -> bool {
    first_overlap(spans).is_none()
}

/// Indices of the first overlapping pair, scanning pairs in index order.
pub fn first_overlap(spans: &[(Position, Position)]) -> Option<(usize, usize)> {
    let normalized: Vec<(Position, Position)> = spans
        .iter()
        .map(|(a, b)| ((*a).min(*b), (*a).max(*b)))
        .collect();

    for (first, (first_start, first_end)) in normalized.iter().enumerate() {
        for (offset, (second_start, second_end)) in normalized[first + 1..].iter().enumerate() {
            if first_start <= second_end && second_start <= first_end {
                return Some((first, first + 1 + offset));
            }
        }
    }

    None
}
