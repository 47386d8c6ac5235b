/// Single board axis, used for row/column positions and board dimensions.
pub type Coord = u8;

/// Count type used for mine counts and total-cell counts.
pub type CellCount = u16;

/// Board position as `(row, col)`.
pub type Coord2 = (Coord, Coord);

pub trait ToNdIndex {
    type Output;
    fn to_nd_index(self) -> Self::Output;
}

impl ToNdIndex for Coord2 {
    type Output = [usize; 2];

    fn to_nd_index(self) -> Self::Output {
        [self.0.into(), self.1.into()]
    }
}

pub const fn mult(a: Coord, b: Coord) -> CellCount {
    let a = a as CellCount;
    let b = b as CellCount;
    a.saturating_mul(b)
}

/// In-bounds cells around `center`, row-major, without `center` itself.
///
/// The neighbourhood is the 3x3 block clamped to `bounds`, so edges never wrap.
pub fn neighbors(center: Coord2, bounds: Coord2) -> impl Iterator<Item = Coord2> {
    let (row, col) = center;
    let (rows, cols) = bounds;
    let row_span = row.saturating_sub(1)..=row.saturating_add(1).min(rows.saturating_sub(1));
    let col_span = col.saturating_sub(1)..=col.saturating_add(1).min(cols.saturating_sub(1));

    row_span
        .flat_map(move |r| col_span.clone().map(move |c| (r, c)))
        .filter(move |&pos| pos != center)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn corner_has_three_neighbors() {
        let neighbors: Vec<_> = neighbors((0, 0), (9, 9)).collect();
        assert_eq!(neighbors, vec![(0, 1), (1, 0), (1, 1)]);
    }

    #[test]
    fn interior_has_eight_neighbors() {
        assert_eq!(neighbors((4, 4), (9, 9)).count(), 8);
    }

    #[test]
    fn far_edge_is_not_wrapped() {
        let neighbors: Vec<_> = neighbors((8, 8), (9, 9)).collect();
        assert_eq!(neighbors, vec![(7, 7), (7, 8), (8, 7)]);
    }

    #[test]
    fn single_row_only_looks_sideways() {
        let neighbors: Vec<_> = neighbors((0, 1), (1, 3)).collect();
        assert_eq!(neighbors, vec![(0, 0), (0, 2)]);
    }

    #[test]
    fn single_cell_board_has_no_neighbors() {
        assert_eq!(neighbors((0, 0), (1, 1)).count(), 0);
    }
}
