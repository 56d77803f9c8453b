//! DE-9IM pattern matching against [`IntersectionMatrix`] values computed by [`geo`].

use std::fmt::Display;
use std::str::FromStr;

use geo::coordinate_position::CoordPos;
use geo::dimensions::Dimensions;
use geo::relate::IntersectionMatrix;
use itertools::Itertools;

use crate::engine::EngineError;

/// Matrix cells in the row-major order used by pattern strings.
const CELLS: [(CoordPos, CoordPos); 9] = [
    (CoordPos::Inside, CoordPos::Inside),
    (CoordPos::Inside, CoordPos::OnBoundary),
    (CoordPos::Inside, CoordPos::Outside),
    (CoordPos::OnBoundary, CoordPos::Inside),
    (CoordPos::OnBoundary, CoordPos::OnBoundary),
    (CoordPos::OnBoundary, CoordPos::Outside),
    (CoordPos::Outside, CoordPos::Inside),
    (CoordPos::Outside, CoordPos::OnBoundary),
    (CoordPos::Outside, CoordPos::Outside),
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum PatternCell {
    /// `*`
    Any,
    /// `T`
    NonEmpty,
    /// `F`
    Empty,
    /// `0`, `1` or `2`
    Exactly(Dimensions),
}

impl PatternCell {
    fn matches(&self, dim: Dimensions) -> bool {
        match self {
            PatternCell::Any => true,
            PatternCell::NonEmpty => dim != Dimensions::Empty,
            PatternCell::Empty => dim == Dimensions::Empty,
            PatternCell::Exactly(expected) => dim == *expected,
        }
    }
}

impl TryFrom<char> for PatternCell {
    type Error = ();

    fn try_from(value: char) -> std::result::Result<Self, Self::Error> {
        match value {
            '*' => Ok(PatternCell::Any),
            'T' | 't' => Ok(PatternCell::NonEmpty),
            'F' | 'f' => Ok(PatternCell::Empty),
            '0' => Ok(PatternCell::Exactly(Dimensions::ZeroDimensional)),
            '1' => Ok(PatternCell::Exactly(Dimensions::OneDimensional)),
            '2' => Ok(PatternCell::Exactly(Dimensions::TwoDimensional)),
            _ => Err(()),
        }
    }
}

impl Display for PatternCell {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let c = match self {
            PatternCell::Any => '*',
            PatternCell::NonEmpty => 'T',
            PatternCell::Empty => 'F',
            PatternCell::Exactly(Dimensions::Empty) => 'F',
            PatternCell::Exactly(Dimensions::ZeroDimensional) => '0',
            PatternCell::Exactly(Dimensions::OneDimensional) => '1',
            PatternCell::Exactly(Dimensions::TwoDimensional) => '2',
        };
        write!(f, "{c}")
    }
}

/// A parsed nine-character DE-9IM pattern such as `"2********"`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RelatePattern([PatternCell; 9]);

impl RelatePattern {
    pub fn matches(&self, matrix: &IntersectionMatrix) -> bool {
        self.0
            .iter()
            .zip(CELLS)
            .all(|(cell, (lhs, rhs))| cell.matches(matrix.get(lhs, rhs)))
    }
}

impl FromStr for RelatePattern {
    type Err = EngineError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        let invalid = || EngineError::InvalidPattern(s.to_string());
        let mut cells = [PatternCell::Any; 9];
        let mut chars = s.chars();
        for cell in cells.iter_mut() {
            let c = chars.next().ok_or_else(invalid)?;
            *cell = PatternCell::try_from(c).map_err(|_| invalid())?;
        }
        if chars.next().is_some() {
            return Err(invalid());
        }
        Ok(Self(cells))
    }
}

impl Display for RelatePattern {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0.iter().join(""))
    }
}

#[cfg(test)]
mod test {
    use geo::{polygon, Relate};

    use super::*;

    #[test]
    fn parse_patterns() {
        let pattern: RelatePattern = "2********".parse().unwrap();
        assert_eq!(pattern.to_string(), "2********");
        let pattern: RelatePattern = "t*f**FFF*".parse().unwrap();
        assert_eq!(pattern.to_string(), "T*F**FFF*");
    }

    #[test]
    fn reject_malformed_patterns() {
        assert!("2*******".parse::<RelatePattern>().is_err());
        assert!("2*********".parse::<RelatePattern>().is_err());
        assert!("3********".parse::<RelatePattern>().is_err());
        assert!("".parse::<RelatePattern>().is_err());
    }

    #[test]
    fn matches_overlapping_squares() {
        let a = polygon![(x: 0., y: 0.), (x: 2., y: 0.), (x: 2., y: 2.), (x: 0., y: 2.)];
        let b = polygon![(x: 1., y: 1.), (x: 3., y: 1.), (x: 3., y: 3.), (x: 1., y: 3.)];
        let matrix = a.relate(&b);
        assert!("2********".parse::<RelatePattern>().unwrap().matches(&matrix));
        assert!("T********".parse::<RelatePattern>().unwrap().matches(&matrix));
        assert!(!"F********".parse::<RelatePattern>().unwrap().matches(&matrix));
    }

    #[test]
    fn matches_edge_sharing_squares() {
        let a = polygon![(x: 0., y: 0.), (x: 1., y: 0.), (x: 1., y: 1.), (x: 0., y: 1.)];
        let b = polygon![(x: 1., y: 0.), (x: 2., y: 0.), (x: 2., y: 1.), (x: 1., y: 1.)];
        let matrix = a.relate(&b);
        assert!(!"2********".parse::<RelatePattern>().unwrap().matches(&matrix));
        assert!("****1****".parse::<RelatePattern>().unwrap().matches(&matrix));
    }
}
