use crate::datatypes::Dimension;

/// A single coordinate with optional Z and M ordinates.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Coord {
    pub x: f64,
    pub y: f64,
    pub z: Option<f64>,
    pub m: Option<f64>,
}

impl Coord {
    pub fn new(x: f64, y: f64) -> Self {
        Self {
            x,
            y,
            z: None,
            m: None,
        }
    }

    pub fn with_z(self, z: f64) -> Self {
        Self { z: Some(z), ..self }
    }

    pub fn with_m(self, m: f64) -> Self {
        Self { m: Some(m), ..self }
    }
}

impl From<(f64, f64)> for Coord {
    fn from((x, y): (f64, f64)) -> Self {
        Self::new(x, y)
    }
}

impl From<(f64, f64, f64)> for Coord {
    fn from((x, y, z): (f64, f64, f64)) -> Self {
        Self::new(x, y).with_z(z)
    }
}

impl From<[f64; 2]> for Coord {
    fn from([x, y]: [f64; 2]) -> Self {
        Self::new(x, y)
    }
}

impl From<geo::Coord> for Coord {
    fn from(value: geo::Coord) -> Self {
        Self::new(value.x, value.y)
    }
}

impl From<Coord> for geo::Coord {
    fn from(value: Coord) -> Self {
        geo::Coord {
            x: value.x,
            y: value.y,
        }
    }
}

/// An interleaved buffer of coordinates sharing one [`Dimension`].
///
/// Ordinates missing from a pushed [`Coord`] are stored as NaN.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct CoordSeq {
    dim: Dimension,
    values: Vec<f64>,
}

impl CoordSeq {
    pub fn new(dim: Dimension) -> Self {
        Self {
            dim,
            values: Vec::new(),
        }
    }

    pub fn with_capacity(dim: Dimension, capacity: usize) -> Self {
        Self {
            dim,
            values: Vec::with_capacity(capacity * dim.size()),
        }
    }

    pub fn from_coords(dim: Dimension, coords: impl IntoIterator<Item = impl Into<Coord>>) -> Self {
        let coords = coords.into_iter();
        let mut seq = Self::with_capacity(dim, coords.size_hint().0);
        coords.for_each(|c| seq.push(c.into()));
        seq
    }

    pub fn push(&mut self, coord: Coord) {
        self.values.push(coord.x);
        self.values.push(coord.y);
        if self.dim.has_z() {
            self.values.push(coord.z.unwrap_or(f64::NAN));
        }
        if self.dim.has_m() {
            self.values.push(coord.m.unwrap_or(f64::NAN));
        }
    }

    pub fn dim(&self) -> Dimension {
        self.dim
    }

    pub fn len(&self) -> usize {
        self.values.len() / self.dim.size()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn x(&self, i: usize) -> f64 {
        self.values[i * self.dim.size()]
    }

    pub fn y(&self, i: usize) -> f64 {
        self.values[i * self.dim.size() + 1]
    }

    /// The Z ordinate, or NaN when the sequence has no Z.
    pub fn z(&self, i: usize) -> f64 {
        if self.dim.has_z() {
            self.values[i * self.dim.size() + 2]
        } else {
            f64::NAN
        }
    }

    /// The M ordinate, or NaN when the sequence has no M.
    pub fn m(&self, i: usize) -> f64 {
        if self.dim.has_m() {
            self.values[(i + 1) * self.dim.size() - 1]
        } else {
            f64::NAN
        }
    }

    pub fn coord(&self, i: usize) -> Option<Coord> {
        if i >= self.len() {
            return None;
        }
        Some(Coord {
            x: self.x(i),
            y: self.y(i),
            z: self.dim.has_z().then(|| self.z(i)),
            m: self.dim.has_m().then(|| self.m(i)),
        })
    }

    pub fn iter(&self) -> impl Iterator<Item = Coord> + '_ {
        (0..self.len()).filter_map(|i| self.coord(i))
    }

    /// A sequence is closed when it is non-empty and its first and last XY coincide.
    pub fn is_closed(&self) -> bool {
        let len = self.len();
        len > 0 && self.x(0) == self.x(len - 1) && self.y(0) == self.y(len - 1)
    }

    /// Appends the first coordinate if the sequence is not already closed.
    pub fn close(&mut self) {
        if !self.is_empty() && !self.is_closed() {
            let first = self.values[..self.dim.size()].to_vec();
            self.values.extend(first);
        }
    }

    pub(crate) fn translate(&mut self, dx: f64, dy: f64) {
        let size = self.dim.size();
        for chunk in self.values.chunks_exact_mut(size) {
            chunk[0] += dx;
            chunk[1] += dy;
        }
    }

    pub(crate) fn to_geo_line_string(&self) -> geo::LineString {
        geo::LineString::new(self.iter().map(geo::Coord::from).collect())
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn missing_ordinates_are_nan() {
        let seq = CoordSeq::from_coords(Dimension::XYZM, [Coord::new(1., 2.).with_m(4.)]);
        assert_eq!(seq.len(), 1);
        assert_eq!(seq.x(0), 1.);
        assert!(seq.z(0).is_nan());
        assert_eq!(seq.m(0), 4.);
    }

    #[test]
    fn xy_drops_z() {
        let seq = CoordSeq::from_coords(Dimension::XY, [(1., 2., 3.)]);
        assert_eq!(seq.coord(0), Some(Coord::new(1., 2.)));
        assert!(seq.z(0).is_nan());
        assert_eq!(seq.coord(1), None);
    }

    #[test]
    fn close_ring() {
        let mut seq = CoordSeq::from_coords(Dimension::XYM, [(0., 0.), (1., 0.), (1., 1.)]);
        assert!(!seq.is_closed());
        seq.close();
        assert!(seq.is_closed());
        assert_eq!(seq.len(), 4);
        seq.close();
        assert_eq!(seq.len(), 4);
    }

    #[test]
    fn empty_is_not_closed() {
        let seq = CoordSeq::new(Dimension::XY);
        assert!(!seq.is_closed());
    }
}
