use crate::scalar::{Geometry, GeometryCollection};

/// Iterator over copies of the members of a [`GeometryCollection`]
#[derive(Clone, Debug)]
pub struct GeometryCollectionIterator<'a> {
    geom: &'a GeometryCollection,
    index: usize,
    end: usize,
}

impl<'a> GeometryCollectionIterator<'a> {
    #[inline]
    pub fn new(geom: &'a GeometryCollection) -> Self {
        Self {
            geom,
            index: 0,
            end: geom.num_geometries(),
        }
    }
}

impl<'a> Iterator for GeometryCollectionIterator<'a> {
    type Item = Geometry;

    #[inline]
    fn next(&mut self) -> Option<Self::Item> {
        if self.index == self.end {
            return None;
        }
        let old = self.index;
        self.index += 1;
        self.geom.geometry_n(old)
    }

    #[inline]
    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.end - self.index, Some(self.end - self.index))
    }
}

impl<'a> ExactSizeIterator for GeometryCollectionIterator<'a> {}

impl<'a> DoubleEndedIterator for GeometryCollectionIterator<'a> {
    #[inline]
    fn next_back(&mut self) -> Option<Self::Item> {
        if self.index == self.end {
            None
        } else {
            self.end -= 1;
            self.geom.geometry_n(self.end)
        }
    }
}

impl<'a> IntoIterator for &'a GeometryCollection {
    type Item = Geometry;
    type IntoIter = GeometryCollectionIterator<'a>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
