use crate::factory::Factory;
use crate::scalar::Geometry;

pub(crate) fn p0(factory: &Factory) -> Geometry {
    factory.point((0., 1.)).unwrap()
}

pub(crate) fn p1(factory: &Factory) -> Geometry {
    factory.point((1., 2.)).unwrap()
}

pub(crate) fn p2(factory: &Factory) -> Geometry {
    factory.point((2., 3.)).unwrap()
}
