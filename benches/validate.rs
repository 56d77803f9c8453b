use geo::{polygon, MapCoords, Polygon};

use criterion::{criterion_group, criterion_main, Criterion};
use geocollection::{Factory, FactoryConfig};

fn create_data() -> Vec<Polygon> {
    // An L shape
    // https://github.com/georust/geo/blob/7cb7d0ffa6bf1544c5ca9922bd06100c36f815d7/README.md?plain=1#L40
    let poly = polygon![
        (x: 0.0, y: 0.0),
        (x: 4.0, y: 0.0),
        (x: 4.0, y: 1.0),
        (x: 1.0, y: 1.0),
        (x: 1.0, y: 4.0),
        (x: 0.0, y: 4.0),
        (x: 0.0, y: 0.0),
    ];
    (0..20)
        .flat_map(|row| (0..10).map(move |col| (row, col)))
        .map(|(row, col)| {
            let (dx, dy) = (col as f64 * 5., row as f64 * 5.);
            poly.map_coords(|c| geo::Coord {
                x: c.x + dx,
                y: c.y + dy,
            })
        })
        .collect()
}

pub fn criterion_benchmark(c: &mut Criterion) {
    let data = create_data();
    let strict = Factory::new(FactoryConfig::default());
    let lenient = Factory::new(FactoryConfig {
        validate_multi_polygons: false,
        ..Default::default()
    });

    c.bench_function("validated MultiPolygon", |b| {
        b.iter(|| {
            let _ = strict.multi_polygon(data.iter().cloned()).unwrap();
        })
    });

    c.bench_function("unvalidated MultiPolygon", |b| {
        b.iter(|| {
            let _ = lenient.multi_polygon(data.iter().cloned()).unwrap();
        })
    });
}

criterion_group!(benches, criterion_benchmark);
criterion_main!(benches);
