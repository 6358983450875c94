use criterion::{BenchmarkId, Criterion, criterion_group, criterion_main};
use std::hint::black_box;
use std::time::Duration;
use vplot_core::columns::{CO2_LIQ, H2O_LIQ, PRESSURE};
use vplot_core::{ShapeOptions, Table, shape};

fn isobar_table(pressures: usize, points_per_curve: usize) -> Table {
    let mut pressure = Vec::with_capacity(pressures * points_per_curve);
    let mut h2o = Vec::with_capacity(pressures * points_per_curve);
    let mut co2 = Vec::with_capacity(pressures * points_per_curve);
    for i in 0..pressures {
        let p = 500.0 * (i + 1) as f64;
        for j in 0..points_per_curve {
            let x = 0.2 + 6.0 * j as f64 / points_per_curve as f64;
            pressure.push(p);
            h2o.push(x);
            co2.push(p / 1000.0 * (0.4 - 0.06 * x + 0.002 * x * x));
        }
    }
    Table::from_columns([(PRESSURE, pressure), (H2O_LIQ, h2o), (CO2_LIQ, co2)])
        .unwrap_or_default()
}

fn bench_shape(c: &mut Criterion) {
    let mut group = c.benchmark_group("shape");
    group.measurement_time(Duration::from_secs(5));

    let cases = [("p4_n10", 4usize, 10usize), ("p16_n40", 16, 40), ("p64_n100", 64, 100)];
    for (name, pressures, points) in cases {
        let table = isobar_table(pressures, points);
        group.bench_with_input(BenchmarkId::new("isobars", name), &table, |b, table| {
            b.iter(|| {
                let groups = shape(
                    black_box(table),
                    PRESSURE,
                    H2O_LIQ,
                    CO2_LIQ,
                    ShapeOptions::isobars(),
                );
                black_box(groups.map(|g| g.len()).unwrap_or(0));
            })
        });
    }

    group.finish();
}

criterion_group!(benches, bench_shape);
criterion_main!(benches);
