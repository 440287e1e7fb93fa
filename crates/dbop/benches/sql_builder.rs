use criterion::{BenchmarkId, Criterion, black_box, criterion_group, criterion_main};
use dbop::{DbTable, Scalar, SqlType, WhereField};

/// A table with `n` fields alternating INT / VARCHAR, every field set.
fn build_table(n: usize) -> DbTable {
    let fields: Vec<(String, SqlType)> = (0..n)
        .map(|i| {
            let ty = if i % 2 == 0 { SqlType::Int } else { SqlType::VarChar };
            (format!("col{i}"), ty)
        })
        .collect();
    let decl: Vec<(&str, SqlType)> = fields.iter().map(|(name, ty)| (name.as_str(), *ty)).collect();

    let mut table = DbTable::with_fields("t", &decl, None).unwrap();
    for (i, (name, _)) in fields.iter().enumerate() {
        table.set_field_value(name, i.to_string());
    }
    table
}

fn bench_build_select(c: &mut Criterion) {
    let mut group = c.benchmark_group("sql_builder/build_select");

    for n in [1, 5, 10, 50, 100] {
        let table = build_table(n);
        group.bench_with_input(BenchmarkId::from_parameter(n), &table, |b, table| {
            b.iter(|| black_box(table.build_select(false).unwrap()));
        });
    }

    group.finish();
}

fn bench_build_insert(c: &mut Criterion) {
    let mut group = c.benchmark_group("sql_builder/build_insert");

    for n in [1, 5, 10, 50, 100] {
        let table = build_table(n);
        group.bench_with_input(BenchmarkId::from_parameter(n), &table, |b, table| {
            b.iter(|| black_box(table.build_insert().unwrap()));
        });
    }

    group.finish();
}

fn bench_build_update_where(c: &mut Criterion) {
    let mut group = c.benchmark_group("sql_builder/build_update_where");
    let where_fields = [WhereField::new("col0", "1")];

    for n in [1, 5, 10, 50, 100] {
        let table = build_table(n);
        group.bench_with_input(BenchmarkId::from_parameter(n), &table, |b, table| {
            b.iter(|| black_box(table.build_update(false, &where_fields).unwrap()));
        });
    }

    group.finish();
}

fn bench_map_rows(c: &mut Criterion) {
    let mut group = c.benchmark_group("sql_builder/map_rows");
    let table = build_table(10);

    for rows in [1, 100, 1000] {
        let data: Vec<Vec<Scalar>> = (0..rows)
            .map(|r| {
                (0..10)
                    .map(|i| {
                        if i % 2 == 0 {
                            Scalar::Int(r as i64)
                        } else {
                            Scalar::Text(format!("row{r}"))
                        }
                    })
                    .collect()
            })
            .collect();
        group.bench_with_input(BenchmarkId::from_parameter(rows), &data, |b, data| {
            b.iter(|| black_box(table.map_rows(data).unwrap()));
        });
    }

    group.finish();
}

criterion_group!(
    benches,
    bench_build_select,
    bench_build_insert,
    bench_build_update_where,
    bench_map_rows
);
criterion_main!(benches);
