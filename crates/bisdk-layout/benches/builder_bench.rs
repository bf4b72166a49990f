//! Benchmarks for copy-on-write layout edits and facade materialization.
//!
//! Run with: cargo bench -p bisdk-layout --bench builder_bench

use bisdk_layout::{Layout, LayoutBuilder, LayoutFacade, SectionHeader, Size};
use criterion::{BenchmarkId, Criterion, Throughput, criterion_group, criterion_main};
use std::hint::black_box;
use std::sync::Arc;

fn grid(rows: usize, columns: usize) -> Arc<Layout<u32>> {
    (0..rows)
        .fold(LayoutBuilder::for_new_layout(), |builder, r| {
            builder.add_row(|row| {
                (0..columns).fold(
                    row.header(Some(SectionHeader::titled(format!("Row {r}")))),
                    |row, c| {
                        let value = (r * columns + c) as u32;
                        row.add_column(Size::columns(2), |col| col.content(Some(value)))
                    },
                )
            })
        })
        .build()
}

// =============================================================================
// Single edits on a shared snapshot
// =============================================================================

fn bench_single_edits(c: &mut Criterion) {
    let mut group = c.benchmark_group("layout_builder/single_edit");

    for (rows, columns) in [(4, 3), (16, 6), (64, 12)] {
        let layout = grid(rows, columns);
        let label = format!("{rows}x{columns}");

        group.bench_with_input(BenchmarkId::new("modify_column", &label), &layout, |b, layout| {
            b.iter(|| {
                let built = LayoutBuilder::for_layout(Arc::clone(layout))
                    .modify_row(rows / 2, |row, _| {
                        row.modify_column(0, |col, _| col.content(Some(0)))
                            .expect("column 0 exists")
                    })
                    .map(|builder| builder.build());
                black_box(built)
            })
        });

        group.bench_with_input(BenchmarkId::new("move_row", &label), &layout, |b, layout| {
            b.iter(|| {
                let built = LayoutBuilder::for_layout(Arc::clone(layout))
                    .move_row(0, rows)
                    .map(|builder| builder.build());
                black_box(built)
            })
        });
    }

    group.finish();
}

// =============================================================================
// Batch edits and facade traversal
// =============================================================================

fn bench_batch_and_facades(c: &mut Criterion) {
    let mut group = c.benchmark_group("layout_builder/batch");

    for rows in [8, 32, 128] {
        let layout = grid(rows, 6);
        group.throughput(Throughput::Elements((rows * 6) as u64));

        group.bench_with_input(BenchmarkId::new("modify_all_columns", rows), &layout, |b, layout| {
            b.iter(|| {
                let built = LayoutBuilder::for_layout(Arc::clone(layout))
                    .modify_all_rows(|row, _| {
                        row.modify_all_columns(|col, _| col.style(Some("x".to_string())))
                    })
                    .build();
                black_box(built)
            })
        });

        group.bench_with_input(BenchmarkId::new("facade_walk", rows), &layout, |b, layout| {
            b.iter(|| {
                let facade = LayoutFacade::new(Arc::clone(layout));
                let total = facade.rows().reduce(0usize, |acc, row| {
                    acc + row.columns().filter(|c| c.has_content()).len()
                });
                black_box(total)
            })
        });
    }

    group.finish();
}

criterion_group!(benches, bench_single_edits, bench_batch_and_facades);
criterion_main!(benches);
