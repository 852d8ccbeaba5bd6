#[global_allocator]
static ALLOC: dhat::Alloc = dhat::Alloc;

use msf_histogram::Histogram;
use tabled::{
    settings::{Settings, Style},
    Table, Tabled,
};

#[derive(Tabled)]
struct Record {
    bins: usize,
    resolution_1: String,
    resolution_3: String,
    resolution_6: String,
}

/// Insert `bins` distinct values, spread so that none of them share a bin at
/// resolution 1 or finer, and report `size_of / total bytes / total blocks`.
fn measure_memory_usage(bins: usize, resolution: usize) -> (usize, u64, u64) {
    let _profiler = dhat::Profiler::builder().testing().build();
    let mut h = Histogram::new(resolution);
    for i in 0..bins {
        let decade = (i / 90) as i32;
        let leading = 1.0 + (i % 90) as f64 / 10.0;
        h.insert(leading * 10f64.powi(decade), 1.0);
    }
    assert_eq!(h.len(), bins);
    let stats = dhat::HeapStats::get();
    (h.size_of(), stats.total_bytes, stats.total_blocks)
}

fn format_usage((size, bytes, blocks): (usize, u64, u64)) -> String {
    format!("{} / {} / {}", size, bytes, blocks)
}

#[test]
fn test_allocations() {
    let mut results = Vec::new();
    for bins in std::iter::once(0)
        .chain((0..).map(|c| 1 << c))
        .take_while(|&c| c <= 1 << 14)
    {
        let usage = [1, 3, 6].map(|resolution| measure_memory_usage(bins, resolution));

        // nothing is allocated before the first insert
        if bins == 0 {
            assert!(usage.iter().all(|&(_, bytes, blocks)| bytes == 0 && blocks == 0));
        }

        results.push(Record {
            bins,
            resolution_1: format_usage(usage[0]),
            resolution_3: format_usage(usage[1]),
            resolution_6: format_usage(usage[2]),
        });
    }

    let table_config = Settings::default().with(Style::markdown());
    let markdown = Table::new(results).with(table_config).to_string();
    std::fs::write(
        format!("{}/target/memory_allocations.md", env!("CARGO_MANIFEST_DIR")),
        &markdown,
    )
    .unwrap();
    println!("{}", markdown);
}
