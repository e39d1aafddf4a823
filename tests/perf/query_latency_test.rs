use std::time::Instant;

use crate::catalog::Catalog;
use crate::model::Entry;
use crate::search::search;

/// Nearest-rank percentile of `samples`, which are sorted in place.
fn percentile(samples: &mut [f64], pct: usize) -> f64 {
    samples.sort_by(f64::total_cmp);
    let rank = (samples.len() * pct).div_ceil(100).max(1);
    samples[rank - 1]
}

#[test]
fn warm_typo_query_p95_under_budget() {
    let mut entries: Vec<Entry> = (0..10_000)
        .map(|i| {
            Entry::new(
                &format!("Utility App {i:05}"),
                &format!("/Applications/Utility App {i:05}.app"),
            )
        })
        .collect();
    entries.push(Entry::new("Terminal", "/System/Applications/Utilities/Terminal.app"));
    let catalog = Catalog::from_entries(entries);

    for _ in 0..5 {
        let results = search(&catalog, "termnal");
        assert_eq!(results[0].entry.name, "Terminal");
    }

    let mut batch_p95 = Vec::with_capacity(5);
    for _ in 0..5 {
        let mut samples = Vec::with_capacity(20);
        for _ in 0..20 {
            let start = Instant::now();
            let _ = search(&catalog, "termnal");
            samples.push(start.elapsed().as_secs_f64() * 1000.0);
        }
        batch_p95.push(percentile(&mut samples, 95));
    }

    let median_p95 = percentile(&mut batch_p95, 50);

    assert!(
        median_p95 <= 250.0,
        "median batch p95 too high: {median_p95:.3}ms (budget 250.0ms); batches={batch_p95:?}",
    );
}
