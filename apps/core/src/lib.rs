pub mod catalog;
pub mod config;
pub mod contract;
pub mod events;
pub mod host;
pub mod logging;
pub mod model;
pub mod runtime;
pub mod search;
pub mod selection;
pub mod session;
pub mod transport;

#[cfg(test)]
mod tests {
    mod query_latency_test {
        include!(concat!(
            env!("CARGO_MANIFEST_DIR"),
            "/../../tests/perf/query_latency_test.rs"
        ));
    }
}
