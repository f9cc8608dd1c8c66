//! Central configuration for the benchmark driver.
//!
//! All tunables live here; edit the defaults or pick a preset in
//! `main.rs`. There is deliberately no CLI surface.

/// Master configuration for the demo simulation and matcher benchmark.
#[derive(Debug, Clone)]
pub struct BenchConfig {
    // ─────────────────────────────────────────────────────────────────────────
    // Demo Simulation
    // ─────────────────────────────────────────────────────────────────────────
    /// Ticks to run the producer-consumer demo for.
    pub demo_ticks: u64,
    /// Number of consumers bidding for the demo asset.
    pub demo_consumers: usize,
    /// Number of producers selling the demo asset.
    pub demo_producers: usize,

    // ─────────────────────────────────────────────────────────────────────────
    // Matcher Benchmark
    // ─────────────────────────────────────────────────────────────────────────
    /// Orders to generate and admit.
    pub num_orders: usize,
    /// Random seed; `None` seeds from the OS.
    pub seed: Option<u64>,
    /// Order quantity range (inclusive).
    pub min_qty: u32,
    pub max_qty: u32,
    /// Mean limit price in cents.
    pub mean_price: f64,
    /// Standard deviation of the limit price.
    pub price_sd: f64,
    /// Half-spread nudging buys below and sells above the mean.
    pub spread_offset: f64,
    /// Mean distance of a stop trigger from the order's own price.
    pub stop_offset_mean: f64,
    /// Standard deviation of the stop distance.
    pub stop_offset_sd: f64,
    /// Relative weights of market / limit / stop / stop-limit orders.
    pub kind_weights: [f64; 4],
}

impl Default for BenchConfig {
    fn default() -> Self {
        Self {
            // Demo Simulation
            demo_ticks: 200,
            demo_consumers: 5,
            demo_producers: 2,

            // Matcher Benchmark
            num_orders: 1_000_000,
            seed: Some(42),
            min_qty: 1,
            max_qty: 100,
            mean_price: 1_000.0,
            price_sd: 100.0,
            spread_offset: 10.0,
            stop_offset_mean: 30.0,
            stop_offset_sd: 10.0,
            kind_weights: [1.0, 1.01, 0.02, 0.02],
        }
    }
}

impl BenchConfig {
    /// Create a new config with default values.
    pub fn new() -> Self {
        Self::default()
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Builder-style setters
    // ─────────────────────────────────────────────────────────────────────────

    /// Set the number of benchmark orders.
    pub fn num_orders(mut self, n: usize) -> Self {
        self.num_orders = n;
        self
    }

    /// Set the random seed.
    pub fn seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Set the order kind weights (market, limit, stop, stop-limit).
    pub fn kind_weights(mut self, weights: [f64; 4]) -> Self {
        self.kind_weights = weights;
        self
    }

    /// Set the demo simulation length.
    pub fn demo_ticks(mut self, ticks: u64) -> Self {
        self.demo_ticks = ticks;
        self
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Presets
    // ─────────────────────────────────────────────────────────────────────────

    /// Quick run for sanity checking the whole pipeline.
    pub fn smoke() -> Self {
        Self::default().num_orders(10_000).demo_ticks(50)
    }

    /// Limit-heavy flow that builds a deep resting book.
    pub fn deep_book() -> Self {
        Self::default().kind_weights([0.2, 2.0, 0.01, 0.01])
    }

    /// Elevated stop and stop-limit share to exercise arming cascades.
    pub fn stop_heavy() -> Self {
        Self::default().kind_weights([1.0, 1.0, 0.4, 0.4])
    }
}
