//! Market ABM - main binary.
//!
//! Runs two workloads back to back:
//! 1. A short producer-consumer simulation on one asset, showing the
//!    full tick loop end to end.
//! 2. A matcher throughput benchmark: a stream of random orders admitted
//!    straight into a single matcher, with periodic progress lines.
//!
//! Configuration lives in `src/config.rs`; there is no CLI.

mod config;

use std::time::{Duration, Instant};

use agents::{Consumer, ConsumerConfig, Producer, ProducerConfig};
use rand::distr::Distribution;
use rand::distr::weighted::WeightedIndex;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rand_distr::Normal;
use sim_core::{InMemoryNotifier, Matcher};
use simulation::Simulation;
use types::{Order, OrderId, Price, Quantity, Side, TraderId};

pub use config::BenchConfig;

const BENCH_ASSET: &str = "BENCH";
const DEMO_ASSET: &str = "FOOD";

/// Generates a random but well-formed order stream.
struct OrderFactory {
    next_id: u64,
    rng: StdRng,
    price: Normal<f64>,
    stop_offset: Normal<f64>,
    kinds: WeightedIndex<f64>,
    min_qty: u32,
    max_qty: u32,
    spread_offset: f64,
}

impl OrderFactory {
    fn new(config: &BenchConfig) -> Self {
        let rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_os_rng(),
        };
        Self {
            next_id: 1,
            rng,
            price: Normal::new(config.mean_price, config.price_sd).expect("price distribution"),
            stop_offset: Normal::new(config.stop_offset_mean, config.stop_offset_sd)
                .expect("stop offset distribution"),
            kinds: WeightedIndex::new(config.kind_weights).expect("order kind weights"),
            min_qty: config.min_qty,
            max_qty: config.max_qty,
            spread_offset: config.spread_offset,
        }
    }

    fn next_order(&mut self) -> Order {
        let id = self.next_id;
        self.next_id += 1;
        let trader = TraderId(id);

        let side = if self.rng.random_bool(0.5) {
            Side::Buy
        } else {
            Side::Sell
        };
        let qty = Quantity(self.rng.random_range(self.min_qty..=self.max_qty));

        // Buys land a little under the mean, sells a little over, so a
        // spread forms and market orders have something to cross.
        let base = self.price.sample(&mut self.rng);
        let price_f = match side {
            Side::Buy => base - self.spread_offset,
            Side::Sell => base + self.spread_offset,
        };
        let price = Price(price_f.max(1.0) as u32);
        let offset = self.stop_offset.sample(&mut self.rng).abs().max(1.0);

        let mut order = match self.kinds.sample(&mut self.rng) {
            0 => Order::market(trader, BENCH_ASSET, side, qty),
            1 => Order::limit(trader, BENCH_ASSET, side, price, qty),
            2 => {
                // Buy stops trigger above the market, sell stops below.
                let stop = match side {
                    Side::Buy => Price((price_f + offset) as u32),
                    Side::Sell => Price((price_f - offset).max(1.0) as u32),
                };
                Order::stop(trader, BENCH_ASSET, side, stop, qty)
            }
            _ => {
                // The stop must sit on the rational side of the limit:
                // at or below it for buys, at or above it for sells.
                let stop = match side {
                    Side::Buy => Price((price_f - offset).max(1.0) as u32),
                    Side::Sell => Price((price_f + offset) as u32),
                };
                Order::stop_limit(trader, BENCH_ASSET, side, price, stop, qty)
            }
        };
        order.ord_id = OrderId(id);
        order
    }
}

fn print_banner(config: &BenchConfig) {
    eprintln!("╔══════════════════════════════════════════════════╗");
    eprintln!("║  Market ABM                                      ║");
    eprintln!("╠══════════════════════════════════════════════════╣");
    eprintln!(
        "║  Demo: {:>4} ticks, {:>2} consumers, {:>2} producers   ║",
        config.demo_ticks, config.demo_consumers, config.demo_producers
    );
    eprintln!(
        "║  Benchmark: {:>9} orders, seed {:<12?}  ║",
        config.num_orders, config.seed
    );
    eprintln!("╚══════════════════════════════════════════════════╝");
}

/// A handful of consumers bidding against a couple of producers.
fn run_demo_simulation(config: &BenchConfig) {
    let mut sim = Simulation::new();

    for i in 0..config.demo_consumers {
        sim.add_agent(Box::new(Consumer::new(ConsumerConfig {
            asset: DEMO_ASSET.to_string(),
            max_price: Price(100),
            // Stagger appetites so bids spread out over time.
            ticks_until_half_hunger: 5 + i as u64 * 3,
        })));
    }
    for _ in 0..config.demo_producers {
        sim.add_agent(Box::new(Producer::new(ProducerConfig {
            asset: DEMO_ASSET.to_string(),
            preferred_price: Price(50),
        })));
    }

    let started = Instant::now();
    sim.run(config.demo_ticks);
    let stats = sim.stats();

    println!("Demo simulation: {} ticks in {:?}", stats.tick, started.elapsed());
    println!("  Orders placed:  {}", stats.total_orders);
    println!("  Orders refused: {}", stats.rejected_orders);
    println!("  Cancels:        {}", stats.total_cancels);
    println!("  Matches routed: {}", stats.total_matches);
}

/// Pound a single matcher with random order flow.
fn run_matcher_benchmark(config: &BenchConfig) {
    let mut notifier = InMemoryNotifier::new();
    let mut matcher = Matcher::new();
    let mut factory = OrderFactory::new(config);

    println!("Generating {} orders...", config.num_orders);
    let orders: Vec<Order> = (0..config.num_orders)
        .map(|_| factory.next_order())
        .collect();

    println!("Running benchmark...");
    let started = Instant::now();
    let mut last_print = Instant::now();

    for (processed, order) in orders.into_iter().enumerate() {
        let _ = matcher.add_order(order, true, &mut notifier);

        if last_print.elapsed() >= Duration::from_secs(1) {
            let counts = matcher.order_counts();
            let spread = matcher.spread();
            println!(
                "{} orders | resting MARKET:{} LIMIT:{} STOP:{} STOPLIMIT:{} | matches:{} | bid:{:?} ask:{:?}",
                processed + 1,
                counts.market,
                counts.limit,
                counts.stop,
                counts.stop_limit,
                notifier.matches.len(),
                spread.highest_bid,
                spread.lowest_ask,
            );
            last_print = Instant::now();
        }
    }

    let elapsed = started.elapsed();
    let per_sec = config.num_orders as f64 / elapsed.as_secs_f64();

    println!("Done in {:?} ({:.0} orders/sec)", elapsed, per_sec);
    println!("  Matches found:   {}", notifier.matches.len());
    println!("  Orders rejected: {}", notifier.placement_failed_orders.len());
    println!("  Final book:      {:?}", matcher.order_counts());
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .init();

    // Default configuration
    let config = BenchConfig::default();

    // Or use a preset:
    // let config = BenchConfig::smoke();       // quick sanity run
    // let config = BenchConfig::deep_book();   // limit-heavy flow
    // let config = BenchConfig::stop_heavy();  // exercises stop arming

    print_banner(&config);
    run_demo_simulation(&config);
    run_matcher_benchmark(&config);
}
