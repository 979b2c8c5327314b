// ============================================================================
// Basic Usage Example
// ============================================================================

use market_primitives::events::ListenerError;
use market_primitives::prelude::*;
use serde_json::json;
use std::sync::Arc;

#[tokio::main]
async fn main() {
    #[cfg(feature = "logging")]
    if let Err(err) = market_primitives::init_logging() {
        eprintln!("logging disabled: {err}");
    }

    println!("=== Market Primitives Example ===\n");

    // Exact decimal arithmetic
    let bid: Price = "1.08415".parse().unwrap();
    let ask: Price = "1.08432".parse().unwrap();
    let volume: Volume = "0.37".parse().unwrap();

    let spread = ask.subtract(&bid);
    let mid = bid.add(&ask).divide(&Price::from(2)).unwrap();
    let notional = mid.multiply(&volume);

    println!("Bid:      {}", bid);
    println!("Ask:      {}", ask);
    println!("Spread:   {}", spread);
    println!("Mid:      {}", mid);
    println!("Notional: {} (quoted {})", notional, notional.round_dp(2));
    println!(
        "0.1 + 0.2 == 0.3 ? {}",
        "0.1"
            .parse::<Decimal>()
            .unwrap()
            .add(&"0.2".parse().unwrap())
            .equals(&"0.3".parse().unwrap())
    );

    // Synchronous tick fan-out
    println!("\n=== Tick Listeners ===");
    let emitter = Emitter::with_config(EmitterConfig::new("EURUSD-watcher"));
    let logger = emitter.subscribe_handler(names::TICK, Arc::new(LoggingEventHandler));
    emitter.subscribe(names::TICK, |event| {
        println!("  tick: bid={} ask={}", event.data["bid"], event.data["ask"]);
    });

    let next_close = emitter.wait_for_next(names::PERIOD_CLOSE);
    for (b, a) in [("1.08415", "1.08432"), ("1.08419", "1.08433")] {
        emitter.notify_listeners(names::TICK, payload(json!({"bid": b, "ask": a})));
    }
    emitter.notify_listeners(names::PERIOD_CLOSE, payload(json!({"timeframe": "M1"})));
    let closed = next_close.await.unwrap();
    println!("  period closed at {} ({})", closed.timestamp, closed.data["timeframe"]);
    emitter.unsubscribe(&logger);

    // Awaited order confirmations
    println!("\n=== Order Confirmations ===");
    let account = AsyncEmitter::with_config(
        EmitterConfig::new("account").with_dispatch(DispatchMode::Sequential),
    );
    let balance = Arc::new(parking_lot::Mutex::new(Money::from(1_000)));
    let b = Arc::clone(&balance);
    account.subscribe(names::ORDER_FILLED, move |event| {
        let b = Arc::clone(&b);
        async move {
            let cost: Money = event
                .get("cost")
                .and_then(|v| v.as_str())
                .ok_or("fill without cost")?
                .parse()?;
            let mut balance = b.lock();
            *balance = balance.subtract(&cost);
            Ok::<(), ListenerError>(())
        }
    });

    account
        .notify_listeners(names::ORDER_FILLED, payload(json!({"cost": notional.to_string()})))
        .await
        .unwrap();
    println!("  balance after fill: {}", balance.lock());
}
