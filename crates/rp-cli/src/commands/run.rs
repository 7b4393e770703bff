use std::time::Duration;

use colored::Colorize;
use tokio::time;

use rp_core::{CountryId, CountryStore};
use rp_simulation::{
    ChannelObserver, CountryList, OutboundMessage, Scheduler, SimConfig, SubscriptionRegistry,
};

/// Arguments of `rp run`.
pub struct RunOptions {
    /// Countries to generate.
    pub countries: usize,
    /// RNG seed.
    pub seed: u64,
    /// Wall-clock run time.
    pub seconds: u64,
    /// Tick period in milliseconds.
    pub interval_ms: u64,
    /// Country whose per-tick updates are streamed.
    pub follow: Option<String>,
    /// `ATTACKER:DEFENDER` pairs declared at start-up.
    pub wars: Vec<String>,
    /// `NAME=AMOUNT` credits applied before the clock starts.
    pub funds: Vec<String>,
}

pub fn run(opts: &RunOptions) -> Result<(), String> {
    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .map_err(|e| format!("cannot start runtime: {e}"))?;
    runtime.block_on(stream(opts))
}

async fn stream(opts: &RunOptions) -> Result<(), String> {
    let registry = SubscriptionRegistry::new();
    let config = SimConfig::default()
        .with_seed(opts.seed)
        .with_tick_interval(Duration::from_millis(opts.interval_ms));
    let sim = super::generated(config, opts.countries)?.with_sink(registry.clone());

    // Validate admin input before the clock starts.
    let store = sim.store();
    let followed = opts
        .follow
        .as_deref()
        .map(|name| super::country_id(store, name))
        .transpose()?;
    let wars = opts
        .wars
        .iter()
        .map(|arg| parse_war(store, arg))
        .collect::<Result<Vec<_>, _>>()?;
    let funds = opts
        .funds
        .iter()
        .map(|arg| parse_fund(store, arg))
        .collect::<Result<Vec<_>, _>>()?;

    // Global events reach every observer; per-tick updates need a subscription.
    let (observer, mut rx) = ChannelObserver::channel();
    let observer_id = registry.register(observer);
    if let Some(id) = followed {
        registry.subscribe(observer_id, id);
    }

    let list = OutboundMessage::List(CountryList::from_countries(store.iter()))
        .to_json()
        .map_err(|e| format!("cannot encode country list: {e}"))?;
    println!("{list}");

    let mut scheduler = Scheduler::new(sim);
    for (id, amount) in funds {
        scheduler
            .add_funds(id, amount)
            .await
            .map_err(|e| format!("cannot add funds: {e}"))?;
    }
    scheduler.start();
    for (attacker, defender) in wars {
        scheduler
            .declare_war(attacker, defender)
            .await
            .map_err(|e| format!("cannot declare war: {e}"))?;
    }

    let deadline = time::sleep(Duration::from_secs(opts.seconds));
    tokio::pin!(deadline);
    loop {
        tokio::select! {
            () = &mut deadline => break,
            Some(line) = rx.recv() => println!("{line}"),
        }
    }

    let ticks = scheduler.current_tick().await;
    scheduler.stop().await;
    while let Ok(line) = rx.try_recv() {
        println!("{line}");
    }
    registry.remove_observer(observer_id);

    eprintln!("  {} after {ticks} ticks", "Stopped".bold());
    Ok(())
}

/// `ATTACKER:DEFENDER` by country name.
fn parse_war(store: &CountryStore, arg: &str) -> Result<(CountryId, CountryId), String> {
    let (attacker, defender) = arg
        .split_once(':')
        .ok_or_else(|| format!("expected ATTACKER:DEFENDER, got '{arg}'"))?;
    Ok((
        super::country_id(store, attacker.trim())?,
        super::country_id(store, defender.trim())?,
    ))
}

/// `NAME=AMOUNT`, where the amount may be negative.
fn parse_fund(store: &CountryStore, arg: &str) -> Result<(CountryId, f64), String> {
    let (name, amount) = arg
        .split_once('=')
        .ok_or_else(|| format!("expected NAME=AMOUNT, got '{arg}'"))?;
    let amount: f64 = amount
        .trim()
        .parse()
        .map_err(|_| format!("invalid amount '{}'", amount.trim()))?;
    Ok((super::country_id(store, name.trim())?, amount))
}
