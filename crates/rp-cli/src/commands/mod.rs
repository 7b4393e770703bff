pub mod inspect;
pub mod run;
pub mod simulate;

use rp_core::{Country, CountryId, CountryStore};
use rp_simulation::{SimConfig, Simulation};

/// Build a simulation and populate it with `countries` generated countries.
fn generated(config: SimConfig, countries: usize) -> Result<Simulation, String> {
    let mut sim = Simulation::new(config);
    sim.generate(countries)
        .map_err(|e| format!("cannot generate countries: {e}"))?;
    Ok(sim)
}

/// Resolve a country name (case-insensitive) to its ID.
fn country_id(store: &CountryStore, name: &str) -> Result<CountryId, String> {
    store
        .find_by_name(name)
        .map(|c| c.id)
        .ok_or_else(|| format!("unknown country: '{name}'"))
}

/// Format a treasury balance with thousands separators.
fn money(amount: f64) -> String {
    let whole = amount.round() as i64;
    let digits = whole.unsigned_abs().to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3 + 1);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    if whole < 0 {
        format!("-{out}")
    } else {
        out
    }
}

/// Active wars / all wars, e.g. `1/3`. A war frozen by the enemy's
/// annihilation no longer counts as active.
fn war_tally(store: &CountryStore, country: &Country) -> String {
    format!(
        "{}/{}",
        store.live_war_enemies(country.id).len(),
        country.wars.len()
    )
}
