use colored::Colorize;
use comfy_table::{ContentArrangement, Table};

use rp_simulation::SimConfig;

pub fn run(countries: usize, seed: u64, json: bool) -> Result<(), String> {
    let sim = super::generated(SimConfig::default().with_seed(seed), countries)?;
    let store = sim.store();

    if json {
        let out = serde_json::to_string_pretty(store.list())
            .map_err(|e| format!("cannot encode countries: {e}"))?;
        println!("{out}");
        return Ok(());
    }

    println!(
        "  {} {}",
        "World".bold(),
        format!("({} countries, seed={seed})", store.len()).dimmed()
    );
    println!();

    let mut table = Table::new();
    table.set_content_arrangement(ContentArrangement::Dynamic);
    table.set_header(vec![
        "Country", "Ideology", "Leader", "Economy", "Power", "Stockpile", "Scarce",
    ]);

    for country in store.iter() {
        let scarce: Vec<String> = country
            .resources
            .iter()
            .filter(|(r, amount)| r.is_scarce() && *amount > 0)
            .map(|(r, amount)| format!("{r} {amount}"))
            .collect();
        table.add_row(vec![
            country.name.clone(),
            country.ideology.to_string(),
            country.leader.clone(),
            super::money(country.economy),
            country.military_power().to_string(),
            country.resources.total().to_string(),
            scarce.join(", "),
        ]);
    }
    println!("{table}");
    println!();

    // Relations
    println!("  {}", "Relations".bold().underline());
    for country in store.iter() {
        let line: Vec<String> = country
            .relations
            .iter()
            .map(|(other, rel)| {
                format!(
                    "{} {} ({:.0})",
                    store.name_of(*other),
                    rel.status,
                    rel.strength
                )
            })
            .collect();
        println!("  {}: {}", country.name.bold(), line.join(", "));
    }
    println!();

    Ok(())
}
