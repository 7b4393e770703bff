use colored::Colorize;
use comfy_table::{ContentArrangement, Table};

use rp_core::WarOutcome;
use rp_simulation::{LootPolicy, SimConfig, SimEventKind};

pub fn run(
    countries: usize,
    ticks: u64,
    seed: u64,
    verbose: bool,
    loot: LootPolicy,
) -> Result<(), String> {
    let config = SimConfig::default()
        .with_seed(seed)
        .with_loot_policy(loot);
    let mut sim = super::generated(config, countries)?;
    sim.run(ticks)
        .map_err(|e| format!("simulation error: {e}"))?;

    // Header
    println!(
        "  {} {}",
        "Simulation".bold(),
        format!("({ticks} ticks, seed={seed}, loot={loot})").dimmed()
    );
    println!(
        "  {} countries simulated, {} events logged",
        sim.store().len(),
        sim.events().len()
    );
    println!();

    let events = sim.events();
    if verbose {
        println!("  {}", "Event Log".bold().underline());
        println!();
        for event in events.events() {
            let tick_label = format!("[tick {:>3}]", event.tick).dimmed();
            let desc = colorize_event(&event.kind, &event.description);
            println!("  {tick_label} {desc}");
        }
        println!();
    } else {
        let notable: Vec<_> = events
            .events()
            .iter()
            .filter(|e| {
                matches!(
                    e.kind,
                    SimEventKind::WarDeclared { .. }
                        | SimEventKind::WarResolved { .. }
                        | SimEventKind::CountryAnnihilated { .. }
                )
            })
            .collect();

        if !notable.is_empty() {
            println!("  {}", "Notable Events".bold().underline());
            for event in notable {
                let label = match &event.kind {
                    SimEventKind::WarDeclared { .. } => "WAR".red().bold(),
                    SimEventKind::CountryAnnihilated { .. } => "FALL".red().bold(),
                    _ => "END".yellow().bold(),
                };
                let tick_label = format!("[tick {:>3}]", event.tick).dimmed();
                println!("  {tick_label} {label}  {}", event.description);
            }
            println!();
        }
    }

    let produced: u64 = events
        .events()
        .iter()
        .map(|e| match e.kind {
            SimEventKind::EquipmentProduced { units, .. } => u64::from(units),
            _ => 0,
        })
        .sum();
    println!(
        "  {} wars declared, {} resolved, {} countries annihilated, {} units produced",
        events.count_where(|k| matches!(k, SimEventKind::WarDeclared { .. })),
        events.count_where(|k| matches!(k, SimEventKind::WarResolved { .. })),
        events.count_where(|k| matches!(k, SimEventKind::CountryAnnihilated { .. })),
        produced
    );
    println!();

    // Country status table
    println!("  {}", "Country Status".bold().underline());
    println!();

    let mut table = Table::new();
    table.set_content_arrangement(ContentArrangement::Dynamic);
    table.set_header(vec![
        "Country", "Ideology", "Economy", "Power", "Units", "Wars", "Status",
    ]);

    let store = sim.store();
    for country in store.iter() {
        let status = if country.is_annihilated {
            "ANNIHILATED".red().bold().to_string()
        } else if store.live_war_enemies(country.id).is_empty() {
            "at peace".green().to_string()
        } else {
            "at war".yellow().to_string()
        };
        table.add_row(vec![
            country.name.clone(),
            country.ideology.to_string(),
            super::money(country.economy),
            country.military_power().to_string(),
            country.military_equipment.total_units().to_string(),
            super::war_tally(store, country),
            status,
        ]);
    }

    println!("{table}");
    println!();

    Ok(())
}

fn colorize_event(kind: &SimEventKind, description: &str) -> colored::ColoredString {
    match kind {
        SimEventKind::WarDeclared { .. } => description.red(),
        SimEventKind::WarResolved {
            outcome: WarOutcome::Peace,
            ..
        } => description.green(),
        SimEventKind::WarResolved { .. } => description.yellow(),
        SimEventKind::CountryAnnihilated { .. } => description.red().bold(),
        SimEventKind::EquipmentProduced { .. } => description.normal(),
        SimEventKind::FundsAdded { .. } => description.cyan(),
        SimEventKind::Generated { .. } => description.blue(),
    }
}
