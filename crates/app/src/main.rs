mod coordinator;
mod notify;
mod render;

use tracing::info;
use tracing_subscriber::EnvFilter;

use city_manager_core::format::format_total_population;
use city_manager_core::types::CityFormData;
use city_manager_store::CityStore;
use city_manager_util::{load_env_file, AppConfig};

use coordinator::EditCoordinator;
use notify::TracingSink;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    load_env_file();
    let config = AppConfig::from_env()?;
    init_tracing();

    let store = if config.seed_demo_data {
        CityStore::seeded()
    } else {
        CityStore::new()
    };
    let mut manager = EditCoordinator::new(store, TracingSink);

    info!(
        env = config.environment.as_str(),
        cities = manager.store().len(),
        "city manager ready"
    );
    print_overview(&manager);

    // Scripted interaction standing in for a user driving the page.
    manager.open_add_form();
    manager.submit(CityFormData {
        name: "Oslo".to_string(),
        country: "Norway".to_string(),
        population: 700_000,
        timezone: "CET (UTC+1)".to_string(),
    })?;

    if let Some(first) = manager.store().list().first().cloned() {
        manager.open_edit_form(&first.id)?;
        let mut data = first.form_data();
        data.population += 40_000;
        manager.submit(data)?;
    }

    if let Some(last) = manager.store().list().last().map(|city| city.id.clone()) {
        manager.delete_city(&last);
    }

    print_overview(&manager);
    Ok(())
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();
}

fn print_overview(manager: &EditCoordinator<TracingSink>) {
    let store = manager.store();
    println!(
        "{} cities, total population {}",
        store.len(),
        format_total_population(store.total_population())
    );
    print!("{}", render::render_table(store.list()));
}
