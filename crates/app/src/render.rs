use city_manager_core::format::format_population;
use city_manager_core::types::City;

/// Plain-text stand-in for the table view collaborator.
pub fn render_table(cities: &[City]) -> String {
    if cities.is_empty() {
        return "No cities yet. Add your first city to get started.\n".to_string();
    }

    let mut out = String::new();
    out.push_str(&format!(
        "{:<20} {:<18} {:>12}  {:<14}\n",
        "City", "Country", "Population", "Timezone"
    ));
    for city in cities {
        out.push_str(&format!(
            "{:<20} {:<18} {:>12}  {:<14}\n",
            city.name,
            city.country,
            format_population(city.population),
            city.timezone
        ));
    }
    out
}
