/// Formats a population count the way the table column displays it.
///
/// Millions and thousands are abbreviated to one decimal place; smaller
/// values render as plain digits.
pub fn format_population(population: u64) -> String {
    if population >= 1_000_000 {
        format!("{:.1}M", population as f64 / 1_000_000.0)
    } else if population >= 1_000 {
        format!("{:.1}K", population as f64 / 1_000.0)
    } else {
        population.to_string()
    }
}

/// Formats the headline total, which always renders in millions.
pub fn format_total_population(total: u64) -> String {
    format!("{:.1}M", total as f64 / 1_000_000.0)
}
