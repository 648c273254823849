pub fn mean(data: &[f64]) -> Option<f64> {
    let sum = data.iter().sum::<f64>();
    let count = data.len();

    match count {
        positive if positive > 0 => Some(sum / count as f64),
        _ => None,
    }
}

/// Format a score the way every table and summary shows it.
pub fn two_decimals(value: f64) -> String {
    format!("{value:.2}")
}
