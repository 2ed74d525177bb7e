use std::time::Instant;
use tracing::info;

/// Logs how long a labelled step took when dropped.
pub struct Timer {
    label: String,
    start: Instant,
}

impl Timer {
    pub fn start(label: impl Into<String>) -> Self {
        let label = label.into();
        info!("⏱  Starting: {}", label);
        Self {
            label,
            start: Instant::now(),
        }
    }
}

impl Drop for Timer {
    fn drop(&mut self) {
        info!(
            "⏱  Finished: {} (took {:.2?})",
            self.label,
            self.start.elapsed()
        );
    }
}

/// Group digits Swedish style, with a space every three digits.
pub fn fmt_number(n: i64) -> String {
    let digits = n.unsigned_abs().to_string();
    let mut grouped = String::new();
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(' ');
        }
        grouped.push(ch);
    }
    if n < 0 { format!("-{grouped}") } else { grouped }
}

/// "123,45 SEK" | "—" when the sheet had no price.
pub fn fmt_price(price: Option<f64>, currency: Option<&str>) -> String {
    match price {
        None => "—".to_string(),
        Some(p) => {
            let amount = format!("{:.2}", p).replace('.', ",");
            match currency {
                Some(c) => format!("{amount} {c}"),
                None => amount,
            }
        }
    }
}
