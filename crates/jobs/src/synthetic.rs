//! Deterministic order generator for demos and tests.

use rmr_core::retail::{Order, Position};

const COUNTRIES: [&str; 8] = [
    "United Kingdom",
    "Germany",
    "France",
    "EIRE",
    "Spain",
    "Netherlands",
    "Belgium",
    "Switzerland",
];

const FIRST_INVOICE: usize = 536_365;

/// `count` orders spread over a fixed set of countries, skewed so that
/// every eleventh order is noticeably larger.
pub fn synthetic_orders(count: usize) -> Vec<Order> {
    (0..count)
        .map(|i| {
            let country = COUNTRIES[(i * 7 + i / 13) % COUNTRIES.len()];
            let bonus = if i % 11 == 0 { 20.0 } else { 0.0 };
            let positions = (0..1 + i % 4)
                .map(|p| Position {
                    stock_code: Some(format!("{}", 10_000 + (i * 31 + p) % 90_000)),
                    description: None,
                    quantity: (1 + (i + p) % 6) as f64,
                    unit_price: 1.25 + ((i + p) % 10) as f64 * 0.5 + bonus,
                })
                .collect();
            Order {
                invoice_no: (FIRST_INVOICE + i).to_string(),
                country: country.to_string(),
                positions,
                customer_id: Some((12_000 + i % 50).to_string()),
                invoice_date: None,
            }
        })
        .collect()
}
