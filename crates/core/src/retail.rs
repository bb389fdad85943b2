use serde::{Deserialize, Deserializer, Serialize};

use crate::CoreError;

pub type InvoiceNo = String;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Position {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stock_code: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Negative for returned goods.
    pub quantity: f64,
    pub unit_price: f64,
}

impl Position {
    pub fn total(&self) -> f64 {
        self.quantity * self.unit_price
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Order {
    #[serde(deserialize_with = "invoice_no_from_text_or_number")]
    pub invoice_no: InvoiceNo,
    pub country: String,
    #[serde(default)]
    pub positions: Vec<Position>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub customer_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub invoice_date: Option<String>,
}

impl Order {
    /// Parses one order document. `key` is only used to label the error.
    pub fn from_json(key: &str, value: &str) -> Result<Self, CoreError> {
        serde_json::from_str(value).map_err(|e| CoreError::malformed(key, e))
    }

    /// Sum of position totals; `0.0` (never `-0.0`) without positions.
    pub fn total(&self) -> f64 {
        self.positions.iter().map(Position::total).fold(0.0, |acc, t| acc + t)
    }
}

/// Invoice numbers show up both quoted and as bare JSON numbers.
fn invoice_no_from_text_or_number<'de, D>(deserializer: D) -> Result<InvoiceNo, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum RawInvoiceNo {
        Text(String),
        Number(serde_json::Number),
    }

    Ok(match RawInvoiceNo::deserialize(deserializer)? {
        RawInvoiceNo::Text(text) => text,
        RawInvoiceNo::Number(number) => number.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    const LINE: &str = r#"{
        "invoice_no": "536365",
        "country": "United Kingdom",
        "customer_id": "17850",
        "positions": [
            {"stock_code": "85123A", "description": "WHITE HANGING HEART",
             "quantity": 6, "unit_price": 2.55},
            {"stock_code": "71053", "quantity": 6, "unit_price": 3.39, "extra": true}
        ]}"#;

    #[test]
    fn parses_order_and_sums_positions() {
        let order = Order::from_json("536365", LINE).unwrap();
        assert_eq!(order.invoice_no, "536365");
        assert_eq!(order.country, "United Kingdom");
        assert_eq!(order.positions.len(), 2);
        assert!((order.total() - (6.0 * 2.55 + 6.0 * 3.39)).abs() < 1e-9);
    }

    #[test]
    fn returns_reduce_the_total() {
        let order = Order {
            invoice_no: "C1".into(),
            country: "France".into(),
            positions: vec![
                Position {
                    stock_code: None,
                    description: None,
                    quantity: 2.0,
                    unit_price: 5.0,
                },
                Position {
                    stock_code: None,
                    description: None,
                    quantity: -1.0,
                    unit_price: 5.0,
                },
            ],
            customer_id: None,
            invoice_date: None,
        };
        assert_eq!(order.total(), 5.0);
    }

    #[test]
    fn order_without_positions_totals_zero() {
        let order = Order::from_json("1", r#"{"invoice_no": "1", "country": "Spain"}"#).unwrap();
        assert_eq!(order.total(), 0.0);
        assert!(order.total().is_sign_positive());
    }

    #[test]
    fn numeric_invoice_no_is_read_as_text() {
        let order = Order::from_json(
            "536366",
            r#"{"invoice_no": 536366, "country": "France", "positions": []}"#,
        )
        .unwrap();
        assert_eq!(order.invoice_no, "536366");
    }

    #[test]
    fn invoice_no_of_other_shapes_is_rejected() {
        let err = Order::from_json("x", r#"{"invoice_no": [1], "country": "France"}"#);
        assert!(matches!(err, Err(CoreError::MalformedRecord { .. })));
    }

    #[test]
    fn malformed_order_names_the_key() {
        let err = Order::from_json("k-1", "{not json").unwrap_err();
        match err {
            CoreError::MalformedRecord { key, .. } => assert_eq!(key, "k-1"),
            other => panic!("unexpected error: {other}"),
        }
    }
}
