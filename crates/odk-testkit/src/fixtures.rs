//! Fixture data. Always passed in explicitly; nothing here is global state.

use odk_basket::{LineItem, StockStatus};

/// A small wholesale order list: one untouched line, one pre-filled line,
/// one with limited stock and one out of stock.
pub fn sample_lines() -> Vec<LineItem> {
    vec![
        LineItem::new("RICE-10KG", "Long grain rice 10kg", 1_899),
        LineItem::new("OIL-5L", "Sunflower oil 5L", 1_149).with_quantity(2),
        LineItem::new("TUNA-48", "Tuna chunks 48x160g", 6_499)
            .with_stock(StockStatus::Limited { available: 5 }),
        LineItem::new("SALT-25KG", "Sea salt 25kg", 1_299).with_stock(StockStatus::OutOfStock),
    ]
}

pub const BASE_CONFIG_YAML: &str = r#"
quantity:
  min: 0
  max: 999
logging:
  filter: info
"#;
