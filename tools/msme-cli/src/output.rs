//! Output formatting for the CLI.

use console::style;
use msme_commerce::cart::{CartItem, CartPricing};

/// Output handler for CLI messages.
#[derive(Clone)]
pub struct Output {
    json: bool,
}

impl Output {
    /// Create a new output handler.
    pub fn new(json: bool) -> Self {
        Self { json }
    }

    /// Print an info message.
    pub fn info(&self, msg: &str) {
        if self.json {
            return;
        }
        println!("{} {}", style("ℹ").blue(), msg);
    }

    /// Print a success message.
    pub fn success(&self, msg: &str) {
        if self.json {
            return;
        }
        println!("{} {}", style("✓").green(), msg);
    }

    /// Print a warning message.
    pub fn warn(&self, msg: &str) {
        if self.json {
            return;
        }
        eprintln!("{} {}", style("⚠").yellow(), msg);
    }

    /// Print an error message.
    pub fn error(&self, msg: &str) {
        if self.json {
            eprintln!("{}", serde_json::json!({ "error": msg }));
            return;
        }
        eprintln!("{} {}", style("✗").red(), style(msg).red());
    }

    /// Print a header/title.
    pub fn header(&self, msg: &str) {
        if self.json {
            return;
        }
        println!("\n{}", style(msg).bold().underlined());
    }

    /// Print JSON output.
    pub fn json<T: serde::Serialize>(&self, value: &T) {
        if let Ok(json) = serde_json::to_string_pretty(value) {
            println!("{}", json);
        }
    }

    /// Print a key-value pair.
    pub fn kv(&self, key: &str, value: &str) {
        if self.json {
            return;
        }
        println!("  {}: {}", style(key).dim(), value);
    }

    /// Print a table row.
    pub fn table_row(&self, cols: &[&str], widths: &[usize]) {
        if self.json {
            return;
        }
        let formatted: Vec<String> = cols
            .iter()
            .zip(widths.iter())
            .map(|(col, width)| format!("{:width$}", col, width = width))
            .collect();
        println!("  {}", formatted.join("  "));
    }

    /// Print cart rows as a table.
    pub fn cart_table(&self, items: &[CartItem]) {
        const WIDTHS: [usize; 6] = [8, 12, 28, 6, 12, 12];

        self.table_row(&["TYPE", "ID", "NAME", "QTY", "PRICE", "LINE"], &WIDTHS);
        for item in items {
            let quantity = item.quantity.to_string();
            let price = item.price.display();
            let line = item.line_total().display();
            self.table_row(
                &[
                    item.item_type.as_str(),
                    item.id.as_str(),
                    &item.name,
                    &quantity,
                    &price,
                    &line,
                ],
                &WIDTHS,
            );
        }
    }

    /// Print a pricing summary.
    pub fn pricing(&self, pricing: &CartPricing) {
        self.kv("Subtotal", &pricing.subtotal.display());
        if pricing.savings.is_positive() {
            self.kv("You save (MRP)", &pricing.savings.display());
        }
        if let Some(discount) = &pricing.discount {
            self.kv(
                &format!("Coupon {}", discount.code),
                &format!("-{}", discount.amount.display()),
            );
        }
        self.kv(
            &format!("GST ({}%)", pricing.gst_percentage()),
            &pricing.gst_total.display(),
        );
        self.kv("Total", &style(pricing.grand_total.display()).bold().to_string());
    }

    /// Check if JSON mode is enabled.
    pub fn is_json(&self) -> bool {
        self.json
    }
}
