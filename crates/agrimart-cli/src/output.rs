//! Output renderers and formatting helpers for CLI commands.

use agrimart_api_models::{Order, Product, UserRecord};
use anyhow::anyhow;
use serde::Serialize;

use crate::cli::OutputFormat;
use crate::client::{CliError, CliResult};

/// Security banner shown once a protected command is admitted.
pub(crate) fn banner(user: &UserRecord) -> String {
    format!("Secure Access · {} ({})", user.name, user.role)
}

/// Print the banner; JSON output keeps stdout machine-readable.
pub(crate) fn render_banner(user: &UserRecord, format: OutputFormat) {
    match format {
        OutputFormat::Table => println!("{}", banner(user)),
        OutputFormat::Json => eprintln!("{}", banner(user)),
    }
}

fn print_json<T: Serialize + ?Sized>(value: &T) -> CliResult<()> {
    let text = serde_json::to_string_pretty(value)
        .map_err(|err| CliError::failure(anyhow!("failed to format JSON: {err}")))?;
    println!("{text}");
    Ok(())
}

pub(crate) fn render_user(user: &UserRecord, format: OutputFormat) -> CliResult<()> {
    match format {
        OutputFormat::Json => print_json(user)?,
        OutputFormat::Table => {
            println!("user id: {}", user.user_id);
            println!("username: {}", user.username);
            println!("name: {}", user.name);
            println!("role: {}", user.role);
        }
    }
    Ok(())
}

pub(crate) fn render_product_list(products: &[Product], format: OutputFormat) -> CliResult<()> {
    match format {
        OutputFormat::Json => print_json(products)?,
        OutputFormat::Table => {
            println!(
                "{:<26} {:<16} {:>10} {:>6} {:<5} NAME",
                "ID", "CATEGORY", "PRICE", "DISC", "STOCK"
            );
            for product in products {
                println!(
                    "{:<26} {:<16} {:>10} {:>5.0}% {:<5} {}",
                    product.id,
                    product.category,
                    format_amount(product.price),
                    product.discount,
                    if product.in_stock { "yes" } else { "no" },
                    product.name
                );
            }
            println!("{} product(s)", products.len());
        }
    }
    Ok(())
}

pub(crate) fn render_order_list(orders: &[Order], format: OutputFormat) -> CliResult<()> {
    match format {
        OutputFormat::Json => print_json(orders)?,
        OutputFormat::Table => {
            println!(
                "{:<26} {:<20} {:<12} {:>10} {:>10} {:<18} {:<10} DELIVERY",
                "ID", "CUSTOMER", "PHONE", "AMOUNT", "BALANCE", "PAYMENT", "STATUS"
            );
            for order in orders {
                println!(
                    "{:<26} {:<20} {:<12} {:>10} {:>10} {:<18} {:<10} {}",
                    order.id,
                    order.customer_name,
                    order.customer_phone,
                    format_amount(order.amount),
                    format_amount(order.balance_amount),
                    order.payment_status,
                    if order.status.is_empty() {
                        "-"
                    } else {
                        order.status.as_str()
                    },
                    order.expected_delivery_date.as_deref().unwrap_or("-")
                );
            }
            println!("{} order(s)", orders.len());
        }
    }
    Ok(())
}

/// Rupee amount with two decimals.
pub(crate) fn format_amount(value: f64) -> String {
    format!("₹{value:.2}")
}

#[cfg(test)]
mod tests {
    use super::*;
    use agrimart_api_models::Role;

    #[test]
    fn banner_shows_name_and_role() {
        let user = UserRecord {
            user_id: "1".into(),
            username: "ops".into(),
            role: Role::Designer,
            name: "Asha".into(),
        };
        assert_eq!(banner(&user), "Secure Access · Asha (designer)");
    }

    #[test]
    fn amounts_use_two_decimals() {
        assert_eq!(format_amount(1499.5), "₹1499.50");
        assert_eq!(format_amount(0.0), "₹0.00");
    }
}
