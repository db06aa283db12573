//! Checkout business logic - order summary text and the WhatsApp handoff.
//!
//! Checkout does not process payments. It validates the contact form,
//! renders the cart into a plain-text order summary, and hands back a
//! prefilled `wa.me` deep link for the UI to open. Nothing is awaited or
//! parsed from the messaging side.

use crate::config::store::StoreConfig;
use crate::core::cart::{CartEntry, CartService};
use crate::core::notifications::{NotificationKind, Notifier};
use crate::errors::{Error, Result};
use percent_encoding::{NON_ALPHANUMERIC, utf8_percent_encode};

/// Customer contact fields collected by the checkout form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CustomerInfo {
    /// Customer name, at least two characters
    pub name: String,
    /// Contact email
    pub email: String,
    /// Contact phone, at least ten digits
    pub phone: String,
}

/// Validates the checkout form.
pub fn validate_customer(customer: &CustomerInfo) -> Result<()> {
    if customer.name.trim().chars().count() < 2 {
        return Err(Error::Validation {
            message: "Name must have at least 2 characters".to_string(),
        });
    }

    let email = customer.email.trim();
    let valid_email = email
        .split_once('@')
        .is_some_and(|(local, domain)| !local.is_empty() && domain.contains('.'));
    if !valid_email {
        return Err(Error::Validation {
            message: "Email address is invalid".to_string(),
        });
    }

    let digits = customer.phone.chars().filter(char::is_ascii_digit).count();
    if digits < 10 {
        return Err(Error::Validation {
            message: "Phone number is invalid".to_string(),
        });
    }

    Ok(())
}

/// Formats a BRL amount with a comma decimal separator, e.g. `R$ 12,34`.
#[must_use]
pub fn format_brl(value: f64) -> String {
    format!("R$ {value:.2}").replace('.', ",")
}

/// Renders the cart into the plain-text order summary sent through the
/// messaging link: header, customer name and email, one line per item,
/// and the total.
#[must_use]
pub fn order_message(
    store_name: &str,
    customer: &CustomerInfo,
    items: &[CartEntry],
    total: f64,
) -> String {
    let products = items
        .iter()
        .map(|item| {
            let line_total = item.product.price * f64::from(item.quantity);
            format!(
                "- {} - Qtd: {} - {}",
                item.product.name,
                item.quantity,
                format_brl(line_total)
            )
        })
        .collect::<Vec<_>>()
        .join("\n");

    format!(
        "🛒 NOVO PEDIDO - {store_name}\n👤 Cliente: {}\n📧 Email: {}\n📦 PRODUTOS:\n{products}\n💰 TOTAL: {}\n---\nPedido via {store_name}",
        customer.name,
        customer.email,
        format_brl(total)
    )
}

/// Builds the prefilled `wa.me` deep link for `message`.
#[must_use]
pub fn whatsapp_url(number: &str, message: &str) -> String {
    let encoded = utf8_percent_encode(message, NON_ALPHANUMERIC);
    format!("https://wa.me/{number}?text={encoded}")
}

/// Runs the checkout handoff: validates the form, builds the summary from
/// the live cart, clears the cart, raises the confirmation toast, and
/// returns the link for the caller to open.
pub async fn place_whatsapp_order(
    cart: &mut CartService,
    notifier: &Notifier,
    store: &StoreConfig,
    customer: &CustomerInfo,
) -> Result<String> {
    validate_customer(customer)?;
    if cart.items().is_empty() {
        return Err(Error::Validation {
            message: "Cart is empty".to_string(),
        });
    }

    let message = order_message(&store.name, customer, cart.items(), cart.total());
    let url = whatsapp_url(&store.whatsapp_number, &message);

    cart.clear_cart().await?;
    notifier.notify(
        NotificationKind::Success,
        "Order sent",
        "Your order was sent via WhatsApp. We will be in touch shortly",
    );

    Ok(url)
}
