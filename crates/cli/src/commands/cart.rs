//! Cart commands: show, count, set, remove, clear.

use std::io::Write;

use askama::Template;
use tracing::instrument;

use shopease_core::ProductId;
use shopease_storefront::error::{AppError, add_breadcrumb};
use shopease_storefront::state::Storefront;
use shopease_storefront::views::{CartBadge, CartShowTemplate, CartView};

/// Show the cart page.
///
/// # Errors
///
/// Returns an error if output cannot be written.
pub fn show(storefront: &Storefront, out: &mut impl Write) -> Result<(), AppError> {
    let page = CartShowTemplate {
        cart: CartView::from(&storefront.cart().snapshot()),
    };
    writeln!(out, "{}", page.render()?)?;
    Ok(())
}

/// Show the cart badge.
///
/// # Errors
///
/// Returns an error if output cannot be written.
pub fn count(storefront: &Storefront, out: &mut impl Write) -> Result<(), AppError> {
    let badge = CartBadge {
        count: storefront.cart().count(),
    };
    writeln!(out, "{}", badge.render()?)?;
    Ok(())
}

/// Replace a line's quantity, then show the cart.
///
/// # Errors
///
/// Returns `AppError::NotFound` if the cart has no such line.
#[instrument(skip(storefront, out))]
pub fn set(
    storefront: &Storefront,
    id: ProductId,
    variant: Option<&str>,
    quantity: i64,
    out: &mut impl Write,
) -> Result<(), AppError> {
    if !storefront.cart().set_quantity(id, variant, quantity) {
        return Err(line_not_found(id, variant));
    }
    show(storefront, out)
}

/// Remove a line, then show the cart.
///
/// # Errors
///
/// Returns `AppError::NotFound` if the cart has no such line.
#[instrument(skip(storefront, out))]
pub fn remove(
    storefront: &Storefront,
    id: ProductId,
    variant: Option<&str>,
    out: &mut impl Write,
) -> Result<(), AppError> {
    if !storefront.cart().remove_line(id, variant) {
        return Err(line_not_found(id, variant));
    }
    show(storefront, out)
}

/// Return all held stock to the catalog and empty the cart.
///
/// # Errors
///
/// Returns an error if output cannot be written. Failed releases are
/// reported in the output.
#[instrument(skip_all)]
pub async fn clear(storefront: &Storefront, out: &mut impl Write) -> Result<(), AppError> {
    let report = storefront.cart().clear(storefront.catalog()).await;
    add_breadcrumb("cart", "Cleared cart", None);

    if report.failed > 0 {
        writeln!(
            out,
            "Cart cleared ({} of {} lines could not be returned to stock)",
            report.failed,
            report.released + report.failed
        )?;
    } else {
        writeln!(out, "Cart cleared")?;
    }
    count(storefront, out)
}

fn line_not_found(id: ProductId, variant: Option<&str>) -> AppError {
    match variant {
        Some(variant) => AppError::NotFound(format!("cart line for product {id} ({variant})")),
        None => AppError::NotFound(format!("cart line for product {id}")),
    }
}
