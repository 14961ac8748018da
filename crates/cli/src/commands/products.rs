//! Product commands: list, show, add to cart.

use std::io::Write;

use askama::Template;
use tracing::instrument;

use shopease_core::{ProductId, requested_quantity};
use shopease_storefront::error::AppError;
use shopease_storefront::services::{AddOutcome, Blocked, ProductCard};
use shopease_storefront::state::Storefront;
use shopease_storefront::views::{CartBadge, ProductShowTemplate, ProductsIndexTemplate};

/// List products, optionally filtered by category.
///
/// # Errors
///
/// Returns an error if the catalog request fails or output cannot be written.
#[instrument(skip(storefront, out))]
pub async fn list(
    storefront: &Storefront,
    category: Option<&str>,
    out: &mut impl Write,
) -> Result<(), AppError> {
    let products = storefront.catalog().list_products(category).await?;
    let cards: Vec<ProductCard> = products.into_iter().map(ProductCard::from).collect();

    let page = ProductsIndexTemplate::new(&cards, storefront.cart().count());
    writeln!(out, "{}", page.render()?)?;
    Ok(())
}

/// Show one product.
///
/// # Errors
///
/// Returns an error if the product does not exist, the request fails or
/// output cannot be written.
#[instrument(skip(storefront, out))]
pub async fn show(storefront: &Storefront, id: ProductId, out: &mut impl Write) -> Result<(), AppError> {
    let detail = storefront.catalog().get_product(id).await?;
    let description = detail.description.clone();
    let card = ProductCard::from(detail);

    let page = ProductShowTemplate::new(&card, description.as_deref());
    writeln!(out, "{}", page.render()?)?;
    Ok(())
}

/// Reserve `quantity` units of a product, one at a time, adding each to the
/// cart. Stops at the first unit the catalog does not hand out.
///
/// # Errors
///
/// Returns an error if the product cannot be loaded, the variant is not
/// offered, or output cannot be written. Reservation failures are reported
/// in the output, not as errors.
#[instrument(skip(storefront, out))]
pub async fn add(
    storefront: &Storefront,
    id: ProductId,
    variant: Option<&str>,
    quantity: f64,
    out: &mut impl Write,
) -> Result<(), AppError> {
    let detail = storefront.catalog().get_product(id).await?;
    let mut card = ProductCard::from(detail);
    if let Some(variant) = variant {
        card.select_variant(variant)?;
    }

    let wanted = requested_quantity(quantity);
    let mut added = 0_i64;
    let mut last = None;
    while added < wanted {
        let outcome = card
            .add_to_cart(storefront.catalog(), storefront.cart())
            .await;
        last = Some(outcome);
        if !matches!(outcome, AddOutcome::Added { .. }) {
            break;
        }
        added += 1;
    }

    let name = &card.product().name;
    match last {
        Some(AddOutcome::Added { stock }) => {
            writeln!(out, "Added {added} x {name} to cart ({stock} left in stock)")?;
        }
        Some(AddOutcome::Rejected) => {
            write_partial(out, added, name)?;
            writeln!(out, "{name} is out of stock")?;
        }
        Some(AddOutcome::Failed) => {
            write_partial(out, added, name)?;
            writeln!(out, "Could not reserve {name}, please try again")?;
        }
        Some(AddOutcome::Blocked(Blocked::VariantRequired)) => {
            writeln!(
                out,
                "{name} comes in {}; choose one with --variant",
                card.variants().join(", ")
            )?;
        }
        Some(AddOutcome::Blocked(Blocked::OutOfStock)) | None => {
            write_partial(out, added, name)?;
            writeln!(out, "{name} is out of stock")?;
        }
    }

    let badge = CartBadge {
        count: storefront.cart().count(),
    };
    writeln!(out, "{}", badge.render()?)?;
    Ok(())
}

fn write_partial(out: &mut impl Write, added: i64, name: &str) -> std::io::Result<()> {
    if added > 0 {
        writeln!(out, "Added {added} x {name} to cart")?;
    }
    Ok(())
}
