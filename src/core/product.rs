//! Product business logic - Handles all membership product operations.
//!
//! This module provides functions for creating, retrieving, updating and removing
//! membership products. Lookups by name only see active products. Removing a product
//! that members still reference deactivates it instead of deleting the row.

use crate::{
    entities::{DurationUnit, Member, Product, member, product},
    errors::{Error, Result},
};
use sea_orm::{ConnectionTrait, PaginatorTrait, QueryOrder, Set, prelude::*};
use serde::{Deserialize, Serialize};

/// Fields accepted when creating or replacing a product
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductInput {
    /// Product name
    pub name: String,
    /// Term length; zero or absent means no expiry
    #[serde(rename = "regMonths")]
    pub duration_count: Option<i32>,
    /// Unit of the term length, months when absent
    #[serde(default)]
    pub duration_unit: Option<DurationUnit>,
    /// Price in won
    pub price: i64,
    /// Free-form description
    #[serde(default)]
    pub description: Option<String>,
    /// Active flag, true when absent
    #[serde(default)]
    pub active: Option<bool>,
}

/// Outcome of [`delete_product`]
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductRemoval {
    /// True when the product was only deactivated because members still use it
    pub deactivated: bool,
    /// Number of members referencing the product
    pub member_count: u64,
}

fn validate(input: &ProductInput) -> Result<()> {
    if input.name.trim().is_empty() {
        return Err(Error::Validation {
            message: "Product name cannot be empty".to_string(),
        });
    }
    if input.price < 0 {
        return Err(Error::Validation {
            message: format!("Product price cannot be negative: {}", input.price),
        });
    }
    Ok(())
}

/// Retrieves every product, active or not, ordered by id.
pub async fn get_all_products(db: &DatabaseConnection) -> Result<Vec<product::Model>> {
    Product::find()
        .order_by_asc(product::Column::Id)
        .all(db)
        .await
        .map_err(Into::into)
}

/// Finds an active product by its exact name.
///
/// Inactive products are invisible here, so a deactivated plan never
/// captures new members.
pub async fn get_active_product_by_name<C>(db: &C, name: &str) -> Result<Option<product::Model>>
where
    C: ConnectionTrait,
{
    Product::find()
        .filter(product::Column::Name.eq(name))
        .filter(product::Column::Active.eq(true))
        .order_by_asc(product::Column::Id)
        .one(db)
        .await
        .map_err(Into::into)
}

/// Retrieves a specific product by its unique ID.
pub async fn get_product_by_id<C>(db: &C, product_id: i64) -> Result<Option<product::Model>>
where
    C: ConnectionTrait,
{
    Product::find_by_id(product_id)
        .one(db)
        .await
        .map_err(Into::into)
}

/// Creates a new product after validating its name and price.
///
/// # Errors
/// Returns an error if:
/// - The product name is empty or whitespace-only
/// - The price is negative
/// - The database insert operation fails
pub async fn create_product<C>(db: &C, input: ProductInput) -> Result<product::Model>
where
    C: ConnectionTrait,
{
    validate(&input)?;

    let product = product::ActiveModel {
        name: Set(input.name.trim().to_string()),
        duration_count: Set(input.duration_count),
        duration_unit: Set(input.duration_unit.unwrap_or_default()),
        price: Set(input.price),
        description: Set(input.description),
        active: Set(input.active.unwrap_or(true)),
        created_at: Set(chrono::Utc::now().naive_utc()),
        ..Default::default()
    };
    product.insert(db).await.map_err(Into::into)
}

/// Replaces an existing product's fields.
///
/// The duration unit is kept as-is when the input leaves it out.
///
/// # Errors
/// Returns an error if validation fails, the product does not exist, or the
/// database update fails.
pub async fn update_product(
    db: &DatabaseConnection,
    product_id: i64,
    input: ProductInput,
) -> Result<product::Model> {
    validate(&input)?;

    let mut product: product::ActiveModel = Product::find_by_id(product_id)
        .one(db)
        .await?
        .ok_or_else(|| Error::ProductNotFound {
            id: product_id.to_string(),
        })?
        .into();

    product.name = Set(input.name.trim().to_string());
    product.duration_count = Set(input.duration_count);
    if let Some(unit) = input.duration_unit {
        product.duration_unit = Set(unit);
    }
    product.price = Set(input.price);
    product.description = Set(input.description);
    product.active = Set(input.active.unwrap_or(true));

    product.update(db).await.map_err(Into::into)
}

/// Removes a product.
///
/// Products still referenced by members are soft-deleted by clearing their
/// active flag; unreferenced products are deleted outright.
///
/// # Errors
/// Returns an error if the product does not exist or a database operation fails.
pub async fn delete_product(db: &DatabaseConnection, product_id: i64) -> Result<ProductRemoval> {
    let existing = Product::find_by_id(product_id)
        .one(db)
        .await?
        .ok_or_else(|| Error::ProductNotFound {
            id: product_id.to_string(),
        })?;

    let member_count = Member::find()
        .filter(member::Column::ProductId.eq(product_id))
        .count(db)
        .await?;

    if member_count > 0 {
        let mut product: product::ActiveModel = existing.into();
        product.active = Set(false);
        product.update(db).await?;
        return Ok(ProductRemoval {
            deactivated: true,
            member_count,
        });
    }

    Product::delete_by_id(product_id).exec(db).await?;
    Ok(ProductRemoval {
        deactivated: false,
        member_count,
    })
}
