//! Product catalog trait and in-memory implementation.

use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use async_trait::async_trait;
use domain::{Money, ProductId};

use super::ServiceError;

/// A product record as returned by the product service.
#[derive(Debug, Clone)]
pub struct Product {
    pub id: ProductId,
    pub name: String,
    pub price: Money,
    pub stock: u32,
}

/// Result of a stock-availability check.
#[derive(Debug, Clone, Copy)]
pub struct StockCheck {
    pub available: bool,
    pub current_stock: u32,
}

/// Trait for the product catalog collaborator.
///
/// `check_stock` and `update_stock` are two independent calls with no
/// lock between them; concurrent placements against the same product can
/// overbook in that window. The only hard guard is the negative-stock
/// floor inside `update_stock`.
#[async_trait]
pub trait ProductCatalog: Send + Sync {
    /// Fetches a product record. `Ok(None)` means no such product.
    async fn find_product_by_id(&self, id: &ProductId) -> Result<Option<Product>, ServiceError>;

    /// Checks whether the product can cover `required_quantity`.
    async fn check_stock(
        &self,
        id: &ProductId,
        required_quantity: u32,
    ) -> Result<StockCheck, ServiceError>;

    /// Adjusts stock by a signed delta (negative reserves, positive
    /// restores). Fails with `FailedPrecondition` if the resulting stock
    /// would be negative.
    async fn update_stock(&self, id: &ProductId, delta: i64) -> Result<Product, ServiceError>;
}

#[derive(Debug, Default)]
struct CatalogState {
    products: HashMap<ProductId, Product>,
    update_calls: usize,
    fail_updates_after: Option<usize>,
    fail_updates_for: Option<ProductId>,
}

/// In-memory product catalog for tests and the demo server.
///
/// Supports failure injection on `update_stock` so the saga's rollback
/// paths can be exercised.
#[derive(Debug, Clone, Default)]
pub struct InMemoryProductCatalog {
    state: Arc<RwLock<CatalogState>>,
}

impl InMemoryProductCatalog {
    /// Creates a new empty catalog.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a product and returns its ID.
    pub fn insert(&self, id: impl Into<ProductId>, name: impl Into<String>, price: Money, stock: u32) -> ProductId {
        let id = id.into();
        let product = Product {
            id: id.clone(),
            name: name.into(),
            price,
            stock,
        };
        self.state.write().unwrap().products.insert(id.clone(), product);
        id
    }

    /// Returns the current stock of a product.
    pub fn stock_of(&self, id: &ProductId) -> Option<u32> {
        self.state.read().unwrap().products.get(id).map(|p| p.stock)
    }

    /// Makes every `update_stock` call after the first `n` fail with a
    /// transient error. Pass through compensation calls count too, so
    /// `n = 1` fails both the second reservation and the rollback of the
    /// first.
    pub fn fail_updates_after(&self, n: usize) {
        let mut state = self.state.write().unwrap();
        state.update_calls = 0;
        state.fail_updates_after = Some(n);
    }

    /// Makes every `update_stock` call targeting `id` fail with a
    /// transient error, in either direction.
    pub fn fail_updates_for(&self, id: &ProductId) {
        self.state.write().unwrap().fail_updates_for = Some(id.clone());
    }

    /// Clears any injected failure.
    pub fn clear_failures(&self) {
        let mut state = self.state.write().unwrap();
        state.fail_updates_after = None;
        state.fail_updates_for = None;
    }
}

#[async_trait]
impl ProductCatalog for InMemoryProductCatalog {
    async fn find_product_by_id(&self, id: &ProductId) -> Result<Option<Product>, ServiceError> {
        let state = self.state.read().unwrap();
        Ok(state.products.get(id).cloned())
    }

    async fn check_stock(
        &self,
        id: &ProductId,
        required_quantity: u32,
    ) -> Result<StockCheck, ServiceError> {
        let state = self.state.read().unwrap();
        let product = state
            .products
            .get(id)
            .ok_or_else(|| ServiceError::NotFound(format!("Product with ID {id} not found")))?;

        Ok(StockCheck {
            available: product.stock >= required_quantity,
            current_stock: product.stock,
        })
    }

    async fn update_stock(&self, id: &ProductId, delta: i64) -> Result<Product, ServiceError> {
        let mut state = self.state.write().unwrap();

        state.update_calls += 1;
        if let Some(after) = state.fail_updates_after
            && state.update_calls > after
        {
            return Err(ServiceError::Unavailable(
                "product service unavailable".to_string(),
            ));
        }
        if state.fail_updates_for.as_ref() == Some(id) {
            return Err(ServiceError::Unavailable(
                "product service unavailable".to_string(),
            ));
        }

        let product = state
            .products
            .get_mut(id)
            .ok_or_else(|| ServiceError::NotFound(format!("Product with ID {id} not found")))?;

        let new_stock = i64::from(product.stock) + delta;
        if new_stock < 0 {
            return Err(ServiceError::FailedPrecondition(format!(
                "Insufficient stock for product {}",
                product.name
            )));
        }

        product.stock = new_stock as u32;
        Ok(product.clone())
    }
}
