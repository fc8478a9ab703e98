//! In-memory Cart Service
//!
//! A [`CartService`] backed by concurrent maps. It keeps a product catalog,
//! the cart lines of every user and the orders placed so far.

use super::models::{
    CartDetail, CartItemId, CartOrderItem, NewCartItem, OrderId, ProductId,
};
use super::service::{CartService, ServiceError};
use async_trait::async_trait;
use dashmap::DashMap;
use std::collections::{BTreeMap, HashSet};
use std::sync::atomic::{AtomicU64, Ordering};
use tokio::sync::Mutex;
use tracing::{debug, info};

// =============================================================================
// Records
// =============================================================================

/// A catalog product
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Product {
    pub id: ProductId,
    pub name: String,
    /// Unit price in minor currency units
    pub price: u64,
    pub stock: u32,
}

impl Product {
    pub fn new(id: u64, name: impl Into<String>, price: u64, stock: u32) -> Self {
        Self {
            id: ProductId(id),
            name: name.into(),
            price,
            stock,
        }
    }
}

/// A line in some user's cart
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CartItemRecord {
    pub id: CartItemId,
    pub owner: String,
    pub product_id: ProductId,
    pub quantity: u32,
}

/// One product line of a placed order, priced at checkout time
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderLine {
    pub product_id: ProductId,
    pub product_name: String,
    pub unit_price: u64,
    pub quantity: u32,
}

/// A placed order
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Order {
    pub id: OrderId,
    pub owner: String,
    pub lines: Vec<OrderLine>,
    pub total: u64,
}

/// A small catalog for local runs
pub fn demo_catalog() -> Vec<Product> {
    vec![
        Product::new(1, "Canvas Tote Bag", 15_000, 40),
        Product::new(2, "Ceramic Mug", 9_000, 120),
        Product::new(3, "Linen Shirt", 49_000, 25),
        Product::new(4, "Wool Scarf", 32_000, 30),
        Product::new(5, "Leather Notebook", 21_000, 60),
    ]
}

// =============================================================================
// Service
// =============================================================================

/// Map-backed [`CartService`].
///
/// Ids come from counters that only move forward, so an id is never handed
/// out twice. Checkout is serialized so that two orders cannot both consume
/// the last units of a product.
#[derive(Debug)]
pub struct InMemoryCartService {
    products: DashMap<ProductId, Product>,
    cart_items: DashMap<CartItemId, CartItemRecord>,
    orders: DashMap<OrderId, Order>,
    next_cart_item_id: AtomicU64,
    next_order_id: AtomicU64,
    checkout: Mutex<()>,
}

impl Default for InMemoryCartService {
    fn default() -> Self {
        Self::new()
    }
}

impl InMemoryCartService {
    /// Creates a service with an empty catalog
    pub fn new() -> Self {
        Self {
            products: DashMap::new(),
            cart_items: DashMap::new(),
            orders: DashMap::new(),
            next_cart_item_id: AtomicU64::new(1),
            next_order_id: AtomicU64::new(1),
            checkout: Mutex::new(()),
        }
    }

    /// Creates a service whose catalog holds `products`
    pub fn with_catalog(products: impl IntoIterator<Item = Product>) -> Self {
        let service = Self::new();
        for product in products {
            service.insert_product(product);
        }
        service
    }

    /// Adds or replaces a catalog product
    pub fn insert_product(&self, product: Product) {
        self.products.insert(product.id, product);
    }

    pub fn product(&self, id: ProductId) -> Option<Product> {
        self.products.get(&id).map(|p| p.clone())
    }

    pub fn cart_item(&self, id: CartItemId) -> Option<CartItemRecord> {
        self.cart_items.get(&id).map(|item| item.clone())
    }

    pub fn order(&self, id: OrderId) -> Option<Order> {
        self.orders.get(&id).map(|order| order.clone())
    }

    pub fn order_count(&self) -> usize {
        self.orders.len()
    }

    /// Resolves the selected cart lines into per-product order lines.
    ///
    /// Duplicate selections collapse. Two cart lines holding the same product
    /// are merged into one order line.
    fn plan_order(
        &self,
        selections: &[CartOrderItem],
    ) -> Result<(Vec<CartItemId>, Vec<OrderLine>), ServiceError> {
        let mut seen = HashSet::new();
        let mut cart_item_ids = Vec::new();
        let mut per_product: BTreeMap<ProductId, u32> = BTreeMap::new();

        for selection in selections {
            let id = selection.cart_item_id;
            if !seen.insert(id) {
                continue;
            }
            let (product_id, quantity) = {
                let item = self
                    .cart_items
                    .get(&id)
                    .ok_or(ServiceError::CartItemNotFound(id))?;
                (item.product_id, item.quantity)
            };
            let total = per_product.entry(product_id).or_insert(0);
            *total = total.saturating_add(quantity);
            cart_item_ids.push(id);
        }

        let mut lines = Vec::with_capacity(per_product.len());
        for (product_id, quantity) in per_product {
            let product = self
                .product(product_id)
                .ok_or(ServiceError::ProductNotFound(product_id))?;
            if product.stock < quantity {
                return Err(ServiceError::OutOfStock {
                    product_id,
                    product_name: product.name,
                    remaining: product.stock,
                });
            }
            lines.push(OrderLine {
                product_id,
                product_name: product.name,
                unit_price: product.price,
                quantity,
            });
        }

        Ok((cart_item_ids, lines))
    }
}

#[async_trait]
impl CartService for InMemoryCartService {
    async fn add_cart(&self, item: NewCartItem, email: &str) -> Result<CartItemId, ServiceError> {
        if !self.products.contains_key(&item.product_id) {
            return Err(ServiceError::ProductNotFound(item.product_id));
        }

        let id = CartItemId(self.next_cart_item_id.fetch_add(1, Ordering::Relaxed));
        self.cart_items.insert(
            id,
            CartItemRecord {
                id,
                owner: email.to_string(),
                product_id: item.product_id,
                quantity: item.quantity,
            },
        );

        debug!(cart_item_id = %id, product_id = %item.product_id, quantity = item.quantity, "cart line created");
        Ok(id)
    }

    async fn cart_list(&self, email: &str) -> Result<Vec<CartDetail>, ServiceError> {
        let owned: Vec<CartItemRecord> = self
            .cart_items
            .iter()
            .filter(|entry| entry.owner == email)
            .map(|entry| entry.value().clone())
            .collect();

        let mut details: Vec<CartDetail> = owned
            .into_iter()
            .filter_map(|item| {
                let product = self.product(item.product_id)?;
                Some(CartDetail {
                    cart_item_id: item.id,
                    product_id: item.product_id,
                    product_name: product.name,
                    price: product.price,
                    quantity: item.quantity,
                })
            })
            .collect();

        // Newest lines first
        details.sort_by(|a, b| b.cart_item_id.cmp(&a.cart_item_id));
        Ok(details)
    }

    async fn validate_cart_item(&self, id: CartItemId, email: &str) -> Result<bool, ServiceError> {
        self.cart_items
            .get(&id)
            .map(|item| item.owner == email)
            .ok_or(ServiceError::CartItemNotFound(id))
    }

    async fn update_cart_item_count(&self, id: CartItemId, count: u32) -> Result<(), ServiceError> {
        let mut item = self
            .cart_items
            .get_mut(&id)
            .ok_or(ServiceError::CartItemNotFound(id))?;
        item.quantity = count;
        debug!(cart_item_id = %id, count, "cart line quantity updated");
        Ok(())
    }

    async fn delete_cart_item(&self, id: CartItemId) -> Result<(), ServiceError> {
        self.cart_items
            .remove(&id)
            .ok_or(ServiceError::CartItemNotFound(id))?;
        debug!(cart_item_id = %id, "cart line deleted");
        Ok(())
    }

    async fn order_cart_items(
        &self,
        selections: &[CartOrderItem],
        email: &str,
    ) -> Result<OrderId, ServiceError> {
        let _guard = self.checkout.lock().await;

        let (cart_item_ids, lines) = self.plan_order(selections)?;

        for line in &lines {
            if let Some(mut product) = self.products.get_mut(&line.product_id) {
                product.stock -= line.quantity;
            }
        }
        for id in &cart_item_ids {
            self.cart_items.remove(id);
        }

        let id = OrderId(self.next_order_id.fetch_add(1, Ordering::Relaxed));
        let total = lines
            .iter()
            .map(|line| line.unit_price.saturating_mul(u64::from(line.quantity)))
            .fold(0u64, u64::saturating_add);
        self.orders.insert(
            id,
            Order {
                id,
                owner: email.to_string(),
                lines,
                total,
            },
        );

        info!(order_id = %id, cart_lines = cart_item_ids.len(), total, "order placed");
        Ok(id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ALICE: &str = "alice@example.com";
    const BOB: &str = "bob@example.com";

    fn service() -> InMemoryCartService {
        InMemoryCartService::with_catalog([
            Product::new(5, "Notebook", 1_200, 10),
            Product::new(7, "Pen", 300, 1),
        ])
    }

    fn new_item(product_id: u64, quantity: u32) -> NewCartItem {
        NewCartItem {
            product_id: ProductId(product_id),
            quantity,
        }
    }

    fn select(ids: &[CartItemId]) -> Vec<CartOrderItem> {
        ids.iter()
            .map(|&cart_item_id| CartOrderItem { cart_item_id })
            .collect()
    }

    #[tokio::test]
    async fn add_allocates_fresh_ids() {
        let service = service();
        let first = service.add_cart(new_item(5, 1), ALICE).await.unwrap();
        let second = service.add_cart(new_item(5, 1), ALICE).await.unwrap();
        let third = service.add_cart(new_item(7, 1), BOB).await.unwrap();
        assert_ne!(first, second);
        assert_ne!(second, third);
        assert_ne!(first, third);
    }

    #[tokio::test]
    async fn add_rejects_unknown_product() {
        let err = service().add_cart(new_item(99, 1), ALICE).await.unwrap_err();
        assert_eq!(err, ServiceError::ProductNotFound(ProductId(99)));
    }

    #[tokio::test]
    async fn list_only_shows_own_lines_newest_first() {
        let service = service();
        let older = service.add_cart(new_item(5, 2), ALICE).await.unwrap();
        service.add_cart(new_item(5, 1), BOB).await.unwrap();
        let newer = service.add_cart(new_item(7, 1), ALICE).await.unwrap();

        let list = service.cart_list(ALICE).await.unwrap();
        let ids: Vec<_> = list.iter().map(|d| d.cart_item_id).collect();
        assert_eq!(ids, vec![newer, older]);
        assert_eq!(list[1].product_name, "Notebook");
        assert_eq!(list[1].quantity, 2);
    }

    #[tokio::test]
    async fn validate_checks_owner() {
        let service = service();
        let id = service.add_cart(new_item(5, 1), ALICE).await.unwrap();
        assert!(service.validate_cart_item(id, ALICE).await.unwrap());
        assert!(!service.validate_cart_item(id, BOB).await.unwrap());
        assert_eq!(
            service.validate_cart_item(CartItemId(404), ALICE).await,
            Err(ServiceError::CartItemNotFound(CartItemId(404)))
        );
    }

    #[tokio::test]
    async fn update_and_delete() {
        let service = service();
        let id = service.add_cart(new_item(5, 1), ALICE).await.unwrap();
        service.update_cart_item_count(id, 4).await.unwrap();
        assert_eq!(service.cart_item(id).unwrap().quantity, 4);

        service.delete_cart_item(id).await.unwrap();
        assert!(service.cart_item(id).is_none());
        assert_eq!(
            service.delete_cart_item(id).await,
            Err(ServiceError::CartItemNotFound(id))
        );
    }

    #[tokio::test]
    async fn order_consumes_stock_and_cart_lines() {
        let service = service();
        let a = service.add_cart(new_item(5, 2), ALICE).await.unwrap();
        let b = service.add_cart(new_item(5, 3), ALICE).await.unwrap();

        let order_id = service
            .order_cart_items(&select(&[a, b, a]), ALICE)
            .await
            .unwrap();

        let order = service.order(order_id).unwrap();
        assert_eq!(order.owner, ALICE);
        assert_eq!(order.lines.len(), 1);
        assert_eq!(order.lines[0].quantity, 5);
        assert_eq!(order.total, 6_000);
        assert_eq!(service.product(ProductId(5)).unwrap().stock, 5);
        assert!(service.cart_item(a).is_none());
        assert!(service.cart_item(b).is_none());
    }

    #[tokio::test]
    async fn out_of_stock_changes_nothing() {
        let service = service();
        let notebook = service.add_cart(new_item(5, 1), ALICE).await.unwrap();
        let pens = service.add_cart(new_item(7, 2), ALICE).await.unwrap();

        let err = service
            .order_cart_items(&select(&[notebook, pens]), ALICE)
            .await
            .unwrap_err();

        assert!(matches!(err, ServiceError::OutOfStock { remaining: 1, .. }));
        assert_eq!(service.product(ProductId(5)).unwrap().stock, 10);
        assert!(service.cart_item(notebook).is_some());
        assert_eq!(service.order_count(), 0);
    }
}
