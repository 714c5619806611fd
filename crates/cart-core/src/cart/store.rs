//! The cart store: owns the cart, checks stock, persists and publishes.

use std::fmt;
use std::sync::Arc;

use cart_cache::{Cache, CacheError, PersistenceStore};
use tokio::sync::{watch, Mutex};
use tracing::{debug, info, instrument, warn};

use crate::cart::{Cart, CartLine};
use crate::catalog::{CatalogService, Product, StockQuote, StockService};
use crate::error::{CartError, ServiceError};
use crate::ids::ProductId;
use crate::notice::{Notice, Notifier, NullNotifier};

/// Storage key the cart is persisted under unless configured otherwise.
pub const DEFAULT_CART_KEY: &str = "@RocketShoes:cart";

/// A published cart value together with the commit that produced it.
#[derive(Debug, Clone, PartialEq)]
pub struct CartSnapshot {
    /// Number of commits since the store was opened.
    pub version: u64,
    /// The cart as of that commit.
    pub cart: Arc<Cart>,
}

/// Result of an operation that did not fail.
#[derive(Debug, Clone, PartialEq)]
pub enum Outcome {
    /// A new cart was persisted and published.
    Committed(CartSnapshot),
    /// The request was valid but had nothing to change.
    Unchanged,
}

impl Outcome {
    pub fn is_committed(&self) -> bool {
        matches!(self, Outcome::Committed(_))
    }

    pub fn snapshot(&self) -> Option<&CartSnapshot> {
        match self {
            Outcome::Committed(snapshot) => Some(snapshot),
            Outcome::Unchanged => None,
        }
    }
}

#[derive(Debug, Clone, Copy)]
enum Operation {
    Add,
    Remove,
    Update,
}

/// Builder for [`CartStore`].
pub struct CartStoreBuilder {
    stock: Arc<dyn StockService>,
    catalog: Arc<dyn CatalogService>,
    persistence: Arc<dyn PersistenceStore>,
    key: String,
    notifier: Arc<dyn Notifier>,
}

impl CartStoreBuilder {
    /// Persist under `key` instead of [`DEFAULT_CART_KEY`].
    pub fn key(mut self, key: impl Into<String>) -> Self {
        self.key = key.into();
        self
    }

    /// Deliver notices to `notifier`. Notices are dropped by default.
    pub fn notifier(mut self, notifier: impl Notifier + 'static) -> Self {
        self.notifier = Arc::new(notifier);
        self
    }

    /// Rehydrate the cart from persistence and open the store.
    ///
    /// A missing blob yields an empty cart. A blob that does not parse, or
    /// that breaks the cart's invariants, fails with
    /// [`CartError::MalformedPersistedState`].
    pub fn open(self) -> Result<CartStore, CartError> {
        let cache = Cache::new(self.persistence);
        let cart = match cache.get::<Cart>(&self.key) {
            Ok(Some(cart)) => cart,
            Ok(None) => Cart::new(),
            Err(CacheError::SerializeError(e)) => {
                return Err(CartError::MalformedPersistedState(e.to_string()))
            }
            Err(e) => return Err(e.into()),
        };

        info!(key = %self.key, lines = cart.len(), "opened cart store");

        let (state, _) = watch::channel(CartSnapshot {
            version: 0,
            cart: Arc::new(cart),
        });

        Ok(CartStore {
            inner: Arc::new(Inner {
                stock: self.stock,
                catalog: self.catalog,
                cache,
                key: self.key,
                notifier: self.notifier,
                gate: Mutex::new(()),
                state,
            }),
        })
    }
}

/// Owns the shopper's cart and mediates every change to it.
///
/// Every change is checked against the stock service, written to the
/// persistence store, and only then published to subscribers, so the
/// in-memory cart and its durable copy never diverge. Operations run one at
/// a time in arrival order: a second click while the first is still waiting
/// on the network queues behind it instead of overwriting its result.
///
/// `CartStore` is a cheap handle; clones share the same cart.
///
/// # Example
///
/// ```rust,ignore
/// let store = CartStore::builder(client.clone(), client, Arc::new(FileStore::open(".cart")?))
///     .notifier(notices.clone())
///     .open()?;
///
/// store.add_product(ProductId::new(42)).await?;
/// println!("{} items", store.cart().item_count());
/// ```
#[derive(Clone)]
pub struct CartStore {
    inner: Arc<Inner>,
}

struct Inner {
    stock: Arc<dyn StockService>,
    catalog: Arc<dyn CatalogService>,
    cache: Cache,
    key: String,
    notifier: Arc<dyn Notifier>,
    /// Held for the whole of an operation, remote calls included.
    gate: Mutex<()>,
    state: watch::Sender<CartSnapshot>,
}

impl CartStore {
    /// Start building a store from its three collaborators.
    pub fn builder(
        stock: Arc<dyn StockService>,
        catalog: Arc<dyn CatalogService>,
        persistence: Arc<dyn PersistenceStore>,
    ) -> CartStoreBuilder {
        CartStoreBuilder {
            stock,
            catalog,
            persistence,
            key: DEFAULT_CART_KEY.to_string(),
            notifier: Arc::new(NullNotifier),
        }
    }

    /// Current cart.
    pub fn cart(&self) -> Arc<Cart> {
        self.inner.state.borrow().cart.clone()
    }

    /// Current cart with its commit version.
    pub fn snapshot(&self) -> CartSnapshot {
        self.inner.current()
    }

    pub fn version(&self) -> u64 {
        self.inner.state.borrow().version
    }

    /// Receive every snapshot published from now on.
    pub fn subscribe(&self) -> watch::Receiver<CartSnapshot> {
        self.inner.state.subscribe()
    }

    /// Storage key the cart is persisted under.
    pub fn key(&self) -> &str {
        &self.inner.key
    }

    /// Add one unit of a product, creating its line if needed.
    ///
    /// A new line is filled from the catalog service and announced with a
    /// success notice. Fails with [`CartError::OutOfStock`] when one more
    /// unit would exceed stock.
    #[instrument(skip_all, fields(product_id = %product_id))]
    pub async fn add_product(&self, product_id: ProductId) -> Result<Outcome, CartError> {
        let _turn = self.inner.gate.lock().await;
        let result = self.inner.add_product(product_id).await;
        self.inner.report(Operation::Add, &result);
        result
    }

    /// Delete a product's line whatever its amount.
    ///
    /// Fails with [`CartError::NotFound`] if the product is not in the cart.
    #[instrument(skip_all, fields(product_id = %product_id))]
    pub async fn remove_product(&self, product_id: ProductId) -> Result<Outcome, CartError> {
        let _turn = self.inner.gate.lock().await;
        let result = self.inner.remove_product(product_id);
        self.inner.report(Operation::Remove, &result);
        result
    }

    /// Set a product's amount to an exact value.
    ///
    /// Amounts of zero or less are ignored rather than treated as a removal,
    /// and a product that is not in the cart is left out of it. Fails with
    /// [`CartError::OutOfStock`] when `amount` exceeds stock.
    #[instrument(skip_all, fields(product_id = %product_id, amount = amount))]
    pub async fn update_product_amount(
        &self,
        product_id: ProductId,
        amount: i64,
    ) -> Result<Outcome, CartError> {
        let _turn = self.inner.gate.lock().await;
        let result = self.inner.set_amount(product_id, amount).await;
        self.inner.report(Operation::Update, &result);
        result
    }
}

impl Inner {
    fn current(&self) -> CartSnapshot {
        self.state.borrow().clone()
    }

    async fn add_product(&self, product_id: ProductId) -> Result<Outcome, CartError> {
        let current = self.current();
        let existing = current.cart.get(product_id).map(|line| line.amount);
        let stock = self.stock_for(product_id).await?;

        if let Some(amount) = existing {
            let requested = amount
                .checked_add(1)
                .ok_or_else(|| out_of_stock(&stock, i64::MAX))?;
            return self.apply_amount(product_id, requested, &stock);
        }

        if !stock.can_fulfill(1) {
            return Err(out_of_stock(&stock, 1));
        }

        let product = self.product_for(product_id).await?;
        let title = product.title.clone();
        let snapshot = self.commit(&current, current.cart.with_line(CartLine::from_product(product)))?;
        self.notifier.notify(Notice::product_added(&title));
        Ok(Outcome::Committed(snapshot))
    }

    fn remove_product(&self, product_id: ProductId) -> Result<Outcome, CartError> {
        let current = self.current();
        let cart = current
            .cart
            .without(product_id)
            .ok_or(CartError::NotFound(product_id))?;
        Ok(Outcome::Committed(self.commit(&current, cart)?))
    }

    async fn set_amount(&self, product_id: ProductId, amount: i64) -> Result<Outcome, CartError> {
        if amount <= 0 {
            debug!(amount, "ignoring non-positive amount");
            return Ok(Outcome::Unchanged);
        }

        let stock = self.stock_for(product_id).await?;
        self.apply_amount(product_id, amount, &stock)
    }

    fn apply_amount(
        &self,
        product_id: ProductId,
        amount: i64,
        stock: &StockQuote,
    ) -> Result<Outcome, CartError> {
        if !stock.can_fulfill(amount) {
            return Err(out_of_stock(stock, amount));
        }

        let current = self.current();
        match current.cart.with_amount(product_id, amount) {
            Some(cart) => Ok(Outcome::Committed(self.commit(&current, cart)?)),
            None => {
                debug!("product not in cart, nothing to update");
                Ok(Outcome::Unchanged)
            }
        }
    }

    async fn stock_for(&self, product_id: ProductId) -> Result<StockQuote, CartError> {
        let quote = self
            .stock
            .get_stock(product_id)
            .await
            .map_err(|source| CartError::StockLookup { product_id, source })?;
        debug!(available = quote.available, "stock quote");
        Ok(quote)
    }

    async fn product_for(&self, product_id: ProductId) -> Result<Product, CartError> {
        let product = self
            .catalog
            .get_product(product_id)
            .await
            .map_err(|source| CartError::CatalogLookup { product_id, source })?;

        if product.id != product_id {
            return Err(CartError::CatalogLookup {
                product_id,
                source: ServiceError::InvalidResponse(format!(
                    "asked for product {}, got {}",
                    product_id, product.id
                )),
            });
        }
        Ok(product)
    }

    /// Persist `cart`, then make it current and publish it.
    ///
    /// The durable write happens first: if it fails the in-memory cart is
    /// left as it was.
    fn commit(&self, base: &CartSnapshot, cart: Cart) -> Result<CartSnapshot, CartError> {
        debug_assert_eq!(self.state.borrow().version, base.version);

        self.cache.set(&self.key, &cart)?;

        let snapshot = CartSnapshot {
            version: base.version + 1,
            cart: Arc::new(cart),
        };
        self.state.send_replace(snapshot.clone());
        debug!(
            version = snapshot.version,
            lines = snapshot.cart.len(),
            "committed cart"
        );
        Ok(snapshot)
    }

    fn report(&self, operation: Operation, result: &Result<Outcome, CartError>) {
        let err = match result {
            Ok(_) => return,
            Err(err) => err,
        };

        let notice = match (operation, err) {
            (Operation::Add, CartError::OutOfStock { .. }) => Notice::out_of_stock_on_add(),
            (Operation::Add, _) => Notice::add_failed(),
            (Operation::Update, CartError::OutOfStock { .. }) => Notice::out_of_stock_on_update(),
            (Operation::Update, _) => Notice::update_failed(),
            (Operation::Remove, _) => Notice::remove_failed(),
        };

        match err {
            CartError::OutOfStock { .. } | CartError::NotFound(_) => {
                info!(?operation, error = %err, "cart operation rejected")
            }
            _ => warn!(?operation, error = %err, "cart operation failed"),
        }

        self.notifier.notify(notice);
    }
}

fn out_of_stock(stock: &StockQuote, requested: i64) -> CartError {
    CartError::OutOfStock {
        product_id: stock.product_id,
        requested,
        available: stock.available,
    }
}

impl fmt::Debug for CartStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let snapshot = self.inner.current();
        f.debug_struct("CartStore")
            .field("key", &self.inner.key)
            .field("version", &snapshot.version)
            .field("lines", &snapshot.cart.len())
            .finish()
    }
}
