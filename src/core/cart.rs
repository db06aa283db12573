//! Cart business logic - reconciliation across anonymous and signed-in
//! sessions.
//!
//! The service owns the authoritative list of cart lines. Anonymous carts
//! live in the local store and every mutation persists the whole list,
//! best-effort. Authenticated carts live in the database: every mutation
//! issues the row change and then re-fetches the full cart so local state
//! matches server truth, following the `Idle -> Mutating -> Reconciling`
//! loop. Mutations are read-modify-write without a lock, so two rapid
//! operations on the same line can race; the later reload settles on
//! whatever the server last saw.

use crate::core::SyncPhase;
use crate::core::notifications::{NotificationKind, Notifier};
use crate::entities::{CartItem, Product, ProductModel, cart_item};
use crate::errors::Result;
use crate::local_store::{CART_KEY, LocalStore};
use crate::session::Identity;
use chrono::Utc;
use sea_orm::sea_query::Expr;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, Set,
};
use serde::{Deserialize, Serialize};
use tracing::error;

/// A cart line holding an owned snapshot of the product.
///
/// The product is copied at add time; later catalog changes (price, name)
/// are not reflected in existing lines.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CartEntry {
    /// Row id for authenticated carts, a locally-generated millisecond
    /// timestamp for anonymous ones
    pub id: i64,
    /// Snapshot of the product when it was added
    pub product: ProductModel,
    /// Number of units, always at least one
    pub quantity: i32,
}

/// Owns the cart line list and switches between the local store
/// (anonymous) and the database (authenticated).
#[derive(Debug)]
pub struct CartService {
    db: DatabaseConnection,
    local: LocalStore,
    notifier: Notifier,
    identity: Option<Identity>,
    items: Vec<CartEntry>,
    phase: SyncPhase,
    loading: bool,
}

impl CartService {
    /// Creates an anonymous cart service. Call [`CartService::reload`] to
    /// pick up a previously persisted anonymous cart.
    #[must_use]
    pub const fn new(db: DatabaseConnection, local: LocalStore, notifier: Notifier) -> Self {
        Self {
            db,
            local,
            notifier,
            identity: None,
            items: Vec::new(),
            phase: SyncPhase::Idle,
            loading: false,
        }
    }

    /// Switches between anonymous and authenticated modes, reloading from
    /// the matching source of truth.
    ///
    /// The anonymous cart is not merged into the remote cart on login; it
    /// stays in the local store and reappears on logout.
    pub async fn set_identity(&mut self, identity: Option<Identity>) -> Result<()> {
        self.identity = identity;
        self.reload().await
    }

    /// Reloads the line list from the current source of truth.
    pub async fn reload(&mut self) -> Result<()> {
        if self.identity.is_some() {
            self.load_remote().await
        } else {
            self.load_local();
            Ok(())
        }
    }

    fn load_local(&mut self) {
        self.items = self.local.read(CART_KEY).unwrap_or_default();
    }

    async fn load_remote(&mut self) -> Result<()> {
        let Some(user_id) = self.identity.as_ref().map(|u| u.id.clone()) else {
            return Ok(());
        };
        self.loading = true;
        let result = CartItem::find()
            .filter(cart_item::Column::UserId.eq(user_id))
            .find_also_related(Product)
            .all(&self.db)
            .await;
        self.loading = false;
        let rows = result?;
        self.items = rows
            .into_iter()
            .filter_map(|(row, product)| {
                product.map(|product| CartEntry {
                    id: row.id,
                    product,
                    quantity: row.quantity,
                })
            })
            .collect();
        Ok(())
    }

    fn persist_local(&self) {
        self.local.write(CART_KEY, &self.items);
    }

    /// Adds `quantity` units of `product`, merging into an existing line
    /// for the same product.
    ///
    /// Anonymous adds never fail: the list is mutated in memory and
    /// persisted best-effort. Authenticated adds write through to the
    /// database and reload the cart whether or not the write succeeded; a
    /// failed write additionally raises an error notification.
    pub async fn add_to_cart(&mut self, product: &ProductModel, quantity: i32) -> Result<()> {
        if self.identity.is_none() {
            if let Some(entry) = self.items.iter_mut().find(|e| e.product.id == product.id) {
                entry.quantity += quantity;
            } else {
                self.items.push(CartEntry {
                    id: Utc::now().timestamp_millis(),
                    product: product.clone(),
                    quantity,
                });
            }
            self.persist_local();
            self.notifier
                .notify(NotificationKind::Success, "Cart", "Product added to cart");
            return Ok(());
        }

        self.phase = SyncPhase::Mutating;
        self.loading = true;
        let outcome = self.merge_remote_line(product.id, quantity).await;
        self.phase = SyncPhase::Reconciling;
        let reload = self.load_remote().await;
        self.loading = false;
        self.phase = SyncPhase::Idle;

        match outcome {
            Ok(()) => {
                self.notifier
                    .notify(NotificationKind::Success, "Cart", "Product added to cart");
                reload
            }
            Err(e) => {
                error!("Failed to add product {} to cart: {e}", product.id);
                self.notifier.notify(
                    NotificationKind::Error,
                    "Cart",
                    "Could not add the product to your cart",
                );
                Err(e)
            }
        }
    }

    async fn merge_remote_line(&self, product_id: i64, quantity: i32) -> Result<()> {
        let Some(user) = self.identity.as_ref() else {
            return Ok(());
        };
        let existing = CartItem::find()
            .filter(cart_item::Column::UserId.eq(user.id.as_str()))
            .filter(cart_item::Column::ProductId.eq(product_id))
            .one(&self.db)
            .await?;

        if let Some(row) = existing {
            let merged = row.quantity + quantity;
            let mut active: cart_item::ActiveModel = row.into();
            active.quantity = Set(merged);
            active.update(&self.db).await?;
        } else {
            cart_item::ActiveModel {
                user_id: Set(user.id.clone()),
                product_id: Set(product_id),
                quantity: Set(quantity),
                ..Default::default()
            }
            .insert(&self.db)
            .await?;
        }
        Ok(())
    }

    /// Sets the quantity of the line for `product_id`. A quantity of zero
    /// or less removes the line instead.
    pub async fn update_quantity(&mut self, product_id: i64, quantity: i32) -> Result<()> {
        if quantity <= 0 {
            return self.remove_from_cart(product_id).await;
        }

        let Some(user_id) = self.identity.as_ref().map(|u| u.id.clone()) else {
            if let Some(entry) = self.items.iter_mut().find(|e| e.product.id == product_id) {
                entry.quantity = quantity;
            }
            self.persist_local();
            return Ok(());
        };

        self.phase = SyncPhase::Mutating;
        self.loading = true;
        let outcome = CartItem::update_many()
            .col_expr(cart_item::Column::Quantity, Expr::value(quantity))
            .filter(cart_item::Column::UserId.eq(user_id))
            .filter(cart_item::Column::ProductId.eq(product_id))
            .exec(&self.db)
            .await;
        self.phase = SyncPhase::Reconciling;
        let reload = self.load_remote().await;
        self.loading = false;
        self.phase = SyncPhase::Idle;

        match outcome {
            Ok(_) => reload,
            Err(e) => {
                error!("Failed to update quantity for product {product_id}: {e}");
                self.notifier.notify(
                    NotificationKind::Error,
                    "Cart",
                    "Could not update the quantity",
                );
                Err(e.into())
            }
        }
    }

    /// Removes the line for `product_id`, if present.
    pub async fn remove_from_cart(&mut self, product_id: i64) -> Result<()> {
        let Some(user_id) = self.identity.as_ref().map(|u| u.id.clone()) else {
            self.items.retain(|e| e.product.id != product_id);
            self.persist_local();
            return Ok(());
        };

        self.phase = SyncPhase::Mutating;
        self.loading = true;
        let outcome = CartItem::delete_many()
            .filter(cart_item::Column::UserId.eq(user_id))
            .filter(cart_item::Column::ProductId.eq(product_id))
            .exec(&self.db)
            .await;
        self.phase = SyncPhase::Reconciling;
        let reload = self.load_remote().await;
        self.loading = false;
        self.phase = SyncPhase::Idle;

        match outcome {
            Ok(_) => reload,
            Err(e) => {
                error!("Failed to remove product {product_id} from cart: {e}");
                self.notifier.notify(
                    NotificationKind::Error,
                    "Cart",
                    "Could not remove the product",
                );
                Err(e.into())
            }
        }
    }

    /// Empties the cart.
    pub async fn clear_cart(&mut self) -> Result<()> {
        let Some(user_id) = self.identity.as_ref().map(|u| u.id.clone()) else {
            self.items.clear();
            self.local.remove(CART_KEY);
            return Ok(());
        };

        self.phase = SyncPhase::Mutating;
        self.loading = true;
        let outcome = CartItem::delete_many()
            .filter(cart_item::Column::UserId.eq(user_id))
            .exec(&self.db)
            .await;
        self.loading = false;
        self.phase = SyncPhase::Idle;

        match outcome {
            Ok(_) => {
                self.items.clear();
                Ok(())
            }
            Err(e) => {
                error!("Failed to clear cart: {e}");
                self.notifier
                    .notify(NotificationKind::Error, "Cart", "Could not clear your cart");
                Err(e.into())
            }
        }
    }

    /// The current cart lines, in insertion order.
    #[must_use]
    pub fn items(&self) -> &[CartEntry] {
        &self.items
    }

    /// Order subtotal: sum of price times quantity over all lines,
    /// recomputed on every call.
    #[must_use]
    pub fn total(&self) -> f64 {
        self.items
            .iter()
            .map(|e| e.product.price * f64::from(e.quantity))
            .sum()
    }

    /// Total number of units across all lines.
    #[must_use]
    pub fn item_count(&self) -> i32 {
        self.items.iter().map(|e| e.quantity).sum()
    }

    /// Whether a remote operation is in flight.
    #[must_use]
    pub const fn is_loading(&self) -> bool {
        self.loading
    }

    /// Current reconciliation phase.
    #[must_use]
    pub const fn phase(&self) -> SyncPhase {
        self.phase
    }
}
