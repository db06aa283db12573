//! Order business logic - assembly at checkout and order history.
//!
//! Creating an order writes the header row and then the line rows as two
//! separate inserts. A failure between the two leaves the header in place
//! with no compensating delete; the partial order surfaces in history and
//! is resolved by the store operator. Status updates write remote first and
//! then patch the cached copy, so a failed update leaves the cache on the
//! last confirmed status.

use crate::core::SyncPhase;
use crate::core::cart::CartEntry;
use crate::core::notifications::{NotificationKind, Notifier};
use crate::entities::{
    Address, Order, OrderItem, OrderModel, OrderStatus, PaymentStatus, Product, ProductModel,
    order, order_item,
};
use crate::errors::{Error, Result};
use crate::session::Identity;
use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder, Set,
};
use tracing::error;

/// A persisted order line joined with its product, when the product still
/// exists.
#[derive(Debug, Clone, PartialEq)]
pub struct OrderLine {
    /// The stored line row
    pub item: order_item::Model,
    /// The product the line refers to
    pub product: Option<ProductModel>,
}

/// An order header with its line items, as shown in order history.
#[derive(Debug, Clone, PartialEq)]
pub struct OrderRecord {
    /// The stored header row
    pub order: OrderModel,
    /// The order's lines, with product summaries
    pub items: Vec<OrderLine>,
}

/// A draft line for checkout submission.
#[derive(Debug, Clone, PartialEq)]
pub struct NewOrderItem {
    /// The purchased product
    pub product_id: i64,
    /// Units purchased
    pub quantity: i32,
    /// Unit price at checkout time
    pub unit_price: f64,
    /// `unit_price * quantity`, computed by the caller
    pub total_price: f64,
}

impl NewOrderItem {
    /// Builds a draft line from a cart line, freezing the snapshot price.
    #[must_use]
    pub fn from_cart_entry(entry: &CartEntry) -> Self {
        Self {
            product_id: entry.product.id,
            quantity: entry.quantity,
            unit_price: entry.product.price,
            total_price: entry.product.price * f64::from(entry.quantity),
        }
    }
}

/// A draft order as assembled by the checkout flow.
#[derive(Debug, Clone)]
pub struct NewOrder {
    /// Initial fulfilment status, normally [`OrderStatus::Pending`]
    pub status: OrderStatus,
    /// Grand total: line totals minus discount plus shipping
    pub total_amount: f64,
    /// Discount granted by the applied coupon, zero when none
    pub discount_amount: f64,
    /// Shipping cost charged
    pub shipping_cost: f64,
    /// Code of the applied coupon, if any
    pub coupon_code: Option<String>,
    /// Destination address
    pub shipping_address: Address,
    /// Billing address when it differs from the shipping one
    pub billing_address: Option<Address>,
    /// Chosen payment method
    pub payment_method: Option<String>,
    /// Initial payment state
    pub payment_status: PaymentStatus,
    /// Free-form customer notes
    pub notes: Option<String>,
    /// The order's lines
    pub items: Vec<NewOrderItem>,
}

/// Assembles orders at checkout and exposes order history.
#[derive(Debug)]
pub struct OrderService {
    db: DatabaseConnection,
    notifier: Notifier,
    identity: Option<Identity>,
    orders: Vec<OrderRecord>,
    phase: SyncPhase,
    loading: bool,
}

impl OrderService {
    /// Creates the service over the given database connection.
    #[must_use]
    pub const fn new(db: DatabaseConnection, notifier: Notifier) -> Self {
        Self {
            db,
            notifier,
            identity: None,
            orders: Vec::new(),
            phase: SyncPhase::Idle,
            loading: false,
        }
    }

    /// Switches the owning shopper and reloads their order history; an
    /// anonymous session has no history.
    pub async fn set_identity(&mut self, identity: Option<Identity>) -> Result<()> {
        self.identity = identity;
        self.load_orders().await
    }

    /// Loads the shopper's order history, newest first, with line items
    /// and product summaries.
    pub async fn load_orders(&mut self) -> Result<()> {
        let Some(user_id) = self.identity.as_ref().map(|u| u.id.clone()) else {
            self.orders.clear();
            return Ok(());
        };

        self.loading = true;
        let result = self.fetch_orders(&user_id).await;
        self.loading = false;
        match result {
            Ok(orders) => {
                self.orders = orders;
                Ok(())
            }
            Err(e) => {
                error!("Failed to load order history: {e}");
                self.notifier.add_error("Failed to load order history");
                Err(e)
            }
        }
    }

    async fn fetch_orders(&self, user_id: &str) -> Result<Vec<OrderRecord>> {
        let headers = Order::find()
            .filter(order::Column::UserId.eq(user_id))
            .order_by_desc(order::Column::CreatedAt)
            .all(&self.db)
            .await?;

        let mut orders = Vec::with_capacity(headers.len());
        for header in headers {
            let items = OrderItem::find()
                .filter(order_item::Column::OrderId.eq(header.id))
                .find_also_related(Product)
                .all(&self.db)
                .await?
                .into_iter()
                .map(|(item, product)| OrderLine { item, product })
                .collect();
            orders.push(OrderRecord {
                order: header,
                items,
            });
        }
        Ok(orders)
    }

    /// Persists a draft order: one header row, then one row per line.
    ///
    /// Requires a signed-in shopper. If inserting the lines fails the
    /// already-written header is not rolled back. On success the history
    /// is reloaded and a confirmation is raised.
    pub async fn create_order(&mut self, draft: NewOrder) -> Result<OrderModel> {
        let Some(user) = self.identity.clone() else {
            self.notifier.add_error("User is not authenticated");
            return Err(Error::NotAuthenticated);
        };

        self.phase = SyncPhase::Mutating;
        let outcome = self.insert_order(&user, draft).await;
        match outcome {
            Ok(header) => {
                self.phase = SyncPhase::Reconciling;
                let reload = self.load_orders().await;
                self.phase = SyncPhase::Idle;
                reload?;
                self.notifier.notify(
                    NotificationKind::Success,
                    "Order created",
                    &format!("Order #{} was created successfully", header.id),
                );
                Ok(header)
            }
            Err(e) => {
                self.phase = SyncPhase::Idle;
                error!("Failed to create order: {e}");
                self.notifier.add_error("Failed to create the order");
                Err(e)
            }
        }
    }

    async fn insert_order(&self, user: &Identity, draft: NewOrder) -> Result<OrderModel> {
        let now = Utc::now();
        let header = order::ActiveModel {
            user_id: Set(user.id.clone()),
            status: Set(draft.status),
            total_amount: Set(draft.total_amount),
            discount_amount: Set(draft.discount_amount),
            shipping_cost: Set(draft.shipping_cost),
            coupon_code: Set(draft.coupon_code),
            shipping_address: Set(draft.shipping_address),
            billing_address: Set(draft.billing_address),
            payment_method: Set(draft.payment_method),
            payment_status: Set(draft.payment_status),
            notes: Set(draft.notes),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        }
        .insert(&self.db)
        .await?;

        if !draft.items.is_empty() {
            OrderItem::insert_many(draft.items.into_iter().map(|line| order_item::ActiveModel {
                order_id: Set(header.id),
                product_id: Set(line.product_id),
                quantity: Set(line.quantity),
                unit_price: Set(line.unit_price),
                total_price: Set(line.total_price),
                ..Default::default()
            }))
            .exec(&self.db)
            .await?;
        }

        Ok(header)
    }

    /// Updates an order's fulfilment status: remote write first, then an
    /// optimistic patch of the cached copy. A failed write leaves the
    /// cache on the last confirmed status.
    pub async fn update_order_status(&mut self, order_id: i64, status: OrderStatus) -> Result<()> {
        let header = Order::find_by_id(order_id)
            .one(&self.db)
            .await?
            .ok_or(Error::OrderNotFound { id: order_id })?;

        let now = Utc::now();
        let mut active: order::ActiveModel = header.into();
        active.status = Set(status);
        active.updated_at = Set(now);

        match active.update(&self.db).await {
            Ok(_) => {
                if let Some(record) = self.orders.iter_mut().find(|r| r.order.id == order_id) {
                    record.order.status = status;
                    record.order.updated_at = now;
                }
                self.notifier.notify(
                    NotificationKind::Info,
                    "Status updated",
                    &format!("Order status was updated to {status}"),
                );
                Ok(())
            }
            Err(e) => {
                error!("Failed to update status of order {order_id}: {e}");
                self.notifier.add_error("Failed to update the order status");
                Err(e.into())
            }
        }
    }

    /// Looks up an order in the cached history.
    #[must_use]
    pub fn get_order(&self, order_id: i64) -> Option<&OrderRecord> {
        self.orders.iter().find(|r| r.order.id == order_id)
    }

    /// The cached order history, newest first.
    #[must_use]
    pub fn orders(&self) -> &[OrderRecord] {
        &self.orders
    }

    /// Re-fetches the order history.
    pub async fn refresh_orders(&mut self) -> Result<()> {
        self.load_orders().await
    }

    /// Whether a load or mutation is in flight.
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
