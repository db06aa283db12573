//! Wishlist business logic - saved products across sessions.
//!
//! Mirrors the cart's split between the local store (anonymous) and the
//! database (authenticated), with one difference: at most one entry per
//! product per owner, so duplicate adds are no-ops. Authenticated adds
//! re-fetch the list after the insert rather than appending an optimistic
//! entry with a made-up row id.

use crate::core::SyncPhase;
use crate::core::notifications::{NotificationKind, Notifier};
use crate::entities::{Product, ProductModel, Wishlist, wishlist};
use crate::errors::Result;
use crate::local_store::{LocalStore, WISHLIST_KEY};
use crate::session::Identity;
use chrono::{DateTime, Utc};
use sea_orm::{ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, Set};
use serde::{Deserialize, Serialize};
use tracing::error;

/// A saved product with an owned snapshot, like a cart line.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WishlistEntry {
    /// Row id for authenticated wishlists, a locally-generated millisecond
    /// timestamp for anonymous ones
    pub id: i64,
    /// Snapshot of the product when it was saved
    pub product: ProductModel,
    /// When the product was saved
    pub created_at: DateTime<Utc>,
}

/// Owns the wishlist and switches between the local store (anonymous) and
/// the database (authenticated).
#[derive(Debug)]
pub struct WishlistService {
    db: DatabaseConnection,
    local: LocalStore,
    notifier: Notifier,
    identity: Option<Identity>,
    items: Vec<WishlistEntry>,
    phase: SyncPhase,
    loading: bool,
}

impl WishlistService {
    /// Creates an anonymous wishlist service. Call
    /// [`WishlistService::reload`] to pick up a persisted anonymous
    /// wishlist.
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
    /// the matching source of truth. Like the cart, the anonymous wishlist
    /// is not merged into the remote one on login.
    pub async fn set_identity(&mut self, identity: Option<Identity>) -> Result<()> {
        self.identity = identity;
        self.reload().await
    }

    /// Reloads the list from the current source of truth.
    pub async fn reload(&mut self) -> Result<()> {
        if self.identity.is_some() {
            self.load_remote().await
        } else {
            self.items = self.local.read(WISHLIST_KEY).unwrap_or_default();
            Ok(())
        }
    }

    async fn load_remote(&mut self) -> Result<()> {
        let Some(user_id) = self.identity.as_ref().map(|u| u.id.clone()) else {
            return Ok(());
        };
        self.loading = true;
        let result = Wishlist::find()
            .filter(wishlist::Column::UserId.eq(user_id))
            .find_also_related(Product)
            .all(&self.db)
            .await;
        self.loading = false;
        let rows = result?;
        self.items = rows
            .into_iter()
            .filter_map(|(row, product)| {
                product.map(|product| WishlistEntry {
                    id: row.id,
                    product,
                    created_at: row.created_at,
                })
            })
            .collect();
        Ok(())
    }

    fn persist_local(&self) {
        self.local.write(WISHLIST_KEY, &self.items);
    }

    /// Saves `product` to the wishlist. Saving a product that is already
    /// on the list is a no-op.
    pub async fn add_to_wishlist(&mut self, product: &ProductModel) -> Result<()> {
        if self.is_in_wishlist(product.id) {
            return Ok(());
        }

        if self.identity.is_none() {
            self.items.push(WishlistEntry {
                id: Utc::now().timestamp_millis(),
                product: product.clone(),
                created_at: Utc::now(),
            });
            self.persist_local();
            self.notifier.notify(
                NotificationKind::Success,
                "Wishlist",
                &format!("{} was added to your wishlist", product.name),
            );
            return Ok(());
        }

        self.phase = SyncPhase::Mutating;
        let outcome = self.insert_remote(product.id).await;
        self.phase = SyncPhase::Reconciling;
        let reload = self.load_remote().await;
        self.phase = SyncPhase::Idle;

        match outcome {
            Ok(()) => {
                self.notifier.notify(
                    NotificationKind::Success,
                    "Wishlist",
                    &format!("{} was added to your wishlist", product.name),
                );
                reload
            }
            Err(e) => {
                error!("Failed to add product {} to wishlist: {e}", product.id);
                self.notifier
                    .add_error("Could not add the product to your wishlist");
                Err(e)
            }
        }
    }

    async fn insert_remote(&self, product_id: i64) -> Result<()> {
        let Some(user) = self.identity.as_ref() else {
            return Ok(());
        };
        wishlist::ActiveModel {
            user_id: Set(user.id.clone()),
            product_id: Set(product_id),
            created_at: Set(Utc::now()),
            ..Default::default()
        }
        .insert(&self.db)
        .await?;
        Ok(())
    }

    /// Removes the entry for `product_id`, if present.
    pub async fn remove_from_wishlist(&mut self, product_id: i64) -> Result<()> {
        if !self.is_in_wishlist(product_id) {
            return Ok(());
        }

        if let Some(user_id) = self.identity.as_ref().map(|u| u.id.clone()) {
            self.phase = SyncPhase::Mutating;
            let outcome = Wishlist::delete_many()
                .filter(wishlist::Column::UserId.eq(user_id))
                .filter(wishlist::Column::ProductId.eq(product_id))
                .exec(&self.db)
                .await;
            self.phase = SyncPhase::Idle;
            if let Err(e) = outcome {
                error!("Failed to remove product {product_id} from wishlist: {e}");
                self.notifier
                    .add_error("Could not remove the product from your wishlist");
                return Err(e.into());
            }
        }

        self.items.retain(|e| e.product.id != product_id);
        if self.identity.is_none() {
            self.persist_local();
        }
        self.notifier.notify(
            NotificationKind::Info,
            "Wishlist",
            "Product removed from your wishlist",
        );
        Ok(())
    }

    /// Empties the wishlist.
    pub async fn clear_wishlist(&mut self) -> Result<()> {
        let Some(user_id) = self.identity.as_ref().map(|u| u.id.clone()) else {
            self.items.clear();
            self.local.remove(WISHLIST_KEY);
            return Ok(());
        };

        self.phase = SyncPhase::Mutating;
        let outcome = Wishlist::delete_many()
            .filter(wishlist::Column::UserId.eq(user_id))
            .exec(&self.db)
            .await;
        self.phase = SyncPhase::Idle;

        match outcome {
            Ok(_) => {
                self.items.clear();
                Ok(())
            }
            Err(e) => {
                error!("Failed to clear wishlist: {e}");
                self.notifier.add_error("Could not clear your wishlist");
                Err(e.into())
            }
        }
    }

    /// Whether `product_id` is on the wishlist.
    #[must_use]
    pub fn is_in_wishlist(&self, product_id: i64) -> bool {
        self.items.iter().any(|e| e.product.id == product_id)
    }

    /// The saved entries, in insertion order.
    #[must_use]
    pub fn items(&self) -> &[WishlistEntry] {
        &self.items
    }

    /// Number of saved products.
    #[must_use]
    pub fn item_count(&self) -> usize {
        self.items.len()
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

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    use super::*;
    use crate::local_store::LocalStore;
    use crate::test_utils::{
        anonymous_wishlist, create_test_product, setup_test_db, test_identity, test_notifier,
    };

    #[tokio::test]
    async fn test_anonymous_add_is_deduplicated() -> Result<()> {
        let db = setup_test_db().await?;
        let shoe = create_test_product(&db, "Red Shoe", 50.0, "Shoes").await?;
        let (_dir, mut wishlist) = anonymous_wishlist(db);

        wishlist.add_to_wishlist(&shoe).await?;
        wishlist.add_to_wishlist(&shoe).await?;

        assert_eq!(wishlist.item_count(), 1);
        assert!(wishlist.is_in_wishlist(shoe.id));
        Ok(())
    }

    #[tokio::test]
    async fn test_anonymous_wishlist_round_trips_through_local_store() -> Result<()> {
        let db = setup_test_db().await?;
        let shoe = create_test_product(&db, "Red Shoe", 50.0, "Shoes").await?;
        let (dir, mut wishlist) = anonymous_wishlist(db.clone());

        wishlist.add_to_wishlist(&shoe).await?;

        let mut restored =
            WishlistService::new(db, LocalStore::new(dir.path()), test_notifier());
        restored.reload().await?;
        assert_eq!(restored.items(), wishlist.items());
        Ok(())
    }

    #[tokio::test]
    async fn test_authenticated_add_remove_clear() -> Result<()> {
        let db = setup_test_db().await?;
        let shoe = create_test_product(&db, "Red Shoe", 50.0, "Shoes").await?;
        let hat = create_test_product(&db, "Blue Hat", 20.0, "Hats").await?;
        let (_dir, mut wishlist) = anonymous_wishlist(db.clone());
        wishlist.set_identity(Some(test_identity())).await?;

        wishlist.add_to_wishlist(&shoe).await?;
        wishlist.add_to_wishlist(&hat).await?;
        wishlist.add_to_wishlist(&shoe).await?; // duplicate: no-op
        assert_eq!(wishlist.item_count(), 2);
        assert_eq!(Wishlist::find().all(&db).await?.len(), 2);

        // Entries carry the database row ids after the reconciling reload
        let rows = Wishlist::find().all(&db).await?;
        let row_ids: Vec<i64> = rows.iter().map(|r| r.id).collect();
        assert!(wishlist.items().iter().all(|e| row_ids.contains(&e.id)));

        wishlist.remove_from_wishlist(shoe.id).await?;
        assert!(!wishlist.is_in_wishlist(shoe.id));
        assert_eq!(Wishlist::find().all(&db).await?.len(), 1);

        wishlist.clear_wishlist().await?;
        assert_eq!(wishlist.item_count(), 0);
        assert_eq!(Wishlist::find().all(&db).await?.len(), 0);
        Ok(())
    }

    #[tokio::test]
    async fn test_login_switches_to_remote_wishlist() -> Result<()> {
        let db = setup_test_db().await?;
        let shoe = create_test_product(&db, "Red Shoe", 50.0, "Shoes").await?;
        let (_dir, mut wishlist) = anonymous_wishlist(db);

        wishlist.add_to_wishlist(&shoe).await?;
        assert_eq!(wishlist.item_count(), 1);

        wishlist.set_identity(Some(test_identity())).await?;
        assert_eq!(wishlist.item_count(), 0);

        wishlist.set_identity(None).await?;
        assert_eq!(wishlist.item_count(), 1);
        Ok(())
    }

    #[tokio::test]
    async fn test_remove_missing_product_is_a_no_op() -> Result<()> {
        let db = setup_test_db().await?;
        let (_dir, mut wishlist) = anonymous_wishlist(db);
        wishlist.remove_from_wishlist(42).await?;
        assert_eq!(wishlist.item_count(), 0);
        Ok(())
    }
}
