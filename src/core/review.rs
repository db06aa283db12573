//! Review business logic - per-product aggregation and submission.
//!
//! Reviews are cached per product, most recent first. The rating summary is
//! derived from the cached list on every call; no running average is
//! maintained. Submissions upsert on (product, user) so a shopper's second
//! review replaces the first. The helpful counter is bumped optimistically
//! in the cache, then written as `fetched value + 1` and reconciled by a
//! reload; two viewers bumping concurrently can settle on a single
//! increment, a race that lives in the storage contract rather than here.

use crate::entities::{Product, ProductReview, ProductReviewModel, product_review};
use crate::errors::{Error, Result};
use crate::session::Identity;
use chrono::Utc;
use sea_orm::sea_query::OnConflict;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder, Set,
};
use std::collections::HashMap;

/// Aggregated rating summary for a product.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ReviewSummary {
    /// Mean rating rounded to one decimal place, 0.0 with no reviews
    pub average: f64,
    /// Number of approved reviews
    pub count: usize,
}

/// Caches reviews per product and handles submission and helpful votes.
#[derive(Debug)]
pub struct ReviewService {
    db: DatabaseConnection,
    identity: Option<Identity>,
    by_product: HashMap<i64, Vec<ProductReviewModel>>,
    loading: bool,
}

impl ReviewService {
    /// Creates the service over the given database connection.
    #[must_use]
    pub fn new(db: DatabaseConnection) -> Self {
        Self {
            db,
            identity: None,
            by_product: HashMap::new(),
            loading: false,
        }
    }

    /// Switches the submitting shopper. The cached reviews are shared
    /// across shoppers and are not reloaded on auth changes.
    pub fn set_identity(&mut self, identity: Option<Identity>) {
        self.identity = identity;
    }

    /// Loads a product's approved reviews, most recent first, into the
    /// cache.
    pub async fn load_reviews(&mut self, product_id: i64) -> Result<()> {
        self.loading = true;
        let result = ProductReview::find()
            .filter(product_review::Column::ProductId.eq(product_id))
            .filter(product_review::Column::IsApproved.eq(true))
            .order_by_desc(product_review::Column::CreatedAt)
            .all(&self.db)
            .await;
        self.loading = false;
        self.by_product.insert(product_id, result?);
        Ok(())
    }

    /// Re-fetches a product's reviews.
    pub async fn refresh_reviews(&mut self, product_id: i64) -> Result<()> {
        self.load_reviews(product_id).await
    }

    /// The cached reviews for a product, most recent first. Empty when the
    /// product has not been loaded.
    #[must_use]
    pub fn reviews(&self, product_id: i64) -> &[ProductReviewModel] {
        self.by_product
            .get(&product_id)
            .map_or(&[], Vec::as_slice)
    }

    /// Derives the rating summary from the cached list.
    #[must_use]
    pub fn summary(&self, product_id: i64) -> ReviewSummary {
        let reviews = self.reviews(product_id);
        let count = reviews.len();
        if count == 0 {
            return ReviewSummary {
                average: 0.0,
                count: 0,
            };
        }
        let sum: i64 = reviews.iter().map(|r| i64::from(r.rating)).sum();
        #[allow(clippy::cast_precision_loss)] // Review counts are small
        let average = sum as f64 / count as f64;
        ReviewSummary {
            average: (average * 10.0).round() / 10.0,
            count,
        }
    }

    /// Submits a review for `product_id`, replacing any earlier review by
    /// the same shopper.
    ///
    /// Requires a signed-in shopper; the caller is responsible for keeping
    /// the rating in range before submission. Submitted reviews are
    /// approved immediately and never marked as verified purchases.
    pub async fn submit_review(
        &mut self,
        product_id: i64,
        rating: i32,
        title: Option<String>,
        comment: Option<String>,
    ) -> Result<()> {
        let Some(user) = self.identity.clone() else {
            return Err(Error::NotAuthenticated);
        };

        let exists = Product::find_by_id(product_id).one(&self.db).await?;
        if exists.is_none() {
            return Err(Error::ProductNotFound { id: product_id });
        }

        let now = Utc::now();
        let review = product_review::ActiveModel {
            product_id: Set(product_id),
            user_id: Set(user.id),
            rating: Set(rating),
            title: Set(title),
            comment: Set(comment),
            is_verified_purchase: Set(false),
            is_approved: Set(true),
            helpful_count: Set(0),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        };

        ProductReview::insert(review)
            .on_conflict(
                OnConflict::columns([
                    product_review::Column::ProductId,
                    product_review::Column::UserId,
                ])
                .update_columns([
                    product_review::Column::Rating,
                    product_review::Column::Title,
                    product_review::Column::Comment,
                    product_review::Column::IsVerifiedPurchase,
                    product_review::Column::IsApproved,
                    product_review::Column::UpdatedAt,
                ])
                .to_owned(),
            )
            .exec(&self.db)
            .await?;

        self.load_reviews(product_id).await
    }

    /// Marks a review as helpful.
    ///
    /// The cached copy is bumped immediately so the UI renders before the
    /// write confirms; the write stores `fetched value + 1` and the
    /// product's reviews are then reloaded to reconcile with server truth.
    pub async fn increment_helpful(&mut self, review_id: i64) -> Result<()> {
        for reviews in self.by_product.values_mut() {
            if let Some(review) = reviews.iter_mut().find(|r| r.id == review_id) {
                review.helpful_count += 1;
                break;
            }
        }

        let current = ProductReview::find_by_id(review_id)
            .one(&self.db)
            .await?
            .ok_or(Error::ReviewNotFound { id: review_id })?;

        let product_id = current.product_id;
        let bumped = current.helpful_count + 1;
        let mut active: product_review::ActiveModel = current.into();
        active.helpful_count = Set(bumped);
        active.update(&self.db).await?;

        self.load_reviews(product_id).await
    }

    /// Whether a load is in flight.
    #[must_use]
    pub const fn is_loading(&self) -> bool {
        self.loading
    }
}
