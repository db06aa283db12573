//! Coupon business logic - validation, discount arithmetic, application.
//!
//! Validation runs a fixed sequence of checks against the stored coupon:
//! active code match, validity window, minimum order amount, usage cap.
//! Applying a coupon re-validates and then bumps `used_count` by one with a
//! read-then-write; the read value comes from the row fetched during
//! validation, so two concurrent applications can settle on a single
//! increment. Fixing that requires an atomic counter in the storage layer,
//! since the race spans sessions, not tasks.

use crate::core::notifications::Notifier;
use crate::entities::{Coupon, CouponModel, DiscountKind, coupon};
use crate::errors::Result;
use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder, Set,
};
use thiserror::Error;

/// Why a coupon code was rejected. The display strings are shown to the
/// shopper as-is.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum CouponRejection {
    /// Empty or whitespace-only code
    #[error("Coupon code is required")]
    CodeRequired,
    /// No active coupon matches the code
    #[error("Coupon not found or invalid")]
    NotFound,
    /// The validity window has not opened yet
    #[error("Coupon is not valid yet")]
    NotYetValid,
    /// The validity window has closed
    #[error("Coupon has expired")]
    Expired,
    /// The order subtotal is below the coupon's minimum
    #[error("Minimum order amount: R$ {minimum:.2}")]
    BelowMinimum {
        /// The coupon's minimum order amount
        minimum: f64,
    },
    /// The usage cap has been reached
    #[error("Coupon usage limit reached")]
    Exhausted,
}

/// Outcome of validating a coupon code against an order subtotal.
#[derive(Debug, Clone, PartialEq)]
pub enum CouponValidation {
    /// The coupon applies; `discount` is the subtotal reduction
    Accepted {
        /// The matched coupon row
        coupon: CouponModel,
        /// Discount amount computed by [`calculate_discount`]
        discount: f64,
    },
    /// The coupon does not apply
    Rejected(CouponRejection),
}

impl CouponValidation {
    /// Whether the coupon applies.
    #[must_use]
    pub const fn is_valid(&self) -> bool {
        matches!(self, Self::Accepted { .. })
    }
}

/// Computes the discount a coupon grants on an order subtotal.
///
/// A fixed-amount discount never exceeds the subtotal. Free shipping
/// contributes no subtotal discount; the shipping waiver is applied where
/// shipping is priced.
#[must_use]
pub fn calculate_discount(coupon: &CouponModel, order_amount: f64) -> f64 {
    match coupon.kind {
        DiscountKind::Percentage => order_amount * coupon.value / 100.0,
        DiscountKind::FixedAmount => coupon.value.min(order_amount),
        DiscountKind::FreeShipping => 0.0,
    }
}

/// Validates and applies coupons, and caches the active campaign list.
#[derive(Debug)]
pub struct CouponService {
    db: DatabaseConnection,
    notifier: Notifier,
    coupons: Vec<CouponModel>,
    loading: bool,
}

impl CouponService {
    /// Creates the service over the given database connection.
    #[must_use]
    pub const fn new(db: DatabaseConnection, notifier: Notifier) -> Self {
        Self {
            db,
            notifier,
            coupons: Vec::new(),
            loading: false,
        }
    }

    /// Loads the active coupon campaigns, newest first.
    pub async fn load_coupons(&mut self) -> Result<()> {
        self.loading = true;
        let result = Coupon::find()
            .filter(coupon::Column::IsActive.eq(true))
            .order_by_desc(coupon::Column::CreatedAt)
            .all(&self.db)
            .await;
        self.loading = false;
        match result {
            Ok(coupons) => {
                self.coupons = coupons;
                Ok(())
            }
            Err(e) => {
                self.notifier.add_error("Failed to load coupons");
                Err(e.into())
            }
        }
    }

    /// Re-fetches the active campaign list.
    pub async fn refresh_coupons(&mut self) -> Result<()> {
        self.load_coupons().await
    }

    /// The cached active campaigns, newest first.
    #[must_use]
    pub fn coupons(&self) -> &[CouponModel] {
        &self.coupons
    }

    /// Whether a load is in flight.
    #[must_use]
    pub const fn is_loading(&self) -> bool {
        self.loading
    }

    /// Validates `code` against an order subtotal without consuming a use.
    ///
    /// Matching is case-insensitive: codes are stored uppercase and the
    /// input is uppercased before the lookup. Only database failures are
    /// returned as errors; every business outcome is a [`CouponValidation`].
    pub async fn validate_coupon(&self, code: &str, order_amount: f64) -> Result<CouponValidation> {
        let code = code.trim();
        if code.is_empty() {
            return Ok(CouponValidation::Rejected(CouponRejection::CodeRequired));
        }

        let found = Coupon::find()
            .filter(coupon::Column::Code.eq(code.to_uppercase()))
            .filter(coupon::Column::IsActive.eq(true))
            .one(&self.db)
            .await?;

        let Some(coupon) = found else {
            return Ok(CouponValidation::Rejected(CouponRejection::NotFound));
        };

        let now = Utc::now();
        if now < coupon.valid_from {
            return Ok(CouponValidation::Rejected(CouponRejection::NotYetValid));
        }
        if let Some(valid_until) = coupon.valid_until
            && now > valid_until
        {
            return Ok(CouponValidation::Rejected(CouponRejection::Expired));
        }

        if order_amount < coupon.minimum_order_amount {
            return Ok(CouponValidation::Rejected(CouponRejection::BelowMinimum {
                minimum: coupon.minimum_order_amount,
            }));
        }

        if let Some(limit) = coupon.usage_limit
            && coupon.used_count >= limit
        {
            return Ok(CouponValidation::Rejected(CouponRejection::Exhausted));
        }

        let discount = calculate_discount(&coupon, order_amount);
        Ok(CouponValidation::Accepted { coupon, discount })
    }

    /// Validates `code` and, when it applies, consumes one use.
    ///
    /// The `used_count` bump writes `fetched value + 1` rather than issuing
    /// an atomic increment, matching the storage contract available to the
    /// storefront.
    pub async fn apply_coupon(&self, code: &str, order_amount: f64) -> Result<CouponValidation> {
        let validation = self.validate_coupon(code, order_amount).await?;

        if let CouponValidation::Accepted { coupon, .. } = &validation {
            let mut active: coupon::ActiveModel = coupon.clone().into();
            active.used_count = Set(coupon.used_count + 1);
            active.updated_at = Set(Utc::now());
            active.update(&self.db).await?;
        }

        Ok(validation)
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    #![allow(clippy::float_cmp)]
    use super::*;
    use crate::test_utils::{
        create_custom_coupon, create_test_coupon, setup_test_db, test_notifier,
    };
    use chrono::Duration;

    fn coupon_of_kind(kind: DiscountKind, value: f64) -> CouponModel {
        let now = Utc::now();
        CouponModel {
            id: 1,
            code: "CODE".to_string(),
            name: "Campaign".to_string(),
            description: None,
            kind,
            value,
            minimum_order_amount: 0.0,
            usage_limit: None,
            used_count: 0,
            is_active: true,
            valid_from: now,
            valid_until: None,
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn test_percentage_discount() {
        let coupon = coupon_of_kind(DiscountKind::Percentage, 10.0);
        assert_eq!(calculate_discount(&coupon, 200.0), 20.0);
    }

    #[test]
    fn test_fixed_amount_discount_never_exceeds_order_total() {
        let coupon = coupon_of_kind(DiscountKind::FixedAmount, 500.0);
        assert_eq!(calculate_discount(&coupon, 100.0), 100.0);

        let coupon = coupon_of_kind(DiscountKind::FixedAmount, 30.0);
        assert_eq!(calculate_discount(&coupon, 100.0), 30.0);
    }

    #[test]
    fn test_free_shipping_contributes_no_subtotal_discount() {
        let coupon = coupon_of_kind(DiscountKind::FreeShipping, 0.0);
        assert_eq!(calculate_discount(&coupon, 100.0), 0.0);
    }

    #[tokio::test]
    async fn test_validate_empty_code() -> Result<()> {
        let db = setup_test_db().await?;
        let service = CouponService::new(db, test_notifier());

        let validation = service.validate_coupon("   ", 100.0).await?;
        assert_eq!(
            validation,
            CouponValidation::Rejected(CouponRejection::CodeRequired)
        );
        Ok(())
    }

    #[tokio::test]
    async fn test_validate_unknown_code() -> Result<()> {
        let db = setup_test_db().await?;
        let service = CouponService::new(db, test_notifier());

        let validation = service.validate_coupon("NOPE", 100.0).await?;
        assert_eq!(
            validation,
            CouponValidation::Rejected(CouponRejection::NotFound)
        );
        Ok(())
    }

    #[tokio::test]
    async fn test_validate_matches_case_insensitively() -> Result<()> {
        let db = setup_test_db().await?;
        create_test_coupon(&db, "WELCOME10", DiscountKind::Percentage, 10.0).await?;
        let service = CouponService::new(db, test_notifier());

        let validation = service.validate_coupon("welcome10", 200.0).await?;
        match validation {
            CouponValidation::Accepted { coupon, discount } => {
                assert_eq!(coupon.code, "WELCOME10");
                assert_eq!(discount, 20.0);
            }
            CouponValidation::Rejected(reason) => panic!("unexpected rejection: {reason}"),
        }
        Ok(())
    }

    #[tokio::test]
    async fn test_validate_inactive_coupon_is_not_found() -> Result<()> {
        let db = setup_test_db().await?;
        let now = Utc::now();
        create_custom_coupon(
            &db,
            "OLD",
            DiscountKind::Percentage,
            5.0,
            0.0,
            None,
            now - Duration::days(30),
            None,
            false,
        )
        .await?;
        let service = CouponService::new(db, test_notifier());

        let validation = service.validate_coupon("OLD", 100.0).await?;
        assert_eq!(
            validation,
            CouponValidation::Rejected(CouponRejection::NotFound)
        );
        Ok(())
    }

    #[tokio::test]
    async fn test_validate_not_yet_valid() -> Result<()> {
        let db = setup_test_db().await?;
        let now = Utc::now();
        create_custom_coupon(
            &db,
            "SOON",
            DiscountKind::Percentage,
            5.0,
            0.0,
            None,
            now + Duration::days(1),
            None,
            true,
        )
        .await?;
        let service = CouponService::new(db, test_notifier());

        let validation = service.validate_coupon("SOON", 100.0).await?;
        assert_eq!(
            validation,
            CouponValidation::Rejected(CouponRejection::NotYetValid)
        );
        Ok(())
    }

    #[tokio::test]
    async fn test_validate_expired() -> Result<()> {
        let db = setup_test_db().await?;
        let now = Utc::now();
        create_custom_coupon(
            &db,
            "PAST",
            DiscountKind::Percentage,
            5.0,
            0.0,
            None,
            now - Duration::days(30),
            Some(now - Duration::days(1)),
            true,
        )
        .await?;
        let service = CouponService::new(db, test_notifier());

        let validation = service.validate_coupon("PAST", 100.0).await?;
        assert_eq!(
            validation,
            CouponValidation::Rejected(CouponRejection::Expired)
        );
        Ok(())
    }

    #[tokio::test]
    async fn test_validate_below_minimum_reports_formatted_minimum() -> Result<()> {
        let db = setup_test_db().await?;
        let now = Utc::now();
        create_custom_coupon(
            &db,
            "BIG50",
            DiscountKind::FixedAmount,
            50.0,
            150.0,
            None,
            now - Duration::days(1),
            None,
            true,
        )
        .await?;
        let service = CouponService::new(db, test_notifier());

        let validation = service.validate_coupon("BIG50", 100.0).await?;
        let CouponValidation::Rejected(reason) = validation else {
            panic!("expected a rejection");
        };
        assert_eq!(reason, CouponRejection::BelowMinimum { minimum: 150.0 });
        assert!(
            reason.to_string().contains("150.00"),
            "message must carry the minimum formatted to 2 decimals: {reason}"
        );
        Ok(())
    }

    #[tokio::test]
    async fn test_validate_exhausted() -> Result<()> {
        let db = setup_test_db().await?;
        let now = Utc::now();
        let coupon = create_custom_coupon(
            &db,
            "CAPPED",
            DiscountKind::Percentage,
            5.0,
            0.0,
            Some(3),
            now - Duration::days(1),
            None,
            true,
        )
        .await?;

        let mut active: coupon::ActiveModel = coupon.into();
        active.used_count = Set(3);
        active.update(&db).await?;

        let service = CouponService::new(db, test_notifier());
        let validation = service.validate_coupon("CAPPED", 100.0).await?;
        assert_eq!(
            validation,
            CouponValidation::Rejected(CouponRejection::Exhausted)
        );
        Ok(())
    }

    #[tokio::test]
    async fn test_apply_increments_used_count_once() -> Result<()> {
        let db = setup_test_db().await?;
        let created = create_test_coupon(&db, "WELCOME10", DiscountKind::Percentage, 10.0).await?;
        let service = CouponService::new(db.clone(), test_notifier());

        let validation = service.apply_coupon("WELCOME10", 200.0).await?;
        assert!(validation.is_valid());

        let stored = Coupon::find_by_id(created.id).one(&db).await?.unwrap();
        assert_eq!(stored.used_count, 1);
        Ok(())
    }

    #[tokio::test]
    async fn test_apply_rejected_coupon_does_not_consume_a_use() -> Result<()> {
        let db = setup_test_db().await?;
        let now = Utc::now();
        let created = create_custom_coupon(
            &db,
            "BIG50",
            DiscountKind::FixedAmount,
            50.0,
            150.0,
            None,
            now - Duration::days(1),
            None,
            true,
        )
        .await?;
        let service = CouponService::new(db.clone(), test_notifier());

        let validation = service.apply_coupon("BIG50", 100.0).await?;
        assert!(!validation.is_valid());

        let stored = Coupon::find_by_id(created.id).one(&db).await?.unwrap();
        assert_eq!(stored.used_count, 0);
        Ok(())
    }

    #[tokio::test]
    async fn test_load_coupons_caches_active_campaigns() -> Result<()> {
        let db = setup_test_db().await?;
        let now = Utc::now();
        create_test_coupon(&db, "WELCOME10", DiscountKind::Percentage, 10.0).await?;
        create_custom_coupon(
            &db,
            "RETIRED",
            DiscountKind::Percentage,
            5.0,
            0.0,
            None,
            now - Duration::days(30),
            None,
            false,
        )
        .await?;

        let mut service = CouponService::new(db, test_notifier());
        service.load_coupons().await?;

        assert_eq!(service.coupons().len(), 1);
        assert_eq!(service.coupons()[0].code, "WELCOME10");
        Ok(())
    }
}
