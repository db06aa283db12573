//! Core business logic - framework-agnostic storefront services.
//!
//! Each service is an explicit object constructed once at startup and handed
//! by reference to the consuming UI layer; there is no ambient global state.
//! Services that mutate remote rows follow the same reconciliation loop:
//! mutate, then re-fetch from the source of truth rather than trusting the
//! optimistic patch long-term.

/// Cart reconciliation across anonymous and authenticated sessions
pub mod cart;
/// Catalog loading, filtering, sorting, and debounced search
pub mod catalog;
/// Checkout message building and WhatsApp deep links
pub mod checkout;
/// Coupon validation and discount arithmetic
pub mod coupon;
/// User-facing notification and error state
pub mod notifications;
/// Order assembly and history
pub mod order;
/// Review aggregation and submission
pub mod review;
/// Wishlist handling
pub mod wishlist;

/// Reconciliation phase of a service that mutates remote state.
///
/// Mutations move the service from `Idle` to `Mutating`, then through
/// `Reconciling` while the list is re-fetched from the source of truth,
/// and back to `Idle`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SyncPhase {
    /// No operation in flight
    #[default]
    Idle,
    /// A create/update/delete has been issued
    Mutating,
    /// The mutation finished and the list is being re-fetched
    Reconciling,
}
