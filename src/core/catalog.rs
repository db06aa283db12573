//! Catalog business logic - loading, filtering, sorting, and search.
//!
//! Products are loaded once per session and every filter change re-derives
//! the visible view from the in-memory list. Search input is debounced so
//! rapid keystrokes collapse into a single filter pass using the last value
//! typed; the [`Debouncer`] works on explicit deadlines rather than timers,
//! which keeps the contract deterministic.

use crate::entities::{Product, ProductModel, product};
use crate::errors::Result;
use crate::local_store::{LocalStore, SEARCH_HISTORY_KEY};
use sea_orm::{DatabaseConnection, EntityTrait, QueryOrder};
use std::time::{Duration, Instant};

/// Ordering applied to the filtered product view.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortKey {
    /// Ascending caseless name order
    #[default]
    Name,
    /// Cheapest first
    PriceAsc,
    /// Most expensive first
    PriceDesc,
    /// Products carry no creation timestamp, so this falls back to
    /// reverse name order
    Newest,
}

/// Active catalog filters.
#[derive(Debug, Clone)]
pub struct CatalogFilter {
    /// Effective (already debounced) search term
    pub search: String,
    /// Selected category, or `"all"` for no category filter
    pub category: String,
    /// Inclusive price range
    pub price_range: (f64, f64),
    /// Ordering of the filtered view
    pub sort: SortKey,
}

impl Default for CatalogFilter {
    fn default() -> Self {
        Self {
            search: String::new(),
            category: "all".to_string(),
            price_range: (0.0, f64::MAX),
            sort: SortKey::default(),
        }
    }
}

/// Derives the filtered and ordered catalog view.
///
/// A product matches when the search term appears case-insensitively in its
/// name or description, its category equals the selected one (or the
/// selection is `"all"`), and its price falls inside the inclusive range.
#[must_use]
pub fn filter_products<'a>(
    products: &'a [ProductModel],
    filter: &CatalogFilter,
) -> Vec<&'a ProductModel> {
    let term = filter.search.trim().to_lowercase();
    let (min_price, max_price) = filter.price_range;

    let mut matched: Vec<&ProductModel> = products
        .iter()
        .filter(|p| {
            let matches_search = term.is_empty()
                || p.name.to_lowercase().contains(&term)
                || p.description.to_lowercase().contains(&term);
            let matches_category = filter.category == "all" || p.category == filter.category;
            matches_search && matches_category && p.price >= min_price && p.price <= max_price
        })
        .collect();

    match filter.sort {
        SortKey::Name => {
            matched.sort_by(|a, b| a.name.to_lowercase().cmp(&b.name.to_lowercase()));
        }
        SortKey::PriceAsc => matched.sort_by(|a, b| a.price.total_cmp(&b.price)),
        SortKey::PriceDesc => matched.sort_by(|a, b| b.price.total_cmp(&a.price)),
        SortKey::Newest => {
            matched.sort_by(|a, b| b.name.to_lowercase().cmp(&a.name.to_lowercase()));
        }
    }

    matched
}

/// Holds the product list for the session.
#[derive(Debug)]
pub struct Catalog {
    db: DatabaseConnection,
    products: Vec<ProductModel>,
    loading: bool,
}

impl Catalog {
    /// Creates a catalog over the given database connection. Call
    /// [`Catalog::load_products`] before deriving views.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self {
            db,
            products: Vec::new(),
            loading: false,
        }
    }

    /// Loads the full product list, ordered alphabetically by name.
    pub async fn load_products(&mut self) -> Result<()> {
        self.loading = true;
        let result = Product::find()
            .order_by_asc(product::Column::Name)
            .all(&self.db)
            .await;
        self.loading = false;
        self.products = result?;
        Ok(())
    }

    /// The loaded products in name order.
    #[must_use]
    pub fn products(&self) -> &[ProductModel] {
        &self.products
    }

    /// Distinct categories across the loaded products, sorted.
    #[must_use]
    pub fn categories(&self) -> Vec<String> {
        let mut categories: Vec<String> =
            self.products.iter().map(|p| p.category.clone()).collect();
        categories.sort();
        categories.dedup();
        categories
    }

    /// Whether a load is in flight.
    #[must_use]
    pub const fn is_loading(&self) -> bool {
        self.loading
    }
}

/// Collapses rapid input changes into a single value once a quiet window
/// elapses.
#[derive(Debug)]
pub struct Debouncer {
    delay: Duration,
    pending: Option<(String, Instant)>,
}

impl Debouncer {
    /// Creates a debouncer with the given quiet window.
    #[must_use]
    pub const fn new(delay: Duration) -> Self {
        Self {
            delay,
            pending: None,
        }
    }

    /// Records `value` at time `at`, restarting the quiet window. Earlier
    /// pending values are discarded unseen.
    pub fn update(&mut self, value: impl Into<String>, at: Instant) {
        self.pending = Some((value.into(), at + self.delay));
    }

    /// Yields the last recorded value once the quiet window has elapsed at
    /// time `at`. Returns `None` while the window is still open or when
    /// nothing is pending; a yielded value is consumed.
    pub fn poll(&mut self, at: Instant) -> Option<String> {
        match &self.pending {
            Some((_, deadline)) if at >= *deadline => self.pending.take().map(|(value, _)| value),
            _ => None,
        }
    }

    /// Whether a value is waiting for its window to elapse.
    #[must_use]
    pub const fn is_pending(&self) -> bool {
        self.pending.is_some()
    }
}

/// Default quiet window for catalog search input.
pub const SEARCH_DEBOUNCE: Duration = Duration::from_millis(250);

/// Ties raw search input, the debouncer, and the filters together into the
/// state behind a catalog page.
#[derive(Debug)]
pub struct CatalogView {
    products: Vec<ProductModel>,
    /// Current filter set; `filter.search` only changes through the
    /// debouncer
    pub filter: CatalogFilter,
    debouncer: Debouncer,
    filter_passes: usize,
}

impl CatalogView {
    /// Creates a view over `products` with the default debounce window.
    #[must_use]
    pub fn new(products: Vec<ProductModel>) -> Self {
        Self::with_debounce(products, SEARCH_DEBOUNCE)
    }

    /// Creates a view with a custom debounce window.
    #[must_use]
    pub fn with_debounce(products: Vec<ProductModel>, delay: Duration) -> Self {
        Self {
            products,
            filter: CatalogFilter::default(),
            debouncer: Debouncer::new(delay),
            filter_passes: 0,
        }
    }

    /// Records a keystroke in the search box at time `at`.
    pub fn set_search_term(&mut self, term: &str, at: Instant) {
        self.debouncer.update(term, at);
    }

    /// Applies a settled search term, if any. Returns `true` when a new
    /// effective term was applied, i.e. one filter pass happened.
    pub fn tick(&mut self, at: Instant) -> bool {
        if let Some(term) = self.debouncer.poll(at) {
            self.filter.search = term;
            self.filter_passes += 1;
            true
        } else {
            false
        }
    }

    /// The filtered and ordered view under the current filters.
    #[must_use]
    pub fn visible(&self) -> Vec<&ProductModel> {
        filter_products(&self.products, &self.filter)
    }

    /// How many effective search terms have been applied.
    #[must_use]
    pub const fn filter_passes(&self) -> usize {
        self.filter_passes
    }
}

/// Recent search terms, most recent first, persisted in the local store.
#[derive(Debug)]
pub struct SearchHistory {
    store: LocalStore,
    entries: Vec<String>,
}

impl SearchHistory {
    /// Maximum number of remembered terms.
    pub const MAX_ENTRIES: usize = 10;
    /// Maximum number of suggestions returned for an input.
    pub const MAX_SUGGESTIONS: usize = 5;

    /// Loads the history persisted in `store`, if any.
    #[must_use]
    pub fn load(store: LocalStore) -> Self {
        let entries = store.read(SEARCH_HISTORY_KEY).unwrap_or_default();
        Self { store, entries }
    }

    /// Records a submitted search term: case-insensitively de-duplicated,
    /// pushed to the front, capped at [`Self::MAX_ENTRIES`].
    pub fn record(&mut self, term: &str) {
        let term = term.trim();
        if term.is_empty() {
            return;
        }
        let lowered = term.to_lowercase();
        self.entries.retain(|e| e.to_lowercase() != lowered);
        self.entries.insert(0, term.to_string());
        self.entries.truncate(Self::MAX_ENTRIES);
        self.store.write(SEARCH_HISTORY_KEY, &self.entries);
    }

    /// Up to [`Self::MAX_SUGGESTIONS`] remembered terms containing `input`
    /// case-insensitively, most recent first.
    #[must_use]
    pub fn suggestions(&self, input: &str) -> Vec<&str> {
        let needle = input.trim().to_lowercase();
        if needle.is_empty() {
            return Vec::new();
        }
        self.entries
            .iter()
            .filter(|e| e.to_lowercase().contains(&needle))
            .take(Self::MAX_SUGGESTIONS)
            .map(String::as_str)
            .collect()
    }

    /// All remembered terms, most recent first.
    #[must_use]
    pub fn entries(&self) -> &[String] {
        &self.entries
    }
}
