//! Cart Store

use rust_decimal::Decimal;
use tracing::{debug, error, warn};

use crate::{
    cart::CartLine,
    pricing::{PricingError, total_price, total_quantity},
    storage::{CartStorage, MemoryStorage, StorageError},
};

/// Storage key holding the serialized cart.
pub const CART_STORAGE_KEY: &str = "cart";

/// Single source of truth for the cart contents, mirrored to durable storage.
///
/// Every mutator updates the in-memory list first and then re-serializes the
/// whole list under [`CART_STORAGE_KEY`].
#[derive(Debug)]
pub struct CartStore<S: CartStorage = MemoryStorage> {
    lines: Vec<CartLine>,
    storage: S,
}

impl<S: CartStorage> CartStore<S> {
    /// Create an empty cart over `storage` without reading it.
    pub fn new(storage: S) -> Self {
        Self {
            lines: Vec::new(),
            storage,
        }
    }

    /// Create a cart populated from whatever `storage` holds.
    ///
    /// Absent, unreadable or malformed storage yields an empty cart.
    pub fn hydrate(storage: S) -> Self {
        let mut store = Self::new(storage);
        store.lines = store.load();

        debug!(lines = store.lines.len(), "hydrated cart");

        store
    }

    fn load(&self) -> Vec<CartLine> {
        let raw = match self.storage.read(CART_STORAGE_KEY) {
            Ok(Some(raw)) => raw,
            Ok(None) => return Vec::new(),
            Err(err) => {
                warn!(error = %err, "cart storage unavailable, starting empty");
                return Vec::new();
            }
        };

        match decode_lines(&raw) {
            Ok(lines) => lines,
            Err(err) => {
                warn!(error = %err, "stored cart is malformed, starting empty");
                Vec::new()
            }
        }
    }

    /// Add a line, merging into an existing line with the same id.
    ///
    /// A zero quantity counts as one and the discount is clamped. A line
    /// without an id is a caller bug: it is logged and ignored.
    pub fn add(&mut self, line: CartLine) {
        if !line.has_identity() {
            error!(name = line.name(), "refusing to add cart line without an id");
            return;
        }

        let line = line.normalized();

        if let Some(existing) = self.lines.iter_mut().find(|l| l.id() == line.id()) {
            existing.add_quantity(line.quantity());

            debug!(
                id = existing.id(),
                quantity = existing.quantity(),
                "increased cart line quantity"
            );
        } else {
            debug!(id = line.id(), quantity = line.quantity(), "added cart line");

            self.lines.push(line);
        }

        self.persist_logged();
    }

    /// Remove every line with the given id. Unknown ids leave the list untouched.
    pub fn remove(&mut self, id: &str) {
        let before = self.lines.len();

        self.lines.retain(|line| line.id() != id);

        debug!(id, removed = before - self.lines.len(), "removed cart line");

        self.persist_logged();
    }

    /// Remove every line.
    pub fn clear(&mut self) {
        self.lines.clear();

        debug!("cleared cart");

        self.persist_logged();
    }

    /// Current lines in insertion order.
    #[must_use]
    pub fn snapshot(&self) -> &[CartLine] {
        &self.lines
    }

    /// Look up a line by id.
    #[must_use]
    pub fn get(&self, id: &str) -> Option<&CartLine> {
        self.lines.iter().find(|line| line.id() == id)
    }

    /// Quantity held for `id`, zero if absent.
    #[must_use]
    pub fn quantity_of(&self, id: &str) -> u32 {
        self.get(id).map_or(0, CartLine::quantity)
    }

    /// Number of distinct lines.
    pub fn len(&self) -> usize {
        self.lines.len()
    }

    /// Whether the cart has no lines.
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Sum of quantities across all lines.
    #[must_use]
    pub fn total_quantity(&self) -> u64 {
        total_quantity(&self.lines)
    }

    /// Sum of discounted line totals.
    ///
    /// # Errors
    ///
    /// Returns a [`PricingError`] if the arithmetic overflows.
    pub fn total_price(&self) -> Result<Decimal, PricingError> {
        total_price(&self.lines)
    }

    /// Serialize the full list into storage.
    ///
    /// # Errors
    ///
    /// Returns a [`StorageError`] if the list cannot be encoded or written.
    pub fn persist(&mut self) -> Result<(), StorageError> {
        let encoded = serde_json::to_string(&self.lines)?;

        self.storage.write(CART_STORAGE_KEY, &encoded)
    }

    fn persist_logged(&mut self) {
        if let Err(err) = self.persist() {
            error!(error = %err, "failed to persist cart");
        }
    }

    /// Backing storage.
    #[must_use]
    pub fn storage(&self) -> &S {
        &self.storage
    }

    /// Consume the store, returning its storage.
    pub fn into_storage(self) -> S {
        self.storage
    }
}

impl Default for CartStore<MemoryStorage> {
    fn default() -> Self {
        Self::new(MemoryStorage::new())
    }
}

/// Decode a stored cart record.
///
/// Lines without an id or with a zero quantity are dropped and lines sharing
/// an id are merged, so the result always satisfies the cart invariants.
///
/// # Errors
///
/// Returns a [`serde_json::Error`] if `raw` is not a list of cart lines.
pub fn decode_lines(raw: &str) -> Result<Vec<CartLine>, serde_json::Error> {
    let decoded: Vec<CartLine> = serde_json::from_str(raw)?;
    let mut lines: Vec<CartLine> = Vec::with_capacity(decoded.len());

    for line in decoded {
        if !line.has_identity() || line.quantity() == 0 {
            warn!(id = line.id(), "dropping invalid stored cart line");
            continue;
        }

        match lines.iter_mut().find(|l| l.id() == line.id()) {
            Some(existing) => existing.add_quantity(line.quantity()),
            None => lines.push(line.normalized()),
        }
    }

    Ok(lines)
}

#[cfg(test)]
mod tests {
    use testresult::TestResult;

    use crate::cart::LineVariant;

    use super::*;

    fn line(id: &str) -> CartLine {
        CartLine::new(id, "1", format!("Producto {id}"), Decimal::from(100))
    }

    fn empty_store() -> CartStore {
        CartStore::default()
    }

    fn stored(store: &CartStore) -> TestResult<Vec<CartLine>> {
        let raw = store.storage().read(CART_STORAGE_KEY)?.unwrap_or_default();

        Ok(decode_lines(&raw)?)
    }

    #[test]
    fn add_appends_with_default_quantity() -> TestResult {
        let mut store = empty_store();

        store.add(line("B"));

        assert_eq!(store.len(), 1);
        assert_eq!(store.quantity_of("B"), 1);
        assert_eq!(stored(&store)?, store.snapshot());

        Ok(())
    }

    #[test]
    fn add_existing_id_increments_in_place() -> TestResult {
        let mut store = empty_store();

        store.add(line("A"));
        store.add(line("C").with_quantity(1));
        store.add(line("C").with_quantity(1));
        store.add(line("A").with_quantity(3));

        let ids: Vec<&str> = store.snapshot().iter().map(CartLine::id).collect();

        assert_eq!(ids, ["A", "C"]);
        assert_eq!(store.quantity_of("A"), 4);
        assert_eq!(store.quantity_of("C"), 2);
        assert_eq!(stored(&store)?, store.snapshot());

        Ok(())
    }

    #[test]
    fn add_normalizes_deserialized_lines() -> TestResult {
        let mut store = empty_store();
        let zero: CartLine = serde_json::from_str(r#"{"id": "Z", "price": 10, "quantity": 0}"#)?;
        let oversized: CartLine =
            serde_json::from_str(r#"{"id": "D", "price": 10, "discount": 250}"#)?;

        store.add(zero.clone());

        assert_eq!(store.quantity_of("Z"), 1);
        assert_eq!(store.total_quantity(), 1);

        store.add(zero);
        store.add(oversized);

        assert_eq!(store.quantity_of("Z"), 2);
        assert_eq!(
            store.get("D").map(CartLine::discount_percent),
            Some(Decimal::ONE_HUNDRED)
        );
        assert_eq!(store.total_price()?, Decimal::from(20));

        let hydrated = CartStore::hydrate(store.into_storage());

        assert_eq!(hydrated.len(), 2);
        assert_eq!(hydrated.quantity_of("Z"), 2);

        Ok(())
    }

    #[test]
    fn add_without_id_changes_nothing() {
        let mut store = empty_store();

        store.add(line(""));

        assert!(store.is_empty());
        assert!(matches!(store.storage().read(CART_STORAGE_KEY), Ok(None)));
    }

    #[test]
    fn remove_drops_matching_line() -> TestResult {
        let mut store = empty_store();
        store.add(line("A"));
        store.add(line("B"));

        store.remove("A");

        assert_eq!(store.len(), 1);
        assert!(store.get("A").is_none());
        assert_eq!(stored(&store)?, store.snapshot());

        Ok(())
    }

    #[test]
    fn remove_unknown_id_is_noop() {
        let mut store = empty_store();
        store.add(line("A"));
        let before = store.snapshot().to_vec();

        store.remove("Z");

        assert_eq!(store.snapshot(), before);
    }

    #[test]
    fn remove_matches_exact_string_ids() {
        let mut store = empty_store();
        store.add(line("1"));

        store.remove("01");

        assert_eq!(store.len(), 1);
    }

    #[test]
    fn clear_empties_storage_too() -> TestResult {
        let mut store = empty_store();
        store.add(line("A"));

        store.clear();

        assert!(store.is_empty());
        assert!(stored(&store)?.is_empty());

        Ok(())
    }

    #[test]
    fn totals() -> TestResult {
        let mut store = empty_store();
        store.add(line("A").with_discount_percent(Decimal::TEN).with_quantity(2));
        store.add(line("B"));

        assert_eq!(store.total_quantity(), 3);
        assert_eq!(store.total_price()?, Decimal::from(280));

        Ok(())
    }

    #[test]
    fn hydrate_round_trips_persisted_lines() -> TestResult {
        let mut store = empty_store();
        store.add(
            line("3-Negro-42")
                .with_discount_percent(Decimal::new(125, 1))
                .with_image("img/3.jpg")
                .with_variant(LineVariant::new("Negro", "42", 5))
                .with_quantity(2),
        );
        store.add(CartLine::new("9", "9", "Medias", Decimal::new(1990, 2)));
        store.persist()?;
        let expected = store.snapshot().to_vec();

        let hydrated = CartStore::hydrate(store.into_storage());

        assert_eq!(hydrated.snapshot(), expected);

        Ok(())
    }

    #[test]
    fn hydrate_absent_storage_is_empty() {
        let store = CartStore::hydrate(MemoryStorage::new());

        assert!(store.is_empty());
    }

    #[test]
    fn hydrate_malformed_storage_is_empty() {
        let store = CartStore::hydrate(MemoryStorage::with_entry(CART_STORAGE_KEY, "{not json"));

        assert!(store.is_empty());
    }

    #[test]
    fn hydrate_wrong_shape_is_empty() {
        let store = CartStore::hydrate(MemoryStorage::with_entry(
            CART_STORAGE_KEY,
            r#"{"id": "A"}"#,
        ));

        assert!(store.is_empty());
    }

    #[test]
    fn decode_repairs_invariants() -> TestResult {
        let raw = r#"[
            {"id": "A", "price": 10, "quantity": 1},
            {"id": "", "price": 10},
            {"id": "B", "price": 10, "quantity": 0},
            {"id": "A", "price": 10, "quantity": 2},
            {"id": 7, "price": 5, "discount": 250}
        ]"#;

        let lines = decode_lines(raw)?;
        let ids: Vec<&str> = lines.iter().map(CartLine::id).collect();

        assert_eq!(ids, ["A", "7"]);
        assert_eq!(lines.first().map(CartLine::quantity), Some(3));
        assert_eq!(
            lines.get(1).map(CartLine::discount_percent),
            Some(Decimal::ONE_HUNDRED)
        );

        Ok(())
    }
}
