use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};

use tokio::sync::Mutex;
use truenorth_core::Cart;
use uuid::Uuid;

const DEFAULT_IDLE_TTL: Duration = Duration::from_secs(24 * 60 * 60);

#[derive(Debug)]
struct StoredCart {
    cart: Cart,
    touched: Instant,
}

/// In-memory carts keyed by a client-held id. Carts are lost on restart, and
/// carts left idle longer than the TTL are evicted when new carts are opened.
#[derive(Debug, Clone)]
pub struct CartStore {
    carts: Arc<Mutex<HashMap<Uuid, StoredCart>>>,
    idle_ttl: Duration,
}

impl Default for CartStore {
    fn default() -> Self {
        Self::new(DEFAULT_IDLE_TTL)
    }
}

impl CartStore {
    #[must_use]
    pub fn new(idle_ttl: Duration) -> Self {
        Self {
            carts: Arc::new(Mutex::new(HashMap::new())),
            idle_ttl,
        }
    }

    /// Open a new empty cart and return its id, evicting idle carts first.
    pub async fn create(&self) -> Uuid {
        let mut carts = self.carts.lock().await;
        let before = carts.len();
        carts.retain(|_, stored| stored.touched.elapsed() < self.idle_ttl);
        let evicted = before - carts.len();
        if evicted > 0 {
            tracing::debug!(evicted, "evicted idle carts");
        }

        let id = Uuid::new_v4();
        carts.insert(
            id,
            StoredCart {
                cart: Cart::new(),
                touched: Instant::now(),
            },
        );
        id
    }

    pub async fn get(&self, id: Uuid) -> Option<Cart> {
        self.update(id, |cart| cart.clone()).await
    }

    /// Run `f` against the cart with `id`, returning `None` when it does not
    /// exist or has gone idle.
    pub async fn update<T>(&self, id: Uuid, f: impl FnOnce(&mut Cart) -> T) -> Option<T> {
        let mut carts = self.carts.lock().await;
        if carts
            .get(&id)
            .is_some_and(|stored| stored.touched.elapsed() >= self.idle_ttl)
        {
            carts.remove(&id);
            return None;
        }
        let stored = carts.get_mut(&id)?;
        stored.touched = Instant::now();
        Some(f(&mut stored.cart))
    }

    /// Drop the cart with `id`. Returns `false` if it did not exist.
    pub async fn remove(&self, id: Uuid) -> bool {
        self.carts.lock().await.remove(&id).is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn created_cart_starts_empty() {
        let store = CartStore::default();
        let id = store.create().await;
        let cart = store.get(id).await.expect("cart exists");
        assert!(cart.is_empty());
    }

    #[tokio::test]
    async fn update_on_unknown_cart_is_none() {
        let store = CartStore::default();
        let result = store.update(Uuid::new_v4(), |cart| cart.clear()).await;
        assert!(result.is_none());
    }

    #[tokio::test]
    async fn clones_share_carts() {
        let store = CartStore::default();
        let id = store.create().await;
        let other = store.clone();
        other.update(id, |cart| cart.clear()).await.expect("cart exists");
        assert!(store.get(id).await.is_some());
    }

    #[tokio::test]
    async fn remove_drops_the_entry() {
        let store = CartStore::default();
        let id = store.create().await;

        assert!(store.remove(id).await);
        assert!(store.get(id).await.is_none());
        assert!(!store.remove(id).await);
        assert!(store.carts.lock().await.is_empty());
    }

    #[tokio::test]
    async fn idle_carts_are_evicted_on_create() {
        let store = CartStore::new(Duration::ZERO);
        let first = store.create().await;
        let second = store.create().await;

        let carts = store.carts.lock().await;
        assert_eq!(carts.len(), 1);
        assert!(!carts.contains_key(&first));
        assert!(carts.contains_key(&second));
    }

    #[tokio::test]
    async fn idle_cart_lookup_is_none() {
        let store = CartStore::new(Duration::ZERO);
        let id = store.create().await;

        assert!(store.get(id).await.is_none());
        assert!(store.carts.lock().await.is_empty());
    }

    #[tokio::test]
    async fn active_carts_survive_eviction() {
        let store = CartStore::new(Duration::from_secs(3600));
        let first = store.create().await;
        store.create().await;

        assert!(store.get(first).await.is_some());
        assert_eq!(store.carts.lock().await.len(), 2);
    }
}
