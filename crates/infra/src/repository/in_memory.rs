use std::collections::{BTreeMap, HashSet};
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use async_trait::async_trait;

use dscommerce_core::{CategoryId, Page, PageRequest, ProductId, Sort, SortDirection, SortField};
use dscommerce_products::{
    Category, CategoryRepository, Product, ProductRef, ProductRepository, RepositoryError,
};

const SEED_DESCRIPTION: &str = "Lorem ipsum dolor sit amet, consectetur adipiscing elit, sed do eiusmod tempor incididunt.";

#[derive(Debug, Default)]
struct CatalogState {
    products: BTreeMap<ProductId, Product>,
    categories: BTreeMap<CategoryId, Category>,
    /// Products that appear on an order and therefore cannot be deleted.
    ordered: HashSet<ProductId>,
    last_product_id: i64,
}

/// In-memory catalog store for tests/dev.
///
/// Product ids come from a sequence starting at 1 and are never reused.
#[derive(Debug, Default)]
pub struct InMemoryCatalogStore {
    inner: RwLock<CatalogState>,
}

impl InMemoryCatalogStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store pre-filled with a small demo catalog.
    pub fn seeded() -> Self {
        let store = Self::new();
        if let Ok(mut state) = store.inner.write() {
            for (id, name) in [(1, "Livros"), (2, "Eletrônicos"), (3, "Computadores")] {
                let category = Category::new(CategoryId::new(id), name);
                state.categories.insert(category.id, category);
            }

            let products: [(&str, f64, &[i64]); 6] = [
                ("The Lord of the Rings", 90.5, &[1]),
                ("Smart TV", 2190.0, &[2, 3]),
                ("Macbook Pro", 1250.0, &[3]),
                ("PC Gamer", 1200.0, &[3]),
                ("Rails for Dummies", 100.99, &[1]),
                ("PC Gamer Ex", 1350.0, &[3]),
            ];
            for (name, price, category_ids) in products {
                state.last_product_id += 1;
                let id = ProductId::new(state.last_product_id);
                let mut product = Product::new(
                    Some(id),
                    name,
                    SEED_DESCRIPTION,
                    price,
                    format!("img/{}-big.jpg", id),
                );
                for category_id in category_ids {
                    if let Some(category) = state.categories.get(&CategoryId::new(*category_id)) {
                        product.add_category(category.clone());
                    }
                }
                state.products.insert(id, product);
            }
        }
        store
    }

    pub fn insert_category(&self, category: Category) {
        if let Ok(mut state) = self.inner.write() {
            state.categories.insert(category.id, category);
        }
    }

    /// Mark a product as referenced by an order; deleting it then fails.
    pub fn mark_ordered(&self, id: ProductId) {
        if let Ok(mut state) = self.inner.write() {
            state.ordered.insert(id);
        }
    }

    pub fn len(&self) -> usize {
        self.inner.read().map(|s| s.products.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn read(&self) -> Result<RwLockReadGuard<'_, CatalogState>, RepositoryError> {
        self.inner
            .read()
            .map_err(|_| RepositoryError::unavailable("catalog lock poisoned"))
    }

    fn write(&self) -> Result<RwLockWriteGuard<'_, CatalogState>, RepositoryError> {
        self.inner
            .write()
            .map_err(|_| RepositoryError::unavailable("catalog lock poisoned"))
    }
}

impl CatalogState {
    /// Replace category references with the stored categories.
    fn resolve_categories(&self, product: &mut Product) -> Result<(), RepositoryError> {
        let resolved = product
            .categories()
            .iter()
            .map(|c| {
                self.categories
                    .get(&c.id)
                    .cloned()
                    .ok_or_else(|| RepositoryError::entity_not_found(format!("category {}", c.id)))
            })
            .collect::<Result<Vec<_>, _>>()?;
        product.set_categories(resolved);
        Ok(())
    }
}

fn compare(a: &Product, b: &Product, sort: Sort) -> core::cmp::Ordering {
    let ordering = match sort.field {
        SortField::Id => a.id().cmp(&b.id()),
        SortField::Name => a.name.cmp(&b.name).then_with(|| a.id().cmp(&b.id())),
        SortField::Price => a.price.total_cmp(&b.price).then_with(|| a.id().cmp(&b.id())),
    };
    match sort.direction {
        SortDirection::Asc => ordering,
        SortDirection::Desc => ordering.reverse(),
    }
}

#[async_trait]
impl ProductRepository for InMemoryCatalogStore {
    async fn find_by_id(&self, id: ProductId) -> Result<Option<Product>, RepositoryError> {
        Ok(self.read()?.products.get(&id).cloned())
    }

    async fn search_by_name(
        &self,
        name: &str,
        page: &PageRequest,
    ) -> Result<Page<Product>, RepositoryError> {
        let needle = name.trim().to_lowercase();
        let state = self.read()?;

        let mut matches: Vec<&Product> = state
            .products
            .values()
            .filter(|p| p.name.to_lowercase().contains(&needle))
            .collect();

        let sort = page.sort.unwrap_or(Sort::asc(SortField::Id));
        matches.sort_by(|a, b| compare(a, b, sort));

        let total = matches.len() as u64;
        let content = matches
            .into_iter()
            .skip(usize::try_from(page.offset()).unwrap_or(usize::MAX))
            .take(page.size as usize)
            .cloned()
            .collect();

        Ok(Page::new(content, page, total))
    }

    async fn save(&self, mut product: Product) -> Result<Product, RepositoryError> {
        let mut state = self.write()?;
        state.resolve_categories(&mut product)?;

        let id = match product.id() {
            Some(id) if state.products.contains_key(&id) => id,
            Some(id) => {
                return Err(RepositoryError::entity_not_found(format!("product {id}")));
            }
            None => {
                state.last_product_id += 1;
                ProductId::new(state.last_product_id)
            }
        };

        let product = product.with_id(id);
        state.products.insert(id, product.clone());
        tracing::debug!(product_id = %id, "product stored");
        Ok(product)
    }

    async fn try_get_reference(&self, id: ProductId) -> Result<ProductRef, RepositoryError> {
        self.read()?
            .products
            .get(&id)
            .cloned()
            .and_then(ProductRef::new)
            .ok_or_else(|| RepositoryError::entity_not_found(format!("product {id}")))
    }

    async fn exists_by_id(&self, id: ProductId) -> Result<bool, RepositoryError> {
        Ok(self.read()?.products.contains_key(&id))
    }

    async fn delete_by_id(&self, id: ProductId) -> Result<(), RepositoryError> {
        let mut state = self.write()?;
        if state.ordered.contains(&id) {
            return Err(RepositoryError::integrity(format!(
                "product {id} is referenced by an order"
            )));
        }
        match state.products.remove(&id) {
            Some(_) => Ok(()),
            None => Err(RepositoryError::entity_not_found(format!("product {id}"))),
        }
    }
}

#[async_trait]
impl CategoryRepository for InMemoryCatalogStore {
    async fn find_all(&self) -> Result<Vec<Category>, RepositoryError> {
        Ok(self.read()?.categories.values().cloned().collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use dscommerce_products::fixtures;

    fn store_with_games() -> InMemoryCatalogStore {
        let store = InMemoryCatalogStore::new();
        store.insert_category(fixtures::category());
        store
    }

    fn new_product(name: &str, price: f64) -> Product {
        let mut product = Product::new(None, name, "A product description", price, "img.png");
        product.add_category(Category::reference(CategoryId::new(1)));
        product
    }

    #[tokio::test]
    async fn save_assigns_sequential_ids() {
        let store = store_with_games();
        let first = store.save(new_product("Playstation 5", 3999.0)).await.unwrap();
        let second = store.save(new_product("Xbox Series X", 3799.0)).await.unwrap();

        assert_eq!(first.id(), Some(ProductId::new(1)));
        assert_eq!(second.id(), Some(ProductId::new(2)));
        assert_eq!(store.len(), 2);
    }

    #[tokio::test]
    async fn search_treats_wildcards_literally() {
        let store = store_with_games();
        store.save(new_product("Gift Card 100%", 100.0)).await.unwrap();
        store.save(new_product("Gift Card 1000", 1000.0)).await.unwrap();

        let page = store.search_by_name("100%", &PageRequest::of(0, 10)).await.unwrap();
        let names: Vec<&str> = page.iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, ["Gift Card 100%"]);

        let page = store.search_by_name("card_", &PageRequest::of(0, 10)).await.unwrap();
        assert!(page.is_empty());
    }

    #[tokio::test]
    async fn save_resolves_category_names() {
        let store = store_with_games();
        let saved = store.save(new_product("Playstation 5", 3999.0)).await.unwrap();
        assert_eq!(saved.categories(), &[fixtures::category()]);
    }

    #[tokio::test]
    async fn save_rejects_unknown_category() {
        let store = InMemoryCatalogStore::new();
        let err = store.save(new_product("Playstation 5", 3999.0)).await.unwrap_err();
        assert!(matches!(err, RepositoryError::EntityNotFound(_)));
        assert!(store.is_empty());
    }

    #[tokio::test]
    async fn save_with_unknown_id_is_not_found() {
        let store = store_with_games();
        let ghost = new_product("Ghost", 1.0).with_id(ProductId::new(42));
        let err = store.save(ghost).await.unwrap_err();
        assert!(matches!(err, RepositoryError::EntityNotFound(_)));
    }

    #[tokio::test]
    async fn reference_then_save_keeps_id() {
        let store = store_with_games();
        let saved = store.save(new_product("Playstation 5", 3999.0)).await.unwrap();
        let id = saved.id().unwrap();

        let mut reference = store.try_get_reference(id).await.unwrap();
        reference.entity_mut().name = "Playstation 5 Pro".to_string();
        store.save(reference.into_entity()).await.unwrap();

        let reloaded = store.find_by_id(id).await.unwrap().unwrap();
        assert_eq!(reloaded.id(), Some(id));
        assert_eq!(reloaded.name, "Playstation 5 Pro");
        assert_eq!(store.len(), 1);
    }

    #[tokio::test]
    async fn missing_reference_is_entity_not_found() {
        let store = store_with_games();
        let err = store.try_get_reference(ProductId::new(2)).await.unwrap_err();
        assert!(matches!(err, RepositoryError::EntityNotFound(_)));
    }

    #[tokio::test]
    async fn search_pages_and_sorts() {
        let store = store_with_games();
        for (name, price) in [("PC Gamer", 1200.0), ("PC Gamer Ex", 1350.0), ("Macbook", 1250.0), ("PC Gamer Max", 1100.0)] {
            store.save(new_product(name, price)).await.unwrap();
        }

        let request = PageRequest::of(0, 2).with_sort(Sort::desc(SortField::Price));
        let page = store.search_by_name("gamer", &request).await.unwrap();

        let names: Vec<&str> = page.iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, vec!["PC Gamer Ex", "PC Gamer"]);
        assert_eq!(page.total_elements(), 3);
        assert_eq!(page.total_pages(), 2);

        let second = store.search_by_name("gamer", &PageRequest::of(1, 2)).await.unwrap();
        assert_eq!(second.number_of_elements(), 1);
    }

    #[tokio::test]
    async fn empty_fragment_matches_all() {
        let store = InMemoryCatalogStore::seeded();
        let page = store.search_by_name("", &PageRequest::of(0, 100)).await.unwrap();
        assert_eq!(page.total_elements(), 6);
        assert_eq!(page.content()[0].id(), Some(ProductId::new(1)));
    }

    #[tokio::test]
    async fn seeded_store_continues_the_sequence() {
        let store = InMemoryCatalogStore::seeded();
        let saved = store.save(new_product("Kindle", 499.0)).await.unwrap();
        assert_eq!(saved.id(), Some(ProductId::new(7)));
        assert_eq!(store.find_all().await.unwrap().len(), 3);
    }

    #[tokio::test]
    async fn delete_removes_product() {
        let store = InMemoryCatalogStore::seeded();
        store.delete_by_id(ProductId::new(1)).await.unwrap();
        assert!(!store.exists_by_id(ProductId::new(1)).await.unwrap());
    }

    #[tokio::test]
    async fn delete_of_ordered_product_is_integrity_violation() {
        let store = InMemoryCatalogStore::seeded();
        store.mark_ordered(ProductId::new(2));

        let err = store.delete_by_id(ProductId::new(2)).await.unwrap_err();
        assert!(matches!(err, RepositoryError::Integrity(_)));
        assert!(store.exists_by_id(ProductId::new(2)).await.unwrap());
    }

    mod proptest_tests {
        use super::*;
        use proptest::prelude::*;

        fn runtime() -> tokio::runtime::Runtime {
            tokio::runtime::Builder::new_current_thread().build().unwrap()
        }

        proptest! {
            /// Property: search returns exactly the case-insensitive matches,
            /// and the total does not depend on the page asked for.
            #[test]
            fn search_matches_fragment_case_insensitively(
                names in proptest::collection::vec("[A-Za-z ]{1,12}", 0..25),
                fragment in "[A-Za-z]{0,2}",
                page in 0u32..4,
                size in 1u32..6,
            ) {
                let rt = runtime();
                let store = store_with_games();
                for name in &names {
                    rt.block_on(store.save(new_product(name, 10.0))).unwrap();
                }

                let expected = names
                    .iter()
                    .filter(|n| n.to_lowercase().contains(&fragment.to_lowercase()))
                    .count() as u64;

                let result = rt
                    .block_on(store.search_by_name(&fragment, &PageRequest::of(page, size)))
                    .unwrap();

                prop_assert_eq!(result.total_elements(), expected);
                prop_assert!(result.number_of_elements() <= size as usize);
                for product in result.iter() {
                    prop_assert!(product.name.to_lowercase().contains(&fragment.to_lowercase()));
                }
            }
        }
    }
}
