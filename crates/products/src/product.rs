use dscommerce_core::{CategoryId, ProductId};

/// Product category.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Category {
    pub id: CategoryId,
    pub name: String,
}

impl Category {
    pub fn new(id: CategoryId, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
        }
    }

    /// A category known only by id (name is resolved by the store on save).
    pub fn reference(id: CategoryId) -> Self {
        Self {
            id,
            name: String::new(),
        }
    }
}

/// Catalog product.
///
/// A product without an id has not been persisted yet; the store assigns one on
/// the first save and it never changes afterwards.
#[derive(Debug, Clone, PartialEq)]
pub struct Product {
    id: Option<ProductId>,
    pub name: String,
    pub description: String,
    pub price: f64,
    pub img_url: String,
    categories: Vec<Category>,
}

impl Product {
    pub fn new(
        id: Option<ProductId>,
        name: impl Into<String>,
        description: impl Into<String>,
        price: f64,
        img_url: impl Into<String>,
    ) -> Self {
        Self {
            id,
            name: name.into(),
            description: description.into(),
            price,
            img_url: img_url.into(),
            categories: Vec::new(),
        }
    }

    pub fn id(&self) -> Option<ProductId> {
        self.id
    }

    pub fn is_persisted(&self) -> bool {
        self.id.is_some()
    }

    /// Stamp the store-assigned identifier.
    pub fn with_id(mut self, id: ProductId) -> Self {
        self.id = Some(id);
        self
    }

    /// Drop any identifier so the store treats this as a new product.
    pub fn without_id(mut self) -> Self {
        self.id = None;
        self
    }

    pub fn categories(&self) -> &[Category] {
        &self.categories
    }

    /// Add a category; a category with the same id is only kept once.
    pub fn add_category(&mut self, category: Category) {
        if !self.categories.iter().any(|c| c.id == category.id) {
            self.categories.push(category);
        }
    }

    pub fn clear_categories(&mut self) {
        self.categories.clear();
    }

    pub fn set_categories(&mut self, categories: impl IntoIterator<Item = Category>) {
        self.categories.clear();
        for category in categories {
            self.add_category(category);
        }
    }
}
