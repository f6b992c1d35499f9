//! Transfer objects and the mappings between them and the entities.
//!
//! Every mapping is a plain `From` impl: total, pure, and usable on its own.

use serde::{Deserialize, Serialize};

use dscommerce_core::{CategoryId, DomainError, FieldMessage, ProductId};

use crate::product::{Category, Product};

pub const NAME_MIN_CHARS: usize = 3;
pub const NAME_MAX_CHARS: usize = 80;
pub const DESCRIPTION_MIN_CHARS: usize = 10;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryDto {
    pub id: CategoryId,
    #[serde(default)]
    pub name: String,
}

/// Full product representation used for single-product reads and writes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductDto {
    #[serde(default)]
    pub id: Option<ProductId>,
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub price: f64,
    #[serde(default)]
    pub img_url: String,
    #[serde(default)]
    pub categories: Vec<CategoryDto>,
}

/// Reduced product representation used in listings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductMinDto {
    pub id: Option<ProductId>,
    pub name: String,
    pub price: f64,
    pub img_url: String,
}

impl From<&Category> for CategoryDto {
    fn from(category: &Category) -> Self {
        Self {
            id: category.id,
            name: category.name.clone(),
        }
    }
}

impl From<&CategoryDto> for Category {
    fn from(dto: &CategoryDto) -> Self {
        Category::new(dto.id, dto.name.clone())
    }
}

impl From<&Product> for ProductDto {
    fn from(product: &Product) -> Self {
        Self {
            id: product.id(),
            name: product.name.clone(),
            description: product.description.clone(),
            price: product.price,
            img_url: product.img_url.clone(),
            categories: product.categories().iter().map(CategoryDto::from).collect(),
        }
    }
}

impl From<Product> for ProductDto {
    fn from(product: Product) -> Self {
        ProductDto::from(&product)
    }
}

impl From<&Product> for ProductMinDto {
    fn from(product: &Product) -> Self {
        Self {
            id: product.id(),
            name: product.name.clone(),
            price: product.price,
            img_url: product.img_url.clone(),
        }
    }
}

impl From<Product> for ProductMinDto {
    fn from(product: Product) -> Self {
        ProductMinDto::from(&product)
    }
}

/// Builds the entity exactly as described, identifier included.
impl From<&ProductDto> for Product {
    fn from(dto: &ProductDto) -> Self {
        let mut product = Product::new(
            dto.id,
            dto.name.clone(),
            dto.description.clone(),
            dto.price,
            dto.img_url.clone(),
        );
        product.set_categories(dto.categories.iter().map(Category::from));
        product
    }
}

impl ProductDto {
    /// Copy the editable scalar fields onto an existing entity.
    ///
    /// The entity's identifier and categories are left untouched.
    pub fn copy_editable_fields(&self, product: &mut Product) {
        product.name = self.name.clone();
        product.description = self.description.clone();
        product.price = self.price;
        product.img_url = self.img_url.clone();
    }

    /// Check every field and report all failures at once.
    pub fn validate(&self) -> Result<(), DomainError> {
        let mut errors = Vec::new();

        let name_len = self.name.trim().chars().count();
        if self.name.trim().is_empty() {
            errors.push(FieldMessage::new("name", "Required field"));
        } else if !(NAME_MIN_CHARS..=NAME_MAX_CHARS).contains(&name_len) {
            errors.push(FieldMessage::new(
                "name",
                format!("Name must have between {NAME_MIN_CHARS} and {NAME_MAX_CHARS} characters"),
            ));
        }

        if self.description.trim().chars().count() < DESCRIPTION_MIN_CHARS {
            errors.push(FieldMessage::new(
                "description",
                format!("Description must have at least {DESCRIPTION_MIN_CHARS} characters"),
            ));
        }

        if !(self.price.is_finite() && self.price > 0.0) {
            errors.push(FieldMessage::new("price", "Price must be positive"));
        }

        if self.categories.is_empty() {
            errors.push(FieldMessage::new("categories", "Product must have at least one category"));
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(DomainError::validation(errors))
        }
    }
}
