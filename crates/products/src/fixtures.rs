//! Ready-made catalog entities for tests.

use dscommerce_core::{CategoryId, ProductId};

use crate::dto::ProductDto;
use crate::product::{Category, Product};

pub fn category() -> Category {
    Category::new(CategoryId::new(1), "Games")
}

/// Persisted product with id 1 in the "Games" category.
pub fn product() -> Product {
    let mut product = Product::new(
        Some(ProductId::new(1)),
        "Console PlayStation 5",
        "Lorem ipsum dolor sit amet, consectetur adipiscing elit, sed do eiusmod tempor incididunt ut labore.",
        3999.0,
        "https://raw.githubusercontent.com/devsuperior/dscatalog-resources/master/backend/img/1-big.jpg",
    );
    product.add_category(category());
    product
}

pub fn product_named(name: impl Into<String>) -> Product {
    let mut product = product();
    product.name = name.into();
    product
}

pub fn product_dto() -> ProductDto {
    ProductDto::from(&product())
}
