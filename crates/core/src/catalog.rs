use crate::domain::product::{Product, ProductId};

#[derive(Clone, Debug, Default)]
pub struct Catalog {
    products: Vec<Product>,
}

impl Catalog {
    pub fn new(products: Vec<Product>) -> Self {
        Self { products }
    }

    pub fn find(&self, product_id: ProductId) -> Option<&Product> {
        self.products.iter().find(|product| product.id == product_id)
    }

    pub fn products(&self) -> &[Product] {
        &self.products
    }

    /// Case-insensitive substring match on the product name, or a plain substring
    /// match on the CAS number. A blank query matches every product.
    pub fn search(&self, query: &str) -> Vec<&Product> {
        let query = query.trim();
        let lowered = query.to_lowercase();

        self.products
            .iter()
            .filter(|product| {
                product.name.to_lowercase().contains(&lowered) || product.cas_number.contains(query)
            })
            .collect()
    }
}
