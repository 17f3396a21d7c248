use tracing::debug;

use crate::catalog::models::{
    non_blank, value_to_price, value_to_stock, value_to_string, CatalogNode, CategorySummary,
    Product, ProductPosition, DEFAULT_CATEGORY, DEFAULT_PRODUCT_NAME,
};

static PATH_SEPARATOR: &str = " / ";

/// Walk the tree depth-first and emit every product with the name of its
/// nearest named category.
///
/// Positions without an articul have no stable id and are skipped. When
/// `brand` is set only products whose vendor equals it are kept.
pub fn flatten_products(nodes: &[CatalogNode], brand: Option<&str>) -> Vec<Product> {
    let mut products = Vec::new();
    for node in nodes {
        walk_products(node, DEFAULT_CATEGORY, brand, &mut products);
    }
    products
}

fn walk_products(node: &CatalogNode, inherited: &str, brand: Option<&str>, out: &mut Vec<Product>) {
    let category = node.label().unwrap_or(inherited);

    for position in node.positions() {
        match to_product(position, category) {
            Some(product) if brand.map_or(true, |b| product.vendor.as_deref() == Some(b)) => {
                out.push(product)
            }
            Some(_) => {}
            None => debug!(category = %category, "skipping position without articul"),
        }
    }

    for child in node.children() {
        walk_products(child, category, brand, out);
    }
}

fn to_product(position: &ProductPosition, category: &str) -> Option<Product> {
    let articul = value_to_string(position.articul.as_ref())?;
    let stock = value_to_stock(position.quantity.as_ref());

    Some(Product {
        id: articul.clone(),
        articul,
        name: non_blank(position.name.as_deref()).unwrap_or_else(|| DEFAULT_PRODUCT_NAME.to_owned()),
        category: category.to_owned(),
        price: value_to_price(position.price.as_ref()),
        stock,
        in_stock: stock > 0,
        vendor: non_blank(position.vendor.as_deref()),
        image: non_blank(position.photo.as_deref()),
    })
}

/// Depth-first list of named categories with the number of products in each
/// subtree. Unnamed nodes are transparent: their children move up a level.
pub fn flatten_categories(nodes: &[CatalogNode]) -> Vec<CategorySummary> {
    let mut out = Vec::new();
    for node in nodes {
        walk_categories(node, None, 0, &mut out);
    }
    out
}

fn walk_categories(node: &CatalogNode, parent_path: Option<&str>, depth: usize, out: &mut Vec<CategorySummary>) {
    let Some(name) = node.label() else {
        for child in node.children() {
            walk_categories(child, parent_path, depth, out);
        }
        return;
    };

    let path = match parent_path {
        Some(parent) => format!("{}{}{}", parent, PATH_SEPARATOR, name),
        None => name.to_owned(),
    };
    out.push(CategorySummary {
        id: value_to_string(node.id.as_ref()),
        name: name.to_owned(),
        path: path.clone(),
        depth,
        product_count: count_products(node),
    });

    for child in node.children() {
        walk_categories(child, Some(&path), depth + 1, out);
    }
}

fn count_products(node: &CatalogNode) -> usize {
    node.positions().len() + node.children().iter().map(count_products).sum::<usize>()
}
