//! Partitioning of enriched listings into cross-site equivalence groups.

use std::collections::HashMap;

use serde::Serialize;

use crate::products::EnrichedProduct;

/// Listings believed to be the same real-world product.
///
/// Never empty. The first member is the representative: whichever listing
/// reached the grouper first, not the cheapest or best rated.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(transparent)]
pub struct ProductGroup {
    members: Vec<EnrichedProduct>,
}

impl ProductGroup {
    fn start(first: EnrichedProduct) -> Self {
        Self {
            members: vec![first],
        }
    }

    #[must_use]
    pub fn representative(&self) -> &EnrichedProduct {
        &self.members[0]
    }

    #[must_use]
    pub fn members(&self) -> &[EnrichedProduct] {
        &self.members
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.members.len()
    }

    /// Always `false`; present to pair with [`ProductGroup::len`].
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    /// Price entries for every member except the representative, in group order.
    #[must_use]
    pub fn other_prices(&self) -> Vec<OtherPrice> {
        self.members[1..].iter().map(OtherPrice::from).collect()
    }
}

/// One "also available at" line of the comparison view.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OtherPrice {
    pub source_name: String,
    pub price: String,
    pub product_url: String,
}

impl From<&EnrichedProduct> for OtherPrice {
    fn from(product: &EnrichedProduct) -> Self {
        Self {
            source_name: product.raw.source_name.clone(),
            price: product.raw.price.clone(),
            product_url: product.raw.product_url.clone(),
        }
    }
}

/// Serializable comparison card for one [`ProductGroup`].
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ComparisonEntry {
    pub representative: EnrichedProduct,
    pub other_prices: Vec<OtherPrice>,
    pub member_count: usize,
}

impl From<ProductGroup> for ComparisonEntry {
    fn from(group: ProductGroup) -> Self {
        let other_prices = group.other_prices();
        let member_count = group.len();
        let mut members = group.members;
        let representative = members.swap_remove(0);
        Self {
            representative,
            other_prices,
            member_count,
        }
    }
}

/// Groups listings by [`EnrichedProduct::grouping_key`] in a single pass.
///
/// Groups come out in the order their key was first seen, and members keep
/// their input order, so the output is fully determined by the input order.
#[must_use]
pub fn group_products(products: Vec<EnrichedProduct>) -> Vec<ProductGroup> {
    let mut index_by_key: HashMap<String, usize> = HashMap::new();
    let mut groups: Vec<ProductGroup> = Vec::new();

    for product in products {
        if let Some(&idx) = index_by_key.get(product.grouping_key()) {
            groups[idx].members.push(product);
        } else {
            index_by_key.insert(product.grouping_key().to_owned(), groups.len());
            groups.push(ProductGroup::start(product));
        }
    }

    groups
}
