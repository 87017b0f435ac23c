//! Row grouping for the grid renderer.
//!
//! Pure functions of a [`Snapshot`]. A product cell spans every row of its
//! attributes; an attribute cell spans every row of its parameters. An
//! attribute with no parameters still occupies one row, as does a product
//! with no attributes in the unfiltered layout.

use prodcfg_store::Snapshot;
use prodcfg_types::{AttributeId, ParamId, ProductId};
use serde::{Deserialize, Serialize};

/// Which attributes the detail grid shows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DetailFilter {
    /// Every attribute.
    #[default]
    All,
    /// Only attributes that have parameters; products left without any are
    /// omitted.
    WithParameters,
}

/// One physical grid row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GridRow {
    pub product_id: ProductId,
    /// `None` on the placeholder row of a product without attributes.
    pub attribute_id: Option<AttributeId>,
    /// `None` on an attribute's placeholder row.
    pub param_id: Option<ParamId>,
    pub is_first_of_product: bool,
    pub is_first_of_attribute: bool,
    pub product_row_span: usize,
    pub attribute_row_span: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductSpan {
    pub product_id: ProductId,
    pub first_row: usize,
    pub row_count: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AttributeSpan {
    pub product_id: ProductId,
    pub attribute_id: AttributeId,
    pub first_row: usize,
    pub row_count: usize,
}

/// Rows plus per-entity span summaries.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GridLayout {
    pub rows: Vec<GridRow>,
    pub products: Vec<ProductSpan>,
    pub attributes: Vec<AttributeSpan>,
}

impl GridLayout {
    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    pub fn product_span(&self, product_id: ProductId) -> Option<&ProductSpan> {
        self.products.iter().find(|s| s.product_id == product_id)
    }

    pub fn attribute_span(
        &self,
        product_id: ProductId,
        attribute_id: AttributeId,
    ) -> Option<&AttributeSpan> {
        self.attributes
            .iter()
            .find(|s| s.product_id == product_id && s.attribute_id == attribute_id)
    }
}

/// Rows an attribute occupies in the detail grid: `max(parameters, 1)`.
pub fn attribute_row_span(snapshot: &Snapshot, product_id: ProductId, attribute_id: AttributeId) -> usize {
    snapshot.params(product_id, attribute_id).len().max(1)
}

/// Layout of the detail grid: one row per parameter, one placeholder row per
/// attribute without parameters.
pub fn detail_layout(snapshot: &Snapshot, filter: DetailFilter) -> GridLayout {
    let mut layout = GridLayout::default();

    for product in snapshot.products() {
        let pid = product.product_id;
        let attributes: Vec<AttributeId> = product
            .attributes
            .iter()
            .map(|a| a.attribute_id)
            .filter(|aid| filter == DetailFilter::All || snapshot.param_has(pid, *aid))
            .collect();

        if attributes.is_empty() {
            if filter == DetailFilter::All {
                push_placeholder(&mut layout, pid);
            }
            continue;
        }

        let product_span: usize = attributes
            .iter()
            .map(|aid| attribute_row_span(snapshot, pid, *aid))
            .sum();
        layout.products.push(ProductSpan {
            product_id: pid,
            first_row: layout.rows.len(),
            row_count: product_span,
        });

        for (a_index, aid) in attributes.iter().copied().enumerate() {
            let span = attribute_row_span(snapshot, pid, aid);
            layout.attributes.push(AttributeSpan {
                product_id: pid,
                attribute_id: aid,
                first_row: layout.rows.len(),
                row_count: span,
            });

            let params = snapshot.params(pid, aid);
            let param_ids: Vec<Option<ParamId>> = if params.is_empty() {
                vec![None]
            } else {
                params.iter().map(|p| Some(p.param_id)).collect()
            };
            for (p_index, param_id) in param_ids.into_iter().enumerate() {
                layout.rows.push(GridRow {
                    product_id: pid,
                    attribute_id: Some(aid),
                    param_id,
                    is_first_of_product: a_index == 0 && p_index == 0,
                    is_first_of_attribute: p_index == 0,
                    product_row_span: product_span,
                    attribute_row_span: span,
                });
            }
        }
    }

    layout
}

/// Layout of the base grid: one row per attribute, with the product cell
/// spanning `max(attributes, 1)` rows.
pub fn base_layout(snapshot: &Snapshot) -> GridLayout {
    let mut layout = GridLayout::default();

    for product in snapshot.products() {
        let pid = product.product_id;
        if product.attributes.is_empty() {
            push_placeholder(&mut layout, pid);
            continue;
        }

        let span = product.attributes.len();
        layout.products.push(ProductSpan {
            product_id: pid,
            first_row: layout.rows.len(),
            row_count: span,
        });
        for (index, attr) in product.attributes.iter().enumerate() {
            layout.attributes.push(AttributeSpan {
                product_id: pid,
                attribute_id: attr.attribute_id,
                first_row: layout.rows.len(),
                row_count: 1,
            });
            layout.rows.push(GridRow {
                product_id: pid,
                attribute_id: Some(attr.attribute_id),
                param_id: None,
                is_first_of_product: index == 0,
                is_first_of_attribute: true,
                product_row_span: span,
                attribute_row_span: 1,
            });
        }
    }

    layout
}

fn push_placeholder(layout: &mut GridLayout, product_id: ProductId) {
    layout.products.push(ProductSpan {
        product_id,
        first_row: layout.rows.len(),
        row_count: 1,
    });
    layout.rows.push(GridRow {
        product_id,
        attribute_id: None,
        param_id: None,
        is_first_of_product: true,
        is_first_of_attribute: true,
        product_row_span: 1,
        attribute_row_span: 1,
    });
}
