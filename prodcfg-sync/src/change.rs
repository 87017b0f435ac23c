//! Flat remote operations produced from a snapshot.

use crate::SyncResult;
use prodcfg_model::{Attribute, Parameter, Product};
use prodcfg_types::{AttributeId, EntityKey, ParamId, ProductId, SyncId};
use serde::{Deserialize, Serialize};

/// A product without its attributes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductRecord {
    pub product_id: ProductId,
    pub prefix: String,
    #[serde(rename = "type")]
    pub product_type: String,
    pub cfg_type: String,
    pub sort_order: i64,
}

impl From<&Product> for ProductRecord {
    fn from(p: &Product) -> Self {
        Self {
            product_id: p.product_id,
            prefix: p.prefix.clone(),
            product_type: p.product_type.clone(),
            cfg_type: p.cfg_type.clone(),
            sort_order: p.sort_order,
        }
    }
}

/// An attribute without its parameters.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AttributeRecord {
    pub attribute_id: AttributeId,
    pub attribute: String,
    pub attribute_type: String,
    #[serde(rename = "attributeJP")]
    pub attribute_jp: String,
    pub attribute_unit: String,
    pub contract: String,
    pub public: bool,
    pub masking: bool,
    pub online: bool,
    pub sort_order: i64,
}

impl From<&Attribute> for AttributeRecord {
    fn from(a: &Attribute) -> Self {
        Self {
            attribute_id: a.attribute_id,
            attribute: a.attribute.clone(),
            attribute_type: a.attribute_type.clone(),
            attribute_jp: a.attribute_jp.clone(),
            attribute_unit: a.attribute_unit.clone(),
            contract: a.contract.clone(),
            public: a.public,
            masking: a.masking,
            online: a.online,
            sort_order: a.sort_order,
        }
    }
}

/// One remote operation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "op", content = "data", rename_all = "snake_case")]
pub enum Change {
    CreateProduct(ProductRecord),
    UpdateProduct(ProductRecord),
    DeleteProduct(ProductId),
    #[serde(rename_all = "camelCase")]
    CreateAttribute {
        product_id: ProductId,
        record: AttributeRecord,
    },
    #[serde(rename_all = "camelCase")]
    UpdateAttribute {
        product_id: ProductId,
        record: AttributeRecord,
    },
    #[serde(rename_all = "camelCase")]
    DeleteAttribute {
        product_id: ProductId,
        attribute_id: AttributeId,
    },
    #[serde(rename_all = "camelCase")]
    CreateParameter {
        product_id: ProductId,
        attribute_id: AttributeId,
        param: Parameter,
    },
    #[serde(rename_all = "camelCase")]
    UpdateParameter {
        product_id: ProductId,
        attribute_id: AttributeId,
        param: Parameter,
    },
    #[serde(rename_all = "camelCase")]
    DeleteParameter {
        product_id: ProductId,
        attribute_id: AttributeId,
        param_id: ParamId,
    },
}

impl Change {
    /// The entity this operation targets.
    pub fn key(&self) -> EntityKey {
        match self {
            Self::CreateProduct(r) | Self::UpdateProduct(r) => EntityKey::Product {
                product_id: r.product_id,
            },
            Self::DeleteProduct(product_id) => EntityKey::Product {
                product_id: *product_id,
            },
            Self::CreateAttribute { product_id, record }
            | Self::UpdateAttribute { product_id, record } => EntityKey::Attribute {
                product_id: *product_id,
                attribute_id: record.attribute_id,
            },
            Self::DeleteAttribute {
                product_id,
                attribute_id,
            } => EntityKey::Attribute {
                product_id: *product_id,
                attribute_id: *attribute_id,
            },
            Self::CreateParameter {
                product_id,
                attribute_id,
                param,
            }
            | Self::UpdateParameter {
                product_id,
                attribute_id,
                param,
            } => EntityKey::Parameter {
                product_id: *product_id,
                attribute_id: *attribute_id,
                param_id: param.param_id,
            },
            Self::DeleteParameter {
                product_id,
                attribute_id,
                param_id,
            } => EntityKey::Parameter {
                product_id: *product_id,
                attribute_id: *attribute_id,
                param_id: *param_id,
            },
        }
    }

    pub const fn is_create(&self) -> bool {
        matches!(
            self,
            Self::CreateProduct(_) | Self::CreateAttribute { .. } | Self::CreateParameter { .. }
        )
    }

    pub const fn is_delete(&self) -> bool {
        matches!(
            self,
            Self::DeleteProduct(_) | Self::DeleteAttribute { .. } | Self::DeleteParameter { .. }
        )
    }
}

/// Everything one sync pass sends, in application order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChangeSet {
    pub sync_id: SyncId,
    pub changes: Vec<Change>,
}

impl ChangeSet {
    pub fn new(changes: Vec<Change>) -> Self {
        Self {
            sync_id: SyncId::new(),
            changes,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.changes.is_empty()
    }

    pub fn len(&self) -> usize {
        self.changes.len()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Change> {
        self.changes.iter()
    }

    pub fn to_json(&self) -> SyncResult<String> {
        Ok(serde_json::to_string(self)?)
    }

    pub fn from_json(json: &str) -> SyncResult<Self> {
        Ok(serde_json::from_str(json)?)
    }
}

impl<'a> IntoIterator for &'a ChangeSet {
    type Item = &'a Change;
    type IntoIter = std::slice::Iter<'a, Change>;

    fn into_iter(self) -> Self::IntoIter {
        self.changes.iter()
    }
}
