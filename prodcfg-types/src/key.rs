use crate::{AttributeId, ParamId, ProductId};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Lookup key of a parameter group.
pub type GroupKey = (ProductId, AttributeId);

/// Addresses any entity in the Product → Attribute → Parameter hierarchy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum EntityKey {
    Product {
        product_id: ProductId,
    },
    Attribute {
        product_id: ProductId,
        attribute_id: AttributeId,
    },
    Parameter {
        product_id: ProductId,
        attribute_id: AttributeId,
        param_id: ParamId,
    },
}

impl EntityKey {
    /// The Product this entity belongs to (or is).
    #[must_use]
    pub const fn product_id(&self) -> ProductId {
        match *self {
            Self::Product { product_id }
            | Self::Attribute { product_id, .. }
            | Self::Parameter { product_id, .. } => product_id,
        }
    }

    /// The enclosing parameter group, if this key is below product level.
    #[must_use]
    pub const fn group_key(&self) -> Option<GroupKey> {
        match *self {
            Self::Product { .. } => None,
            Self::Attribute {
                product_id,
                attribute_id,
            }
            | Self::Parameter {
                product_id,
                attribute_id,
                ..
            } => Some((product_id, attribute_id)),
        }
    }

    /// True if `self` is `other` or lies underneath it.
    #[must_use]
    pub fn is_within(&self, other: &EntityKey) -> bool {
        match *other {
            Self::Product { product_id } => self.product_id() == product_id,
            Self::Attribute {
                product_id,
                attribute_id,
            } => self.group_key() == Some((product_id, attribute_id)),
            Self::Parameter { .. } => self == other,
        }
    }
}

impl fmt::Display for EntityKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Product { product_id } => write!(f, "product {product_id}"),
            Self::Attribute {
                product_id,
                attribute_id,
            } => write!(f, "attribute {product_id}/{attribute_id}"),
            Self::Parameter {
                product_id,
                attribute_id,
                param_id,
            } => write!(f, "parameter {product_id}/{attribute_id}/{param_id}"),
        }
    }
}
