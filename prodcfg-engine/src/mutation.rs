//! Editing commands as data.
//!
//! A presentation layer sends these as JSON (`{"op": "add_parameter", ...}`)
//! and the session dispatches them to the [`MutationEngine`].

use crate::{Applied, Direction, EngineResult, MutationEngine};
use prodcfg_model::{AttributeField, FieldValue, ParamField, ProductField};
use prodcfg_store::Snapshot;
use prodcfg_types::{AttributeId, ParamId, ProductId};
use serde::{Deserialize, Serialize};

/// One user edit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case", rename_all_fields = "camelCase")]
pub enum Mutation {
    AddProduct {
        after: Option<ProductId>,
    },
    DeleteProduct {
        product_id: ProductId,
    },
    UpdateProductField {
        product_id: ProductId,
        field: ProductField,
        value: FieldValue,
    },
    AddAttribute {
        product_id: ProductId,
        after: Option<AttributeId>,
    },
    DeleteAttribute {
        product_id: ProductId,
        attribute_id: AttributeId,
    },
    MoveAttribute {
        product_id: ProductId,
        attribute_id: AttributeId,
        direction: Direction,
    },
    UpdateAttributeField {
        product_id: ProductId,
        attribute_id: AttributeId,
        field: AttributeField,
        value: FieldValue,
    },
    AddParameter {
        product_id: ProductId,
        attribute_id: AttributeId,
        after: Option<ParamId>,
    },
    DeleteParameter {
        product_id: ProductId,
        attribute_id: AttributeId,
        param_id: ParamId,
    },
    MoveParameter {
        product_id: ProductId,
        attribute_id: AttributeId,
        param_id: ParamId,
        direction: Direction,
    },
    UpdateParameterField {
        product_id: ProductId,
        attribute_id: AttributeId,
        param_id: ParamId,
        field: ParamField,
        value: FieldValue,
    },
}

impl Mutation {
    /// Wire name of the command.
    pub const fn name(&self) -> &'static str {
        match self {
            Self::AddProduct { .. } => "add_product",
            Self::DeleteProduct { .. } => "delete_product",
            Self::UpdateProductField { .. } => "update_product_field",
            Self::AddAttribute { .. } => "add_attribute",
            Self::DeleteAttribute { .. } => "delete_attribute",
            Self::MoveAttribute { .. } => "move_attribute",
            Self::UpdateAttributeField { .. } => "update_attribute_field",
            Self::AddParameter { .. } => "add_parameter",
            Self::DeleteParameter { .. } => "delete_parameter",
            Self::MoveParameter { .. } => "move_parameter",
            Self::UpdateParameterField { .. } => "update_parameter_field",
        }
    }

    /// Runs the command against `snapshot`.
    pub fn apply(&self, engine: &MutationEngine, snapshot: &Snapshot) -> EngineResult<Applied> {
        match self.clone() {
            Self::AddProduct { after } => engine.add_product(snapshot, after),
            Self::DeleteProduct { product_id } => engine.delete_product(snapshot, product_id),
            Self::UpdateProductField {
                product_id,
                field,
                value,
            } => engine.update_product_field(snapshot, product_id, field, value),
            Self::AddAttribute { product_id, after } => {
                engine.add_attribute(snapshot, product_id, after)
            }
            Self::DeleteAttribute {
                product_id,
                attribute_id,
            } => engine.delete_attribute(snapshot, product_id, attribute_id),
            Self::MoveAttribute {
                product_id,
                attribute_id,
                direction,
            } => engine.move_attribute(snapshot, product_id, attribute_id, direction),
            Self::UpdateAttributeField {
                product_id,
                attribute_id,
                field,
                value,
            } => engine.update_attribute_field(snapshot, product_id, attribute_id, field, value),
            Self::AddParameter {
                product_id,
                attribute_id,
                after,
            } => engine.add_parameter(snapshot, product_id, attribute_id, after),
            Self::DeleteParameter {
                product_id,
                attribute_id,
                param_id,
            } => engine.delete_parameter(snapshot, product_id, attribute_id, param_id),
            Self::MoveParameter {
                product_id,
                attribute_id,
                param_id,
                direction,
            } => engine.move_parameter(snapshot, product_id, attribute_id, param_id, direction),
            Self::UpdateParameterField {
                product_id,
                attribute_id,
                param_id,
                field,
                value,
            } => engine.update_parameter_field(
                snapshot,
                product_id,
                attribute_id,
                param_id,
                field,
                value,
            ),
        }
    }
}
