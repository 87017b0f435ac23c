//! Parameter variants and parameter groups.
//!
//! A parameter is a shared base (id, sort order, status) plus a payload whose
//! shape is fixed by its variant tag. Lists are homogeneous: every element of
//! a non-empty [`ParameterGroup`] carries the same tag.

use crate::{FieldValue, ModelError, ModelResult, ParamField};
use prodcfg_types::{AttributeId, ChangeStatus, GroupKey, ParamId, ProductId};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Discriminant of a parameter payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ParamVariant {
    #[default]
    Type1,
    Type2,
    Type3,
}

impl ParamVariant {
    /// Variant selected by an attribute's `contract` cell for the first
    /// parameter of an empty group. Anything that does not name a variant
    /// falls back to the default `type1`.
    #[must_use]
    pub fn from_contract(contract: &str) -> Self {
        match contract.trim() {
            "type2" => Self::Type2,
            "type3" => Self::Type3,
            _ => Self::Type1,
        }
    }

    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Type1 => "type1",
            Self::Type2 => "type2",
            Self::Type3 => "type3",
        }
    }
}

impl fmt::Display for ParamVariant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Variant-specific part of a parameter, tagged by `type` on the wire.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum ParamPayload {
    #[serde(rename = "type1", rename_all = "camelCase")]
    Type1 {
        #[serde(default)]
        code: String,
        #[serde(default)]
        disp_name: String,
    },
    #[serde(rename = "type2")]
    Type2 {
        #[serde(default)]
        min: f64,
        #[serde(default)]
        increment: f64,
    },
    #[serde(rename = "type3", rename_all = "camelCase")]
    Type3 {
        #[serde(default)]
        code: String,
        #[serde(default)]
        disp_name: String,
    },
}

impl ParamPayload {
    /// Empty strings / zeros for the given variant.
    #[must_use]
    pub fn empty(variant: ParamVariant) -> Self {
        match variant {
            ParamVariant::Type1 => Self::Type1 {
                code: String::new(),
                disp_name: String::new(),
            },
            ParamVariant::Type2 => Self::Type2 {
                min: 0.0,
                increment: 0.0,
            },
            ParamVariant::Type3 => Self::Type3 {
                code: String::new(),
                disp_name: String::new(),
            },
        }
    }

    #[must_use]
    pub const fn variant(&self) -> ParamVariant {
        match self {
            Self::Type1 { .. } => ParamVariant::Type1,
            Self::Type2 { .. } => ParamVariant::Type2,
            Self::Type3 { .. } => ParamVariant::Type3,
        }
    }
}

/// One element of a parameter list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Parameter {
    pub param_id: ParamId,
    #[serde(default)]
    pub sort_order: i64,
    #[serde(default, alias = "_status")]
    pub status: ChangeStatus,
    #[serde(flatten)]
    pub payload: ParamPayload,
}

impl Parameter {
    /// A fresh, unsynced parameter with an empty payload.
    #[must_use]
    pub fn new(param_id: ParamId, variant: ParamVariant) -> Self {
        Self {
            param_id,
            sort_order: 0,
            status: ChangeStatus::New,
            payload: ParamPayload::empty(variant),
        }
    }

    #[must_use]
    pub const fn variant(&self) -> ParamVariant {
        self.payload.variant()
    }

    /// Reads a payload cell; `None` if the field is not part of this variant.
    #[must_use]
    pub fn field(&self, field: ParamField) -> Option<FieldValue> {
        match (&self.payload, field) {
            (ParamPayload::Type1 { code, .. } | ParamPayload::Type3 { code, .. }, ParamField::Code) => {
                Some(FieldValue::Text(code.clone()))
            }
            (
                ParamPayload::Type1 { disp_name, .. } | ParamPayload::Type3 { disp_name, .. },
                ParamField::DispName,
            ) => Some(FieldValue::Text(disp_name.clone())),
            (ParamPayload::Type2 { min, .. }, ParamField::Min) => Some(FieldValue::Number(*min)),
            (ParamPayload::Type2 { increment, .. }, ParamField::Increment) => {
                Some(FieldValue::Number(*increment))
            }
            _ => None,
        }
    }

    /// Replaces a payload cell.
    ///
    /// Assigning a field owned by another variant is rejected with
    /// [`ModelError::UnknownVariant`]; the parameter is left untouched.
    pub fn set_field(&mut self, field: ParamField, value: FieldValue) -> ModelResult<()> {
        let variant = self.variant();
        let name = field.name();
        match (&mut self.payload, field) {
            (ParamPayload::Type1 { code, .. } | ParamPayload::Type3 { code, .. }, ParamField::Code) => {
                *code = value.into_text(name)?;
            }
            (
                ParamPayload::Type1 { disp_name, .. } | ParamPayload::Type3 { disp_name, .. },
                ParamField::DispName,
            ) => *disp_name = value.into_text(name)?,
            (ParamPayload::Type2 { min, .. }, ParamField::Min) => *min = value.into_number(name)?,
            (ParamPayload::Type2 { increment, .. }, ParamField::Increment) => {
                *increment = value.into_number(name)?;
            }
            _ => {
                return Err(ModelError::UnknownVariant(format!(
                    "field `{name}` is not part of a {variant} parameter"
                )));
            }
        }
        Ok(())
    }
}

/// The parameter list attached to one attribute.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ParameterGroup {
    pub product_id: ProductId,
    pub attribute_id: AttributeId,
    #[serde(default)]
    pub param: Vec<Parameter>,
}

impl ParameterGroup {
    pub fn new(product_id: ProductId, attribute_id: AttributeId) -> Self {
        Self {
            product_id,
            attribute_id,
            param: Vec::new(),
        }
    }

    #[must_use]
    pub const fn key(&self) -> GroupKey {
        (self.product_id, self.attribute_id)
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.param.is_empty()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.param.len()
    }

    /// The tag shared by every element.
    ///
    /// `Ok(None)` for an empty list (no commitment yet); an error if the
    /// elements disagree.
    pub fn variant(&self) -> ModelResult<Option<ParamVariant>> {
        let mut elements = self.param.iter().map(Parameter::variant);
        let Some(first) = elements.next() else {
            return Ok(None);
        };
        match elements.find(|v| *v != first) {
            None => Ok(Some(first)),
            Some(other) => Err(ModelError::UnknownVariant(format!(
                "parameters of {}/{} mix {first} and {other}",
                self.product_id, self.attribute_id
            ))),
        }
    }

    /// Position of a parameter in display order.
    pub fn index_of(&self, param_id: ParamId) -> Option<usize> {
        self.param.iter().position(|p| p.param_id == param_id)
    }

    pub fn get(&self, param_id: ParamId) -> Option<&Parameter> {
        self.param.iter().find(|p| p.param_id == param_id)
    }
}
