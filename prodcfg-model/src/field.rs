use crate::{ModelError, ModelResult, ParamVariant};
use serde::{Deserialize, Serialize};
use std::fmt;

/// The value kind a field accepts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldKind {
    Text,
    Bool,
    Number,
}

impl fmt::Display for FieldKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Text => "text",
            Self::Bool => "bool",
            Self::Number => "number",
        })
    }
}

/// A cell value coming from the grid.
///
/// Untagged on the wire so a presentation layer can send plain JSON scalars.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FieldValue {
    Bool(bool),
    Number(f64),
    Text(String),
}

impl FieldValue {
    /// The kind of this value.
    #[must_use]
    pub const fn kind(&self) -> FieldKind {
        match self {
            Self::Text(_) => FieldKind::Text,
            Self::Bool(_) => FieldKind::Bool,
            Self::Number(_) => FieldKind::Number,
        }
    }

    pub(crate) fn into_text(self, field: &'static str) -> ModelResult<String> {
        match self {
            Self::Text(s) => Ok(s),
            other => Err(mismatch(field, FieldKind::Text, &other)),
        }
    }

    pub(crate) fn into_bool(self, field: &'static str) -> ModelResult<bool> {
        match self {
            Self::Bool(b) => Ok(b),
            other => Err(mismatch(field, FieldKind::Bool, &other)),
        }
    }

    pub(crate) fn into_number(self, field: &'static str) -> ModelResult<f64> {
        match self {
            Self::Number(n) => Ok(n),
            other => Err(mismatch(field, FieldKind::Number, &other)),
        }
    }
}

impl From<&str> for FieldValue {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

impl From<String> for FieldValue {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

impl From<bool> for FieldValue {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

impl From<f64> for FieldValue {
    fn from(value: f64) -> Self {
        Self::Number(value)
    }
}

fn mismatch(field: &'static str, expected: FieldKind, found: &FieldValue) -> ModelError {
    ModelError::FieldKind {
        field,
        expected,
        found: found.kind(),
    }
}

/// Editable Product cells.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ProductField {
    Prefix,
    Type,
    CfgType,
}

impl ProductField {
    pub const ALL: [Self; 3] = [Self::Prefix, Self::Type, Self::CfgType];

    /// JSON key of the field.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Prefix => "prefix",
            Self::Type => "type",
            Self::CfgType => "cfgType",
        }
    }

    #[must_use]
    pub const fn kind(&self) -> FieldKind {
        FieldKind::Text
    }
}

/// Editable Attribute cells. `paramHas` is derived and deliberately absent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum AttributeField {
    Attribute,
    AttributeType,
    #[serde(rename = "attributeJP")]
    AttributeJp,
    AttributeUnit,
    Contract,
    Public,
    Masking,
    Online,
}

impl AttributeField {
    pub const ALL: [Self; 8] = [
        Self::Attribute,
        Self::AttributeType,
        Self::AttributeJp,
        Self::AttributeUnit,
        Self::Contract,
        Self::Public,
        Self::Masking,
        Self::Online,
    ];

    /// JSON key of the field.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Attribute => "attribute",
            Self::AttributeType => "attributeType",
            Self::AttributeJp => "attributeJP",
            Self::AttributeUnit => "attributeUnit",
            Self::Contract => "contract",
            Self::Public => "public",
            Self::Masking => "masking",
            Self::Online => "online",
        }
    }

    #[must_use]
    pub const fn kind(&self) -> FieldKind {
        match self {
            Self::Public | Self::Masking | Self::Online => FieldKind::Bool,
            _ => FieldKind::Text,
        }
    }
}

/// Editable Parameter payload cells.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ParamField {
    Code,
    DispName,
    Min,
    Increment,
}

impl ParamField {
    /// JSON key of the field.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Code => "code",
            Self::DispName => "dispName",
            Self::Min => "min",
            Self::Increment => "increment",
        }
    }

    #[must_use]
    pub const fn kind(&self) -> FieldKind {
        match self {
            Self::Code | Self::DispName => FieldKind::Text,
            Self::Min | Self::Increment => FieldKind::Number,
        }
    }

    /// True if the payload of `variant` owns this field.
    #[must_use]
    pub const fn applies_to(&self, variant: ParamVariant) -> bool {
        match self {
            Self::Code | Self::DispName => {
                matches!(variant, ParamVariant::Type1 | ParamVariant::Type3)
            }
            Self::Min | Self::Increment => matches!(variant, ParamVariant::Type2),
        }
    }

    /// Fields owned by `variant`, in column order.
    #[must_use]
    pub const fn for_variant(variant: ParamVariant) -> &'static [ParamField] {
        match variant {
            ParamVariant::Type1 | ParamVariant::Type3 => &[Self::Code, Self::DispName],
            ParamVariant::Type2 => &[Self::Min, Self::Increment],
        }
    }
}
