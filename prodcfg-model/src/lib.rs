//! Entity model for prodcfg.
//!
//! Defines the three-level configuration hierarchy:
//! - [`Product`]: top-level record owning an ordered list of attributes
//! - [`Attribute`]: named property of a product
//! - [`Parameter`]: one element of an attribute's parameter list, carrying a
//!   [`ParamPayload`] that is one of three closed variants
//! - [`ParameterGroup`]: the parameter list of one `(product, attribute)` pair
//!
//! Editable fields are addressed through [`ProductField`], [`AttributeField`]
//! and [`ParamField`]; values travel as [`FieldValue`]. Assignment is checked
//! against the field's [`FieldKind`] and, for parameters, against the variant
//! that owns the field.
//!
//! The JSON shape (camelCase keys, `type`-tagged parameters) is the one used by
//! the grid and by the archive envelope.

mod entity;
mod error;
mod field;
mod param;

pub use entity::{Attribute, Product};
pub use error::{ModelError, ModelResult};
pub use field::{AttributeField, FieldKind, FieldValue, ParamField, ProductField};
pub use param::{ParamPayload, ParamVariant, Parameter, ParameterGroup};
