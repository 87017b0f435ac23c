use crate::{AttributeField, FieldValue, ModelResult, ProductField};
use prodcfg_types::{AttributeId, ChangeStatus, ProductId};
use serde::{Deserialize, Serialize};

/// Top-level configuration record.
///
/// `attributes` is kept in display order; `sort_order` mirrors that order in
/// strides of [`prodcfg_types::SORT_STRIDE`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    pub product_id: ProductId,
    #[serde(default)]
    pub prefix: String,
    #[serde(default, rename = "type")]
    pub product_type: String,
    #[serde(default)]
    pub cfg_type: String,
    #[serde(default)]
    pub attributes: Vec<Attribute>,
    #[serde(default)]
    pub sort_order: i64,
    #[serde(default, alias = "_status")]
    pub status: ChangeStatus,
}

impl Product {
    /// A fresh, unsynced product with no attributes.
    pub fn new(product_id: ProductId, prefix: impl Into<String>) -> Self {
        Self {
            product_id,
            prefix: prefix.into(),
            product_type: String::new(),
            cfg_type: String::new(),
            attributes: Vec::new(),
            sort_order: 0,
            status: ChangeStatus::New,
        }
    }

    /// Looks up an attribute by id.
    pub fn attribute(&self, attribute_id: AttributeId) -> Option<&Attribute> {
        self.attributes
            .iter()
            .find(|a| a.attribute_id == attribute_id)
    }

    /// Position of an attribute in display order.
    pub fn attribute_index(&self, attribute_id: AttributeId) -> Option<usize> {
        self.attributes
            .iter()
            .position(|a| a.attribute_id == attribute_id)
    }

    /// Highest attribute id currently present.
    pub fn max_attribute_id(&self) -> Option<AttributeId> {
        self.attributes.iter().map(|a| a.attribute_id).max()
    }

    /// Reads a cell value.
    pub fn field(&self, field: ProductField) -> FieldValue {
        match field {
            ProductField::Prefix => FieldValue::Text(self.prefix.clone()),
            ProductField::Type => FieldValue::Text(self.product_type.clone()),
            ProductField::CfgType => FieldValue::Text(self.cfg_type.clone()),
        }
    }

    /// Replaces a cell value. Leaves `status` alone.
    pub fn set_field(&mut self, field: ProductField, value: FieldValue) -> ModelResult<()> {
        let text = value.into_text(field.name())?;
        match field {
            ProductField::Prefix => self.prefix = text,
            ProductField::Type => self.product_type = text,
            ProductField::CfgType => self.cfg_type = text,
        }
        Ok(())
    }
}

/// Named property of a product.
///
/// Whether the attribute has parameters (`paramHas`) is not stored here; it is
/// derived from the owning snapshot's parameter groups.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Attribute {
    pub attribute_id: AttributeId,
    #[serde(default)]
    pub attribute: String,
    #[serde(default)]
    pub attribute_type: String,
    #[serde(default, rename = "attributeJP")]
    pub attribute_jp: String,
    #[serde(default)]
    pub attribute_unit: String,
    #[serde(default)]
    pub contract: String,
    #[serde(default)]
    pub public: bool,
    #[serde(default)]
    pub masking: bool,
    #[serde(default)]
    pub online: bool,
    #[serde(default)]
    pub sort_order: i64,
    #[serde(default, alias = "_status")]
    pub status: ChangeStatus,
}

impl Attribute {
    /// A fresh, unsynced attribute with empty text and all flags off.
    pub fn new(
        attribute_id: AttributeId,
        label: impl Into<String>,
        attribute_type: impl Into<String>,
    ) -> Self {
        Self {
            attribute_id,
            attribute: label.into(),
            attribute_type: attribute_type.into(),
            attribute_jp: String::new(),
            attribute_unit: String::new(),
            contract: String::new(),
            public: false,
            masking: false,
            online: false,
            sort_order: 0,
            status: ChangeStatus::New,
        }
    }

    /// Reads a cell value.
    pub fn field(&self, field: AttributeField) -> FieldValue {
        match field {
            AttributeField::Attribute => FieldValue::Text(self.attribute.clone()),
            AttributeField::AttributeType => FieldValue::Text(self.attribute_type.clone()),
            AttributeField::AttributeJp => FieldValue::Text(self.attribute_jp.clone()),
            AttributeField::AttributeUnit => FieldValue::Text(self.attribute_unit.clone()),
            AttributeField::Contract => FieldValue::Text(self.contract.clone()),
            AttributeField::Public => FieldValue::Bool(self.public),
            AttributeField::Masking => FieldValue::Bool(self.masking),
            AttributeField::Online => FieldValue::Bool(self.online),
        }
    }

    /// Replaces a cell value. Leaves `status` alone.
    pub fn set_field(&mut self, field: AttributeField, value: FieldValue) -> ModelResult<()> {
        let name = field.name();
        match field {
            AttributeField::Attribute => self.attribute = value.into_text(name)?,
            AttributeField::AttributeType => self.attribute_type = value.into_text(name)?,
            AttributeField::AttributeJp => self.attribute_jp = value.into_text(name)?,
            AttributeField::AttributeUnit => self.attribute_unit = value.into_text(name)?,
            AttributeField::Contract => self.contract = value.into_text(name)?,
            AttributeField::Public => self.public = value.into_bool(name)?,
            AttributeField::Masking => self.masking = value.into_bool(name)?,
            AttributeField::Online => self.online = value.into_bool(name)?,
        }
        Ok(())
    }
}
