//! Remote schema: the snake_case shapes the configuration service speaks, and
//! conversions to and from the local model.
//!
//! Field names differ from the local ones in a few places: a remote
//! attribute's `code` is the local `attribute`, `data_type` is
//! `attributeType`, `disp_name` is `attributeJP`, and `unit` is
//! `attributeUnit`. Products use `prod_id` and `prd_type`.

use crate::{AttributeRecord, ProductRecord, SyncError, SyncResult};
use prodcfg_model::{Attribute, ParamPayload, Parameter, ParameterGroup, Product};
use prodcfg_store::Snapshot;
use prodcfg_types::{AttributeId, ChangeStatus, ParamId, ProductId};
use serde::{Deserialize, Serialize};

/// Variant payload as the remote side encodes it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum ApiParamPayload {
    Type1 {
        #[serde(default)]
        code: String,
        #[serde(default)]
        disp_name: String,
    },
    Type2 {
        #[serde(default)]
        min: f64,
        #[serde(default)]
        increment: f64,
    },
    Type3 {
        #[serde(default)]
        code: String,
        #[serde(default)]
        disp_name: String,
    },
}

impl From<&ParamPayload> for ApiParamPayload {
    fn from(payload: &ParamPayload) -> Self {
        match payload.clone() {
            ParamPayload::Type1 { code, disp_name } => Self::Type1 { code, disp_name },
            ParamPayload::Type2 { min, increment } => Self::Type2 { min, increment },
            ParamPayload::Type3 { code, disp_name } => Self::Type3 { code, disp_name },
        }
    }
}

impl From<ApiParamPayload> for ParamPayload {
    fn from(payload: ApiParamPayload) -> Self {
        match payload {
            ApiParamPayload::Type1 { code, disp_name } => Self::Type1 { code, disp_name },
            ApiParamPayload::Type2 { min, increment } => Self::Type2 { min, increment },
            ApiParamPayload::Type3 { code, disp_name } => Self::Type3 { code, disp_name },
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApiParam {
    pub param_id: ParamId,
    #[serde(default)]
    pub sort_order: i64,
    #[serde(flatten)]
    pub payload: ApiParamPayload,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApiAttribute {
    pub attribute_id: AttributeId,
    #[serde(default)]
    pub code: String,
    #[serde(default)]
    pub data_type: String,
    #[serde(default)]
    pub disp_name: String,
    #[serde(default)]
    pub unit: String,
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
    #[serde(default)]
    pub params: Option<Vec<ApiParam>>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApiProduct {
    pub prod_id: ProductId,
    #[serde(default)]
    pub prefix: String,
    #[serde(default)]
    pub prd_type: String,
    #[serde(default)]
    pub cfg_type: String,
    #[serde(default)]
    pub sort_order: i64,
    #[serde(default)]
    pub attributes: Vec<ApiAttribute>,
}

/// Request body for creating or updating a product.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApiProductInput {
    pub prefix: String,
    pub prd_type: String,
    pub cfg_type: String,
    pub sort_order: i64,
}

impl From<&ProductRecord> for ApiProductInput {
    fn from(r: &ProductRecord) -> Self {
        Self {
            prefix: r.prefix.clone(),
            prd_type: r.product_type.clone(),
            cfg_type: r.cfg_type.clone(),
            sort_order: r.sort_order,
        }
    }
}

/// Request body for creating or updating an attribute.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApiAttributeInput {
    pub code: String,
    pub data_type: String,
    pub disp_name: String,
    pub unit: String,
    pub contract: String,
    pub public: bool,
    pub masking: bool,
    pub online: bool,
    pub sort_order: i64,
}

impl From<&AttributeRecord> for ApiAttributeInput {
    fn from(r: &AttributeRecord) -> Self {
        Self {
            code: r.attribute.clone(),
            data_type: r.attribute_type.clone(),
            disp_name: r.attribute_jp.clone(),
            unit: r.attribute_unit.clone(),
            contract: r.contract.clone(),
            public: r.public,
            masking: r.masking,
            online: r.online,
            sort_order: r.sort_order,
        }
    }
}

/// Request body for creating or updating a parameter.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApiParamInput {
    pub sort_order: i64,
    #[serde(flatten)]
    pub payload: ApiParamPayload,
}

impl From<&Parameter> for ApiParamInput {
    fn from(p: &Parameter) -> Self {
        Self {
            sort_order: p.sort_order,
            payload: (&p.payload).into(),
        }
    }
}

/// Builds a clean snapshot from the remote product list.
///
/// Every status is `synced`; parameters nested under a remote attribute
/// become that attribute's group.
///
/// # Errors
///
/// [`SyncError::Protocol`] if the remote data breaks the model (duplicate
/// ids, mixed parameter variants).
pub fn snapshot_from_remote(remote: Vec<ApiProduct>) -> SyncResult<Snapshot> {
    let mut products = Vec::with_capacity(remote.len());
    let mut groups = Vec::new();

    for api in remote {
        let mut product = Product::new(api.prod_id, api.prefix);
        product.product_type = api.prd_type;
        product.cfg_type = api.cfg_type;
        product.sort_order = api.sort_order;
        product.status = ChangeStatus::Synced;

        for api_attr in api.attributes {
            let mut attr = Attribute::new(api_attr.attribute_id, api_attr.code, api_attr.data_type);
            attr.attribute_jp = api_attr.disp_name;
            attr.attribute_unit = api_attr.unit;
            attr.contract = api_attr.contract;
            attr.public = api_attr.public;
            attr.masking = api_attr.masking;
            attr.online = api_attr.online;
            attr.sort_order = api_attr.sort_order;
            attr.status = ChangeStatus::Synced;

            let params = api_attr.params.unwrap_or_default();
            if !params.is_empty() {
                let mut group = ParameterGroup::new(api.prod_id, api_attr.attribute_id);
                group.param = params
                    .into_iter()
                    .map(|p| Parameter {
                        param_id: p.param_id,
                        sort_order: p.sort_order,
                        status: ChangeStatus::Synced,
                        payload: p.payload.into(),
                    })
                    .collect();
                groups.push(group);
            }
            product.attributes.push(attr);
        }
        products.push(product);
    }

    Snapshot::from_parts(products, groups).map_err(|e| SyncError::Protocol(e.to_string()))
}
