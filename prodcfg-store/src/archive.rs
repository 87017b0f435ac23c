//! Versioned JSON envelope for export and restore.
//!
//! ```json
//! {
//!   "version": "1.0",
//!   "timestamp": "2026-01-01T00:00:00.000Z",
//!   "baseTableData": [ /* products with nested attributes */ ],
//!   "detailTableData": [ /* { productId, attributeId, param: [...] } */ ]
//! }
//! ```
//!
//! Attributes are written with the derived `paramHas` flag. Each tombstone is
//! written as a stub record with status `deleted` at its place in the tree;
//! import turns those back into tombstones, and their ids keep counting
//! toward the id watermarks.

use crate::{Snapshot, StoreError, StoreResult};
use chrono::{DateTime, SecondsFormat, Utc};
use prodcfg_model::{Attribute, Parameter, ParameterGroup, Product};
use prodcfg_types::{ChangeStatus, EntityKey, ProductId};
use serde::Serialize;
use serde_json::{Map, Value};
use std::path::Path;

/// Version written when the caller does not choose one.
pub const DEFAULT_VERSION: &str = "1.0";

const BASE_KEY: &str = "baseTableData";
const DETAIL_KEY: &str = "detailTableData";

/// A parsed archive.
#[derive(Debug, Clone, PartialEq)]
pub struct Archive {
    pub version: String,
    /// `None` when the file carried no readable timestamp.
    pub timestamp: Option<DateTime<Utc>>,
    pub snapshot: Snapshot,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct Envelope<'a> {
    version: &'a str,
    timestamp: String,
    base_table_data: Vec<ProductRecord<'a>>,
    detail_table_data: Vec<&'a ParameterGroup>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct ProductRecord<'a> {
    product_id: ProductId,
    prefix: &'a str,
    #[serde(rename = "type")]
    product_type: &'a str,
    cfg_type: &'a str,
    attributes: Vec<AttributeRecord<'a>>,
    sort_order: i64,
    status: ChangeStatus,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct AttributeRecord<'a> {
    #[serde(flatten)]
    attribute: &'a Attribute,
    param_has: bool,
}

impl<'a> ProductRecord<'a> {
    fn new(snapshot: &'a Snapshot, product: &'a Product) -> Self {
        Self {
            product_id: product.product_id,
            prefix: &product.prefix,
            product_type: &product.product_type,
            cfg_type: &product.cfg_type,
            attributes: product
                .attributes
                .iter()
                .map(|attribute| AttributeRecord {
                    attribute,
                    param_has: snapshot.param_has(product.product_id, attribute.attribute_id),
                })
                .collect(),
            sort_order: product.sort_order,
            status: product.status,
        }
    }
}

/// Serializes `snapshot` stamped with the current time.
pub fn export_json(snapshot: &Snapshot, version: &str) -> StoreResult<String> {
    export_json_at(snapshot, version, Utc::now())
}

/// Serializes `snapshot` with an explicit timestamp. Output is pretty-printed
/// with two-space indentation.
pub fn export_json_at(
    snapshot: &Snapshot,
    version: &str,
    timestamp: DateTime<Utc>,
) -> StoreResult<String> {
    let (products, groups) = with_tombstone_stubs(snapshot);
    let envelope = Envelope {
        version,
        timestamp: timestamp.to_rfc3339_opts(SecondsFormat::Millis, true),
        base_table_data: products
            .iter()
            .map(|p| ProductRecord::new(snapshot, p))
            .collect(),
        detail_table_data: groups.iter().collect(),
    };
    Ok(serde_json::to_string_pretty(&envelope)?)
}

/// The live tree with a `deleted` stub appended for every tombstone.
///
/// Attribute and parameter tombstones always sit under a live parent,
/// since deleting the parent folds them into its own tombstone.
fn with_tombstone_stubs(snapshot: &Snapshot) -> (Vec<Product>, Vec<ParameterGroup>) {
    let mut products = snapshot.products().to_vec();
    let mut groups: Vec<ParameterGroup> = snapshot.groups().into_iter().cloned().collect();

    for tombstone in snapshot.tombstones() {
        match tombstone.key {
            EntityKey::Product { product_id } => {
                let mut stub = Product::new(product_id, "");
                stub.status = ChangeStatus::Deleted;
                products.push(stub);
            }
            EntityKey::Attribute {
                product_id,
                attribute_id,
            } => {
                if let Some(product) = products.iter_mut().find(|p| p.product_id == product_id) {
                    let mut stub = Attribute::new(attribute_id, "", "");
                    stub.status = ChangeStatus::Deleted;
                    product.attributes.push(stub);
                }
            }
            EntityKey::Parameter {
                product_id,
                attribute_id,
                param_id,
            } => {
                let key = (product_id, attribute_id);
                let index = match groups.iter().position(|g| g.key() == key) {
                    Some(index) => index,
                    None => {
                        groups.push(ParameterGroup::new(product_id, attribute_id));
                        groups.len() - 1
                    }
                };
                let group = &mut groups[index];
                // a stub must not make the group look mixed on import
                let variant = group.variant().ok().flatten().unwrap_or_default();
                let mut stub = Parameter::new(param_id, variant);
                stub.status = ChangeStatus::Deleted;
                group.param.push(stub);
            }
        }
    }
    (products, groups)
}

/// Exports `snapshot` to a file, replacing it if present.
pub fn write_to_path(path: impl AsRef<Path>, snapshot: &Snapshot, version: &str) -> StoreResult<()> {
    let json = export_json(snapshot, version)?;
    std::fs::write(path, json)?;
    Ok(())
}

/// Parses and validates an archive.
///
/// Both `baseTableData` and `detailTableData` must be present and be arrays.
/// Records lacking a status are treated as `synced`. Any error rejects the
/// whole archive.
pub fn import_json(json: &str) -> StoreResult<Archive> {
    let value: Value = serde_json::from_str(json)?;
    let Value::Object(mut root) = value else {
        return Err(StoreError::MalformedImport(
            "archive root is not an object".to_string(),
        ));
    };

    let base = take_array(&mut root, BASE_KEY)?;
    let detail = take_array(&mut root, DETAIL_KEY)?;

    let products: Vec<Product> = serde_json::from_value(base)
        .map_err(|e| StoreError::MalformedImport(format!("{BASE_KEY}: {e}")))?;
    let groups: Vec<ParameterGroup> = serde_json::from_value(detail)
        .map_err(|e| StoreError::MalformedImport(format!("{DETAIL_KEY}: {e}")))?;

    let version = match root.get("version") {
        Some(Value::String(v)) => v.clone(),
        _ => DEFAULT_VERSION.to_string(),
    };
    let timestamp = root
        .get("timestamp")
        .and_then(Value::as_str)
        .and_then(|s| DateTime::parse_from_rfc3339(s).ok())
        .map(|t| t.with_timezone(&Utc));

    Ok(Archive {
        version,
        timestamp,
        snapshot: Snapshot::from_parts(products, groups)?,
    })
}

/// Reads and validates an archive file.
pub fn read_from_path(path: impl AsRef<Path>) -> StoreResult<Archive> {
    let json = std::fs::read_to_string(path)?;
    import_json(&json)
}

fn take_array(root: &mut Map<String, Value>, key: &str) -> StoreResult<Value> {
    match root.remove(key) {
        Some(v @ Value::Array(_)) => Ok(v),
        Some(_) => Err(StoreError::MalformedImport(format!("`{key}` is not an array"))),
        None => Err(StoreError::MalformedImport(format!("missing `{key}`"))),
    }
}
