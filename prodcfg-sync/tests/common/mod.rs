#![allow(dead_code)]

use async_trait::async_trait;
use prodcfg_engine::{EditorSession, EngineConfig};
use prodcfg_model::{Attribute, ParamVariant, Parameter, ParameterGroup, Product};
use prodcfg_store::Snapshot;
use prodcfg_sync::{ApiProduct, ChangeSet, SyncAdapter, SyncError, SyncResult};
use prodcfg_types::{AttributeId, ChangeStatus, ParamId, ProductId, sort_order_at};
use tokio::sync::Mutex;

pub fn pid(v: i64) -> ProductId {
    ProductId::new(v)
}

pub fn aid(v: i64) -> AttributeId {
    AttributeId::new(v)
}

pub fn prm(v: i64) -> ParamId {
    ParamId::new(v)
}

pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

/// Two synced products; product 0 has attributes 0 and 1, attribute 1 has
/// parameters 0 and 1.
pub fn synced_snapshot() -> Snapshot {
    let mut p0 = Product::new(pid(0), "P0");
    p0.status = ChangeStatus::Synced;
    for a in 0..2 {
        let mut attr = Attribute::new(aid(a), format!("attr{a}"), "string");
        attr.status = ChangeStatus::Synced;
        attr.sort_order = sort_order_at(a as usize);
        p0.attributes.push(attr);
    }
    let mut p1 = Product::new(pid(1), "P1");
    p1.status = ChangeStatus::Synced;
    p1.sort_order = sort_order_at(1);

    let mut group = ParameterGroup::new(pid(0), aid(1));
    for i in 0..2 {
        let mut param = Parameter::new(prm(i), ParamVariant::Type1);
        param.status = ChangeStatus::Synced;
        param.sort_order = sort_order_at(i as usize);
        group.param.push(param);
    }
    Snapshot::new(vec![p0, p1], vec![group])
}

pub fn session() -> EditorSession {
    init_tracing();
    EditorSession::new(EngineConfig::default(), synced_snapshot())
}

/// Records pushed change sets; fails every push while `failure` is set.
#[derive(Default)]
pub struct MemoryAdapter {
    pub pushed: Mutex<Vec<ChangeSet>>,
    pub failure: Mutex<Option<String>>,
    pub remote: Mutex<Vec<ApiProduct>>,
}

impl MemoryAdapter {
    pub fn failing(message: &str) -> Self {
        Self {
            failure: Mutex::new(Some(message.to_string())),
            ..Self::default()
        }
    }

    pub fn with_remote(remote: Vec<ApiProduct>) -> Self {
        Self {
            remote: Mutex::new(remote),
            ..Self::default()
        }
    }

    pub async fn push_count(&self) -> usize {
        self.pushed.lock().await.len()
    }
}

#[async_trait]
impl SyncAdapter for MemoryAdapter {
    async fn push(&self, changes: &ChangeSet) -> SyncResult<()> {
        if let Some(message) = self.failure.lock().await.clone() {
            return Err(SyncError::Remote(message));
        }
        self.pushed.lock().await.push(changes.clone());
        Ok(())
    }

    async fn fetch(&self) -> SyncResult<Vec<ApiProduct>> {
        if let Some(message) = self.failure.lock().await.clone() {
            return Err(SyncError::Remote(message));
        }
        Ok(self.remote.lock().await.clone())
    }
}
