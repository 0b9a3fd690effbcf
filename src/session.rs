//! Per-user session state: one table per tab and the current model.
//!
//! Slots hold `Option<Arc<_>>` behind `parking_lot` locks and are replaced
//! whole, so a reader sees either the previous value or the new one.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use parking_lot::{Mutex, RwLock};
use uuid::Uuid;

use crate::config::LabConfig;
use crate::data::{loader, Table, TableInfo};
use crate::error::{LabError, Result};
use crate::regression::{self, Metrics, TrainedModel};

/// The tabs that own a table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Tab {
    Explorer,
    Regression,
}

impl fmt::Display for Tab {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Tab::Explorer => write!(f, "Data Explorer"),
            Tab::Regression => write!(f, "Regression Lab"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SessionId(Uuid);

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

// ---------------------------------------------------------------------------
// Session
// ---------------------------------------------------------------------------

pub struct Session {
    id: SessionId,
    config: Arc<LabConfig>,
    explorer: RwLock<Option<Arc<Table>>>,
    regression: RwLock<Option<Arc<Table>>>,
    model: RwLock<Option<Arc<TrainedModel>>>,
    /// Serializes training runs.
    training: Mutex<()>,
}

impl Session {
    pub fn new(config: Arc<LabConfig>) -> Self {
        Self {
            id: SessionId(Uuid::new_v4()),
            config,
            explorer: RwLock::new(None),
            regression: RwLock::new(None),
            model: RwLock::new(None),
            training: Mutex::new(()),
        }
    }

    pub fn id(&self) -> SessionId {
        self.id
    }

    pub fn config(&self) -> &LabConfig {
        &self.config
    }

    fn slot(&self, tab: Tab) -> &RwLock<Option<Arc<Table>>> {
        match tab {
            Tab::Explorer => &self.explorer,
            Tab::Regression => &self.regression,
        }
    }

    pub fn table(&self, tab: Tab) -> Option<Arc<Table>> {
        self.slot(tab).read().clone()
    }

    pub fn model(&self) -> Option<Arc<TrainedModel>> {
        self.model.read().clone()
    }

    /// Parse raw bytes and make them the tab's table. On failure the
    /// previous table stays.
    pub fn upload_table(&self, tab: Tab, bytes: &[u8], filename: &str) -> Result<TableInfo> {
        let table = loader::load_bytes(bytes, filename)?;
        Ok(self.install_table(tab, table))
    }

    /// Like [`Self::upload_table`] for a data-URL upload payload.
    pub fn upload_payload(&self, tab: Tab, contents: &str, filename: &str) -> Result<TableInfo> {
        let table = loader::decode_upload(contents, filename)?;
        Ok(self.install_table(tab, table))
    }

    pub fn install_table(&self, tab: Tab, table: Table) -> TableInfo {
        let info = table.info();
        *self.slot(tab).write() = Some(Arc::new(table));
        log::info!("[{}] {tab} table replaced ({info})", self.id);
        info
    }

    /// Train on the Regression Lab table and make the result the current
    /// model. A failed run leaves the previous model in place.
    pub fn train(&self, features: &[String], target: Option<&str>) -> Result<Metrics> {
        let _guard = self.training.lock();
        let table = self.table(Tab::Regression);
        let (model, metrics) = regression::train(
            table.as_deref(),
            features,
            target,
            &self.config.train_params(),
        )?;
        *self.model.write() = Some(Arc::new(model));
        Ok(metrics)
    }

    /// Predict with the current model from values in its feature order.
    pub fn predict(&self, values: &[Option<f64>]) -> Result<f64> {
        let model = self.model().ok_or(LabError::NotTrained)?;
        if self.table(Tab::Regression).is_none() {
            return Err(LabError::NoData);
        }
        model.predict(values)
    }
}

impl fmt::Debug for Session {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Session")
            .field("id", &self.id)
            .field("explorer", &self.explorer.read().as_ref().map(|t| t.info()))
            .field("regression", &self.regression.read().as_ref().map(|t| t.info()))
            .field("trained", &self.model.read().is_some())
            .finish()
    }
}

// ---------------------------------------------------------------------------
// SessionManager
// ---------------------------------------------------------------------------

/// Owns every live session.
#[derive(Debug)]
pub struct SessionManager {
    config: Arc<LabConfig>,
    sessions: RwLock<HashMap<SessionId, Arc<Session>>>,
}

impl SessionManager {
    pub fn new(config: LabConfig) -> Self {
        Self {
            config: Arc::new(config),
            sessions: RwLock::new(HashMap::new()),
        }
    }

    pub fn create(&self) -> Arc<Session> {
        let session = Arc::new(Session::new(Arc::clone(&self.config)));
        self.sessions
            .write()
            .insert(session.id(), Arc::clone(&session));
        log::info!("Created session {}", session.id());
        session
    }

    pub fn get(&self, id: SessionId) -> Option<Arc<Session>> {
        self.sessions.read().get(&id).cloned()
    }

    /// Drop a session; returns whether it existed.
    pub fn end(&self, id: SessionId) -> bool {
        let removed = self.sessions.write().remove(&id).is_some();
        if removed {
            log::info!("Ended session {id}");
        }
        removed
    }

    pub fn len(&self) -> usize {
        self.sessions.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.sessions.read().is_empty()
    }
}

impl Default for SessionManager {
    fn default() -> Self {
        Self::new(LabConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const LINEAR: &[u8] = b"x,y\n1,2\n2,4\n3,6\n4,8\n5,10\n6,12\n7,14\n8,16\n9,18\n10,20\n";

    #[test]
    fn tabs_hold_independent_tables() {
        let session = SessionManager::default().create();
        session
            .upload_table(Tab::Explorer, b"a\n1\n", "one.csv")
            .unwrap();
        assert!(session.table(Tab::Explorer).is_some());
        assert!(session.table(Tab::Regression).is_none());
    }

    #[test]
    fn failed_upload_keeps_previous_table() {
        let session = SessionManager::default().create();
        session.upload_table(Tab::Explorer, LINEAR, "lin.csv").unwrap();

        let err = session
            .upload_table(Tab::Explorer, b"a\n1\n", "notes.txt")
            .unwrap_err();
        assert!(matches!(err, LabError::UnsupportedFormat { .. }));
        assert_eq!(session.table(Tab::Explorer).unwrap().n_rows(), 10);
    }

    #[test]
    fn predict_before_training_is_not_trained() {
        let session = SessionManager::default().create();
        assert!(matches!(
            session.predict(&[Some(1.0)]),
            Err(LabError::NotTrained)
        ));
    }

    #[test]
    fn train_then_predict() {
        let session = SessionManager::default().create();
        session.upload_table(Tab::Regression, LINEAR, "lin.csv").unwrap();

        session.train(&["x".to_string()], Some("y")).unwrap();
        let pred = session.predict(&[Some(5.0)]).unwrap();
        assert!((pred - 10.0).abs() < 0.5);
    }

    #[test]
    fn failed_training_keeps_previous_model() {
        let session = SessionManager::default().create();
        session.upload_table(Tab::Regression, LINEAR, "lin.csv").unwrap();
        session.train(&["x".to_string()], Some("y")).unwrap();
        let before = session.model().unwrap();

        assert!(session.train(&[], Some("y")).is_err());
        assert!(Arc::ptr_eq(&before, &session.model().unwrap()));
    }

    #[test]
    fn concurrent_training_and_prediction_on_one_session() {
        let session = SessionManager::default().create();
        session.upload_table(Tab::Regression, LINEAR, "lin.csv").unwrap();

        let handles: Vec<_> = (0..8)
            .map(|_| {
                let session = Arc::clone(&session);
                std::thread::spawn(move || {
                    for _ in 0..25 {
                        session.train(&["x".to_string()], Some("y")).unwrap();
                        let pred = session.predict(&[Some(5.0)]).unwrap();
                        assert!((pred - 10.0).abs() < 0.5);
                    }
                })
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }

        let model = session.model().unwrap();
        assert_eq!(model.features(), ["x"]);
        assert_eq!(model.target(), "y");
    }

    #[test]
    fn sessions_are_isolated_and_removable() {
        let manager = SessionManager::default();
        let a = manager.create();
        let b = manager.create();
        assert_ne!(a.id(), b.id());
        assert_eq!(manager.len(), 2);

        a.upload_table(Tab::Regression, LINEAR, "lin.csv").unwrap();
        a.train(&["x".to_string()], Some("y")).unwrap();
        assert!(b.model().is_none());

        assert!(manager.end(a.id()));
        assert!(!manager.end(a.id()));
        assert!(manager.get(a.id()).is_none());
        assert!(manager.get(b.id()).is_some());
    }
}
