//! JSON-file endpoint catalog
//!
//! Endpoints added from the CLI are stored in a single JSON document that is
//! rewritten atomically (write to a temp file, then rename). Endpoints
//! declared in config files are merged in read-only.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, PoisonError};
use tracing::{debug, info};
use ussd_application::ports::endpoint_catalog::{CatalogError, EndpointCatalog};
use ussd_domain::{DomainError, Endpoint, EndpointId, EndpointUpdate, NewEndpoint};

use crate::config::APP_DIR;

const CATALOG_VERSION: u32 = 1;

#[derive(Debug, Default, Serialize, Deserialize)]
struct CatalogFile {
    #[serde(default)]
    version: u32,
    #[serde(default)]
    endpoints: Vec<Endpoint>,
}

/// Endpoint catalog persisted as JSON on disk
pub struct JsonEndpointCatalog {
    path: PathBuf,
    static_endpoints: Vec<Endpoint>,
    write_lock: Mutex<()>,
}

impl JsonEndpointCatalog {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            static_endpoints: Vec::new(),
            write_lock: Mutex::new(()),
        }
    }

    /// Merge endpoints that come from configuration; they cannot be edited
    pub fn with_static_endpoints(mut self, endpoints: Vec<Endpoint>) -> Self {
        self.static_endpoints = endpoints;
        self
    }

    /// `$XDG_DATA_HOME/ussd-sim/endpoints.json`
    pub fn default_path() -> Option<PathBuf> {
        dirs::data_dir().map(|d| d.join(APP_DIR).join("endpoints.json"))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn is_static(&self, id: &str) -> bool {
        self.static_endpoints.iter().any(|e| e.id.as_str() == id)
    }

    fn load(&self) -> Result<Vec<Endpoint>, CatalogError> {
        if !self.path.exists() {
            return Ok(Vec::new());
        }
        let content = fs::read_to_string(&self.path).map_err(|e| {
            CatalogError::Storage(format!("Failed to read {}: {}", self.path.display(), e))
        })?;
        if content.trim().is_empty() {
            return Ok(Vec::new());
        }
        let file: CatalogFile = serde_json::from_str(&content).map_err(|e| {
            CatalogError::Storage(format!("Failed to parse {}: {}", self.path.display(), e))
        })?;
        Ok(file.endpoints)
    }

    fn save(&self, endpoints: Vec<Endpoint>) -> Result<(), CatalogError> {
        if let Some(parent) = self.path.parent()
            && !parent.as_os_str().is_empty()
        {
            fs::create_dir_all(parent).map_err(|e| {
                CatalogError::Storage(format!("Failed to create {}: {}", parent.display(), e))
            })?;
        }

        let serialized = serde_json::to_vec_pretty(&CatalogFile {
            version: CATALOG_VERSION,
            endpoints,
        })
        .map_err(|e| CatalogError::Storage(format!("Failed to serialize catalog: {}", e)))?;

        let tmp_path = self.path.with_extension("json.tmp");
        fs::write(&tmp_path, serialized).map_err(|e| {
            CatalogError::Storage(format!("Failed to write {}: {}", tmp_path.display(), e))
        })?;
        fs::rename(&tmp_path, &self.path).map_err(|e| {
            CatalogError::Storage(format!("Failed to replace {}: {}", self.path.display(), e))
        })?;
        debug!("Saved endpoint catalog to {}", self.path.display());
        Ok(())
    }

    /// Names must be unique (case-insensitive) across stored and static endpoints
    fn ensure_unique_name(
        &self,
        stored: &[Endpoint],
        name: &str,
        except: Option<&EndpointId>,
    ) -> Result<(), CatalogError> {
        let taken = stored
            .iter()
            .chain(&self.static_endpoints)
            .filter(|e| Some(&e.id) != except)
            .any(|e| e.name.eq_ignore_ascii_case(name.trim()));
        if taken {
            return Err(DomainError::InvalidEndpoint(format!(
                "an endpoint named '{}' already exists",
                name.trim()
            ))
            .into());
        }
        Ok(())
    }
}

impl EndpointCatalog for JsonEndpointCatalog {
    fn list(&self) -> Result<Vec<Endpoint>, CatalogError> {
        let mut endpoints = self.load()?;
        endpoints.extend(self.static_endpoints.iter().cloned());
        endpoints.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(endpoints)
    }

    fn add(&self, draft: NewEndpoint) -> Result<Endpoint, CatalogError> {
        let _guard = self.write_lock.lock().unwrap_or_else(PoisonError::into_inner);
        let mut stored = self.load()?;
        self.ensure_unique_name(&stored, &draft.name, None)?;

        let endpoint = Endpoint::create(EndpointId::generate(), draft, now_millis())?;
        stored.push(endpoint.clone());
        self.save(stored)?;

        info!("Added endpoint {} ({})", endpoint.name, endpoint.id);
        Ok(endpoint)
    }

    fn update(&self, id: &str, update: EndpointUpdate) -> Result<Endpoint, CatalogError> {
        if self.is_static(id) {
            return Err(CatalogError::ReadOnly(id.to_string()));
        }

        let _guard = self.write_lock.lock().unwrap_or_else(PoisonError::into_inner);
        let mut stored = self.load()?;
        let index = stored
            .iter()
            .position(|e| e.id.as_str() == id)
            .ok_or_else(|| CatalogError::NotFound(id.to_string()))?;

        if let Some(name) = &update.name {
            self.ensure_unique_name(&stored, name, Some(&stored[index].id))?;
        }
        stored[index].apply(update)?;
        let updated = stored[index].clone();
        self.save(stored)?;

        info!("Updated endpoint {} ({})", updated.name, updated.id);
        Ok(updated)
    }

    fn remove(&self, id: &str) -> Result<Endpoint, CatalogError> {
        if self.is_static(id) {
            return Err(CatalogError::ReadOnly(id.to_string()));
        }

        let _guard = self.write_lock.lock().unwrap_or_else(PoisonError::into_inner);
        let mut stored = self.load()?;
        let index = stored
            .iter()
            .position(|e| e.id.as_str() == id)
            .ok_or_else(|| CatalogError::NotFound(id.to_string()))?;
        let removed = stored.remove(index);
        self.save(stored)?;

        info!("Removed endpoint {} ({})", removed.name, removed.id);
        Ok(removed)
    }
}

fn now_millis() -> u64 {
    u64::try_from(chrono::Utc::now().timestamp_millis()).unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use ussd_domain::Dialect;

    fn draft(name: &str) -> NewEndpoint {
        NewEndpoint {
            name: name.to_string(),
            phone_number: "233244000111".to_string(),
            callback_url: "http://localhost:3000/ussd".to_string(),
            dialect: Dialect::Arkesel,
        }
    }

    fn catalog(dir: &tempfile::TempDir) -> JsonEndpointCatalog {
        JsonEndpointCatalog::new(dir.path().join("data").join("endpoints.json"))
    }

    fn static_endpoint(name: &str) -> Endpoint {
        Endpoint::create(
            EndpointId::new(format!("config:{}", name)),
            draft(name),
            0,
        )
        .unwrap()
    }

    #[test]
    fn test_missing_file_is_empty_catalog() {
        let dir = tempfile::tempdir().unwrap();
        assert!(catalog(&dir).list().unwrap().is_empty());
    }

    #[test]
    fn test_add_persists_across_instances() {
        let dir = tempfile::tempdir().unwrap();
        let added = catalog(&dir).add(draft("Bank")).unwrap();

        let reopened = catalog(&dir);
        let listed = reopened.list().unwrap();
        assert_eq!(listed, vec![added.clone()]);
        assert!(added.created_at > 0);
        assert!(!reopened.path().with_extension("json.tmp").exists());
    }

    #[test]
    fn test_list_is_newest_first() {
        let dir = tempfile::tempdir().unwrap();
        let catalog = catalog(&dir).with_static_endpoints(vec![static_endpoint("Pinned")]);
        let first = catalog.add(draft("First")).unwrap();
        std::thread::sleep(std::time::Duration::from_millis(5));
        let second = catalog.add(draft("Second")).unwrap();

        let names: Vec<_> = catalog.list().unwrap().into_iter().map(|e| e.name).collect();
        assert_eq!(names, vec!["Second", "First", "Pinned"]);
        assert!(second.created_at >= first.created_at);
    }

    #[test]
    fn test_add_rejects_duplicate_and_invalid() {
        let dir = tempfile::tempdir().unwrap();
        let catalog = catalog(&dir).with_static_endpoints(vec![static_endpoint("Pinned")]);
        catalog.add(draft("Bank")).unwrap();

        assert!(matches!(
            catalog.add(draft("bank")),
            Err(CatalogError::Invalid(_))
        ));
        assert!(matches!(
            catalog.add(draft("PINNED")),
            Err(CatalogError::Invalid(_))
        ));

        let mut bad = draft("Other");
        bad.callback_url = "localhost:3000".to_string();
        assert!(matches!(
            catalog.add(bad),
            Err(CatalogError::Invalid(DomainError::InvalidCallbackUrl(_)))
        ));
        assert_eq!(catalog.list().unwrap().len(), 2);
    }

    #[test]
    fn test_update_changes_fields_and_persists() {
        let dir = tempfile::tempdir().unwrap();
        let added = catalog(&dir).add(draft("Bank")).unwrap();

        let updated = catalog(&dir)
            .update(
                added.id.as_str(),
                EndpointUpdate {
                    dialect: Some(Dialect::AfricasTalking),
                    name: Some("bank".to_string()),
                    ..Default::default()
                },
            )
            .unwrap();
        assert_eq!(updated.dialect, Dialect::AfricasTalking);
        assert_eq!(updated.name, "bank");
        assert_eq!(updated.created_at, added.created_at);

        let stored = catalog(&dir).get(added.id.as_str()).unwrap();
        assert_eq!(stored, updated);
    }

    #[test]
    fn test_update_and_remove_errors() {
        let dir = tempfile::tempdir().unwrap();
        let catalog = catalog(&dir).with_static_endpoints(vec![static_endpoint("Pinned")]);

        assert!(matches!(
            catalog.update("missing", EndpointUpdate::default()),
            Err(CatalogError::NotFound(_))
        ));
        assert!(matches!(
            catalog.update("config:Pinned", EndpointUpdate::default()),
            Err(CatalogError::ReadOnly(_))
        ));
        assert!(matches!(
            catalog.remove("config:Pinned"),
            Err(CatalogError::ReadOnly(_))
        ));
        assert!(matches!(
            catalog.remove("missing"),
            Err(CatalogError::NotFound(_))
        ));
    }

    #[test]
    fn test_remove_deletes_endpoint() {
        let dir = tempfile::tempdir().unwrap();
        let catalog = catalog(&dir);
        let keep = catalog.add(draft("Keep")).unwrap();
        let gone = catalog.add(draft("Gone")).unwrap();

        let removed = catalog.remove(gone.id.as_str()).unwrap();
        assert_eq!(removed, gone);
        assert_eq!(catalog.list().unwrap(), vec![keep]);
    }

    #[test]
    fn test_corrupt_file_is_storage_error() {
        let dir = tempfile::tempdir().unwrap();
        let catalog = catalog(&dir);
        fs::create_dir_all(catalog.path().parent().unwrap()).unwrap();
        fs::write(catalog.path(), "{ not json").unwrap();

        assert!(matches!(catalog.list(), Err(CatalogError::Storage(_))));
    }
}
