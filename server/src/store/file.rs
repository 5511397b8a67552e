use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::Context;
use tokio::sync::Mutex;
use types::{Division, Employee, EmployeeDraft, EmployeeFilter, Paged, Result};
use uuid::Uuid;

use super::{Collection, RecordStore};

const FILE_NAME: &str = "employees.json";

/// Employees kept in a single JSON document under the data directory.
///
/// Every read loads the whole document and every mutation rewrites it.
#[derive(Clone, Debug)]
pub struct FileStore {
    path: PathBuf,
    divisions: Arc<[Division]>,
    write_lock: Arc<Mutex<()>>,
}

impl FileStore {
    /// Open the store in `data_dir`, writing `seed` if no document exists yet.
    pub async fn open(
        data_dir: &Path,
        divisions: Vec<Division>,
        seed: Vec<Employee>,
    ) -> Result<Self> {
        tokio::fs::create_dir_all(data_dir)
            .await
            .with_context(|| format!("creating data dir {}", data_dir.display()))?;

        let store = Self {
            path: data_dir.join(FILE_NAME),
            divisions: divisions.into(),
            write_lock: Arc::new(Mutex::new(())),
        };

        if !tokio::fs::try_exists(&store.path).await? {
            tracing::info!(path = %store.path.display(), "seeding employee file");
            store.save(&Collection::new(seed)).await?;
        }

        Ok(store)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    async fn load(&self) -> Result<Collection> {
        let bytes = tokio::fs::read(&self.path)
            .await
            .with_context(|| format!("reading {}", self.path.display()))?;
        let collection = serde_json::from_slice(&bytes)
            .with_context(|| format!("parsing {}", self.path.display()))?;
        Ok(collection)
    }

    async fn save(&self, collection: &Collection) -> Result<()> {
        let bytes = serde_json::to_vec_pretty(collection)?;
        let tmp = self.path.with_extension("json.tmp");

        tokio::fs::write(&tmp, bytes).await?;
        tokio::fs::rename(&tmp, &self.path)
            .await
            .with_context(|| format!("replacing {}", self.path.display()))?;
        Ok(())
    }

    /// Load, change and write back the document while holding the write lock.
    async fn mutate<T>(&self, f: impl FnOnce(&mut Collection) -> Result<T>) -> Result<T> {
        let _guard = self.write_lock.lock().await;
        let mut collection = self.load().await?;
        let out = f(&mut collection)?;
        self.save(&collection).await?;
        Ok(out)
    }
}

impl RecordStore for FileStore {
    async fn query(&self, filter: &EmployeeFilter, page: u32, per_page: u32) -> Result<Paged<Employee>> {
        Ok(self.load().await?.query(filter, page, per_page))
    }

    async fn get(&self, id: Uuid) -> Result<Employee> {
        self.load().await?.get(id)
    }

    async fn create(&self, draft: EmployeeDraft) -> Result<Employee> {
        let employee = self
            .mutate(|c| c.create(&draft, &self.divisions))
            .await?;
        tracing::info!(employee_id = %employee.id, "created employee");
        Ok(employee)
    }

    async fn update(&self, id: Uuid, draft: EmployeeDraft) -> Result<Employee> {
        let employee = self
            .mutate(|c| c.update(id, &draft, &self.divisions))
            .await?;
        tracing::info!(employee_id = %id, "updated employee");
        Ok(employee)
    }

    async fn delete(&self, id: Uuid) -> Result<()> {
        let removed = self.mutate(|c| Ok(c.delete(id))).await?;
        if removed {
            tracing::info!(employee_id = %id, "deleted employee");
        }
        Ok(())
    }

    async fn divisions(&self) -> Result<Vec<Division>> {
        Ok(self.divisions.to_vec())
    }

    async fn all(&self) -> Result<Vec<Employee>> {
        Ok(self.load().await?.employees().to_vec())
    }
}
