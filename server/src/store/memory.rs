use std::sync::Arc;

use tokio::sync::RwLock;
use types::{Division, Employee, EmployeeDraft, EmployeeFilter, Paged, Result};
use uuid::Uuid;

use super::{Collection, RecordStore, seed};

/// In-process store for demos and tests.
#[derive(Clone, Debug, Default)]
pub struct MemoryStore {
    collection: Arc<RwLock<Collection>>,
    divisions: Arc<[Division]>,
}

impl MemoryStore {
    pub fn new(employees: Vec<Employee>, divisions: Vec<Division>) -> Self {
        Self {
            collection: Arc::new(RwLock::new(Collection::new(employees))),
            divisions: divisions.into(),
        }
    }

    pub fn seeded() -> Self {
        Self::new(seed::employees(), seed::divisions())
    }
}

impl RecordStore for MemoryStore {
    async fn query(&self, filter: &EmployeeFilter, page: u32, per_page: u32) -> Result<Paged<Employee>> {
        Ok(self.collection.read().await.query(filter, page, per_page))
    }

    async fn get(&self, id: Uuid) -> Result<Employee> {
        self.collection.read().await.get(id)
    }

    async fn create(&self, draft: EmployeeDraft) -> Result<Employee> {
        let employee = self
            .collection
            .write()
            .await
            .create(&draft, &self.divisions)?;
        tracing::info!(employee_id = %employee.id, "created employee");
        Ok(employee)
    }

    async fn update(&self, id: Uuid, draft: EmployeeDraft) -> Result<Employee> {
        let employee = self
            .collection
            .write()
            .await
            .update(id, &draft, &self.divisions)?;
        tracing::info!(employee_id = %id, "updated employee");
        Ok(employee)
    }

    async fn delete(&self, id: Uuid) -> Result<()> {
        if self.collection.write().await.delete(id) {
            tracing::info!(employee_id = %id, "deleted employee");
        } else {
            tracing::debug!(employee_id = %id, "delete of unknown employee ignored");
        }
        Ok(())
    }

    async fn divisions(&self) -> Result<Vec<Division>> {
        Ok(self.divisions.to_vec())
    }

    async fn all(&self) -> Result<Vec<Employee>> {
        Ok(self.collection.read().await.employees().to_vec())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn draft(name: &str) -> EmployeeDraft {
        EmployeeDraft {
            name: name.into(),
            phone: "081234567890".into(),
            position: "Scrum Master".into(),
            division_id: "sdm".into(),
            image: String::new(),
        }
    }

    #[tokio::test]
    async fn test_seeded_first_page() {
        let store = MemoryStore::seeded();

        let page = store.query(&EmployeeFilter::default(), 1, 5).await.unwrap();
        assert_eq!(page.data.len(), 5);
        assert_eq!(page.meta.total, 7);
        assert_eq!(page.meta.last_page, 2);

        let page = store.query(&EmployeeFilter::default(), 2, 5).await.unwrap();
        let names: Vec<_> = page.data.iter().map(|e| e.name.as_str()).collect();
        assert_eq!(names, ["Fitriani Indah", "Gilang Pratama"]);
    }

    #[tokio::test]
    async fn test_crud() {
        let store = MemoryStore::new(Vec::new(), seed::divisions());

        let created = store.create(draft("Hana Novita")).await.unwrap();
        assert_eq!(store.get(created.id).await.unwrap(), created);

        let updated = store.update(created.id, draft("Hana Novita Sari")).await.unwrap();
        assert_eq!(updated.name, "Hana Novita Sari");

        store.delete(created.id).await.unwrap();
        assert!(store.get(created.id).await.unwrap_err().is_not_found());
        assert!(store.all().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_delete_unknown_leaves_store_unchanged() {
        let store = MemoryStore::seeded();
        let before = store.all().await.unwrap();

        store.delete(Uuid::now_v7()).await.unwrap();

        assert_eq!(store.all().await.unwrap(), before);
    }

    #[tokio::test]
    async fn test_invalid_draft_not_stored() {
        let store = MemoryStore::seeded();
        let error = store.create(draft("X")).await.unwrap_err();

        assert!(error.field_errors().is_some());
        assert_eq!(store.all().await.unwrap().len(), 7);
    }

    #[tokio::test]
    async fn test_every_bad_field_reported_together() {
        let store = MemoryStore::seeded();
        let mut bad = draft("Al");
        bad.division_id = "keuangan".into();
        bad.phone = "12".into();

        let error = store.create(bad.clone()).await.unwrap_err();
        let fields = error.field_errors().unwrap();
        assert!(fields.get(types::Field::Name).is_some());
        assert!(fields.get(types::Field::Phone).is_some());
        assert!(fields.get(types::Field::Division).is_some());

        let existing = store.all().await.unwrap()[0].id;
        let error = store.update(existing, bad).await.unwrap_err();
        assert_eq!(error.field_errors().unwrap().len(), 3);
    }
}
