//! The source of truth for employee records.
//!
//! [`RecordStore`] is the one contract every backend honours. Which backend
//! serves the dashboard is decided at startup from [`Config::store`]:
//!
//! | Kind     | Type            | Persistence |
//! |----------|-----------------|-------------|
//! | `memory` | [`MemoryStore`] | none, seeded on startup |
//! | `file`   | [`FileStore`]   | one JSON document, rewritten on every mutation |
//! | `remote` | [`RemoteStore`] | another instance's REST API |

use std::future::Future;

use serde::{Deserialize, Serialize};
use types::{Division, Employee, EmployeeDraft, EmployeeFilter, Paged, Result};
use uuid::Uuid;

use crate::config::{Config, StoreKind};

pub use file::FileStore;
pub use memory::MemoryStore;
pub use remote::RemoteStore;

mod file;
mod memory;
mod remote;
pub mod seed;

pub trait RecordStore: Send + Sync {
    /// One page of the employees matching `filter`, in insertion order.
    ///
    /// A page past the end yields no data; callers clamp first.
    fn query(
        &self,
        filter: &EmployeeFilter,
        page: u32,
        per_page: u32,
    ) -> impl Future<Output = Result<Paged<Employee>>> + Send;

    fn get(&self, id: Uuid) -> impl Future<Output = Result<Employee>> + Send;

    fn create(&self, draft: EmployeeDraft) -> impl Future<Output = Result<Employee>> + Send;

    fn update(
        &self,
        id: Uuid,
        draft: EmployeeDraft,
    ) -> impl Future<Output = Result<Employee>> + Send;

    /// Remove an employee. Removing an unknown id is not an error.
    fn delete(&self, id: Uuid) -> impl Future<Output = Result<()>> + Send;

    fn divisions(&self) -> impl Future<Output = Result<Vec<Division>>> + Send;

    /// Every employee, in insertion order.
    fn all(&self) -> impl Future<Output = Result<Vec<Employee>>> + Send;
}

/// The whole employee collection, as held in memory or on disk.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Collection {
    employees: Vec<Employee>,
}

impl Collection {
    pub fn new(employees: Vec<Employee>) -> Self {
        Self { employees }
    }

    pub fn employees(&self) -> &[Employee] {
        &self.employees
    }

    pub fn query(&self, filter: &EmployeeFilter, page: u32, per_page: u32) -> Paged<Employee> {
        Paged::query(&self.employees, filter, page, per_page)
    }

    pub fn get(&self, id: Uuid) -> Result<Employee> {
        self.employees
            .iter()
            .find(|e| e.id == id)
            .cloned()
            .ok_or_else(|| types::Error::not_found(format!("employee {id}")))
    }

    pub fn create(&mut self, draft: &EmployeeDraft, divisions: &[Division]) -> Result<Employee> {
        let (valid, division) = draft.validate_against(divisions)?;

        let employee = Employee::from_draft(Uuid::now_v7(), valid, division);
        self.employees.push(employee.clone());
        Ok(employee)
    }

    pub fn update(
        &mut self,
        id: Uuid,
        draft: &EmployeeDraft,
        divisions: &[Division],
    ) -> Result<Employee> {
        let (valid, division) = draft.validate_against(divisions)?;

        let employee = self
            .employees
            .iter_mut()
            .find(|e| e.id == id)
            .ok_or_else(|| types::Error::not_found(format!("employee {id}")))?;
        employee.apply(valid, division);
        Ok(employee.clone())
    }

    /// Returns whether anything was removed.
    pub fn delete(&mut self, id: Uuid) -> bool {
        let before = self.employees.len();
        self.employees.retain(|e| e.id != id);
        self.employees.len() != before
    }
}

/// The backend chosen by configuration.
#[derive(Clone)]
pub enum AnyStore {
    Memory(MemoryStore),
    File(FileStore),
    Remote(RemoteStore),
}

impl AnyStore {
    pub async fn open(config: &Config) -> Result<Self> {
        let store = match config.store {
            StoreKind::Memory => AnyStore::Memory(MemoryStore::seeded()),
            StoreKind::File => AnyStore::File(
                FileStore::open(&config.data_dir, seed::divisions(), seed::employees()).await?,
            ),
            StoreKind::Remote => {
                let url = config
                    .remote_url
                    .clone()
                    .ok_or_else(|| types::err!("remote store needs remote.url"))?;
                AnyStore::Remote(RemoteStore::new(url, config.remote_token.clone()))
            }
        };

        tracing::info!(kind = ?config.store, "record store ready");
        Ok(store)
    }
}

macro_rules! dispatch {
    ($self:ident, $store:ident => $call:expr) => {
        match $self {
            AnyStore::Memory($store) => $call.await,
            AnyStore::File($store) => $call.await,
            AnyStore::Remote($store) => $call.await,
        }
    };
}

impl RecordStore for AnyStore {
    async fn query(&self, filter: &EmployeeFilter, page: u32, per_page: u32) -> Result<Paged<Employee>> {
        dispatch!(self, s => s.query(filter, page, per_page))
    }

    async fn get(&self, id: Uuid) -> Result<Employee> {
        dispatch!(self, s => s.get(id))
    }

    async fn create(&self, draft: EmployeeDraft) -> Result<Employee> {
        dispatch!(self, s => s.create(draft))
    }

    async fn update(&self, id: Uuid, draft: EmployeeDraft) -> Result<Employee> {
        dispatch!(self, s => s.update(id, draft))
    }

    async fn delete(&self, id: Uuid) -> Result<()> {
        dispatch!(self, s => s.delete(id))
    }

    async fn divisions(&self) -> Result<Vec<Division>> {
        dispatch!(self, s => s.divisions())
    }

    async fn all(&self) -> Result<Vec<Employee>> {
        dispatch!(self, s => s.all())
    }
}
