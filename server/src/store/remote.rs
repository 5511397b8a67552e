use reqwest::{Client, Method, RequestBuilder, Response, StatusCode};
use secrecy::{ExposeSecret, SecretString};
use serde::de::DeserializeOwned;
use types::{Division, Employee, EmployeeDraft, EmployeeFilter, Error, Paged, Result};
use url::Url;
use uuid::Uuid;

use super::RecordStore;

/// Page size used when walking the whole remote collection.
const FETCH_ALL_PAGE_SIZE: u32 = 100;

trait ReqwestExt {
    async fn try_send<T: DeserializeOwned>(self) -> Result<T>;
    async fn try_send_empty(self) -> Result<()>;
}

impl ReqwestExt for RequestBuilder {
    async fn try_send<T: DeserializeOwned>(self) -> Result<T> {
        let response = checked(self).await?;
        let body = response.bytes().await.map_err(unreachable)?;

        serde_json::from_slice(&body).map_err(|error| {
            tracing::debug!(?error, "remote store sent an unreadable body");
            Error::query(format!("remote store sent an unreadable body: {error}"))
        })
    }

    async fn try_send_empty(self) -> Result<()> {
        checked(self).await.map(|_| ())
    }
}

/// Send the request, turning error statuses into [`Error`]s.
///
/// The remote answers failures with a serialized [`Error`]; anything else
/// becomes a query error, or not-found for a bare 404.
async fn checked(request: RequestBuilder) -> Result<Response> {
    let response = request.send().await.map_err(unreachable)?;
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let body = response.bytes().await.map_err(unreachable)?;
    if let Ok(error) = serde_json::from_slice::<Error>(&body) {
        return Err(error);
    }

    Err(match status {
        StatusCode::NOT_FOUND => Error::not_found("remote record"),
        status => Error::query(format!("remote store answered {status}")),
    })
}

fn unreachable(error: reqwest::Error) -> Error {
    Error::query(format!("remote store unreachable: {error}"))
}

/// Client for another instance's `/v1` REST interface.
#[derive(Clone, Debug)]
pub struct RemoteStore {
    client: Client,
    base_url: Url,
    token: Option<SecretString>,
}

impl RemoteStore {
    pub fn new(mut base_url: Url, token: Option<SecretString>) -> Self {
        // `join` replaces the last segment unless the path ends in a slash.
        if !base_url.path().ends_with('/') {
            let path = format!("{}/", base_url.path());
            base_url.set_path(&path);
        }

        Self {
            client: Client::new(),
            base_url,
            token,
        }
    }

    fn request(&self, method: Method, path: &str) -> Result<RequestBuilder> {
        let url = self.base_url.join(path)?;
        let request = self.client.request(method, url);

        Ok(match &self.token {
            Some(token) => request.bearer_auth(token.expose_secret()),
            None => request,
        })
    }

    fn employee(&self, method: Method, id: Uuid) -> Result<RequestBuilder> {
        self.request(method, &format!("v1/employees/{id}"))
    }
}

impl RecordStore for RemoteStore {
    async fn query(&self, filter: &EmployeeFilter, page: u32, per_page: u32) -> Result<Paged<Employee>> {
        let mut params = vec![
            ("page", page.to_string()),
            ("per_page", per_page.to_string()),
        ];
        if !filter.name.is_empty() {
            params.push(("name", filter.name.clone()));
        }
        if let Some(division) = &filter.division_id {
            params.push(("division_id", division.clone()));
        }

        self.request(Method::GET, "v1/employees")?
            .query(&params)
            .try_send()
            .await
    }

    async fn get(&self, id: Uuid) -> Result<Employee> {
        self.employee(Method::GET, id)?.try_send().await
    }

    async fn create(&self, draft: EmployeeDraft) -> Result<Employee> {
        self.request(Method::POST, "v1/employees")?
            .json(&draft)
            .try_send()
            .await
    }

    async fn update(&self, id: Uuid, draft: EmployeeDraft) -> Result<Employee> {
        self.employee(Method::PUT, id)?
            .json(&draft)
            .try_send()
            .await
    }

    async fn delete(&self, id: Uuid) -> Result<()> {
        match self.employee(Method::DELETE, id)?.try_send_empty().await {
            Err(error) if error.is_not_found() => Ok(()),
            other => other,
        }
    }

    async fn divisions(&self) -> Result<Vec<Division>> {
        self.request(Method::GET, "v1/divisions")?.try_send().await
    }

    async fn all(&self) -> Result<Vec<Employee>> {
        let filter = EmployeeFilter::default();
        let mut employees = Vec::new();
        let mut page = 1;

        loop {
            let batch = self.query(&filter, page, FETCH_ALL_PAGE_SIZE).await?;
            employees.extend(batch.data);
            if !batch.meta.has_next() {
                return Ok(employees);
            }
            page += 1;
        }
    }
}

#[cfg(test)]
mod tests {
    use types::{ErrorKind, Field};

    use super::*;
    use crate::rest_routes::{RestState, rest_router};
    use crate::store::MemoryStore;

    async fn serve(token: Option<&str>) -> (RemoteStore, MemoryStore) {
        let backing = MemoryStore::seeded();
        let router = rest_router(RestState::new(
            backing.clone(),
            token.map(SecretString::from),
            5,
        ));

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move { axum::serve(listener, router).await.unwrap() });

        let url = Url::parse(&format!("http://{addr}")).unwrap();
        let remote = RemoteStore::new(url, token.map(SecretString::from));
        (remote, backing)
    }

    fn draft(name: &str, division: &str) -> EmployeeDraft {
        EmployeeDraft {
            name: name.into(),
            phone: "081234567890".into(),
            position: "Backend Developer".into(),
            division_id: division.into(),
            image: String::new(),
        }
    }

    #[tokio::test]
    async fn test_query_matches_memory_store() {
        let (remote, backing) = serve(None).await;
        let filter = EmployeeFilter {
            name: "a".into(),
            division_id: Some("teknologi".into()),
        };

        let expected = backing.query(&filter, 1, 2).await.unwrap();
        let actual = remote.query(&filter, 1, 2).await.unwrap();

        assert_eq!(actual, expected);
    }

    #[tokio::test]
    async fn test_crud_through_rest() {
        let (remote, backing) = serve(Some("s3cret")).await;

        let created = remote.create(draft("Hana Novita", "sdm")).await.unwrap();
        assert_eq!(backing.get(created.id).await.unwrap(), created);

        let updated = remote
            .update(created.id, draft("Hana Novita Sari", ""))
            .await
            .unwrap();
        assert_eq!(updated.name, "Hana Novita Sari");
        assert!(updated.division.is_none());

        remote.delete(created.id).await.unwrap();
        // Deleting twice is fine.
        remote.delete(created.id).await.unwrap();
        assert!(remote.get(created.id).await.unwrap_err().is_not_found());
    }

    #[tokio::test]
    async fn test_validation_errors_survive_the_wire() {
        let (remote, _) = serve(None).await;

        let error = remote.create(draft("Al", "keuangan")).await.unwrap_err();

        let fields = error.field_errors().unwrap();
        assert!(fields.get(Field::Name).is_some());
        assert!(fields.get(Field::Division).is_some());
    }

    #[tokio::test]
    async fn test_all_and_divisions() {
        let (remote, backing) = serve(None).await;

        assert_eq!(remote.all().await.unwrap(), backing.all().await.unwrap());
        assert_eq!(remote.divisions().await.unwrap().len(), 3);
    }

    #[tokio::test]
    async fn test_missing_token_is_unauthorized() {
        let (authorized, _) = serve(Some("s3cret")).await;
        let anonymous = RemoteStore::new(authorized.base_url.clone(), None);

        let error = anonymous.divisions().await.unwrap_err();

        assert_eq!(error.kind, ErrorKind::Unauthorized);
    }

    #[tokio::test]
    async fn test_unreachable_remote_is_query_error() {
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let remote = RemoteStore::new(Url::parse(&format!("http://{addr}")).unwrap(), None);
        let error = remote.divisions().await.unwrap_err();

        assert_eq!(error.kind, ErrorKind::Query);
    }
}
