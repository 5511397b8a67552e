use serde::{Deserialize, Serialize};

use crate::employee::Employee;

/// Number of pages needed for `total` items, never less than one.
pub fn total_pages(total: u64, per_page: u32) -> u32 {
    let per_page = u64::from(per_page.max(1));
    let pages = total.div_ceil(per_page).max(1);
    u32::try_from(pages).unwrap_or(u32::MAX)
}

/// What the record store filters on.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmployeeFilter {
    /// Case-insensitive substring of the name. Empty matches everything.
    pub name: String,
    /// Exact division id, or `None` for every division.
    pub division_id: Option<String>,
}

impl EmployeeFilter {
    pub fn matches(&self, employee: &Employee) -> bool {
        let name_ok = self.name.is_empty()
            || employee
                .name
                .to_lowercase()
                .contains(&self.name.to_lowercase());

        let division_ok = match &self.division_id {
            None => true,
            Some(id) => employee.division.as_ref().is_some_and(|d| &d.id == id),
        };

        name_ok && division_ok
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageMeta {
    pub current_page: u32,
    pub last_page: u32,
    pub total: u64,
    pub per_page: u32,
}

impl PageMeta {
    pub fn new(current_page: u32, total: u64, per_page: u32) -> Self {
        Self {
            current_page,
            last_page: total_pages(total, per_page),
            total,
            per_page,
        }
    }

    pub fn has_previous(&self) -> bool {
        self.current_page > 1
    }

    pub fn has_next(&self) -> bool {
        self.current_page < self.last_page
    }

    /// 1-based index of the first item on the page, 0 when empty.
    pub fn first_item(&self) -> u64 {
        if self.total == 0 {
            return 0;
        }
        u64::from(self.current_page.saturating_sub(1)) * u64::from(self.per_page) + 1
    }

    /// 1-based index of the last item on the page.
    pub fn last_item(&self) -> u64 {
        (u64::from(self.current_page) * u64::from(self.per_page)).min(self.total)
    }

    /// Page buttons to draw: the first and last page, `radius` pages either
    /// side of the current one, and a gap wherever pages are skipped.
    pub fn page_links(&self, radius: u32) -> Vec<PageLink> {
        let last = self.last_page.max(1);
        let current = self.current_page.clamp(1, last);
        let from = current.saturating_sub(radius).max(1);
        let to = current.saturating_add(radius).min(last);

        let mut links = Vec::new();
        if from > 1 {
            links.push(PageLink::Page(1));
            if from > 2 {
                links.push(PageLink::Gap);
            }
        }
        links.extend((from..=to).map(PageLink::Page));
        if to < last {
            if to < last - 1 {
                links.push(PageLink::Gap);
            }
            links.push(PageLink::Page(last));
        }
        links
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageLink {
    Page(u32),
    Gap,
}

/// One page of a filtered collection, in the shape of the remote list
/// endpoint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Paged<T> {
    pub data: Vec<T>,
    pub meta: PageMeta,
}

impl<T: Clone> Paged<T> {
    /// Slice page `page` (1-based) of `per_page` items out of `items`.
    ///
    /// A page past the end yields an empty slice; `meta.current_page` keeps
    /// the requested page.
    pub fn slice(items: &[T], page: u32, per_page: u32) -> Self {
        let page = page.max(1);
        let per_page = per_page.max(1);
        let offset = usize::try_from(u64::from(page - 1) * u64::from(per_page))
            .unwrap_or(usize::MAX);

        let data = items
            .iter()
            .skip(offset)
            .take(per_page as usize)
            .cloned()
            .collect();

        Self {
            data,
            meta: PageMeta::new(page, items.len() as u64, per_page),
        }
    }
}

impl Paged<Employee> {
    /// Filter `employees` in insertion order, then slice out one page.
    pub fn query(employees: &[Employee], filter: &EmployeeFilter, page: u32, per_page: u32) -> Self {
        let filtered: Vec<Employee> = employees
            .iter()
            .filter(|e| filter.matches(e))
            .cloned()
            .collect();
        Self::slice(&filtered, page, per_page)
    }
}
