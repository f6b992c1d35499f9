//! Page requests and paged results.

use core::str::FromStr;

use serde::ser::SerializeStruct;
use serde::{Deserialize, Serialize, Serializer};

use crate::error::DomainError;

/// Page size used when the caller does not ask for one.
pub const DEFAULT_PAGE_SIZE: u32 = 20;

/// Upper bound on a single page.
pub const MAX_PAGE_SIZE: u32 = 1000;

/// Fields a product listing can be ordered by.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortField {
    Id,
    Name,
    Price,
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    #[default]
    Asc,
    Desc,
}

impl SortDirection {
    pub fn as_sql(self) -> &'static str {
        match self {
            SortDirection::Asc => "ASC",
            SortDirection::Desc => "DESC",
        }
    }
}

/// Ordering requested for a page.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Sort {
    pub field: SortField,
    pub direction: SortDirection,
}

impl Sort {
    pub fn asc(field: SortField) -> Self {
        Self {
            field,
            direction: SortDirection::Asc,
        }
    }

    pub fn desc(field: SortField) -> Self {
        Self {
            field,
            direction: SortDirection::Desc,
        }
    }
}

/// Parses `"name"`, `"name,asc"` or `"price,desc"`.
impl FromStr for Sort {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut parts = s.split(',').map(str::trim);

        let field = match parts.next().map(str::to_lowercase).as_deref() {
            Some("id") => SortField::Id,
            Some("name") => SortField::Name,
            Some("price") => SortField::Price,
            other => {
                return Err(DomainError::invalid_sort(format!(
                    "unknown sort field {:?}",
                    other.unwrap_or_default()
                )));
            }
        };

        let direction = match parts.next().map(str::to_lowercase).as_deref() {
            None | Some("") | Some("asc") => SortDirection::Asc,
            Some("desc") => SortDirection::Desc,
            Some(other) => {
                return Err(DomainError::invalid_sort(format!(
                    "unknown sort direction {other:?}"
                )));
            }
        };

        if parts.next().is_some() {
            return Err(DomainError::invalid_sort(format!("malformed sort {s:?}")));
        }

        Ok(Self { field, direction })
    }
}

/// Pagination parameters (0-based page index).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageRequest {
    pub page: u32,
    pub size: u32,
    pub sort: Option<Sort>,
}

impl Default for PageRequest {
    fn default() -> Self {
        Self {
            page: 0,
            size: DEFAULT_PAGE_SIZE,
            sort: None,
        }
    }
}

impl PageRequest {
    /// Build a request; `size` is clamped to `1..=MAX_PAGE_SIZE`.
    pub fn of(page: u32, size: u32) -> Self {
        Self {
            page,
            size: size.clamp(1, MAX_PAGE_SIZE),
            sort: None,
        }
    }

    pub fn new(page: Option<u32>, size: Option<u32>, default_size: u32) -> Self {
        Self::of(page.unwrap_or(0), size.unwrap_or(default_size))
    }

    pub fn with_sort(mut self, sort: Sort) -> Self {
        self.sort = Some(sort);
        self
    }

    /// Number of rows to skip.
    pub fn offset(&self) -> u64 {
        u64::from(self.page) * u64::from(self.size)
    }
}

/// One page of results plus the metadata needed to navigate the rest.
#[derive(Debug, Clone, PartialEq)]
pub struct Page<T> {
    content: Vec<T>,
    number: u32,
    size: u32,
    total_elements: u64,
}

impl<T> Page<T> {
    pub fn new(content: Vec<T>, request: &PageRequest, total_elements: u64) -> Self {
        Self {
            content,
            number: request.page,
            size: request.size,
            total_elements,
        }
    }

    /// A single page holding everything (its size is the content length).
    pub fn unpaged(content: Vec<T>) -> Self {
        let len = content.len();
        Self {
            content,
            number: 0,
            size: u32::try_from(len).unwrap_or(u32::MAX),
            total_elements: len as u64,
        }
    }

    pub fn empty(request: &PageRequest) -> Self {
        Self::new(Vec::new(), request, 0)
    }

    pub fn content(&self) -> &[T] {
        &self.content
    }

    pub fn into_content(self) -> Vec<T> {
        self.content
    }

    pub fn iter(&self) -> core::slice::Iter<'_, T> {
        self.content.iter()
    }

    pub fn number(&self) -> u32 {
        self.number
    }

    pub fn size(&self) -> u32 {
        self.size
    }

    pub fn total_elements(&self) -> u64 {
        self.total_elements
    }

    pub fn number_of_elements(&self) -> usize {
        self.content.len()
    }

    pub fn is_empty(&self) -> bool {
        self.content.is_empty()
    }

    pub fn total_pages(&self) -> u64 {
        if self.size == 0 {
            1
        } else {
            self.total_elements.div_ceil(u64::from(self.size))
        }
    }

    /// Map the content, keeping order and all page metadata.
    pub fn map<U, F>(self, f: F) -> Page<U>
    where
        F: FnMut(T) -> U,
    {
        Page {
            content: self.content.into_iter().map(f).collect(),
            number: self.number,
            size: self.size,
            total_elements: self.total_elements,
        }
    }
}

impl<'a, T> IntoIterator for &'a Page<T> {
    type Item = &'a T;
    type IntoIter = core::slice::Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.content.iter()
    }
}

impl<T: Serialize> Serialize for Page<T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut state = serializer.serialize_struct("Page", 6)?;
        state.serialize_field("content", &self.content)?;
        state.serialize_field("number", &self.number)?;
        state.serialize_field("size", &self.size)?;
        state.serialize_field("totalElements", &self.total_elements)?;
        state.serialize_field("totalPages", &self.total_pages())?;
        state.serialize_field("numberOfElements", &self.number_of_elements())?;
        state.end()
    }
}
