//! Paged results that remember how they were produced.

use serde_json::Value;

use crate::endpoint::{as_array, EndpointCore};
use crate::error::Result;
use crate::language::Language;
use crate::transport::PageMeta;

/// How a [`Page`] was produced: enough to request the adjacent pages
/// without the caller restating parameters.
#[derive(Debug, Clone)]
pub(crate) struct PageRequest {
    pub core: EndpointCore,
    /// Request path relative to the API root.
    pub path: String,
    /// Cache key stem; `None` leaves pages of this resource uncached.
    pub cache_stem: Option<String>,
    pub lang: Option<Language>,
}

impl PageRequest {
    pub(crate) async fn fetch(self, page: i32, page_size: u32) -> Result<Page> {
        let mut params: Vec<(&str, String)> = vec![
            ("page", page.to_string()),
            ("page_size", page_size.to_string()),
        ];
        if let Some(lang) = self.lang {
            params.push(("lang", lang.code().to_owned()));
        }

        let cache_key = self.cache_stem.as_ref().map(|stem| match self.lang {
            Some(lang) => format!("{stem}.{lang}.page-{page}.{page_size}"),
            None => format!("{stem}.page-{page}.{page_size}"),
        });

        let response = self
            .core
            .fetch(&self.path, &params, cache_key.as_deref())
            .await?;
        let items = as_array(response.data)?;
        Ok(Page {
            items,
            page,
            page_size,
            meta: response.meta,
            request: self,
        })
    }
}

/// One page of a collection, plus the parameters that produced it.
///
/// Comparisons consider element content only; attached metadata and the
/// producing endpoint are ignored, so a page equals any other sequence
/// with the same records.
#[derive(Debug, Clone)]
pub struct Page {
    items: Vec<Value>,
    page: i32,
    page_size: u32,
    meta: Option<PageMeta>,
    request: PageRequest,
}

impl Page {
    pub fn items(&self) -> &[Value] {
        &self.items
    }

    pub fn into_items(self) -> Vec<Value> {
        self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Value> {
        self.items.iter()
    }

    /// Index of this page.
    pub fn page(&self) -> i32 {
        self.page
    }

    pub fn page_size(&self) -> u32 {
        self.page_size
    }

    /// Server-reported pagination metadata, when the transport captured
    /// any.
    pub fn meta(&self) -> Option<&PageMeta> {
        self.meta.as_ref()
    }

    /// Fetch the following page with the same auxiliary arguments.
    pub async fn next_page(&self) -> Result<Page> {
        self.request.clone().fetch(self.page + 1, self.page_size).await
    }

    /// Fetch the preceding page. No bounds check is applied here; a
    /// negative index goes out as-is and the server's rejection
    /// propagates.
    pub async fn previous_page(&self) -> Result<Page> {
        self.request.clone().fetch(self.page - 1, self.page_size).await
    }
}

impl PartialEq for Page {
    fn eq(&self, other: &Self) -> bool {
        self.items == other.items
    }
}

impl PartialEq<[Value]> for Page {
    fn eq(&self, other: &[Value]) -> bool {
        self.items == other
    }
}

impl PartialEq<Vec<Value>> for Page {
    fn eq(&self, other: &Vec<Value>) -> bool {
        &self.items == other
    }
}

impl std::ops::Index<usize> for Page {
    type Output = Value;

    fn index(&self, index: usize) -> &Value {
        &self.items[index]
    }
}

impl<'a> IntoIterator for &'a Page {
    type Item = &'a Value;
    type IntoIter = std::slice::Iter<'a, Value>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.iter()
    }
}
