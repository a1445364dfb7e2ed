//! Product list controller
//!
//! Owns the paginated, searchable view of the collection: the page
//! cursor (0-based here, 1-based on the wire), the active keyword,
//! and the current page of items with its filtered total. Exactly
//! one of plain-listing mode and search mode is authoritative at any
//! moment, decided solely by whether the keyword is empty.
//!
//! Fetches are generation-stamped: every issued fetch gets a
//! [`FetchTicket`], and only the latest ticket may apply its
//! response. Overlapping fetches are not cancelled, so a stale
//! response can still arrive; it is discarded instead of overwriting
//! fresher state.

use shared::{DEFAULT_PAGE_SIZE, ListResponse, Product, total_pages};

use crate::{ApiGateway, ClientError, ClientResult};

/// Fetch parameters for one listing request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListQuery {
    /// 1-based page number, as the backend expects it
    pub page: u64,
    /// Keyword filter; `None` in plain-listing mode
    pub keyword: Option<String>,
}

impl ListQuery {
    pub fn params(&self) -> Vec<(&'static str, String)> {
        let mut params = vec![("page", self.page.to_string())];
        if let Some(keyword) = &self.keyword {
            params.push(("keyword", keyword.clone()));
        }
        params
    }
}

/// Ticket for one issued fetch; only the latest may apply
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FetchTicket {
    generation: u64,
}

/// Paginated, searchable product listing
#[derive(Debug, Clone, Default)]
pub struct ProductList {
    page: u64,
    keyword: String,
    items: Vec<Product>,
    total_records: u64,
    generation: u64,
    loading: bool,
}

impl ProductList {
    pub fn new() -> Self {
        Self::default()
    }

    /// Current page of items, replaced wholesale on every fetch
    pub fn items(&self) -> &[Product] {
        &self.items
    }

    /// Record count under the currently applied filter
    pub fn total_records(&self) -> u64 {
        self.total_records
    }

    /// 0-based page cursor
    pub fn page(&self) -> u64 {
        self.page
    }

    pub fn keyword(&self) -> &str {
        &self.keyword
    }

    /// True while the latest issued fetch has not settled
    pub fn is_loading(&self) -> bool {
        self.loading
    }

    /// True when search mode is authoritative
    pub fn search_active(&self) -> bool {
        !self.keyword.is_empty()
    }

    pub fn total_pages(&self) -> u64 {
        total_pages(self.total_records, DEFAULT_PAGE_SIZE)
    }

    /// Query for the current cursor under the authoritative mode
    pub fn query(&self) -> ListQuery {
        ListQuery {
            page: self.page + 1,
            keyword: self.search_active().then(|| self.keyword.clone()),
        }
    }

    // ---- transitions; each returns the fetch to run ----

    /// Move the page cursor and re-issue a fetch under whichever mode
    /// is authoritative right now
    pub fn set_page(&mut self, index: u64) -> (FetchTicket, ListQuery) {
        self.page = index;
        self.begin_fetch()
    }

    /// Change the keyword filter
    ///
    /// A non-empty keyword enters (or stays in) search mode with the
    /// page reset to 0. An empty keyword exits search mode and clears
    /// the visible items and count immediately, before the plain
    /// listing refetch resolves.
    pub fn set_keyword(&mut self, value: impl Into<String>) -> (FetchTicket, ListQuery) {
        let value: String = value.into();
        self.page = 0;
        if value.is_empty() {
            self.keyword.clear();
            self.items.clear();
            self.total_records = 0;
        } else {
            self.keyword = value;
        }
        self.begin_fetch()
    }

    /// Re-issue a fetch for the current cursor and mode
    pub fn refresh(&mut self) -> (FetchTicket, ListQuery) {
        self.begin_fetch()
    }

    fn begin_fetch(&mut self) -> (FetchTicket, ListQuery) {
        self.generation += 1;
        self.loading = true;
        (
            FetchTicket {
                generation: self.generation,
            },
            self.query(),
        )
    }

    /// Apply a settled fetch; items and count are replaced wholesale,
    /// never merged. Returns false for a stale ticket (a newer fetch
    /// was issued after this one), whose response is discarded.
    pub fn apply(&mut self, ticket: FetchTicket, response: ListResponse) -> bool {
        if ticket.generation != self.generation {
            tracing::debug!(
                got = ticket.generation,
                latest = self.generation,
                "discarding stale list response"
            );
            return false;
        }
        self.items = response.products;
        self.total_records = response.total_records;
        self.loading = false;
        if self.items.is_empty() && self.page > 0 && self.total_records > 0 {
            // Deleting the last item of a trailing page strands the
            // cursor here; earlier pages still have records.
            tracing::warn!(page = self.page, total = self.total_records, "empty page");
        }
        true
    }

    /// Settle a failed fetch; the previous page stays visible
    pub fn apply_error(&mut self, ticket: FetchTicket, error: &ClientError) -> bool {
        if ticket.generation != self.generation {
            return false;
        }
        self.loading = false;
        tracing::error!(error = %error, "list fetch failed");
        true
    }

    // ---- async drivers over the gateway ----

    /// Initial fetch for the mounted view
    pub async fn load(&mut self, api: &ApiGateway) -> ClientResult<()> {
        let (ticket, query) = self.refresh();
        self.run(api, ticket, query).await
    }

    pub async fn goto_page(&mut self, api: &ApiGateway, index: u64) -> ClientResult<()> {
        let (ticket, query) = self.set_page(index);
        self.run(api, ticket, query).await
    }

    pub async fn search(&mut self, api: &ApiGateway, keyword: &str) -> ClientResult<()> {
        let (ticket, query) = self.set_keyword(keyword);
        self.run(api, ticket, query).await
    }

    /// Delete by id, then re-fetch the current page under whichever
    /// mode is authoritative. The refetch runs on success and failure
    /// alike; no downward page adjustment is made for an emptied page.
    pub async fn delete_item(&mut self, api: &ApiGateway, id: &str) -> ClientResult<()> {
        let deleted: ClientResult<serde_json::Value> =
            api.delete(&format!("/product/{id}"), false).await;
        if let Err(error) = &deleted {
            tracing::warn!(id = %id, error = %error, "delete failed, refreshing anyway");
        }
        let (ticket, query) = self.refresh();
        self.run(api, ticket, query).await?;
        deleted.map(|_| ())
    }

    async fn run(
        &mut self,
        api: &ApiGateway,
        ticket: FetchTicket,
        query: ListQuery,
    ) -> ClientResult<()> {
        match api
            .get::<ListResponse>("/product", false, &query.params())
            .await
        {
            Ok(response) => {
                self.apply(ticket, response);
                Ok(())
            }
            Err(error) => {
                self.apply_error(ticket, &error);
                Err(error)
            }
        }
    }
}
