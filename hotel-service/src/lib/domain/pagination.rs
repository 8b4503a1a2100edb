use thiserror::Error;

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum PageRequestError {
    #[error("Limit must be at least 1")]
    ZeroLimit,
}

/// Window into a listing: skip `skip` items, return at most `limit`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    skip: u32,
    limit: u32,
}

impl PageRequest {
    pub const DEFAULT_LIMIT: u32 = 10;

    /// Build a page request, falling back to `skip = 0` and `limit = 10`.
    ///
    /// # Errors
    /// * `ZeroLimit` - Limit of zero requested
    pub fn new(skip: Option<u32>, limit: Option<u32>) -> Result<Self, PageRequestError> {
        let limit = limit.unwrap_or(Self::DEFAULT_LIMIT);
        if limit == 0 {
            return Err(PageRequestError::ZeroLimit);
        }

        Ok(Self {
            skip: skip.unwrap_or(0),
            limit,
        })
    }

    pub fn skip(&self) -> u32 {
        self.skip
    }

    pub fn limit(&self) -> u32 {
        self.limit
    }
}

impl Default for PageRequest {
    fn default() -> Self {
        Self {
            skip: 0,
            limit: Self::DEFAULT_LIMIT,
        }
    }
}

/// One page of a listing together with the total number of matches.
#[derive(Debug, Clone, PartialEq)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub total: u64,
    pub request: PageRequest,
}

impl<T> Page<T> {
    /// Slice an already filtered, ordered collection.
    pub fn from_matches(matches: Vec<T>, request: PageRequest) -> Self {
        let total = matches.len() as u64;
        let items = matches
            .into_iter()
            .skip(request.skip as usize)
            .take(request.limit as usize)
            .collect();

        Self {
            items,
            total,
            request,
        }
    }

    pub fn map<U>(self, f: impl FnMut(T) -> U) -> Page<U> {
        Page {
            items: self.items.into_iter().map(f).collect(),
            total: self.total,
            request: self.request,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}
