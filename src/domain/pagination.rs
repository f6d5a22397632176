use super::filters::Params;

/// Every listing is served five records at a time.
pub const PAGE_SIZE: i64 = 5;

/// Page number as asked for by the caller, before it is clamped against the
/// size of the result set.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    pub number: i64,
}

impl Default for PageRequest {
    fn default() -> Self {
        Self { number: 1 }
    }
}

impl PageRequest {
    pub fn new(number: i64) -> Self {
        Self {
            number: number.max(1),
        }
    }

    /// `page` parameter; missing or malformed values fall back to page 1.
    pub fn from_params(params: &Params) -> Self {
        params
            .get("page")
            .and_then(|v| v.trim().parse::<i64>().ok())
            .map(Self::new)
            .unwrap_or_default()
    }

    /// Resolve against `count` matching records. Pages past the end land on
    /// the last page; an empty result still has one (empty) page.
    pub fn resolve(self, count: i64) -> PageWindow {
        let num_pages = ((count + PAGE_SIZE - 1) / PAGE_SIZE).max(1);
        let number = self.number.clamp(1, num_pages);
        PageWindow {
            number,
            num_pages,
            offset: (number - 1) * PAGE_SIZE,
            limit: PAGE_SIZE,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageWindow {
    pub number: i64,
    pub num_pages: i64,
    pub offset: i64,
    pub limit: i64,
}

impl PageWindow {
    pub fn wrap<T>(self, items: Vec<T>, count: i64) -> Page<T> {
        Page {
            items,
            count,
            number: self.number,
            num_pages: self.num_pages,
        }
    }
}

#[derive(Debug, Clone)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub count: i64,
    pub number: i64,
    pub num_pages: i64,
}
