//! Job-board adapters.
//!
//! Every board is a [`ProviderAdapter`]: given a search term it walks all
//! result pages and returns the postings plus the board's reported total.
//! Boards differ only in how one page is requested and parsed, which is what
//! [`PageSource`] captures; the page-cursor loop itself is [`collect_pages`].
//!
//! - [`HeadHunter`] - reports the page count up front
//! - [`SuperJob`] - reports a "more pages" flag on every page

pub mod headhunter;
pub mod superjob;

pub use headhunter::HeadHunter;
pub use superjob::SuperJob;

use async_trait::async_trait;
use tracing::{debug, warn};

use crate::error::TransportResult;
use crate::types::{CollectedPostings, Continuation, PageResult, SearchTerm};

/// A job board that can be searched to completion.
#[async_trait]
pub trait ProviderAdapter: Send + Sync {
    /// Report title, e.g. "HeadHunter Moscow".
    fn label(&self) -> &str;

    /// The only currency whose salaries are counted.
    fn target_currency(&self) -> &str;

    /// Fetch every page for `term`.
    ///
    /// Any failed page fails the whole call; no partial results are returned.
    async fn fetch_all(&self, term: &SearchTerm) -> TransportResult<CollectedPostings>;
}

/// Fetches a single page of results for a term.
#[async_trait]
pub trait PageSource: Send + Sync {
    async fn fetch_page(&self, term: &SearchTerm, page: u32) -> TransportResult<PageResult>;
}

/// Walk pages from 0 until the provider says there are no more.
///
/// The reported total and the page count are read from page 0 only. Values
/// reported by later pages are ignored so results do not depend on index
/// changes made while we paginate.
pub async fn collect_pages<S>(
    source: &S,
    term: &SearchTerm,
    max_pages: Option<u32>,
) -> TransportResult<CollectedPostings>
where
    S: PageSource + ?Sized,
{
    let mut collected = CollectedPostings::empty();
    let mut page_count: Option<u32> = None;
    let mut page = 0u32;

    loop {
        if max_pages.is_some_and(|max| page >= max) {
            warn!(
                term = %term,
                pages = page,
                reported_total = collected.reported_total,
                "Page cap reached, stopping early"
            );
            break;
        }

        let result = source.fetch_page(term, page).await?;
        let received = result.postings.len();
        debug!(term = %term, page, received, "Fetched page");

        if page == 0 {
            collected.reported_total = result.reported_total;
        } else if result.reported_total != collected.reported_total {
            warn!(
                term = %term,
                page,
                first = collected.reported_total,
                now = result.reported_total,
                "Reported total changed mid-traversal, keeping first"
            );
        }

        collected.postings.extend(result.postings);
        page += 1;
        collected.pages_fetched = page;

        let more = match result.continuation {
            Continuation::PageCount(reported) => page < *page_count.get_or_insert(reported),
            Continuation::HasMore(flag) => flag,
        };

        if !more {
            break;
        }
    }

    Ok(collected)
}
