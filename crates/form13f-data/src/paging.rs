//! Lazy pagination over `offset`/`limit` listings.
//!
//! A listing is exhausted by the first page holding fewer than `limit`
//! records. When the last page happens to be full, one extra (empty) page is
//! requested to find out.

use crate::error::{DataError, Result};
use crate::source::PageRequest;
use futures::stream::{self, Stream, TryStreamExt};
use std::future::Future;

/// Stream the pages of a listing, one request per poll.
///
/// The stream is lazy: nothing is fetched until it is polled, and calling
/// `paginate` again with the same closure starts over from offset zero.
/// A `limit` of zero is treated as one.
///
/// # Example
/// ```no_run
/// use form13f_data::{FilingSource, paginate};
/// use futures::TryStreamExt;
///
/// # async fn example(source: &impl FilingSource) -> form13f_data::Result<()> {
/// let mut pages = std::pin::pin!(paginate(250, |page| {
///     source.list_filing_lines("1067983", "0000950123-24-002518", page)
/// }));
/// while let Some(lines) = pages.try_next().await? {
///     println!("{} lines", lines.len());
/// }
/// # Ok(())
/// # }
/// ```
pub fn paginate<T, F, Fut>(limit: usize, fetch_page: F) -> impl Stream<Item = Result<Vec<T>>>
where
    F: FnMut(PageRequest) -> Fut,
    Fut: Future<Output = Result<Vec<T>>>,
{
    let first = PageRequest::first(limit.max(1));

    stream::try_unfold(Some((first, fetch_page)), |state| async move {
        let Some((page, mut fetch_page)) = state else {
            return Ok(None);
        };

        let records = fetch_page(page).await?;
        tracing::debug!(
            offset = page.offset,
            limit = page.limit,
            received = records.len(),
            "fetched page"
        );

        let next = (records.len() >= page.limit).then(|| (page.next(), fetch_page));
        Ok::<_, DataError>(Some((records, next)))
    })
}

/// Fetch every page of a listing and concatenate them in order.
pub async fn collect_pages<T, F, Fut>(limit: usize, fetch_page: F) -> Result<Vec<T>>
where
    F: FnMut(PageRequest) -> Fut,
    Fut: Future<Output = Result<Vec<T>>>,
{
    paginate(limit, fetch_page).try_concat().await
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use std::cell::RefCell;

    fn listing(total: usize) -> Vec<usize> {
        (0..total).collect()
    }

    async fn page_of(data: &[usize], page: PageRequest) -> Result<Vec<usize>> {
        Ok(data
            .iter()
            .skip(page.offset)
            .take(page.limit)
            .copied()
            .collect())
    }

    #[rstest]
    #[case(0, 10, 1)]
    #[case(3, 10, 1)]
    #[case(10, 10, 2)]
    #[case(25, 10, 3)]
    #[case(30, 10, 4)]
    #[tokio::test]
    async fn test_collect_pages_request_count(
        #[case] total: usize,
        #[case] limit: usize,
        #[case] expected_requests: usize,
    ) {
        let data = listing(total);
        let requests = RefCell::new(Vec::new());

        let all = collect_pages(limit, |page| {
            requests.borrow_mut().push(page);
            page_of(&data, page)
        })
        .await
        .unwrap();

        assert_eq!(all, data);
        assert_eq!(requests.borrow().len(), expected_requests);
        assert_eq!(requests.borrow()[0], PageRequest::new(0, limit));
    }

    #[tokio::test]
    async fn test_paginate_is_lazy_and_restartable() {
        let data = listing(5);
        let calls = RefCell::new(0);
        let fetch = |page| {
            *calls.borrow_mut() += 1;
            page_of(&data, page)
        };

        let stream = paginate(2, fetch);
        assert_eq!(*calls.borrow(), 0);
        let pages: Vec<Vec<usize>> = stream.try_collect().await.unwrap();
        assert_eq!(pages, vec![vec![0, 1], vec![2, 3], vec![4]]);

        let again: Vec<Vec<usize>> = paginate(2, fetch).try_collect().await.unwrap();
        assert_eq!(again, pages);
        assert_eq!(*calls.borrow(), 6);
    }

    #[tokio::test]
    async fn test_error_stops_stream() {
        let result: Result<Vec<usize>> = collect_pages(2, |page| async move {
            if page.offset == 0 {
                Ok(vec![1, 2])
            } else {
                Err(DataError::Http {
                    status: 503,
                    url: "test".to_string(),
                })
            }
        })
        .await;

        assert!(matches!(result, Err(DataError::Http { status: 503, .. })));
    }

    #[tokio::test]
    async fn test_zero_limit_terminates() {
        let data = listing(3);
        let all = collect_pages(0, |page| page_of(&data, page)).await.unwrap();
        assert_eq!(all, data);
    }
}
