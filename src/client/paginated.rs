//! Cursor-following pagination over collection endpoints.
//!
//! Robinhood list endpoints answer with a page of `results` plus a `next`
//! link. [`fetch_all`] walks those links to exhaustion and returns one
//! ordered collection; [`CursorStream`] yields the same records lazily.
//! Both stop on the first of:
//!
//! - a page with zero records, even if it carries a `next` link;
//! - a missing, `null` or empty `next`;
//! - a `next` equal to the URL that was just fetched.
//!
//! Caller-supplied query parameters are encoded into the first page's URL
//! only. Later requests use the server's `next` link verbatim, which
//! already encodes whatever filters the server chose to keep, and the
//! self-reference check always compares against the URL actually fetched.

use std::collections::VecDeque;
use std::fmt;
use std::future::Future;
use std::ops::ControlFlow;
use std::pin::Pin;
use std::task::{Context, Poll};

use futures_util::Stream;
use serde::{Deserialize, Deserializer, Serialize};

use crate::{Error, Result};

/// One page of a paginated collection.
#[derive(Debug, Clone, Deserialize)]
pub struct Page<T> {
    /// The records in this page, in server order.
    pub results: Vec<T>,
    /// Link to the following page; `None` at the end of the collection.
    #[serde(default, deserialize_with = "empty_as_none")]
    pub next: Option<String>,
    /// Link to the preceding page, when the endpoint provides one.
    #[serde(default, deserialize_with = "empty_as_none")]
    pub previous: Option<String>,
}

impl<T> Page<T> {
    /// Build a page by hand.
    pub fn new(results: Vec<T>, next: Option<String>) -> Self {
        Self {
            results,
            next: next.filter(|n| !n.is_empty()),
            previous: None,
        }
    }

    /// Returns `true` if the server advertised another page.
    pub fn has_next(&self) -> bool {
        self.next.is_some()
    }
}

fn empty_as_none<'de, D>(deserializer: D) -> std::result::Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<String>::deserialize(deserializer)?;
    Ok(value.filter(|s| !s.is_empty()))
}

/// Why pagination stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StopReason {
    /// The last page held no records.
    EmptyPage,
    /// The last page had no `next` link.
    Exhausted,
    /// The last page linked back to itself.
    RepeatedCursor,
}

/// Decide where to go after fetching `consumed`.
///
/// Returns the cursor for the following request, or the reason the
/// collection is complete.
pub fn next_cursor(
    consumed: &str,
    page_len: usize,
    next: Option<String>,
) -> ControlFlow<StopReason, String> {
    if page_len == 0 {
        return ControlFlow::Break(StopReason::EmptyPage);
    }
    match next {
        None => ControlFlow::Break(StopReason::Exhausted),
        Some(next) if next.is_empty() => ControlFlow::Break(StopReason::Exhausted),
        Some(next) if next == consumed => ControlFlow::Break(StopReason::RepeatedCursor),
        Some(next) => ControlFlow::Continue(next),
    }
}

/// A pagination failure together with everything fetched before it.
///
/// Records from pages that were fully received are kept; nothing from the
/// failed page is included. Converting into [`Error`] drops the records,
/// which is what the service accessors do with `?`.
pub struct PartialCollection<T> {
    records: Vec<T>,
    pages: usize,
    error: Error,
}

impl<T> PartialCollection<T> {
    /// Records accumulated before the failure.
    pub fn records(&self) -> &[T] {
        &self.records
    }

    /// Number of pages fetched successfully.
    pub fn pages_fetched(&self) -> usize {
        self.pages
    }

    /// The error that stopped pagination.
    pub fn error(&self) -> &Error {
        &self.error
    }

    /// Split into the accumulated records and the error.
    pub fn into_parts(self) -> (Vec<T>, Error) {
        (self.records, self.error)
    }

    /// Discard the records and keep the error.
    pub fn into_error(self) -> Error {
        self.error
    }
}

impl<T> From<PartialCollection<T>> for Error {
    fn from(partial: PartialCollection<T>) -> Self {
        partial.error
    }
}

impl<T> fmt::Debug for PartialCollection<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PartialCollection")
            .field("records", &self.records.len())
            .field("pages", &self.pages)
            .field("error", &self.error)
            .finish()
    }
}

impl<T> fmt::Display for PartialCollection<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "pagination stopped after {} page(s) with {} record(s): {}",
            self.pages,
            self.records.len(),
            self.error
        )
    }
}

impl<T> std::error::Error for PartialCollection<T> {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        Some(&self.error)
    }
}

/// Resolve the URL of the first page: `start_url` with `query` appended.
///
/// Later pages are requested at the server's `next` link verbatim, so
/// this is the only place a caller's filters enter the request.
///
/// ```
/// use robinhood_rs::client::paginated::first_page_url;
///
/// let url = first_page_url("https://api.robinhood.com/instruments/", Some(&[("symbol", "AAPL")]))?;
/// assert_eq!(url, "https://api.robinhood.com/instruments/?symbol=AAPL");
/// # Ok::<(), robinhood_rs::Error>(())
/// ```
pub fn first_page_url<Q: Serialize + ?Sized>(start_url: &str, query: Option<&Q>) -> Result<String> {
    let Some(query) = query else {
        return Ok(start_url.to_string());
    };

    let encoded = serde_urlencoded::to_string(query)
        .map_err(|e| Error::InvalidInput(format!("query cannot be URL-encoded: {}", e)))?;
    if encoded.is_empty() {
        return Ok(start_url.to_string());
    }

    let separator = match start_url.find('?') {
        None => "?",
        Some(_) if start_url.ends_with('?') || start_url.ends_with('&') => "",
        Some(_) => "&",
    };
    Ok(format!("{}{}{}", start_url, separator, encoded))
}

/// Fetch every page of a collection, starting at `start_url`.
///
/// The first request goes to `start_url` with `query` appended (see
/// [`first_page_url`]); `fetch_page` is then called with each `next` link
/// verbatim. Every stop decision compares against the exact URL that was
/// requested. Pages are requested strictly one after another.
///
/// # Errors
///
/// The first failing fetch stops pagination; its error is returned inside
/// a [`PartialCollection`] holding the records of the pages before it.
/// An empty `start_url`, or a query that cannot be URL-encoded, fails with
/// [`Error::InvalidInput`] without any request being made.
///
/// # Example
///
/// ```
/// use robinhood_rs::client::paginated::{fetch_all, Page};
///
/// # async fn example() {
/// let records = fetch_all("https://api.robinhood.com/instruments/", None::<&()>, |url| async move {
///     let next = (url.ends_with("/instruments/")).then(|| format!("{}?cursor=2", url));
///     Ok(Page::new(vec![url.len()], next))
/// })
/// .await
/// .unwrap();
/// assert_eq!(records.len(), 2);
/// # }
/// ```
pub async fn fetch_all<T, Q, F, Fut>(
    start_url: &str,
    query: Option<&Q>,
    mut fetch_page: F,
) -> std::result::Result<Vec<T>, PartialCollection<T>>
where
    Q: Serialize + ?Sized,
    F: FnMut(String) -> Fut,
    Fut: Future<Output = Result<Page<T>>>,
{
    let mut records = Vec::new();
    let mut pages = 0;

    if start_url.is_empty() {
        return Err(PartialCollection {
            records,
            pages,
            error: Error::InvalidInput("pagination start URL is empty".to_string()),
        });
    }

    let mut cursor = match first_page_url(start_url, query) {
        Ok(url) => url,
        Err(error) => {
            return Err(PartialCollection {
                records,
                pages,
                error,
            })
        }
    };

    loop {
        let page = match fetch_page(cursor.clone()).await {
            Ok(page) => page,
            Err(error) => {
                return Err(PartialCollection {
                    records,
                    pages,
                    error,
                })
            }
        };
        pages += 1;

        let page_len = page.results.len();
        records.extend(page.results);
        tracing::debug!(cursor = %cursor, page_len, total = records.len(), "Fetched page");

        match next_cursor(&cursor, page_len, page.next) {
            ControlFlow::Continue(next) => cursor = next,
            ControlFlow::Break(reason) => {
                tracing::debug!(?reason, pages, "Pagination complete");
                break;
            }
        }
    }

    Ok(records)
}

/// Type alias for a boxed future used internally.
pub(crate) type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

type PageFetcher<T> = Box<dyn FnMut(String) -> BoxFuture<'static, Result<Page<T>>> + Send>;

/// A stream that lazily follows `next` links, yielding one record at a time.
///
/// The next page is only requested once every record of the current page
/// has been yielded. After an error the stream yields that error once and
/// then ends.
///
/// # Example
///
/// ```no_run
/// use futures_util::StreamExt;
///
/// # async fn example(client: robinhood_rs::RobinhoodClient) -> robinhood_rs::Result<()> {
/// let mut orders = client.options().orders_stream();
///
/// while let Some(order) = orders.next().await {
///     let order = order?;
///     println!("{} {:?}", order.id, order.state);
/// }
/// # Ok(())
/// # }
/// ```
pub struct CursorStream<T> {
    fetch_page: PageFetcher<T>,
    current_items: VecDeque<T>,
    cursor: Option<String>,
    pending_fetch: Option<(String, BoxFuture<'static, Result<Page<T>>>)>,
}

impl<T> CursorStream<T> {
    /// Create a stream that starts at `start_url`.
    ///
    /// `start_url` is requested as given, so it should already carry any
    /// query (see [`first_page_url`]). The stop checks compare against it.
    pub fn new<F>(start_url: impl Into<String>, fetch_page: F) -> Self
    where
        F: FnMut(String) -> BoxFuture<'static, Result<Page<T>>> + Send + 'static,
    {
        let start_url = start_url.into();
        Self {
            fetch_page: Box::new(fetch_page),
            current_items: VecDeque::new(),
            cursor: (!start_url.is_empty()).then_some(start_url),
            pending_fetch: None,
        }
    }
}

impl<T> Stream for CursorStream<T> {
    type Item = Result<T>;

    fn poll_next(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        let this = self.get_mut();

        loop {
            if let Some(item) = this.current_items.pop_front() {
                return Poll::Ready(Some(Ok(item)));
            }

            if let Some((consumed, fut)) = this.pending_fetch.as_mut() {
                match fut.as_mut().poll(cx) {
                    Poll::Ready(Ok(page)) => {
                        let page_len = page.results.len();
                        this.current_items.extend(page.results);
                        this.cursor = match next_cursor(consumed, page_len, page.next) {
                            ControlFlow::Continue(next) => Some(next),
                            ControlFlow::Break(reason) => {
                                tracing::debug!(?reason, "Cursor stream complete");
                                None
                            }
                        };
                        this.pending_fetch = None;
                        continue;
                    }
                    Poll::Ready(Err(e)) => {
                        this.pending_fetch = None;
                        this.cursor = None;
                        return Poll::Ready(Some(Err(e)));
                    }
                    Poll::Pending => return Poll::Pending,
                }
            }

            if let Some(cursor) = this.cursor.take() {
                let fut = (this.fetch_page)(cursor.clone());
                this.pending_fetch = Some((cursor, fut));
                continue;
            }

            return Poll::Ready(None);
        }
    }
}

// Records are never pinned in place.
impl<T> Unpin for CursorStream<T> {}

#[cfg(test)]
mod tests {
    use super::*;
    use futures_util::StreamExt;
    use pretty_assertions::assert_eq;

    const START: &str = "https://api.robinhood.com/options/orders/";

    fn page(results: &[char], next: Option<&str>) -> Result<Page<char>> {
        Ok(Page::new(results.to_vec(), next.map(String::from)))
    }

    fn cursor(n: u32) -> String {
        format!("{}?cursor=c{}", START, n)
    }

    /// Run `fetch_all` against a scripted sequence of responses, returning
    /// the outcome and the URLs that were requested.
    async fn run(
        query: Option<&[(&str, &str)]>,
        script: Vec<Result<Page<char>>>,
    ) -> (
        std::result::Result<Vec<char>, PartialCollection<char>>,
        Vec<String>,
    ) {
        let mut script: VecDeque<_> = script.into();
        let mut calls = Vec::new();
        let outcome = fetch_all(START, query, |url| {
            calls.push(url);
            let response = script
                .pop_front()
                .unwrap_or_else(|| Err(Error::InvalidInput("unscripted fetch".into())));
            async move { response }
        })
        .await;
        (outcome, calls)
    }

    #[tokio::test]
    async fn test_follows_cursors_until_exhausted() {
        let c1 = cursor(1);
        let c2 = cursor(2);
        let (outcome, calls) = run(
            None,
            vec![
                page(&['a', 'b'], Some(&c1)),
                page(&['c'], Some(&c2)),
                page(&['d', 'e', 'f'], None),
            ],
        )
        .await;

        assert_eq!(outcome.unwrap(), vec!['a', 'b', 'c', 'd', 'e', 'f']);
        assert_eq!(calls, vec![START.to_string(), c1, c2]);
    }

    #[tokio::test]
    async fn test_order_preserved_across_pages() {
        let c1 = cursor(1);
        let (outcome, _) = run(None, vec![page(&['a', 'b'], Some(&c1)), page(&['c'], None)]).await;
        assert_eq!(outcome.unwrap(), vec!['a', 'b', 'c']);
    }

    #[tokio::test]
    async fn test_empty_first_page_is_empty_collection() {
        let (outcome, calls) = run(None, vec![page(&[], None)]).await;
        assert!(outcome.unwrap().is_empty());
        assert_eq!(calls.len(), 1);
    }

    #[tokio::test]
    async fn test_empty_page_stops_even_with_next() {
        let c1 = cursor(1);
        let c2 = cursor(2);
        let (outcome, calls) = run(
            None,
            vec![page(&['a'], Some(&c1)), page(&[], Some(&c2)), page(&['z'], None)],
        )
        .await;

        assert_eq!(outcome.unwrap(), vec!['a']);
        assert_eq!(calls.len(), 2);
    }

    #[tokio::test]
    async fn test_self_referential_next_stops() {
        let c1 = cursor(1);
        let (outcome, calls) = run(
            None,
            vec![
                page(&['a'], Some(&c1)),
                page(&['b', 'c'], Some(&c1)),
                page(&['z'], None),
            ],
        )
        .await;

        assert_eq!(outcome.unwrap(), vec!['a', 'b', 'c']);
        assert_eq!(calls, vec![START.to_string(), c1]);
    }

    #[tokio::test]
    async fn test_start_url_echoed_on_first_page_stops() {
        let (outcome, calls) = run(None, vec![page(&['a'], Some(START))]).await;
        assert_eq!(outcome.unwrap(), vec!['a']);
        assert_eq!(calls.len(), 1);
    }

    #[tokio::test]
    async fn test_query_sent_with_first_request_only() {
        let c1 = cursor(1);
        let c2 = cursor(2);
        let (outcome, calls) = run(
            Some(&[("state", "active")]),
            vec![page(&['a'], Some(&c1)), page(&['b'], Some(&c2)), page(&['c'], None)],
        )
        .await;

        assert_eq!(outcome.unwrap().len(), 3);
        assert_eq!(calls, vec![format!("{}?state=active", START), c1, c2]);
    }

    #[tokio::test]
    async fn test_first_page_echoing_its_query_url_stops() {
        let requested = format!("{}?symbol=AAPL", START);
        let (outcome, calls) = run(
            Some(&[("symbol", "AAPL")]),
            vec![page(&['a'], Some(&requested)), page(&['a'], None)],
        )
        .await;

        assert_eq!(outcome.unwrap(), vec!['a']);
        assert_eq!(calls, vec![requested]);
    }

    #[tokio::test]
    async fn test_bare_start_url_after_query_page_is_followed() {
        let (outcome, calls) = run(
            Some(&[("symbol", "AAPL")]),
            vec![page(&['a'], Some(START)), page(&['b'], None)],
        )
        .await;

        assert_eq!(outcome.unwrap(), vec!['a', 'b']);
        assert_eq!(calls, vec![format!("{}?symbol=AAPL", START), START.to_string()]);
    }

    #[test]
    fn test_first_page_url_encoding() {
        assert_eq!(first_page_url(START, None::<&()>).unwrap(), START);
        assert_eq!(
            first_page_url(START, Some(&[("ids", "a,b")])).unwrap(),
            format!("{}?ids=a%2Cb", START)
        );
        assert_eq!(
            first_page_url(&cursor(1), Some(&[("nonzero", "true")])).unwrap(),
            format!("{}&nonzero=true", cursor(1))
        );

        let empty: [(&str, &str); 0] = [];
        assert_eq!(first_page_url(START, Some(&empty)).unwrap(), START);

        assert!(matches!(
            first_page_url(START, Some(&vec![1, 2, 3])),
            Err(Error::InvalidInput(_))
        ));
    }

    #[tokio::test]
    async fn test_failure_on_second_page_keeps_first_page_only() {
        let c1 = cursor(1);
        let c2 = cursor(2);
        let (outcome, calls) = run(
            None,
            vec![
                page(&['a', 'b'], Some(&c1)),
                Err(Error::from_api_response(503, serde_json::Value::Null)),
                page(&['c'], Some(&c2)),
            ],
        )
        .await;

        let partial = outcome.unwrap_err();
        assert_eq!(partial.records(), &['a', 'b']);
        assert_eq!(partial.pages_fetched(), 1);
        assert!(partial.error().is_transport());
        assert_eq!(calls.len(), 2);

        let error: Error = partial.into();
        assert!(matches!(error, Error::Api { status: 503, .. }));
    }

    #[tokio::test]
    async fn test_failure_on_first_page_has_no_records() {
        let (outcome, _) = run(None, vec![Err(Error::Timeout)]).await;
        let (records, error) = outcome.unwrap_err().into_parts();
        assert!(records.is_empty());
        assert!(matches!(error, Error::Timeout));
    }

    #[tokio::test]
    async fn test_empty_start_url_is_rejected_without_fetching() {
        let mut fetched = false;
        let outcome = fetch_all("", None::<&()>, |_url| {
            fetched = true;
            async { page(&['x'], None) }
        })
        .await;

        assert!(!fetched);
        assert!(matches!(
            outcome.unwrap_err().into_error(),
            Error::InvalidInput(_)
        ));
    }

    #[test]
    fn test_next_cursor_decisions() {
        assert_eq!(
            next_cursor(START, 0, Some(cursor(1))),
            ControlFlow::Break(StopReason::EmptyPage)
        );
        assert_eq!(
            next_cursor(START, 3, None),
            ControlFlow::Break(StopReason::Exhausted)
        );
        assert_eq!(
            next_cursor(START, 3, Some(String::new())),
            ControlFlow::Break(StopReason::Exhausted)
        );
        assert_eq!(
            next_cursor(START, 3, Some(START.to_string())),
            ControlFlow::Break(StopReason::RepeatedCursor)
        );
        assert_eq!(
            next_cursor(START, 3, Some(cursor(9))),
            ControlFlow::Continue(cursor(9))
        );
    }

    #[test]
    fn test_page_deserializes_null_and_empty_next() {
        let with_null: Page<u32> =
            serde_json::from_str(r#"{"results": [1, 2], "next": null}"#).unwrap();
        assert_eq!(with_null.results, vec![1, 2]);
        assert!(!with_null.has_next());

        let with_empty: Page<u32> =
            serde_json::from_str(r#"{"results": [], "next": "", "previous": ""}"#).unwrap();
        assert!(with_empty.next.is_none());
        assert!(with_empty.previous.is_none());

        let missing: Page<u32> = serde_json::from_str(r#"{"results": [7]}"#).unwrap();
        assert!(missing.next.is_none());

        let linked: Page<u32> = serde_json::from_str(
            r#"{"results": [7], "next": "https://api.robinhood.com/instruments/?cursor=x"}"#,
        )
        .unwrap();
        assert_eq!(
            linked.next.as_deref(),
            Some("https://api.robinhood.com/instruments/?cursor=x")
        );
    }

    fn scripted_stream(script: Vec<Result<Page<char>>>) -> CursorStream<char> {
        let mut script: VecDeque<_> = script.into();
        CursorStream::new(START, move |_url| {
            let response = script
                .pop_front()
                .unwrap_or_else(|| Err(Error::InvalidInput("unscripted fetch".into())));
            Box::pin(async move { response }) as BoxFuture<'static, Result<Page<char>>>
        })
    }

    #[tokio::test]
    async fn test_stream_yields_records_in_order() {
        let c1 = cursor(1);
        let stream = scripted_stream(vec![page(&['a', 'b'], Some(&c1)), page(&['c'], None)]);

        let items: Vec<char> = stream.map(|r| r.unwrap()).collect().await;
        assert_eq!(items, vec!['a', 'b', 'c']);
    }

    #[tokio::test]
    async fn test_stream_stops_on_repeated_cursor() {
        let stream = scripted_stream(vec![page(&['a'], Some(START)), page(&['b'], None)]);

        let items: Vec<char> = stream.map(|r| r.unwrap()).collect().await;
        assert_eq!(items, vec!['a']);
    }

    #[tokio::test]
    async fn test_stream_yields_error_once_then_ends() {
        let c1 = cursor(1);
        let mut stream = scripted_stream(vec![
            page(&['a'], Some(&c1)),
            Err(Error::Timeout),
            page(&['b'], None),
        ]);

        assert!(matches!(stream.next().await, Some(Ok('a'))));
        assert!(matches!(stream.next().await, Some(Err(Error::Timeout))));
        assert!(stream.next().await.is_none());
    }

    #[tokio::test]
    async fn test_stream_with_empty_start_is_empty() {
        let stream: CursorStream<char> =
            CursorStream::new("", |_url: String| -> BoxFuture<'static, Result<Page<char>>> {
                Box::pin(async { Err(Error::Timeout) })
            });
        let items: Vec<_> = stream.collect().await;
        assert!(items.is_empty());
    }
}
