use std::collections::VecDeque;

use futures::stream::{BoxStream, StreamExt};
use serde_json::Value;

use crate::{
    client::Client,
    config::Config,
    error::AudistoError,
    types::{ChunkedRequest, chunk::ChunkPage},
};

/// Items of a chunked listing, fetched one chunk at a time
///
/// The next chunk is requested only after every item of the current one has
/// been taken from the stream. After an error the stream ends.
pub type ChunkStream<'c> = BoxStream<'c, Result<Value, AudistoError>>;

struct ChunkState {
    request: ChunkedRequest,
    buffer: VecDeque<Value>,
    next_page: Option<u64>,
    fetched: usize,
}

impl<C: Config> Client<C> {
    /// Iterates every item of a chunked listing endpoint
    ///
    /// Pages are requested lazily with `chunk=<page>&chunksize=<n>` appended to
    /// the request parameters. Dropping the stream early is always safe.
    ///
    /// ```no_run
    /// # async fn run() -> Result<(), audisto_async::AudistoError> {
    /// use audisto_async::{Client, types::ChunkedRequest};
    /// use futures::StreamExt;
    ///
    /// let client = Client::new();
    /// let mut pages = client.chunked(ChunkedRequest::new("/crawls/1/pages/"))?;
    /// while let Some(page) = pages.next().await {
    ///     println!("{}", page?);
    /// }
    /// # Ok(())
    /// # }
    /// ```
    ///
    /// # Errors
    ///
    /// Returns [`AudistoError::InvalidArgument`] right away, without contacting the
    /// server, when the chunk size is outside `1..=10_000`. Request and format
    /// failures are yielded as stream items.
    pub fn chunked(&self, request: ChunkedRequest) -> Result<ChunkStream<'_>, AudistoError> {
        request.validate()?;
        tracing::debug!(
            "Starting chunked iteration on {} with chunksize={}",
            request.path(),
            request.chunk_size()
        );

        let state = ChunkState {
            request,
            buffer: VecDeque::new(),
            next_page: Some(0),
            fetched: 0,
        };

        Ok(futures::stream::unfold(state, move |mut st| async move {
            loop {
                if let Some(item) = st.buffer.pop_front() {
                    return Some((Ok(item), st));
                }
                let Some(page) = st.next_page.take() else {
                    return None;
                };

                match self.fetch_chunk(&st.request, page).await {
                    Ok(chunk) => {
                        st.fetched += chunk.items.len();
                        tracing::debug!(
                            "Fetched page {page}: {} items (total so far: {})",
                            chunk.items.len(),
                            st.fetched
                        );
                        st.next_page = chunk.meta.next_page(page, chunk.items.len());
                        if st.next_page.is_none() {
                            tracing::info!(
                                "Completed chunked iteration: {} total items",
                                st.fetched
                            );
                        }
                        st.buffer.extend(chunk.items);
                    }
                    Err(e) => return Some((Err(e), st)),
                }
            }
        })
        .boxed())
    }

    async fn fetch_chunk(
        &self,
        request: &ChunkedRequest,
        page: u64,
    ) -> Result<ChunkPage, AudistoError> {
        let body: Value = self
            .get_with_query(request.path(), &request.query(page))
            .await?;
        ChunkPage::from_value(body)
    }
}
