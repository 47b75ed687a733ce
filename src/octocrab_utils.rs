use std::pin::pin;

use futures::{future, TryStreamExt};
use octocrab::Page;
use serde::de::DeserializeOwned;

pub(crate) trait PageExt<I>
where
    I: DeserializeOwned + 'static,
{
    /// Find the first item matching `pred`, fetching further pages as needed.
    /// A failed page fetch is returned as an error, never as “not found”.
    async fn find<F: Fn(&I) -> bool>(
        self,
        github_api: &octocrab::Octocrab,
        pred: F,
    ) -> octocrab::Result<Option<I>>;
}

impl<I> PageExt<I> for Page<I>
where
    I: DeserializeOwned + 'static,
{
    async fn find<F: Fn(&I) -> bool>(
        self,
        github_api: &octocrab::Octocrab,
        pred: F,
    ) -> octocrab::Result<Option<I>> {
        let mut items = pin!(self
            .into_stream(github_api)
            .try_filter(|item| future::ready(pred(item))));
        items.try_next().await
    }
}

/// Cut `text` to at most `max_bytes` without splitting a character.
pub(crate) fn clamp_text(text: &str, max_bytes: usize) -> &str {
    if text.len() <= max_bytes {
        return text;
    }
    let end = text
        .char_indices()
        .map(|(i, _)| i)
        .take_while(|&i| i <= max_bytes)
        .last()
        .unwrap_or(0);
    &text[..end]
}
