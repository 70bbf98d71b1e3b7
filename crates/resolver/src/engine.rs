//! Batch resolution engine.
//!
//! Each name is answered by the first source that knows it: the static
//! dictionary, then the cache, then the remote service. Remote misses are
//! chunked into as few requests as the service allows, requested one
//! chunk at a time, written through to the cache and merged back into
//! input order.

use secrecy::{ExposeSecret, Secret};
use std::collections::HashSet;
use std::sync::Arc;

use genderize_core::{
    traits::{NameCache, Transport},
    types::{cache_key, Gender, NameOutcome, NameQuery, NameResult},
    Error, Result,
};
use genderize_gateway::{parse_response, RequestChunk, UrlBatcher};

use crate::builder::ResolverBuilder;
use crate::dictionary::Dictionary;

/// Resolves first names to genders.
///
/// Holds its collaborators for its whole lifetime; the dictionary is
/// never mutated after construction.
pub struct Resolver {
    pub(crate) transport: Arc<dyn Transport>,
    pub(crate) cache: Option<Arc<dyn NameCache>>,
    pub(crate) dictionary: Option<Dictionary>,
    pub(crate) batcher: UrlBatcher,
    pub(crate) api_key: Option<Secret<String>>,
    pub(crate) stream_window: usize,
}

impl Resolver {
    /// Create a new builder.
    pub fn builder() -> ResolverBuilder {
        ResolverBuilder::new()
    }

    /// The cache this resolver writes through to, if any.
    pub fn cache(&self) -> Option<&Arc<dyn NameCache>> {
        self.cache.as_ref()
    }

    /// The static dictionary, if enabled.
    pub fn dictionary(&self) -> Option<&Dictionary> {
        self.dictionary.as_ref()
    }

    /// Look a name up in the static dictionary only.
    pub fn dictionary_lookup(&self, name: &str) -> Option<Gender> {
        self.dictionary.as_ref().and_then(|d| d.lookup(name))
    }

    /// Resolve a single name.
    ///
    /// A name the service cannot resolve is returned as
    /// `Error::NameNotFound` (or `Error::NameRejected`).
    pub async fn resolve_one(&self, name: &str) -> Result<NameResult> {
        let mut outcomes = self.resolve_many([name]).await?;
        let outcome = outcomes
            .pop()
            .ok_or_else(|| Error::internal("no outcome for single-name lookup"))?;
        outcome.map_err(Error::from)
    }

    /// Resolve many names, returning one outcome per input in input order.
    ///
    /// On a fatal error nothing is returned; remote results resolved before
    /// the failure are already in the cache.
    pub async fn resolve_many<I, S>(&self, names: I) -> Result<Vec<NameOutcome>>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let names = names.into_iter();
        let mut outcomes = Vec::with_capacity(names.size_hint().0);
        self.resolve_each(names, |outcome| outcomes.push(outcome)).await?;
        Ok(outcomes)
    }

    /// Resolve names and hand each outcome to `sink` in input order.
    ///
    /// Input is consumed one window at a time, so memory use is bounded by
    /// the window size rather than the input size. On a fatal error every
    /// outcome before the first unresolved position has already been
    /// delivered. Returns the number of outcomes delivered.
    pub async fn resolve_each<I, S, F>(&self, names: I, mut sink: F) -> Result<usize>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
        F: FnMut(NameOutcome),
    {
        let mut inputs = names.into_iter().map(Into::into).enumerate();
        let mut written = HashSet::new();
        let mut delivered = 0;

        loop {
            let window: Vec<NameQuery> = inputs
                .by_ref()
                .take(self.stream_window)
                .map(|(index, name)| NameQuery::new(name, index))
                .collect();
            if window.is_empty() {
                break;
            }

            let mut slots = OrderedSlots::new(window.len());
            let result = self.resolve_window(&window, &mut slots, &mut written, &mut sink).await;
            slots.flush(&mut sink);
            delivered += slots.delivered();
            if let Err(e) = result {
                tracing::warn!(error = %e, delivered, "Batch aborted");
                return Err(e);
            }
        }

        Ok(delivered)
    }

    async fn resolve_window<F>(
        &self,
        window: &[NameQuery],
        slots: &mut OrderedSlots,
        written: &mut HashSet<String>,
        sink: &mut F,
    ) -> Result<()>
    where
        F: FnMut(NameOutcome),
    {
        let mut misses = Vec::new();
        let (mut dictionary_hits, mut cache_hits) = (0usize, 0usize);

        for (pos, query) in window.iter().enumerate() {
            if let Some(gender) = self.dictionary_lookup(&query.name) {
                slots.fill(pos, Ok(NameResult::dictionary(query.name.clone(), gender)));
                dictionary_hits += 1;
                continue;
            }
            if let Some(cache) = &self.cache {
                if let Some(record) = cache.get(&query.name).await? {
                    slots.fill(pos, Ok(NameResult::cached(query.name.clone(), record.gender)));
                    cache_hits += 1;
                    continue;
                }
            }
            misses.push(pos);
        }

        let miss_names: Vec<&str> = misses.iter().map(|&pos| window[pos].name.as_str()).collect();
        let api_key = self.api_key.as_ref().map(|k| k.expose_secret().as_str());
        let chunks = self.batcher.batch(&miss_names, api_key);

        tracing::debug!(
            first_index = window[0].index,
            names = window.len(),
            dictionary_hits,
            cache_hits,
            requests = chunks.len(),
            "Resolving window"
        );

        for chunk in &chunks {
            let outcomes = self.fetch_chunk(chunk, &miss_names[chunk.range()]).await?;
            for (offset, outcome) in outcomes.into_iter().enumerate() {
                if let Ok(result) = &outcome {
                    self.write_through(result, written).await?;
                }
                slots.fill(misses[chunk.start + offset], outcome);
            }
            slots.flush(sink);
        }

        Ok(())
    }

    async fn fetch_chunk(&self, chunk: &RequestChunk, names: &[&str]) -> Result<Vec<NameOutcome>> {
        tracing::debug!(start = chunk.start, names = chunk.len, "Requesting chunk");
        let body = self.transport.fetch(&chunk.url).await?;
        parse_response(&body, names)
    }

    /// Persist a fresh remote result before it is handed out.
    ///
    /// A duplicate key is tolerated only when this same call already wrote
    /// the name (the input repeated it).
    async fn write_through(&self, result: &NameResult, written: &mut HashSet<String>) -> Result<()> {
        let Some(cache) = &self.cache else {
            return Ok(());
        };

        let key = cache_key(result.name());
        match cache.put(result.name(), result.gender()).await {
            Ok(()) => {
                written.insert(key);
                Ok(())
            }
            Err(Error::DuplicateKey(_)) if written.contains(&key) => {
                tracing::debug!(name = %key, "Name repeated within batch, already cached");
                Ok(())
            }
            Err(e) => Err(e),
        }
    }
}

/// Outcome slots for one window, released to the sink in input order.
struct OrderedSlots {
    slots: Vec<Option<NameOutcome>>,
    next: usize,
}

impl OrderedSlots {
    fn new(len: usize) -> Self {
        Self {
            slots: (0..len).map(|_| None).collect(),
            next: 0,
        }
    }

    fn fill(&mut self, pos: usize, outcome: NameOutcome) {
        self.slots[pos] = Some(outcome);
    }

    /// Deliver the filled prefix not yet handed out.
    fn flush<F: FnMut(NameOutcome)>(&mut self, sink: &mut F) {
        while let Some(outcome) = self.slots.get_mut(self.next).and_then(Option::take) {
            sink(outcome);
            self.next += 1;
        }
    }

    fn delivered(&self) -> usize {
        self.next
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use genderize_core::types::NameError;

    #[test]
    fn test_ordered_slots_release_prefix_only() {
        let mut slots = OrderedSlots::new(3);
        let mut seen = Vec::new();
        let mut sink = |o: NameOutcome| seen.push(o.map(|r| r.name().to_string()).unwrap_or_default());

        slots.fill(1, Ok(NameResult::cached("b", Gender::Male)));
        slots.flush(&mut sink);
        assert_eq!(slots.delivered(), 0);

        slots.fill(0, Ok(NameResult::cached("a", Gender::Female)));
        slots.flush(&mut sink);
        assert_eq!(slots.delivered(), 2);

        slots.fill(2, Err(NameError::not_found("c")));
        slots.flush(&mut sink);
        assert_eq!(slots.delivered(), 3);
        drop(sink);
        assert_eq!(seen, vec!["a", "b", ""]);
    }
}
