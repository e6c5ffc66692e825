use std::collections::HashSet;
use tracing::info;

use crate::error::{Error, Result, RowResult};
use crate::{Headers, RowStream, Tally};

/// What happened to the rows that went through a [`Novel`] stage.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct NoveltyTally {
    /// Rows repeating a key seen earlier in the same stream.
    pub duplicates: usize,
    /// Unique rows whose key was already captured.
    pub already_captured: usize,
    pub novel: usize,
}

impl NoveltyTally {
    pub fn unique(&self) -> usize {
        self.already_captured + self.novel
    }
}

/// Lets through the first row of every key not in the existing set.
///
/// Repeated keys are resolved in stream order: the first row wins and later
/// ones are dropped even if their other columns differ.
pub struct Novel<I> {
    iter: I,
    index: usize,
    existing: HashSet<String>,
    tally: Tally<NoveltyTally>,
}

impl<I> Novel<I>
where
    I: RowStream,
{
    pub fn new(iter: I, key: &str, existing: HashSet<String>) -> Result<Novel<I>> {
        let index = iter
            .headers()
            .get(key)
            .ok_or_else(|| Error::missing_column("novel", key))?;

        Ok(Novel {
            iter,
            index,
            existing,
            tally: Tally::default(),
        })
    }

    /// Counters that fill up as the stream is consumed.
    pub fn tally(&self) -> Tally<NoveltyTally> {
        self.tally.clone()
    }
}

pub struct IntoIter<I> {
    iter: I,
    index: usize,
    existing: HashSet<String>,
    seen: HashSet<String>,
    tally: Tally<NoveltyTally>,
    reported: bool,
}

impl<I> IntoIter<I> {
    fn report(&mut self) {
        if self.reported {
            return;
        }

        self.reported = true;

        let tally = self.tally.snapshot();

        if tally.duplicates > 0 {
            info!("dropped {} duplicate keys in source", tally.duplicates);
        }

        info!(
            "found {} new rows out of {} unique keys in source",
            tally.novel,
            tally.unique(),
        );
    }
}

impl<I> Iterator for IntoIter<I>
where
    I: Iterator<Item = RowResult>,
{
    type Item = RowResult;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            match self.iter.next() {
                Some(Ok(row)) => {
                    let key = row.get(self.index).unwrap_or("");

                    if !self.seen.insert(key.to_string()) {
                        self.tally.update(|t| t.duplicates += 1);
                    } else if self.existing.contains(key) {
                        self.tally.update(|t| t.already_captured += 1);
                    } else {
                        self.tally.update(|t| t.novel += 1);

                        return Some(Ok(row));
                    }
                }
                err @ Some(Err(_)) => return err,
                None => {
                    self.report();

                    return None;
                }
            }
        }
    }
}

impl<I> IntoIterator for Novel<I>
where
    I: RowStream,
{
    type Item = RowResult;

    type IntoIter = IntoIter<I::IntoIter>;

    fn into_iter(self) -> Self::IntoIter {
        Self::IntoIter {
            iter: self.iter.into_iter(),
            index: self.index,
            existing: self.existing,
            seen: HashSet::new(),
            tally: self.tally,
            reported: false,
        }
    }
}

impl<I> RowStream for Novel<I>
where
    I: RowStream,
{
    fn headers(&self) -> &Headers {
        self.iter.headers()
    }
}
