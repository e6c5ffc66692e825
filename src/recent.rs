//! Utilities for keeping only the rows of a trailing date window
use chrono::{Days, NaiveDate};
use tracing::{info, warn};

use crate::date::parse_day_first;
use crate::error::{Error, Result, RowResult};
use crate::{Headers, RowStream, Tally};

/// How many unreadable date values are kept around for the logs.
const SAMPLE_SIZE: usize = 5;

/// A trailing span of `days` days ending at `reference`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Window {
    pub reference: NaiveDate,
    pub days: u32,
}

impl Window {
    pub fn new(reference: NaiveDate, days: u32) -> Window {
        Window { reference, days }
    }

    /// Oldest date still inside the window.
    pub fn cutoff(&self) -> NaiveDate {
        self.reference
            .checked_sub_days(Days::new(u64::from(self.days)))
            .unwrap_or(NaiveDate::MIN)
    }

    pub fn admits(&self, date: NaiveDate) -> bool {
        date >= self.cutoff()
    }
}

/// What happened to the rows that went through a [`Recent`] stage.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RecencyTally {
    pub kept: usize,
    pub too_old: usize,
    pub unparseable: usize,
    /// First few date values that could not be read.
    pub unparseable_samples: Vec<String>,
}

impl RecencyTally {
    pub fn seen(&self) -> usize {
        self.kept + self.too_old + self.unparseable
    }

    pub fn dropped(&self) -> usize {
        self.too_old + self.unparseable
    }
}

/// Keeps the rows whose date column falls inside a [`Window`].
///
/// Dates are read day first (see [`parse_day_first`]). A row whose date can't
/// be read is treated as not recent: it is dropped and counted, never an
/// error.
pub struct Recent<I> {
    iter: I,
    field: String,
    index: usize,
    window: Window,
    tally: Tally<RecencyTally>,
}

impl<I> Recent<I>
where
    I: RowStream,
{
    pub fn new(iter: I, field: &str, window: Window) -> Result<Recent<I>> {
        let index = match iter.headers().get(field) {
            Some(index) => index,
            None => return Err(Error::missing_column("recent", field)),
        };

        Ok(Recent {
            iter,
            field: field.to_string(),
            index,
            window,
            tally: Tally::default(),
        })
    }

    /// Counters that fill up as the stream is consumed.
    pub fn tally(&self) -> Tally<RecencyTally> {
        self.tally.clone()
    }
}

pub struct IntoIter<I> {
    iter: I,
    field: String,
    index: usize,
    window: Window,
    tally: Tally<RecencyTally>,
    reported: bool,
}

impl<I> IntoIter<I> {
    fn report(&mut self) {
        if self.reported {
            return;
        }

        self.reported = true;

        let tally = self.tally.snapshot();

        info!(
            "kept {} rows out of {} using {} >= {} (dropped {} rows)",
            tally.kept,
            tally.seen(),
            self.field,
            self.window.cutoff(),
            tally.dropped(),
        );

        if tally.unparseable > 0 {
            warn!(
                "{} rows had an unreadable {}, e.g. {:?}",
                tally.unparseable, self.field, tally.unparseable_samples,
            );
        }
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
                    let value = row.get(self.index).unwrap_or("");

                    match parse_day_first(value) {
                        Some(date) if self.window.admits(date) => {
                            self.tally.update(|t| t.kept += 1);

                            return Some(Ok(row));
                        }
                        Some(_) => self.tally.update(|t| t.too_old += 1),
                        None => self.tally.update(|t| {
                            t.unparseable += 1;

                            if t.unparseable_samples.len() < SAMPLE_SIZE {
                                t.unparseable_samples.push(value.to_string());
                            }
                        }),
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

impl<I> IntoIterator for Recent<I>
where
    I: RowStream,
{
    type Item = RowResult;

    type IntoIter = IntoIter<I::IntoIter>;

    fn into_iter(self) -> Self::IntoIter {
        Self::IntoIter {
            iter: self.iter.into_iter(),
            field: self.field,
            index: self.index,
            window: self.window,
            tally: self.tally,
            reported: false,
        }
    }
}

impl<I> RowStream for Recent<I>
where
    I: RowStream,
{
    fn headers(&self) -> &Headers {
        self.iter.headers()
    }
}
