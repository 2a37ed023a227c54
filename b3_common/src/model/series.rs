//! Dated records and the capped, date-ordered `Series` that holds them.
use chrono::NaiveDate;
use strum::Display;

/// Calendar-date rendering used in every table.
pub const DATE_FORMAT: &str = "%d/%m/%Y";

/// Anything that belongs to a single calendar date.
pub trait Dated {
    /// Calendar date of the record.
    fn date(&self) -> NaiveDate;

    /// Date as `dd/mm/yyyy`.
    fn date_display(&self) -> String {
        self.date().format(DATE_FORMAT).to_string()
    }
}

/// Daily close for one trading day.
#[derive(Debug, Clone, PartialEq)]
pub struct PricePoint {
    /// Trading day.
    pub date: NaiveDate,
    /// Close price, rounded to 2 decimals.
    pub close_price: f64,
}

impl Dated for PricePoint {
    fn date(&self) -> NaiveDate {
        self.date
    }
}

/// Kind of distribution. The chart endpoint does not tell them apart.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
pub enum DividendKind {
    /// Cash dividend.
    #[strum(serialize = "Dividendo")]
    Dividend,
}

/// One distribution event.
#[derive(Debug, Clone, PartialEq)]
pub struct DividendEvent {
    /// Event date.
    pub date: NaiveDate,
    /// Amount per share, rounded to 4 decimals.
    pub amount: f64,
    /// Always [`DividendKind::Dividend`] for this source.
    pub kind: DividendKind,
}

impl Dated for DividendEvent {
    fn date(&self) -> NaiveDate {
        self.date
    }
}

/// Most-recent-first records for one ticker: unique dates, strictly
/// descending, at most `window` long.
#[derive(Debug, Clone, PartialEq)]
pub struct Series<T> {
    items: Vec<T>,
    window: usize,
    available: usize,
}

impl<T: Dated> Series<T> {
    /// Wrap records that are already unique, descending and capped.
    pub(crate) fn new(items: Vec<T>, window: usize, available: usize) -> Self {
        debug_assert!(items.len() <= window);
        debug_assert!(items.windows(2).all(|w| w[0].date() > w[1].date()));
        Self {
            items,
            window,
            available,
        }
    }

    /// Empty series for the given window.
    pub fn empty(window: usize) -> Self {
        Self::new(Vec::new(), window, 0)
    }

    /// Records, most recent first.
    pub fn items(&self) -> &[T] {
        &self.items
    }

    /// Iterate records, most recent first.
    pub fn iter(&self) -> std::slice::Iter<'_, T> {
        self.items.iter()
    }

    /// Number of records kept.
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// `true` when no record survived.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Requested window size.
    pub fn window(&self) -> usize {
        self.window
    }

    /// Distinct dates found before truncation.
    pub fn available(&self) -> usize {
        self.available
    }

    /// How many records short of the window the source was, if any.
    pub fn shortfall(&self) -> Option<usize> {
        (self.available < self.window).then(|| self.window - self.available)
    }
}

impl<'a, T> IntoIterator for &'a Series<T> {
    type Item = &'a T;
    type IntoIter = std::slice::Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.iter()
    }
}
