use std::fmt::{self, Display, Formatter};

use crate::index::RankedToken;

const AXIS_WIDTH: usize = 80;
const PERCENT_WIDTH: usize = "100.00%".len();

const AXIS: char = '│';
const CORNER: char = '└';
const RULE: char = '─';
const BAR: char = '░';

/// What a full-length bar stands for.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Scaling {
    /// Every ingested token.
    #[default]
    Total,
    /// The most frequent token, so the first row always spans the chart.
    TopEntry,
}

/// Horizontal bar chart of ranked tokens.
///
/// ```
/// use freq::chart::{Chart, Scaling};
/// use freq::index::RankedToken;
///
/// let rows = [RankedToken { token: "fox".to_owned(), frequency: 1 }];
/// let chart = Chart::new(&rows, 4, Scaling::Total).to_string();
///
/// assert!(chart.starts_with("fox │"));
/// assert!(chart.contains("25.00%"));
/// ```
pub struct Chart<'a> {
    rows: &'a [RankedToken],
    total: u64,
    scaling: Scaling,
}

impl<'a> Chart<'a> {
    pub fn new(rows: &'a [RankedToken], total: u64, scaling: Scaling) -> Self {
        Self { rows, total, scaling }
    }

    fn label_width(&self) -> usize {
        self.rows.iter().map(|r| r.token.chars().count()).max().unwrap_or(0) + 1
    }

    fn max_bar(&self) -> usize {
        AXIS_WIDTH.saturating_sub(self.label_width() + PERCENT_WIDTH).max(1)
    }

    fn denominator(&self) -> u64 {
        match self.scaling {
            Scaling::Total => self.total,
            Scaling::TopEntry => self.rows.first().map_or(0, |r| r.frequency),
        }
    }

    /// Bar length in glyphs for a row with the given frequency.
    pub fn bar_len(&self, frequency: u64) -> usize {
        match self.denominator() {
            0 => 0,
            d => ((self.max_bar() as u64 * frequency.min(d)) / d) as usize,
        }
    }

    /// Share of all ingested tokens, in percent.
    pub fn percentage(&self, frequency: u64) -> f64 {
        match self.total {
            0 => 0.0,
            total => 100.0 * frequency as f64 / total as f64,
        }
    }
}

impl Display for Chart<'_> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        let width = self.label_width();

        for row in self.rows {
            let bar = BAR.to_string().repeat(self.bar_len(row.frequency));
            writeln!(f, "{:<width$}{AXIS}{bar}{:.2}%", row.token, self.percentage(row.frequency))?;
            writeln!(f, "{:<width$}{AXIS}{bar}", "")?;
            writeln!(f, "{:<width$}", "")?;
        }

        let rule = RULE.to_string().repeat(AXIS_WIDTH);
        writeln!(f, "{:<width$}{CORNER}{rule}", "")
    }
}
