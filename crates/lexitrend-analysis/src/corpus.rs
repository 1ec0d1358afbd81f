//! Corpus data loaded from LIWC-annotated tables
//!
//! A corpus is a table of texts: one [`Observation`] per row, holding the
//! publication year and one score per LIWC category. Rows are never mutated
//! after loading.
//!
//! # Table format
//!
//! Comma-separated values with a header row. Only the `year` column and the
//! requested category columns are read; any other column is ignored.
//!
//! ```text
//! title,year,Affect,Cognition,Perception
//! Emma,1815,5.12,11.40,2.33
//! Untitled,,4.80,,2.90
//! ```
//!
//! # Missing Values
//!
//! - **Year**: empty, `NaN`/`NA`, or anything that does not parse as a number
//!   becomes `None`. Such rows stay in the corpus but are dropped from every
//!   decade aggregation. Fractional years (`1983.0`) are truncated.
//! - **Scores**: empty, `NaN`, `NA` or `null` become `None`. Any other
//!   unparseable score makes the table malformed and loading fails.

use std::{fs::File, io, path::Path};

/// Name of the publication-year column.
pub const YEAR_COLUMN: &str = "year";

#[derive(Debug, derive_more::Display, derive_more::Error)]
pub enum LoadCorpusError {
    #[display("failed to read table")]
    Io { source: io::Error },
    #[display("failed to parse table")]
    Csv { source: csv::Error },
    #[display("required column '{column}' not found in header")]
    MissingColumn { column: String },
    #[display("line {line}: invalid value '{value}' in column '{column}'")]
    InvalidScore {
        line: u64,
        column: String,
        value: String,
    },
}

/// One text of the corpus.
#[derive(Debug, Clone, PartialEq)]
pub struct Observation {
    /// Publication year, if known.
    pub year: Option<i32>,
    /// Category scores, in the corpus' category order.
    pub scores: Vec<Option<f64>>,
}

/// In-memory table of observations sharing one category list.
#[derive(Debug, Clone)]
pub struct Corpus {
    categories: Vec<String>,
    observations: Vec<Observation>,
}

impl Corpus {
    /// Creates a corpus from already-parsed observations.
    ///
    /// # Panics
    ///
    /// Panics if an observation has a different number of scores than there
    /// are categories.
    #[must_use]
    pub fn new(categories: Vec<String>, observations: Vec<Observation>) -> Self {
        assert!(
            observations
                .iter()
                .all(|obs| obs.scores.len() == categories.len()),
            "every observation needs one score per category"
        );
        Self {
            categories,
            observations,
        }
    }

    /// Loads the `year` column and the given category columns from a CSV file.
    pub fn from_path<P, S>(path: P, categories: &[S]) -> Result<Self, LoadCorpusError>
    where
        P: AsRef<Path>,
        S: AsRef<str>,
    {
        let file = File::open(path).map_err(|source| LoadCorpusError::Io { source })?;
        Self::from_reader(io::BufReader::new(file), categories)
    }

    /// Loads the `year` column and the given category columns from CSV data.
    pub fn from_reader<R, S>(reader: R, categories: &[S]) -> Result<Self, LoadCorpusError>
    where
        R: io::Read,
        S: AsRef<str>,
    {
        let mut reader = csv::ReaderBuilder::new()
            .has_headers(true)
            .trim(csv::Trim::All)
            .from_reader(reader);

        let headers = reader
            .headers()
            .map_err(|source| LoadCorpusError::Csv { source })?
            .clone();
        let column_index = |column: &str| {
            headers
                .iter()
                .position(|h| h == column)
                .ok_or_else(|| LoadCorpusError::MissingColumn {
                    column: column.to_owned(),
                })
        };
        let year_index = column_index(YEAR_COLUMN)?;
        let category_indices = categories
            .iter()
            .map(|c| column_index(c.as_ref()))
            .collect::<Result<Vec<_>, _>>()?;

        let mut observations = vec![];
        for record in reader.records() {
            let record = record.map_err(|source| LoadCorpusError::Csv { source })?;
            let line = record.position().map_or(0, csv::Position::line);
            let year = record.get(year_index).and_then(parse_year);
            let scores = categories
                .iter()
                .zip(&category_indices)
                .map(|(category, &index)| {
                    let raw = record.get(index).unwrap_or_default();
                    parse_score(raw).ok_or_else(|| LoadCorpusError::InvalidScore {
                        line,
                        column: category.as_ref().to_owned(),
                        value: raw.to_owned(),
                    })
                })
                .collect::<Result<Vec<_>, _>>()?;
            observations.push(Observation { year, scores });
        }

        Ok(Self {
            categories: categories.iter().map(|c| c.as_ref().to_owned()).collect(),
            observations,
        })
    }

    #[must_use]
    pub fn categories(&self) -> &[String] {
        &self.categories
    }

    #[must_use]
    pub fn observations(&self) -> &[Observation] {
        &self.observations
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.observations.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.observations.is_empty()
    }

    /// Position of `category` in the category list.
    #[must_use]
    pub fn category_index(&self, category: &str) -> Option<usize> {
        self.categories.iter().position(|c| c == category)
    }

    /// Non-missing scores of the category at `index`, in row order.
    pub fn scores(&self, index: usize) -> impl Iterator<Item = f64> + '_ {
        self.observations
            .iter()
            .filter_map(move |obs| obs.scores[index])
    }

    /// Number of rows without a usable year.
    #[must_use]
    pub fn missing_year_count(&self) -> usize {
        self.observations
            .iter()
            .filter(|obs| obs.year.is_none())
            .count()
    }
}

fn is_missing(raw: &str) -> bool {
    raw.is_empty()
        || ["nan", "na", "null", "none"]
            .iter()
            .any(|m| raw.eq_ignore_ascii_case(m))
}

#[expect(clippy::cast_possible_truncation)]
fn parse_year(raw: &str) -> Option<i32> {
    if is_missing(raw) {
        return None;
    }
    if let Ok(year) = raw.parse::<i32>() {
        return Some(year);
    }
    let year = raw.parse::<f64>().ok().filter(|y| y.is_finite())?.trunc();
    (f64::from(i32::MIN)..=f64::from(i32::MAX))
        .contains(&year)
        .then_some(year as i32)
}

/// `Some(None)` for a missing score, `None` for an unparseable one.
fn parse_score(raw: &str) -> Option<Option<f64>> {
    if is_missing(raw) {
        return Some(None);
    }
    raw.parse::<f64>().ok().filter(|v| v.is_finite()).map(Some)
}
