//! CSV persistence for network-derived matrices.
//!
//! File layout (native units, meters or seconds):
//!
//! ```text
//! id, <id_0>, <id_1>, ..., <id_{N-1}>
//! <id_0>, v, v, ..., v
//! <id_1>, v, v, ..., v
//! ```
//!
//! Rows are appended one at a time as the network build progresses, so an
//! interrupted build leaves a prefix of complete rows that a later build
//! resumes from. An entry whose routing request exhausted its retry budget
//! is persisted as an empty cell; loading a file containing empty cells
//! fails, since the matrix is incomplete for this station set.

use std::fs::{File, OpenOptions};
use std::path::{Path, PathBuf};

use log::info;

use super::types::DistanceMatrix;
use crate::error::{Result, RouteError};
use crate::station::StationRegistry;

/// Division factor from native units to kilometers (meters → km) or, for
/// duration matrices, seconds → the same 1/1000 scale the original files
/// use.
const NATIVE_UNITS_PER_KM: f64 = 1000.0;

/// Single-file persistent store for one cost matrix, keyed by station ids.
#[derive(Debug, Clone)]
pub struct MatrixStore {
    path: PathBuf,
}

impl MatrixStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn exists(&self) -> bool {
        self.path.exists()
    }

    /// Loads a complete matrix, converting native units to kilometers.
    ///
    /// Fails with [`RouteError::DataMismatch`] if the header ids, row ids,
    /// or row count disagree with the registry, or if any cell is empty
    /// (an unavailable entry from a degraded build).
    pub fn load(&self, registry: &StationRegistry) -> Result<DistanceMatrix> {
        let rows = self.load_rows(registry)?;
        let n = registry.len();
        if rows.len() != n {
            return Err(RouteError::DataMismatch(format!(
                "matrix file {} has {} rows, expected {}",
                self.path.display(),
                rows.len(),
                n
            )));
        }

        let mut complete = Vec::with_capacity(n);
        for (i, row) in rows.into_iter().enumerate() {
            let mut out = Vec::with_capacity(n);
            for (j, cell) in row.into_iter().enumerate() {
                match cell {
                    Some(v) => out.push(v / NATIVE_UNITS_PER_KM),
                    None => {
                        return Err(RouteError::DataMismatch(format!(
                            "matrix entry ({i}, {j}) is unavailable in {}; \
                             re-run the network build",
                            self.path.display()
                        )))
                    }
                }
            }
            complete.push(out);
        }

        let matrix = DistanceMatrix::from_rows(complete).map_err(RouteError::DataMismatch)?;
        info!(
            "loaded {}x{} matrix from {}",
            n,
            n,
            self.path.display()
        );
        Ok(matrix)
    }

    /// Loads however many data rows exist (possibly fewer than N, for a
    /// build in progress). The header and every present row id are still
    /// validated against the registry.
    pub(crate) fn load_rows(&self, registry: &StationRegistry) -> Result<Vec<Vec<Option<f64>>>> {
        let n = registry.len();
        let ids = registry.ids();

        let mut reader = csv::ReaderBuilder::new()
            .has_headers(false)
            .flexible(true)
            .from_path(&self.path)?;
        let mut records = reader.records();

        let header = match records.next() {
            Some(record) => record?,
            None => {
                return Err(RouteError::DataMismatch(format!(
                    "matrix file {} is empty",
                    self.path.display()
                )))
            }
        };
        if header.len() != n + 1 || header.get(0) != Some("id") {
            return Err(RouteError::DataMismatch(format!(
                "matrix header in {} has {} columns, expected id + {} station ids",
                self.path.display(),
                header.len(),
                n
            )));
        }
        for (j, expected) in ids.iter().enumerate() {
            let field = header.get(j + 1).unwrap_or("").trim();
            if field.parse::<u32>().ok() != Some(*expected) {
                return Err(RouteError::DataMismatch(format!(
                    "matrix header column {} is '{}', expected station id {}",
                    j + 1,
                    field,
                    expected
                )));
            }
        }

        let mut rows = Vec::new();
        for record in records {
            let record = record?;
            let i = rows.len();
            if i >= n {
                return Err(RouteError::DataMismatch(format!(
                    "matrix file {} has more than {} data rows",
                    self.path.display(),
                    n
                )));
            }
            if record.len() != n + 1 {
                return Err(RouteError::DataMismatch(format!(
                    "matrix row {} has {} columns, expected {}",
                    i,
                    record.len(),
                    n + 1
                )));
            }
            let row_id = record.get(0).unwrap_or("").trim();
            if row_id.parse::<u32>().ok() != Some(ids[i]) {
                return Err(RouteError::DataMismatch(format!(
                    "matrix row {} is keyed by '{}', expected station id {}",
                    i, row_id, ids[i]
                )));
            }

            let mut row = Vec::with_capacity(n);
            for j in 0..n {
                let cell = record.get(j + 1).unwrap_or("").trim();
                if cell.is_empty() {
                    row.push(None);
                } else {
                    let value = cell.parse::<f64>().map_err(|_| {
                        RouteError::DataMismatch(format!(
                            "matrix entry ({i}, {j}) is not numeric: '{cell}'"
                        ))
                    })?;
                    row.push(Some(value));
                }
            }
            rows.push(row);
        }

        Ok(rows)
    }

    /// Opens the file for row-by-row appends, writing the id header first
    /// if the file does not exist yet.
    pub(crate) fn appender(&self, registry: &StationRegistry) -> Result<MatrixAppender> {
        let fresh = !self.path.exists();
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)?;
        let mut writer = csv::Writer::from_writer(file);

        if fresh {
            let mut header = vec!["id".to_string()];
            header.extend(registry.ids().iter().map(u32::to_string));
            writer.write_record(&header)?;
            writer.flush()?;
        }

        Ok(MatrixAppender { writer })
    }
}

/// Row-at-a-time writer; each row is flushed immediately so an interrupted
/// build never loses completed work.
pub(crate) struct MatrixAppender {
    writer: csv::Writer<File>,
}

impl MatrixAppender {
    pub(crate) fn append_row(&mut self, id: u32, values: &[Option<f64>]) -> Result<()> {
        let mut record = Vec::with_capacity(values.len() + 1);
        record.push(id.to_string());
        for value in values {
            record.push(match value {
                Some(v) => v.to_string(),
                None => String::new(),
            });
        }
        self.writer.write_record(&record)?;
        self.writer.flush()?;
        Ok(())
    }
}
