//! Tabular input/output: feature CSVs, metadata CSVs, and the flat
//! similarity-matrix file.
//!
//! Recovery policies (documented, not silent):
//! - Feature CSVs carry leading identifying columns (index/title/link); the
//!   leading run of non-numeric columns is dropped by position, and every
//!   remaining column must parse as numeric.
//! - A persisted similarity matrix reloads as plain numbers with no header.
//!   If the first column turns out non-numeric it is dropped (an identifier
//!   column slipped into the export); if the result is still not square it is
//!   truncated to the shared minimum dimension.

use std::path::Path;

use csv::{ReaderBuilder, StringRecord, WriterBuilder};

use log::{debug, info, warn};

use crate::core::{DocumentMetadata, FeatureMatrix, MetadataTable};
use crate::error::{Error, Result};
use crate::similarity::SimilarityMatrix;

/// Load a feature matrix from a headered CSV.
///
/// The leading run of columns that do not parse as numeric (in any data row)
/// is treated as identifying fields and stripped by position. Fails with
/// `MalformedInput` if no numeric columns remain or a non-leading field is
/// not numeric.
pub fn load_feature_matrix(path: impl AsRef<Path>) -> Result<FeatureMatrix> {
    let path = path.as_ref();
    info!("Loading feature matrix from {}", path.display());

    let mut reader = ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_path(path)?;

    let records: Vec<StringRecord> =
        reader.records().collect::<std::result::Result<_, _>>()?;
    if records.is_empty() {
        return Err(Error::MalformedInput(format!(
            "feature file {} has no data rows",
            path.display()
        )));
    }

    let width = records[0].len();
    let mut leading = 0;
    for col in 0..width {
        let numeric = records.iter().all(|record| {
            record
                .get(col)
                .map(|field| field.trim().parse::<f64>().is_ok())
                .unwrap_or(false)
        });
        if numeric {
            break;
        }
        leading += 1;
    }
    if leading >= width {
        return Err(Error::MalformedInput(format!(
            "feature file {} has no numeric feature columns",
            path.display()
        )));
    }
    debug!("Stripping {} leading identifier column(s) of {}", leading, width);

    let mut rows = Vec::with_capacity(records.len());
    for (i, record) in records.iter().enumerate() {
        let mut row = Vec::with_capacity(width - leading);
        for (col, field) in record.iter().enumerate().skip(leading) {
            let value = field.trim().parse::<f64>().map_err(|_| {
                Error::MalformedInput(format!(
                    "non-numeric feature value {:?} at row {}, column {}",
                    field, i, col
                ))
            })?;
            row.push(value);
        }
        rows.push(row);
    }

    let features = FeatureMatrix::from_rows(rows)?;
    info!(
        "Loaded {} documents × {} features",
        features.len(),
        features.nfeatures()
    );
    Ok(features)
}

/// Load document metadata from a headered CSV.
///
/// `Title` and `Link` columns are required; a `Keywords` column, when
/// present, is split on commas.
pub fn load_metadata(path: impl AsRef<Path>) -> Result<MetadataTable> {
    let path = path.as_ref();
    info!("Loading document metadata from {}", path.display());

    let mut reader = ReaderBuilder::new().has_headers(true).from_path(path)?;

    let headers = reader.headers()?.clone();
    let title_col = headers.iter().position(|h| h == "Title").ok_or_else(|| {
        Error::MalformedInput(format!("metadata file {} is missing a Title column", path.display()))
    })?;
    let link_col = headers.iter().position(|h| h == "Link").ok_or_else(|| {
        Error::MalformedInput(format!("metadata file {} is missing a Link column", path.display()))
    })?;
    let keywords_col = headers.iter().position(|h| h == "Keywords");

    let mut docs = Vec::new();
    for record in reader.records() {
        let record = record?;
        let title = record.get(title_col).unwrap_or("").to_string();
        let link = record.get(link_col).unwrap_or("").to_string();
        let keywords = keywords_col
            .and_then(|col| record.get(col))
            .map(|field| {
                field
                    .split(',')
                    .map(|kw| kw.trim().to_string())
                    .filter(|kw| !kw.is_empty())
                    .collect()
            })
            .unwrap_or_default();

        docs.push(DocumentMetadata::new(title, link).with_keywords(keywords));
    }

    if docs.is_empty() {
        return Err(Error::MalformedInput(format!(
            "metadata file {} has no data rows",
            path.display()
        )));
    }

    info!("Loaded metadata for {} documents", docs.len());
    Ok(MetadataTable::new(docs))
}

/// Persist a similarity matrix as a flat numeric CSV, no header, row i /
/// column j = similarity(i, j).
pub fn save_similarity_matrix(path: impl AsRef<Path>, sim: &SimilarityMatrix) -> Result<()> {
    let path = path.as_ref();
    info!("Saving {}×{} similarity matrix to {}", sim.len(), sim.len(), path.display());

    let mut writer = WriterBuilder::new().has_headers(false).from_path(path)?;
    for i in 0..sim.len() {
        let record: Vec<String> = sim.row(i).iter().map(|v| v.to_string()).collect();
        writer.write_record(&record)?;
    }
    writer.flush()?;
    Ok(())
}

/// Reload a persisted similarity matrix, applying the recovery policies.
///
/// The file is expected headerless and square; a non-numeric first column is
/// dropped, and a non-square result is truncated to `min(rows, cols)` before
/// re-validation. Anything beyond that fails with `MalformedInput`.
pub fn load_similarity_matrix(path: impl AsRef<Path>) -> Result<SimilarityMatrix> {
    let path = path.as_ref();
    info!("Loading similarity matrix from {}", path.display());

    let mut reader = ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_path(path)?;

    let mut records: Vec<StringRecord> =
        reader.records().collect::<std::result::Result<_, _>>()?;
    if records.is_empty() {
        return Err(Error::MalformedInput(format!(
            "similarity file {} is empty",
            path.display()
        )));
    }

    // An identifier column sometimes survives an export; detect and drop it
    let first_col_numeric = records
        .iter()
        .all(|r| r.get(0).map(|f| f.trim().parse::<f64>().is_ok()).unwrap_or(false));
    if !first_col_numeric {
        warn!("First column of {} is non-numeric; dropping it", path.display());
        records = records
            .iter()
            .map(|r| r.iter().skip(1).collect::<StringRecord>())
            .collect();
    }

    let mut rows = Vec::with_capacity(records.len());
    for (i, record) in records.iter().enumerate() {
        let mut row = Vec::with_capacity(record.len());
        for (col, field) in record.iter().enumerate() {
            let value = field.trim().parse::<f64>().map_err(|_| {
                Error::MalformedInput(format!(
                    "non-numeric similarity value {:?} at row {}, column {}",
                    field, i, col
                ))
            })?;
            row.push(value);
        }
        rows.push(row);
    }

    let nrows = rows.len();
    let ncols = rows.iter().map(|r| r.len()).min().unwrap_or(0);
    let dim = nrows.min(ncols);
    if dim == 0 {
        return Err(Error::MalformedInput(format!(
            "similarity file {} has no usable numeric columns",
            path.display()
        )));
    }
    if nrows != ncols || rows.iter().any(|r| r.len() != ncols) {
        warn!(
            "Similarity file {} is not square ({} rows, {} cols); truncating to {}×{}",
            path.display(),
            nrows,
            ncols,
            dim,
            dim
        );
        rows.truncate(dim);
        for row in &mut rows {
            row.truncate(dim);
        }
    }

    let sim = SimilarityMatrix::from_rows(rows)?;
    info!("Loaded {}×{} similarity matrix", sim.len(), sim.len());
    Ok(sim)
}
