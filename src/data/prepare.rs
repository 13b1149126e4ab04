use super::model::Dataset;
use crate::error::Result;

/// Row identifier column of the raw house data.
pub const ID_COLUMN: &str = "Id";

/// Column the models learn to predict.
pub const LABEL_COLUMN: &str = "SalePrice";

/// Remove the identifier column. Downstream code assumes it is gone, so a
/// dataset without one is a `MissingColumn` error rather than a no-op.
pub fn prepare(dataset: &Dataset) -> Result<Dataset> {
    let prepared = dataset.drop_column(ID_COLUMN)?;
    log::debug!("Dropped '{ID_COLUMN}', {} feature columns left", prepared.width());
    Ok(prepared)
}
