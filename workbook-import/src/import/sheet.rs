//! Sheet mapper: every row of one worksheet as entities of one type

use futures::future::join_all;

use super::builder::build_entity;
use super::concurrency::RowLimiter;
use super::lookup::DataLookup;
use super::types::{ImportError, ImportResult, Row};

/// Map all rows of a sheet to entities of `type_name`
///
/// All row pipelines are started together and run interleaved on the
/// current task. Every pipeline runs to completion even when another one
/// fails, so rows that succeed are stored; the first failure in row order
/// is then returned. Returns the number of entities stored.
pub async fn map_sheet(
    type_name: &str,
    rows: &[Row],
    lookup: &dyn DataLookup,
    limiter: &RowLimiter,
) -> ImportResult<usize> {
    if type_name.trim().is_empty() {
        return Err(ImportError::argument("type name is empty"));
    }

    log::info!("Mapping {} rows as {}", rows.len(), type_name);

    let pipelines = rows.iter().enumerate().map(|(index, row)| async move {
        let _permit = limiter.acquire().await;
        build_entity(type_name, lookup, row).await.map_err(|err| {
            log::warn!("{} row {}: {}", type_name, index + 1, err);
            err
        })
    });

    let mut stored = 0;
    let mut first_error = None;
    for result in join_all(pipelines).await {
        match result {
            Ok(()) => stored += 1,
            Err(err) => {
                if first_error.is_none() {
                    first_error = Some(err);
                }
            }
        }
    }

    match first_error {
        Some(err) => {
            log::warn!(
                "{}: {} of {} rows stored before failure ({})",
                type_name,
                stored,
                rows.len(),
                err.kind()
            );
            Err(err)
        }
        None => {
            log::info!("{}: stored {} entities", type_name, stored);
            Ok(stored)
        }
    }
}
