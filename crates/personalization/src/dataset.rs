//! CSV loaders for the item and rating datasets.

use std::fs::File;
use std::io::Read;
use std::path::Path;

use recsys_core::{Item, Rating, RecommenderError, RecommenderResult};
use tracing::debug;

const ITEM_COLUMNS: [&str; 4] = ["item_id", "title", "description", "category"];
const RATING_COLUMNS: [&str; 3] = ["user_id", "item_id", "rating"];

fn csv_error(e: csv::Error) -> RecommenderError {
    RecommenderError::DatasetFormat(format!("malformed CSV: {}", e))
}

fn column_positions<const N: usize>(
    headers: &csv::StringRecord,
    required: [&str; N],
) -> RecommenderResult<[usize; N]> {
    let mut positions = [0usize; N];
    for (slot, name) in positions.iter_mut().zip(required) {
        *slot = headers
            .iter()
            .position(|h| h.trim() == name)
            .ok_or_else(|| {
                RecommenderError::DatasetFormat(format!("missing required column '{}'", name))
            })?;
    }
    Ok(positions)
}

fn reader<R: Read>(input: R) -> csv::Reader<R> {
    csv::ReaderBuilder::new()
        .flexible(true)
        .has_headers(true)
        .from_reader(input)
}

fn line_of(record: &csv::StringRecord) -> u64 {
    record.position().map(|p| p.line()).unwrap_or(0)
}

/// Read items with columns `item_id,title,description,category`.
pub fn load_items<R: Read>(input: R) -> RecommenderResult<Vec<Item>> {
    let mut rdr = reader(input);
    let headers = rdr.headers().map_err(csv_error)?.clone();
    let [id_col, title_col, desc_col, cat_col] = column_positions(&headers, ITEM_COLUMNS)?;

    let mut items = Vec::new();
    for record in rdr.records() {
        let record = record.map_err(csv_error)?;
        let field = |i: usize| record.get(i).unwrap_or_default();
        let item_id = field(id_col);
        if item_id.trim().is_empty() {
            return Err(RecommenderError::at_line(line_of(&record), "empty item_id"));
        }
        items.push(Item::new(
            item_id,
            field(title_col),
            field(desc_col),
            field(cat_col),
        ));
    }

    debug!(count = items.len(), "Loaded items");
    Ok(items)
}

pub fn load_items_from_path(path: impl AsRef<Path>) -> RecommenderResult<Vec<Item>> {
    load_items(File::open(path)?)
}

/// Read ratings with columns `user_id,item_id,rating`.
pub fn load_ratings<R: Read>(input: R) -> RecommenderResult<Vec<Rating>> {
    let mut rdr = reader(input);
    let headers = rdr.headers().map_err(csv_error)?.clone();
    let [user_col, item_col, rating_col] = column_positions(&headers, RATING_COLUMNS)?;

    let mut ratings = Vec::new();
    for record in rdr.records() {
        let record = record.map_err(csv_error)?;
        let line = line_of(&record);
        let field = |i: usize| record.get(i).unwrap_or_default();

        let user_id = field(user_col);
        if user_id.trim().is_empty() {
            return Err(RecommenderError::at_line(line, "empty user_id"));
        }
        let item_id = field(item_col);
        if item_id.trim().is_empty() {
            return Err(RecommenderError::at_line(line, "empty item_id"));
        }
        let raw = field(rating_col).trim();
        let rating: f64 = raw
            .parse()
            .map_err(|_| RecommenderError::at_line(line, format!("invalid rating '{}'", raw)))?;
        if !rating.is_finite() {
            return Err(RecommenderError::at_line(line, format!("invalid rating '{}'", raw)));
        }

        ratings.push(Rating::new(user_id, item_id, rating));
    }

    debug!(count = ratings.len(), "Loaded ratings");
    Ok(ratings)
}

pub fn load_ratings_from_path(path: impl AsRef<Path>) -> RecommenderResult<Vec<Rating>> {
    load_ratings(File::open(path)?)
}
