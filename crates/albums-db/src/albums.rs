//! Album records and the statements that read and write them.
//!
//! Every function issues exactly one parameterized statement against the
//! `albums` table. None of them opens a transaction; concurrent callers rely
//! on SQLite's per-statement atomicity.

use rusqlite::{params, Connection, OptionalExtension, Row};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors that can occur during album operations.
#[derive(Debug, Error)]
pub enum AlbumError {
    #[error("database error: {0}")]
    Database(#[from] rusqlite::Error),
    #[error("album not found: {0}")]
    NotFound(i64),
    #[error("price out of range for NUMERIC(10, 2): {0}")]
    PriceOutOfRange(f64),
}

/// A stored album.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Album {
    /// Store-assigned identifier. Serialized as a decimal string.
    #[serde(with = "id_string")]
    pub id: i64,
    pub title: String,
    pub artist: String,
    /// Price with two fractional digits.
    pub price: f64,
}

/// Fields accepted when creating an album.
///
/// Any `id` supplied by a client is ignored; the store assigns one.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct NewAlbum {
    pub title: String,
    pub artist: String,
    pub price: f64,
}

/// Exclusive upper bound on the magnitude of a `NUMERIC(10, 2)` value.
const MAX_PRICE_MAGNITUDE: f64 = 1e8;

/// Rounds a price to the two fractional digits kept by the `NUMERIC(10, 2)` column.
pub fn round_price(price: f64) -> f64 {
    (price * 100.0).round() / 100.0
}

/// Rounds a price and checks that it fits eight integer digits.
fn checked_price(price: f64) -> Result<f64, AlbumError> {
    let rounded = round_price(price);
    if !rounded.is_finite() || rounded.abs() >= MAX_PRICE_MAGNITUDE {
        return Err(AlbumError::PriceOutOfRange(price));
    }
    Ok(rounded)
}

/// Lists every album in id order.
pub fn list_albums(conn: &Connection) -> Result<Vec<Album>, AlbumError> {
    let mut stmt = conn.prepare("SELECT id, title, artist, price FROM albums ORDER BY id")?;

    let rows = stmt.query_map([], map_row_to_album)?;
    let mut albums = Vec::new();
    for row in rows {
        albums.push(row?);
    }
    Ok(albums)
}

/// Retrieves a single album by id.
pub fn get_album(conn: &Connection, id: i64) -> Result<Album, AlbumError> {
    conn.query_row(
        "SELECT id, title, artist, price FROM albums WHERE id = ?1",
        [id],
        map_row_to_album,
    )
    .optional()?
    .ok_or(AlbumError::NotFound(id))
}

/// Inserts a new album and returns it as stored, including its assigned id.
///
/// Prices that do not fit the `NUMERIC(10, 2)` column are rejected with
/// `AlbumError::PriceOutOfRange` before any statement runs.
pub fn create_album(conn: &Connection, album: &NewAlbum) -> Result<Album, AlbumError> {
    let price = checked_price(album.price)?;
    let created = conn.query_row(
        "INSERT INTO albums (title, artist, price) VALUES (?1, ?2, ?3)
         RETURNING id, title, artist, price",
        params![album.title, album.artist, price],
        map_row_to_album,
    )?;

    tracing::debug!(album_id = created.id, "album inserted");
    Ok(created)
}

/// Deletes an album by id.
///
/// A delete that affects no rows (unknown id, or a concurrent delete that got
/// there first) reports `AlbumError::NotFound`.
pub fn delete_album(conn: &Connection, id: i64) -> Result<(), AlbumError> {
    let affected = conn.execute("DELETE FROM albums WHERE id = ?1", [id])?;
    if affected == 0 {
        return Err(AlbumError::NotFound(id));
    }

    tracing::debug!(album_id = id, "album deleted");
    Ok(())
}

fn map_row_to_album(row: &Row) -> rusqlite::Result<Album> {
    Ok(Album {
        id: row.get(0)?,
        title: row.get(1)?,
        artist: row.get(2)?,
        price: row.get(3)?,
    })
}

/// Wire representation of album ids: a decimal string.
mod id_string {
    use serde::{de, Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(id: &i64, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(id)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<i64, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(de::Error::custom)
    }
}
