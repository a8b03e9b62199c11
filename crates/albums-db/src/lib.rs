//! Persistence layer for the album catalog.
//!
//! Provides SQLite connection pooling (via `r2d2`), the one-time bootstrap of
//! the `albums` table, and the four statements the HTTP layer needs.
//!
//! # Design decisions
//!
//! - **SQLite with WAL mode**: no external database process required. WAL
//!   mode allows concurrent readers with a single writer.
//! - **`r2d2` connection pool**: the pool is built once by the process entry
//!   point and handed to the HTTP layer; there is no global handle.
//! - **One statement per operation**: no transactions are opened. A delete
//!   that loses a race to another delete simply affects zero rows.

mod albums;
mod pool;
mod schema;

pub use albums::{
    create_album, delete_album, get_album, list_albums, round_price, Album, AlbumError,
    NewAlbum,
};
pub use pool::{create_pool, ping, DbPool, DbRuntimeSettings, PoolError};
pub use schema::{bootstrap_schema, SchemaError};
