//! Vidshelf-DB: Catalog schema, migrations, and query operations
//!
//! SQLite storage for the series/season/episode catalog using rusqlite and
//! r2d2 connection pooling.
//!
//! # Modules
//!
//! - `migrations` - Database schema migrations
//! - `pool` - Connection pool management
//! - `models` - Rust models matching database schema
//! - `queries` - Database query operations
//!
//! # Example
//!
//! ```no_run
//! use vidshelf_db::models::Series;
//! use vidshelf_db::pool::{init_pool, get_conn};
//! use vidshelf_db::queries::series;
//!
//! let pool = init_pool("/var/lib/vidshelf/vidshelf.db").unwrap();
//! let conn = get_conn(&pool).unwrap();
//!
//! series::upsert_series(&conn, &Series::new("Breaking Bad", "/HD/Breaking Bad")).unwrap();
//! let found = series::find_series_by_path(&conn, "/HD/Breaking Bad").unwrap();
//! assert!(found.is_some());
//! ```

pub mod migrations;
pub mod models;
pub mod pool;
pub mod queries;
