//! ETL for Brazilian lottery-draw JSON exports: extract raw records,
//! normalize them into relational rows, load them into SQLite.

pub mod extract;
pub mod store;
pub mod transform;
