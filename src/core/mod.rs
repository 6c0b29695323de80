//! Core data types shared by the matching and classification stages.
//!
//! Training functions, ideal functions and test data are all handled as
//! [`Series`]: a name plus an ordered list of [`Point`]s. A tabular input file
//! with an `x` column and several `y` columns becomes one `Series` per `y`
//! column, all sharing the same x values.

pub mod series;
