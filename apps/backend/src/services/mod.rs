//! Service layer composing the review engine with the database

pub mod review;
