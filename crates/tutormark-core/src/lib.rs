//! tutormark-core — Rule catalog, matching, and the feedback engine.
//!
//! This crate defines the fundamental data model, matching pipeline, and
//! feedback generation logic that the entire tutormark system builds on.

pub mod catalog;
pub mod engine;
pub mod error;
pub mod matcher;
pub mod model;
pub mod normalize;
pub mod quality;
pub mod report;
pub mod synonyms;
pub mod traits;
