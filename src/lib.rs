//! The library code for the `article-aggregator`. Work happens in two steps:
//!
//! 1. Loading articles from a content directory into an
//!    [`aggregator::Aggregator`], which also indexes titles against URLs
//! 2. Rendering the loaded articles into listing page fragments
//!    ([`crate::fragment`])
//!
//! Each file in the content directory holds one JSON [`article::Article`].
//! The aggregator is built once at startup and is read-only afterwards.

#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]

pub mod aggregator;
pub mod article;
pub mod config;
pub mod fragment;
