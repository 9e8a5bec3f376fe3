//! Lead Scraper library
//!
//! Turns a free-text company search into a list of sales leads by fanning
//! the query out to a web search API and an LLM, then merging the results.

pub mod config;
pub mod extract;
pub mod lead;
pub mod llm;
pub mod logging;
pub mod pipeline;
pub mod search;
pub mod server;
