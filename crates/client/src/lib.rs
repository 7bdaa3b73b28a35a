//! Signal summary requester
//!
//! Client side of the summarize endpoint: strips markup from article text,
//! issues one request, and renders the outcome for the reader.

mod markup;
mod requester;

pub use markup::strip_markup;
pub use requester::{SummaryOutcome, SummaryRequester};
