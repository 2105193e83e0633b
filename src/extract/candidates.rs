//! Candidate locator.
//!
//! Sites disagree on which element wraps an article, so every generic
//! container is a candidate. Quality filtering happens later, in the field
//! extractors and the title/description gate.

use once_cell::sync::Lazy;
use scraper::{ElementRef, Html, Selector};

/// Tag kinds conventionally used for article blocks, sections and grouping divs.
static CONTAINER_SELECTOR: Lazy<Selector> =
    Lazy::new(|| Selector::parse("article, div, section").expect("static container selector"));

/// All container elements of `document`, in document order.
///
/// Nested containers are all yielded; an outer `div` comes before the
/// `article` it wraps.
pub fn candidates(document: &Html) -> impl Iterator<Item = ElementRef<'_>> {
    document.select(&CONTAINER_SELECTOR)
}
