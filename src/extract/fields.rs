//! Field extractors for a single article candidate.
//!
//! Each extractor walks a fixed, ordered chain of tag kinds. For every kind
//! only the first matching descendant is inspected; the first one that
//! qualifies wins. Nothing here fails: a missing tag, attribute or text is
//! reported as `None`.

use once_cell::sync::Lazy;
use scraper::{ElementRef, Selector};

/// Descriptions with this many words or fewer are treated as labels or menu text.
const SHORT_TEXT_MAX_WORDS: usize = 3;

fn selector(css: &str) -> Selector {
    Selector::parse(css).expect("static field selector")
}

/// Headings first, then any link.
static TITLE_CHAIN: Lazy<Vec<Selector>> =
    Lazy::new(|| ["h1", "h2", "h3", "a"].into_iter().map(selector).collect());

/// Paragraphs first, then generic blocks.
static DESCRIPTION_CHAIN: Lazy<Vec<Selector>> =
    Lazy::new(|| ["p", "div"].into_iter().map(selector).collect());

static LAZY_IMAGE: Lazy<Selector> = Lazy::new(|| selector("lazy-image"));
static PICTURE_IMAGE: Lazy<Selector> = Lazy::new(|| selector("picture img"));
static IMAGE: Lazy<Selector> = Lazy::new(|| selector("img"));
static TIME: Lazy<Selector> = Lazy::new(|| selector("time"));

/// Text content of `element`, trimmed at both ends.
///
/// Text nodes are concatenated as they appear; whitespace inside the text is
/// kept verbatim so that the duplicate key sees the exact page text.
pub fn element_text(element: ElementRef<'_>) -> String {
    element.text().collect::<String>().trim().to_string()
}

/// Number of whitespace-separated words in `text`.
pub fn word_count(text: &str) -> usize {
    text.split_whitespace().count()
}

/// Try each selector of `chain` in order and return the text of the first
/// leading match that `accept` agrees to.
fn first_accepted_text<F>(candidate: ElementRef<'_>, chain: &[Selector], accept: F) -> Option<String>
where
    F: Fn(&str) -> bool,
{
    chain.iter().find_map(|sel| {
        let element = candidate.select(sel).next()?;
        let text = element_text(element);
        accept(&text).then_some(text)
    })
}

/// Non-blank value of `name` on `element`.
fn attr(element: ElementRef<'_>, name: &str) -> Option<String> {
    element
        .value()
        .attr(name)
        .filter(|v| !v.trim().is_empty())
        .map(str::to_string)
}

/// Headline of the candidate: the first non-empty `h1`, `h2`, `h3` or `a` text.
pub fn find_title(candidate: ElementRef<'_>) -> Option<String> {
    first_accepted_text(candidate, &TITLE_CHAIN, |text| !text.is_empty())
}

/// Summary of the candidate: the first `p` or `div` text with more than
/// three words. There is no fallback to a shorter text.
pub fn find_description(candidate: ElementRef<'_>) -> Option<String> {
    first_accepted_text(candidate, &DESCRIPTION_CHAIN, |text| {
        word_count(text) > SHORT_TEXT_MAX_WORDS
    })
}

/// Image URL of the candidate.
///
/// Order: the `src` of the first `lazy-image`, then an `img` nested in a
/// `picture` inside that `lazy-image`, then the first plain `img` anywhere in
/// the candidate.
pub fn find_image(candidate: ElementRef<'_>) -> Option<String> {
    if let Some(lazy) = candidate.select(&LAZY_IMAGE).next() {
        let lazy_src = attr(lazy, "src").or_else(|| {
            lazy.select(&PICTURE_IMAGE)
                .next()
                .and_then(|img| attr(img, "src"))
        });
        if lazy_src.is_some() {
            return lazy_src;
        }
    }

    candidate
        .select(&IMAGE)
        .next()
        .and_then(|img| attr(img, "src"))
}

/// The `datetime` attribute of the first `time` element, verbatim.
pub fn find_date(candidate: ElementRef<'_>) -> Option<String> {
    candidate
        .select(&TIME)
        .next()
        .and_then(|time| attr(time, "datetime"))
}
