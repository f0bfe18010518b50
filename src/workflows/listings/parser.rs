use scraper::{ElementRef, Html, Selector};

use super::{ListingError, Posting, MISSING_LOCATION};

const POSTING_SELECTOR: &str = "div.posting";
const TITLE_SELECTOR: &str = "h5";
const LOCATION_SELECTOR: &str = "span.sort-by-location";
const POSTING_ID_ATTR: &str = "data-qa-posting-id";

struct PostingSelectors {
    posting: Selector,
    title: Selector,
    location: Selector,
}

impl PostingSelectors {
    fn new() -> Result<Self, ListingError> {
        Ok(Self {
            posting: selector(POSTING_SELECTOR)?,
            title: selector(TITLE_SELECTOR)?,
            location: selector(LOCATION_SELECTOR)?,
        })
    }
}

fn selector(raw: &'static str) -> Result<Selector, ListingError> {
    Selector::parse(raw).map_err(|err| ListingError::Selector {
        selector: raw,
        detail: err.to_string(),
    })
}

/// Extracts every posting block from a listing page, in document order.
///
/// A page without posting blocks yields an empty list. A block missing its id attribute or
/// title heading fails the whole parse.
pub fn parse_postings(html: &str) -> Result<Vec<Posting>, ListingError> {
    let selectors = PostingSelectors::new()?;
    let document = Html::parse_document(html);

    document
        .select(&selectors.posting)
        .enumerate()
        .map(|(index, element)| parse_posting(index, element, &selectors))
        .collect()
}

fn parse_posting(
    index: usize,
    element: ElementRef<'_>,
    selectors: &PostingSelectors,
) -> Result<Posting, ListingError> {
    let id = element
        .value()
        .attr(POSTING_ID_ATTR)
        .ok_or(ListingError::MalformedPosting {
            index,
            reason: "missing data-qa-posting-id attribute",
        })?;

    let title = element
        .select(&selectors.title)
        .next()
        .map(|heading| heading.text().collect::<String>())
        .ok_or(ListingError::MalformedPosting {
            index,
            reason: "missing h5 title heading",
        })?;

    let location = element
        .select(&selectors.location)
        .next()
        .map(|span| span.text().collect::<String>())
        .unwrap_or_else(|| MISSING_LOCATION.to_string());

    Ok(Posting::new(title, id, location))
}
