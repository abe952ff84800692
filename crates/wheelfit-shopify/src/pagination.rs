//! Cursor pagination via the Admin API's `Link` response header.
//!
//! Each listing response may carry a `Link` header with URLs for adjacent
//! pages; the cursor for the next page is the `page_info` query parameter of
//! the `rel="next"` entry:
//!
//! ```text
//! <https://shop.myshopify.com/admin/api/2024-01/products.json?limit=250&page_info=PREV>; rel="previous",
//! <https://shop.myshopify.com/admin/api/2024-01/products.json?limit=250&page_info=NEXT>; rel="next"
//! ```

/// Pulls the next-page `page_info` cursor out of a `Link` header value.
///
/// Returns `None` when the header is absent, when no `rel="next"` entry
/// exists (last page), or when the next URL carries no `page_info` parameter.
#[must_use]
pub fn next_page_cursor(link_header: Option<&str>) -> Option<String> {
    link_header?
        .split(',')
        .map(str::trim)
        .find(|entry| entry.contains(r#"rel="next""#))
        .and_then(bracketed_url)
        .and_then(|url| query_value(url, "page_info"))
        .map(str::to_owned)
}

/// The URL between `<` and `>` in a single `Link` entry.
fn bracketed_url(entry: &str) -> Option<&str> {
    let inner = entry.strip_prefix('<').or_else(|| {
        let at = entry.find('<')?;
        Some(&entry[at + 1..])
    })?;
    inner.split('>').next().filter(|url| !url.is_empty())
}

/// The raw value of `param` in the URL's query string. No percent-decoding:
/// Shopify cursors are base64url and never need it.
fn query_value<'a>(url: &'a str, param: &str) -> Option<&'a str> {
    let (_, query) = url.split_once('?')?;
    query
        .split('&')
        .filter_map(|pair| pair.split_once('='))
        .find(|(key, _)| *key == param)
        .map(|(_, value)| value.split('#').next().unwrap_or(value))
        .filter(|value| !value.is_empty())
}
