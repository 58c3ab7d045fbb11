// crates/mycel-github/src/pagination.rs
//
// RFC 8288 `Link` header handling for GitHub list endpoints.

/// Extract the `rel="next"` target from a `Link` header value.
///
/// Returns `None` on the last page or if the header is malformed.
pub fn next_page_url(link_header: &str) -> Option<String> {
    link_header.split(',').find_map(|part| {
        let mut sections = part.split(';');
        let target = sections.next()?.trim();
        let is_next = sections.any(|param| {
            let param = param.trim();
            param == "rel=\"next\"" || param == "rel=next"
        });
        if !is_next {
            return None;
        }
        target
            .strip_prefix('<')
            .and_then(|t| t.strip_suffix('>'))
            .map(str::to_string)
    })
}
