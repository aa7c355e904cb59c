// Header pass-through helpers
//
// Everything is copied verbatim except the framing headers the HTTP layer
// recomputes for the re-serialized body.

use axum::http::{header, HeaderMap, HeaderName};

fn is_framing(name: &HeaderName) -> bool {
    *name == header::CONTENT_LENGTH || *name == header::TRANSFER_ENCODING
}

/// Inbound headers to put on the outbound forward request.
pub fn forwardable_request_headers(inbound: &HeaderMap) -> HeaderMap {
    filter_headers(inbound, |name| *name == header::HOST || is_framing(name))
}

/// Upstream headers to put on the response returned to the client.
pub fn relayable_response_headers(upstream: &HeaderMap) -> HeaderMap {
    filter_headers(upstream, is_framing)
}

fn filter_headers(source: &HeaderMap, skip: impl Fn(&HeaderName) -> bool) -> HeaderMap {
    let mut out = HeaderMap::with_capacity(source.len());
    for (name, value) in source.iter() {
        if skip(name) {
            continue;
        }
        // append keeps every value of repeated headers
        out.append(name.clone(), value.clone());
    }
    out
}
