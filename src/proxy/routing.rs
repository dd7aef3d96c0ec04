//! Path classification for incoming requests.
//!
//! [`classify`] splits traffic three ways: static files, a known API
//! prefix (with the upstream it maps to and the trailing path), or an
//! API path nobody serves. Aliases (`metro/`, `openai/`) share an
//! upstream with their primary segment.

use crate::config::model::UpstreamKind;

const API_PREFIX: &str = "/api/";

const SEGMENTS: &[(&str, UpstreamKind)] = &[
    ("swiftly/", UpstreamKind::Swiftly),
    ("weather/", UpstreamKind::Weather),
    ("metro/", UpstreamKind::Weather),
    ("tomtom/", UpstreamKind::Tomtom),
    ("openai/", UpstreamKind::Tomtom),
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ApiRoute<'a> {
    pub upstream: UpstreamKind,
    /// Segment as the client sent it, without the trailing slash.
    pub segment: &'a str,
    /// Everything after `/api/<segment>/`, never starting with `/`.
    pub rest: &'a str,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Dispatch<'a> {
    Static,
    Api(ApiRoute<'a>),
    /// Under `/api/` but no upstream claims it; holds the path after `/api/`.
    UnknownApi(&'a str),
}

#[must_use]
pub fn classify(path: &str) -> Dispatch<'_> {
    let Some(api_path) = path.strip_prefix(API_PREFIX) else {
        return Dispatch::Static;
    };

    SEGMENTS
        .iter()
        .find_map(|(segment, upstream)| {
            api_path.strip_prefix(segment).map(|rest| {
                Dispatch::Api(ApiRoute {
                    upstream: *upstream,
                    segment: &api_path[..segment.len() - 1],
                    rest,
                })
            })
        })
        .unwrap_or(Dispatch::UnknownApi(api_path))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn api(path: &str) -> ApiRoute<'_> {
        match classify(path) {
            Dispatch::Api(route) => route,
            other => panic!("expected API route for {path}, got {other:?}"),
        }
    }

    #[test]
    fn non_api_paths_are_static() {
        assert_eq!(classify("/"), Dispatch::Static);
        assert_eq!(classify("/index.html"), Dispatch::Static);
        assert_eq!(classify("/api"), Dispatch::Static);
        assert_eq!(classify("/apis/swiftly/x"), Dispatch::Static);
    }

    #[test]
    fn swiftly_keeps_trailing_path() {
        let route = api("/api/swiftly/real-time/lametro/gtfs-rt-vehicle-positions");
        assert_eq!(route.upstream, UpstreamKind::Swiftly);
        assert_eq!(route.segment, "swiftly");
        assert_eq!(route.rest, "real-time/lametro/gtfs-rt-vehicle-positions");
    }

    #[test]
    fn aliases_share_upstreams() {
        assert_eq!(api("/api/metro/weather").upstream, UpstreamKind::Weather);
        assert_eq!(api("/api/metro/weather").segment, "metro");
        assert_eq!(api("/api/openai/flow").upstream, UpstreamKind::Tomtom);
        assert_eq!(api("/api/tomtom/flow").upstream, UpstreamKind::Tomtom);
    }

    #[test]
    fn empty_rest_is_still_a_route() {
        let route = api("/api/weather/");
        assert_eq!(route.rest, "");
    }

    #[test]
    fn unknown_segments_are_rejected() {
        assert_eq!(classify("/api/transitland/stops"), Dispatch::UnknownApi("transitland/stops"));
        assert_eq!(classify("/api/"), Dispatch::UnknownApi(""));
        // Segment must be followed by a slash.
        assert_eq!(classify("/api/swiftly"), Dispatch::UnknownApi("swiftly"));
        assert_eq!(classify("/api/swiftlyx/a"), Dispatch::UnknownApi("swiftlyx/a"));
    }
}
