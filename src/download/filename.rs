//! Deterministic, filesystem-safe names derived from URLs.
//!
//! Every name is a pure function of the URL: host (with explicit port) and
//! path are concatenated, one leading and one trailing `/` are dropped, and
//! every character that is not an ASCII letter or digit becomes `-`.
//!
//! The mapping is lossy. `a.b` and `a-b` normalize to the same name, and the
//! query string never participates, so such URLs share a file.

use url::Url;

/// Suffix appended to a page's base name to form its resource directory.
const RESOURCE_DIR_SUFFIX: &str = "_files";

/// Extension of the saved page file.
const PAGE_EXTENSION: &str = ".html";

/// Extensions whose content is text; a UTF-8 byte-order mark is stripped from these.
const TEXT_EXTENSIONS: [&str; 6] = ["css", "js", "mjs", "html", "htm", "xhtml"];

/// Normalizes a URL into a filesystem-safe base name.
///
/// `http://codica.la/cursos` becomes `codica-la-cursos`.
#[must_use]
pub fn normalize(url: &Url) -> String {
    let host = match (url.host_str(), url.port()) {
        (Some(host), Some(port)) => format!("{host}:{port}"),
        (Some(host), None) => host.to_string(),
        (None, _) => String::new(),
    };
    let joined = format!("{host}{}", url.path());
    let trimmed = joined.strip_prefix('/').unwrap_or(&joined);
    let trimmed = trimmed.strip_suffix('/').unwrap_or(trimmed);
    trimmed.chars().map(hyphenate).collect()
}

/// File name of the saved page: `<normalized>.html`.
#[must_use]
pub fn page_file_name(page_url: &Url) -> String {
    format!("{}{PAGE_EXTENSION}", normalize(page_url))
}

/// Name of the directory holding a page's resources: `<normalized>_files`.
///
/// Always derived from the page URL, never from a resource URL.
#[must_use]
pub fn resource_dir_name(page_url: &Url) -> String {
    format!("{}{RESOURCE_DIR_SUFFIX}", normalize(page_url))
}

/// File name for a downloaded resource.
///
/// The normalized URL already ends in the hyphenated extension
/// (`...-nodejs-png`); that tail and the hyphen before it are replaced by the
/// real extension taken from the URL path (`...-nodejs.png`). Resources
/// without an extension keep the plain normalized name.
///
/// The extension is copied from the percent-encoded path as is, so escapes
/// survive there (`/%C3%BC.p%20ng` ends in `.p%20ng`).
#[must_use]
pub fn resource_file_name(resource_url: &Url) -> String {
    let extension = path_extension(resource_url.path());
    let base = normalize(resource_url);

    let hyphenated: String = extension.chars().map(hyphenate).collect();
    let stem = base.strip_suffix(hyphenated.as_str()).unwrap_or(&base);
    let stem = stem.strip_suffix('-').unwrap_or(stem);

    format!("{stem}{extension}")
}

/// Returns true when a byte-order mark should be stripped from this file.
#[must_use]
pub(crate) fn is_text_resource(file_name: &str) -> bool {
    let extension = path_extension(file_name);
    extension.len() > 1
        && TEXT_EXTENSIONS
            .iter()
            .any(|known| extension[1..].eq_ignore_ascii_case(known))
}

/// Extension of the last path segment, including the dot.
///
/// Empty when the segment has no dot, only a leading dot (`.htaccess`), or
/// ends with a dot. A single trailing `/` is ignored, matching [`normalize`].
pub(crate) fn path_extension(path: &str) -> &str {
    let path = path.strip_suffix('/').unwrap_or(path);
    let segment = path.rsplit('/').next().unwrap_or(path);
    match segment.rfind('.') {
        Some(index) if index > 0 && index + 1 < segment.len() => &segment[index..],
        _ => "",
    }
}

fn hyphenate(ch: char) -> char {
    if ch.is_ascii_alphanumeric() { ch } else { '-' }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn url(raw: &str) -> Url {
        Url::parse(raw).unwrap()
    }

    #[test]
    fn test_normalize_host_and_path() {
        assert_eq!(normalize(&url("http://codica.la/cursos")), "codica-la-cursos");
    }

    #[test]
    fn test_normalize_drops_trailing_slash() {
        assert_eq!(normalize(&url("https://codica.la/cursos/")), "codica-la-cursos");
        assert_eq!(normalize(&url("https://codica.la/")), "codica-la");
    }

    #[test]
    fn test_normalize_includes_explicit_port() {
        assert_eq!(
            normalize(&url("http://127.0.0.1:8080/page")),
            "127-0-0-1-8080-page"
        );
    }

    #[test]
    fn test_normalize_ignores_query_and_fragment() {
        assert_eq!(
            normalize(&url("http://codica.la/a?b=c#d")),
            normalize(&url("http://codica.la/a"))
        );
    }

    #[test]
    fn test_normalize_known_collision_is_accepted() {
        assert_eq!(
            normalize(&url("http://codica.la/a.b")),
            normalize(&url("http://codica.la/a-b"))
        );
    }

    #[test]
    fn test_page_file_name() {
        assert_eq!(
            page_file_name(&url("http://codica.la/cursos")),
            "codica-la-cursos.html"
        );
    }

    #[test]
    fn test_page_file_name_is_safe_and_stable() {
        for raw in [
            "http://codica.la/cursos",
            "https://sub.example.com:8443/a/b%20c/~d?x=1",
            "http://[::1]:3000/",
            "https://example.com/ünï/çødé",
        ] {
            let u = url(raw);
            let first = page_file_name(&u);
            assert_eq!(first, page_file_name(&u), "must be deterministic for {raw}");
            assert!(first.ends_with(".html"));
            assert!(
                first
                    .chars()
                    .all(|c| c.is_ascii_alphanumeric() || matches!(c, '.' | '_' | '-')),
                "unsafe character in {first}"
            );
        }
    }

    #[test]
    fn test_resource_dir_name() {
        assert_eq!(
            resource_dir_name(&url("http://codica.la/cursos")),
            "codica-la-cursos_files"
        );
    }

    #[test]
    fn test_resource_file_name_keeps_extension() {
        assert_eq!(
            resource_file_name(&url("http://codica.la/assets/professions/nodejs.png")),
            "codica-la-assets-professions-nodejs.png"
        );
        assert_eq!(
            resource_file_name(&url("http://codica.la/assets/application.css")),
            "codica-la-assets-application.css"
        );
        assert_eq!(
            resource_file_name(&url("http://codica.la/packs/js/runtime.js")),
            "codica-la-packs-js-runtime.js"
        );
    }

    #[test]
    fn test_resource_file_name_ignores_query_string() {
        assert_eq!(
            resource_file_name(&url("http://codica.la/assets/app.css?v=42")),
            "codica-la-assets-app.css"
        );
    }

    #[test]
    fn test_resource_file_name_keeps_percent_escapes_in_extension() {
        assert_eq!(
            resource_file_name(&url("http://codica.la/%C3%BC.p%20ng")),
            "codica-la--C3-BC.p%20ng"
        );
    }

    #[test]
    fn test_resource_file_name_without_extension() {
        assert_eq!(
            resource_file_name(&url("http://codica.la/api/data")),
            "codica-la-api-data"
        );
        assert_eq!(
            resource_file_name(&url("http://codica.la/courses/")),
            "codica-la-courses"
        );
    }

    #[test]
    fn test_resource_file_name_preserves_extension_case() {
        assert_eq!(
            resource_file_name(&url("http://codica.la/img/Photo.JPG")),
            "codica-la-img-Photo.JPG"
        );
    }

    #[test]
    fn test_path_extension() {
        assert_eq!(path_extension("/assets/app.css"), ".css");
        assert_eq!(path_extension("/archive.tar.gz"), ".gz");
        assert_eq!(path_extension("/.htaccess"), "");
        assert_eq!(path_extension("/dir.d/file"), "");
        assert_eq!(path_extension("/file."), "");
        assert_eq!(path_extension("/style.css/"), ".css");
        assert_eq!(path_extension(""), "");
    }

    #[test]
    fn test_is_text_resource() {
        assert!(is_text_resource("codica-la-assets-application.css"));
        assert!(is_text_resource("codica-la-packs-js-runtime.JS"));
        assert!(is_text_resource("codica-la-blog.html"));
        assert!(!is_text_resource("codica-la-assets-professions-nodejs.png"));
        assert!(!is_text_resource("codica-la-api-data"));
    }
}
