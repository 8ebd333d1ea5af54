//! Classification of references found in page markup.

use url::Url;

/// Where a reference points relative to the page that contains it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Classification {
    /// Resolves to the page's own path (canonical links, self anchors).
    SelfReference,
    /// Same origin as the page and not the page itself; downloaded.
    Local,
    /// Different origin; left untouched.
    External,
}

/// A reference resolved against the page URL.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedReference {
    /// The absolute URL the reference resolves to.
    pub absolute_url: Url,
    /// How the reference relates to the page.
    pub classification: Classification,
}

/// Resolves `raw` against `page_url` and classifies it.
///
/// The path check runs first: a reference whose path equals the page's own
/// path (ignoring one trailing `/`) is [`Classification::SelfReference`]
/// whatever its origin.
///
/// # Errors
///
/// Returns the URL parse error when `raw` cannot be resolved. Callers skip
/// such references.
pub fn classify(raw: &str, page_url: &Url) -> Result<ResolvedReference, url::ParseError> {
    let absolute_url = page_url.join(raw.trim())?;

    let classification = if comparable_path(&absolute_url) == comparable_path(page_url) {
        Classification::SelfReference
    } else if absolute_url.origin() == page_url.origin() {
        Classification::Local
    } else {
        Classification::External
    };

    Ok(ResolvedReference {
        absolute_url,
        classification,
    })
}

fn comparable_path(url: &Url) -> &str {
    let path = url.path();
    path.strip_suffix('/').unwrap_or(path)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn page() -> Url {
        Url::parse("http://codica.la/cursos").unwrap()
    }

    #[test]
    fn test_relative_reference_is_local() {
        let resolved = classify("/assets/professions/nodejs.png", &page()).unwrap();
        assert_eq!(resolved.classification, Classification::Local);
        assert_eq!(
            resolved.absolute_url.as_str(),
            "http://codica.la/assets/professions/nodejs.png"
        );
    }

    #[test]
    fn test_document_relative_reference_resolves_against_page() {
        let resolved = classify("assets/app.css", &page()).unwrap();
        assert_eq!(resolved.absolute_url.as_str(), "http://codica.la/assets/app.css");
        assert_eq!(resolved.classification, Classification::Local);
    }

    #[test]
    fn test_absolute_same_origin_is_local() {
        let resolved = classify("http://codica.la/packs/js/runtime.js", &page()).unwrap();
        assert_eq!(resolved.classification, Classification::Local);
    }

    #[test]
    fn test_other_host_is_external() {
        let resolved = classify("https://cdn2.codica.la/assets/menu.css", &page()).unwrap();
        assert_eq!(resolved.classification, Classification::External);
    }

    #[test]
    fn test_other_scheme_or_port_is_external() {
        let https = classify("https://codica.la/assets/a.css", &page()).unwrap();
        assert_eq!(https.classification, Classification::External);
        let port = classify("http://codica.la:8080/assets/a.css", &page()).unwrap();
        assert_eq!(port.classification, Classification::External);
    }

    #[test]
    fn test_protocol_relative_reference_is_external() {
        let resolved = classify("//cdn.example.com/lib.js", &page()).unwrap();
        assert_eq!(resolved.classification, Classification::External);
    }

    #[test]
    fn test_page_path_is_self() {
        let resolved = classify("/cursos", &page()).unwrap();
        assert_eq!(resolved.classification, Classification::SelfReference);
    }

    #[test]
    fn test_page_path_with_trailing_slash_is_self() {
        let resolved = classify("http://codica.la/cursos/", &page()).unwrap();
        assert_eq!(resolved.classification, Classification::SelfReference);
    }

    #[test]
    fn test_page_path_on_other_origin_is_self() {
        let resolved = classify("https://mirror.example.com/cursos", &page()).unwrap();
        assert_eq!(resolved.classification, Classification::SelfReference);
    }

    #[test]
    fn test_page_path_with_query_is_self() {
        let resolved = classify("/cursos?utm=1#top", &page()).unwrap();
        assert_eq!(resolved.classification, Classification::SelfReference);
    }

    #[test]
    fn test_root_page_matches_root_reference() {
        let root = Url::parse("http://codica.la/").unwrap();
        let resolved = classify("/", &root).unwrap();
        assert_eq!(resolved.classification, Classification::SelfReference);
        let asset = classify("/logo.svg", &root).unwrap();
        assert_eq!(asset.classification, Classification::Local);
    }

    #[test]
    fn test_data_uri_is_external() {
        let resolved = classify("data:image/png;base64,iVBORw0KGgo=", &page()).unwrap();
        assert_eq!(resolved.classification, Classification::External);
    }

    #[test]
    fn test_malformed_reference_is_unresolvable() {
        assert!(classify("http://[not-an-ip/", &page()).is_err());
    }
}
