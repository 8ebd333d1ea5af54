//! User-Agent string for page and resource requests.

/// Project URL sent in the User-Agent.
const PROJECT_UA_URL: &str = "https://github.com/fierce/page-loader";

/// Default User-Agent for every request the loader sends.
#[must_use]
pub(crate) fn default_user_agent() -> String {
    let version = env!("CARGO_PKG_VERSION");
    format!("page-loader/{version} (+{PROJECT_UA_URL})")
}
