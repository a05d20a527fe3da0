// src/api/report.rs
// =============================================================================
// Builds the link to the external phishing-report page.
//
// Reporting is fire-and-forget: we compose the page URL with the checked
// URL as an encoded query parameter and hand it to the presentation layer
// to open or print. No response is ever consumed.
// =============================================================================

use url::Url;

// Google Safe Browsing's public report form; takes the suspect URL in the
// "url" query parameter.
const REPORT_PAGE: &str = "https://safebrowsing.google.com/safebrowsing/report_phish/";

/// The report page for a checked URL, with the URL percent-encoded into
/// the query string.
pub fn report_page_url(checked_url: &str) -> Url {
    // REPORT_PAGE is a constant known-good URL, so this cannot fail
    Url::parse_with_params(REPORT_PAGE, &[("url", checked_url)])
        .expect("report page URL is valid")
}
