//! Integration tests for galsync-drive
//!
//! Uses wiremock to simulate the Drive v3 API and the OAuth2 token
//! endpoint, and verifies listing, pagination, probes, downloads, retry and
//! session establishment end to end.

mod common;

mod test_download;
mod test_listing;
mod test_retry;
mod test_session;
