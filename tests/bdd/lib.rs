//! Feature suite for the restbdd harness.
//!
//! The suite runs against a local stand-in for the public reqres.in API so it
//! needs no network. Set `BDD_LIVE=1` to run it against `API_BASE_URI` instead.
//!
//! ```bash
//! cargo test --test bdd
//! ```

pub mod stub;

pub use stub::ReqresStub;
