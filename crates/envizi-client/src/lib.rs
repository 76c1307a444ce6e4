//! Client side of the emissions API as used by the spreadsheet add-in.
//!
//! - [`ApiCategory`]: the logical categories users type into formulas
//! - [`MetadataService`]: types / area / units endpoints, with an HTTP
//!   implementation in [`HttpMetadataClient`]
//! - [`SessionManager`]: explicit login/logout lifecycle handing out the
//!   authenticated client

mod category;
pub mod http;
mod schema;
pub mod service;
pub mod session;

pub use category::{validate_category, ApiCategory, InvalidCategory};
pub use http::{Credentials, HttpClientConfig, HttpMetadataClient};
pub use schema::{AreaLocation, AreaResponse, TypesResponse, UnitsResponse};
pub use service::{ClientError, MetadataService};
pub use session::{ClientFactory, HttpClientFactory, SessionError, SessionManager, SessionProvider};
