pub mod config;
pub mod error;
pub mod history;
pub mod http;
pub mod request;
pub mod session;
pub mod types;

pub use config::AppConfig;
pub use error::{TransportError, ValidationError};
pub use history::History;
pub use http::{Dispatcher, RawResponse, ReqwestTransport, Transport};
pub use request::{format_headers, parse_headers, RequestForm};
pub use session::{SendOutcome, Session};
pub use types::{EntryId, HistoryEntry, HttpMethod, Request, Response};
