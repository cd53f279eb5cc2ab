mod blocking_client;
mod context;
mod error;
mod remote;

pub use blocking_client::HarborClient;
pub use context::{Credentials, RequestContext};
pub use error::{ApiError, RemoteFailure, RemoteResult, Result};
pub use remote::GcRemote;
