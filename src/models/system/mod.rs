pub mod responses;

pub use responses::{SystemInfoResponse, UploadPolicyResponse};
