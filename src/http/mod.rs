//! HTTP protocol layer module
//!
//! Response building, MIME lookup and cache policy, decoupled from the
//! filesystem logic in the handler.

pub mod cache;
pub mod mime;
pub mod response;

// Re-export commonly used builders
pub use response::{
    build_403_response, build_404_response, build_500_response, build_redirect_response,
    ResponseBody,
};
