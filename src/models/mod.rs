//! Data models for captured requests and the inspection view.
//!
//! This module contains the records produced by capture, the multi-valued
//! parameter map shared by every parameter group, and the page projection
//! served by the inspection endpoint.

pub mod page;
pub mod params;
pub mod snapshot;

pub use page::PageView;
pub use params::ParamMap;
pub use snapshot::{MultipartForm, RequestSnapshot, UploadedFile};
