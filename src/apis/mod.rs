pub mod approval;
pub mod wiki;
pub mod baike;
pub mod bitable;

// Re-export all APIs
pub use approval::ApprovalApi;
pub use wiki::WikiApi;
pub use baike::BaikeApi;
pub use bitable::BitableApi;
