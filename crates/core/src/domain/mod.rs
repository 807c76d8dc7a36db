pub mod company;
pub mod holding;
pub mod insight;
