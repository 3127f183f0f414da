pub mod capital;
pub mod sensitivity;
pub mod valuation;
