pub mod validation;
pub mod verdict;
