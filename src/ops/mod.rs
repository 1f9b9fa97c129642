pub mod filter;
pub mod group;
pub mod sort;
pub mod view;
