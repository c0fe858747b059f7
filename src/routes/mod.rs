pub mod brands;
pub mod update_brand;
pub mod upload;
