pub mod extract;
pub mod images;
pub mod posts;

pub use extract::extract_json;
pub use images::ImageGenerator;
pub use posts::PostGenerator;
