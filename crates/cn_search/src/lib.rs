pub mod serper;
pub mod tools;
pub mod web;

pub use serper::SerperSearch;
pub use tools::{company_news_tools, SearchTool, Tool};
pub use web::WebSearch;
