pub mod error;
pub mod types;

pub use error::{Error, Result};
pub use types::{
    Article, ArticleCollection, CompanyQuery, NewsReport, NewsResponse, MAX_ARTICLES,
    NO_DESCRIPTION, NO_TITLE, NO_URL,
};
