pub mod tdlr;

pub use tdlr::TdlrScraper;
