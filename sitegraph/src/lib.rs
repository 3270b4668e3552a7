// Include handlers module directly from handlers.rs
#[path = "handlers.rs"]
pub mod handlers;

// Re-export commonly used handler functions for convenience
pub use handlers::{
    classify_hrefs,
    expand_output_path,
    format_elapsed,
    load_urls_from_file,
    load_urls_from_source,
    parse_url_line,
    resolve_report_path,
};

// Re-export crawl functionality from sitegraph-core
pub use sitegraph_core::crawl::{
    execute_crawl, extract_url_path, CrawlOptions, CrawlProgressCallback,
};
