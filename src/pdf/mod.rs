//! PDF manipulation module

pub mod merge;
pub mod metadata;
pub mod overlay;
pub mod pages;
pub mod stamp;
pub mod write;

// Re-export commonly used items
pub use merge::{bookmark_label, bookmark_title, merge_pdfs, Bookmark, MergeOptions, MergeSummary, TEMP_PREFIX};
pub use metadata::{count_pages, page_text_runs, read_bookmarks};
pub use overlay::{create_footer_overlay, footer_text};
pub use stamp::{overlay_page, stamp_pdf, StampOptions, StampSummary};
