// src/constants.rs
//! Domain constants that define the operational boundaries of the system.
//!
//! Each constant is named for the domain concept it constrains, not its
//! technical role. Reading these constants should tell you the story
//! of how a harvest runs: where it talks to, how much it asks for at once,
//! where it writes.

// ---------------------------------------------------------------------------
// Remote wiki
// ---------------------------------------------------------------------------

/// The MediaWiki action API queried for memberships and attributes.
pub const WIKI_API_URL: &str = "https://en.wikipedia.org/w/api.php";

/// Prefix of canonical article URLs; the title is appended.
pub const WIKI_ARTICLE_URL: &str = "https://en.wikipedia.org/wiki/";

/// Namespace prefix that marks a category title.
pub const CATEGORY_PREFIX: &str = "Category:";

/// Namespace id of plain content pages (articles).
pub const ARTICLE_NAMESPACE: i32 = 0;

/// How many category members the API returns per page of results.
///
/// 500 is the maximum for anonymous clients.
pub const CATEGORY_MEMBERS_PAGE_SIZE: u32 = 500;

/// Width in pixels of the thumbnail requested for each page image.
pub const THUMBNAIL_WIDTH: u32 = 1000;

/// Sent with every request; Wikimedia rejects anonymous user agents.
pub const USER_AGENT: &str = concat!(
    "wikiharvest/",
    env!("CARGO_PKG_VERSION"),
    " (category harvester; https://github.com/wikiharvest/wikiharvest)"
);

// ---------------------------------------------------------------------------
// Enrichment boundaries
// ---------------------------------------------------------------------------

/// Titles combined into one attribute query.
pub const DEFAULT_BATCH_SIZE: usize = 20;

/// The API accepts at most 50 titles per query for anonymous clients.
pub const MAX_BATCH_SIZE: usize = 50;

/// Days of page-view history summed into the view count.
///
/// The pageviews module serves at most 60 days.
pub const DEFAULT_PAGEVIEW_DAYS: u32 = 60;
pub const MAX_PAGEVIEW_DAYS: u32 = 60;

/// Upper bound on concurrent requests, whatever the user asks for.
pub const MAX_CONCURRENCY: usize = 32;

/// Per-request timeout in seconds.
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;

// ---------------------------------------------------------------------------
// Local storage
// ---------------------------------------------------------------------------

/// Term harvested when none is given on the command line.
pub const DEFAULT_TERM: &str = "Office suites for Linux";

/// SQLite database the records are written to.
pub const DEFAULT_DATABASE_PATH: &str = "wiki-scraping.db";

/// Directory downloaded images are written to.
pub const DEFAULT_IMAGES_DIR: &str = "Images";

/// Longest image filename written as-is.
pub const MAX_IMAGE_FILENAME_CHARS: usize = 250;

/// Characters kept from the front of an over-long filename.
pub const TRUNCATED_FILENAME_PREFIX_CHARS: usize = 50;

/// Characters kept from the end of an over-long filename (the extension).
pub const TRUNCATED_FILENAME_SUFFIX_CHARS: usize = 4;

// ---------------------------------------------------------------------------
// Error display
// ---------------------------------------------------------------------------

/// Maximum characters shown when previewing malformed response bodies.
pub const ERROR_BODY_PREVIEW_LENGTH: usize = 200;
