#[derive(Debug, thiserror::Error)]
pub enum CrawlerError {
    #[error("Failed to fetch {url}")]
    FetchError {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("Failed to build HTTP client")]
    HttpClient(#[source] reqwest::Error),

    #[error("Page {page}: missing {element}")]
    ParseError { page: u32, element: &'static str },

    #[error("Price {0:?} is not a number")]
    TypeConversionError(String),

    #[error("No terminal page after {0} pages")]
    PageLimitExceeded(u32),

    #[error("Invalid url: {0}")]
    InvalidUrl(String),

    #[error("Database error")]
    DatabaseError(#[from] sqlx::error::Error),

    #[error("IO error")]
    Io(#[from] std::io::Error),

    #[error("CSV error")]
    Csv(#[from] csv::Error),

    #[error("Spreadsheet error")]
    Xlsx(#[from] rust_xlsxwriter::XlsxError),

    #[error("Chart error: {0}")]
    Chart(String),
}
