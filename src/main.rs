use books_catalog_crawler::{
    books::{self, BooksCrawler, BooksData},
    config::Args,
    report, HttpSource,
};
use clap::Parser;
use tracing::{debug, info};
use tracing_error::ErrorLayer;
use tracing_subscriber::prelude::*;

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer())
        .with(
            tracing_subscriber::EnvFilter::try_from_env("LOG_LEVEL").unwrap_or_else(|_| {
                "info,html5ever=error,selectors=error,hyper=warn,reqwest=info,sqlx=warn".into()
            }),
        )
        .with(ErrorLayer::default())
        .init();

    let args = Args::parse();

    let crawler = BooksCrawler::new(&args.url_template)?;
    let source = HttpSource::new(args.timeout(), args.request_delay())?;

    let dataset = match args.checkpoint.as_deref() {
        Some(name) => {
            let path = args.checkpoint_path(name);
            let storage = BooksData::new(&path, name).await?;
            storage.reset().await?;
            info!("Checkpointing to {}", path.display());
            books::crawl_catalog(&crawler, &source, Some(&storage), args.max_pages).await?
        }
        None => {
            books::crawl_catalog::<_, BooksData>(&crawler, &source, None, args.max_pages)
                .await?
        }
    };
    info!("Crawled {} books", dataset.len());
    if let Some(first) = dataset.iter().next() {
        debug!("First book\n{}", first);
    }

    let summary = report::summarize(&dataset, &args.report_options())?;
    println!("{}", summary);

    Ok(())
}
