use clap::ArgMatches;
use colored::Colorize;
use sitegraph_core::report::{
    ReportFormat, gather_report_data, render_report, report_file_name, save_report,
};
use sitegraph_scanner::{CrawlStatus, LinkClassifier, PageAddress, PolitenessDelay};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};
use url::Url;

// Helper functions for crawl handler

/// Load URLs from either a file or the `--url` arguments
pub fn load_urls_from_source(
    urls: &[Url],
    hosts_file: Option<&PathBuf>,
) -> Result<Vec<String>, String> {
    if let Some(hosts_file_path) = hosts_file {
        load_urls_from_file(hosts_file_path)
    } else if !urls.is_empty() {
        Ok(urls.iter().map(|u| u.as_str().to_string()).collect())
    } else {
        Err("Either --url or --hosts-file must be provided".to_string())
    }
}

/// Load and parse URLs from a file, skipping blank lines and `#` comments
pub fn load_urls_from_file(path: &Path) -> Result<Vec<String>, String> {
    let content = fs::read_to_string(path)
        .map_err(|e| format!("Failed to read hosts file {}: {}", path.display(), e))?;

    let urls: Vec<String> = content
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .filter_map(parse_url_line)
        .collect();

    if urls.is_empty() {
        return Err(format!("No valid URLs found in {}", path.display()));
    }

    Ok(urls)
}

/// Parse a single line as a URL, trying to add http:// if needed
pub fn parse_url_line(line: &str) -> Option<String> {
    if let Ok(url) = Url::parse(line)
        && url.has_host()
    {
        return Some(line.to_string());
    }

    let with_scheme = format!("http://{}", line);
    if let Ok(url) = Url::parse(&with_scheme)
        && url.has_host()
        && !line.contains(char::is_whitespace)
    {
        return Some(with_scheme);
    }

    warn!("Skipping invalid URL '{}'", line);
    None
}

/// Expand `~` in a user-supplied output path
pub fn expand_output_path(path: &Path) -> PathBuf {
    let raw = path.to_string_lossy();
    PathBuf::from(shellexpand::tilde(raw.as_ref()).as_ref())
}

/// Where the report goes: the given file, or a timestamped file when the
/// path names an existing directory.
pub fn resolve_report_path(path: &Path, format: ReportFormat) -> PathBuf {
    let path = expand_output_path(path);
    if path.is_dir() {
        path.join(report_file_name(format, &chrono::Local::now()))
    } else {
        path
    }
}

pub fn format_elapsed(elapsed: Duration) -> String {
    format!("{:.2}s", elapsed.as_secs_f64())
}

// Re-export crawl types and functions from sitegraph-core
pub use sitegraph_core::crawl::{
    CrawlOptions, CrawlProgressCallback, execute_crawl, extract_url_path,
};

/// Build crawl options from the `crawl` subcommand's arguments
pub fn crawl_options_from_args(
    sub_matches: &ArgMatches,
    urls: Vec<String>,
    show_progress_bars: bool,
) -> CrawlOptions {
    let mut options = CrawlOptions {
        urls,
        show_progress_bars,
        ..Default::default()
    };

    if let Some(ms) = sub_matches.get_one::<u64>("timeout-ms") {
        options.page_timeout = Duration::from_millis(*ms);
    }
    options.max_pages = sub_matches.get_one::<usize>("max-pages").copied();
    options.strict_host = sub_matches.get_flag("strict-host");
    if let Some(selector) = sub_matches.get_one::<String>("ready-selector") {
        options.ready_selector = selector.clone();
    }
    if let Some(user_agent) = sub_matches.get_one::<String>("user-agent") {
        options.user_agent = user_agent.clone();
    }
    if let Some(ms) = sub_matches.get_one::<u64>("delay-ms") {
        let jitter = sub_matches.get_one::<u64>("delay-jitter-ms").copied().unwrap_or(0);
        options.delay = Some(PolitenessDelay::new(
            Duration::from_millis(*ms),
            Duration::from_millis(jitter),
        ));
    }

    options
}

pub async fn handle_crawl(sub_matches: &ArgMatches, quiet: bool) {
    let started = Instant::now();
    let url_args: Vec<Url> = sub_matches
        .get_many::<Url>("url")
        .map(|values| values.cloned().collect())
        .unwrap_or_default();
    let hosts_file = sub_matches.get_one::<PathBuf>("hosts-file");
    let output = sub_matches.get_one::<PathBuf>("output");
    let format = sub_matches
        .get_one::<String>("format")
        .and_then(|f| ReportFormat::from_str(f))
        .unwrap_or(ReportFormat::Text);

    let urls = match load_urls_from_source(&url_args, hosts_file) {
        Ok(urls) => urls,
        Err(e) => {
            eprintln!("{} {}", "✗".red().bold(), e);
            std::process::exit(1);
        }
    };

    let options = crawl_options_from_args(sub_matches, urls, !quiet);

    if !quiet {
        eprintln!("\n{} Crawling {} seed(s)", "→".blue(), options.urls.len());
        eprintln!("Page timeout: {}ms", options.page_timeout.as_millis());
        match options.max_pages {
            Some(n) => eprintln!("Max pages: {}", n),
            None => eprintln!("Max pages: unlimited"),
        }
        if let Some(delay) = &options.delay {
            eprintln!(
                "Delay: {}ms ± {}ms",
                delay.median.as_millis(),
                delay.jitter.as_millis()
            );
        }
        eprintln!(
            "Host match: {}\n",
            if options.strict_host { "strict" } else { "www-insensitive" }
        );
    }

    // Ctrl-C stops the crawl between pages; whatever was mapped is still reported
    let cancellation = CancellationToken::new();
    let signal_token = cancellation.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            info!("interrupt received, stopping crawl");
            signal_token.cancel();
        }
    });

    let progress_callback: CrawlProgressCallback = Arc::new(|msg: String| {
        eprintln!("{}", msg);
    });

    let states = match execute_crawl(options, Some(progress_callback), cancellation).await {
        Ok(states) => states,
        Err(e) => {
            eprintln!("{} Crawl failed: {}", "✗".red().bold(), e);
            std::process::exit(1);
        }
    };

    if states.is_empty() {
        eprintln!("{} No host could be crawled", "✗".red().bold());
        std::process::exit(1);
    }

    let interrupted = states.iter().any(|s| s.status == CrawlStatus::Interrupted);
    if !quiet {
        if interrupted {
            eprintln!("\n{} Crawl interrupted, reporting partial results\n", "⚠".yellow().bold());
        } else {
            eprintln!("\n{} Crawl complete!\n", "✓".green().bold());
        }
    }

    let data = gather_report_data(&states);
    let report = match render_report(format, &data) {
        Ok(report) => report,
        Err(e) => {
            eprintln!("{} Failed to render report: {}", "✗".red().bold(), e);
            std::process::exit(1);
        }
    };

    match output {
        Some(path) => {
            let path = resolve_report_path(path, format);
            if let Err(e) = save_report(&report, &path) {
                eprintln!("{} Failed to write {}: {}", "✗".red().bold(), path.display(), e);
                std::process::exit(1);
            }
            if !quiet {
                eprintln!("{} Report saved to {}", "✓".green().bold(), path.display());
            }
        }
        None => print!("{}", report),
    }

    if !quiet {
        eprintln!("Completed in {}", format_elapsed(started.elapsed()));
    }

    if interrupted {
        std::process::exit(130);
    }
}

/// One line per href: the canonical address it would be queued as, or why it is not followed.
pub fn classify_hrefs(
    origin: &Url,
    strict_host: bool,
    hrefs: &[String],
) -> Result<Vec<String>, String> {
    let address = PageAddress::from_url(origin);
    let classifier = LinkClassifier::for_address(&address)
        .ok_or_else(|| format!("Origin {} has no host", origin))?
        .with_strict_host(strict_host);

    Ok(hrefs
        .iter()
        .map(|href| match classifier.classify(href) {
            Ok(target) => format!("follow  {}  -> {}", href, target),
            Err(rejection) => format!("skip    {}  ({})", href, rejection),
        })
        .collect())
}

pub fn handle_classify(sub_matches: &ArgMatches) {
    let Some(origin) = sub_matches.get_one::<Url>("origin") else {
        eprintln!("{} --origin is required", "✗".red().bold());
        std::process::exit(2);
    };
    let strict_host = sub_matches.get_flag("strict-host");
    let hrefs: Vec<String> = sub_matches
        .get_many::<String>("HREF")
        .map(|values| values.cloned().collect())
        .unwrap_or_default();

    match classify_hrefs(origin, strict_host, &hrefs) {
        Ok(lines) => {
            for line in lines {
                println!("{}", line);
            }
        }
        Err(e) => {
            eprintln!("{} {}", "✗".red().bold(), e);
            std::process::exit(1);
        }
    }
}
