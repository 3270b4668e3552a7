use crate::CLAP_STYLING;
use clap::{arg, command};
use url::Url;

pub(crate) fn command_argument_builder() -> clap::Command {
    clap::Command::new("sitegraph")
        .version(env!("CARGO_PKG_VERSION"))
        .bin_name("sitegraph")
        .styles(CLAP_STYLING)
        .arg(arg!(-q --"quiet" "Suppress banner and non-essential output").required(false))
        .arg(
            arg!(-v --"verbose" "Increase log verbosity (-v info, -vv debug)")
                .required(false)
                .action(clap::ArgAction::Count),
        )
        .subcommand_required(false)
        .subcommand(
            command!("crawl")
                .visible_alias("map")
                .about(
                    "Crawl a site from one or more seed pages and map every link found on it, \
                with where it appears, its surrounding context, text and count.",
                )
                .arg(
                    arg!(-u --"url" <URL>)
                        .required(false)
                        .help("A seed URL to crawl (repeatable)")
                        .value_parser(clap::value_parser!(Url))
                        .action(clap::ArgAction::Append)
                        .conflicts_with("hosts-file"),
                )
                .arg(
                    arg!(-H --"hosts-file" <PATH>)
                        .required(false)
                        .help("Path to a newline-delimited file of seed URLs")
                        .value_parser(clap::value_parser!(std::path::PathBuf))
                        .conflicts_with("url"),
                )
                .arg(
                    arg!(--"timeout-ms" <MS>)
                        .required(false)
                        .help("Per-page bound on loading, waiting for readiness and extracting links")
                        .value_parser(clap::value_parser!(u64))
                        .default_value("30000"),
                )
                .arg(
                    arg!(--"ready-selector" <CSS>)
                        .required(false)
                        .help("CSS selector that marks a page as ready")
                        .default_value("body"),
                )
                .arg(
                    arg!(--"max-pages" <N>)
                        .required(false)
                        .help("Stop after visiting this many pages per host (default: no limit)")
                        .value_parser(clap::value_parser!(usize)),
                )
                .arg(
                    arg!(--"strict-host")
                        .required(false)
                        .help("Treat www.<host> and <host> as different origins")
                        .action(clap::ArgAction::SetTrue),
                )
                .arg(
                    arg!(--"delay-ms" <MS>)
                        .required(false)
                        .help("Pause between page loads on the same host (default: none)")
                        .value_parser(clap::value_parser!(u64)),
                )
                .arg(
                    arg!(--"delay-jitter-ms" <MS>)
                        .required(false)
                        .help("Randomise each pause by up to this much either side of --delay-ms (default: 0)")
                        .value_parser(clap::value_parser!(u64))
                        .requires("delay-ms"),
                )
                .arg(
                    arg!(--"user-agent" <UA>)
                        .required(false)
                        .help("User-Agent header sent with every request"),
                )
                .arg(
                    arg!(-o --"output" <PATH>)
                        .required(false)
                        .help(
                            "Save report to file, or to a timestamped file inside a directory \
                        (default: display to screen)",
                        )
                        .value_parser(clap::value_parser!(std::path::PathBuf)),
                )
                .arg(
                    arg!(-f --"format" <FORMAT>)
                        .required(false)
                        .help("Report format: text, json, csv, markdown, tree")
                        .value_parser(["text", "json", "csv", "markdown", "tree"])
                        .default_value("text"),
                ),
        )
        .subcommand(
            command!("classify")
                .visible_alias("check")
                .about("Show whether hrefs would be queued for crawling from a given origin")
                .arg(
                    arg!(--"origin" <URL>)
                        .required(true)
                        .help("The seed URL whose host is the crawl origin")
                        .value_parser(clap::value_parser!(Url)),
                )
                .arg(
                    arg!(--"strict-host")
                        .required(false)
                        .help("Treat www.<host> and <host> as different origins")
                        .action(clap::ArgAction::SetTrue),
                )
                .arg(
                    arg!(<HREF> ...)
                        .required(true)
                        .help("Absolute hrefs to classify"),
                ),
        )
}
