// Report generation from crawl states

use crate::crawl::extract_url_path;
use chrono::{DateTime, TimeZone};
use serde::{Deserialize, Serialize};
use sitegraph_scanner::{CrawlState, CrawlStatus};
use std::collections::BTreeMap;
use std::fs::File;
use std::io::Write;
use std::path::Path;

/// Shown instead of an empty context trail.
pub const BODY_CONTEXT_LABEL: &str = "(body)";

const CELL_SEPARATOR: &str = " | ";
const HEAVY_RULE: &str = "━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━\n";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ReportFormat {
    Text,
    Json,
    Csv,
    Markdown,
    Tree,
}

impl ReportFormat {
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "text" | "txt" => Some(ReportFormat::Text),
            "json" => Some(ReportFormat::Json),
            "csv" => Some(ReportFormat::Csv),
            "markdown" | "md" => Some(ReportFormat::Markdown),
            "tree" => Some(ReportFormat::Tree),
            _ => None,
        }
    }

    pub fn extension(&self) -> &'static str {
        match self {
            ReportFormat::Text | ReportFormat::Tree => "txt",
            ReportFormat::Json => "json",
            ReportFormat::Csv => "csv",
            ReportFormat::Markdown => "md",
        }
    }
}

/// Timestamped report name, e.g. `sitegraph.links.20261016093000.csv`.
pub fn report_file_name<Tz: TimeZone>(format: ReportFormat, at: &DateTime<Tz>) -> String
where
    Tz::Offset: std::fmt::Display,
{
    format!(
        "sitegraph.links.{}.{}",
        at.format("%Y%m%d%H%M%S"),
        format.extension()
    )
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportData {
    pub summary: Summary,
    pub crawls: Vec<CrawlReport>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Summary {
    pub hosts: usize,
    pub pages_visited: usize,
    pub pages_pending: usize,
    pub pages_skipped: usize,
    pub total_links: usize,
    pub internal_links: usize,
    pub external_links: usize,
    pub total_instances: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CrawlReport {
    pub origin: String,
    pub status: CrawlStatus,
    pub seeds: Vec<String>,
    pub pages: Vec<PageRow>,
    pub links: Vec<LinkRow>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageRow {
    pub url: String,
    pub visited: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LinkRow {
    pub href: String,
    pub internal: bool,
    pub locations: Vec<String>,
    pub contexts: Vec<String>,
    pub texts: Vec<String>,
    pub instances: usize,
}

pub fn gather_report_data(states: &[CrawlState]) -> ReportData {
    let mut summary = Summary {
        hosts: states.len(),
        ..Default::default()
    };
    let mut crawls = Vec::new();

    for state in states {
        let pages: Vec<PageRow> = state
            .frontier
            .entries()
            .map(|(address, visited)| PageRow {
                url: address.to_string(),
                visited,
            })
            .collect();

        let links: Vec<LinkRow> = state
            .graph
            .edges()
            .map(|edge| LinkRow {
                href: edge.href.clone(),
                internal: state.is_internal(&edge.href),
                locations: edge.locations.iter().map(|l| l.to_string()).collect(),
                contexts: edge.contexts.iter().cloned().collect(),
                texts: edge.texts.iter().cloned().collect(),
                instances: edge.instances,
            })
            .collect();

        summary.pages_visited += state.frontier.visited_count();
        summary.pages_pending += state.frontier.pending_count();
        summary.pages_skipped += state.pages_skipped;
        summary.total_links += links.len();
        summary.internal_links += links.iter().filter(|l| l.internal).count();
        summary.external_links += links.iter().filter(|l| !l.internal).count();
        summary.total_instances += state.graph.total_instances();

        crawls.push(CrawlReport {
            origin: state.origin_host.clone(),
            status: state.status,
            seeds: state.seeds.iter().map(|s| s.to_string()).collect(),
            pages,
            links,
        });
    }

    ReportData { summary, crawls }
}

pub fn render_report(format: ReportFormat, data: &ReportData) -> Result<String, String> {
    match format {
        ReportFormat::Text => Ok(generate_text_report(data)),
        ReportFormat::Json => {
            generate_json_report(data).map_err(|e| format!("Failed to serialize report: {}", e))
        }
        ReportFormat::Csv => generate_csv_report(data),
        ReportFormat::Markdown => Ok(generate_markdown_report(data)),
        ReportFormat::Tree => Ok(generate_tree_report(data)),
    }
}

pub fn generate_text_report(data: &ReportData) -> String {
    let mut report = String::new();

    report.push_str(HEAVY_RULE);
    report.push_str("                           SITEGRAPH LINK REPORT\n");
    report.push_str(HEAVY_RULE);
    report.push('\n');

    report.push_str("# Summary:\n");
    report.push_str(&format!("  Hosts crawled:   {}\n", data.summary.hosts));
    report.push_str(&format!("  Pages visited:   {}\n", data.summary.pages_visited));
    report.push_str(&format!("  Pages pending:   {}\n", data.summary.pages_pending));
    report.push_str(&format!("  Pages skipped:   {}\n", data.summary.pages_skipped));
    report.push_str(&format!(
        "  Links recorded:  {} ({} internal, {} external)\n",
        data.summary.total_links, data.summary.internal_links, data.summary.external_links
    ));
    report.push_str(&format!("  Link instances:  {}\n\n", data.summary.total_instances));

    for crawl in &data.crawls {
        report.push_str(HEAVY_RULE);
        report.push_str(&format!("## {} [{}]\n", crawl.origin, status_label(crawl.status)));
        report.push_str(HEAVY_RULE);
        report.push('\n');

        report.push_str("Pages:\n");
        for page in &crawl.pages {
            let marker = if page.visited { "✓" } else { "…" };
            report.push_str(&format!("  {} {}\n", marker, extract_url_path(&page.url)));
        }
        report.push('\n');

        report.push_str("Links:\n");
        for link in &crawl.links {
            let scope = if link.internal { "int" } else { "ext" };
            report.push_str(&format!("  [{}] {}  (x{})\n", scope, link.href, link.instances));
            report.push_str(&format!(
                "        found on: {}\n",
                link.locations
                    .iter()
                    .map(|l| extract_url_path(l))
                    .collect::<Vec<_>>()
                    .join(", ")
            ));
            report.push_str(&format!("        context:  {}\n", context_cell(&link.contexts)));
            if !link.texts.is_empty() {
                report.push_str(&format!("        text:     {}\n", link.texts.join(CELL_SEPARATOR)));
            }
        }
        report.push('\n');
    }

    report
}

pub fn generate_json_report(data: &ReportData) -> Result<String, serde_json::Error> {
    let json_report = serde_json::json!({
        "report": {
            "metadata": {
                "generator": "sitegraph",
                "version": env!("CARGO_PKG_VERSION"),
                "generated_at": chrono::Utc::now().to_rfc3339(),
                "format": "json"
            },
            "summary": data.summary,
            "crawls": data.crawls
        }
    });

    serde_json::to_string_pretty(&json_report)
}

/// One row per link edge: `Link,Locations,Contexts,Texts,Instances`.
pub fn generate_csv_report(data: &ReportData) -> Result<String, String> {
    let mut writer = csv::Writer::from_writer(Vec::new());
    writer
        .write_record(["Link", "Locations", "Contexts", "Texts", "Instances"])
        .map_err(|e| format!("Failed to write CSV header: {}", e))?;

    for crawl in &data.crawls {
        for link in &crawl.links {
            writer
                .write_record([
                    link.href.clone(),
                    link.locations.join(CELL_SEPARATOR),
                    context_cell(&link.contexts),
                    link.texts.join(CELL_SEPARATOR),
                    link.instances.to_string(),
                ])
                .map_err(|e| format!("Failed to write CSV row for {}: {}", link.href, e))?;
        }
    }

    let bytes = writer
        .into_inner()
        .map_err(|e| format!("Failed to flush CSV report: {}", e))?;
    String::from_utf8(bytes).map_err(|e| format!("CSV report is not UTF-8: {}", e))
}

pub fn generate_markdown_report(data: &ReportData) -> String {
    let mut report = String::from("# Site link report\n\n");

    report.push_str("| Metric | Value |\n|---|---|\n");
    report.push_str(&format!("| Pages visited | {} |\n", data.summary.pages_visited));
    report.push_str(&format!("| Pages pending | {} |\n", data.summary.pages_pending));
    report.push_str(&format!("| Links recorded | {} |\n", data.summary.total_links));
    report.push_str(&format!("| Internal links | {} |\n", data.summary.internal_links));
    report.push_str(&format!("| External links | {} |\n\n", data.summary.external_links));

    for crawl in &data.crawls {
        report.push_str(&format!("## {} ({})\n\n", crawl.origin, status_label(crawl.status)));
        report.push_str("| Link | Found on | Context | Text | Instances |\n");
        report.push_str("|---|---|---|---|---:|\n");
        for link in &crawl.links {
            report.push_str(&format!(
                "| {} | {} | {} | {} | {} |\n",
                markdown_cell(&link.href),
                markdown_cell(
                    &link.locations
                        .iter()
                        .map(|l| extract_url_path(l))
                        .collect::<Vec<_>>()
                        .join(", ")
                ),
                markdown_cell(&context_cell(&link.contexts)),
                markdown_cell(&link.texts.join("; ")),
                link.instances
            ));
        }
        report.push('\n');
    }

    report
}

#[derive(Default)]
struct PathNode {
    children: BTreeMap<String, PathNode>,
}

impl PathNode {
    fn insert<'a>(&mut self, mut segments: impl Iterator<Item = &'a str>) {
        if let Some(segment) = segments.next() {
            self.children
                .entry(segment.to_string())
                .or_default()
                .insert(segments);
        }
    }

    fn render(&self, prefix: &str, out: &mut String) {
        let count = self.children.len();
        for (idx, (name, child)) in self.children.iter().enumerate() {
            let last = idx + 1 == count;
            out.push_str(prefix);
            out.push_str(if last { "└─→ " } else { "├─→ " });
            out.push_str(name);
            out.push('\n');
            child.render(&format!("{}{}", prefix, if last { "    " } else { "│   " }), out);
        }
    }
}

/// Visited pages of each crawl as a tree of path segments under the origin.
pub fn generate_tree_report(data: &ReportData) -> String {
    let mut report = String::new();

    for crawl in &data.crawls {
        let mut root = PathNode::default();
        for page in crawl.pages.iter().filter(|p| p.visited) {
            let path = extract_url_path(&page.url);
            root.insert(path.split('/').filter(|s| !s.is_empty()));
        }

        report.push_str(&crawl.origin);
        report.push('\n');
        root.render("", &mut report);
        report.push('\n');
    }

    report
}

pub fn save_report(content: &str, path: &Path) -> std::io::Result<()> {
    let mut file = File::create(path)?;
    file.write_all(content.as_bytes())?;
    Ok(())
}

fn status_label(status: CrawlStatus) -> &'static str {
    match status {
        CrawlStatus::Pending => "pending",
        CrawlStatus::Complete => "complete",
        CrawlStatus::PageLimitReached => "page limit reached",
        CrawlStatus::Interrupted => "interrupted",
    }
}

fn context_cell(contexts: &[String]) -> String {
    contexts
        .iter()
        .map(|c| if c.is_empty() { BODY_CONTEXT_LABEL } else { c.as_str() })
        .collect::<Vec<_>>()
        .join(CELL_SEPARATOR)
}

fn markdown_cell(value: &str) -> String {
    value.replace('|', "\\|").replace('\n', " ")
}
