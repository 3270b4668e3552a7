use colored::Colorize;

pub mod crawl;
pub mod report;

pub fn print_banner() {
    eprintln!(
        "{}",
        r"
       _ _                              _
   ___(_) |_ ___  __ _ _ __ __ _ _ __ | |__
  / __| | __/ _ \/ _` | '__/ _` | '_ \| '_ \
  \__ \ | ||  __/ (_| | | | (_| | |_) | | | |
  |___/_|\__\___|\__, |_|  \__,_| .__/|_| |_|
                 |___/          |_|"
            .bright_cyan()
            .bold()
    );
    eprintln!(
        "  {} {}\n",
        "every link, every page".bright_white(),
        format!("v{}", env!("CARGO_PKG_VERSION")).dimmed()
    );
}
