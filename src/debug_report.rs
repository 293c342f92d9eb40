use trivial_irc::{ExtractionVerbose, Page, QuestionRecord};

mod ansi {
    pub const RESET: &str = "\x1b[0m";
    pub const DIM: &str = "\x1b[2m";
    pub const BOLD: &str = "\x1b[1m";

    pub const GREEN: &str = "\x1b[32m";
    pub const YELLOW: &str = "\x1b[33m";
    pub const BLUE: &str = "\x1b[34m";
    pub const CYAN: &str = "\x1b[36m";
    pub const GRAY: &str = "\x1b[90m";

    pub struct Palette {
        enabled: bool,
    }

    impl Palette {
        pub fn new(enabled: bool) -> Self {
            Self { enabled }
        }

        pub fn paint(&self, s: impl AsRef<str>, color: &str) -> String {
            if self.enabled { format!("{}{}{}", color, s.as_ref(), RESET) } else { s.as_ref().to_string() }
        }

        pub fn bold(&self, s: impl AsRef<str>) -> String {
            if self.enabled { format!("{}{}{}", BOLD, s.as_ref(), RESET) } else { s.as_ref().to_string() }
        }

        pub fn dim(&self, s: impl AsRef<str>) -> String {
            if self.enabled { format!("{}{}{}", DIM, s.as_ref(), RESET) } else { s.as_ref().to_string() }
        }
    }
}

pub fn print_report(page: &Page, run: &ExtractionVerbose, color: bool) {
    let palette = ansi::Palette::new(color);
    println!(
        "\n{}",
        palette.bold(palette.paint(
            format!("⚙  Page {}/{} ({} records)", page.page, page.total_pages, page.total_records),
            ansi::CYAN
        ))
    );

    println!("\n{}", palette.paint("━━━ Records ━━━", ansi::GRAY));
    if page.records.is_empty() {
        println!("{}", palette.dim("  No records on this page"));
        if let Some(reason) = run.diagnostics.empty {
            println!("\n{} {:?}", palette.paint("Empty input:", ansi::YELLOW), reason);
        }
        println!("\n{}", palette.paint("Possible reasons:", ansi::YELLOW));
        println!("  • No line matched the question header pattern");
        println!("  • Questions never received a category line");
        println!("\n{}", palette.dim("  Tip: run with --verbose or RUST_LOG=trivial_irc=trace to see rule matches"));
    } else {
        for record in &page.records {
            print_record(record, &palette);
        }
    }

    println!("\n{}", palette.paint("━━━ Scan ━━━", ansi::GRAY));
    let diag = &run.diagnostics;
    println!(
        "  Lines: {}  │  Headers: {}  │  Records: {}  │  Dropped: {}",
        palette.paint(diag.lines.to_string(), ansi::BLUE),
        palette.paint(diag.headers_matched.to_string(), ansi::BLUE),
        palette.paint(diag.records.to_string(), ansi::GREEN),
        palette.dim(diag.incomplete_dropped.to_string()),
    );
    if diag.fallback_used {
        println!("  {}", palette.paint("Fallback header scan used", ansi::YELLOW));
    }
    for hit in &run.details.rule_hits {
        let hits = if hit.hits > 0 {
            palette.paint(format!("✓ {}", hit.hits), ansi::GREEN)
        } else {
            palette.dim(format!("✗ {}", hit.hits))
        };
        println!("    {} {}", palette.paint(format!("{:<26}", hit.rule), ansi::CYAN), hits);
    }

    println!("\n{}", palette.paint("━━━ Timing ━━━", ansi::GRAY));
    println!(
        "  Total: {}  │  Cleaning: {}  │  Matching: {}",
        palette.paint(format!("{:?}", run.details.total), ansi::GREEN),
        palette.paint(format!("{:?}", run.details.cleaning), ansi::CYAN),
        palette.dim(format!("{:?}", run.details.matching)),
    );
    println!();
}

fn print_record(record: &QuestionRecord, palette: &ansi::Palette) {
    let asked = record.asked_at.map(|t| format!(" @ {t}")).unwrap_or_default();
    println!(
        "  {} {} {}{}",
        palette.paint(format!("[{}/{}]", record.number, record.total), ansi::GRAY),
        palette.bold(palette.paint(&record.category, ansi::BLUE)),
        record.question_text,
        palette.dim(asked),
    );

    let answer = if record.answer_text.is_empty() { palette.dim("-") } else { palette.paint(&record.answer_text, ansi::GREEN) };
    let winner = if record.winner.is_empty() { palette.dim("-") } else { palette.paint(&record.winner, ansi::YELLOW) };
    let time = record.response_time_seconds.as_deref().map(|t| format!(" ({t})")).unwrap_or_default();
    println!("      {} {}  {} {}{}", palette.dim("answer:"), answer, palette.dim("│ winner:"), winner, palette.dim(time));

    if !record.author.is_empty() {
        println!("      {} {}", palette.dim("author:"), palette.paint(&record.author, ansi::CYAN));
    }
    if !record.participants.is_empty() {
        let nicks = record.participants.iter().collect::<Vec<_>>().join(", ");
        println!("      {} {}", palette.dim("participants:"), nicks);
    }
}
