use console::Style;

pub fn print_header(title: &str) {
    println!("\n{}", Style::new().bold().cyan().apply_to(title));
    println!("{}", Style::new().dim().apply_to("─".repeat(console::measure_text_width(title))));
}

pub fn print_success(msg: &str) {
    println!("{} {}", Style::new().green().bold().apply_to("✓"), msg);
}

pub fn print_warning(msg: &str) {
    println!("{} {}", Style::new().yellow().bold().apply_to("⚠"), msg);
}

pub fn print_error(msg: &str) {
    eprintln!("{} {}", Style::new().red().bold().apply_to("ERROR:"), msg);
}

pub fn print_key_value(key: &str, value: &str) {
    println!(
        "{}: {}",
        Style::new().dim().apply_to(key),
        Style::new().bold().apply_to(value)
    );
}

/// One retrieval candidate: rank, id, distance and whether it passes the
/// threshold, followed by its context text.
pub fn print_match(rank: usize, id: &str, distance: f32, admitted: bool, content: &str) {
    let mark = if admitted {
        Style::new().green().apply_to("admitted")
    } else {
        Style::new().red().apply_to("rejected")
    };
    println!(
        "{} {} {}",
        Style::new().bold().blue().apply_to(format!("#{} {}", rank, id)),
        Style::new().dim().apply_to(format!("distance={:.4}", distance)),
        mark
    );
    println!("{}", Style::new().dim().apply_to(content.trim()));
    println!();
}
