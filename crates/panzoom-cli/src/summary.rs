use std::path::Path;

use console::Style;
use panzoom_core::config::ViewerConfig;
use panzoom_core::engine::ViewChange;
use panzoom_core::extract::ViewportImage;
use panzoom_core::pyramid::Pyramid;
use panzoom_core::status::StatusReport;

struct Styles {
    title: Style,
    header: Style,
    label: Style,
    value: Style,
    active: Style,
    path: Style,
}

impl Styles {
    fn new() -> Self {
        Self {
            title: Style::new().cyan().bold(),
            header: Style::new().cyan().bold(),
            label: Style::new().dim(),
            value: Style::new().bold().white(),
            active: Style::new().green(),
            path: Style::new().underlined(),
        }
    }
}

fn print_title(s: &Styles, title: &str) {
    println!();
    println!("  {}", s.title.apply_to(title));
    println!("  {}", s.title.apply_to("\u{2550}".repeat(title.chars().count())));
    println!();
}

pub fn print_pyramid_summary(path: &Path, config: &ViewerConfig, pyramid: &Pyramid) {
    let s = Styles::new();
    print_title(&s, "Image Pyramid");

    let full = pyramid.full_size();
    println!("  {:<14}{}", s.label.apply_to("File"), s.path.apply_to(path.display()));
    println!(
        "  {:<14}{}",
        s.label.apply_to("Dimensions"),
        s.value.apply_to(format!("{}x{}", full.width, full.height))
    );
    println!(
        "  {:<14}{}",
        s.label.apply_to("Min side"),
        s.value.apply_to(format!("{} px", config.min_dimension))
    );
    println!(
        "  {:<14}{}",
        s.label.apply_to("Filter"),
        s.value.apply_to(config.filter)
    );
    println!();

    println!("  {}", s.header.apply_to(format!("Levels ({})", pyramid.height())));
    for (i, size) in pyramid.level_sizes().iter().enumerate() {
        println!(
            "    {:<12}{}",
            s.label.apply_to(format!("Level {i}")),
            s.value.apply_to(format!("{:5} x {:5}", size.width, size.height))
        );
    }
    println!();
}

pub fn print_view_summary(
    change: &ViewChange,
    status: &StatusReport,
    view: &ViewportImage,
    output: &Path,
) {
    let s = Styles::new();
    print_title(&s, "Viewport");

    let level = if change.level_changed() {
        s.active
            .apply_to(format!("{} (was {})", change.level(), change.previous_level))
            .to_string()
    } else {
        s.value.apply_to(change.level()).to_string()
    };
    println!("  {:<14}{}", s.label.apply_to("Level"), level);
    println!(
        "  {:<14}{}",
        s.label.apply_to("Scale"),
        s.value.apply_to(format!(
            "{:.3} ({} ticks)",
            change.scale(),
            change.snapshot.ticks
        ))
    );
    println!(
        "  {:<14}{}",
        s.label.apply_to("Source rect"),
        s.value.apply_to(format!(
            "{},{} .. {},{}",
            view.source_rect.min.x,
            view.source_rect.min.y,
            view.source_rect.max.x,
            view.source_rect.max.y
        ))
    );
    println!(
        "  {:<14}{}",
        s.label.apply_to("Crop"),
        s.value.apply_to(format!("{}x{}", view.image.width(), view.image.height()))
    );
    println!("  {:<14}{}", s.label.apply_to("Saved"), s.path.apply_to(output.display()));
    println!();
    println!("  {}", status);
    println!();
}
