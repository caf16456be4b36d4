use crate::config::Config;
use anyhow::Result;
use colored::Colorize;
use richtext_model::FormatType;

pub fn formats(config: &Config) -> Result<()> {
    let registry = config.registry()?;

    for format_type in registry.iter() {
        let summary = summarize(format_type);
        println!(
            "{} {} {} {}",
            format_type.name.bright_blue().bold(),
            summary.selector.cyan(),
            summary.title,
            summary.flags.yellow()
        );
        for (key, host_name) in &format_type.attributes {
            println!("    {} → {}", key, host_name.dimmed());
        }
    }

    println!();
    println!("{} format types", registry.len().to_string().green());
    Ok(())
}

/// Uncolored pieces of one listing line.
#[derive(Debug, PartialEq, Eq)]
struct Summary {
    selector: String,
    title: String,
    flags: String,
}

fn summarize(format_type: &FormatType) -> Summary {
    let mut selector = format!("<{}", format_type.tag_name);
    if let Some(class_name) = &format_type.class_name {
        selector.push_str(&format!(" class=\"{class_name}\""));
    }
    selector.push('>');

    let mut flags = Vec::new();
    if format_type.object {
        flags.push("object");
    }
    if !format_type.content_editable {
        flags.push("non-editable");
    }

    Summary {
        selector,
        title: format_type.title.clone().unwrap_or_default(),
        flags: flags.join(", "),
    }
}
