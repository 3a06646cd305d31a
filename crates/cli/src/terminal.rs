//! Terminal notifications, prompts, and item rendering

use colored::Colorize;
use estate_controller::{Confirm, Level, Notification, Notifier};
use estate_core::{BinaryValue, FieldValue, Item};
use estate_schema::ResourceDef;
use std::io::{BufRead, Write};

/// Prints notifications to stderr
#[derive(Debug, Clone, Copy, Default)]
pub struct TerminalNotifier;

impl Notifier for TerminalNotifier {
    fn notify(&self, notification: Notification) {
        let tag = match notification.level {
            Level::Success => "✓".green().bold(),
            Level::Info => "i".blue().bold(),
            Level::Warning => "!".yellow().bold(),
            Level::Error => "✗".red().bold(),
        };
        eprintln!("{} {}", tag, notification.message);
    }
}

/// Asks `[y/N]` on stdin
#[derive(Debug, Clone, Copy, Default)]
pub struct StdinConfirm;

impl Confirm for StdinConfirm {
    fn confirm(&self, prompt: &str) -> bool {
        eprint!("{} [y/N]: ", prompt);
        let _ = std::io::stderr().flush();

        let mut answer = String::new();
        match std::io::stdin().lock().read_line(&mut answer) {
            Ok(_) => is_yes(&answer),
            Err(_) => false,
        }
    }
}

fn is_yes(answer: &str) -> bool {
    matches!(answer.trim().to_ascii_lowercase().as_str(), "y" | "yes")
}

/// One-line summary of a field value
pub fn summarize(value: &FieldValue) -> String {
    match value {
        FieldValue::Null => "-".to_string(),
        FieldValue::Text(text) => {
            let text = text.replace('\n', " ");
            if text.chars().count() > 60 {
                format!("{}…", text.chars().take(59).collect::<String>())
            } else {
                text
            }
        }
        FieldValue::Number(n) => n.to_string(),
        FieldValue::Bool(b) => b.to_string(),
        FieldValue::Binary(BinaryValue::Remote { url }) => url.clone(),
        FieldValue::Binary(BinaryValue::Inline { mime, bytes }) => format!(
            "<{} bytes{}>",
            bytes.len(),
            mime.as_deref().map(|m| format!(" {m}")).unwrap_or_default()
        ),
        FieldValue::Binary(BinaryValue::Pending(file)) => format!("<upload {}>", file.file_name),
    }
}

/// Render an item as a header line plus one line per field
pub fn render_item(def: &ResourceDef, item: &Item) -> String {
    let mut out = format!("{} {}\n", "#".dimmed(), item.id.to_string().bold());
    for field in &def.fields {
        out.push_str(&format!(
            "  {:<14} {}\n",
            field.name,
            summarize(&field.read(item))
        ));
    }
    out
}

/// Render a resource definition for `resources`
pub fn render_resource(def: &ResourceDef) -> String {
    let fields: Vec<String> = def
        .fields
        .iter()
        .map(|field| {
            let marker = if field.required { "*" } else { "" };
            if field.is_binary() {
                format!("{}{} ({})", field.name, marker, field.kind.display_name())
            } else {
                format!("{}{}", field.name, marker)
            }
        })
        .collect();

    let mut out = format!("{:<24} {}\n", def.name.bold(), def.path);
    if let Some(description) = &def.description {
        out.push_str(&format!("    {}\n", description.dimmed()));
    }
    if let Some(param) = def.parent_field() {
        out.push_str(&format!("    parent: --parent <id> (sent as {param})\n"));
    } else if def.parent.is_some() {
        out.push_str("    parent: --parent <id> (in path)\n");
    }
    out.push_str(&format!("    fields: {}\n", fields.join(", ")));
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use estate_core::PendingFile;
    use estate_schema::Catalog;

    #[test]
    fn test_is_yes() {
        assert!(is_yes("y\n"));
        assert!(is_yes(" YES "));
        assert!(!is_yes("\n"));
        assert!(!is_yes("n"));
    }

    #[test]
    fn test_summarize() {
        assert_eq!(summarize(&FieldValue::Null), "-");
        assert_eq!(summarize(&FieldValue::text("a\nb")), "a b");
        assert_eq!(summarize(&FieldValue::text("x".repeat(80))).chars().count(), 60);
        assert_eq!(
            summarize(&FieldValue::file(PendingFile::new("a.png", "image/png", vec![1]))),
            "<upload a.png>"
        );
        assert_eq!(
            summarize(&FieldValue::Binary(BinaryValue::Inline {
                mime: Some("image/jpeg".into()),
                bytes: vec![0; 4],
            })),
            "<4 bytes image/jpeg>"
        );
    }

    #[test]
    fn test_render_resource() {
        colored::control::set_override(false);
        let catalog = Catalog::site();

        let partners = render_resource(catalog.get("partners").unwrap());
        assert!(partners.starts_with("partners"));
        assert!(partners.contains("fields: name*, description*, logo (image)"));

        let amenities = render_resource(catalog.get("hpr-project-amenities").unwrap());
        assert!(amenities.contains("sent as projectId"));
    }
}
