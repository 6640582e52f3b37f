//! HTML directory listings for the report server

use std::cmp::Ordering;
use std::path::Path;
use std::time::SystemTime;

use chrono::{DateTime, Local};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::types::RunnerResult;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub enum ListingView {
    /// Table with name, size and modification time
    Details,
    /// Compact list of names
    Tiles,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize, JsonSchema)]
#[serde(rename_all = "camelCase", deny_unknown_fields, default)]
pub struct ListingOptions {
    /// Show entries whose names start with `.`
    pub hidden: bool,
    /// Prefix entries with a file/folder icon
    pub icons: bool,
    pub view: ListingView,
}

impl Default for ListingOptions {
    fn default() -> Self {
        Self {
            hidden: true,
            icons: true,
            view: ListingView::Details,
        }
    }
}

#[derive(Debug, Clone)]
pub struct ListingEntry {
    pub name: String,
    pub is_dir: bool,
    pub size: u64,
    pub modified: Option<SystemTime>,
}

/// Read a directory into listing entries: directories first, then by name
pub fn read_entries(dir: &Path, options: &ListingOptions) -> RunnerResult<Vec<ListingEntry>> {
    let mut entries = Vec::new();

    for entry in std::fs::read_dir(dir)? {
        let entry = entry?;
        let name = entry.file_name().to_string_lossy().into_owned();
        if !options.hidden && name.starts_with('.') {
            continue;
        }

        // Follow symlinks so linked report folders list as directories
        let metadata = std::fs::metadata(entry.path()).or_else(|_| entry.metadata())?;
        entries.push(ListingEntry {
            name,
            is_dir: metadata.is_dir(),
            size: metadata.len(),
            modified: metadata.modified().ok(),
        });
    }

    entries.sort_by(|a, b| match (a.is_dir, b.is_dir) {
        (true, false) => Ordering::Less,
        (false, true) => Ordering::Greater,
        _ => a
            .name
            .to_lowercase()
            .cmp(&b.name.to_lowercase())
            .then_with(|| a.name.cmp(&b.name)),
    });

    Ok(entries)
}

/// Render the listing page for `dir`, which is served at `url_path` (ending in `/`)
pub fn render_listing(dir: &Path, url_path: &str, options: &ListingOptions) -> RunnerResult<String> {
    let entries = read_entries(dir, options)?;
    Ok(render_entries(url_path, &entries, options))
}

pub fn render_entries(url_path: &str, entries: &[ListingEntry], options: &ListingOptions) -> String {
    let title = format!("listing directory {}", escape_html(url_path));
    let mut html = String::new();

    html.push_str("<!DOCTYPE html>\n<html>\n<head>\n<meta charset=\"utf-8\">\n");
    html.push_str(&format!("<title>{}</title>\n", title));
    html.push_str(STYLE);
    html.push_str("</head>\n<body class=\"directory\">\n");
    html.push_str(&format!("<h1>{}</h1>\n", breadcrumbs(url_path)));

    let parent = (url_path != "/").then(|| ListingEntry {
        name: "..".to_string(),
        is_dir: true,
        size: 0,
        modified: None,
    });
    let rows = parent.iter().chain(entries.iter());

    match options.view {
        ListingView::Details => {
            html.push_str("<table id=\"files\" class=\"view-details\">\n");
            html.push_str(
                "<thead><tr><th>Name</th><th>Size</th><th>Modified</th></tr></thead>\n<tbody>\n",
            );
            for entry in rows {
                let size = if entry.is_dir {
                    String::new()
                } else {
                    format_size(entry.size)
                };
                let modified = entry.modified.map(format_time).unwrap_or_default();
                html.push_str(&format!(
                    "<tr><td>{}</td><td class=\"size\">{}</td><td class=\"date\">{}</td></tr>\n",
                    entry_link(entry, options),
                    size,
                    modified
                ));
            }
            html.push_str("</tbody>\n</table>\n");
        }
        ListingView::Tiles => {
            html.push_str("<ul id=\"files\" class=\"view-tiles\">\n");
            for entry in rows {
                html.push_str(&format!("<li>{}</li>\n", entry_link(entry, options)));
            }
            html.push_str("</ul>\n");
        }
    }

    html.push_str("</body>\n</html>\n");
    html
}

fn entry_link(entry: &ListingEntry, options: &ListingOptions) -> String {
    let href = if entry.name == ".." {
        "../".to_string()
    } else if entry.is_dir {
        format!("{}/", urlencoding::encode(&entry.name))
    } else {
        urlencoding::encode(&entry.name).into_owned()
    };

    let icon = if !options.icons {
        ""
    } else if entry.is_dir {
        "<span class=\"icon\">&#128193;</span> "
    } else {
        "<span class=\"icon\">&#128196;</span> "
    };

    let class = if entry.is_dir { "dir" } else { "file" };
    format!(
        "<a href=\"{}\" class=\"{}\" title=\"{}\">{}<span class=\"name\">{}</span></a>",
        href,
        class,
        escape_html(&entry.name),
        icon,
        escape_html(&entry.name)
    )
}

/// `/a/b/` rendered as linked path segments
fn breadcrumbs(url_path: &str) -> String {
    let mut crumbs = vec!["<a href=\"/\">~</a>".to_string()];
    let mut href = String::from("/");
    for segment in url_path.split('/').filter(|s| !s.is_empty()) {
        href.push_str(&urlencoding::encode(segment));
        href.push('/');
        crumbs.push(format!("<a href=\"{}\">{}</a>", href, escape_html(segment)));
    }
    crumbs.join(" / ")
}

fn format_size(bytes: u64) -> String {
    const UNITS: [&str; 4] = ["KB", "MB", "GB", "TB"];
    if bytes < 1024 {
        return format!("{} B", bytes);
    }
    let mut value = bytes as f64 / 1024.0;
    let mut unit = 0;
    while value >= 1024.0 && unit < UNITS.len() - 1 {
        value /= 1024.0;
        unit += 1;
    }
    format!("{:.1} {}", value, UNITS[unit])
}

fn format_time(time: SystemTime) -> String {
    DateTime::<Local>::from(time)
        .format("%Y-%m-%d %H:%M:%S")
        .to_string()
}

pub fn escape_html(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(c),
        }
    }
    escaped
}

const STYLE: &str = r#"<style>
body { font: 14px "Helvetica Neue", Helvetica, Arial, sans-serif; margin: 20px; }
h1 { font-size: 18px; font-weight: normal; }
a { color: #365ebf; text-decoration: none; }
table.view-details { border-collapse: collapse; min-width: 50%; }
table.view-details th, table.view-details td { text-align: left; padding: 4px 12px; }
table.view-details tr:nth-child(even) { background: #f6f8fa; }
td.size, td.date { color: #666; white-space: nowrap; }
ul.view-tiles { list-style: none; padding: 0; display: flex; flex-wrap: wrap; }
ul.view-tiles li { width: 220px; padding: 6px; }
</style>
"#;
