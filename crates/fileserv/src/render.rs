//! HTML rendering for the root selector and directory listings.

use maud::{DOCTYPE, Markup, PreEscaped, html};

use crate::listing::ListEntry;
use crate::registry::Root;

const STYLE: &str = r#"
:root {
    --bg-primary: #ffffff;
    --bg-secondary: #f8f9fa;
    --bg-hover: #e9ecef;
    --text-primary: #212529;
    --text-secondary: #6c757d;
    --border-color: #dee2e6;
    --accent-color: #0d6efd;
    --accent-hover: #0a58ca;
    --shadow: rgba(0, 0, 0, 0.1);
}
@media (prefers-color-scheme: dark) {
    :root {
        --bg-primary: #1a1a1a;
        --bg-secondary: #2d2d2d;
        --bg-hover: #3a3a3a;
        --text-primary: #e9ecef;
        --text-secondary: #adb5bd;
        --border-color: #495057;
        --accent-color: #4dabf7;
        --accent-hover: #339af0;
        --shadow: rgba(0, 0, 0, 0.3);
    }
}
* { margin: 0; padding: 0; box-sizing: border-box; }
body {
    font-family: -apple-system, BlinkMacSystemFont, 'Segoe UI', Roboto, Ubuntu, sans-serif;
    background: var(--bg-primary);
    color: var(--text-primary);
    line-height: 1.6;
    min-height: 100vh;
}
.container { max-width: 1200px; margin: 0 auto; padding: 2rem 1rem; }
header { margin-bottom: 2rem; padding-bottom: 1rem; border-bottom: 2px solid var(--border-color); }
h1 { font-size: 1.75rem; font-weight: 600; margin-bottom: 0.5rem; word-break: break-all; }
.breadcrumb { color: var(--text-secondary); font-size: 0.9rem; }
.directory-selector {
    display: grid;
    grid-template-columns: repeat(auto-fill, minmax(250px, 1fr));
    gap: 1rem;
    margin-top: 2rem;
}
.directory-card {
    background: var(--bg-secondary);
    border: 1px solid var(--border-color);
    border-radius: 8px;
    padding: 1.5rem;
    text-decoration: none;
    color: var(--text-primary);
    box-shadow: 0 2px 4px var(--shadow);
}
.directory-card:hover { border-color: var(--accent-color); }
.directory-card-icon { font-size: 2.5rem; margin-bottom: 0.5rem; }
.directory-card-name { font-weight: 600; font-size: 1.1rem; }
.directory-card-path { font-size: 0.85rem; color: var(--text-secondary); word-break: break-all; }
.file-list {
    background: var(--bg-secondary);
    border: 1px solid var(--border-color);
    border-radius: 8px;
    overflow: hidden;
}
.file-item {
    display: flex;
    align-items: center;
    padding: 1rem 1.5rem;
    text-decoration: none;
    color: var(--text-primary);
    border-bottom: 1px solid var(--border-color);
}
.file-item:last-child { border-bottom: none; }
.file-item:hover { background: var(--bg-hover); }
.file-icon { font-size: 1.5rem; margin-right: 1rem; min-width: 2rem; text-align: center; }
.file-info { flex: 1; min-width: 0; }
.file-name { font-weight: 500; word-break: break-all; }
.file-meta, .file-size { font-size: 0.85rem; color: var(--text-secondary); }
.file-size { margin-left: auto; padding-left: 1rem; white-space: nowrap; }
.directory-nav {
    background: var(--bg-secondary);
    padding: 0.75rem 1.5rem;
    border-radius: 8px;
    margin-bottom: 1rem;
    border: 1px solid var(--border-color);
}
.directory-nav select {
    background: var(--bg-primary);
    color: var(--text-primary);
    border: 1px solid var(--border-color);
    padding: 0.5rem 1rem;
    border-radius: 6px;
}
.back-link { display: inline-flex; color: var(--accent-color); text-decoration: none; margin-bottom: 1rem; }
.back-link:hover { color: var(--accent-hover); }
.empty-state { text-align: center; padding: 3rem 1rem; color: var(--text-secondary); }
@media (max-width: 768px) {
    .file-size { display: none; }
    .directory-selector { grid-template-columns: 1fr; }
}
"#;

/// Everything a page needs. Built per request and dropped after rendering.
#[derive(Debug)]
pub struct ListingView<'a> {
    pub current_path: String,
    pub entries: Vec<ListEntry>,
    pub roots: &'a [Root],
    pub is_root_view: bool,
    /// Name of the root being browsed; preselected in the switch control.
    pub current_root: Option<&'a str>,
}

impl<'a> ListingView<'a> {
    pub fn root_selector(roots: &'a [Root]) -> Self {
        Self {
            current_path: "/".to_string(),
            entries: Vec::new(),
            roots,
            is_root_view: true,
            current_root: None,
        }
    }

    pub fn directory(
        root: &'a Root,
        current_path: String,
        entries: Vec<ListEntry>,
        roots: &'a [Root],
    ) -> Self {
        Self {
            current_path,
            entries,
            roots,
            is_root_view: false,
            current_root: Some(root.name.as_str()),
        }
    }
}

/// Render a full HTML page. Interpolated text is escaped by maud.
pub fn render(view: &ListingView<'_>) -> Markup {
    let title = if view.is_root_view {
        "File Server"
    } else {
        view.current_path.as_str()
    };

    html! {
        (DOCTYPE)
        html lang="en" {
            head {
                meta charset="UTF-8";
                meta name="viewport" content="width=device-width, initial-scale=1.0";
                title { (title) }
                style { (PreEscaped(STYLE)) }
            }
            body {
                div class="container" {
                    @if view.is_root_view {
                        (root_selector(view.roots))
                    } @else {
                        (directory_listing(view))
                    }
                }
            }
        }
    }
}

fn root_selector(roots: &[Root]) -> Markup {
    html! {
        header {
            h1 { "📁 File Server" }
            div class="breadcrumb" { "Select a directory to browse" }
        }
        div class="directory-selector" {
            @for root in roots {
                a class="directory-card" href=(encode_url_path(&root.url_prefix())) {
                    div class="directory-card-icon" { "📂" }
                    div class="directory-card-name" { (root.name) }
                    div class="directory-card-path" { (root.path.display().to_string()) }
                }
            }
        }
    }
}

fn directory_listing(view: &ListingView<'_>) -> Markup {
    html! {
        header {
            a class="back-link" href="/" { "← Back to all directories" }
            h1 { (view.current_path) }
        }
        @if view.roots.len() > 1 {
            div class="directory-nav" {
                label for="dir-select" { "Switch directory: " }
                select id="dir-select" onchange="window.location.href='/' + encodeURIComponent(this.value)" {
                    @for root in view.roots {
                        option value=(root.name) selected[view.current_root == Some(root.name.as_str())] {
                            (root.name)
                        }
                    }
                }
            }
        }
        @if view.entries.is_empty() {
            div class="empty-state" {
                p { "📭 This directory is empty" }
            }
        } @else {
            div class="file-list" {
                @for entry in &view.entries {
                    a class="file-item" href=(entry.url_path) {
                        div class="file-icon" { @if entry.is_dir { "📁" } @else { "📄" } }
                        div class="file-info" {
                            div class="file-name" { (entry.name) }
                            div class="file-meta" { @if entry.is_dir { "Directory" } @else { "File" } }
                        }
                        @if !entry.is_dir {
                            div class="file-size" { (format_size(entry.size_bytes)) }
                        }
                    }
                }
            }
        }
    }
}

/// Percent-encode each segment of a `/`-separated URL path. Entry links
/// arrive already encoded from their raw file names.
fn encode_url_path(path: &str) -> String {
    path.split('/')
        .map(|segment| urlencoding::encode(segment).into_owned())
        .collect::<Vec<_>>()
        .join("/")
}

/// Human-readable size in binary units.
///
/// Below 1024 the plain byte count is shown. Above that, one decimal in the
/// largest unit up to EB, which covers the whole `u64` range.
pub fn format_size(size: u64) -> String {
    const UNIT: u64 = 1024;
    const PREFIXES: [char; 6] = ['K', 'M', 'G', 'T', 'P', 'E'];

    if size < UNIT {
        return format!("{} B", size);
    }

    let mut div = UNIT;
    let mut exp = 0;
    let mut n = size / UNIT;
    while n >= UNIT && exp < PREFIXES.len() - 1 {
        div *= UNIT;
        exp += 1;
        n /= UNIT;
    }

    format!("{:.1} {}B", size as f64 / div as f64, PREFIXES[exp])
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn roots() -> Vec<Root> {
        vec![
            Root {
                name: "docs".into(),
                path: PathBuf::from("/tmp/docs"),
            },
            Root {
                name: "pics".into(),
                path: PathBuf::from("/tmp/pics"),
            },
        ]
    }

    fn file(name: &str, size: u64) -> ListEntry {
        ListEntry {
            name: name.to_string(),
            is_dir: false,
            url_path: format!("/docs/{}", urlencoding::encode(name)),
            size_bytes: size,
        }
    }

    #[test]
    fn test_format_size() {
        assert_eq!(format_size(0), "0 B");
        assert_eq!(format_size(1023), "1023 B");
        assert_eq!(format_size(1024), "1.0 KB");
        assert_eq!(format_size(1536), "1.5 KB");
        assert_eq!(format_size(1048576), "1.0 MB");
        assert_eq!(format_size(5 * 1024 * 1024 * 1024), "5.0 GB");
        assert_eq!(format_size(1024u64.pow(6)), "1.0 EB");
        assert_eq!(format_size(u64::MAX), "16.0 EB");
    }

    #[test]
    fn test_render_root_selector() {
        let roots = roots();
        let html = render(&ListingView::root_selector(&roots)).into_string();

        assert!(html.starts_with("<!DOCTYPE html>"));
        assert!(html.contains("<title>File Server</title>"));
        assert!(html.contains(r#"href="/docs""#));
        assert!(html.contains(r#"href="/pics""#));
        assert!(html.contains("/tmp/pics"));
        assert!(html.find("/tmp/docs").unwrap() < html.find("/tmp/pics").unwrap());
        assert!(!html.contains("dir-select"));
    }

    #[test]
    fn test_render_directory_listing() {
        let roots = roots();
        let entries = vec![
            ListEntry {
                name: "sub".into(),
                is_dir: true,
                url_path: "/docs/sub".into(),
                size_bytes: 4096,
            },
            file("notes.txt", 1536),
        ];
        let view = ListingView::directory(&roots[0], "/docs/".into(), entries, &roots);
        let html = render(&view).into_string();

        assert!(html.contains("<title>/docs/</title>"));
        assert!(html.contains("Back to all directories"));
        assert!(html.contains(r#"href="/docs/sub""#));
        assert!(html.contains(r#"href="/docs/notes.txt""#));
        assert!(html.contains("1.5 KB"));
        assert!(!html.contains("4.0 KB"));
        assert!(html.contains(r#"<option value="docs" selected>"#));
        assert!(html.contains(r#"<option value="pics">"#));
        assert!(html.contains(r#"<div class="file-list">"#));
        assert!(!html.contains(r#"<div class="empty-state">"#));
    }

    #[test]
    fn test_render_switch_hidden_for_single_root() {
        let roots = vec![roots().remove(0)];
        let view = ListingView::directory(&roots[0], "/docs/".into(), vec![file("a", 1)], &roots);
        let html = render(&view).into_string();
        assert!(!html.contains("dir-select"));
    }

    #[test]
    fn test_render_empty_directory() {
        let roots = roots();
        let view = ListingView::directory(&roots[0], "/docs/".into(), Vec::new(), &roots);
        let html = render(&view).into_string();
        assert!(html.contains(r#"<div class="empty-state">"#));
        assert!(html.contains("This directory is empty"));
        assert!(!html.contains(r#"<div class="file-list">"#));
    }

    #[test]
    fn test_render_escapes_names_and_encodes_links() {
        let roots = roots();
        let entries = vec![file("<b>a b#1.txt", 3)];
        let view = ListingView::directory(&roots[0], "/docs/".into(), entries, &roots);
        let html = render(&view).into_string();

        assert!(html.contains("&lt;b&gt;a b#1.txt"));
        assert!(html.contains(r#"href="/docs/%3Cb%3Ea%20b%231.txt""#));
        assert!(!html.contains("<b>a"));
    }

    #[test]
    fn test_render_does_not_reencode_entry_links() {
        let roots = roots();
        let entries = vec![ListEntry {
            name: "caf\u{FFFD}.txt".into(),
            is_dir: false,
            url_path: "/docs/caf%E9.txt".into(),
            size_bytes: 6,
        }];
        let view = ListingView::directory(&roots[0], "/docs/".into(), entries, &roots);
        let html = render(&view).into_string();

        assert!(html.contains(r#"href="/docs/caf%E9.txt""#));
        assert!(!html.contains("%25"));
    }
}
