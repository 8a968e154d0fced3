//! HTML rendering of du-diff reports.
//!
//! The markup is the contract the `dudiff-page` wasm module relies on: the
//! `#du-diff` table, the `#sort_by_delta` / `#sort_by_path` header cells, the
//! `data-size` attribute on each row's first cell and the contiguous
//! `#depth-btn-N` buttons. Keep both sides in sync.

pub mod format;

use std::fmt::Write as _;

use crate::du::DeltaRow;
pub use format::{fmt_delta, html_escape};

pub const STYLESHEET: &str = r#"body {
    margin: 1em;
}

.du-diff th:first-child {
    width: 8em;
}
.du-diff td:first-child {
    text-align: right;
}

.du-diff .sorting {
    color: #888;
    cursor: progress;
}
.du-diff th {
    cursor: pointer;
}
.du-diff th:hover {
    background: #f5f5f5;
}
"#;

/// Everything a report page is rendered from.
#[derive(Debug, Clone)]
pub struct ReportContext<'a> {
    pub location: &'a str,
    pub old: &'a str,
    pub new: &'a str,
    pub rows: &'a [DeltaRow],
    /// Mount prefix of the app (`""` or `/sub`).
    pub prefix: &'a str,
    /// URL prefix of static assets.
    pub static_prefix: &'a str,
}

/// Deepest path in the report; 0 without rows.
pub fn max_depth(rows: &[DeltaRow]) -> usize {
    rows.iter().map(DeltaRow::depth).max().unwrap_or(0)
}

/// CSS hiding rows deeper than the active `limit-N` class.
pub fn depth_rules(max_depth: usize) -> String {
    let mut css = String::new();
    for n in 1..max_depth {
        for m in n + 1..=max_depth {
            let _ = writeln!(css, "      .limit-{n} .depth-{m} {{ display: none; }}");
        }
    }
    css
}

pub fn render_report(ctx: &ReportContext<'_>) -> String {
    let location = html_escape(ctx.location);
    let old = html_escape(ctx.old);
    let new = html_escape(ctx.new);
    let prefix = html_escape(ctx.prefix);
    let static_prefix = html_escape(ctx.static_prefix);
    let max_depth = max_depth(ctx.rows);

    let mut html = String::with_capacity(1024 + ctx.rows.len() * 96);
    let _ = write!(
        html,
        r#"<!DOCTYPE html>
<html lang="en">
  <head>
    <meta charset="UTF-8">
    <meta http-equiv="X-UA-Compatible" content="IE=edge">
    <meta name="viewport" content="width=device-width, initial-scale=1">

    <title>du-diff for {location}: {old}..{new}</title>

    <link rel="stylesheet" href="{static_prefix}/css/bootstrap.min.css">
    <link rel="stylesheet" href="{prefix}/style.css">

    <style type="text/css">
{rules}    </style>
  </head>
  <body>
    <h1>du-diff for {location} <small>{old} to {new}</small></h1>
"#,
        rules = depth_rules(max_depth),
    );

    if max_depth > 1 {
        html.push_str(
            r#"
    <div class="form-group pull-right">
      <label>Limit to depth</label>
      <div class="btn-group" role="toolbar" aria-label="Depth filter">
"#,
        );
        for n in 1..=max_depth {
            let _ = writeln!(
                html,
                r#"        <button class="btn btn-default" id="depth-btn-{n}" role="group" aria-label="{n}">{n}</button>"#
            );
        }
        html.push_str("      </div>\n    </div>\n");
    }

    html.push_str(
        r#"
    <table id="du-diff" class="du-diff table table-hover">
      <thead>
        <tr>
          <th id="sort_by_delta">Delta</th>
          <th id="sort_by_path">Location</th>
        </tr>
      </thead>
      <tbody>
"#,
    );
    for row in ctx.rows {
        let _ = write!(
            html,
            "        <tr class=\"depth-{depth}\">\n          <td data-size=\"{delta}\">{size}</td>\n          <td>{path}</td>\n        </tr>\n",
            depth = row.depth(),
            delta = row.delta,
            size = html_escape(&fmt_delta(row.delta)),
            path = html_escape(&row.path),
        );
    }
    let _ = write!(
        html,
        r#"      </tbody>
    </table>
    <script type="module">
      import init from "{static_prefix}/pkg/dudiff_page.js";
      init();
    </script>
  </body>
</html>
"#
    );
    html
}

/// Snapshot listing of a location, newest first, each linking to the diff
/// against the snapshot before it.
pub fn render_index(location: &str, snapshots: &[String], prefix: &str, static_prefix: &str) -> String {
    let location_e = html_escape(location);
    let prefix_e = html_escape(prefix);
    let mut items = String::new();
    for (i, date) in snapshots.iter().enumerate().rev() {
        let date_e = html_escape(date);
        match i.checked_sub(1).and_then(|p| snapshots.get(p)) {
            Some(prev) => {
                let link = format!("{}/{}/{}..{}", prefix, location, prev, date);
                let _ = writeln!(
                    items,
                    r#"        <li>{date_e} <a href="{href}">changes since {prev}</a> <a href="{href}.txt">(text)</a></li>"#,
                    href = html_escape(&link),
                    prev = html_escape(prev),
                );
            }
            None => {
                let _ = writeln!(items, "        <li>{date_e}</li>");
            }
        }
    }
    if items.is_empty() {
        items.push_str("        <li>No snapshots yet.</li>\n");
    }
    format!(
        r#"<!DOCTYPE html>
<html lang="en">
  <head>
    <meta charset="UTF-8">
    <title>du snapshots for {location_e}</title>
    <link rel="stylesheet" href="{static_prefix}/css/bootstrap.min.css">
    <link rel="stylesheet" href="{prefix_e}/style.css">
  </head>
  <body>
    <h1>du snapshots for {location_e}</h1>
    <ul>
{items}    </ul>
  </body>
</html>
"#,
        static_prefix = html_escape(static_prefix),
    )
}
