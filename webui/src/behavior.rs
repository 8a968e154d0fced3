//! Sorting and depth filtering of the report table.

use std::rc::Rc;

use crate::dom::Document;
use crate::error::PageError;
use crate::keys::{by_delta, by_path};

pub const TABLE_ID: &str = "du-diff";
pub const SORT_BY_DELTA_ID: &str = "sort_by_delta";
pub const SORT_BY_PATH_ID: &str = "sort_by_path";
pub const DEPTH_BUTTON_PREFIX: &str = "depth-btn-";

/// Class carried by the table body while its rows are being reordered.
pub const SORTING_CLASS: &str = "sorting";

const TABLE_CLASS: &str = "du-diff table table-hover";
const BUTTON_ACTIVE_CLASS: &str = "btn btn-primary";
const BUTTON_INACTIVE_CLASS: &str = "btn btn-default";

/// Row view-model used while sorting.
struct RowView<K> {
    key: K,
    markup: String,
    index: usize,
}

/// Reorders the rows of the first body of `table` by `key`, ascending.
///
/// Ties keep their original order. The rows are re-rendered from their
/// serialized markup in a single write, so handlers attached to individual
/// rows do not survive.
pub fn sort_rows<D, K, F>(doc: &D, table: &D::Element, key: F) -> Result<(), PageError>
where
    D: Document,
    K: Ord,
    F: Fn(&D, &D::Element) -> K,
{
    let body = doc
        .table_body(table)
        .ok_or_else(|| PageError::MissingTableBody(TABLE_ID.to_string()))?;
    doc.set_class_name(&body, SORTING_CLASS);

    let mut views: Vec<RowView<K>> = doc
        .rows(&body)
        .iter()
        .enumerate()
        .map(|(index, row)| RowView { key: key(doc, row), markup: doc.outer_html(row), index })
        .collect();
    // (key, index) is a total order, so an unstable sort is still stable here.
    views.sort_unstable_by(|a, b| a.key.cmp(&b.key).then(a.index.cmp(&b.index)));

    let markup: String = views.into_iter().map(|v| v.markup).collect();
    doc.set_inner_html(&body, &markup);
    doc.set_class_name(&body, "");
    Ok(())
}

/// Shows `depth` path levels and highlights the matching depth button.
///
/// `buttons[i]` is the button for depth `i + 1`. A depth without a button
/// still sets the table class; every button then renders inactive.
pub fn limit_depth<D: Document>(doc: &D, table: &D::Element, buttons: &[D::Element], depth: u32) {
    doc.set_class_name(table, &table_class(depth));
    for (i, button) in buttons.iter().enumerate() {
        let class = if i as u64 + 1 == u64::from(depth) {
            BUTTON_ACTIVE_CLASS
        } else {
            BUTTON_INACTIVE_CLASS
        };
        doc.set_class_name(button, class);
    }
}

pub fn table_class(depth: u32) -> String {
    format!("{TABLE_CLASS} limit-{depth}")
}

pub fn depth_button_id(depth: u32) -> String {
    format!("{DEPTH_BUTTON_PREFIX}{depth}")
}

/// Depth buttons `depth-btn-1`, `depth-btn-2`, … up to the first missing id.
pub fn depth_buttons<D: Document>(doc: &D) -> Vec<D::Element> {
    (1..=u32::MAX)
        .map_while(|depth| doc.element_by_id(&depth_button_id(depth)))
        .collect()
}

fn require<D: Document>(doc: &D, id: &str) -> Result<D::Element, PageError> {
    doc.element_by_id(id).ok_or_else(|| PageError::MissingElement(id.to_string()))
}

/// The report table of a document together with its depth buttons.
pub struct ReportPage<D: Document> {
    doc: Rc<D>,
    table: D::Element,
    depth_buttons: Vec<D::Element>,
}

impl<D: Document> ReportPage<D> {
    /// Resolves the report table and discovers the depth buttons.
    pub fn attach(doc: Rc<D>) -> Result<Self, PageError> {
        let table = require(&*doc, TABLE_ID)?;
        let depth_buttons = depth_buttons(&*doc);
        Ok(Self { doc, table, depth_buttons })
    }

    pub fn document(&self) -> &D {
        &self.doc
    }

    /// Number of selectable depths.
    pub fn depth_levels(&self) -> usize {
        self.depth_buttons.len()
    }

    pub fn sort_by_delta(&self) -> Result<(), PageError> {
        sort_rows(&*self.doc, &self.table, by_delta)
    }

    pub fn sort_by_path(&self) -> Result<(), PageError> {
        sort_rows(&*self.doc, &self.table, by_path)
    }

    pub fn limit(&self, depth: u32) {
        limit_depth(&*self.doc, &self.table, &self.depth_buttons, depth);
    }
}

fn bind<D, F>(page: &Rc<ReportPage<D>>, element: &D::Element, action: F)
where
    D: Document + 'static,
    F: Fn(&ReportPage<D>) -> Result<(), PageError> + 'static,
{
    // The handler keeps the page alive for as long as the document holds it.
    let target = Rc::clone(page);
    page.doc.on_click(
        element,
        Box::new(move || {
            if let Err(err) = action(&target) {
                target.doc.report_error(&err.to_string());
            }
        }),
    );
}

/// Wires the sort headers and depth buttons of a freshly loaded report.
///
/// Meant to run once per page load; running it again only rebinds the same
/// handlers.
pub fn initialize<D: Document + 'static>(doc: Rc<D>) -> Result<Rc<ReportPage<D>>, PageError> {
    let page = Rc::new(ReportPage::attach(Rc::clone(&doc))?);

    let delta_header = require(&*doc, SORT_BY_DELTA_ID)?;
    bind(&page, &delta_header, ReportPage::sort_by_delta);
    let path_header = require(&*doc, SORT_BY_PATH_ID)?;
    bind(&page, &path_header, ReportPage::sort_by_path);

    for (i, button) in page.depth_buttons.iter().enumerate() {
        let depth = i as u32 + 1;
        bind(&page, button, move |p| {
            p.limit(depth);
            Ok(())
        });
    }
    Ok(page)
}
