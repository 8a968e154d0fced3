//! The slice of the host document the report page behaviour touches.
//!
//! Everything the behaviour reads or rewrites goes through [`Document`], so the
//! same code drives the browser ([`crate::web::WebDocument`]) and the
//! in-memory document used by the tests ([`crate::memory::MemoryDocument`]).

/// Handle to the rendered report document.
///
/// Element handles are cheap clones; they may go stale once their parent's
/// markup is replaced, exactly like detached DOM nodes.
pub trait Document {
    type Element: Clone;

    /// Looks up an element by its `id` attribute.
    fn element_by_id(&self, id: &str) -> Option<Self::Element>;

    /// Replaces the whole `class` attribute of `element`.
    fn set_class_name(&self, element: &Self::Element, class_name: &str);

    /// First `<tbody>` of a table element.
    fn table_body(&self, table: &Self::Element) -> Option<Self::Element>;

    /// Rows of a table section, in document order.
    fn rows(&self, body: &Self::Element) -> Vec<Self::Element>;

    /// `data-{name}` attribute of the `cell`-th cell of `row`.
    fn cell_data(&self, row: &Self::Element, cell: usize, name: &str) -> Option<String>;

    /// Rendered text of the `cell`-th cell of `row`.
    fn cell_text(&self, row: &Self::Element, cell: usize) -> Option<String>;

    /// Serialized markup of `element`, including the element itself.
    fn outer_html(&self, element: &Self::Element) -> String;

    /// Replaces the children of `element` with the given markup in one write.
    fn set_inner_html(&self, element: &Self::Element, html: &str);

    /// Installs `handler` as the click handler of `element`, replacing any
    /// previous one.
    fn on_click(&self, element: &Self::Element, handler: Box<dyn Fn()>);

    /// Surfaces an error raised inside an event handler.
    fn report_error(&self, message: &str);
}
