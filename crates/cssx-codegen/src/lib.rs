//! Code generators for resolved CSSX stylesheets.
//!
//! Both generators expect a tree that has been through template expansion
//! and variable resolution. They never fail: anything they cannot place in
//! the output (HTML-only properties in CSS, parent-reference rules in HTML)
//! is skipped.

pub mod css;
pub mod html;

pub use css::generate_css;
pub use html::{HtmlElement, HtmlOutput, build_html, render_document};
