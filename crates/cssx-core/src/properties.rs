//! CSS property database used for value type checking.

use std::collections::HashMap;
use std::sync::LazyLock;

use crate::ast::{Value, ValueKind};
use crate::lexicon::{self, HtmlProperty};

use ValueKind::{Color, CommaList, Function, Keyword, Length, Number, Percentage, SpaceList, Url};

/// Base URL for property documentation links.
pub const MDN_BASE_URL: &str = "https://developer.mozilla.org/en-US/docs/Web/CSS/";

/// Keywords every CSS property accepts.
pub const GLOBAL_KEYWORDS: &[&str] = &["inherit", "initial", "unset", "revert"];

const VENDOR_PREFIXES: &[&str] = &["-webkit-", "-moz-", "-ms-", "-o-"];

/// What a standard property accepts.
#[derive(Debug, Clone, PartialEq)]
pub struct PropertyInfo {
    pub name: &'static str,
    pub accepts: &'static [ValueKind],
    pub keywords: &'static [&'static str],
    pub deprecated: bool,
}

impl PropertyInfo {
    const fn new(
        name: &'static str,
        accepts: &'static [ValueKind],
        keywords: &'static [&'static str],
    ) -> Self {
        Self {
            name,
            accepts,
            keywords,
            deprecated: false,
        }
    }

    const fn deprecated(mut self) -> Self {
        self.deprecated = true;
        self
    }

    /// Whether a value of `kind` is acceptable. A property with a keyword
    /// list accepts keywords even when `Keyword` is not listed explicitly.
    pub fn accepts_kind(&self, kind: ValueKind) -> bool {
        self.accepts.contains(&kind) || (kind == ValueKind::Keyword && !self.keywords.is_empty())
    }

    /// Whether `keyword` is acceptable (case-insensitive, global keywords
    /// included).
    pub fn accepts_keyword(&self, keyword: &str) -> bool {
        is_global_keyword(keyword) || self.keywords.iter().any(|k| k.eq_ignore_ascii_case(keyword))
    }

    /// Accepted kinds, comma separated, for messages.
    pub fn accepted_kinds(&self) -> String {
        let mut kinds: Vec<&str> = self.accepts.iter().map(ValueKind::as_str).collect();
        if !self.keywords.is_empty() && !self.accepts.contains(&ValueKind::Keyword) {
            kinds.push(ValueKind::Keyword.as_str());
        }
        kinds.join(", ")
    }

    /// Accepted keywords, comma separated, for messages.
    pub fn accepted_keywords(&self) -> String {
        self.keywords.join(", ")
    }

    /// MDN page for this property.
    pub fn doc_url(&self) -> String {
        doc_url(self.name)
    }
}

const SIZE: &[ValueKind] = &[Length, Percentage, Keyword];
const SPACING: &[ValueKind] = &[Length, Percentage, Keyword, SpaceList];
const COLOR: &[ValueKind] = &[Color, Function];
const KEYWORD: &[ValueKind] = &[Keyword];
const LINE: &[ValueKind] = &[Length, Keyword, Color, SpaceList];
const GRID_TRACKS: &[ValueKind] = &[Length, Percentage, Keyword, Function, SpaceList];
const GRID_LINE: &[ValueKind] = &[Number, Keyword, SpaceList];

const SIZE_KEYWORDS: &[&str] = &["auto", "max-content", "min-content", "fit-content"];
const MAX_SIZE_KEYWORDS: &[&str] = &["none", "max-content", "min-content", "fit-content"];
const COLOR_KEYWORDS: &[&str] = &["transparent", "currentcolor"];
const BORDER_STYLES: &[&str] = &[
    "none", "hidden", "solid", "dashed", "dotted", "double", "groove", "ridge", "inset", "outset",
];
const AUTO: &[&str] = &["auto"];
const NONE: &[&str] = &["none"];

static TABLE: &[PropertyInfo] = &[
    // Layout and dimensions
    PropertyInfo::new("width", SIZE, SIZE_KEYWORDS),
    PropertyInfo::new("height", SIZE, SIZE_KEYWORDS),
    PropertyInfo::new("min-width", SIZE, SIZE_KEYWORDS),
    PropertyInfo::new("min-height", SIZE, SIZE_KEYWORDS),
    PropertyInfo::new("max-width", SIZE, MAX_SIZE_KEYWORDS),
    PropertyInfo::new("max-height", SIZE, MAX_SIZE_KEYWORDS),
    PropertyInfo::new("box-sizing", KEYWORD, &["content-box", "border-box"]),
    // Positioning
    PropertyInfo::new("position", KEYWORD, &["static", "relative", "absolute", "fixed", "sticky"]),
    PropertyInfo::new("top", SIZE, AUTO),
    PropertyInfo::new("right", SIZE, AUTO),
    PropertyInfo::new("bottom", SIZE, AUTO),
    PropertyInfo::new("left", SIZE, AUTO),
    PropertyInfo::new("z-index", &[Number, Keyword], AUTO),
    PropertyInfo::new("float", KEYWORD, &["left", "right", "none", "inline-start", "inline-end"]),
    PropertyInfo::new("clear", KEYWORD, &["none", "left", "right", "both"]),
    // Display and visibility
    PropertyInfo::new(
        "display",
        KEYWORD,
        &[
            "none", "block", "inline", "inline-block", "flex", "inline-flex", "grid",
            "inline-grid", "table", "table-cell", "table-row", "contents", "list-item",
        ],
    ),
    PropertyInfo::new("visibility", KEYWORD, &["visible", "hidden", "collapse"]),
    PropertyInfo::new("overflow", &[Keyword, SpaceList], &["visible", "hidden", "clip", "scroll", "auto"]),
    PropertyInfo::new("opacity", &[Number, Percentage], &[]),
    // Colors and backgrounds
    PropertyInfo::new("color", COLOR, COLOR_KEYWORDS),
    PropertyInfo::new("background-color", COLOR, COLOR_KEYWORDS),
    PropertyInfo::new("background", &[Color, Url, Function, Keyword, SpaceList, CommaList], NONE),
    PropertyInfo::new("background-image", &[Url, Function, Keyword, CommaList], NONE),
    PropertyInfo::new("background-size", &[Length, Percentage, Keyword, SpaceList], &["auto", "cover", "contain"]),
    PropertyInfo::new(
        "background-position",
        &[Length, Percentage, Keyword, SpaceList],
        &["left", "center", "right", "top", "bottom"],
    ),
    PropertyInfo::new(
        "background-repeat",
        KEYWORD,
        &["repeat", "repeat-x", "repeat-y", "no-repeat", "space", "round"],
    ),
    PropertyInfo::new("background-attachment", KEYWORD, &["scroll", "fixed", "local"]),
    // Typography
    PropertyInfo::new(
        "font-family",
        &[ValueKind::String, Keyword, CommaList, SpaceList],
        &["serif", "sans-serif", "monospace", "cursive", "fantasy", "system-ui"],
    ),
    PropertyInfo::new(
        "font-size",
        SIZE,
        &[
            "xx-small", "x-small", "small", "medium", "large", "x-large", "xx-large", "smaller",
            "larger",
        ],
    ),
    PropertyInfo::new("font-weight", &[Number, Keyword], &["normal", "bold", "bolder", "lighter"]),
    PropertyInfo::new("font-style", KEYWORD, &["normal", "italic", "oblique"]),
    PropertyInfo::new("font", &[Length, Keyword, ValueKind::String, SpaceList, CommaList], &[]),
    PropertyInfo::new("text-align", KEYWORD, &["left", "right", "center", "justify", "start", "end"]),
    PropertyInfo::new(
        "text-decoration",
        &[Keyword, Color, SpaceList],
        &["none", "underline", "overline", "line-through"],
    ),
    PropertyInfo::new(
        "text-transform",
        KEYWORD,
        &["none", "capitalize", "uppercase", "lowercase", "full-width"],
    ),
    PropertyInfo::new("text-shadow", &[Length, Color, Keyword, SpaceList, CommaList], NONE),
    PropertyInfo::new("letter-spacing", &[Length, Keyword], &["normal"]),
    PropertyInfo::new("line-height", &[Number, Length, Percentage, Keyword], &["normal"]),
    // Margin and padding
    PropertyInfo::new("margin", SPACING, AUTO),
    PropertyInfo::new("margin-top", SPACING, AUTO),
    PropertyInfo::new("margin-right", SPACING, AUTO),
    PropertyInfo::new("margin-bottom", SPACING, AUTO),
    PropertyInfo::new("margin-left", SPACING, AUTO),
    PropertyInfo::new("padding", &[Length, Percentage, SpaceList], &[]),
    PropertyInfo::new("padding-top", &[Length, Percentage], &[]),
    PropertyInfo::new("padding-right", &[Length, Percentage], &[]),
    PropertyInfo::new("padding-bottom", &[Length, Percentage], &[]),
    PropertyInfo::new("padding-left", &[Length, Percentage], &[]),
    // Borders
    PropertyInfo::new("border", LINE, BORDER_STYLES),
    PropertyInfo::new("border-top", LINE, BORDER_STYLES),
    PropertyInfo::new("border-right", LINE, BORDER_STYLES),
    PropertyInfo::new("border-bottom", LINE, BORDER_STYLES),
    PropertyInfo::new("border-left", LINE, BORDER_STYLES),
    PropertyInfo::new("border-width", &[Length, Keyword, SpaceList], &["thin", "medium", "thick"]),
    PropertyInfo::new("border-style", &[Keyword, SpaceList], BORDER_STYLES),
    PropertyInfo::new("border-color", &[Color, Function, SpaceList], COLOR_KEYWORDS),
    PropertyInfo::new("border-radius", &[Length, Percentage, SpaceList], &[]),
    PropertyInfo::new("outline", LINE, BORDER_STYLES),
    // Flexbox
    PropertyInfo::new("flex", &[Number, Length, Keyword, SpaceList], &["auto", "none"]),
    PropertyInfo::new("flex-direction", KEYWORD, &["row", "row-reverse", "column", "column-reverse"]),
    PropertyInfo::new("flex-wrap", KEYWORD, &["nowrap", "wrap", "wrap-reverse"]),
    PropertyInfo::new("flex-grow", &[Number], &[]),
    PropertyInfo::new("flex-shrink", &[Number], &[]),
    PropertyInfo::new("flex-basis", SIZE, &["auto", "content"]),
    PropertyInfo::new(
        "justify-content",
        KEYWORD,
        &[
            "flex-start", "flex-end", "start", "end", "center", "space-between", "space-around",
            "space-evenly", "stretch",
        ],
    ),
    PropertyInfo::new(
        "align-items",
        KEYWORD,
        &["stretch", "flex-start", "flex-end", "start", "end", "center", "baseline"],
    ),
    PropertyInfo::new(
        "align-self",
        KEYWORD,
        &["auto", "stretch", "flex-start", "flex-end", "start", "end", "center", "baseline"],
    ),
    PropertyInfo::new("order", &[Number], &[]),
    PropertyInfo::new("gap", &[Length, Percentage, SpaceList], &["normal"]),
    // Grid
    PropertyInfo::new("grid-template-columns", GRID_TRACKS, &["none", "auto", "min-content", "max-content"]),
    PropertyInfo::new("grid-template-rows", GRID_TRACKS, &["none", "auto", "min-content", "max-content"]),
    PropertyInfo::new("grid-template-areas", &[ValueKind::String, SpaceList, Keyword], NONE),
    PropertyInfo::new("grid-area", GRID_LINE, AUTO),
    PropertyInfo::new("grid-column-start", GRID_LINE, AUTO),
    PropertyInfo::new("grid-column-end", GRID_LINE, AUTO),
    PropertyInfo::new("grid-row-start", GRID_LINE, AUTO),
    PropertyInfo::new("grid-row-end", GRID_LINE, AUTO),
    PropertyInfo::new("grid-gap", &[Length, Percentage, SpaceList], &[]).deprecated(),
    PropertyInfo::new("grid-column-gap", &[Length, Percentage], &[]).deprecated(),
    PropertyInfo::new("grid-row-gap", &[Length, Percentage], &[]).deprecated(),
    // Effects
    PropertyInfo::new(
        "box-shadow",
        &[Length, Color, Keyword, SpaceList, CommaList, Function],
        &["none", "inset"],
    ),
    PropertyInfo::new(
        "cursor",
        &[Keyword, Url, CommaList],
        &[
            "auto", "default", "pointer", "text", "move", "wait", "help", "crosshair",
            "not-allowed", "grab", "grabbing",
        ],
    ),
    PropertyInfo::new(
        "transition",
        &[Keyword, Length, Function, SpaceList, CommaList],
        &["none", "all", "ease", "linear", "ease-in", "ease-out", "ease-in-out"],
    ),
    PropertyInfo::new("animation", &[Keyword, Length, Function, SpaceList, CommaList], NONE),
    PropertyInfo::new("transform", &[Function, SpaceList, Keyword], NONE),
    PropertyInfo::new("filter", &[Function, SpaceList, Keyword], NONE),
    PropertyInfo::new("clip", &[Function, Keyword], AUTO).deprecated(),
    // Lists
    PropertyInfo::new("list-style", &[Keyword, Url, SpaceList], NONE),
    PropertyInfo::new(
        "list-style-type",
        &[Keyword, ValueKind::String],
        &["none", "disc", "circle", "square", "decimal", "lower-alpha", "upper-alpha", "lower-roman", "upper-roman"],
    ),
    PropertyInfo::new("list-style-position", KEYWORD, &["inside", "outside"]),
    PropertyInfo::new("list-style-image", &[Url, Function, Keyword], NONE),
    PropertyInfo::new("content", &[ValueKind::String, Url, Function, Keyword, SpaceList], &["none", "normal"]),
];

static PROPERTIES: LazyLock<HashMap<&'static str, &'static PropertyInfo>> =
    LazyLock::new(|| TABLE.iter().map(|info| (info.name, info)).collect());

/// Properties whose bare numbers mean pixels.
const PIXEL_PROPERTIES: &[&str] = &[
    "font-size", "width", "height", "min-width", "min-height", "max-width", "max-height",
    "margin", "margin-top", "margin-right", "margin-bottom", "margin-left", "padding",
    "padding-top", "padding-right", "padding-bottom", "padding-left", "border-radius",
    "border-width", "top", "right", "bottom", "left", "gap", "grid-gap", "grid-column-gap",
    "grid-row-gap", "letter-spacing",
];

/// Look up a standard property (case-insensitive, vendor prefix ignored).
pub fn standard(name: &str) -> Option<&'static PropertyInfo> {
    let lowered = name.to_ascii_lowercase();
    PROPERTIES.get(strip_vendor_prefix(&lowered)).copied()
}

/// Remove a leading `-webkit-`, `-moz-`, `-ms-` or `-o-`.
pub fn strip_vendor_prefix(name: &str) -> &str {
    VENDOR_PREFIXES
        .iter()
        .find_map(|prefix| name.strip_prefix(prefix))
        .unwrap_or(name)
}

/// Whether `keyword` is accepted by every property.
pub fn is_global_keyword(keyword: &str) -> bool {
    GLOBAL_KEYWORDS.iter().any(|k| k.eq_ignore_ascii_case(keyword))
}

/// Whether bare numbers on this CSS property are emitted as pixels.
pub fn accepts_bare_pixels(css_name: &str) -> bool {
    let name = strip_vendor_prefix(css_name);
    PIXEL_PROPERTIES.iter().any(|p| *p == name)
}

/// The CSS spelling of a source property name.
pub fn css_name(name: &str) -> &str {
    lexicon::custom_property(name).unwrap_or(name)
}

/// MDN documentation URL for a CSS property.
pub fn doc_url(css_name: &str) -> String {
    format!("{MDN_BASE_URL}{}", strip_vendor_prefix(css_name))
}

/// What a source property name refers to.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PropertyRef<'a> {
    /// A CSS property. `info` is `None` when the name is known through the
    /// custom dictionary but its target is not in the database; such values
    /// are not type checked.
    Css {
        css_name: &'a str,
        info: Option<&'static PropertyInfo>,
    },
    /// A property consumed by the HTML generator.
    Html(HtmlProperty),
}

/// Resolve a source property name. `None` means the property is unknown.
pub fn lookup(name: &str) -> Option<PropertyRef<'_>> {
    if let Some(html) = HtmlProperty::from_name(name) {
        return Some(PropertyRef::Html(html));
    }
    if let Some(css) = lexicon::custom_property(name) {
        return Some(PropertyRef::Css {
            css_name: css,
            info: standard(css),
        });
    }
    standard(name).map(|info| PropertyRef::Css {
        css_name: name,
        info: Some(info),
    })
}

/// The kind a value counts as on a given property: bare numbers on pixel
/// properties are lengths.
pub fn classify(value: &Value, css_name: &str) -> ValueKind {
    match value {
        Value::Number(_) if accepts_bare_pixels(css_name) => ValueKind::Length,
        other => other.kind(),
    }
}
