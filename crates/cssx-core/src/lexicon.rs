//! Static vocabulary of the source language.
//!
//! CSSX accepts Spanish names for properties, colors and elements next to
//! their standard CSS/HTML spellings. The tables here are read-only and
//! shared by every compile.

use std::collections::HashSet;
use std::sync::LazyLock;

use regex::Regex;

/// Sigil that starts variable and template parameter names.
pub const SIGIL: char = '@';

/// Keyword that opens a template definition.
pub const TEMPLATE_KEYWORD: &str = "plantilla";

/// Keyword that invokes a template.
pub const USE_KEYWORD: &str = "usar";

static IDENTIFIER: LazyLock<Option<Regex>> = LazyLock::new(|| {
    Regex::new(r"^[a-zA-Z_\u{00C0}-\u{017F}-][a-zA-Z0-9_\u{00C0}-\u{017F}-]*$").ok()
});

static HEX_COLOR: LazyLock<Option<Regex>> = LazyLock::new(|| {
    Regex::new(r"^#(?:[0-9a-fA-F]{3}|[0-9a-fA-F]{4}|[0-9a-fA-F]{6}|[0-9a-fA-F]{8})$").ok()
});

/// Check whether `name` is a valid identifier (class/id names, variable
/// names without the sigil). Latin-1 accented letters are allowed.
pub fn is_identifier(name: &str) -> bool {
    IDENTIFIER.as_ref().is_some_and(|re| re.is_match(name))
}

/// Check whether `name` is a well-formed variable name: the sigil followed
/// by an identifier.
pub fn is_variable_name(name: &str) -> bool {
    name.strip_prefix(SIGIL).is_some_and(is_identifier)
}

/// Check whether a `#...` literal is a well-formed hex color.
pub fn is_hex_color(text: &str) -> bool {
    HEX_COLOR.as_ref().is_some_and(|re| re.is_match(text))
}

/// Translate a Spanish color name.
pub fn spanish_color(name: &str) -> Option<&'static str> {
    let color = match name {
        "azul" => "blue",
        "rojo" => "red",
        "verde" => "green",
        "blanco" => "white",
        "negro" => "black",
        "amarillo" => "yellow",
        "gris" => "gray",
        "naranja" => "orange",
        "morado" => "purple",
        "rosa" => "pink",
        "marron" | "marrón" => "brown",
        "violeta" => "violet",
        "turquesa" => "turquoise",
        "dorado" => "gold",
        "plata" => "silver",
        "lima" => "lime",
        "transparente" => "transparent",
        _ => return None,
    };
    Some(color)
}

const NAMED_COLORS: &[&str] = &[
    "aliceblue", "antiquewhite", "aqua", "aquamarine", "azure", "beige", "bisque", "black",
    "blanchedalmond", "blue", "blueviolet", "brown", "burlywood", "cadetblue", "chartreuse",
    "chocolate", "coral", "cornflowerblue", "cornsilk", "crimson", "cyan", "darkblue",
    "darkcyan", "darkgoldenrod", "darkgray", "darkgreen", "darkgrey", "darkkhaki",
    "darkmagenta", "darkolivegreen", "darkorange", "darkorchid", "darkred", "darksalmon",
    "darkseagreen", "darkslateblue", "darkslategray", "darkslategrey", "darkturquoise",
    "darkviolet", "deeppink", "deepskyblue", "dimgray", "dimgrey", "dodgerblue", "firebrick",
    "floralwhite", "forestgreen", "fuchsia", "gainsboro", "ghostwhite", "gold", "goldenrod",
    "gray", "green", "greenyellow", "grey", "honeydew", "hotpink", "indianred", "indigo",
    "ivory", "khaki", "lavender", "lavenderblush", "lawngreen", "lemonchiffon", "lightblue",
    "lightcoral", "lightcyan", "lightgoldenrodyellow", "lightgray", "lightgreen", "lightgrey",
    "lightpink", "lightsalmon", "lightseagreen", "lightskyblue", "lightslategray",
    "lightslategrey", "lightsteelblue", "lightyellow", "lime", "limegreen", "linen", "magenta",
    "maroon", "mediumaquamarine", "mediumblue", "mediumorchid", "mediumpurple",
    "mediumseagreen", "mediumslateblue", "mediumspringgreen", "mediumturquoise",
    "mediumvioletred", "midnightblue", "mintcream", "mistyrose", "moccasin", "navajowhite",
    "navy", "oldlace", "olive", "olivedrab", "orange", "orangered", "orchid", "palegoldenrod",
    "palegreen", "paleturquoise", "palevioletred", "papayawhip", "peachpuff", "peru", "pink",
    "plum", "powderblue", "purple", "rebeccapurple", "red", "rosybrown", "royalblue",
    "saddlebrown", "salmon", "sandybrown", "seagreen", "seashell", "sienna", "silver",
    "skyblue", "slateblue", "slategray", "slategrey", "snow", "springgreen", "steelblue", "tan",
    "teal", "thistle", "tomato", "turquoise", "violet", "wheat", "white", "whitesmoke",
    "yellow", "yellowgreen",
];

static NAMED_COLOR_SET: LazyLock<HashSet<&'static str>> =
    LazyLock::new(|| NAMED_COLORS.iter().copied().collect());

/// Check whether `name` is a CSS named color (case-insensitive).
pub fn is_named_color(name: &str) -> bool {
    NAMED_COLOR_SET.contains(name.to_ascii_lowercase().as_str())
}

/// Translate a Spanish property name to its CSS name.
pub fn custom_property(name: &str) -> Option<&'static str> {
    let css = match name {
        // Colors and backgrounds
        "fondo" | "color_fondo" => "background-color",
        "imagen_fondo" => "background-image",
        "posicion_fondo" => "background-position",
        "repetir_fondo" => "background-repeat",
        "tamano_fondo" | "tamaño_fondo" => "background-size",
        "fondo_adjunto" => "background-attachment",

        // Typography
        "tamano" | "tamaño" => "font-size",
        "fuente" => "font-family",
        "grosor" | "peso" => "font-weight",
        "estilo_texto" => "font-style",
        "alinear" | "alinear_texto" => "text-align",
        "decoracion" | "decoracion_texto" => "text-decoration",
        "mayusculas" | "transformar_texto" => "text-transform",
        "espacio_letras" | "espacio_entre_letras" => "letter-spacing",
        "altura_linea" | "interlineado" => "line-height",
        "sombra_texto" => "text-shadow",

        // Layout
        "ancho" | "anchura" => "width",
        "alto" | "altura" => "height",
        "ancho_min" => "min-width",
        "ancho_max" => "max-width",
        "alto_min" => "min-height",
        "alto_max" => "max-height",
        "mostrar" => "display",
        "posicion" | "ubicacion" => "position",
        "arriba" => "top",
        "abajo" => "bottom",
        "izquierda" => "left",
        "derecha" => "right",
        "indice_z" | "orden" => "z-index",
        "desbordamiento" => "overflow",
        "visibilidad" | "visible" => "visibility",
        "medir" => "box-sizing",
        "flotante" => "float",
        "limpiar" => "clear",

        // Margin and padding
        "margen" => "margin",
        "margen_arriba" => "margin-top",
        "margen_abajo" => "margin-bottom",
        "margen_izquierda" => "margin-left",
        "margen_derecha" => "margin-right",
        "relleno" => "padding",
        "relleno_arriba" => "padding-top",
        "relleno_abajo" => "padding-bottom",
        "relleno_izquierda" => "padding-left",
        "relleno_derecha" => "padding-right",

        // Borders
        "borde" => "border",
        "borde_arriba" => "border-top",
        "borde_abajo" => "border-bottom",
        "borde_izquierdo" => "border-left",
        "borde_derecho" => "border-right",
        "color_borde" => "border-color",
        "estilo_borde" | "tipo_borde" => "border-style",
        "grosor_borde" | "ancho_borde" => "border-width",
        "redondeado" | "radio_borde" => "border-radius",

        // Flexbox
        "direccion" | "direccion_flex" => "flex-direction",
        "justificar" | "alinear_elementos" => "justify-content",
        "alinear_items" | "alinear_contenido" => "align-items",
        "envolver" | "envolver_flex" => "flex-wrap",
        "crecer" | "crecer_flex" => "flex-grow",
        "encoger" | "achicar" => "flex-shrink",
        "base" | "base_flex" => "flex-basis",
        "alinear_self" => "align-self",
        "orden_flex" => "order",

        // Grid
        "columnas" => "grid-template-columns",
        "filas" => "grid-template-rows",
        "areas" => "grid-template-areas",
        "espacio_columnas" => "grid-column-gap",
        "espacio_filas" => "grid-row-gap",
        "espacio_grid" => "grid-gap",
        "area" => "grid-area",
        "columna_inicio" => "grid-column-start",
        "columna_fin" => "grid-column-end",
        "fila_inicio" => "grid-row-start",
        "fila_fin" => "grid-row-end",

        // Effects
        "opacidad" => "opacity",
        "transicion" => "transition",
        "animacion" => "animation",
        "sombra" | "sombra_caja" => "box-shadow",
        "filtro" => "filter",
        "transformar" => "transform",
        "perspectiva" => "perspective",
        "recorte" => "clip-path",

        // Lists
        "lista_estilo" => "list-style",
        "lista_tipo" => "list-style-type",
        "lista_posicion" => "list-style-position",
        "lista_imagen" => "list-style-image",
        _ => return None,
    };
    Some(css)
}

/// Translate a Spanish element name to its HTML tag.
pub fn html_tag(name: &str) -> Option<&'static str> {
    let tag = match name {
        "titulo" => "h1",
        "titulo2" => "h2",
        "titulo3" => "h3",
        "titulo4" => "h4",
        "titulo5" => "h5",
        "titulo6" => "h6",
        "parrafo" | "párrafo" => "p",
        "enlace" => "a",
        "imagen" => "img",
        "division" | "contenedor" => "div",
        "seccion" | "sección" => "section",
        "articulo" | "artículo" => "article",
        "encabezado" => "header",
        "pie" => "footer",
        "navegacion" | "navegación" => "nav",
        "lista" => "ul",
        "lista_ordenada" => "ol",
        "elemento" => "li",
        "tabla" => "table",
        "fila" => "tr",
        "celda" => "td",
        "encabezado_tabla" => "th",
        "cuerpo_tabla" => "tbody",
        "cabecera_tabla" => "thead",
        "pie_tabla" => "tfoot",
        "formulario" => "form",
        "entrada" => "input",
        "boton" | "botón" => "button",
        "etiqueta" => "label",
        "seleccionar" => "select",
        "opcion" | "opción" => "option",
        "fuerte" => "strong",
        "enfasis" | "énfasis" => "em",
        "codigo" | "código" => "code",
        "preformateado" => "pre",
        "cita" => "blockquote",
        "linea" | "línea" => "hr",
        "salto" => "br",
        _ => return None,
    };
    Some(tag)
}

const STANDARD_ELEMENTS: &[&str] = &[
    "a", "abbr", "address", "article", "aside", "audio", "b", "blockquote", "body", "br",
    "button", "canvas", "caption", "cite", "code", "dd", "details", "dialog", "div", "dl", "dt",
    "em", "fieldset", "figcaption", "figure", "footer", "form", "h1", "h2", "h3", "h4", "h5",
    "h6", "head", "header", "hr", "html", "i", "iframe", "img", "input", "label", "legend", "li",
    "link", "main", "mark", "meta", "nav", "ol", "optgroup", "option", "p", "picture", "pre",
    "progress", "q", "script", "section", "select", "small", "source", "span", "strong", "sub",
    "summary", "sup", "svg", "table", "tbody", "td", "textarea", "tfoot", "th", "thead", "time",
    "title", "tr", "u", "ul", "video",
];

static STANDARD_ELEMENT_SET: LazyLock<HashSet<&'static str>> =
    LazyLock::new(|| STANDARD_ELEMENTS.iter().copied().collect());

/// Check whether `name` is a standard HTML element (case-insensitive).
pub fn is_standard_element(name: &str) -> bool {
    STANDARD_ELEMENT_SET.contains(name.to_ascii_lowercase().as_str())
}

/// Properties that feed the HTML generator instead of CSS.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HtmlProperty {
    /// `texto`: element text.
    Text,
    /// `contenido`: element text, alternative spelling.
    Content,
    /// `enlace`: turns the element into a link.
    Link,
    /// `titulo_pagina`: document title, top level only.
    PageTitle,
}

impl HtmlProperty {
    /// Look up an HTML property by its source name.
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "texto" => Some(Self::Text),
            "contenido" => Some(Self::Content),
            "enlace" => Some(Self::Link),
            "titulo_pagina" => Some(Self::PageTitle),
            _ => None,
        }
    }

    /// The source spelling.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Text => "texto",
            Self::Content => "contenido",
            Self::Link => "enlace",
            Self::PageTitle => "titulo_pagina",
        }
    }
}
