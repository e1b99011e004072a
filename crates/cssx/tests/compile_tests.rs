//! End-to-end compiles from source text.

use cssx::analysis::prelude::*;
use cssx::prelude::*;
use tempfile::tempdir;

fn compile(source: &str) -> CompileResult {
    let _ = tracing_subscriber::fmt().with_test_writer().try_init();
    Compiler::default().compile(source, "main.cssx")
}

fn codes(result: &CompileResult) -> Vec<&'static str> {
    result.diagnostics.iter().map(|d| d.code.as_str()).collect()
}

/// Parse and run the semantic passes, returning the expanded tree.
fn analyze(source: &str) -> (Stylesheet, Diagnostics) {
    let mut sheet = cssx::parser::parse(source, "main.cssx").expect("source should parse");
    let mut diagnostics = Diagnostics::new("main.cssx");
    sema::check(&mut sheet, MAX_EXPANSION_DEPTH, &mut diagnostics);
    (sheet, diagnostics)
}

#[test]
fn test_variable_scenario() {
    let result = compile("@c = #3498db\n.box {\n  fondo = @c\n}");
    assert!(result.success);
    assert!(result.diagnostics.is_empty(), "{:?}", result.diagnostics);
    assert_eq!(result.css, ".box {\n  background-color: #3498db;\n}\n\n");
    assert!(result.html.contains("<div class=\"box\"></div>"));
}

#[test]
fn test_unused_variable_scenario() {
    let result = compile("@c = #3498db\n.box {\n  color = red\n}");
    assert!(result.success);
    assert_eq!(codes(&result), vec!["W001"]);
    assert!(result.diagnostics[0].message.contains("'@c'"));
}

#[test]
fn test_reference_before_declaration() {
    let result = compile(".box {\n  color = @c\n}\n@c = red");
    assert!(!result.success);
    assert!(result.css.is_empty());
    assert!(result.html.is_empty());
    assert_eq!(result.with_code(DiagnosticCode::UndefinedVariable).count(), 1);
    assert_eq!(result.error_count(), 1);
}

#[test]
fn test_nested_rule_before_block_variable() {
    let result = compile(".a {\n  .b {\n    color = @x\n  }\n  @x = red\n}");
    assert!(!result.success);
    assert!(result.css.is_empty());
    let undefined: Vec<_> = result.with_code(DiagnosticCode::UndefinedVariable).collect();
    assert_eq!(undefined.len(), 1);
    assert_eq!(undefined[0].line, 3);

    let result = compile(".a {\n  @x = red\n  .b {\n    color = @x\n  }\n}");
    assert!(result.success, "{:?}", result.diagnostics);
    assert_eq!(result.css, ".a .b {\n  color: red;\n}\n\n");
}

#[test]
fn test_variable_bound_to_variable() {
    let result = compile("@base = 12px\n@espacio = @base\n.a {\n  margin = @espacio\n}");
    assert!(result.success, "{:?}", result.diagnostics);
    assert!(result.css.contains("margin: 12px;"));
}

#[test]
fn test_duplicate_template() {
    let source = "plantilla t {\n  color = red\n}\nplantilla t {\n  color = blue\n}\n.a {\n  usar t\n}";
    let (sheet, diagnostics) = analyze(source);

    let duplicates: Vec<_> = diagnostics.with_code(DiagnosticCode::DuplicateTemplate).collect();
    assert_eq!(duplicates.len(), 1);
    assert_eq!(duplicates[0].line, 4);

    let rule = sheet.rule_sets().next().expect("rule set");
    assert_eq!(
        rule.declaration("color").map(|d| &d.value),
        Some(&Value::Color("red".into()))
    );
}

#[test]
fn test_direct_recursion() {
    let result = compile("plantilla a {\n  color = red\n  usar a\n}\n.x {\n  usar a\n}");
    assert!(!result.success);
    let recursion: Vec<_> = result.with_code(DiagnosticCode::TemplateRecursion).collect();
    assert_eq!(recursion.len(), 1);
    assert!(recursion[0].message.contains("a -> a"));
}

#[test]
fn test_indirect_recursion() {
    let source = "plantilla a {\n  usar b\n}\nplantilla b {\n  usar a\n}\n.x {\n  usar a\n}";
    let result = compile(source);
    assert!(!result.success);
    let recursion: Vec<_> = result.with_code(DiagnosticCode::TemplateRecursion).collect();
    assert_eq!(recursion.len(), 1);
    assert!(recursion[0].message.contains("a -> b -> a"));
    assert_eq!(recursion[0].doc_url.as_deref(), Some("internal://templates"));
}

#[test]
fn test_invocation_errors_expand_nothing() {
    let template = "plantilla box(@color=azul, @size=16) {\n  color = @color\n  tamano = @size\n}\n";
    for call in [
        "box(red, 10, 3)",
        "box(@peso=2)",
        "box(red, @size=20)",
        "box(@size=1, @size=2)",
        "caja",
    ] {
        let source = format!("{template}.a {{\n  usar {call}\n}}");
        let (sheet, diagnostics) = analyze(&source);
        assert_eq!(
            diagnostics.with_code(DiagnosticCode::TemplateInvocation).count(),
            1,
            "'{call}' should report one invocation error"
        );
        let rule = sheet.rule_sets().next().expect("rule set");
        assert_eq!(rule.declarations().count(), 0, "'{call}' should expand to nothing");
    }
}

#[test]
fn test_required_parameter() {
    let source = "plantilla borde(@ancho, @estilo=solid) {\n  border = @ancho @estilo\n}\n.a {\n  usar borde()\n}\n.b {\n  usar borde(2px)\n}";
    let result = compile(source);
    assert_eq!(result.with_code(DiagnosticCode::TemplateInvocation).count(), 1);

    let result = compile(&source.replace("usar borde()", "usar borde(1px)"));
    assert!(result.success, "{:?}", result.diagnostics);
    assert!(result.css.contains(".a {\n  border: 1px solid;\n}"));
    assert!(result.css.contains(".b {\n  border: 2px solid;\n}"));
}

#[test]
fn test_defaults_and_named_override() {
    let template = "plantilla box(@color=azul, @size=16) {\n  color = @color\n  tamano = @size\n}\n";

    let result = compile(&format!("{template}.a {{\n  usar box()\n}}"));
    assert!(result.success, "{:?}", result.diagnostics);
    assert_eq!(result.css, ".a {\n  color: blue;\n  font-size: 16px;\n}\n\n");

    let result = compile(&format!("{template}.a {{\n  usar box(@size=20)\n}}"));
    assert!(result.success, "{:?}", result.diagnostics);
    assert_eq!(result.css, ".a {\n  color: blue;\n  font-size: 20px;\n}\n\n");
}

#[test]
fn test_parameters_do_not_capture_globals() {
    let source = "@borde = 1px\nplantilla t(@color) {\n  color = @color\n  border-width = @borde\n}\n.a {\n  usar t(red)\n}";
    let result = compile(source);
    assert!(result.success, "{:?}", result.diagnostics);
    assert!(result.css.contains("color: red;"));
    assert!(result.css.contains("border-width: 1px;"));
}

#[test]
fn test_resolution_is_idempotent() {
    let (sheet, diagnostics) = analyze("@a = 4px\n@b = @a\n.x {\n  margin = @b @a\n}");
    assert!(!diagnostics.has_errors());

    let once = VariableResolver::new().resolve(&sheet);
    let twice = VariableResolver::new().resolve(&once);
    assert_eq!(once, twice);
}

#[test]
fn test_selector_specificity() {
    let specificity = |text: &str| {
        let source = format!("{text} {{\n  color = red\n}}");
        let (sheet, _) = analyze(&source);
        let rule = sheet.rule_sets().next().expect("rule set");
        rule.selectors[0].specificity()
    };
    assert_eq!(specificity(".foo.bar"), Specificity(0, 2, 0));
    assert_eq!(specificity("div.foo"), Specificity(0, 1, 1));
    assert_eq!(specificity("#id div.foo"), Specificity(1, 1, 1));
}

#[test]
fn test_parse_failure() {
    let result = compile(".a {\n  color = red\n}\n}");
    assert!(!result.success);
    assert!(result.css.is_empty() && result.html.is_empty());
    assert_eq!(codes(&result), vec!["E0001"]);
    assert_eq!((result.diagnostics[0].line, result.diagnostics[0].column), (4, 1));
}

#[test]
fn test_diagnostics_are_sorted() {
    let result = compile(".a {\n  colour = red\n  width = @nada\n}\n@x = 1");
    let lines: Vec<u32> = result.diagnostics.iter().map(|d| d.line).collect();
    assert_eq!(lines, vec![2, 3, 5]);
    assert_eq!(codes(&result), vec!["E002", "E001", "W001"]);
}

#[test]
fn test_json_output() {
    let result = compile("@c = 1px");
    let json: serde_json::Value =
        serde_json::from_str(&result.to_json().expect("serializes")).expect("valid json");
    assert_eq!(json["success"], true);
    assert_eq!(json["diagnostics"][0]["code"], "W001");
    assert_eq!(json["diagnostics"][0]["severity"], "warning");
}

#[test]
fn test_landing_page_document() {
    let source = r#"titulo_pagina = "Mi tienda"
@primario = #3498db

encabezado {
  fondo = @primario
  titulo {
    texto = "Bienvenidos"
  }
  .cta {
    enlace = "/comprar"
    texto = "Comprar"
    &:hover { opacidad = 0.8 }
  }
}"#;
    let result = compile(source);
    assert!(result.success, "{:?}", result.diagnostics);
    assert!(result.css.contains("header {\n  background-color: #3498db;\n}"));
    assert!(result.css.contains("header .cta:hover {\n  opacity: 0.8;\n}"));
    assert!(result.html.contains("<title>Mi tienda</title>"));
    assert!(result.html.contains("<h1>Bienvenidos</h1>"));
    assert!(result.html.contains("<a class=\"cta\" href=\"/comprar\">Comprar</a>"));
}

#[test]
fn test_compile_file_and_write_outputs() {
    let dir = tempdir().expect("temp dir");
    let input = dir.path().join("pagina.cssx");
    std::fs::write(&input, ".a {\n  color = red\n}\n").expect("write source");

    let result = Compiler::default().compile_file(&input).expect("readable");
    assert!(result.success);

    let output = OutputConfig {
        dir: dir.path().join("dist"),
        css: true,
        html: false,
    };
    let written = result.write_outputs("pagina", &output).expect("writable");
    assert_eq!(written, vec![dir.path().join("dist").join("pagina.css")]);
    assert_eq!(
        std::fs::read_to_string(&written[0]).expect("written"),
        ".a {\n  color: red;\n}\n\n"
    );

    let missing = Compiler::default().compile_file(dir.path().join("missing.cssx"));
    assert!(matches!(missing, Err(Error::Io { .. })));
}

#[test]
fn test_project_config_file() {
    let dir = tempdir().expect("temp dir");
    assert_eq!(ProjectConfig::discover(dir.path()).expect("defaults"), ProjectConfig::default());

    std::fs::write(
        dir.path().join("cssx.toml"),
        "[compiler]\nindent = 4\nhtml_lang = \"en\"\n\n[output]\ndir = \"public\"\n",
    )
    .expect("write config");
    let config = ProjectConfig::discover(dir.path()).expect("valid config");
    assert_eq!(config.compiler.indent, 4);
    assert_eq!(config.output.dir, std::path::PathBuf::from("public"));

    let result = Compiler::new(config.compiler).compile(".a {\n  color = red\n}", "a.cssx");
    assert!(result.css.contains("    color: red;"));
    assert!(result.html.starts_with("<!DOCTYPE html>\n<html lang=\"en\">"));

    std::fs::write(dir.path().join("cssx.toml"), "[compiler\n").expect("write config");
    assert!(matches!(ProjectConfig::discover(dir.path()), Err(Error::Config { .. })));
}

#[test]
fn test_concurrent_compiles() {
    let compiler = std::sync::Arc::new(Compiler::default());
    let handles: Vec<_> = (0..4)
        .map(|i| {
            let compiler = std::sync::Arc::clone(&compiler);
            std::thread::spawn(move || {
                compiler.compile(&format!("@w = {i}px\n.a {{\n  width = @w\n}}"), "t.cssx")
            })
        })
        .collect();
    for (i, handle) in handles.into_iter().enumerate() {
        let result = handle.join().expect("thread");
        assert!(result.css.contains(&format!("width: {i}px;")));
    }
}
