#[cfg(test)]
mod tests {
    use crate::checker::check_program;
    use crate::diagnostic::{
        Diagnostic, Severity, CODE_CANNOT_FIND_NAME, CODE_IMPORT_META, CODE_NOT_ASSIGNABLE,
        CODE_RESERVED_EXPORTS, CODE_TOP_LEVEL_AWAIT, CODE_TOP_LEVEL_FOR_AWAIT, CODE_UNUSED_LABEL,
    };
    use crate::options::CompileOptions;
    use crate::source::SourceUnit;
    use oxc_allocator::Allocator;
    use oxc_parser::Parser;
    use oxc_span::SourceType;

    fn check_with(code: &str, options: &CompileOptions) -> Vec<Diagnostic> {
        let source = SourceUnit::new("index.ts", code);
        let allocator = Allocator::default();
        let source_type = SourceType::default()
            .with_module(true)
            .with_typescript(true);
        let ret = Parser::new(&allocator, source.text(), source_type).parse();
        check_program(&ret.program, &ret.errors, &source, options).diagnostics
    }

    fn check(code: &str) -> Vec<Diagnostic> {
        check_with(code, &CompileOptions::default())
    }

    #[test]
    fn test_string_assigned_to_number() {
        let diags = check("let a = 1;\nlet x: number = \"s\";\n");
        assert_eq!(diags.len(), 1, "{:?}", diags);
        let d = &diags[0];
        assert_eq!(d.severity, Severity::Error);
        assert_eq!(d.code, Some(CODE_NOT_ASSIGNABLE));
        assert_eq!(d.message, "Type '\"s\"' is not assignable to type 'number'.");
        assert_eq!((d.position.line, d.position.column), (1, 4));
    }

    #[test]
    fn test_matching_literals_pass() {
        let diags = check(
            "const a: number = -1;\nconst b: string = `t`;\nconst c: boolean = (true);\nconst d: bigint = 10n;\n",
        );
        assert!(diags.is_empty(), "{:?}", diags);
    }

    #[test]
    fn test_non_literal_initialisers_are_not_judged() {
        let diags = check("declare function f(): any;\nconst a: number = f();\n");
        assert!(diags.is_empty(), "{:?}", diags);
    }

    #[test]
    fn test_return_type_mismatch() {
        let diags = check("function f(): string {\n  return 42;\n}\n");
        assert_eq!(diags.len(), 1, "{:?}", diags);
        assert_eq!(
            diags[0].message,
            "Type '42' is not assignable to type 'string'."
        );
        assert_eq!(diags[0].position.line, 1);
    }

    #[test]
    fn test_async_return_annotation_is_skipped() {
        let diags = check("async function f(): Promise<number> {\n  return 1;\n}\n");
        assert!(diags.is_empty(), "{:?}", diags);
    }

    #[test]
    fn test_inner_function_return_does_not_leak() {
        let code = "function outer(): number {\n  const g = () => \"s\";\n  function inner() { return \"t\"; }\n  return 1;\n}\n";
        let diags = check(code);
        assert!(diags.is_empty(), "{:?}", diags);
    }

    #[test]
    fn test_unused_nested_label_is_a_warning() {
        let diags = check("function f() {\n  loop: for (;;) { break; }\n}\n");
        assert_eq!(diags.len(), 1, "{:?}", diags);
        assert_eq!(diags[0].severity, Severity::Warning);
        assert_eq!(diags[0].code, Some(CODE_UNUSED_LABEL));
    }

    #[test]
    fn test_used_label_is_silent() {
        let diags = check("function f() {\n  loop: for (;;) { break loop; }\n}\n");
        assert!(diags.is_empty(), "{:?}", diags);
    }

    #[test]
    fn test_ignored_codes_are_dropped() {
        let options = CompileOptions::default().ignore_code(CODE_UNUSED_LABEL);
        let diags = check_with("function f() {\n  loop: for (;;) { break; }\n}\n", &options);
        assert!(diags.is_empty(), "{:?}", diags);
    }

    #[test]
    fn test_parse_errors_are_errors() {
        let diags = check("let = ;\n");
        assert!(!diags.is_empty());
        assert!(diags.iter().all(|d| d.file == "index.ts"));
        assert!(diags.iter().any(|d| d.is_error()));
    }

    #[test]
    fn test_diagnostics_are_ordered_by_offset() {
        let diags = check("let b: string = 1;\nlet a: number = \"x\";\n");
        assert_eq!(diags.len(), 2);
        assert!(diags[0].position.offset < diags[1].position.offset);
    }

    #[test]
    fn test_literal_types_in_messages() {
        let diags = check("let a: string = -1;\nlet b: number = true;\nlet c: boolean = 5n;\nlet d: number = `t`;\n");
        let messages: Vec<_> = diags.iter().map(|d| d.message.as_str()).collect();
        assert_eq!(
            messages,
            vec![
                "Type '-1' is not assignable to type 'string'.",
                "Type 'true' is not assignable to type 'number'.",
                "Type '5n' is not assignable to type 'boolean'.",
                "Type 'string' is not assignable to type 'number'.",
            ]
        );
    }

    #[test]
    fn test_unknown_name_is_reported() {
        let diags = check("let a = 1;\nconsole.log(doesNotExist, a);\n");
        assert_eq!(diags.len(), 1, "{:?}", diags);
        assert_eq!(diags[0].code, Some(CODE_CANNOT_FIND_NAME));
        assert_eq!(diags[0].message, "Cannot find name 'doesNotExist'.");
        assert_eq!((diags[0].position.line, diags[0].position.column), (1, 12));
    }

    #[test]
    fn test_declared_and_global_names_resolve() {
        let code = "declare const transport: { send(x: number): Promise<void> };\nasync function go() {\n  await transport.send(Math.max(1, 2));\n  setTimeout(() => console.log(JSON.stringify({})), 0);\n  return hoisted();\n}\nfunction hoisted() { return arguments.length; }\n";
        let diags = check(code);
        assert!(diags.is_empty(), "{:?}", diags);
    }

    #[test]
    fn test_unknown_type_names_are_not_reported() {
        let diags = check("declare const c: Client;\nlet p: Promise<Missing> | undefined;\nconsole.log(c, p);\n");
        assert!(diags.is_empty(), "{:?}", diags);
    }

    #[test]
    fn test_host_globals_option() {
        let options = CompileOptions::default().with_global("createClient");
        let diags = check_with("const client = createClient();\nconsole.log(client);\n", &options);
        assert!(diags.is_empty(), "{:?}", diags);
        assert_eq!(check("const client = createClient();\n").len(), 1);
    }

    #[test]
    fn test_top_level_exports_binding_is_reserved() {
        let diags = check("const exports = 1;\nconsole.log(exports);\n");
        assert_eq!(diags.len(), 1, "{:?}", diags);
        assert_eq!(diags[0].code, Some(CODE_RESERVED_EXPORTS));
        assert_eq!((diags[0].position.line, diags[0].position.column), (0, 6));
    }

    #[test]
    fn test_nested_exports_binding_is_allowed() {
        let diags = check("function f() {\n  const exports = {};\n  return exports;\n}\nexports.extra = 1;\n");
        assert!(diags.is_empty(), "{:?}", diags);
    }

    #[test]
    fn test_top_level_await_is_reported() {
        let diags = check("const r = await Promise.resolve(1);\n");
        assert_eq!(diags.len(), 1, "{:?}", diags);
        assert_eq!(diags[0].code, Some(CODE_TOP_LEVEL_AWAIT));
        assert_eq!(diags[0].position.column, 10);
    }

    #[test]
    fn test_await_inside_functions_is_allowed() {
        let diags = check("async function f() {\n  await 1;\n  for await (const x of []) {}\n}\nconst g = async () => await f();\n");
        assert!(diags.is_empty(), "{:?}", diags);
    }

    #[test]
    fn test_top_level_for_await_is_reported() {
        let diags = check("for await (const x of []) {\n  console.log(x);\n}\n");
        assert_eq!(diags.len(), 1, "{:?}", diags);
        assert_eq!(diags[0].code, Some(CODE_TOP_LEVEL_FOR_AWAIT));
    }

    #[test]
    fn test_import_meta_is_reported_anywhere() {
        let diags = check("const u = import.meta.url;\nfunction f() { return import.meta; }\n");
        assert_eq!(diags.len(), 2, "{:?}", diags);
        assert!(diags.iter().all(|d| d.code == Some(CODE_IMPORT_META)));
    }
}
