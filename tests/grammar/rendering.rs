//! Grammar rendering and visitor tests.

use miles_grammar::{AstVisitor, parse_grammar, walk};

// =============================================================================
// Debug Form
// =============================================================================

#[test]
fn debug_form_of_every_kind() {
    let ast = parse_grammar("HI { x } [Y] (A, b) n=Z").unwrap();
    assert_eq!(
        ast.to_string(),
        "(ROOT:(SEQUENCE:(WORD:HI),(OPTIONAL:(SEQUENCE:(MATCHING:x))),\
         (LIST:(SEQUENCE:(WORD:Y))),(CHOICE:(SEQUENCE:(WORD:A)),(SEQUENCE:(MATCHING:b))),\
         (n=(WORD:Z))))"
    );
}

// =============================================================================
// Grammar Text
// =============================================================================

#[test]
fn grammar_text_is_canonical() {
    let ast = parse_grammar("  (ADD,DRAW){color}  shape AT  at=[coordinates]").unwrap();
    assert_eq!(
        ast.to_grammar_text(),
        "(ADD, DRAW) {color} shape AT at=[coordinates]"
    );
}

#[test]
fn canonical_sentence_takes_simplest_path() {
    let ast = parse_grammar("(SET, PUT) { THE } [CUP { AND }] DOWN").unwrap();
    assert_eq!(
        ast.canonical_sentence(),
        Some(vec!["set".to_string(), "cup".to_string(), "down".to_string()])
    );
}

#[test]
fn canonical_sentence_needs_literals() {
    assert_eq!(parse_grammar("HELLO name").unwrap().canonical_sentence(), None);
    // A skipped optional never needs its placeholder.
    assert_eq!(
        parse_grammar("HELLO { name }").unwrap().canonical_sentence(),
        Some(vec!["hello".to_string()])
    );
}

// =============================================================================
// Visitors
// =============================================================================

#[derive(Default)]
struct Outline(Vec<String>);

impl AstVisitor for Outline {
    fn visit_word(&mut self, text: &str) {
        self.0.push(text.to_string());
    }

    fn visit_matching(&mut self, name: &str) {
        self.0.push(format!("<{name}>"));
    }

    fn enter_named(&mut self, name: &str) {
        self.0.push(format!("{name}:"));
    }

    fn enter_optional(&mut self) {
        self.0.push("{".into());
    }

    fn leave_optional(&mut self) {
        self.0.push("}".into());
    }

    fn enter_list(&mut self) {
        self.0.push("[".into());
    }

    fn leave_list(&mut self) {
        self.0.push("]".into());
    }

    fn enter_option(&mut self, index: usize) {
        self.0.push(format!("#{index}"));
    }
}

#[test]
fn walk_visits_in_source_order() {
    let ast = parse_grammar("GO { to=place } (NOW, LATER) [x]").unwrap();
    let mut outline = Outline::default();
    walk(&mut outline, &ast);
    assert_eq!(
        outline.0,
        vec!["GO", "{", "to:", "<place>", "}", "#0", "NOW", "#1", "LATER", "[", "<x>", "]"]
    );
}
