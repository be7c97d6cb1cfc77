// Declared-type rendering for lang-c declarations.
// Produces C abstract-declarator text such as `char *(*)(int)`.

use lang_c::ast::{
    ArraySize, DeclarationSpecifier, Declarator, DeclaratorKind, DerivedDeclarator, Ellipsis,
    FunctionDeclarator, ParameterDeclaration, PointerQualifier, SpecifierQualifier, StructKind,
    TypeQualifier, TypeSpecifier,
};
use lang_c::span::{Node, Span};

pub struct TypeRenderer<'a> {
    source: &'a str,
}

impl<'a> TypeRenderer<'a> {
    pub fn new(source: &'a str) -> Self {
        Self { source }
    }

    /// Source text covered by `span`, whitespace-collapsed.
    pub fn text(&self, span: &Span) -> String {
        self.source
            .get(span.start..span.end)
            .map(|s| s.split_whitespace().collect::<Vec<_>>().join(" "))
            .unwrap_or_default()
    }

    /// Type part of declaration specifiers; storage classes and function
    /// specifiers are not part of a type and are left out.
    pub fn specifiers(&self, specs: &[Node<DeclarationSpecifier>]) -> String {
        let words: Vec<String> = specs
            .iter()
            .filter_map(|spec| match &spec.node {
                DeclarationSpecifier::TypeSpecifier(ts) => Some(self.type_specifier(ts)),
                DeclarationSpecifier::TypeQualifier(tq) => type_qualifier(&tq.node).map(String::from),
                _ => None,
            })
            .collect();
        words.join(" ")
    }

    pub fn specifier_qualifiers(&self, specs: &[Node<SpecifierQualifier>]) -> String {
        let words: Vec<String> = specs
            .iter()
            .filter_map(|spec| match &spec.node {
                SpecifierQualifier::TypeSpecifier(ts) => Some(self.type_specifier(ts)),
                SpecifierQualifier::TypeQualifier(tq) => type_qualifier(&tq.node).map(String::from),
                _ => None,
            })
            .collect();
        words.join(" ")
    }

    /// `base` combined with the shape of `declarator`, name omitted.
    pub fn full_type(&self, base: &str, declarator: &Declarator) -> String {
        join_type(base, &self.abstract_declarator(declarator))
    }

    fn type_specifier(&self, ts: &Node<TypeSpecifier>) -> String {
        match &ts.node {
            TypeSpecifier::Void => "void".to_string(),
            TypeSpecifier::Char => "char".to_string(),
            TypeSpecifier::Short => "short".to_string(),
            TypeSpecifier::Int => "int".to_string(),
            TypeSpecifier::Long => "long".to_string(),
            TypeSpecifier::Float => "float".to_string(),
            TypeSpecifier::Double => "double".to_string(),
            TypeSpecifier::Signed => "signed".to_string(),
            TypeSpecifier::Unsigned => "unsigned".to_string(),
            TypeSpecifier::Bool => "_Bool".to_string(),
            TypeSpecifier::Complex => "_Complex".to_string(),
            TypeSpecifier::Struct(st) => {
                let keyword = match st.node.kind.node {
                    StructKind::Struct => "struct",
                    StructKind::Union => "union",
                };
                match &st.node.identifier {
                    Some(id) => format!("{} {}", keyword, id.node.name),
                    None => keyword.to_string(),
                }
            }
            TypeSpecifier::Enum(et) => match &et.node.identifier {
                Some(id) => format!("enum {}", id.node.name),
                None => "enum".to_string(),
            },
            TypeSpecifier::TypedefName(id) => id.node.name.clone(),
            // typeof, _Atomic(T), _FloatN: keep what was written.
            _ => self.text(&ts.span),
        }
    }

    fn abstract_declarator(&self, declarator: &Declarator) -> String {
        let mut prefix = String::new();
        let mut suffix = String::new();

        for derived in &declarator.derived {
            match &derived.node {
                DerivedDeclarator::Pointer(quals) => {
                    prefix.push('*');
                    prefix.push_str(&pointer_qualifiers(quals));
                }
                DerivedDeclarator::Block(quals) => {
                    prefix.push('^');
                    prefix.push_str(&pointer_qualifiers(quals));
                }
                DerivedDeclarator::Array(array) => {
                    let size = match &array.node.size {
                        ArraySize::Unknown => String::new(),
                        ArraySize::VariableUnknown => "*".to_string(),
                        ArraySize::VariableExpression(e) => self.text(&e.span),
                        ArraySize::StaticExpression(e) => format!("static {}", self.text(&e.span)),
                    };
                    suffix.push_str(&format!("[{}]", size));
                }
                DerivedDeclarator::Function(func) => {
                    suffix.push_str(&self.parameter_list(&func.node));
                }
                DerivedDeclarator::KRFunction(_) => suffix.push_str("()"),
            }
        }

        let inner = match &declarator.kind.node {
            DeclaratorKind::Declarator(nested) => {
                format!("({})", self.abstract_declarator(&nested.node))
            }
            _ => String::new(),
        };

        format!("{}{}{}", prefix, inner, suffix)
    }

    fn parameter_list(&self, func: &FunctionDeclarator) -> String {
        let mut params: Vec<String> = func
            .parameters
            .iter()
            .map(|p| self.parameter(&p.node))
            .collect();
        if let Ellipsis::Some = func.ellipsis {
            params.push("...".to_string());
        }
        format!("({})", params.join(", "))
    }

    pub fn parameter(&self, param: &ParameterDeclaration) -> String {
        let base = self.specifiers(&param.specifiers);
        match &param.declarator {
            Some(d) => self.full_type(&base, &d.node),
            None => base,
        }
    }
}

fn type_qualifier(tq: &TypeQualifier) -> Option<&'static str> {
    match tq {
        TypeQualifier::Const => Some("const"),
        TypeQualifier::Restrict => Some("restrict"),
        TypeQualifier::Volatile => Some("volatile"),
        TypeQualifier::Atomic => Some("_Atomic"),
        _ => None,
    }
}

fn pointer_qualifiers(quals: &[Node<PointerQualifier>]) -> String {
    let words: Vec<&str> = quals
        .iter()
        .filter_map(|q| match &q.node {
            PointerQualifier::TypeQualifier(tq) => type_qualifier(&tq.node),
            _ => None,
        })
        .collect();
    if words.is_empty() {
        String::new()
    } else {
        format!("{} ", words.join(" "))
    }
}

fn join_type(base: &str, shape: &str) -> String {
    match (base.is_empty(), shape.is_empty()) {
        (_, true) => base.to_string(),
        (true, false) => shape.to_string(),
        (false, false) => format!("{} {}", base, shape.trim_end()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lang_c::ast::{ExternalDeclaration, TranslationUnit};
    use lang_c::driver::{parse_preprocessed, Config};

    fn parse(src: &str) -> TranslationUnit {
        parse_preprocessed(&Config::default(), src.to_string())
            .expect("test source should parse")
            .unit
    }

    /// Declared type of the first declarator of every external declaration.
    fn types_of(src: &str) -> Vec<String> {
        let unit = parse(src);
        let renderer = TypeRenderer::new(src);
        unit.0
            .iter()
            .map(|ext| match &ext.node {
                ExternalDeclaration::Declaration(d) => {
                    let base = renderer.specifiers(&d.node.specifiers);
                    let first = &d.node.declarators[0].node.declarator.node;
                    renderer.full_type(&base, first)
                }
                ExternalDeclaration::FunctionDefinition(f) => {
                    let base = renderer.specifiers(&f.node.specifiers);
                    renderer.full_type(&base, &f.node.declarator.node)
                }
                _ => String::new(),
            })
            .collect()
    }

    #[test]
    fn test_function_types() {
        let src = "int main(int argc, char **argv) { return 0; }\n\
                   static void idle(void) {}\n\
                   int printf(const char *fmt, ...);\n\
                   int old();\n";
        assert_eq!(
            types_of(src),
            vec![
                "int (int, char **)",
                "void (void)",
                "int (const char *, ...)",
                "int ()",
            ]
        );
    }

    #[test]
    fn test_pointer_and_array_types() {
        let src = "char *(*handler)(int);\n\
                   unsigned long table[4];\n\
                   const char *const name;\n\
                   struct point *origin;\n";
        assert_eq!(
            types_of(src),
            vec![
                "char *(*)(int)",
                "unsigned long [4]",
                "const char *const",
                "struct point *",
            ]
        );
    }
}
