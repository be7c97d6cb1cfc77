// Lowering from the lang-c AST to the generic `AstNode` tree.
// Child slots are added in the order the C grammar lists them, so a
// pre-order walk of the result follows source order.

use crate::domain::ast::{AstNode, AstNodeKind, Coord};
use crate::infrastructure::c_types::TypeRenderer;
use crate::infrastructure::source_map::SourceMap;
use lang_c::ast::{
    BlockItem, Declaration, DeclarationSpecifier, Declarator, DeclaratorKind, DerivedDeclarator,
    Expression, ExternalDeclaration, ForInitializer, FunctionDefinition, Initializer, Label,
    ParameterDeclaration, Statement, StaticAssert, StructDeclaration, TranslationUnit,
    TypeSpecifier,
};
use lang_c::span::{Node, Span};

pub struct Lowering<'a> {
    map: &'a SourceMap,
    types: TypeRenderer<'a>,
}

impl<'a> Lowering<'a> {
    pub fn new(map: &'a SourceMap) -> Self {
        Self {
            map,
            types: TypeRenderer::new(map.source()),
        }
    }

    fn coord(&self, span: &Span) -> Option<Coord> {
        self.map.coord(span.start)
    }

    fn leaf(&self, kind: AstNodeKind, span: &Span) -> AstNode {
        AstNode::new(kind).with_coord(self.coord(span))
    }

    pub fn translation_unit(&self, unit: &TranslationUnit) -> AstNode {
        let items = unit
            .0
            .iter()
            .map(|ext| self.external_declaration(ext))
            .collect();
        AstNode::new(AstNodeKind::TranslationUnit)
            .with_coord(self.map.coord(0))
            .with_slot("ext", items)
    }

    fn external_declaration(&self, ext: &Node<ExternalDeclaration>) -> AstNode {
        match &ext.node {
            ExternalDeclaration::Declaration(d) => self.declaration(d),
            ExternalDeclaration::StaticAssert(s) => self.static_assert(s),
            ExternalDeclaration::FunctionDefinition(f) => self.function_definition(f),
        }
    }

    pub fn function_definition(&self, f: &Node<FunctionDefinition>) -> AstNode {
        let base = self.types.specifiers(&f.node.specifiers);
        let declarator = self.declarator(&base, &f.node.declarator, None);
        let declarations = f
            .node
            .declarations
            .iter()
            .map(|d| self.declaration(d))
            .collect();

        self.leaf(AstNodeKind::FunctionDefinition, &f.span)
            .with_child("declarator", declarator)
            .with_slot("declarations", declarations)
            .with_child("body", self.statement(&f.node.statement))
    }

    fn declaration(&self, d: &Node<Declaration>) -> AstNode {
        let base = self.types.specifiers(&d.node.specifiers);
        let types = self.tag_definitions(&d.node.specifiers);
        let declarators = d
            .node
            .declarators
            .iter()
            .map(|init| {
                self.declarator(
                    &base,
                    &init.node.declarator,
                    init.node.initializer.as_ref(),
                )
            })
            .collect();

        self.leaf(AstNodeKind::Declaration, &d.span)
            .with_detail(base)
            .with_slot("types", types)
            .with_slot("declarators", declarators)
    }

    /// Struct, union and enum bodies declared inside specifiers.
    fn tag_definitions(&self, specs: &[Node<DeclarationSpecifier>]) -> Vec<AstNode> {
        specs
            .iter()
            .filter_map(|spec| match &spec.node {
                DeclarationSpecifier::TypeSpecifier(ts) => self.type_definition(ts),
                _ => None,
            })
            .collect()
    }

    fn type_definition(&self, ts: &Node<TypeSpecifier>) -> Option<AstNode> {
        match &ts.node {
            TypeSpecifier::Struct(st) => {
                let fields = st.node.declarations.as_ref()?;
                let members = fields.iter().map(|f| self.struct_declaration(f)).collect();
                let mut node = self
                    .leaf(AstNodeKind::StructType, &st.span)
                    .with_detail(self.types.text(&st.node.kind.span))
                    .with_slot("members", members);
                node.name = st.node.identifier.as_ref().map(|id| id.node.name.clone());
                Some(node)
            }
            TypeSpecifier::Enum(et) => {
                if et.node.enumerators.is_empty() {
                    return None;
                }
                let enumerators = et
                    .node
                    .enumerators
                    .iter()
                    .map(|e| {
                        self.leaf(AstNodeKind::Enumerator, &e.span)
                            .with_name(e.node.identifier.node.name.clone())
                            .with_optional_child(
                                "value",
                                e.node.expression.as_ref().map(|v| self.expression(v)),
                            )
                    })
                    .collect();
                let mut node = self
                    .leaf(AstNodeKind::EnumType, &et.span)
                    .with_slot("enumerators", enumerators);
                node.name = et.node.identifier.as_ref().map(|id| id.node.name.clone());
                Some(node)
            }
            _ => None,
        }
    }

    fn struct_declaration(&self, d: &Node<StructDeclaration>) -> AstNode {
        match &d.node {
            StructDeclaration::Field(field) => {
                let base = self.types.specifier_qualifiers(&field.node.specifiers);
                let declarators = field
                    .node
                    .declarators
                    .iter()
                    .filter_map(|sd| sd.node.declarator.as_ref())
                    .map(|decl| self.declarator(&base, decl, None))
                    .collect();
                self.leaf(AstNodeKind::Declaration, &field.span)
                    .with_detail(base)
                    .with_slot("types", vec![])
                    .with_slot("declarators", declarators)
            }
            StructDeclaration::StaticAssert(s) => self.static_assert(s),
        }
    }

    /// A declarator node: name, rendered declared type, the coordinate of
    /// the name token, the parameters of a function declarator and the
    /// initializer, if any.
    fn declarator(
        &self,
        base: &str,
        d: &Node<Declarator>,
        init: Option<&Node<Initializer>>,
    ) -> AstNode {
        let ident = declarator_identifier(&d.node);
        let span = ident.map(|(_, span)| span).unwrap_or(&d.span);
        let parameters: Vec<AstNode> = function_parameters(&d.node)
            .map(|params| params.iter().map(|p| self.parameter(p)).collect())
            .unwrap_or_default();

        let mut node = self
            .leaf(AstNodeKind::Declarator, span)
            .with_detail(self.types.full_type(base, &d.node))
            .with_slot("parameters", parameters)
            .with_optional_child("init", init.map(|i| self.initializer(i)));
        node.name = ident.map(|(name, _)| name.to_string());
        node
    }

    fn parameter(&self, p: &Node<ParameterDeclaration>) -> AstNode {
        let ident = p
            .node
            .declarator
            .as_ref()
            .and_then(|d| declarator_identifier(&d.node));
        let span = ident.map(|(_, span)| span).unwrap_or(&p.span);

        let mut node = self
            .leaf(AstNodeKind::ParameterDeclaration, span)
            .with_detail(self.types.parameter(&p.node));
        node.name = ident.map(|(name, _)| name.to_string());
        node
    }

    fn initializer(&self, init: &Node<Initializer>) -> AstNode {
        match &init.node {
            Initializer::Expression(e) => self.expression(e),
            Initializer::List(items) => {
                let items = items
                    .iter()
                    .map(|item| self.initializer(&item.node.initializer))
                    .collect();
                self.leaf(AstNodeKind::InitializerList, &init.span)
                    .with_slot("items", items)
            }
        }
    }

    fn static_assert(&self, s: &Node<StaticAssert>) -> AstNode {
        self.leaf(AstNodeKind::StaticAssert, &s.span)
            .with_child("expression", self.expression(&s.node.expression))
    }

    fn statement(&self, s: &Node<Statement>) -> AstNode {
        let node = |kind| self.leaf(kind, &s.span);
        match &s.node {
            Statement::Labeled(l) => {
                let labeled = match &l.node.label.node {
                    Label::Identifier(id) => node(AstNodeKind::Label).with_name(id.node.name.clone()),
                    Label::Case(e) => node(AstNodeKind::Case).with_child("expression", self.expression(e)),
                    Label::Default => node(AstNodeKind::Default),
                    _ => node(AstNodeKind::Case).with_detail(self.types.text(&l.node.label.span)),
                };
                labeled.with_child("statement", self.statement(&l.node.statement))
            }
            Statement::Compound(items) => {
                let items = items.iter().map(|item| self.block_item(item)).collect();
                node(AstNodeKind::Compound).with_slot("items", items)
            }
            Statement::Expression(e) => node(AstNodeKind::ExpressionStatement)
                .with_optional_child("expression", e.as_ref().map(|e| self.expression(e))),
            Statement::If(i) => node(AstNodeKind::If)
                .with_child("condition", self.expression(&i.node.condition))
                .with_child("then", self.statement(&i.node.then_statement))
                .with_optional_child(
                    "else",
                    i.node.else_statement.as_ref().map(|e| self.statement(e)),
                ),
            Statement::Switch(sw) => node(AstNodeKind::Switch)
                .with_child("expression", self.expression(&sw.node.expression))
                .with_child("statement", self.statement(&sw.node.statement)),
            Statement::While(w) => node(AstNodeKind::While)
                .with_child("expression", self.expression(&w.node.expression))
                .with_child("statement", self.statement(&w.node.statement)),
            Statement::DoWhile(dw) => node(AstNodeKind::DoWhile)
                .with_child("statement", self.statement(&dw.node.statement))
                .with_child("expression", self.expression(&dw.node.expression)),
            Statement::For(f) => {
                let init = match &f.node.initializer.node {
                    ForInitializer::Empty => None,
                    ForInitializer::Expression(e) => Some(self.expression(e)),
                    ForInitializer::Declaration(d) => Some(self.declaration(d)),
                    ForInitializer::StaticAssert(sa) => Some(self.static_assert(sa)),
                };
                node(AstNodeKind::For)
                    .with_optional_child("init", init)
                    .with_optional_child(
                        "condition",
                        f.node.condition.as_ref().map(|e| self.expression(e)),
                    )
                    .with_optional_child("step", f.node.step.as_ref().map(|e| self.expression(e)))
                    .with_child("statement", self.statement(&f.node.statement))
            }
            Statement::Goto(id) => node(AstNodeKind::Goto).with_name(id.node.name.clone()),
            Statement::Continue => node(AstNodeKind::Continue),
            Statement::Break => node(AstNodeKind::Break),
            Statement::Return(e) => node(AstNodeKind::Return)
                .with_optional_child("expression", e.as_ref().map(|e| self.expression(e))),
            Statement::Asm(_) => node(AstNodeKind::Asm).with_detail(self.types.text(&s.span)),
        }
    }

    fn block_item(&self, item: &Node<BlockItem>) -> AstNode {
        match &item.node {
            BlockItem::Declaration(d) => self.declaration(d),
            BlockItem::StaticAssert(s) => self.static_assert(s),
            BlockItem::Statement(s) => self.statement(s),
        }
    }

    fn expression(&self, e: &Node<Expression>) -> AstNode {
        let node = |kind| self.leaf(kind, &e.span);
        match &e.node {
            Expression::Identifier(id) => node(AstNodeKind::Identifier).with_name(id.node.name.clone()),
            Expression::Constant(_) => node(AstNodeKind::Constant).with_detail(self.types.text(&e.span)),
            Expression::StringLiteral(_) => {
                node(AstNodeKind::StringLiteral).with_detail(self.types.text(&e.span))
            }
            Expression::Member(m) => node(AstNodeKind::Member)
                .with_name(m.node.identifier.node.name.clone())
                .with_detail(format!("{:?}", m.node.operator.node))
                .with_child("expression", self.expression(&m.node.expression)),
            Expression::Call(c) => node(AstNodeKind::Call)
                .with_child("callee", self.expression(&c.node.callee))
                .with_slot(
                    "arguments",
                    c.node.arguments.iter().map(|a| self.expression(a)).collect(),
                ),
            Expression::SizeOfTy(s) => node(AstNodeKind::SizeOf).with_detail(self.types.text(&s.span)),
            Expression::SizeOfVal(s) => {
                node(AstNodeKind::SizeOf).with_child("expression", self.expression(&s.node.0))
            }
            Expression::UnaryOperator(u) => node(AstNodeKind::UnaryOp)
                .with_detail(format!("{:?}", u.node.operator.node))
                .with_child("operand", self.expression(&u.node.operand)),
            Expression::Cast(c) => node(AstNodeKind::Cast)
                .with_detail(self.types.text(&c.node.type_name.span))
                .with_child("expression", self.expression(&c.node.expression)),
            Expression::BinaryOperator(b) => node(AstNodeKind::BinaryOp)
                .with_detail(format!("{:?}", b.node.operator.node))
                .with_child("lhs", self.expression(&b.node.lhs))
                .with_child("rhs", self.expression(&b.node.rhs)),
            Expression::Conditional(c) => node(AstNodeKind::Conditional)
                .with_child("condition", self.expression(&c.node.condition))
                .with_child("then", self.expression(&c.node.then_expression))
                .with_child("else", self.expression(&c.node.else_expression)),
            Expression::Comma(exprs) => node(AstNodeKind::Comma)
                .with_slot("expressions", exprs.iter().map(|x| self.expression(x)).collect()),
            Expression::Statement(s) => {
                node(AstNodeKind::StatementExpression).with_child("statement", self.statement(s))
            }
            // Generic selections, compound literals, offsetof, va_arg, alignof.
            _ => node(AstNodeKind::Other).with_detail(self.types.text(&e.span)),
        }
    }
}

/// Name and span of the identifier a declarator declares, if it has one.
fn declarator_identifier(d: &Declarator) -> Option<(&str, &Span)> {
    match &d.kind.node {
        DeclaratorKind::Identifier(id) => Some((id.node.name.as_str(), &id.span)),
        DeclaratorKind::Declarator(nested) => declarator_identifier(&nested.node),
        DeclaratorKind::Abstract => None,
    }
}

/// Parameters of the function a declarator declares, looking through
/// parenthesized declarators such as `(*get(void))(int)`.
fn function_parameters(d: &Declarator) -> Option<&[Node<ParameterDeclaration>]> {
    if let DeclaratorKind::Declarator(nested) = &d.kind.node {
        if let Some(params) = function_parameters(&nested.node) {
            return Some(params);
        }
    }
    d.derived.iter().find_map(|derived| match &derived.node {
        DerivedDeclarator::Function(f) => Some(f.node.parameters.as_slice()),
        _ => None,
    })
}
