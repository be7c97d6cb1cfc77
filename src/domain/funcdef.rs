//! Function-Definition Handler
//!
//! Turns every `FunctionDefinition` node reached by the dispatcher into a
//! [`FunctionReport`] and passes it to a [`ReportSink`]. Function bodies are
//! not scanned: one report per definition node, in walk order.

use crate::domain::ast::{AstNode, AstNodeKind, Coord};
use crate::domain::error::TraversalError;
use crate::domain::visitor::{NodeHandler, VisitFlow};
use crate::ports::ReportSink;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Which declarator field the text report prints after `type`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TypeField {
    /// The declarator's initializer (`None` for function definitions).
    /// Kept as the default so existing consumers of the output see the
    /// same lines.
    #[default]
    Initializer,
    /// The declared type signature, e.g. `int (int, char **)`.
    Declared,
}

impl TypeField {
    pub fn from_str(s: &str) -> Option<TypeField> {
        match s.to_lowercase().as_str() {
            "initializer" | "init" => Some(TypeField::Initializer),
            "declared" | "type" => Some(TypeField::Declared),
            _ => None,
        }
    }
}

/// One reported function definition.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FunctionReport {
    pub name: String,
    pub coord: Coord,
    pub declared_type: Option<String>,
    pub initializer: Option<String>,
}

impl FunctionReport {
    /// `<name> at <coord> type <value>`
    pub fn to_line(&self, field: TypeField) -> String {
        let value = match field {
            TypeField::Initializer => self.initializer.as_deref(),
            TypeField::Declared => self.declared_type.as_deref(),
        };
        format!(
            "{} at {} type {}",
            self.name,
            self.coord,
            value.unwrap_or("None")
        )
    }
}

impl fmt::Display for FunctionReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_line(TypeField::default()))
    }
}

/// Build the report for a `FunctionDefinition` node.
pub fn report_for(node: &AstNode) -> Result<FunctionReport, TraversalError> {
    let missing = |field: &'static str, coord: Option<&Coord>| TraversalError::MissingField {
        kind: node.kind,
        field,
        coord: coord.cloned(),
    };

    let declarator = node
        .child("declarator")
        .ok_or_else(|| missing("declarator", node.coord.as_ref()))?;
    let coord = declarator
        .coord
        .clone()
        .ok_or_else(|| missing("coord", node.coord.as_ref()))?;
    let name = declarator
        .name
        .clone()
        .ok_or_else(|| missing("name", Some(&coord)))?;

    Ok(FunctionReport {
        name,
        coord,
        declared_type: declarator.detail.clone(),
        initializer: declarator.child("init").map(AstNode::summary),
    })
}

pub struct FuncDefHandler<'s> {
    sink: &'s mut dyn ReportSink,
    /// Only report definitions located in this file.
    only_file: Option<String>,
}

impl<'s> FuncDefHandler<'s> {
    pub fn new(sink: &'s mut dyn ReportSink) -> Self {
        Self {
            sink,
            only_file: None,
        }
    }

    pub fn only_in_file(mut self, file: impl Into<String>) -> Self {
        self.only_file = Some(file.into());
        self
    }
}

impl NodeHandler for FuncDefHandler<'_> {
    fn handle(&mut self, node: &AstNode) -> Result<VisitFlow, TraversalError> {
        debug_assert_eq!(node.kind, AstNodeKind::FunctionDefinition);
        let report = report_for(node)?;

        let wanted = self
            .only_file
            .as_deref()
            .map_or(true, |file| report.coord.file == file);
        if wanted {
            self.sink.report(&report)?;
        } else {
            log::debug!("skipping {} from {}", report.name, report.coord.file);
        }

        Ok(VisitFlow::SkipChildren)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn func_def(name: Option<&str>, coord: Option<Coord>) -> AstNode {
        let mut declarator = AstNode::new(AstNodeKind::Declarator)
            .with_detail("int (void)")
            .with_coord(coord)
            .with_slot("parameters", vec![])
            .with_slot("init", vec![]);
        if let Some(name) = name {
            declarator = declarator.with_name(name);
        }
        AstNode::new(AstNodeKind::FunctionDefinition)
            .with_child("declarator", declarator)
            .with_slot("declarations", vec![])
            .with_child("body", AstNode::new(AstNodeKind::Compound))
    }

    #[test]
    fn test_report_line_formats() {
        let node = func_def(Some("main"), Some(Coord::new("prog.c", 1, Some(5))));
        let report = report_for(&node).unwrap();
        assert_eq!(report.to_line(TypeField::Initializer), "main at prog.c:1:5 type None");
        assert_eq!(report.to_line(TypeField::Declared), "main at prog.c:1:5 type int (void)");
        assert_eq!(report.to_string(), "main at prog.c:1:5 type None");
    }

    #[test]
    fn test_initializer_summary_is_reported() {
        let declarator = AstNode::new(AstNodeKind::Declarator)
            .with_name("f")
            .with_coord(Some(Coord::new("x.c", 2, None)))
            .with_child("init", AstNode::new(AstNodeKind::Constant).with_detail("0"));
        let node = AstNode::new(AstNodeKind::FunctionDefinition).with_child("declarator", declarator);
        let report = report_for(&node).unwrap();
        assert_eq!(report.to_line(TypeField::Initializer), "f at x.c:2 type Constant(0)");
    }

    #[test]
    fn test_missing_coord_fails() {
        let node = func_def(Some("main"), None);
        let err = report_for(&node).unwrap_err();
        assert!(matches!(err, TraversalError::MissingField { field: "coord", .. }));
    }

    #[test]
    fn test_missing_name_fails() {
        let node = func_def(None, Some(Coord::new("a.c", 4, Some(1))));
        let err = report_for(&node).unwrap_err();
        assert_eq!(err.to_string(), "FunctionDefinition node at a.c:4:1 has no name");
    }

    #[test]
    fn test_type_field_from_str() {
        assert_eq!(TypeField::from_str("declared"), Some(TypeField::Declared));
        assert_eq!(TypeField::from_str("INIT"), Some(TypeField::Initializer));
        assert_eq!(TypeField::from_str("signature"), None);
    }
}
